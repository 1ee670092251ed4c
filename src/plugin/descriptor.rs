//! Plugin descriptor as stored in the plugins file.

use serde::Deserialize;
use std::fmt;

/// Kind of artifact a plugin produces.
///
/// Determines the output category directory and whether the version can be
/// read from an Info.plist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
pub enum PluginType {
    /// Kernel extension bundle
    #[default]
    Kext,
    /// Bootloader binary
    Bootloader,
    /// Anything else
    Other,
}

impl PluginType {
    /// Output category directory name under `Builds/`.
    pub fn category(self) -> &'static str {
        match self {
            Self::Kext => "Kexts",
            Self::Bootloader => "Bootloaders",
            Self::Other => "Others",
        }
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Kext => "Kext",
            Self::Bootloader => "Bootloader",
            Self::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A command given either as one whitespace-separated string or as argv.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    /// `"make -j4"`
    Line(String),
    /// `["make", "-j4"]`
    Argv(Vec<String>),
}

impl CommandSpec {
    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        match self {
            Self::Line(line) => line.split_whitespace().map(String::from).collect(),
            Self::Argv(argv) => argv.clone(),
        }
    }
}

/// A pre- or post-build task: an executable with arguments.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Task {
    /// Display name used in logs
    pub name: String,
    /// Executable to run, relative to the checkout or on `PATH`
    pub path: String,
    /// Arguments passed to the executable
    #[serde(default)]
    pub args: Vec<String>,
}

/// Everything needed to build and publish one plugin.
#[derive(Clone, Debug, Deserialize)]
pub struct Plugin {
    /// Plugin name; also the checkout directory and release name prefix
    #[serde(rename = "Name")]
    pub name: String,

    /// Source repository URL (without `.git`)
    #[serde(rename = "URL")]
    pub url: String,

    /// Whether the plugin needs the prerequisite kext in its checkout
    #[serde(rename = "Lilu", default)]
    pub lilu: bool,

    /// Build command overriding the default xcodebuild invocations
    #[serde(rename = "Command", default)]
    pub command: Option<CommandSpec>,

    /// Tasks run before the build
    #[serde(rename = "Pre-Build", default)]
    pub pre_build: Vec<Task>,

    /// Tasks run after the build
    #[serde(rename = "Post-Build", default)]
    pub post_build: Vec<Task>,

    /// Extra arguments appended to both xcodebuild invocations
    #[serde(rename = "Build Opts", default)]
    pub build_opts: Vec<String>,

    /// Directory holding the built product, relative to the checkout
    #[serde(rename = "Build Dir", default = "default_build_dir")]
    pub build_dir: String,

    /// Info.plist path relative to `build_dir`
    #[serde(rename = "Info", default)]
    pub info: Option<String>,

    /// Rewrite release flags to their debug equivalents before building
    #[serde(rename = "Debug", default)]
    pub debug: bool,

    /// Artifact kind
    #[serde(rename = "Type", default)]
    pub kind: PluginType,

    /// Glob for the debug artifact
    #[serde(rename = "Debug File", default = "default_debug_file")]
    pub debug_file: String,

    /// Glob for the release artifact
    #[serde(rename = "Release File", default = "default_release_file")]
    pub release_file: String,

    /// Globs for additional files shipped with both variants
    #[serde(rename = "Extras", default)]
    pub extras: Vec<String>,

    /// Command whose trimmed stdout is the version string
    #[serde(rename = "Version", default)]
    pub version: Option<CommandSpec>,
}

fn default_build_dir() -> String {
    "./build/Release".to_string()
}

fn default_debug_file() -> String {
    "build/Debug/*.kext".to_string()
}

fn default_release_file() -> String {
    "build/Release/*.kext".to_string()
}

impl Plugin {
    /// Info.plist path relative to the build dir.
    pub fn info_plist(&self) -> String {
        self.info
            .clone()
            .unwrap_or_else(|| format!("{}.kext/Contents/Info.plist", self.name))
    }

    /// URL passed to `git clone`.
    pub fn clone_url(&self) -> String {
        if self.url.ends_with(".git") {
            self.url.clone()
        } else {
            format!("{}.git", self.url.trim_end_matches('/'))
        }
    }

    /// `(owner, repo)` when the source is hosted on GitHub.
    pub fn github_slug(&self) -> Option<(String, String)> {
        let url = url::Url::parse(&self.url).ok()?;
        if url.host_str() != Some("github.com") {
            return None;
        }
        let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
        let owner = segments.next()?.to_string();
        let repo = segments.next()?.trim_end_matches(".git").to_string();
        Some((owner, repo))
    }
}
