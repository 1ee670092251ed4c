//! Where the shared prerequisite kext comes from.

use crate::plugin::CommandSpec;
use serde::Deserialize;

/// Source of the prerequisite kext that `Lilu`-flagged plugins build against.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrerequisiteSource {
    /// Name; also the checkout dir and the name of the copied bundle's parent
    pub name: String,
    /// Repository URL (without `.git`)
    pub url: String,
    /// Built artifact relative to the checkout
    pub artifact: String,
    /// Build command; `None` means `xcodebuild -quiet -configuration Debug`
    pub command: Option<CommandSpec>,
}

impl Default for PrerequisiteSource {
    fn default() -> Self {
        Self {
            name: "Lilu".to_string(),
            url: "https://github.com/acidanthera/Lilu".to_string(),
            artifact: "build/Debug/Lilu.kext".to_string(),
            command: None,
        }
    }
}

impl PrerequisiteSource {
    /// Argv of the build command.
    pub fn build_argv(&self) -> Vec<String> {
        match &self.command {
            Some(command) => command.argv(),
            None => ["xcodebuild", "-quiet", "-configuration", "Debug"]
                .map(String::from)
                .to_vec(),
        }
    }

    /// URL passed to `git clone`.
    pub fn clone_url(&self) -> String {
        if self.url.ends_with(".git") {
            self.url.clone()
        } else {
            format!("{}.git", self.url.trim_end_matches('/'))
        }
    }

    /// File name of the built bundle (`Lilu.kext`).
    pub fn bundle_name(&self) -> String {
        std::path::Path::new(&self.artifact)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.kext", self.name))
    }
}
