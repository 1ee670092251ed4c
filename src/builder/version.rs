//! Version string resolution.

use super::error::{Error, Result};
use crate::plugin::{Plugin, PluginType};
use crate::process;
use std::path::Path;

/// Plist key holding the bundle version.
pub const BUNDLE_VERSION_KEY: &str = "CFBundleVersion";

/// Resolves the version of a finished build.
///
/// A configured version command wins; otherwise Kext builds read
/// `CFBundleVersion` from `{checkout}/{build_dir}/{Info}`. Other types with no
/// version command fail.
pub async fn resolve_version(plugin: &Plugin, checkout: &Path, build_dir: &str) -> Result<String> {
    if let Some(command) = &plugin.version {
        let output = process::run_argv("version", &command.argv(), checkout).await?;
        return Ok(process::stdout_trimmed(&output));
    }

    match plugin.kind {
        PluginType::Kext => {
            let plist_path = checkout.join(build_dir).join(plugin.info_plist());
            read_bundle_version(&plist_path)
        }
        kind => Err(Error::MissingVersionSource {
            plugin: plugin.name.clone(),
            kind,
        }),
    }
}

/// Reads `CFBundleVersion` from a plist (XML or binary).
pub fn read_bundle_version(path: &Path) -> Result<String> {
    let plist_error = |reason: String| Error::PlistVersion {
        path: path.to_path_buf(),
        key: BUNDLE_VERSION_KEY.to_string(),
        reason,
    };

    let value = plist::Value::from_file(path).map_err(|e| plist_error(e.to_string()))?;
    let dict = value
        .as_dictionary()
        .ok_or_else(|| plist_error("top-level value is not a dictionary".to_string()))?;
    let version = dict
        .get(BUNDLE_VERSION_KEY)
        .ok_or_else(|| plist_error("key not present".to_string()))?;
    version
        .as_string()
        .map(str::to_string)
        .ok_or_else(|| plist_error("value is not a string".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleIdentifier</key>
    <string>as.vit9696.Foo</string>
    <key>CFBundleVersion</key>
    <string>1.6.7</string>
</dict>
</plist>
"#;

    fn plugin(json: &str) -> Plugin {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn kext_reads_plist_under_build_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let contents = tmp.path().join("build/Release/Foo.kext/Contents");
        std::fs::create_dir_all(&contents).unwrap();
        std::fs::write(contents.join("Info.plist"), INFO).unwrap();

        let foo = plugin(r#"{"Name": "Foo", "URL": "https://github.com/acme/Foo"}"#);
        let version = resolve_version(&foo, tmp.path(), "./build/Release").await.unwrap();
        assert_eq!(version, "1.6.7");
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Info.plist");
        std::fs::write(&path, INFO.replace("CFBundleVersion", "CFBundleShortVersionString")).unwrap();
        let err = read_bundle_version(&path).unwrap_err();
        assert!(matches!(err, Error::PlistVersion { .. }));
    }

    #[tokio::test]
    async fn other_type_without_command_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = plugin(r#"{"Name": "Tool", "URL": "https://github.com/acme/Tool", "Type": "Other"}"#);
        let err = resolve_version(&tool, tmp.path(), "build").await.unwrap_err();
        assert!(matches!(
            err,
            Error::MissingVersionSource { kind: PluginType::Other, .. }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn version_command_output_is_trimmed() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = plugin(
            r#"{"Name": "Tool", "URL": "https://github.com/acme/Tool", "Type": "Bootloader",
                "Version": ["sh", "-c", "printf '  0.9.1\n'"]}"#,
        );
        let version = resolve_version(&tool, tmp.path(), "build").await.unwrap();
        assert_eq!(version, "0.9.1");
    }
}
