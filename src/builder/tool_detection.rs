//! External tool availability checking.
//!
//! Results are cached for the process lifetime so repeated builds do not
//! search `PATH` again.

use std::sync::LazyLock;

/// Check if `git` is available for cloning plugin sources.
pub static HAS_GIT: LazyLock<bool> = LazyLock::new(|| check_tool("git", "--version"));

/// Check if `xcodebuild` is available for default builds.
pub static HAS_XCODEBUILD: LazyLock<bool> = LazyLock::new(|| check_tool("xcodebuild", "-version"));

fn check_tool(tool: &str, version_flag: &str) -> bool {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());

            match std::process::Command::new(&path).arg(version_flag).output() {
                Ok(output) if output.status.success() => {
                    let version = String::from_utf8_lossy(&output.stdout);
                    let first_line = version.lines().next().unwrap_or_default();
                    log::debug!("✓ {} available: {}", tool, first_line.trim());
                    true
                }
                Ok(output) => {
                    log::warn!(
                        "{} found at {} but {} check failed (exit code: {:?}). Stderr: {}",
                        tool,
                        path.display(),
                        version_flag,
                        output.status.code(),
                        String::from_utf8_lossy(&output.stderr)
                    );
                    false
                }
                Err(e) => {
                    log::warn!(
                        "{} found at {} but failed to execute: {}. Check file permissions.",
                        tool,
                        path.display(),
                        e
                    );
                    false
                }
            }
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            false
        }
    }
}

/// Logs which build prerequisites are missing.
pub fn report_missing_tools() {
    if !*HAS_GIT {
        log::warn!("git not found; every clone will fail");
    }
    if !*HAS_XCODEBUILD {
        log::warn!("xcodebuild not found; only plugins with a custom Command can build");
    }
}
