//! External command execution with captured output.
//!
//! Every shell-out in the pipeline (git, xcodebuild, plugin tasks, version
//! commands) goes through [`run`], which blocks until the child exits and turns
//! a non-zero exit into a [`CommandError`] carrying the failing step, the
//! rendered command line, the exit code and both output streams.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Output;
use thiserror::Error;
use tokio::process::Command;

/// Failure of an external command.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The program could not be started at all
    #[error("{step}: failed to launch `{command}`: {source}")]
    Spawn {
        /// Pipeline step that ran the command
        step: String,
        /// Rendered command line
        command: String,
        /// Underlying launch error
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully
    #[error("{step}: `{command}` exited with {}", describe_exit(*exit_code))]
    Failed {
        /// Pipeline step that ran the command
        step: String,
        /// Rendered command line
        command: String,
        /// Exit code, `None` when killed by a signal
        exit_code: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },
}

impl CommandError {
    /// Name of the step that failed.
    pub fn step(&self) -> &str {
        match self {
            Self::Spawn { step, .. } | Self::Failed { step, .. } => step,
        }
    }

    /// Exit code of the failed command, if it ran and exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Spawn { .. } => None,
            Self::Failed { exit_code, .. } => *exit_code,
        }
    }

    /// Captured output for diagnostics, stdout first.
    pub fn captured_output(&self) -> Option<String> {
        match self {
            Self::Spawn { .. } => None,
            Self::Failed { stdout, stderr, .. } => {
                let mut out = String::new();
                if !stdout.trim().is_empty() {
                    out.push_str(stdout.trim_end());
                    out.push('\n');
                }
                if !stderr.trim().is_empty() {
                    out.push_str(stderr.trim_end());
                    out.push('\n');
                }
                (!out.is_empty()).then_some(out)
            }
        }
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Renders a command line for messages.
pub fn render<I, S>(program: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

/// Runs `program args...` in `cwd` and returns its captured output.
///
/// Stdout and stderr are captured rather than inherited. A non-zero exit is
/// returned as [`CommandError::Failed`].
pub async fn run<I, S>(step: &str, program: &str, args: I, cwd: &Path) -> Result<Output, CommandError>
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<OsStr>,
{
    let command = render(program, args.clone());
    log::debug!("[{step}] {command} (in {})", cwd.display());

    let output = Command::new(resolve_program(program, cwd))
        .args(args)
        .current_dir(cwd)
        .output()
        .await
        .map_err(|source| CommandError::Spawn {
            step: step.to_string(),
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(CommandError::Failed {
            step: step.to_string(),
            command,
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output)
}

/// Relative program paths with a directory part resolve against `cwd`;
/// bare names are looked up on `PATH`.
fn resolve_program(program: &str, cwd: &Path) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        cwd.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Runs an argv vector (`argv[0]` is the program).
pub async fn run_argv(step: &str, argv: &[String], cwd: &Path) -> Result<Output, CommandError> {
    match argv.split_first() {
        Some((program, args)) => run(step, program, args, cwd).await,
        None => Err(CommandError::Spawn {
            step: step.to_string(),
            command: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        }),
    }
}

/// Trimmed UTF-8 stdout of a finished command.
pub fn stdout_trimmed(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_joins_program_and_args() {
        assert_eq!(
            render("xcodebuild", ["-quiet", "-configuration", "Release"]),
            "xcodebuild -quiet -configuration Release"
        );
    }

    #[test]
    fn captured_output_skips_empty_streams() {
        let err = CommandError::Failed {
            step: "build".into(),
            command: "make".into(),
            exit_code: Some(2),
            stdout: "  \n".into(),
            stderr: "boom\n".into(),
        };
        assert_eq!(err.captured_output().as_deref(), Some("boom\n"));
        assert_eq!(err.exit_code(), Some(2));
        assert_eq!(err.step(), "build");
        assert_eq!(err.to_string(), "build: `make` exited with exit code 2");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_reports_exit_code_and_output() {
        let dir = std::env::temp_dir();
        let err = run("task", "sh", ["-c", "echo out; echo err >&2; exit 3"], &dir)
            .await
            .unwrap_err();
        match err {
            CommandError::Failed { exit_code, stdout, stderr, .. } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stdout.trim(), "out");
                assert_eq!(stderr.trim(), "err");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn relative_programs_resolve_against_cwd() {
        let cwd = Path::new("/work/Foo");
        assert_eq!(resolve_program("./gen.sh", cwd), PathBuf::from("/work/Foo/./gen.sh"));
        assert_eq!(resolve_program("git", cwd), PathBuf::from("git"));
        assert_eq!(resolve_program("/bin/sh", cwd), PathBuf::from("/bin/sh"));
    }

    #[tokio::test]
    async fn run_argv_rejects_empty_command() {
        let err = run_argv("version", &[], Path::new(".")).await.unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
