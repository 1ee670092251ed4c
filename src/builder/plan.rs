//! Per-build view of a plugin with debug substitutions applied.

use crate::plugin::{Plugin, Task};

/// Rewrites release-indicating substrings to their debug equivalents.
///
/// Replacements run in a fixed order so that `"Release 10.6"` collapses to
/// `"Debug"` before the plain `"Release"` rule sees it.
pub fn debugify(value: &str) -> String {
    value
        .replace("Release 10.6", "Debug")
        .replace("Release", "Debug")
        .replace("release", "debug")
        .replace("RELEASE", "DEBUG")
}

/// Build options, build dir and tasks as they will actually be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// Extra xcodebuild arguments
    pub build_opts: Vec<String>,
    /// Product directory relative to the checkout
    pub build_dir: String,
    /// Tasks run before the build
    pub pre_build: Vec<Task>,
    /// Tasks run after the build
    pub post_build: Vec<Task>,
}

impl BuildPlan {
    /// Derives the plan; substitutions apply only when `plugin.debug` is set.
    pub fn for_plugin(plugin: &Plugin) -> Self {
        let plan = Self {
            build_opts: plugin.build_opts.clone(),
            build_dir: plugin.build_dir.clone(),
            pre_build: plugin.pre_build.clone(),
            post_build: plugin.post_build.clone(),
        };
        if plugin.debug { plan.debugified() } else { plan }
    }

    fn debugified(self) -> Self {
        let tasks = |tasks: Vec<Task>| -> Vec<Task> {
            tasks
                .into_iter()
                .map(|task| Task {
                    args: task.args.iter().map(|a| debugify(a)).collect(),
                    ..task
                })
                .collect()
        };
        Self {
            build_opts: self.build_opts.iter().map(|o| debugify(o)).collect(),
            build_dir: debugify(&self.build_dir),
            pre_build: tasks(self.pre_build),
            post_build: tasks(self.post_build),
        }
    }
}
