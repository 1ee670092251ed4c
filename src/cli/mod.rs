//! Command line interface for kext_builder.

mod args;
pub mod commands;

pub use args::Args;

use crate::error::{CliError, Result};
use crate::plugin;
use crate::publisher::Publisher;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    execute(Args::parse_args()).await
}

/// Runs an already-parsed invocation and returns the process exit code.
pub async fn execute(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let token = args.publish_token()?;
    let settings = args.to_settings()?;

    let plugins = plugin::load_plugins(&args.plugins).await?;
    let plugins = plugin::select(plugins, &args.only)?;
    log::info!(
        "Processing {} plugin(s) under {}",
        plugins.len(),
        settings.root_dir().display()
    );

    let publisher = token
        .map(|token| Publisher::new(&settings, token))
        .transpose()?;

    let summary =
        commands::build_all(&settings, &plugins, args.commit.as_deref(), publisher.as_ref()).await?;
    Ok(summary.exit_code())
}
