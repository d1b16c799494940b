//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads configuration for the working directory
//! 2. Collects contributions into a registry and resolves it
//! 3. Formats and displays output, or runs the assembled command

mod completion;
mod config_cmd;
mod order;
mod project;
mod services;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{path as config_path, show as config_show};
pub use order::order;
pub use project::project;
pub use services::services;

use anyhow::{Context as _, Result};

use super::args::{Command, ConfigAction};
use super::Context;
use crate::compose::ComposeInvocation;
use crate::core::config::Config;
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Services {
            variant,
            dry_run,
            args,
        } => services(ctx, &variant, dry_run, &args),
        Command::Project { dry_run, args } => project(ctx, dry_run, &args),
        Command::Order {
            project,
            variant,
            json,
        } => order(ctx, project, variant.as_deref(), json),
        Command::Config { action } => match action {
            ConfigAction::Show => config_show(ctx),
            ConfigAction::Path => config_path(ctx),
        },
        Command::Completion { shell } => completion(shell),
    }
}

/// Load configuration for the working directory, reporting warnings.
fn load_config(ctx: &Context) -> Result<Config> {
    let result = Config::load(Some(&ctx.cwd)).context("Failed to load configuration")?;
    for warning in &result.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            ctx.verbosity,
        );
    }
    Ok(result.config)
}

/// Run an assembled invocation, or print it when `dry_run` is set.
fn execute(ctx: &Context, invocation: &ComposeInvocation, dry_run: bool) -> Result<()> {
    if dry_run {
        output::print("Would have run:", ctx.verbosity);
        println!("{}", invocation);
        return Ok(());
    }

    output::print(format!("Running {}", invocation), ctx.verbosity);
    invocation.run()
}
