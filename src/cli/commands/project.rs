//! project command - Run docker-compose for the current project

use anyhow::{anyhow, Context as _, Result};

use super::{execute, load_config};
use crate::cli::Context;
use crate::compose::{collect_project, ComposeInvocation};
use crate::core::config::Config;
use crate::plugins::{contributors, Project};

/// Assemble the project command line and run it.
pub fn project(ctx: &Context, dry_run: bool, args: &[String]) -> Result<()> {
    let config = load_config(ctx)?;
    let project = require_project(ctx, &config)?;
    let contributors = contributors(&config);

    let registry = collect_project(&contributors, &project)
        .with_context(|| format!("Failed to collect fragments for project '{}'", project.name))?;
    let invocation = ComposeInvocation::new(config.program(), &registry, args)
        .context("Failed to order compose fragments")?;

    execute(ctx, &invocation, dry_run)
}

/// The project for the working directory, or an error explaining how to
/// create one.
pub(super) fn require_project(ctx: &Context, config: &Config) -> Result<Project> {
    Project::from_config(config).ok_or_else(|| {
        anyhow!(
            "Not a composeweave project: '{}' does not exist",
            Config::project_config_path(&ctx.cwd).display()
        )
    })
}
