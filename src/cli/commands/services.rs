//! services command - Run docker-compose for the shared services

use anyhow::{Context as _, Result};

use super::{execute, load_config};
use crate::cli::Context;
use crate::compose::{collect_services, ComposeInvocation};
use crate::plugins::contributors;

/// Assemble the services command line for `variant` and run it.
pub fn services(ctx: &Context, variant: &str, dry_run: bool, args: &[String]) -> Result<()> {
    let config = load_config(ctx)?;
    let contributors = contributors(&config);

    let registry = collect_services(&contributors, variant)
        .with_context(|| format!("Failed to collect fragments for variant '{}'", variant))?;
    let invocation = ComposeInvocation::new(config.program(), &registry, args)
        .context("Failed to order compose fragments")?;

    execute(ctx, &invocation, dry_run)
}
