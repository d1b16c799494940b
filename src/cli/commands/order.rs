//! order command - Show the resolved fragment order

use anyhow::{Context as _, Result};

use super::load_config;
use super::project::require_project;
use crate::cli::Context;
use crate::compose::{collect_project, collect_services};
use crate::plugins::{contributors, DEFAULT_VARIANT};
use crate::ui::output::{self, OrderLine};

/// Print the resolved order for the services variant or the project.
pub fn order(ctx: &Context, project: bool, variant: Option<&str>, json: bool) -> Result<()> {
    let config = load_config(ctx)?;
    let contributors = contributors(&config);

    let registry = if project {
        let project = require_project(ctx, &config)?;
        collect_project(&contributors, &project)
    } else {
        collect_services(&contributors, variant.unwrap_or(DEFAULT_VARIANT))
    }
    .context("Failed to collect fragments")?;

    let resolved = registry
        .resolve()
        .context("Failed to order compose fragments")?;
    let lines: Vec<OrderLine<'_>> = resolved
        .iter_entries()
        .map(|(key, options)| OrderLine { key, options })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else if lines.is_empty() {
        output::print("No fragments contributed.", ctx.verbosity);
    } else {
        println!("{}", output::format_order(&lines));
    }

    Ok(())
}
