//! config command - Show configuration values and locations

use anyhow::{Context as _, Result};

use super::load_config;
use crate::cli::Context;
use crate::core::config::Config;
use crate::ui::output;

/// Show the merged configuration values.
pub fn show(ctx: &Context) -> Result<()> {
    let config = load_config(ctx)?;

    println!("program = {}", config.program());
    println!("services_project_name = {}", config.services_project_name());
    println!(
        "services_file = {}",
        config.services_file().unwrap_or("(not set)")
    );
    println!("admin_file = {}", config.admin_file().unwrap_or("(not set)"));
    println!("admin_services = {}", config.admin_services());

    match config.project_name() {
        Some(name) => {
            println!("project.name = {}", name);
            println!("project.runmode = {}", config.runmode());
            if let Some(file) = config.compose_file() {
                println!("project.compose_file = {}", file.display());
            }
        }
        None => println!("project = (none)"),
    }

    let fragments: Vec<String> = config
        .declared_fragments()
        .map(|f| match &f.variant {
            Some(variant) => format!("{} @ {} [{}]", f.name, f.location, variant),
            None => format!("{} @ {}", f.name, f.location),
        })
        .collect();
    if !fragments.is_empty() && !ctx.quiet() {
        println!("fragments:");
        println!("{}", output::format_list(&fragments, "  - "));
    }

    Ok(())
}

/// Show which config files are used.
pub fn path(ctx: &Context) -> Result<()> {
    let config = load_config(ctx)?;

    let global = match config.global_config_loaded_from() {
        Some(path) => path.display().to_string(),
        None => format!(
            "{} (not found)",
            Config::global_config_path()
                .context("Failed to locate global config")?
                .display()
        ),
    };
    let project = match config.project_config_loaded_from() {
        Some(path) => path.display().to_string(),
        None => format!(
            "{} (not found)",
            Config::project_config_path(&ctx.cwd).display()
        ),
    };

    println!("global = {}", global);
    println!("project = {}", project);
    Ok(())
}
