//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--log-level <filter>`: Tracing filter (default: `$COMPOSEWEAVE_LOGLEVEL` or `warn`)
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::plugins::DEFAULT_VARIANT;

/// composeweave - Order docker-compose fragments contributed by independent plugins
#[derive(Parser, Debug)]
#[command(name = "cw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if cw was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Tracing filter, e.g. "info" or "composeweave=trace"
    #[arg(long, global = true, env = "COMPOSEWEAVE_LOGLEVEL", default_value = "warn")]
    pub log_level: String,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The tracing filter to install.
    ///
    /// `--debug` overrides `--log-level`.
    pub fn log_filter(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run docker-compose for the shared services
    #[command(
        name = "services",
        long_about = "Run docker-compose for the shared services stack.\n\n\
            Every contributor is asked for its fragment for the requested variant. \
            The fragments are ordered by their declared locations and placed before \
            the arguments you pass after `--`.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Start the shared services
    cw services -- up -d

    # See the command line without running it
    cw services --dry-run -- ps

    # Use another variant declared in your config
    cw services --variant monitoring -- up"
    )]
    Services {
        /// Services variant to collect fragments for
        #[arg(long, default_value = DEFAULT_VARIANT)]
        variant: String,

        /// Print the command instead of running it
        #[arg(long)]
        dry_run: bool,

        /// Arguments passed through to docker-compose
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Run docker-compose for the current project
    #[command(
        name = "project",
        long_about = "Run docker-compose for the project in the current directory.\n\n\
            The directory must contain .composeweave/config.toml. Project, user and \
            run-mode compose files are contributed automatically; more can be declared \
            as fragments in the config.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Start the project
    cw project -- up -d

    # Show what would run
    cw project --dry-run -- logs -f"
    )]
    Project {
        /// Print the command instead of running it
        #[arg(long)]
        dry_run: bool,

        /// Arguments passed through to docker-compose
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Show the resolved fragment order
    #[command(
        name = "order",
        long_about = "Show how contributed fragments are ordered.\n\n\
            Prints one line per contributor, in final order, with the arguments it \
            adds. Fails if the declared locations contradict each other.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Order for the shared services
    cw order

    # Order for the current project
    cw order --project

    # Machine-readable
    cw order --project --json"
    )]
    Order {
        /// Show the project order instead of the services order
        #[arg(long, conflicts_with = "variant")]
        project: bool,

        /// Services variant to show
        #[arg(long)]
        variant: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect configuration
    #[command(
        name = "config",
        long_about = "Inspect composeweave configuration.\n\n\
            Global configuration lives in ~/.composeweave/config.toml (or \
            $COMPOSEWEAVE_CONFIG); project configuration in .composeweave/config.toml.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Show the merged configuration
    cw config show

    # Show which files were loaded
    cw config path"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for cw commands.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    cw completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    cw completion zsh >> ~/.zshrc

    # Fish
    cw completion fish > ~/.config/fish/completions/cw.fish

    # PowerShell
    cw completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the merged configuration values
    Show,
    /// Show the config file locations
    Path,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn services_passes_trailing_args() {
        let cli = Cli::try_parse_from(["cw", "services", "--dry-run", "--", "up", "-d"]).unwrap();
        match cli.command {
            Command::Services {
                variant,
                dry_run,
                args,
            } => {
                assert_eq!(variant, "services");
                assert!(dry_run);
                assert_eq!(args, vec!["up", "-d"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn debug_overrides_log_level() {
        let cli = Cli::try_parse_from(["cw", "--debug", "--log-level", "error", "order"]).unwrap();
        assert_eq!(cli.log_filter(), "debug");

        let cli = Cli::try_parse_from(["cw", "--log-level", "error", "order"]).unwrap();
        assert_eq!(cli.log_filter(), "error");
    }

    #[test]
    fn order_project_conflicts_with_variant() {
        assert!(Cli::try_parse_from(["cw", "order", "--project", "--variant", "x"]).is_err());
    }
}
