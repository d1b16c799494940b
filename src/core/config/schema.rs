//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$COMPOSEWEAVE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/composeweave/config.toml`
//! 3. `~/.composeweave/config.toml` (canonical write location)
//!
//! # Project Config
//!
//! Located at `<project root>/.composeweave/config.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing. Fragment locations are only
//! checked for shape here; whether they can be satisfied is decided when the
//! registry resolves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{Location, END};

/// Default orchestration program.
pub const DEFAULT_PROGRAM: &str = "docker-compose";

/// Default project name for the shared services stack.
pub const DEFAULT_SERVICES_PROJECT_NAME: &str = "composeweave_services";

/// Default project compose file, relative to the project root.
pub const DEFAULT_COMPOSE_FILE: &str = ".composeweave/docker-compose.yml";

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// program = "docker-compose"
/// services_file = "/opt/stack/services.yml"
/// admin_file = "/opt/stack/admin.yml"
/// admin_services = true
///
/// [[fragments]]
/// name = "monitoring"
/// options = ["-f", "/opt/stack/monitoring.yml"]
/// location = ">base"
/// variant = "services"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Orchestration program to run (default: "docker-compose")
    pub program: Option<String>,

    /// Compose file describing the shared services
    pub services_file: Option<String>,

    /// Compose file with admin tooling for the shared services
    pub admin_file: Option<String>,

    /// Whether to include the admin compose file
    pub admin_services: Option<bool>,

    /// Project name used for the shared services stack
    pub services_project_name: Option<String>,

    /// User-declared fragments
    pub fragments: Vec<FragmentDecl>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(program) = &self.program {
            if program.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "program cannot be empty".to_string(),
                ));
            }
        }

        if let Some(name) = &self.services_project_name {
            if name.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "services_project_name cannot be empty".to_string(),
                ));
            }
        }

        validate_fragments(&self.fragments)
    }
}

/// Project configuration.
///
/// # Example
///
/// ```toml
/// name = "shop"
/// runmode = "production"
/// compose_file = "deploy/docker-compose.yml"
///
/// [[fragments]]
/// name = "debug-tools"
/// options = ["-f", "tools.yml"]
/// location = "<local-user"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project name (default: name of the project directory)
    pub name: Option<String>,

    /// Run mode (default: debug)
    pub runmode: Option<RunMode>,

    /// Project compose file, relative to the project root
    pub compose_file: Option<String>,

    /// Project-declared fragments
    pub fragments: Vec<FragmentDecl>,
}

impl ProjectConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.name {
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid project name '{}'",
                    name
                )));
            }
        }

        if let Some(file) = &self.compose_file {
            if file.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "compose_file cannot be empty".to_string(),
                ));
            }
        }

        validate_fragments(&self.fragments)
    }
}

/// A fragment declared in configuration.
///
/// Declarations without a `variant` belong to project invocations; those
/// with one are only used for that services variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FragmentDecl {
    /// Registry key
    pub name: String,

    /// Arguments contributed
    pub options: Vec<String>,

    /// Location literal (default: "_end")
    #[serde(default = "default_location")]
    pub location: String,

    /// Services variant this fragment applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

fn default_location() -> String {
    END.to_string()
}

fn validate_fragments(fragments: &[FragmentDecl]) -> Result<(), ConfigError> {
    for fragment in fragments {
        if fragment.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "fragment name cannot be empty".to_string(),
            ));
        }

        Location::parse(&fragment.location).map_err(|e| {
            ConfigError::InvalidValue(format!("fragment '{}': {}", fragment.name, e))
        })?;
    }
    Ok(())
}

/// How a project is run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Debug,
    Production,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Debug => "debug",
            RunMode::Production => "production",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(RunMode::Debug),
            "production" => Ok(RunMode::Production),
            other => Err(ConfigError::InvalidValue(format!(
                "invalid runmode '{}', must be one of: debug, production",
                other
            ))),
        }
    }
}
