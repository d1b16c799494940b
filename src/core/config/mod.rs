//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! composeweave has two configuration scopes:
//! - **Global**: User-level settings and services fragments
//! - **Project**: Per-project overrides and fragments
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. Environment overrides (`$COMPOSEWEAVE_ADMIN_SERVICES`)
//! 5. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$COMPOSEWEAVE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/composeweave/config.toml`
//! 3. `~/.composeweave/config.toml` (canonical)
//!
//! # Project Config Location
//!
//! `<project root>/.composeweave/config.toml`. A directory without one is
//! not a project.
//!
//! # Example
//!
//! ```no_run
//! use composeweave::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! let config = result.config;
//!
//! println!("Program: {}", config.program());
//! if let Some(name) = config.project_name() {
//!     println!("Project: {}", name);
//! }
//! ```

pub mod schema;

pub use schema::{FragmentDecl, GlobalConfig, ProjectConfig, RunMode};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use schema::{DEFAULT_COMPOSE_FILE, DEFAULT_PROGRAM, DEFAULT_SERVICES_PROJECT_NAME};

/// Environment variable naming the global config file.
pub const CONFIG_ENV: &str = "COMPOSEWEAVE_CONFIG";

/// Environment variable overriding `admin_services`.
pub const ADMIN_SERVICES_ENV: &str = "COMPOSEWEAVE_ADMIN_SERVICES";

/// Directory holding project-private files, relative to the project root.
pub const PROJECT_DIR: &str = ".composeweave";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Project configuration (if in a project)
    pub project: Option<ProjectConfig>,
    /// Project root directory (if in a project)
    project_root: Option<PathBuf>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the project config file (if loaded)
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_root` is provided, also loads that project's config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or
    /// fail validation. Missing config files are not an error.
    pub fn load(project_root: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();
        let global_path = Self::find_global(&mut warnings);
        let mut result = Self::load_from(global_path.as_deref(), project_root)?;
        warnings.append(&mut result.warnings);
        result.warnings = warnings;
        Ok(result)
    }

    /// Load configuration from an explicit global config path.
    ///
    /// A `global_path` that does not exist is treated like no global config.
    pub fn load_from(
        global_path: Option<&Path>,
        project_root: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let (global, global_path) = match global_path {
            Some(path) if path.exists() => (read_config::<GlobalConfig>(path)?, Some(path)),
            _ => (GlobalConfig::default(), None),
        };
        global.validate()?;

        let (project, project_path) = match project_root {
            Some(root) => {
                let path = Self::project_config_path(root);
                if path.exists() {
                    let project = read_config::<ProjectConfig>(&path)?;
                    project.validate()?;
                    (Some(project), Some(path))
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };

        let project_root = project.as_ref().and(project_root).map(Path::to_path_buf);

        Ok(ConfigLoadResult {
            config: Config {
                global,
                project,
                project_root,
                global_path: global_path.map(Path::to_path_buf),
                project_path,
            },
            warnings: Vec::new(),
        })
    }

    /// Locate the global config file.
    fn find_global(warnings: &mut Vec<ConfigWarning>) -> Option<PathBuf> {
        // 1. Check $COMPOSEWEAVE_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            warnings.push(ConfigWarning {
                message: format!("${} points to a missing file, ignoring it", CONFIG_ENV),
                path,
            });
        }

        // 2. Check $XDG_CONFIG_HOME/composeweave/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("composeweave/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.composeweave/config.toml
        Self::global_config_path().ok().filter(|p| p.exists())
    }

    /// Get the canonical path for global config.
    ///
    /// Returns `~/.composeweave/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(PROJECT_DIR).join("config.toml"))
    }

    /// Get the path for project config.
    ///
    /// Returns `.composeweave/config.toml` relative to the project root.
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(PROJECT_DIR).join("config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Orchestration program to run.
    ///
    /// Defaults to "docker-compose" if not configured.
    pub fn program(&self) -> &str {
        self.global.program.as_deref().unwrap_or(DEFAULT_PROGRAM)
    }

    /// Compose file for the shared services, if configured.
    pub fn services_file(&self) -> Option<&str> {
        self.global.services_file.as_deref()
    }

    /// Admin compose file for the shared services, if configured.
    pub fn admin_file(&self) -> Option<&str> {
        self.global.admin_file.as_deref()
    }

    /// Whether the admin compose file should be included.
    ///
    /// `$COMPOSEWEAVE_ADMIN_SERVICES` overrides the config file. Defaults to
    /// `true`.
    pub fn admin_services(&self) -> bool {
        std::env::var(ADMIN_SERVICES_ENV)
            .ok()
            .map(|v| parse_bool(&v))
            .or(self.global.admin_services)
            .unwrap_or(true)
    }

    /// Project name for the shared services stack.
    pub fn services_project_name(&self) -> &str {
        self.global
            .services_project_name
            .as_deref()
            .unwrap_or(DEFAULT_SERVICES_PROJECT_NAME)
    }

    /// Root directory of the loaded project.
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Project name.
    ///
    /// Defaults to the project directory name. `None` outside a project.
    pub fn project_name(&self) -> Option<String> {
        let project = self.project.as_ref()?;
        if let Some(name) = &project.name {
            return Some(name.clone());
        }
        self.project_root
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// Project run mode.
    ///
    /// Defaults to debug if not configured.
    pub fn runmode(&self) -> RunMode {
        self.project
            .as_ref()
            .and_then(|p| p.runmode)
            .unwrap_or_default()
    }

    /// Absolute path of the project compose file. `None` outside a project.
    pub fn compose_file(&self) -> Option<PathBuf> {
        let root = self.project_root.as_deref()?;
        let relative = self
            .project
            .as_ref()
            .and_then(|p| p.compose_file.as_deref())
            .unwrap_or(DEFAULT_COMPOSE_FILE);
        Some(root.join(relative))
    }

    /// Fragments declared in configuration.
    ///
    /// Global declarations come first, then the project's own. A project
    /// declaration reusing a global name moves that entry when registered.
    pub fn declared_fragments(&self) -> impl Iterator<Item = &FragmentDecl> {
        self.global
            .fragments
            .iter()
            .chain(self.project.iter().flat_map(|p| p.fragments.iter()))
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}

/// Read and parse a config file.
fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Interpret an environment flag.
///
/// `1`, `true`, `yes` and `on` (any case) are true; everything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_project(root: &Path, contents: &str) {
        let path = Config::project_config_path(root);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn load_empty_defaults() {
        let result = Config::load_from(None, None).unwrap();
        let config = result.config;

        assert_eq!(config.program(), "docker-compose");
        assert_eq!(config.services_project_name(), "composeweave_services");
        assert!(config.services_file().is_none());
        assert!(config.project_name().is_none());
        assert!(config.compose_file().is_none());
        assert_eq!(config.runmode(), RunMode::Debug);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn load_global_from_path() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
            program = "podman-compose"
            services_file = "/srv/services.yml"
            "#,
        )
        .unwrap();

        let config = Config::load_from(Some(&config_path), None).unwrap().config;

        assert_eq!(config.program(), "podman-compose");
        assert_eq!(config.services_file(), Some("/srv/services.yml"));
        assert_eq!(config.global_config_loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    fn missing_global_path_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(Some(&temp.path().join("nope.toml")), None)
            .unwrap()
            .config;
        assert!(config.global_config_loaded_from().is_none());
        assert_eq!(config.program(), "docker-compose");
    }

    #[test]
    fn load_project_config() {
        let temp = TempDir::new().unwrap();
        write_project(
            temp.path(),
            r#"
            name = "shop"
            runmode = "production"
            compose_file = "deploy/compose.yml"
            "#,
        );

        let config = Config::load_from(None, Some(temp.path())).unwrap().config;

        assert_eq!(config.project_name().as_deref(), Some("shop"));
        assert_eq!(config.runmode(), RunMode::Production);
        assert_eq!(
            config.compose_file(),
            Some(temp.path().join("deploy/compose.yml"))
        );
        assert_eq!(config.project_root(), Some(temp.path()));
    }

    #[test]
    fn project_name_defaults_to_directory_name() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("my-site");
        write_project(&root, "");

        let config = Config::load_from(None, Some(&root)).unwrap().config;
        assert_eq!(config.project_name().as_deref(), Some("my-site"));
        assert_eq!(
            config.compose_file(),
            Some(root.join(".composeweave/docker-compose.yml"))
        );
    }

    #[test]
    fn directory_without_config_is_not_a_project() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(None, Some(temp.path())).unwrap().config;
        assert!(config.project.is_none());
        assert!(config.project_root().is_none());
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        write_project(
            temp.path(),
            r#"
            name = "shop"
            unknown_field = true
            "#,
        );

        let result = Config::load_from(None, Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn invalid_fragment_location_rejected() {
        let temp = TempDir::new().unwrap();
        write_project(
            temp.path(),
            r#"
            [[fragments]]
            name = "x"
            options = []
            location = "somewhere"
            "#,
        );

        let result = Config::load_from(None, Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn declared_fragments_list_global_then_project() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            r#"
            [[fragments]]
            name = "svc"
            options = ["-f", "svc.yml"]
            variant = "services"

            [[fragments]]
            name = "user"
            options = ["-f", "user.yml"]
            "#,
        )
        .unwrap();
        let root = temp.path().join("proj");
        write_project(
            &root,
            r#"
            [[fragments]]
            name = "proj"
            options = ["-f", "proj.yml"]
            location = "_begin"
            "#,
        );

        let config = Config::load_from(Some(&global), Some(&root)).unwrap().config;

        let names: Vec<_> = config.declared_fragments().map(|f| &f.name).collect();
        assert_eq!(names, vec!["svc", "user", "proj"]);
        assert_eq!(
            config.declared_fragments().last().map(|f| f.location.as_str()),
            Some("_begin")
        );
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for v in ["1", "true", "TRUE", "yes", "On", " true "] {
            assert!(parse_bool(v), "{v}");
        }
        for v in ["0", "false", "no", "off", "", "maybe"] {
            assert!(!parse_bool(v), "{v}");
        }
    }
}
