//! plugins
//!
//! Contributors of compose fragments.
//!
//! # Architecture
//!
//! Every contributor implements [`Contributor`], which has two hooks:
//! - [`Contributor::compose_options`] for the shared services stack
//! - [`Contributor::project_compose_options`] for a project
//!
//! Each hook returns at most one [`Contribution`]: a registry key, the
//! fragment, and a location literal. Contributors never see each other; the
//! [`crate::core::registry::Registry`] reconciles their locations.
//!
//! # Built-in Contributors
//!
//! | Key             | Hook     | Location | Fragment |
//! |-----------------|----------|----------|----------|
//! | `base`          | services | `_begin` | services project name and file, plus admin file |
//! | `local-project` | project  | `_begin` | project name and compose file |
//! | `local-user`    | project  | `_end`   | `docker-compose.yml` in the project root |
//! | `local-runmode` | project  | `_end`   | `docker-compose-<runmode>.yml` in the project root |
//!
//! Fragments declared in configuration are contributed by [`Declared`].

mod builtins;

pub use builtins::{BaseServices, Declared, LocalProject, LocalRunmode, LocalUser};

use std::path::{Path, PathBuf};

use crate::core::config::{Config, RunMode};
use crate::core::types::Fragment;

/// Services variant used when none is requested.
pub const DEFAULT_VARIANT: &str = "services";

/// One contributor's answer to a hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    /// Registry key
    pub name: String,
    /// Arguments to add
    pub options: Fragment,
    /// Location literal
    pub location: String,
}

impl Contribution {
    pub fn new(
        name: impl Into<String>,
        options: Fragment,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            options,
            location: location.into(),
        }
    }
}

/// A project as seen by contributors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project root directory
    pub root: PathBuf,
    /// Project name
    pub name: String,
    /// Run mode
    pub runmode: RunMode,
    /// Absolute path of the project compose file
    pub compose_file: PathBuf,
}

impl Project {
    /// Build the project view from loaded configuration.
    ///
    /// Returns `None` if the configuration has no project.
    pub fn from_config(config: &Config) -> Option<Self> {
        Some(Self {
            root: config.project_root()?.to_path_buf(),
            name: config.project_name()?,
            runmode: config.runmode(),
            compose_file: config.compose_file()?,
        })
    }

    /// The user's own compose file, if present.
    pub fn local_compose(&self) -> Option<PathBuf> {
        existing(self.root.join("docker-compose.yml"))
    }

    /// The compose file for the current run mode, if present.
    pub fn runmode_compose(&self) -> Option<PathBuf> {
        existing(self.root.join(format!("docker-compose-{}.yml", self.runmode)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// A source of compose fragments.
///
/// Both hooks default to contributing nothing.
pub trait Contributor {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Contribution for the shared services stack.
    fn compose_options(&self, _variant: &str) -> Option<Contribution> {
        None
    }

    /// Contribution for a project.
    fn project_compose_options(&self, _project: &Project) -> Option<Contribution> {
        None
    }
}

/// All contributors for the given configuration.
///
/// Built-ins come first, then one [`Declared`] per configured fragment.
pub fn contributors(config: &Config) -> Vec<Box<dyn Contributor>> {
    let mut all: Vec<Box<dyn Contributor>> = vec![
        Box::new(BaseServices::from_config(config)),
        Box::new(LocalProject),
        Box::new(LocalUser),
        Box::new(LocalRunmode),
    ];

    all.extend(
        config
            .declared_fragments()
            .map(|decl| Box::new(Declared::new(decl.clone())) as Box<dyn Contributor>),
    );

    all
}
