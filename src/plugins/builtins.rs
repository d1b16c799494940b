//! plugins::builtins
//!
//! Contributors shipped with composeweave.

use tracing::warn;

use super::{Contribution, Contributor, Project, DEFAULT_VARIANT};
use crate::core::config::{Config, FragmentDecl};
use crate::core::types::{Fragment, BEGIN, END};

/// The shared services stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseServices {
    project_name: String,
    services_file: Option<String>,
    admin_file: Option<String>,
}

impl BaseServices {
    pub fn from_config(config: &Config) -> Self {
        Self {
            project_name: config.services_project_name().to_string(),
            services_file: config.services_file().map(str::to_string),
            admin_file: config
                .admin_file()
                .filter(|_| config.admin_services())
                .map(str::to_string),
        }
    }
}

impl Contributor for BaseServices {
    fn name(&self) -> &str {
        "base"
    }

    fn compose_options(&self, variant: &str) -> Option<Contribution> {
        if variant != DEFAULT_VARIANT {
            return None;
        }
        let services_file = self.services_file.as_ref()?;

        let mut options =
            Fragment::new(["--project-name", self.project_name.as_str()]).with_file(services_file);
        if let Some(admin) = &self.admin_file {
            options = options.with_file(admin);
        }
        Some(Contribution::new(self.name(), options, BEGIN))
    }
}

/// The project's own compose file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProject;

impl Contributor for LocalProject {
    fn name(&self) -> &str {
        "local-project"
    }

    fn project_compose_options(&self, project: &Project) -> Option<Contribution> {
        if !project.compose_file.is_file() {
            warn!(
                path = %project.compose_file.display(),
                "project compose file not found, skipping"
            );
            return None;
        }

        let options = Fragment::new(["--project-name", project.name.as_str()])
            .with_file(project.compose_file.display());
        Some(Contribution::new(self.name(), options, BEGIN))
    }
}

/// `docker-compose.yml` in the project root.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalUser;

impl Contributor for LocalUser {
    fn name(&self) -> &str {
        "local-user"
    }

    fn project_compose_options(&self, project: &Project) -> Option<Contribution> {
        let path = project.local_compose()?;
        let options = Fragment::default().with_file(path.display());
        Some(Contribution::new(self.name(), options, END))
    }
}

/// `docker-compose-<runmode>.yml` in the project root.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRunmode;

impl Contributor for LocalRunmode {
    fn name(&self) -> &str {
        "local-runmode"
    }

    fn project_compose_options(&self, project: &Project) -> Option<Contribution> {
        let path = project.runmode_compose()?;
        let options = Fragment::default().with_file(path.display());
        Some(Contribution::new(self.name(), options, END))
    }
}

/// A fragment declared in configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declared {
    decl: FragmentDecl,
}

impl Declared {
    pub fn new(decl: FragmentDecl) -> Self {
        Self { decl }
    }

    fn contribution(&self) -> Contribution {
        Contribution::new(
            self.decl.name.clone(),
            Fragment::new(self.decl.options.iter().cloned()),
            self.decl.location.clone(),
        )
    }
}

impl Contributor for Declared {
    fn name(&self) -> &str {
        &self.decl.name
    }

    fn compose_options(&self, variant: &str) -> Option<Contribution> {
        (self.decl.variant.as_deref() == Some(variant)).then(|| self.contribution())
    }

    fn project_compose_options(&self, _project: &Project) -> Option<Contribution> {
        self.decl.variant.is_none().then(|| self.contribution())
    }
}
