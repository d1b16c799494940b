//! compose
//!
//! Assembling and running orchestration commands.
//!
//! # Lifecycle
//!
//! 1. Ask every [`Contributor`] for its fragment
//! 2. Register the fragments in a [`Registry`]
//! 3. Resolve the registry and flatten the fragments into one argument list
//! 4. Run the program with `fragments ++ user arguments`, or print it
//!
//! Contributions are collected fresh for every invocation; nothing about
//! the order is remembered between runs.

use std::fmt;
use std::process::Command;

use anyhow::{bail, Context as _, Result};
use tracing::debug;

use crate::core::registry::{Registry, RegistryError};
use crate::core::types::Fragment;
use crate::plugins::{Contribution, Contributor, Project};

/// Register the services contributions for `variant`.
///
/// # Errors
///
/// Fails if two contributors register the same key with the same fragment.
pub fn collect_services(
    contributors: &[Box<dyn Contributor>],
    variant: &str,
) -> Result<Registry<Fragment>, RegistryError> {
    collect(contributors.iter().filter_map(|c| {
        let contribution = c.compose_options(variant);
        debug!(
            contributor = c.name(),
            variant,
            found = contribution.is_some(),
            "services hook"
        );
        contribution
    }))
}

/// Register the project contributions.
///
/// # Errors
///
/// Fails if two contributors register the same key with the same fragment.
pub fn collect_project(
    contributors: &[Box<dyn Contributor>],
    project: &Project,
) -> Result<Registry<Fragment>, RegistryError> {
    collect(contributors.iter().filter_map(|c| {
        let contribution = c.project_compose_options(project);
        debug!(
            contributor = c.name(),
            project = project.name.as_str(),
            found = contribution.is_some(),
            "project hook"
        );
        contribution
    }))
}

fn collect(
    contributions: impl Iterator<Item = Contribution>,
) -> Result<Registry<Fragment>, RegistryError> {
    let mut registry = Registry::new();
    for Contribution {
        name,
        options,
        location,
    } in contributions
    {
        registry.insert(name, options, location)?;
    }
    Ok(registry)
}

/// Resolve the registry and flatten its fragments into one argument list.
///
/// # Errors
///
/// Propagates resolution errors.
pub fn assemble(registry: &Registry<Fragment>) -> Result<Vec<String>, RegistryError> {
    let resolved = registry.resolve()?;
    Ok(resolved
        .iter()
        .flat_map(|fragment| fragment.args().iter().cloned())
        .collect())
}

/// A fully assembled command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl ComposeInvocation {
    /// Build the invocation: resolved fragments first, then `extra` arguments.
    pub fn new(
        program: impl Into<String>,
        registry: &Registry<Fragment>,
        extra: &[String],
    ) -> Result<Self, RegistryError> {
        let mut args = assemble(registry)?;
        args.extend(extra.iter().cloned());
        Ok(Self {
            program: program.into(),
            args,
        })
    }

    /// Run the program, waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Fails if the program cannot be started or exits unsuccessfully.
    pub fn run(&self) -> Result<()> {
        // "docker compose" is a program plus a subcommand.
        let mut words = self.program.split_whitespace();
        let Some(binary) = words.next() else {
            bail!("No program configured");
        };

        let status = Command::new(binary)
            .args(words)
            .args(&self.args)
            .status()
            .with_context(|| format!("Failed to start '{}'", self.program))?;

        if !status.success() {
            match status.code() {
                Some(code) => bail!("'{}' exited with status {}", self.program, code),
                None => bail!("'{}' was terminated by a signal", self.program),
            }
        }
        Ok(())
    }
}

impl fmt::Display for ComposeInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
