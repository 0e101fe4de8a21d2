//! # Generators
//!
//! Generators add projects, files and targets to a workspace. Every one of
//! them follows the same order of work:
//!
//! 1. check every precondition (names, existing targets, existing files);
//! 2. merge the new targets through the chain merger, in memory;
//! 3. write the scaffolded files, then `project.json`.
//!
//! A failed check or merge leaves the workspace untouched.

pub mod chain;
pub mod docker;
pub mod dotnet_project;
pub mod helm;
pub mod test_project;

use crate::{
    core::{chain_merger::MergeError, names::NameError, paths, workspace::WorkspaceError},
    models::ProjectConfiguration,
    scaffold::{ScaffoldError, csproj::CsprojError, solution::SolutionError},
};
use colored::Colorize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),
    #[error(transparent)]
    Name(#[from] NameError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error("Could not update the solution file: {0}")]
    Solution(#[from] SolutionError),
    #[error("Could not update the project file: {0}")]
    Csproj(#[from] CsprojError),
    #[error("Project '{project}' already has a target named '{target}'.")]
    TargetExists { project: String, target: String },
    #[error("Project '{project}' has no .csproj file in '{root}'.")]
    MissingCsproj { project: String, root: PathBuf },
    #[error("{0}")]
    InvalidOptions(String),
}

impl From<std::io::Error> for GeneratorError {
    fn from(e: std::io::Error) -> Self {
        GeneratorError::Workspace(WorkspaceError::Io(e))
    }
}

/// What a generator did, for the CLI to report.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GeneratorReport {
    pub created: Vec<PathBuf>,
    pub updated: Vec<PathBuf>,
    pub targets: Vec<String>,
}

impl GeneratorReport {
    pub fn absorb(&mut self, other: GeneratorReport) {
        self.created.extend(other.created);
        self.updated.extend(other.updated);
        self.targets.extend(other.targets);
    }

    /// Prints the report with paths relative to `root`.
    pub fn print(&self, root: &Path) {
        let show = |path: &PathBuf| paths::to_slash(path.strip_prefix(root).unwrap_or(path));
        for path in &self.created {
            println!("  {} {}", "CREATE".green(), show(path));
        }
        for path in &self.updated {
            println!("  {} {}", "UPDATE".yellow(), show(path));
        }
        for target in &self.targets {
            println!("  {} {}", "TARGET".cyan(), target);
        }
    }
}

/// Fails if `project` already defines any of `names`.
pub fn ensure_targets_free(project: &ProjectConfiguration, names: &[&str]) -> Result<(), GeneratorError> {
    match names.iter().find(|name| project.targets.contains_key(**name)) {
        Some(name) => Err(GeneratorError::TargetExists {
            project: project.name.clone(),
            target: name.to_string(),
        }),
        None => Ok(()),
    }
}
