//! # Executors
//!
//! The leaf actions a non-chain target can run. Each executor reads its own
//! typed options out of the target's loose `options` record and turns them
//! into one or more command lines for the [`CommandRunner`].
//!
//! The chain executor is not in this registry: chains are expanded by
//! [`crate::core::chain_runner`], which calls back into here for each leaf.

pub mod common;
pub mod docker;
pub mod dotnet;
pub mod helm;

use crate::{
    constants::*,
    core::workspace::Workspace,
    models::{DefaultsConfig, ProjectConfiguration},
    scaffold::csproj::CsprojError,
    system::executor::{CommandLine, CommandRunner, ExecutionError},
};
use colored::Colorize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Invalid options for '{executor}': {source}")]
    InvalidOptions {
        executor: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{executor}' requires the '{option}' option.")]
    MissingOption {
        executor: &'static str,
        option: &'static str,
    },
    #[error("No .csproj file found in '{0}'. Set the 'srcPath' option.")]
    NoProjectFile(PathBuf),
    #[error("Several .csproj files found in '{dir}' ({found}). Set the 'srcPath' option.")]
    AmbiguousProjectFile { dir: PathBuf, found: String },
    #[error("Don't know how to set a version in '{0}'.")]
    UnsupportedVersionFile(PathBuf),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error(transparent)]
    Csproj(#[from] CsprojError),
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExecutorResult = Result<(), ExecutorError>;

/// Everything an executor may need about the target it is running.
pub struct ExecutorContext<'a> {
    pub workspace: &'a Workspace,
    pub project: &'a ProjectConfiguration,
    pub target_name: &'a str,
    pub runner: &'a dyn CommandRunner,
}

impl std::fmt::Debug for ExecutorContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorContext")
            .field("project", &self.project.name)
            .field("target_name", &self.target_name)
            .finish()
    }
}

impl ExecutorContext<'_> {
    pub fn project_root(&self) -> PathBuf {
        self.workspace.root().join(&self.project.root)
    }

    pub fn defaults(&self) -> &DefaultsConfig {
        self.workspace.defaults()
    }

    /// Resolves an option path: absolute paths are kept, relative ones are
    /// taken from the project root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root().join(path)
        }
    }

    /// `<workspace>/<output_dir>/<project root>/<kind>`, used when an executor
    /// writes artifacts and no explicit `outputPath` is given.
    pub fn default_output(&self, kind: &str) -> PathBuf {
        self.workspace
            .root()
            .join(self.defaults().output_dir())
            .join(&self.project.root)
            .join(kind)
    }

    /// A new command running from the project root.
    pub fn command(&self, program: &str) -> CommandLine {
        CommandLine::new(program, &self.project_root())
    }

    /// Echoes and runs one command, printing whatever it produced.
    pub fn run(&self, command: CommandLine) -> Result<String, ExecutorError> {
        println!("{} {}", "→".blue(), command.to_string().green());
        log::info!("[{}:{}] {}", self.project.name, self.target_name, command);
        let output = self.runner.run(&command)?;
        let trimmed = output.trim_end();
        if !trimmed.is_empty() {
            println!("{}", trimmed);
        }
        Ok(output)
    }

    /// The `srcPath` option, or the single `.csproj` at the project root.
    pub fn project_file(&self, src_path: Option<&str>) -> Result<String, ExecutorError> {
        if let Some(src) = src_path {
            return Ok(src.to_string());
        }
        let root = self.project_root();
        let found = find_csproj_files(&root);
        match found.as_slice() {
            [single] => Ok(single
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()),
            [] => Err(ExecutorError::NoProjectFile(root)),
            many => Err(ExecutorError::AmbiguousProjectFile {
                dir: root,
                found: many
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

/// `.csproj` files directly inside `dir`, sorted.
pub fn find_csproj_files(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "csproj"))
        .collect();
    found.sort();
    found
}

/// Reads an executor's typed options from the target's option record.
pub(crate) fn parse_options<T: DeserializeOwned>(
    executor: &'static str,
    options: &Map<String, Value>,
) -> Result<T, ExecutorError> {
    serde_json::from_value(Value::Object(options.clone()))
        .map_err(|source| ExecutorError::InvalidOptions { executor, source })
}

// --- Executor Definition and Registry ---

pub type ExecutorHandler = fn(&ExecutorContext<'_>, &Map<String, Value>) -> ExecutorResult;

/// A leaf executor: its identifier, a one-line description and its handler.
#[derive(Debug)]
pub struct ExecutorDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: ExecutorHandler,
}

/// Every leaf executor known to rigging.
static EXECUTOR_REGISTRY: &[ExecutorDefinition] = &[
    ExecutorDefinition {
        name: RUN_COMMANDS_EXECUTOR,
        description: "Runs a list of shell-style commands in order.",
        handler: common::run_commands,
    },
    ExecutorDefinition {
        name: SET_VERSION_EXECUTOR,
        description: "Writes a version into .csproj and Chart.yaml files.",
        handler: common::set_version,
    },
    ExecutorDefinition {
        name: DOTNET_BUILD_EXECUTOR,
        description: "dotnet build",
        handler: dotnet::build,
    },
    ExecutorDefinition {
        name: DOTNET_CLEAN_EXECUTOR,
        description: "dotnet clean",
        handler: dotnet::clean,
    },
    ExecutorDefinition {
        name: DOTNET_PACK_EXECUTOR,
        description: "dotnet pack into the output directory",
        handler: dotnet::pack,
    },
    ExecutorDefinition {
        name: DOTNET_PUBLISH_EXECUTOR,
        description: "dotnet publish into the output directory",
        handler: dotnet::publish,
    },
    ExecutorDefinition {
        name: DOTNET_TEST_EXECUTOR,
        description: "dotnet test",
        handler: dotnet::test,
    },
    ExecutorDefinition {
        name: DOTNET_RUN_EXECUTOR,
        description: "dotnet run",
        handler: dotnet::run,
    },
    ExecutorDefinition {
        name: DOCKER_BUILD_EXECUTOR,
        description: "docker build",
        handler: docker::build,
    },
    ExecutorDefinition {
        name: DOCKER_PUBLISH_EXECUTOR,
        description: "docker tag + docker push to a registry",
        handler: docker::publish,
    },
    ExecutorDefinition {
        name: DOCKER_RUN_EXECUTOR,
        description: "docker run",
        handler: docker::run,
    },
    ExecutorDefinition {
        name: HELM_PACKAGE_EXECUTOR,
        description: "helm package a local chart",
        handler: helm::package,
    },
    ExecutorDefinition {
        name: HELM_INSTALL_EXECUTOR,
        description: "helm upgrade --install a local or repository chart",
        handler: helm::install,
    },
    ExecutorDefinition {
        name: KUBECTL_APPLY_EXECUTOR,
        description: "kubectl apply a set of manifests",
        handler: helm::kubectl_apply,
    },
];

/// Finds an executor definition by its identifier.
pub fn find_executor(name: &str) -> Option<&'static ExecutorDefinition> {
    EXECUTOR_REGISTRY.iter().find(|def| def.name == name)
}

pub fn executors() -> &'static [ExecutorDefinition] {
    EXECUTOR_REGISTRY
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::system::testing::RecordingRunner;

    #[test]
    fn test_registry_has_unique_names_and_excludes_chain() {
        let mut names: Vec<_> = executors().iter().map(|def| def.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert!(find_executor(CHAIN_EXECUTOR).is_none());
        assert!(find_executor(DOTNET_BUILD_EXECUTOR).is_some());
    }

    #[test]
    fn test_project_file_discovery() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);

        assert!(matches!(ctx.project_file(None), Err(ExecutorError::NoProjectFile(_))));

        std::fs::write(ctx.project_root().join("Api.csproj"), "<Project />").unwrap();
        assert_eq!(ctx.project_file(None).unwrap(), "Api.csproj");
        assert_eq!(ctx.project_file(Some("src/Other.csproj")).unwrap(), "src/Other.csproj");

        std::fs::write(ctx.project_root().join("Api2.csproj"), "<Project />").unwrap();
        assert!(matches!(ctx.project_file(None), Err(ExecutorError::AmbiguousProjectFile { .. })));
    }

    #[test]
    fn test_default_output_is_under_workspace_dist() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);
        assert_eq!(
            ctx.default_output("nuget"),
            workspace.root().join("dist").join("apps/api").join("nuget")
        );
    }
}
