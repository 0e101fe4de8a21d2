// src/cli/args.rs
use crate::generators::{
    chain::ChainGeneratorOptions,
    docker::DockerGeneratorOptions,
    dotnet_project::{DotnetProjectKind, DotnetProjectOptions},
    helm::{HelmGeneratorOptions, HelmMode},
    test_project::{TestFramework, TestProjectOptions},
};
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Creates a rigging.toml in the current directory.")]
pub struct InitArgs {
    /// Solution file to keep in sync, relative to the workspace root (e.g. "Acme.sln").
    #[arg(long)]
    pub solution: Option<String>,

    /// Directory for application projects.
    #[arg(long)]
    pub apps_dir: Option<String>,

    /// Directory for library projects.
    #[arg(long)]
    pub libs_dir: Option<String>,

    /// Default target framework for new projects (e.g. "net8.0").
    #[arg(long)]
    pub framework: Option<String>,

    /// Default build configuration.
    #[arg(long)]
    pub configuration: Option<String>,

    /// Default container registry for docker-publish targets.
    #[arg(long)]
    pub registry: Option<String>,

    /// Do not ask for user input, use defaults for unspecified values.
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Runs a target: `rig run <project>:<target>` or `rig run <project> <target>`.")]
pub struct RunArgs {
    /// `project:target`, or the project when the target is given separately.
    pub reference: String,

    pub target: Option<String>,

    /// Run only this stage of a chain target.
    #[arg(long, short)]
    pub stage: Option<String>,

    /// Override an option of the target (e.g. "version=1.2.0"). Values that
    /// parse as JSON are used as JSON.
    #[arg(long = "opt", short = 'o', value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Print the commands without running them.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows the targets of a project as a tree.")]
pub struct ShowArgs {
    pub project: String,

    /// Only show this target.
    pub target: Option<String>,

    /// Show the options of each leaf target.
    #[arg(long)]
    pub options: bool,

    /// Limit how deep chains are expanded.
    #[arg(long, short)]
    pub depth: Option<usize>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the projects of the workspace.")]
pub struct ListArgs {
    /// List the available executors instead.
    #[arg(long)]
    pub executors: bool,
}

// --- Generator arguments ---

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Creates a new .NET project with build, clean, package and version targets.")]
pub struct DotnetProjectArgs {
    pub name: String,

    #[arg(long = "type", short = 't', value_enum, default_value_t = DotnetProjectKind::Console)]
    pub kind: DotnetProjectKind,

    /// Parent directory (defaults to apps_dir or libs_dir from rigging.toml).
    #[arg(long)]
    pub directory: Option<String>,

    /// Target framework moniker.
    #[arg(long, short)]
    pub framework: Option<String>,

    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub tags: Vec<String>,

    /// Also create a test project with this test framework.
    #[arg(long, value_enum)]
    pub with_tests: Option<TestFramework>,

    /// Do not add the project to the workspace solution.
    #[arg(long)]
    pub skip_solution: bool,
}

impl From<DotnetProjectArgs> for DotnetProjectOptions {
    fn from(args: DotnetProjectArgs) -> Self {
        Self {
            name: args.name,
            kind: args.kind,
            directory: args.directory,
            framework: args.framework,
            tags: args.tags,
            with_tests: args.with_tests,
            skip_solution: args.skip_solution,
        }
    }
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Adds a test project and a `test` target to a .NET project.")]
pub struct DotnetTestArgs {
    pub project: String,

    #[arg(long, short, value_enum, default_value_t = TestFramework::Xunit)]
    pub framework: TestFramework,

    /// Target framework moniker for the test project.
    #[arg(long)]
    pub target_framework: Option<String>,
}

impl From<DotnetTestArgs> for TestProjectOptions {
    fn from(args: DotnetTestArgs) -> Self {
        Self {
            project: args.project,
            framework: args.framework,
            target_framework: args.target_framework,
        }
    }
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Adds a Dockerfile and docker targets to a project.")]
pub struct DockerArgs {
    pub project: String,

    #[arg(long)]
    pub image: Option<String>,

    #[arg(long)]
    pub registry: Option<String>,

    /// Port mapping for dockerRun (e.g. "8080:8080").
    #[arg(long)]
    pub port: Option<String>,
}

impl From<DockerArgs> for DockerGeneratorOptions {
    fn from(args: DockerArgs) -> Self {
        Self {
            project: args.project,
            image: args.image,
            registry: args.registry,
            port: args.port,
        }
    }
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Adds Helm deployment targets to a project.")]
pub struct HelmArgs {
    pub project: String,

    #[arg(long, short, value_enum, default_value_t = HelmMode::Local)]
    pub mode: HelmMode,

    /// Chart name (local) or `repo/chart` (repo).
    #[arg(long)]
    pub chart: Option<String>,

    #[arg(long)]
    pub repo_url: Option<String>,

    #[arg(long, short)]
    pub namespace: Option<String>,
}

impl From<HelmArgs> for HelmGeneratorOptions {
    fn from(args: HelmArgs) -> Self {
        Self {
            project: args.project,
            mode: args.mode,
            chart: args.chart,
            repo_url: args.repo_url,
            namespace: args.namespace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Creates or extends a chain target.")]
pub struct ChainArgs {
    pub project: String,

    /// The chain target to create or extend.
    pub target: String,

    /// Define the lists as this stage of the chain.
    #[arg(long)]
    pub stage: Option<String>,

    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub targets: Vec<String>,

    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub pre_targets: Vec<String>,

    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub post_targets: Vec<String>,

    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub additional_targets: Vec<String>,

    /// If the target is demoted, do not run the demoted target as part of the chain.
    #[arg(long)]
    pub legacy_demotion: bool,
}

impl From<ChainArgs> for ChainGeneratorOptions {
    fn from(args: ChainArgs) -> Self {
        Self {
            project: args.project,
            target: args.target,
            stage: args.stage,
            targets: args.targets,
            pre_targets: args.pre_targets,
            post_targets: args.post_targets,
            additional_targets: args.additional_targets,
            legacy_demotion: args.legacy_demotion,
        }
    }
}
