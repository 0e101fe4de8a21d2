// src/cli/handlers/generate.rs

use super::commons;
use crate::{
    cli::args::{ChainArgs, DockerArgs, DotnetProjectArgs, DotnetTestArgs, HelmArgs},
    generators::{self, GeneratorReport},
};
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

/// A generator as exposed on the command line.
struct GeneratorDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
    handler: fn(Vec<String>) -> Result<()>,
}

static GENERATOR_REGISTRY: &[GeneratorDefinition] = &[
    GeneratorDefinition {
        name: "dotnet-project",
        aliases: &["project", "proj"],
        description: "New .NET project (console, classlib, webapi).",
        handler: dotnet_project,
    },
    GeneratorDefinition {
        name: "dotnet-test",
        aliases: &["test"],
        description: "Test project plus a `test` step in `build`.",
        handler: dotnet_test,
    },
    GeneratorDefinition {
        name: "docker",
        aliases: &[],
        description: "Dockerfile plus dockerBuild/dockerPublish/dockerRun.",
        handler: docker,
    },
    GeneratorDefinition {
        name: "helm",
        aliases: &[],
        description: "Helm chart (local) or chart values (repo) plus deploy targets.",
        handler: helm,
    },
    GeneratorDefinition {
        name: "chain",
        aliases: &[],
        description: "Create or extend a chain target.",
        handler: chain,
    },
];

fn find_generator(name: &str) -> Option<&'static GeneratorDefinition> {
    GENERATOR_REGISTRY
        .iter()
        .find(|g| g.name == name || g.aliases.contains(&name))
}

/// Main entry point for the 'generate' command: `rig generate <generator> [args...]`.
pub fn handle(mut args: Vec<String>) -> Result<()> {
    if args.is_empty() {
        println!("{}", "Available generators:".bold());
        for generator in GENERATOR_REGISTRY {
            println!("  {:<16} {}", generator.name.cyan(), generator.description);
        }
        return Ok(());
    }
    let name = args.remove(0);
    let generator = find_generator(&name).ok_or_else(|| {
        anyhow!(
            "Unknown generator '{}'. Run `rig generate` for the list.",
            name.cyan()
        )
    })?;
    (generator.handler)(args)
}

fn finish(report: &GeneratorReport, root: &std::path::Path) -> Result<()> {
    report.print(root);
    println!("\n{}", "Done.".green().bold());
    Ok(())
}

fn dotnet_project(args: Vec<String>) -> Result<()> {
    let options: generators::dotnet_project::DotnetProjectOptions = DotnetProjectArgs::try_parse_from(&args)?.into();
    let mut workspace = commons::current_workspace()?;
    let report = generators::dotnet_project::generate(&mut workspace, &options)?;
    finish(&report, workspace.root())
}

fn dotnet_test(args: Vec<String>) -> Result<()> {
    let options: generators::test_project::TestProjectOptions = DotnetTestArgs::try_parse_from(&args)?.into();
    let workspace = commons::current_workspace()?;
    let report = generators::test_project::generate(&workspace, &options)?;
    finish(&report, workspace.root())
}

fn docker(args: Vec<String>) -> Result<()> {
    let options: generators::docker::DockerGeneratorOptions = DockerArgs::try_parse_from(&args)?.into();
    let workspace = commons::current_workspace()?;
    let report = generators::docker::generate(&workspace, &options)?;
    finish(&report, workspace.root())
}

fn helm(args: Vec<String>) -> Result<()> {
    let options: generators::helm::HelmGeneratorOptions = HelmArgs::try_parse_from(&args)?.into();
    let workspace = commons::current_workspace()?;
    let report = generators::helm::generate(&workspace, &options)?;
    finish(&report, workspace.root())
}

fn chain(args: Vec<String>) -> Result<()> {
    let options: generators::chain::ChainGeneratorOptions = ChainArgs::try_parse_from(&args)?.into();
    let workspace = commons::current_workspace()?;
    let report = generators::chain::generate(&workspace, &options)?;
    finish(&report, workspace.root())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_lookup_by_alias() {
        assert_eq!(find_generator("proj").map(|g| g.name), Some("dotnet-project"));
        assert_eq!(find_generator("test").map(|g| g.name), Some("dotnet-test"));
        assert!(find_generator("terraform").is_none());
    }

    #[test]
    fn test_unknown_generator_is_an_error() {
        assert!(handle(vec!["terraform".to_string()]).is_err());
    }
}
