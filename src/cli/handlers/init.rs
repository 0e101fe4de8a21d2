// src/cli/handlers/init.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use dialoguer::{Input, theme::ColorfulTheme};
use std::{env, fs, path::Path};

use crate::{
    cli::args::InitArgs,
    constants::WORKSPACE_CONFIG_FILENAME,
    core::workspace::Workspace,
    models::{DefaultsConfig, WorkspaceConfig, WorkspaceSection},
    scaffold::solution,
};

/// The main handler for the `init` command.
/// Creates a `rigging.toml` (and optionally an empty solution) in the current directory.
pub fn handle(args: Vec<String>) -> Result<()> {
    let init_args = InitArgs::try_parse_from(&args)?;

    let target_dir = env::current_dir()?;
    println!("Initializing workspace in: {}", target_dir.display());
    if target_dir.join(WORKSPACE_CONFIG_FILENAME).exists() {
        return Err(anyhow!(
            "A '{}' already exists at this location.",
            WORKSPACE_CONFIG_FILENAME
        ));
    }

    let config = resolve_config(&init_args, &target_dir, !init_args.yes)?;
    let workspace = Workspace::init(&target_dir, config)?;

    if let Some(sln) = &workspace.config().workspace.solution {
        let sln_path = workspace.root().join(sln);
        if sln_path.exists() {
            println!("  Using existing solution: {}", sln);
        } else {
            if let Some(parent) = sln_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&sln_path, solution::new_solution())?;
            println!("  {} {}", "CREATE".green(), sln);
        }
    }

    println!("  {} {}", "CREATE".green(), WORKSPACE_CONFIG_FILENAME);
    println!(
        "\n{} Next: `rig generate dotnet-project <name>`",
        "Workspace ready.".green().bold()
    );
    Ok(())
}

/// Builds the workspace configuration from flags, asking for anything missing
/// when interactive.
fn resolve_config(args: &InitArgs, target_dir: &Path, is_interactive: bool) -> Result<WorkspaceConfig> {
    let section = WorkspaceSection::default();
    let defaults = DefaultsConfig::default();

    let default_solution = target_dir
        .file_name()
        .map(|name| format!("{}.sln", name.to_string_lossy()))
        .unwrap_or_default();
    let solution = match &args.solution {
        Some(sln) => Some(sln.clone()),
        None if is_interactive => {
            let answer = prompt("Solution file (leave empty for none)", default_solution, true)?;
            Some(answer).filter(|a| !a.trim().is_empty())
        }
        None => None,
    };

    let resolve = |flag: &Option<String>, label: &str, default: &str| -> Result<String> {
        match flag {
            Some(value) => Ok(value.clone()),
            None if is_interactive => prompt(label, default.to_string(), false),
            None => Ok(default.to_string()),
        }
    };
    let apps_dir = resolve(&args.apps_dir, "Applications directory", &section.apps_dir)?;
    let libs_dir = resolve(&args.libs_dir, "Libraries directory", &section.libs_dir)?;
    let framework = resolve(&args.framework, "Target framework", defaults.framework())?;

    Ok(WorkspaceConfig {
        workspace: WorkspaceSection {
            solution,
            apps_dir,
            libs_dir,
        },
        defaults: DefaultsConfig {
            framework: Some(framework),
            configuration: args.configuration.clone(),
            docker_registry: args.registry.clone(),
            ..Default::default()
        },
        ..Default::default()
    })
}

fn prompt(label: &str, default: String, allow_empty: bool) -> Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .default(default)
        .allow_empty(allow_empty)
        .interact_text()
        .map_err(|e| anyhow!(e))
}
