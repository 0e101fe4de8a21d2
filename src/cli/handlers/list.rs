// src/cli/handlers/list.rs

use super::commons;
use crate::{cli::args::ListArgs, executors};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;

pub fn handle(args: Vec<String>) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;

    if list_args.executors {
        println!("{}", "Executors:".bold());
        for executor in executors::executors() {
            println!("  {:<26} {}", executor.name.cyan(), executor.description.dimmed());
        }
        return Ok(());
    }

    let workspace = commons::current_workspace()?;
    let names: Vec<&str> = workspace.project_names().collect();
    if names.is_empty() {
        println!("\nNo projects yet. Use 'rig generate dotnet-project <name>' to add one.");
        return Ok(());
    }

    println!("\nProjects in {}:", workspace.root().display());
    for name in names {
        match workspace.read_project(name) {
            Ok(project) => println!(
                "  {:<24} {:<28} {:?}, {} target(s)",
                project.name.bold(),
                project.root.dimmed(),
                project.project_type,
                project.targets.len()
            ),
            Err(e) => println!("  {:<24} {}", name.bold(), format!("unreadable: {}", e).red()),
        }
    }
    Ok(())
}
