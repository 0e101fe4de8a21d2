// src/cli/handlers/show.rs

use super::commons;
use crate::{
    cli::args::ShowArgs,
    core::graph_display::{self, DisplayOptions},
};
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

pub fn handle(args: Vec<String>) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;
    let workspace = commons::current_workspace()?;

    // `rig show api:build` is accepted as well as `rig show api build`.
    let (project_name, target) = match (show_args.project.split_once(':'), show_args.target) {
        (Some((project, target)), None) => (project.to_string(), Some(target.to_string())),
        (_, target) => (show_args.project.clone(), target),
    };
    let project = workspace.read_project(&project_name)?;
    if let Some(target) = target.as_deref().filter(|t| !project.targets.contains_key(*t)) {
        return Err(anyhow!(
            "Project '{}' has no target named '{}'.",
            project.name.yellow(),
            target.cyan()
        ));
    }

    let options = DisplayOptions {
        show_options: show_args.options,
        max_depth: show_args.depth,
    };
    graph_display::display_target_tree(&workspace, &project, target.as_deref(), options)?;
    Ok(())
}
