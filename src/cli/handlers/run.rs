// src/cli/handlers/run.rs

use super::commons;
use crate::{
    cli::args::RunArgs,
    core::chain_runner::{RunRequest, TargetRunner},
    system::executor::{CommandRunner, DryRunRunner, SystemRunner},
};
use anyhow::Result;
use clap::Parser;
use colored::*;
use std::time::Instant;

/// Main entry point for the 'run' command.
pub fn handle(args: Vec<String>) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let (project, target) = commons::split_target_ref(&run_args.reference, run_args.target.as_deref())?;
    let request = RunRequest {
        stage: run_args.stage.clone(),
        overrides: commons::parse_overrides(&run_args.overrides)?,
    };

    let workspace = commons::current_workspace()?;
    let runner: &dyn CommandRunner = if run_args.dry_run { &DryRunRunner } else { &SystemRunner };
    if run_args.dry_run {
        println!("{}", "Dry run: commands are printed, not executed.".yellow());
    }

    let started = Instant::now();
    TargetRunner::new(&workspace, runner).run(&project, &target, &request)?;
    println!(
        "\n{} {}:{} ({:.1}s)",
        "✔".green(),
        project.bold(),
        target.bold(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
