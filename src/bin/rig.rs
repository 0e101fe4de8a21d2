// src/bin/rig.rs

use clap::Parser;
use colored::*;
use rigging::cli::{Cli, dispatcher};

/// The main entry point of the `rig` application.
/// Sets up logging, parses arguments, dispatches, and reports errors.
fn main() {
    env_logger::init();

    let cli = Cli::parse();
    log::debug!("CLI args parsed: {:?}", cli);

    if let Err(e) = dispatcher::dispatch(cli.args) {
        // clap errors carry their own formatting and exit codes.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}
