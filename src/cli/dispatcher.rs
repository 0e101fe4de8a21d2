use anyhow::Result;

use crate::cli::handlers;

// --- Command Definition and Registry ---

/// Defines a system command, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>) -> Result<()>,
}

/// The single source of truth for all commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "init",
        aliases: &[],
        handler: handlers::init::handle,
    },
    CommandDefinition {
        name: "generate",
        aliases: &["g", "gen"],
        handler: handlers::generate::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "show",
        aliases: &[],
        handler: handlers::show::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Decides which command handles `all_args` and with which arguments.
///
/// - `rig <command> [args...]` goes to the command;
/// - `rig <project>:<target> [args...]` is a shortcut for `rig run`.
fn route(mut all_args: Vec<String>) -> Option<(&'static CommandDefinition, Vec<String>)> {
    if all_args.is_empty() {
        return None;
    }
    let arg1 = all_args.remove(0);
    if let Some(command) = find_command(&arg1) {
        return Some((command, all_args));
    }
    let mut run_args = vec![arg1];
    run_args.extend(all_args);
    find_command("run").map(|run| (run, run_args))
}

/// The main application dispatcher.
pub fn dispatch(all_args: Vec<String>) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    match route(all_args) {
        Some((command, args)) => (command.handler)(args),
        None => {
            println!("Nothing to do. Run `rig --help` for usage.");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routed(args: &[&str]) -> Option<(&'static str, Vec<String>)> {
        route(args.iter().map(|a| a.to_string()).collect()).map(|(cmd, args)| (cmd.name, args))
    }

    #[test]
    fn test_routes_commands_and_aliases() {
        assert_eq!(routed(&["g", "docker", "api"]), Some(("generate", vec!["docker".into(), "api".into()])));
        assert_eq!(routed(&["ls"]), Some(("list", vec![])));
        assert_eq!(routed(&[]), None);
    }

    #[test]
    fn test_target_reference_is_a_run_shortcut() {
        assert_eq!(
            routed(&["api:build", "--stage", "src"]),
            Some(("run", vec!["api:build".into(), "--stage".into(), "src".into()]))
        );
    }
}
