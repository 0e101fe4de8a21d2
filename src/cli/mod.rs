use clap::Parser;

pub mod args;
pub mod dispatcher;
pub mod handlers;

const HELP_TEMPLATE: &str = "\
<title>rig</title> {version}: build composition for .NET workspaces.

<group>USAGE</group>
  <cmd>rig</cmd> <hl><command></hl> [args...]
  <cmd>rig</cmd> <hl><project>:<target></hl> [run args...]   <dim># shortcut for `rig run`</dim>

<group>COMMANDS</group>
  <cmd>init</cmd>                      Create rigging.toml in the current directory
  <cmd>generate</cmd>, <cmd>g</cmd> <hl><generator></hl>  dotnet-project | dotnet-test | docker | helm | chain
  <cmd>run</cmd> <hl><project>:<target></hl>    Run a target (--stage, --opt KEY=VALUE, --dry-run)
  <cmd>show</cmd> <hl><project></hl> [target]     Print a project's targets as a tree
  <cmd>list</cmd>, <cmd>ls</cmd>                  List projects (--executors for executors)

<dim>Each command accepts --help. Set RUST_LOG=debug for details.</dim>
";

/// Builds the color-aware help string at runtime.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    // `<hl>` wraps literal `<project>` placeholders, so only known tags are replaced.
    let formatted_string = HELP_TEMPLATE
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// rig: compose and run build targets across a .NET workspace.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// Everything after `rig`; routed by the dispatcher.
    #[arg()]
    pub args: Vec<String>,
}
