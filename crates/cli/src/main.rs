use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "tably-cli")]
#[command(about = "Inspect tably's config, keybindings and project schema", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tably-cli version
    #[command(name = "-version")]
    Version,

    /// List these commands
    #[command(name = "-help")]
    Help,

    /// Print the table keybindings after applying config overrides
    #[command(name = "-list-keybinds")]
    ListKeybinds,

    /// List the action names a `keybind` line can use
    #[command(name = "-list-actions")]
    ListActions,

    /// Open the tably config file in $VISUAL or $EDITOR
    #[command(name = "-edit-config")]
    EditConfig,

    /// Print the config file with the API key masked
    #[command(name = "-show-config")]
    ShowConfig,

    /// Check config keys, numeric ranges and keybind lines
    #[command(name = "-validate-config")]
    ValidateConfig,

    /// Fetch a project and print its property columns
    #[command(name = "-schema")]
    Schema {
        /// Workspace id (defaults to `workspace_id` in the config file)
        #[arg(long)]
        workspace: Option<String>,

        /// Project id (defaults to `project_id` in the config file)
        #[arg(long)]
        project: Option<String>,
    },
}

fn main() {
    match Cli::parse().command.unwrap_or(Command::Help) {
        Command::Version => commands::version::run(),
        Command::Help => commands::help::run(),
        Command::ListKeybinds => commands::list_keybinds::run(),
        Command::ListActions => commands::list_actions::run(),
        Command::EditConfig => commands::edit_config::run(),
        Command::ShowConfig => commands::show_config::run(),
        Command::ValidateConfig => commands::validate_config::run(),
        Command::Schema { workspace, project } => commands::schema::run(workspace, project),
    }
}
