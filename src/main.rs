mod commands;
mod config;
mod keybindings;
mod palette;
mod project;
mod session;
mod table_view;
mod text_input;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event;
use tably_api::ApiClient;

use crate::config::AppConfig;
use crate::project::ProjectStore;
use crate::session::TerminalSession;
use crate::table_view::TableView;

const TICK_RATE: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "tably")]
#[command(about = "Browse a project's entities and add property columns", long_about = None)]
#[command(version)]
struct Args {
    /// Workspace id (overrides `workspace_id` in the config file)
    #[arg(long)]
    workspace: Option<String>,

    /// Project id (overrides `project_id` in the config file)
    #[arg(long)]
    project: Option<String>,

    /// Read this config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(error) = run(Args::parse()) {
        log::error!("{:#}", error);
        eprintln!("tably: {:#}", error);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match args.config.as_deref() {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load_or_create(),
    };
    config.apply_env();
    if args.workspace.is_some() {
        config.workspace_id = args.workspace;
    }
    if args.project.is_some() {
        config.project_id = args.project;
    }

    let target = config.project_target()?;
    let api = ApiClient::new(config.api_base_url.clone(), config.api_key()?);
    log::info!(
        "Opening project {} in workspace {} via {}",
        target.project_id,
        target.workspace_id,
        api.base_url()
    );

    let mut view = TableView::new(&config, ProjectStore::new(Arc::new(api), target));
    view.load();

    let mut session = TerminalSession::enter()?;
    while !view.should_quit() {
        view.tick();
        session
            .terminal()
            .draw(|frame| view.render(frame))
            .context("Failed to draw the table")?;

        if event::poll(TICK_RATE).context("Failed to poll terminal events")? {
            let event = event::read().context("Failed to read terminal event")?;
            view.handle_event(event);
        }
    }

    Ok(())
}
