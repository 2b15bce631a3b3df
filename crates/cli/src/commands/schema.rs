use anyhow::{Context, Result};
use tably_api::{ApiClient, DEFAULT_API_BASE_URL, Project, ProjectApi};

use crate::config::{API_BASE_URL_ENV, API_KEY_ENV, read_config, setting};

pub fn run(workspace: Option<String>, project: Option<String>) {
    if let Err(e) = fetch_and_print(workspace, project) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn fetch_and_print(workspace: Option<String>, project: Option<String>) -> Result<()> {
    let contents = read_config();
    let workspace = workspace
        .or_else(|| setting(&contents, &["workspace_id", "workspace"]))
        .context("No workspace given. Pass --workspace or set workspace_id in the config file")?;
    let project = project
        .or_else(|| setting(&contents, &["project_id", "project"]))
        .context("No project given. Pass --project or set project_id in the config file")?;

    let api_key = env_value(API_KEY_ENV)
        .or_else(|| setting(&contents, &["api_key"]))
        .with_context(|| format!("No API key. Set {} or api_key in the config file", API_KEY_ENV))?;
    let base_url = env_value(API_BASE_URL_ENV)
        .or_else(|| setting(&contents, &["api_base_url", "api_url"]))
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    let client = ApiClient::new(base_url, api_key);
    let project = client.get_project(&workspace, &project)?;
    for line in describe(&project) {
        println!("{}", line);
    }
    Ok(())
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn describe(project: &Project) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", project.name, project.id)];
    if project.properties.is_empty() {
        lines.push("  (no properties)".to_string());
    }
    for property in &project.properties {
        lines.push(format!(
            "  {} ({}) {}",
            property.name,
            property.kind.as_str(),
            property.slug
        ));
    }
    lines
}
