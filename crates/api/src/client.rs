use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

use crate::models::{Entity, NewProperty, Project, Property};

pub const DEFAULT_API_BASE_URL: &str = "https://go.v7labs.com/api";

const USER_AGENT: &str = concat!("Tably/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "X-API-KEY";

/// The operations the table needs from the project API.
pub trait ProjectApi: Send + Sync {
    fn get_project(&self, workspace_id: &str, project_id: &str) -> Result<Project>;
    fn get_entities(&self, workspace_id: &str, project_id: &str) -> Result<Vec<Entity>>;
    fn add_property(
        &self,
        workspace_id: &str,
        project_id: &str,
        property: &NewProperty,
    ) -> Result<Property>;
}

/// Blocking HTTP client. Meant to be called off the UI thread.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    api_key: String,
    agent: ureq::Agent,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
            agent: ureq::AgentBuilder::new().user_agent(USER_AGENT).build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn project_url(&self, workspace_id: &str, project_id: &str) -> String {
        project_url(&self.base_url, workspace_id, project_id)
    }

    fn get_text(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        self.agent
            .get(url)
            .set(API_KEY_HEADER, &self.api_key)
            .set("Accept", "application/json")
            .call()
            .with_context(|| format!("Request to {} failed", url))?
            .into_string()
            .context("Failed to read API response")
    }
}

impl ProjectApi for ApiClient {
    fn get_project(&self, workspace_id: &str, project_id: &str) -> Result<Project> {
        let url = self.project_url(workspace_id, project_id);
        let body = self.get_text(&url)?;
        serde_json::from_str(&body).context("Failed to parse project JSON")
    }

    fn get_entities(&self, workspace_id: &str, project_id: &str) -> Result<Vec<Entity>> {
        let url = format!("{}/entities", self.project_url(workspace_id, project_id));
        let body = self.get_text(&url)?;
        parse_entities(&body)
    }

    fn add_property(
        &self,
        workspace_id: &str,
        project_id: &str,
        property: &NewProperty,
    ) -> Result<Property> {
        let url = format!("{}/properties", self.project_url(workspace_id, project_id));
        log::debug!("POST {}", url);

        let response = match self
            .agent
            .post(&url)
            .set(API_KEY_HEADER, &self.api_key)
            .send_json(property.payload())
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let status_text = response.status_text().to_string();
                let body = response.into_string().unwrap_or_default();
                bail!(
                    "Failed to add property: {} {}\n{}",
                    status,
                    status_text,
                    body
                );
            }
            Err(error) => return Err(error).context("Failed to reach the property API"),
        };

        let body = response
            .into_string()
            .context("Failed to read API response")?;
        parse_property(&body)
    }
}

fn project_url(base_url: &str, workspace_id: &str, project_id: &str) -> String {
    format!(
        "{}/workspaces/{}/projects/{}",
        base_url, workspace_id, project_id
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntityList {
    Bare(Vec<Entity>),
    Wrapped { data: Vec<Entity> },
}

pub(crate) fn parse_entities(body: &str) -> Result<Vec<Entity>> {
    let list: EntityList = serde_json::from_str(body).context("Failed to parse entities JSON")?;
    Ok(match list {
        EntityList::Bare(entities) | EntityList::Wrapped { data: entities } => entities,
    })
}

pub(crate) fn parse_property(body: &str) -> Result<Property> {
    serde_json::from_str(body).map_err(|error| {
        log::error!("Error parsing property response: {}", error);
        anyhow!("Failed to parse API response")
    })
}
