use std::sync::Arc;
use std::thread;
#[cfg(test)]
use std::time::Duration;

use anyhow::{Result, anyhow};
use flume::{Receiver, Sender, unbounded};
use log::{info, warn};
use tably_api::{Entity, NewProperty, Project, ProjectApi, Property};

use crate::config::ProjectTarget;

/// Results reported by the background worker.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    Loaded {
        project: Project,
        entities: Vec<Entity>,
    },
    LoadFailed(String),
    PropertyAdded(Property),
    PropertyFailed(String),
}

/// The loaded project and its rows. Network calls run on worker threads and
/// report back through a channel drained by [`ProjectStore::poll`].
pub struct ProjectStore {
    api: Arc<dyn ProjectApi>,
    target: ProjectTarget,
    project: Option<Project>,
    entities: Vec<Entity>,
    /// A property creation is in flight.
    loading: bool,
    fetching: bool,
    event_tx: Sender<StoreEvent>,
    event_rx: Receiver<StoreEvent>,
}

impl ProjectStore {
    pub fn new(api: Arc<dyn ProjectApi>, target: ProjectTarget) -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            api,
            target,
            project: None,
            entities: Vec::new(),
            loading: false,
            fetching: false,
            event_tx,
            event_rx,
        }
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// Fetches the project and its entities together. Ignored while a
    /// previous load is still running.
    pub fn load(&mut self) {
        if self.fetching {
            return;
        }

        let api = Arc::clone(&self.api);
        let target = self.target.clone();
        let event_tx = self.event_tx.clone();
        let spawned = thread::Builder::new()
            .name("project-load".to_string())
            .spawn(move || {
                let event = match fetch_project(api.as_ref(), &target) {
                    Ok((project, entities)) => StoreEvent::Loaded { project, entities },
                    Err(error) => StoreEvent::LoadFailed(format!("{:#}", error)),
                };
                let _ = event_tx.send(event);
            });

        match spawned {
            Ok(_) => self.fetching = true,
            Err(error) => {
                warn!("Failed to start project load: {}", error);
                self.apply(StoreEvent::LoadFailed(format!(
                    "Failed to start project load: {}",
                    error
                )));
            }
        }
    }

    /// Sends a create-property request. Returns `false` without doing
    /// anything when no project is loaded or a request is already pending.
    pub fn add_property(&mut self, property: NewProperty) -> bool {
        if self.project.is_none() || self.loading {
            return false;
        }

        let api = Arc::clone(&self.api);
        let target = self.target.clone();
        let event_tx = self.event_tx.clone();
        let spawned = thread::Builder::new()
            .name("add-property".to_string())
            .spawn(move || {
                let event = match api.add_property(
                    &target.workspace_id,
                    &target.project_id,
                    &property,
                ) {
                    Ok(property) => StoreEvent::PropertyAdded(property),
                    Err(error) => StoreEvent::PropertyFailed(format!("{:#}", error)),
                };
                let _ = event_tx.send(event);
            });

        match spawned {
            Ok(_) => {
                self.loading = true;
                true
            }
            Err(error) => {
                warn!("Failed to start property request: {}", error);
                false
            }
        }
    }

    /// Applies every finished request and returns the events for the UI.
    pub fn poll(&mut self) -> Vec<StoreEvent> {
        let events: Vec<StoreEvent> = self.event_rx.try_iter().collect();
        for event in &events {
            self.apply(event.clone());
        }
        events
    }

    /// Queues an event as if a worker had reported it.
    #[cfg(test)]
    pub(crate) fn inject(&self, event: StoreEvent) {
        let _ = self.event_tx.send(event);
    }

    #[cfg(test)]
    fn wait(&mut self) -> Option<StoreEvent> {
        let event = self.event_rx.recv_timeout(Duration::from_secs(5)).ok()?;
        self.apply(event.clone());
        Some(event)
    }

    fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::Loaded { project, entities } => {
                info!(
                    "Loaded project {} with {} properties and {} entities",
                    project.id,
                    project.properties.len(),
                    entities.len()
                );
                self.project = Some(project);
                self.entities = entities;
                self.fetching = false;
            }
            StoreEvent::LoadFailed(message) => {
                warn!("Error fetching project data: {}", message);
                self.project = None;
                self.entities.clear();
                self.fetching = false;
            }
            StoreEvent::PropertyAdded(property) => {
                self.loading = false;
                match self.project.as_mut() {
                    Some(project) => project.properties.push(property),
                    None => warn!("Dropping property {} with no project loaded", property.id),
                }
            }
            StoreEvent::PropertyFailed(message) => {
                warn!("Error adding property: {}", message);
                self.loading = false;
            }
        }
    }
}

fn fetch_project(api: &dyn ProjectApi, target: &ProjectTarget) -> Result<(Project, Vec<Entity>)> {
    let ProjectTarget {
        workspace_id,
        project_id,
    } = target;

    thread::scope(|scope| {
        let entities = scope.spawn(|| api.get_entities(workspace_id, project_id));
        let project = api.get_project(workspace_id, project_id);
        let entities = entities
            .join()
            .unwrap_or_else(|_| Err(anyhow!("Entity request panicked")));
        Ok((project?, entities?))
    })
}
