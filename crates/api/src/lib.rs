//! Client for the project API: schema, rows, and column creation.

mod client;
mod models;
mod value;

pub use client::{ApiClient, DEFAULT_API_BASE_URL, ProjectApi};
pub use models::{Entity, NewProperty, Project, Property, PropertyKind, PropertyType};
pub use value::{FieldValue, FileIcon, FileRef};
