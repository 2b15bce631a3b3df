use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property types that can be created from the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    Text,
    File,
    Json,
    Url,
}

impl PropertyKind {
    pub const ALL: [Self; 4] = [Self::Text, Self::File, Self::Json, Self::Url];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::File => "file",
            Self::Json => "json",
            Self::Url => "url",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::File => "File",
            Self::Json => "JSON",
            Self::Url => "URL",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "file" => Some(Self::File),
            "json" => Some(Self::Json),
            "url" => Some(Self::Url),
            _ => None,
        }
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

/// Declared type of a schema column. Types the client does not special-case
/// are kept verbatim so their columns still render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    Known(PropertyKind),
    Other(String),
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(kind) => kind.as_str(),
            Self::Other(raw) => raw,
        }
    }

    pub fn kind(&self) -> Option<PropertyKind> {
        match self {
            Self::Known(kind) => Some(*kind),
            Self::Other(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl Default for PropertyType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for PropertyType {
    fn from(value: String) -> Self {
        match PropertyKind::from_str(&value) {
            Some(kind) => Self::Known(kind),
            None => Self::Other(value),
        }
    }
}

impl From<PropertyType> for String {
    fn from(value: PropertyType) -> Self {
        match value {
            PropertyType::Known(kind) => kind.as_str().to_string(),
            PropertyType::Other(raw) => raw,
        }
    }
}

impl From<PropertyKind> for PropertyType {
    fn from(kind: PropertyKind) -> Self {
        Self::Known(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "type", default)]
    pub kind: PropertyType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Entity {
    pub fn field(&self, slug: &str) -> Option<&Value> {
        self.fields.get(slug)
    }
}

/// Request body for a new schema column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProperty {
    pub name: String,
    pub kind: PropertyKind,
    pub description: Option<String>,
    pub tool: String,
    pub is_grounded: bool,
}

impl NewProperty {
    /// A manually filled column, the only kind the palette creates.
    pub fn manual(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            tool: "manual".to_string(),
            is_grounded: false,
        }
    }

    pub fn payload(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "type": self.kind,
            "tool": self.tool,
            "is_grounded": self.is_grounded,
            "inputs": [],
        })
    }
}
