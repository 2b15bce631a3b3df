use serde_json::Value;

use crate::models::{PropertyKind, PropertyType};

const STATUS_SLUG: &str = "compliant";
const UNTITLED_FILE: &str = "Untitled File";

/// A cell value, interpreted through the declared type of its column.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Text(String),
    Url(String),
    Files(Vec<FileRef>),
    Json(Value),
    Status(bool),
    /// Shapes the column type does not describe, shown as compact JSON.
    Unrecognized(Value),
}

impl FieldValue {
    pub fn from_raw(kind: &PropertyType, slug: &str, raw: Option<&Value>) -> Self {
        let Some(raw) = raw.filter(|value| !is_falsy(value)) else {
            return Self::Empty;
        };

        if kind.kind() == Some(PropertyKind::File) {
            return match raw {
                Value::Array(items) => Self::Files(items.iter().map(FileRef::from_value).collect()),
                other => Self::Files(vec![FileRef::from_value(other)]),
            };
        }

        if slug == STATUS_SLUG {
            let yes = match raw {
                Value::String(text) => text == "true" || text == "Yes",
                Value::Bool(flag) => *flag,
                _ => false,
            };
            return Self::Status(yes);
        }

        match (kind.kind(), raw) {
            (Some(PropertyKind::Text), Value::String(text)) => Self::Text(text.clone()),
            (Some(PropertyKind::Url), Value::String(url)) => Self::Url(url.clone()),
            (Some(PropertyKind::Json), value) => Self::Json(value.clone()),
            (_, value) => Self::Unrecognized(value.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) | Self::Url(text) => text.clone(),
            Self::Files(files) => files
                .iter()
                .map(|file| format!("{} {}", file.icon().glyph(), file.name))
                .collect::<Vec<_>>()
                .join(", "),
            Self::Json(value) | Self::Unrecognized(value) => value.to_string(),
            Self::Status(true) => "Yes".to_string(),
            Self::Status(false) => "No".to_string(),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    Pdf,
    Image,
    Generic,
}

impl FileIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Pdf => "[pdf]",
            Self::Image => "[img]",
            Self::Generic => "[file]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
}

impl FileRef {
    /// Display name lookup order for file objects: `name`, `fileName`,
    /// `filename`, `manual_value.original_filename`, then a placeholder.
    pub fn from_value(value: &Value) -> Self {
        let name = match value {
            Value::String(name) if !name.trim().is_empty() => Some(name.clone()),
            Value::Object(object) => ["name", "fileName", "filename"]
                .iter()
                .find_map(|key| non_empty_str(object.get(*key)))
                .or_else(|| {
                    non_empty_str(
                        object
                            .get("manual_value")
                            .and_then(|manual| manual.get("original_filename")),
                    )
                }),
            _ => None,
        };

        Self {
            name: name.unwrap_or_else(|| UNTITLED_FILE.to_string()),
        }
    }

    pub fn extension(&self) -> Option<String> {
        let (_, extension) = self.name.rsplit_once('.')?;
        Some(extension.to_ascii_lowercase())
    }

    pub fn icon(&self) -> FileIcon {
        match self.extension().as_deref() {
            Some("pdf") => FileIcon::Pdf,
            Some("png" | "jpg" | "jpeg") => FileIcon::Image,
            _ => FileIcon::Generic,
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
