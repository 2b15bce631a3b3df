use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use tably_api::DEFAULT_API_BASE_URL;

const DEFAULT_PALETTE_MAX_ITEMS: usize = 8;
const MAX_PALETTE_MAX_ITEMS: usize = 50;
const DEFAULT_TOAST_DURATION_MS: u64 = 3000;
const MIN_TOAST_DURATION_MS: u64 = 500;
const MAX_TOAST_DURATION_MS: u64 = 60_000;

const API_KEY_ENV: &str = "TABLY_API_KEY";
const API_BASE_URL_ENV: &str = "TABLY_API_BASE_URL";

const DEFAULT_CONFIG: &str = "# Project API\n\
# api_base_url = https://go.v7labs.com/api\n\
# API key (or set TABLY_API_KEY)\n\
# api_key = \n\
# Project to open (or pass --workspace / --project)\n\
# workspace_id = \n\
# project_id = \n\
\n\
# Command palette rows shown at once\n\
# palette_max_items = 8\n\
# How long notifications stay visible, in milliseconds\n\
# toast_duration_ms = 3000\n\
\n\
# Keybindings\n\
# keybind = ctrl-k=toggle_command_palette\n\
# keybind = ctrl-a=unbind\n\
# keybind = clear\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindConfigLine {
    pub line_number: usize,
    pub value: String,
}

/// Workspace and project the table is opened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTarget {
    pub workspace_id: String,
    pub project_id: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub workspace_id: Option<String>,
    pub project_id: Option<String>,
    pub palette_max_items: usize,
    pub toast_duration_ms: u64,
    pub keybind_lines: Vec<KeybindConfigLine>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            workspace_id: None,
            project_id: None,
            palette_max_items: DEFAULT_PALETTE_MAX_ITEMS,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            keybind_lines: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load_or_create() -> Self {
        let mut config = Self::default();
        let Some(path) = ensure_config_file() else {
            return config;
        };

        if let Ok(contents) = fs::read_to_string(&path) {
            config = Self::from_contents(&contents);
        }

        config
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Ok(Self::from_contents(&contents))
    }

    pub(crate) fn from_contents(contents: &str) -> Self {
        let mut config = Self::default();
        for (line_number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.splitn(2, '=');
            let key = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();

            if key.eq_ignore_ascii_case("api_base_url") || key.eq_ignore_ascii_case("api_url") {
                if let Some(url) = parse_string_value(value) {
                    config.api_base_url = url.trim_end_matches('/').to_string();
                }
            }

            if key.eq_ignore_ascii_case("api_key") {
                config.api_key = parse_string_value(value);
            }

            if key.eq_ignore_ascii_case("workspace_id") || key.eq_ignore_ascii_case("workspace") {
                config.workspace_id = parse_string_value(value);
            }

            if key.eq_ignore_ascii_case("project_id") || key.eq_ignore_ascii_case("project") {
                config.project_id = parse_string_value(value);
            }

            if key.eq_ignore_ascii_case("palette_max_items") {
                if let Ok(max_items) = value.parse::<usize>() {
                    config.palette_max_items = max_items.clamp(1, MAX_PALETTE_MAX_ITEMS);
                }
            }

            if key.eq_ignore_ascii_case("toast_duration_ms") {
                if let Ok(duration) = value.parse::<u64>() {
                    config.toast_duration_ms =
                        duration.clamp(MIN_TOAST_DURATION_MS, MAX_TOAST_DURATION_MS);
                }
            }

            if key.eq_ignore_ascii_case("keybind")
                && let Some(raw) = parse_string_value(value)
            {
                config.keybind_lines.push(KeybindConfigLine {
                    line_number: line_number + 1,
                    value: raw,
                });
            }
        }

        config
    }

    /// Environment variables win over the file.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            env::var(API_KEY_ENV).ok().as_deref(),
            env::var(API_BASE_URL_ENV).ok().as_deref(),
        );
    }

    fn apply_overrides(&mut self, api_key: Option<&str>, api_base_url: Option<&str>) {
        if let Some(api_key) = api_key.and_then(parse_string_value) {
            self.api_key = Some(api_key);
        }
        if let Some(url) = api_base_url.and_then(parse_string_value) {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) => Ok(key),
            None => bail!(
                "api_key is not set; add it to the config file or set {}",
                API_KEY_ENV
            ),
        }
    }

    pub fn project_target(&self) -> Result<ProjectTarget> {
        let workspace_id = self
            .workspace_id
            .clone()
            .context("workspace_id is not set; pass --workspace or add it to the config file")?;
        let project_id = self
            .project_id
            .clone()
            .context("project_id is not set; pass --project or add it to the config file")?;
        Ok(ProjectTarget {
            workspace_id,
            project_id,
        })
    }
}

fn parse_string_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let unquoted = if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    let unquoted = unquoted.trim();
    if unquoted.is_empty() {
        return None;
    }

    Some(unquoted.to_string())
}

pub fn ensure_config_file() -> Option<PathBuf> {
    let path = config_path()?;
    if !path.exists() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(error) = fs::write(&path, DEFAULT_CONFIG) {
            log::warn!("Could not create {}: {}", path.display(), error);
        }
    }
    Some(path)
}

pub fn config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Ok(app_data) = env::var("APPDATA")
            && !app_data.trim().is_empty()
        {
            return Some(Path::new(&app_data).join("tably").join("config.txt"));
        }
    }

    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME")
        && !xdg_config_home.trim().is_empty()
    {
        return Some(Path::new(&xdg_config_home).join("tably/config.txt"));
    }

    dirs::home_dir().map(|home| home.join(".config/tably/config.txt"))
}
