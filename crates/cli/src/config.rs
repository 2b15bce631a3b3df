use std::path::{Path, PathBuf};

use crate::commands::list_keybinds::KeybindDirective;

pub const API_KEY_ENV: &str = "TABLY_API_KEY";
pub const API_BASE_URL_ENV: &str = "TABLY_API_BASE_URL";

/// Returns the path to the config file
pub fn config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Ok(app_data) = std::env::var("APPDATA")
            && !app_data.trim().is_empty()
        {
            return Some(Path::new(&app_data).join("tably").join("config.txt"));
        }
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config_home.trim().is_empty()
    {
        return Some(Path::new(&xdg_config_home).join("tably").join("config.txt"));
    }

    dirs::home_dir().map(|p| p.join(".config").join("tably").join("config.txt"))
}

pub fn read_config() -> String {
    config_path()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .unwrap_or_default()
}

/// Key/value pairs outside comments, in file order. Keys are lowercased.
pub fn settings(contents: &str) -> Vec<(usize, String, String)> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            let (key, value) = trimmed.split_once('=').unwrap_or((trimmed, ""));
            Some((
                index + 1,
                key.trim().to_ascii_lowercase(),
                unquote(value.trim()).to_string(),
            ))
        })
        .collect()
}

/// Last value for any of `keys`, ignoring blanks.
pub fn setting(contents: &str, keys: &[&str]) -> Option<String> {
    settings(contents)
        .into_iter()
        .filter(|(_, key, value)| keys.contains(&key.as_str()) && !value.is_empty())
        .map(|(_, _, value)| value)
        .last()
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        value[1..value.len() - 1].trim()
    } else {
        value
    }
}

/// Parses keybind directives from config file contents
pub fn parse_keybind_lines(contents: &str) -> Vec<KeybindDirective> {
    let mut directives = Vec::new();

    for (_, key, value) in settings(contents) {
        if key != "keybind" {
            continue;
        }

        if value.eq_ignore_ascii_case("clear") {
            directives.push(KeybindDirective::Clear);
            continue;
        }

        // Parse trigger=action format
        if let Some((trigger, action)) = value.rsplit_once('=') {
            let trigger = trigger.trim().to_string();
            let action = action.trim().to_string();

            if action.eq_ignore_ascii_case("unbind") {
                directives.push(KeybindDirective::Unbind { trigger });
            } else {
                directives.push(KeybindDirective::Bind { trigger, action });
            }
        }
    }

    directives
}
