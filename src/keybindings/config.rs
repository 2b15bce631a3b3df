use std::fmt;

use crate::commands::CommandAction;
use crate::config::KeybindConfigLine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeybindDirective {
    Clear,
    Bind {
        trigger: String,
        action: CommandAction,
    },
    Unbind {
        trigger: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindWarning {
    pub line_number: usize,
    pub message: String,
}

const NAMED_KEYS: &[&str] = &[
    "up",
    "down",
    "left",
    "right",
    "enter",
    "escape",
    "tab",
    "space",
    "backspace",
    "delete",
    "insert",
    "home",
    "end",
    "pageup",
    "pagedown",
];

/// A single key press with its modifiers. The key is lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub key: String,
}

impl Keystroke {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: false,
            key: key.into(),
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Parses `ctrl-shift-k` style triggers. `cmd`, `secondary` and
    /// `control` are read as `ctrl`, `option` and `meta` as `alt`.
    pub fn parse(source: &str) -> Result<Self, String> {
        let source = source.trim();
        if source.is_empty() {
            return Err("empty keystroke".to_string());
        }

        let (modifiers, key) = if source == "-" {
            ("", "-")
        } else if let Some(prefix) = source.strip_suffix("--") {
            (prefix, "-")
        } else {
            match source.rsplit_once('-') {
                Some((prefix, key)) => (prefix, key),
                None => ("", source),
            }
        };

        let mut keystroke = Self::new(normalize_key(key)?);
        for modifier in modifiers.split('-').filter(|part| !part.is_empty()) {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "cmd" | "secondary" => keystroke.ctrl = true,
                "alt" | "option" | "meta" => keystroke.alt = true,
                "shift" => keystroke.shift = true,
                other => return Err(format!("unknown modifier `{}`", other)),
            }
        }

        Ok(keystroke)
    }

    pub fn unparse(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        if self.ctrl {
            parts.push("ctrl");
        }
        if self.alt {
            parts.push("alt");
        }
        if self.shift {
            parts.push("shift");
        }
        parts.push(&self.key);
        parts.join("-")
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unparse())
    }
}

fn normalize_key(key: &str) -> Result<String, String> {
    let mut lower = key.to_ascii_lowercase();
    let alias = match lower.as_str() {
        "esc" => Some("escape"),
        "return" => Some("enter"),
        "del" => Some("delete"),
        _ => None,
    };
    if let Some(alias) = alias {
        lower = alias.to_string();
    }

    if lower.chars().count() == 1 || NAMED_KEYS.contains(&lower.as_str()) {
        return Ok(lower);
    }
    if let Some(number) = lower.strip_prefix('f')
        && let Ok(number) = number.parse::<u8>()
        && (1..=12).contains(&number)
    {
        return Ok(lower);
    }

    Err(format!("unknown key `{}`", key))
}

pub fn parse_keybind_directives(
    lines: &[KeybindConfigLine],
) -> (Vec<KeybindDirective>, Vec<KeybindWarning>) {
    let mut directives = Vec::new();
    let mut warnings = Vec::new();

    for line in lines {
        let warn = |message: String| KeybindWarning {
            line_number: line.line_number,
            message,
        };

        let value = line.value.trim();
        if value.is_empty() {
            warnings.push(warn("empty keybind value".to_string()));
            continue;
        }

        if value.eq_ignore_ascii_case("clear") {
            directives.push(KeybindDirective::Clear);
            continue;
        }

        let Some((trigger_raw, action_raw)) = value.rsplit_once('=') else {
            warnings.push(warn(
                "expected `keybind = <trigger>=<action>` or `keybind = clear`".to_string(),
            ));
            continue;
        };

        let mut trigger_raw = trigger_raw.trim().to_string();
        let action_raw = action_raw.trim();
        if trigger_raw.is_empty() || action_raw.is_empty() {
            warnings.push(warn(
                "keybind trigger and action must both be non-empty".to_string(),
            ));
            continue;
        }

        let action = if action_raw.eq_ignore_ascii_case("unbind") {
            None
        } else {
            match CommandAction::from_config_name(action_raw) {
                Some(action) => Some(action),
                None => {
                    warnings.push(warn(format!(
                        "unknown keybind action `{}`; expected one of: {}",
                        action_raw,
                        CommandAction::all_config_names()
                            .collect::<Vec<_>>()
                            .join(", ")
                    )));
                    continue;
                }
            }
        };

        if should_treat_trailing_dash_as_equal_key(&trigger_raw) {
            trigger_raw.push('=');
        }
        let trigger = match canonicalize_trigger(&trigger_raw) {
            Ok(trigger) => trigger,
            Err(message) => {
                warnings.push(warn(message));
                continue;
            }
        };

        directives.push(match action {
            Some(action) => KeybindDirective::Bind { trigger, action },
            None => KeybindDirective::Unbind { trigger },
        });
    }

    (directives, warnings)
}

fn should_treat_trailing_dash_as_equal_key(trigger: &str) -> bool {
    // `=` separates trigger from action, so `ctrl-=reload` arrives here as
    // `ctrl-`. `ctrl--` stays the minus key.
    trigger.ends_with('-') && !trigger.ends_with("--")
}

pub(crate) fn canonicalize_trigger(trigger: &str) -> Result<String, String> {
    let mut components = trigger.split_whitespace();
    let Some(first) = components.next() else {
        return Err("empty keybind trigger".to_string());
    };
    if components.next().is_some() {
        return Err(format!(
            "key sequences are not supported: `{}`",
            trigger.trim()
        ));
    }

    Keystroke::parse(first)
        .map(|keystroke| keystroke.unparse())
        .map_err(|error| format!("invalid keybind trigger `{}`: {}", first, error))
}
