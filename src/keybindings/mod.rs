mod config;
mod defaults;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;

use crate::commands::CommandAction;
use crate::config::AppConfig;

pub use self::config::Keystroke;
use self::config::{KeybindDirective, canonicalize_trigger, parse_keybind_directives};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedKeybind {
    trigger: String,
    action: CommandAction,
}

/// Table-level shortcuts. Only consulted while the palette is closed; the
/// palette handles its own keys.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<(Keystroke, CommandAction)>,
}

impl Keymap {
    pub fn action_for(&self, keystroke: &Keystroke) -> Option<CommandAction> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == keystroke)
            .map(|(_, action)| *action)
    }

    pub fn triggers_for(&self, action: CommandAction) -> impl Iterator<Item = &Keystroke> {
        self.bindings
            .iter()
            .filter(move |(_, bound)| *bound == action)
            .map(|(keystroke, _)| keystroke)
    }

    fn from_resolved(resolved: Vec<ResolvedKeybind>) -> Self {
        let bindings = resolved
            .into_iter()
            .filter_map(|binding| match Keystroke::parse(&binding.trigger) {
                Ok(keystroke) => Some((keystroke, binding.action)),
                Err(error) => {
                    warn!("Dropping keybind `{}`: {}", binding.trigger, error);
                    None
                }
            })
            .collect();
        Self { bindings }
    }
}

pub fn load_keymap(config: &AppConfig) -> Keymap {
    let (directives, warnings) = parse_keybind_directives(&config.keybind_lines);
    if !warnings.is_empty() {
        for warning in &warnings {
            warn!(
                "Ignoring invalid keybind at config line {}: {}",
                warning.line_number, warning.message
            );
        }
        let noun = if warnings.len() == 1 { "line" } else { "lines" };
        tably_toast::warning(format!(
            "Ignored {} invalid keybind {}",
            warnings.len(),
            noun
        ));
    }

    let default_bindings = defaults::default_keybinds()
        .into_iter()
        .filter_map(|binding| match canonicalize_trigger(binding.trigger) {
            Ok(trigger) => Some(ResolvedKeybind {
                trigger,
                action: binding.action,
            }),
            Err(error) => {
                warn!(
                    "Skipping invalid built-in keybind `{}`: {}",
                    binding.trigger, error
                );
                None
            }
        })
        .collect::<Vec<_>>();

    Keymap::from_resolved(resolve_keybinds(default_bindings, &directives))
}

fn resolve_keybinds(
    mut bindings: Vec<ResolvedKeybind>,
    directives: &[KeybindDirective],
) -> Vec<ResolvedKeybind> {
    for directive in directives {
        match directive {
            KeybindDirective::Clear => bindings.clear(),
            KeybindDirective::Unbind { trigger } => {
                bindings.retain(|binding| binding.trigger != *trigger);
            }
            KeybindDirective::Bind { trigger, action } => {
                bindings.retain(|binding| binding.trigger != *trigger);
                bindings.push(ResolvedKeybind {
                    trigger: trigger.clone(),
                    action: *action,
                });
            }
        }
    }

    bindings
}

/// Maps a terminal key event to a keystroke in trigger form. Returns `None`
/// for keys no trigger can name.
pub fn keystroke_from_event(event: &KeyEvent) -> Option<Keystroke> {
    let mut shift = event.modifiers.contains(KeyModifiers::SHIFT);
    let key = match event.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(ch) => {
            if ch.is_alphabetic() {
                shift |= ch.is_uppercase();
            } else {
                // Shifted symbols already arrive as their own character.
                shift = false;
            }
            ch.to_lowercase().collect()
        }
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "escape".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => {
            shift = true;
            "tab".to_string()
        }
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::F(number) => format!("f{}", number),
        _ => return None,
    };

    Some(Keystroke {
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL)
            || event.modifiers.contains(KeyModifiers::SUPER),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        shift,
        key,
    })
}
