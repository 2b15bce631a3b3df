use crate::config::{parse_keybind_lines, read_config};

const DEFAULT_KEYBINDS: &[(&str, &str)] = &[
    ("ctrl-k", "toggle_command_palette"),
    ("ctrl-q", "quit"),
    ("q", "quit"),
    ("ctrl-a", "select_all"),
    ("delete", "delete_selected"),
    ("space", "toggle_row_selection"),
    ("up", "row_up"),
    ("k", "row_up"),
    ("down", "row_down"),
    ("j", "row_down"),
    ("ctrl-r", "reload"),
];

pub enum KeybindDirective {
    Clear,
    Bind { trigger: String, action: String },
    Unbind { trigger: String },
}

pub fn run() {
    for (trigger, action) in resolve(&read_config()) {
        println!("{} = {}", trigger, action);
    }
}

/// Defaults with the config file's directives applied in order.
fn resolve(contents: &str) -> Vec<(String, String)> {
    let mut keybinds = DEFAULT_KEYBINDS
        .iter()
        .map(|(trigger, action)| (trigger.to_string(), action.to_string()))
        .collect::<Vec<_>>();

    for directive in parse_keybind_lines(contents) {
        match directive {
            KeybindDirective::Clear => keybinds.clear(),
            KeybindDirective::Bind { trigger, action } => {
                // Remove existing binding for this trigger
                keybinds.retain(|(t, _)| t != &trigger);
                keybinds.push((trigger, action));
            }
            KeybindDirective::Unbind { trigger } => {
                keybinds.retain(|(t, _)| t != &trigger);
            }
        }
    }

    keybinds
}
