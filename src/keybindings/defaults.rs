use crate::commands::CommandAction;

#[derive(Debug, Clone, Copy)]
pub struct DefaultKeybind {
    pub trigger: &'static str,
    pub action: CommandAction,
}

const fn bind(trigger: &'static str, action: CommandAction) -> DefaultKeybind {
    DefaultKeybind { trigger, action }
}

pub fn default_keybinds() -> Vec<DefaultKeybind> {
    vec![
        bind("ctrl-k", CommandAction::ToggleCommandPalette),
        bind("ctrl-q", CommandAction::Quit),
        bind("q", CommandAction::Quit),
        bind("ctrl-a", CommandAction::SelectAll),
        bind("delete", CommandAction::DeleteSelected),
        bind("space", CommandAction::ToggleRowSelection),
        // Rows
        bind("up", CommandAction::RowUp),
        bind("k", CommandAction::RowUp),
        bind("down", CommandAction::RowDown),
        bind("j", CommandAction::RowDown),
        bind("ctrl-r", CommandAction::Reload),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::config::canonicalize_trigger;

    #[test]
    fn ctrl_k_toggles_the_palette() {
        let palette_triggers = default_keybinds()
            .into_iter()
            .filter(|binding| binding.action == CommandAction::ToggleCommandPalette)
            .map(|binding| binding.trigger)
            .collect::<Vec<_>>();

        assert_eq!(palette_triggers, vec!["ctrl-k"]);
    }

    #[test]
    fn palette_commands_are_unbound_by_default() {
        let defaults = default_keybinds();
        assert!(
            defaults
                .iter()
                .all(|binding| binding.action != CommandAction::AddProperty)
        );
        assert!(
            defaults
                .iter()
                .all(|binding| binding.action != CommandAction::AskGo)
        );
    }

    #[test]
    fn defaults_are_already_canonical() {
        for binding in default_keybinds() {
            assert_eq!(
                canonicalize_trigger(binding.trigger).as_deref(),
                Ok(binding.trigger)
            );
        }
    }
}
