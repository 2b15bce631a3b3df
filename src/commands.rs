use tably_search::Searchable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPaletteSpec {
    pub title: &'static str,
    pub description: &'static str,
}

/// A command as listed in the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPaletteEntry {
    pub action: CommandAction,
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

impl Searchable for CommandPaletteEntry {
    fn name(&self) -> &str {
        self.title
    }

    fn description(&self) -> &str {
        self.description
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub action: CommandAction,
    pub config_name: &'static str,
    pub palette: Option<CommandPaletteSpec>,
}

const fn palette(title: &'static str, description: &'static str) -> CommandPaletteSpec {
    CommandPaletteSpec { title, description }
}

const fn command(
    action: CommandAction,
    config_name: &'static str,
    palette: Option<CommandPaletteSpec>,
) -> CommandSpec {
    CommandSpec {
        action,
        config_name,
        palette,
    }
}

macro_rules! define_commands {
    ($(($variant:ident, $config_name:literal, $palette:expr)),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum CommandAction {
            $( $variant, )+
        }

        const COMMAND_SPECS: &[CommandSpec] = &[
            $(command(CommandAction::$variant, $config_name, $palette),)+
        ];

        impl CommandAction {
            #[cfg(test)]
            pub fn specs() -> &'static [CommandSpec] {
                COMMAND_SPECS
            }

            pub fn from_config_name(name: &str) -> Option<Self> {
                let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
                COMMAND_SPECS
                    .iter()
                    .find_map(|spec| (spec.config_name == normalized).then_some(spec.action))
            }

            pub fn config_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $config_name,)+
                }
            }

            pub fn all_config_names() -> impl std::iter::ExactSizeIterator<Item = &'static str> {
                COMMAND_SPECS.iter().map(|spec| spec.config_name)
            }

            pub fn palette_entries() -> Vec<CommandPaletteEntry> {
                COMMAND_SPECS
                    .iter()
                    .filter_map(|spec| {
                        let palette = spec.palette?;
                        Some(CommandPaletteEntry {
                            action: spec.action,
                            id: spec.config_name,
                            title: palette.title,
                            description: palette.description,
                        })
                    })
                    .collect()
            }
        }
    };
}

define_commands!(
    (
        AddProperty,
        "add_property",
        Some(palette("Add Property", "Add a new property to the table"))
    ),
    (
        AskGo,
        "ask_go",
        Some(palette("Ask Go", "Ask Go AI assistant for help"))
    ),
    (ToggleCommandPalette, "toggle_command_palette", None),
    (Quit, "quit", None),
    (SelectAll, "select_all", None),
    (DeleteSelected, "delete_selected", None),
    (ToggleRowSelection, "toggle_row_selection", None),
    (RowUp, "row_up", None),
    (RowDown, "row_down", None),
    (Reload, "reload", None),
);

#[cfg(test)]
mod tests {
    use super::CommandAction;
    use std::collections::HashSet;

    #[test]
    fn command_catalog_contains_unique_actions_and_names() {
        let mut actions = HashSet::new();
        let mut names = HashSet::new();
        for spec in CommandAction::specs() {
            assert!(actions.insert(spec.action), "duplicate action in catalog");
            assert!(names.insert(spec.config_name), "duplicate config name");
            assert_eq!(spec.action.config_name(), spec.config_name);
        }

        assert_eq!(names.len(), CommandAction::all_config_names().len());
    }

    #[test]
    fn palette_lists_add_property_then_ask_go() {
        let entries = CommandAction::palette_entries();
        assert_eq!(
            entries.iter().map(|entry| entry.id).collect::<Vec<_>>(),
            vec!["add_property", "ask_go"]
        );
        assert_eq!(entries[0].title, "Add Property");
        assert_eq!(entries[1].description, "Ask Go AI assistant for help");
    }

    #[test]
    fn config_names_accept_dashes_and_case() {
        assert_eq!(
            CommandAction::from_config_name("Toggle-Command-Palette"),
            Some(CommandAction::ToggleCommandPalette)
        );
        assert_eq!(CommandAction::from_config_name("zoom_in"), None);
    }
}
