//! Command palette state.
//!
//! The palette is always in exactly one of three states, so combinations
//! such as "closed but creating a property" cannot be expressed. Side
//! effects stay with the caller: [`CommandPalette::activate`] hands back the
//! selected action, and [`CommandPalette::submit`] hands back the request to
//! send.

use tably_api::{NewProperty, PropertyKind};
use tably_search::CommandFilter;

use crate::commands::{CommandAction, CommandPaletteEntry};
use crate::text_input::TextInputState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseState {
    pub query: TextInputState,
    pub selected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftFocus {
    #[default]
    Name,
    Kind,
}

/// The inline "Add Property" form. `in_flight` marks the draft whose
/// request is pending; a draft opened while another request is still out
/// stays editable but cannot be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyDraft {
    pub name: TextInputState,
    pub kind: PropertyKind,
    pub focus: DraftFocus,
    pub in_flight: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaletteState {
    #[default]
    Closed,
    Browsing(BrowseState),
    CreatingProperty {
        /// Restored when the form is cancelled.
        browse: BrowseState,
        draft: PropertyDraft,
    },
}

/// Outcome of feeding a create-property result back into the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationOutcome {
    Closed,
    KeptOpenWithError,
    Ignored,
}

pub struct CommandPalette {
    commands: Vec<CommandPaletteEntry>,
    filter: CommandFilter,
    state: PaletteState,
    /// Outlives the draft that sent it: cancelling or closing the form does
    /// not cancel the request.
    request_pending: bool,
}

impl CommandPalette {
    pub fn new(commands: Vec<CommandPaletteEntry>) -> Self {
        Self {
            commands,
            filter: CommandFilter::new(),
            state: PaletteState::Closed,
            request_pending: false,
        }
    }

    pub fn state(&self) -> &PaletteState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, PaletteState::Closed)
    }

    pub fn is_creating_property(&self) -> bool {
        matches!(self.state, PaletteState::CreatingProperty { .. })
    }

    pub fn commands(&self) -> &[CommandPaletteEntry] {
        &self.commands
    }

    /// Replace the registry, keeping the selection inside the new list.
    pub fn set_commands(&mut self, commands: Vec<CommandPaletteEntry>) {
        self.commands = commands;
        self.filter.invalidate();
        let len = self.filtered_len();
        if let PaletteState::Browsing(browse) = &mut self.state {
            browse.selected = clamp_selection(browse.selected, len);
        }
    }

    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        self.state = PaletteState::Browsing(BrowseState::default());
    }

    pub fn close(&mut self) {
        self.state = PaletteState::Closed;
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn query(&self) -> Option<&str> {
        match &self.state {
            PaletteState::Browsing(browse) => Some(browse.query.text()),
            _ => None,
        }
    }

    pub fn query_input(&self) -> Option<&TextInputState> {
        match &self.state {
            PaletteState::Browsing(browse) => Some(&browse.query),
            _ => None,
        }
    }

    /// Apply an edit to the query. The selection goes back to the first
    /// entry whenever the text changes.
    pub fn edit_query(&mut self, edit: impl FnOnce(&mut TextInputState)) {
        let PaletteState::Browsing(browse) = &mut self.state else {
            return;
        };
        let before = browse.query.text().to_string();
        edit(&mut browse.query);
        if browse.query.text() != before {
            browse.selected = 0;
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.edit_query(|input| input.set_text(query));
    }

    /// Filtered commands for the current query; empty while closed.
    pub fn filtered(&mut self) -> Vec<&CommandPaletteEntry> {
        let query = match &self.state {
            PaletteState::Browsing(browse) => browse.query.text(),
            _ => return Vec::new(),
        };
        let commands = &self.commands;
        self.filter
            .indices(commands, query)
            .iter()
            .map(|&index| &commands[index])
            .collect()
    }

    fn filtered_len(&mut self) -> usize {
        let query = match &self.state {
            PaletteState::Browsing(browse) => browse.query.text(),
            _ => return 0,
        };
        self.filter.indices(&self.commands, query).len()
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.state {
            PaletteState::Browsing(browse) => Some(browse.selected),
            _ => None,
        }
    }

    pub fn select_next(&mut self) {
        let len = self.filtered_len();
        if let PaletteState::Browsing(browse) = &mut self.state
            && browse.selected + 1 < len
        {
            browse.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if let PaletteState::Browsing(browse) = &mut self.state {
            browse.selected = browse.selected.saturating_sub(1);
        }
    }

    /// Action of the selected entry, if the filtered list is non-empty.
    pub fn activate(&mut self) -> Option<CommandAction> {
        let selected = self.selected_index()?;
        let filtered = self.filtered();
        let index = clamp_selection(selected, filtered.len());
        filtered.get(index).map(|entry| entry.action)
    }

    /// Action of the entry at `index` in the filtered list, for clicks.
    pub fn activate_at(&mut self, index: usize) -> Option<CommandAction> {
        let action = self.filtered().get(index).map(|entry| entry.action)?;
        if let PaletteState::Browsing(browse) = &mut self.state {
            browse.selected = index;
        }
        Some(action)
    }

    pub fn begin_property_creation(&mut self) -> bool {
        let PaletteState::Browsing(browse) = &mut self.state else {
            return false;
        };
        let browse = std::mem::take(browse);
        self.state = PaletteState::CreatingProperty {
            browse,
            draft: PropertyDraft::default(),
        };
        true
    }

    pub fn cancel_property_creation(&mut self) -> bool {
        let PaletteState::CreatingProperty { browse, .. } = &mut self.state else {
            return false;
        };
        let browse = std::mem::take(browse);
        self.state = PaletteState::Browsing(browse);
        true
    }

    pub fn draft(&self) -> Option<&PropertyDraft> {
        match &self.state {
            PaletteState::CreatingProperty { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Edits are refused while a request is in flight.
    pub fn edit_draft(&mut self, edit: impl FnOnce(&mut PropertyDraft)) {
        if let PaletteState::CreatingProperty { draft, .. } = &mut self.state
            && !draft.in_flight
        {
            edit(draft);
        }
    }

    pub fn cycle_kind(&mut self, forward: bool) {
        self.edit_draft(|draft| {
            draft.kind = if forward {
                draft.kind.next()
            } else {
                draft.kind.previous()
            };
        });
    }

    pub fn toggle_draft_focus(&mut self) {
        self.edit_draft(|draft| {
            draft.focus = match draft.focus {
                DraftFocus::Name => DraftFocus::Kind,
                DraftFocus::Kind => DraftFocus::Name,
            };
        });
    }

    /// True from `submit` until `finish_creation`, whichever form is showing.
    pub fn is_request_pending(&self) -> bool {
        self.request_pending
    }

    pub fn can_submit(&self) -> bool {
        !self.request_pending && self.draft().is_some_and(|draft| !draft.name.is_blank())
    }

    /// Marks the draft in flight and returns the request to send. Returns
    /// `None` (and changes nothing) for blank names or while a request is
    /// already pending.
    pub fn submit(&mut self) -> Option<NewProperty> {
        if !self.can_submit() {
            return None;
        }
        let PaletteState::CreatingProperty { draft, .. } = &mut self.state else {
            return None;
        };

        draft.in_flight = true;
        draft.error = None;
        self.request_pending = true;
        Some(NewProperty::manual(draft.name.text().trim(), draft.kind))
    }

    /// Only the draft that sent the request reacts to its result.
    pub fn finish_creation(&mut self, result: Result<(), String>) -> CreationOutcome {
        self.request_pending = false;
        let PaletteState::CreatingProperty { draft, .. } = &mut self.state else {
            return CreationOutcome::Ignored;
        };
        if !draft.in_flight {
            return CreationOutcome::Ignored;
        }

        match result {
            Ok(()) => {
                self.close();
                CreationOutcome::Closed
            }
            Err(message) => {
                draft.in_flight = false;
                draft.error = Some(message);
                CreationOutcome::KeptOpenWithError
            }
        }
    }
}

fn clamp_selection(selected: usize, len: usize) -> usize {
    selected.min(len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> CommandPalette {
        CommandPalette::new(CommandAction::palette_entries())
    }

    fn titles(palette: &mut CommandPalette) -> Vec<&'static str> {
        palette.filtered().iter().map(|entry| entry.title).collect()
    }

    fn creating(palette: &mut CommandPalette, name: &str) {
        palette.open();
        assert!(palette.begin_property_creation());
        palette.edit_draft(|draft| draft.name.set_text(name));
    }

    #[test]
    fn opens_with_empty_query_and_first_selection() {
        let mut palette = palette();
        assert!(!palette.is_open());
        assert!(palette.filtered().is_empty());

        palette.open();
        assert_eq!(palette.query(), Some(""));
        assert_eq!(palette.selected_index(), Some(0));
        assert_eq!(titles(&mut palette), vec!["Add Property", "Ask Go"]);
    }

    #[test]
    fn reopening_discards_previous_query() {
        let mut palette = palette();
        palette.open();
        palette.set_query("go");
        palette.select_next();
        palette.close();

        palette.open();
        assert_eq!(palette.query(), Some(""));
        assert_eq!(palette.selected_index(), Some(0));
    }

    #[test]
    fn toggle_opens_and_closes() {
        let mut palette = palette();
        palette.toggle();
        assert!(palette.is_open());
        palette.toggle();
        assert_eq!(palette.state(), &PaletteState::Closed);
    }

    #[test]
    fn query_filters_commands() {
        let mut palette = palette();
        palette.open();

        palette.set_query("add");
        assert_eq!(titles(&mut palette), vec!["Add Property"]);
        palette.set_query("go");
        assert_eq!(titles(&mut palette), vec!["Ask Go"]);
        palette.set_query("assist");
        assert_eq!(titles(&mut palette), vec!["Ask Go"]);
        palette.set_query("xyz");
        assert!(titles(&mut palette).is_empty());
        assert_eq!(palette.activate(), None);
    }

    #[test]
    fn navigation_clamps_without_wrapping() {
        let mut palette = palette();
        palette.open();

        palette.select_previous();
        assert_eq!(palette.selected_index(), Some(0));
        palette.select_next();
        assert_eq!(palette.selected_index(), Some(1));
        palette.select_next();
        assert_eq!(palette.selected_index(), Some(1));
        assert_eq!(palette.activate(), Some(CommandAction::AskGo));

        palette.select_previous();
        assert_eq!(palette.activate(), Some(CommandAction::AddProperty));
    }

    #[test]
    fn editing_the_query_resets_selection() {
        let mut palette = palette();
        palette.open();
        palette.select_next();
        palette.edit_query(|input| input.insert_str("a"));
        assert_eq!(palette.selected_index(), Some(0));

        palette.select_next();
        palette.edit_query(|input| {
            input.move_to_end();
        });
        assert_eq!(palette.selected_index(), Some(1));
    }

    #[test]
    fn shrinking_registry_clamps_selection() {
        let mut palette = palette();
        palette.open();
        palette.select_next();
        assert_eq!(palette.selected_index(), Some(1));

        let first_only = CommandAction::palette_entries()[..1].to_vec();
        palette.set_commands(first_only);
        assert_eq!(palette.selected_index(), Some(0));

        palette.set_commands(Vec::new());
        assert_eq!(palette.selected_index(), Some(0));
        assert_eq!(palette.activate(), None);
    }

    #[test]
    fn add_property_flow_round_trips_through_cancel() {
        let mut palette = palette();
        palette.open();
        palette.set_query("prop");
        assert_eq!(palette.activate(), Some(CommandAction::AddProperty));
        assert!(palette.begin_property_creation());
        assert!(palette.is_creating_property());
        assert_eq!(palette.query(), None);
        assert!(!palette.can_submit());

        assert!(palette.cancel_property_creation());
        assert_eq!(palette.query(), Some("prop"));
        assert!(!palette.cancel_property_creation());
    }

    #[test]
    fn whitespace_name_is_rejected_without_side_effects() {
        let mut palette = palette();
        creating(&mut palette, "   ");

        let before = palette.state().clone();
        assert_eq!(palette.submit(), None);
        assert_eq!(palette.state(), &before);
        assert!(!palette.draft().unwrap().in_flight);
    }

    #[test]
    fn submit_trims_name_and_blocks_second_request() {
        let mut palette = palette();
        creating(&mut palette, "  Due date ");
        palette.cycle_kind(true);
        palette.cycle_kind(true);

        let request = palette.submit().expect("request");
        assert_eq!(request.name, "Due date");
        assert_eq!(request.kind, PropertyKind::Json);
        assert_eq!(request.tool, "manual");

        assert!(palette.draft().unwrap().in_flight);
        assert!(!palette.can_submit());
        assert_eq!(palette.submit(), None);

        palette.cycle_kind(true);
        palette.edit_draft(|draft| draft.name.clear());
        let draft = palette.draft().unwrap();
        assert_eq!(draft.kind, PropertyKind::Json);
        assert_eq!(draft.name.text(), "  Due date ");
    }

    #[test]
    fn successful_creation_closes() {
        let mut palette = palette();
        creating(&mut palette, "Notes");
        palette.submit().expect("request");

        assert_eq!(palette.finish_creation(Ok(())), CreationOutcome::Closed);
        assert!(!palette.is_open());
    }

    #[test]
    fn failed_creation_stays_open_and_allows_retry() {
        let mut palette = palette();
        creating(&mut palette, "Notes");
        palette.submit().expect("request");

        assert_eq!(
            palette.finish_creation(Err("Failed to add property: 500".to_string())),
            CreationOutcome::KeptOpenWithError
        );
        let draft = palette.draft().unwrap();
        assert!(!draft.in_flight);
        assert_eq!(draft.error.as_deref(), Some("Failed to add property: 500"));

        let retry = palette.submit().expect("retry");
        assert_eq!(retry.name, "Notes");
        assert_eq!(palette.draft().unwrap().error, None);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut palette = palette();
        assert_eq!(palette.finish_creation(Ok(())), CreationOutcome::Ignored);

        creating(&mut palette, "Notes");
        assert_eq!(palette.finish_creation(Ok(())), CreationOutcome::Ignored);
        assert!(palette.is_creating_property());

        palette.submit().expect("request");
        palette.cancel_property_creation();
        assert_eq!(palette.finish_creation(Ok(())), CreationOutcome::Ignored);
        assert_eq!(palette.query(), Some(""));
    }

    #[test]
    fn pending_request_survives_cancel_and_reopen() {
        let mut palette = palette();
        creating(&mut palette, "First");
        palette.submit().expect("request");
        palette.cancel_property_creation();
        palette.close();

        creating(&mut palette, "Second");
        assert!(palette.is_request_pending());
        assert!(!palette.can_submit());
        assert_eq!(palette.submit(), None);
        assert_eq!(palette.draft().unwrap().name.text(), "Second");

        // The earlier request finishing frees the new form without closing it.
        assert_eq!(palette.finish_creation(Ok(())), CreationOutcome::Ignored);
        assert!(palette.is_creating_property());
        assert!(!palette.is_request_pending());
        assert_eq!(palette.submit().expect("request").name, "Second");
    }

    #[test]
    fn draft_focus_toggles_between_fields() {
        let mut palette = palette();
        creating(&mut palette, "");
        assert_eq!(palette.draft().unwrap().focus, DraftFocus::Name);
        palette.toggle_draft_focus();
        assert_eq!(palette.draft().unwrap().focus, DraftFocus::Kind);
        palette.cycle_kind(false);
        assert_eq!(palette.draft().unwrap().kind, PropertyKind::Url);
    }
}
