use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use log::info;
use ratatui::layout::{Position, Rect};
use tably_toast::{ToastKind, ToastManager};

use crate::commands::CommandAction;
use crate::config::AppConfig;
use crate::keybindings::{self, Keymap, Keystroke};
use crate::palette::{CommandPalette, CreationOutcome};
use crate::project::{ProjectStore, StoreEvent};

mod command_palette;
mod render;
mod selection;

pub use selection::RowSelection;

const CHECKBOX_COLUMN_WIDTH: u16 = 3;

/// Screen regions from the last frame, used to route mouse clicks.
#[derive(Debug, Clone, Copy, Default)]
struct HitAreas {
    hint: Rect,
    table_header: Rect,
    table_body: Rect,
    table_offset: usize,
    palette: Option<Rect>,
    palette_list: Option<Rect>,
    palette_list_offset: usize,
    /// The "Ask Go about ..." line shown when nothing matches.
    palette_fallback: Option<Rect>,
}

pub struct TableView {
    store: ProjectStore,
    palette: CommandPalette,
    keymap: Keymap,
    selection: RowSelection,
    toasts: ToastManager,
    palette_max_items: usize,
    creation_toast: Option<u64>,
    hit_areas: HitAreas,
    should_quit: bool,
}

impl TableView {
    pub fn new(config: &AppConfig, store: ProjectStore) -> Self {
        Self {
            store,
            palette: CommandPalette::new(CommandAction::palette_entries()),
            keymap: keybindings::load_keymap(config),
            selection: RowSelection::default(),
            toasts: ToastManager::new(config.toast_duration()),
            palette_max_items: config.palette_max_items,
            creation_toast: None,
            hit_areas: HitAreas::default(),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn load(&mut self) {
        self.store.load();
    }

    fn row_count(&self) -> usize {
        self.store.entities().len()
    }

    /// Drains worker results and queued toasts. Call once per frame.
    pub fn tick(&mut self) {
        for event in self.store.poll() {
            self.handle_store_event(event);
        }
        self.toasts.ingest_pending();
        self.toasts.tick();
    }

    fn handle_store_event(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::Loaded { .. } => {
                self.selection.retain_present(self.store.entities());
            }
            StoreEvent::LoadFailed(message) => {
                self.selection.retain_present(&[]);
                tably_toast::error_long(format!("Failed to load project: {}", message));
            }
            StoreEvent::PropertyAdded(property) => {
                if self.palette.finish_creation(Ok(())) == CreationOutcome::Ignored {
                    info!("Property {} created after the form was closed", property.name);
                }
                self.finish_creation_toast(
                    ToastKind::Success,
                    format!("Added property \"{}\"", property.name),
                );
            }
            StoreEvent::PropertyFailed(message) => {
                let message = format!("Failed to create property: {}", message);
                self.palette.finish_creation(Err(message.clone()));
                self.finish_creation_toast(ToastKind::Error, message);
            }
        }
    }

    fn finish_creation_toast(&mut self, kind: ToastKind, message: String) {
        match self.creation_toast.take() {
            Some(id) => tably_toast::update_toast(id, kind, message),
            None => {
                tably_toast::enqueue_toast(kind, message, None);
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let Some(keystroke) = keybindings::keystroke_from_event(&key) else {
            return;
        };

        // The palette shortcut works from every state, including the form.
        let action = self.keymap.action_for(&keystroke);
        if action == Some(CommandAction::ToggleCommandPalette) {
            self.palette.toggle();
            return;
        }

        if self.palette.is_open() {
            self.handle_palette_key(&key);
            return;
        }

        if let Some(action) = action {
            self.execute(action);
        }
    }

    fn execute(&mut self, action: CommandAction) {
        match action {
            CommandAction::AddProperty => {
                self.palette.open();
                self.palette.begin_property_creation();
            }
            CommandAction::AskGo => {
                self.palette.close();
                info!("Ask Go requested");
                tably_toast::info("Ask Go is not available yet");
            }
            CommandAction::ToggleCommandPalette => self.palette.toggle(),
            CommandAction::Quit => self.should_quit = true,
            CommandAction::SelectAll => self.selection.toggle_all(self.store.entities()),
            CommandAction::DeleteSelected => self.delete_selected(),
            CommandAction::ToggleRowSelection => {
                self.selection.toggle_cursor_row(self.store.entities());
            }
            CommandAction::RowUp => self.selection.move_up(),
            CommandAction::RowDown => self.selection.move_down(self.row_count()),
            CommandAction::Reload => {
                self.store.load();
                tably_toast::info("Reloading project");
            }
        }
    }

    fn delete_selected(&mut self) {
        if self.selection.count() == 0 {
            return;
        }

        let ids = self.selection.selected_ids(self.store.entities());
        info!(
            "Delete requested for {} entities ({}); deletion is not implemented",
            ids.len(),
            ids.join(", ")
        );
        self.selection.clear();
        tably_toast::warning("Deleting entities is not supported yet");
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let position = Position::new(mouse.column, mouse.row);
        let areas = self.hit_areas;

        if self.palette.is_open() {
            match areas.palette {
                Some(palette) if palette.contains(position) => {
                    if areas
                        .palette_fallback
                        .is_some_and(|fallback| fallback.contains(position))
                    {
                        self.execute(CommandAction::AskGo);
                    } else if let Some(list) = areas.palette_list
                        && list.contains(position)
                    {
                        let index = areas.palette_list_offset + usize::from(position.y - list.y);
                        if let Some(action) = self.palette.activate_at(index) {
                            self.execute(action);
                        }
                    }
                }
                _ => self.palette.close(),
            }
            return;
        }

        if areas.hint.contains(position) {
            self.palette.open();
        } else if areas.table_header.contains(position) {
            if position.x < areas.table_header.x + CHECKBOX_COLUMN_WIDTH {
                self.selection.toggle_all(self.store.entities());
            }
        } else if areas.table_body.contains(position) {
            let row = areas.table_offset + usize::from(position.y - areas.table_body.y);
            let row_count = self.row_count();
            if let Some(entity) = self.store.entities().get(row) {
                self.selection.set_cursor(row, row_count);
                if position.x < areas.table_body.x + CHECKBOX_COLUMN_WIDTH {
                    self.selection.toggle(entity);
                }
            }
        }
    }

    fn palette_trigger(&self) -> Option<&Keystroke> {
        self.keymap
            .triggers_for(CommandAction::ToggleCommandPalette)
            .next()
    }
}

#[cfg(test)]
mod tests {
    use super::TableView;
    use crate::config::{AppConfig, ProjectTarget};
    use crate::palette::PaletteState;
    use crate::project::{ProjectStore, StoreEvent};
    use anyhow::Result;
    use crossterm::event::{
        Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::{thread, time::Duration};
    use tably_api::{Entity, NewProperty, Project, ProjectApi, Property, PropertyType};

    #[derive(Default)]
    struct StaticApi {
        requests: Mutex<Vec<NewProperty>>,
    }

    impl ProjectApi for StaticApi {
        fn get_project(&self, _workspace_id: &str, _project_id: &str) -> Result<Project> {
            Ok(project())
        }

        fn get_entities(&self, _workspace_id: &str, _project_id: &str) -> Result<Vec<Entity>> {
            Ok(entities())
        }

        fn add_property(
            &self,
            _workspace_id: &str,
            _project_id: &str,
            property: &NewProperty,
        ) -> Result<Property> {
            self.requests.lock().unwrap().push(property.clone());
            Ok(Property {
                id: "p-new".to_string(),
                name: property.name.clone(),
                slug: "due".to_string(),
                kind: PropertyType::Known(property.kind),
            })
        }
    }

    fn project() -> Project {
        serde_json::from_value(json!({
            "id": "proj",
            "name": "Contracts",
            "properties": [
                {"id": "a", "name": "Title", "slug": "title", "type": "text"},
                {"id": "b", "name": "Compliant", "slug": "compliant", "type": "text"}
            ]
        }))
        .unwrap()
    }

    fn entities() -> Vec<Entity> {
        serde_json::from_value(json!([
            {"id": "e1", "fields": {"title": "Alpha", "compliant": "Yes"}},
            {"id": "e2", "fields": {"title": "Beta", "compliant": "No"}}
        ]))
        .unwrap()
    }

    fn view() -> (TableView, Arc<StaticApi>) {
        let api = Arc::new(StaticApi::default());
        let target = ProjectTarget {
            workspace_id: "ws".to_string(),
            project_id: "proj".to_string(),
        };
        let store = ProjectStore::new(api.clone(), target);
        let mut view = TableView::new(&AppConfig::from_contents(""), store);
        view.store.inject(StoreEvent::Loaded {
            project: project(),
            entities: entities(),
        });
        view.tick();
        (view, api)
    }

    fn screen(view: &mut TableView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| view.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn press(view: &mut TableView, code: KeyCode, modifiers: KeyModifiers) {
        view.handle_event(Event::Key(KeyEvent::new(code, modifiers)));
    }

    fn type_text(view: &mut TableView, text: &str) {
        for ch in text.chars() {
            press(view, KeyCode::Char(ch), KeyModifiers::NONE);
        }
    }

    fn click(view: &mut TableView, column: u16, row: u16) {
        view.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    fn open_palette(view: &mut TableView) {
        press(view, KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert!(view.palette.is_open());
    }

    #[test]
    fn renders_hint_header_and_typed_cells() {
        let (mut view, _) = view();
        let screen = screen(&mut view);

        assert!(screen.contains("Contracts"));
        assert!(screen.contains("Press Ctrl+K to add properties"));
        assert!(screen.contains("Title (text)"));
        assert!(screen.contains("Alpha"));
        assert!(screen.contains("Yes"));
        assert!(screen.contains("No"));
        assert!(!screen.contains("selected"));
    }

    #[test]
    fn select_all_shows_footer_and_delete_clears_it() {
        let (mut view, _) = view();
        press(&mut view, KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert!(screen(&mut view).contains("2 of 2 selected"));

        press(&mut view, KeyCode::Down, KeyModifiers::NONE);
        press(&mut view, KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(screen(&mut view).contains("1 of 2 selected"));

        press(&mut view, KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(view.selection.count(), 0);
        assert!(!screen(&mut view).contains("selected"));
    }

    #[test]
    fn palette_filters_and_runs_ask_go() {
        let (mut view, _) = view();
        open_palette(&mut view);
        let screen_text = screen(&mut view);
        assert!(screen_text.contains("Add Property"));
        assert!(screen_text.contains("Ask Go AI assistant for help"));

        type_text(&mut view, "xyz");
        let screen_text = screen(&mut view);
        assert!(screen_text.contains("No commands found"));
        assert!(screen_text.contains("Ask Go about \"xyz\""));

        for _ in 0..3 {
            press(&mut view, KeyCode::Backspace, KeyModifiers::NONE);
        }
        type_text(&mut view, "go");
        assert_eq!(view.palette.query(), Some("go"));
        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);
        assert!(!view.palette.is_open());
    }

    #[test]
    fn table_shortcuts_are_text_while_palette_is_open() {
        let (mut view, _) = view();
        open_palette(&mut view);
        type_text(&mut view, "q");
        assert!(!view.should_quit());
        assert_eq!(view.palette.query(), Some("q"));

        press(&mut view, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!view.palette.is_open());
        type_text(&mut view, "q");
        assert!(view.should_quit());
    }

    #[test]
    fn blank_property_name_sends_nothing() {
        let (mut view, api) = view();
        open_palette(&mut view);
        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);
        assert!(view.palette.is_creating_property());

        type_text(&mut view, "   ");
        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);
        assert!(view.palette.is_creating_property());
        assert!(!view.palette.draft().unwrap().in_flight);
        assert!(api.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn escape_in_form_returns_to_the_filtered_list() {
        let (mut view, _) = view();
        open_palette(&mut view);
        type_text(&mut view, "prop");
        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);
        assert!(screen(&mut view).contains("Add Property"));

        press(&mut view, KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(view.palette.state(), PaletteState::Browsing(_)));
        assert_eq!(view.palette.query(), Some("prop"));
    }

    #[test]
    fn creating_a_property_adds_a_column() {
        let (mut view, api) = view();
        open_palette(&mut view);
        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);
        type_text(&mut view, " Due ");
        press(&mut view, KeyCode::Tab, KeyModifiers::NONE);
        press(&mut view, KeyCode::Tab, KeyModifiers::NONE);
        press(&mut view, KeyCode::Tab, KeyModifiers::NONE);
        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);
        assert!(screen(&mut view).contains("Creating..."));

        // A second Enter while the request is pending is ignored.
        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);

        for _ in 0..500 {
            view.tick();
            if !view.palette.is_open() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }

        assert!(!view.palette.is_open());
        let requests = api.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "Due");
        assert_eq!(requests[0].kind.as_str(), "url");
        drop(requests);
        assert!(screen(&mut view).contains("Due (url)"));
    }

    #[test]
    fn failed_creation_keeps_the_form_open() {
        let (mut view, _) = view();
        open_palette(&mut view);
        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);
        view.palette.edit_draft(|draft| draft.name.set_text("Notes"));
        view.palette.submit().expect("request");

        view.store.inject(StoreEvent::PropertyFailed(
            "Failed to add property: 500 Internal Server Error\nboom".to_string(),
        ));
        view.tick();

        let draft = view.palette.draft().expect("form stays open");
        assert!(!draft.in_flight);
        assert!(screen(&mut view).contains("Failed to create property: Failed to add property: 500"));
    }

    #[test]
    fn mouse_opens_runs_and_dismisses_the_palette() {
        let (mut view, _) = view();
        screen(&mut view);
        click(&mut view, 15, 0);
        assert!(view.palette.is_open());

        screen(&mut view);
        click(&mut view, 0, 19);
        assert!(!view.palette.is_open());

        open_palette(&mut view);
        screen(&mut view);
        click(&mut view, 20, 6);
        assert!(!view.palette.is_open());

        screen(&mut view);
        click(&mut view, 1, 3);
        assert_eq!(view.selection.selected_ids(view.store.entities()), vec!["e2"]);
        assert_eq!(view.selection.cursor(), 1);
        click(&mut view, 1, 1);
        assert_eq!(view.selection.count(), 2);
    }

    #[test]
    fn load_failure_empties_the_table() {
        let (mut view, _) = view();
        press(&mut view, KeyCode::Char('a'), KeyModifiers::CONTROL);
        view.store.inject(StoreEvent::LoadFailed("offline".to_string()));
        view.tick();

        assert_eq!(view.selection.count(), 0);
        assert!(screen(&mut view).contains("No project loaded"));
    }

    #[test]
    fn checked_rows_follow_their_entities_across_reload() {
        let (mut view, _) = view();
        press(&mut view, KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(view.selection.selected_ids(view.store.entities()), vec!["e1"]);

        let mut reversed = entities();
        reversed.reverse();
        view.store.inject(StoreEvent::Loaded {
            project: project(),
            entities: reversed,
        });
        view.tick();

        assert_eq!(view.selection.selected_ids(view.store.entities()), vec!["e1"]);
        assert!(screen(&mut view).contains("1 of 2 selected"));

        view.store.inject(StoreEvent::Loaded {
            project: project(),
            entities: entities().into_iter().filter(|entity| entity.id == "e2").collect(),
        });
        view.tick();
        assert_eq!(view.selection.count(), 0);
    }

    #[test]
    fn new_form_stays_busy_while_an_earlier_request_is_pending() {
        let (mut view, api) = view();
        open_palette(&mut view);
        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);
        view.palette.edit_draft(|draft| draft.name.set_text("First"));
        view.palette.submit().expect("request");
        press(&mut view, KeyCode::Esc, KeyModifiers::NONE);

        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);
        type_text(&mut view, "Second");
        assert!(!view.palette.can_submit());
        assert!(screen(&mut view).contains("Creating..."));

        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);
        assert!(api.requests.lock().unwrap().is_empty());
        assert!(!view.palette.draft().unwrap().in_flight);

        view.store.inject(StoreEvent::PropertyAdded(Property {
            id: "p-first".to_string(),
            name: "First".to_string(),
            slug: "first".to_string(),
            kind: PropertyType::Known(tably_api::PropertyKind::Text),
        }));
        view.tick();

        assert!(view.palette.is_creating_property());
        assert_eq!(view.palette.draft().unwrap().name.text(), "Second");
        assert!(view.palette.can_submit());
        assert!(!screen(&mut view).contains("Creating..."));
    }

    #[test]
    fn ask_go_fallback_line_is_clickable() {
        let (mut view, _) = view();
        open_palette(&mut view);
        type_text(&mut view, "xyz");
        press(&mut view, KeyCode::Enter, KeyModifiers::NONE);
        assert!(view.palette.is_open());

        let screen_text = screen(&mut view);
        let (row, line) = screen_text
            .lines()
            .enumerate()
            .find(|(_, line)| line.contains("Ask Go about \"xyz\""))
            .expect("fallback line");
        let column = line[..line.find("Ask Go").unwrap()].chars().count() as u16;
        click(&mut view, column, row as u16);
        assert!(!view.palette.is_open());
    }
}
