use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tably_api::PropertyKind;

use super::TableView;
use crate::palette::{DraftFocus, PaletteState, PropertyDraft};
use crate::text_input::TextInputState;

const PALETTE_WIDTH: u16 = 64;
const PALETTE_TOP_MARGIN: u16 = 2;
const BROWSE_HELP: &str = "Enter: Run  Esc: Close  Up/Down: Navigate";
const FORM_HELP: &str = "Enter: Create  Esc: Back  Tab: Change type";

impl TableView {
    pub(super) fn handle_palette_key(&mut self, key: &KeyEvent) {
        if self.palette.is_creating_property() {
            self.handle_property_form_key(key);
            return;
        }

        match key.code {
            KeyCode::Esc => self.palette.close(),
            KeyCode::Enter => {
                if let Some(action) = self.palette.activate() {
                    self.execute(action);
                }
            }
            KeyCode::Up => self.palette.select_previous(),
            KeyCode::Down => self.palette.select_next(),
            _ => self.palette.edit_query(|input| {
                edit_text_input(input, key);
            }),
        }
    }

    fn handle_property_form_key(&mut self, key: &KeyEvent) {
        let focus = self.palette.draft().map(|draft| draft.focus);
        match key.code {
            KeyCode::Esc => {
                self.palette.cancel_property_creation();
            }
            KeyCode::Enter => self.submit_property(),
            KeyCode::Tab => self.palette.cycle_kind(true),
            KeyCode::BackTab => self.palette.cycle_kind(false),
            KeyCode::Up | KeyCode::Down => self.palette.toggle_draft_focus(),
            KeyCode::Left if focus == Some(DraftFocus::Kind) => self.palette.cycle_kind(false),
            KeyCode::Right if focus == Some(DraftFocus::Kind) => self.palette.cycle_kind(true),
            _ if focus == Some(DraftFocus::Name) => self.palette.edit_draft(|draft| {
                if edit_text_input(&mut draft.name, key) {
                    draft.error = None;
                }
            }),
            _ => {}
        }
    }

    fn submit_property(&mut self) {
        if self.store.project().is_none() {
            tably_toast::warning("No project loaded");
            return;
        }
        if self.palette.is_request_pending() || self.store.is_loading() {
            tably_toast::info("A property is already being created");
            return;
        }
        let Some(request) = self.palette.submit() else {
            return;
        };

        let name = request.name.clone();
        if self.store.add_property(request) {
            self.creation_toast = Some(tably_toast::loading(format!(
                "Creating property \"{}\"...",
                name
            )));
        } else {
            let message = "Failed to create property: the request could not be sent".to_string();
            self.palette.finish_creation(Err(message.clone()));
            tably_toast::error(message);
        }
    }

    pub(super) fn render_command_palette(&mut self, frame: &mut Frame, area: Rect) {
        self.hit_areas.palette = None;
        self.hit_areas.palette_list = None;
        self.hit_areas.palette_list_offset = 0;
        self.hit_areas.palette_fallback = None;

        let state = self.palette.state().clone();
        match state {
            PaletteState::Closed => {}
            PaletteState::Browsing(_) => self.render_browse_panel(frame, area),
            PaletteState::CreatingProperty { draft, .. } => {
                self.render_property_form(frame, area, &draft)
            }
        }
    }

    fn render_browse_panel(&mut self, frame: &mut Frame, area: Rect) {
        let max_items = self.palette_max_items;
        let query = self
            .palette
            .query_input()
            .cloned()
            .unwrap_or_default();
        let selected = self.palette.selected_index().unwrap_or(0);
        let items = self
            .palette
            .filtered()
            .into_iter()
            .map(|entry| (entry.title, entry.description))
            .collect::<Vec<_>>();

        let list_height = if items.is_empty() {
            2
        } else {
            items.len().min(max_items)
        };
        // Borders, query, spacer, list, spacer, help.
        let panel = panel_rect(area, list_height as u16 + 6);
        frame.render_widget(Clear, panel);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Commands ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let [query_area, _, list_area, _, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(list_height as u16),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let mut query_line = vec![Span::styled("> ", Style::default().fg(Color::Cyan))];
        if query.text().is_empty() {
            query_line.push(caret(" "));
            query_line.push(Span::styled(
                "Type a command or search...",
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            query_line.extend(input_spans(&query));
        }
        frame.render_widget(Paragraph::new(Line::from(query_line)), query_area);

        if items.is_empty() {
            let mut lines = vec![Line::styled(
                "No commands found",
                Style::default().fg(Color::DarkGray),
            )];
            if !query.is_blank() && list_area.height > 1 {
                lines.push(Line::styled(
                    format!("Ask Go about \"{}\"", query.text().trim()),
                    Style::default().fg(Color::Cyan),
                ));
                self.hit_areas.palette_fallback = Some(Rect {
                    y: list_area.y + 1,
                    height: 1,
                    ..list_area
                });
            }
            frame.render_widget(Paragraph::new(lines), list_area);
        } else {
            let offset = (selected + 1).saturating_sub(max_items);
            let lines = items
                .iter()
                .enumerate()
                .skip(offset)
                .take(max_items)
                .map(|(index, (title, description))| {
                    let style = if index == selected {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    Line::from(vec![
                        Span::styled(format!(" {:<16}", title), style.add_modifier(Modifier::BOLD)),
                        Span::styled(format!(" {}", description), style),
                    ])
                })
                .collect::<Vec<_>>();
            frame.render_widget(Paragraph::new(lines), list_area);
            self.hit_areas.palette_list = Some(list_area);
            self.hit_areas.palette_list_offset = offset;
        }

        frame.render_widget(
            Paragraph::new(Line::styled(BROWSE_HELP, Style::default().fg(Color::DarkGray))),
            help_area,
        );
        self.hit_areas.palette = Some(panel);
    }

    fn render_property_form(&mut self, frame: &mut Frame, area: Rect, draft: &PropertyDraft) {
        let panel = panel_rect(area, 9);
        frame.render_widget(Clear, panel);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Add Property ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let [name_area, kind_area, _, error_area, _, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let label_style = |focus: DraftFocus| {
            if draft.focus == focus && !draft.in_flight {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            }
        };

        let mut name_line = vec![Span::styled("Name: ", label_style(DraftFocus::Name))];
        if draft.focus == DraftFocus::Name && !draft.in_flight {
            name_line.extend(input_spans(&draft.name));
        } else {
            name_line.push(Span::raw(draft.name.text().to_string()));
        }
        if draft.name.text().is_empty() && draft.focus != DraftFocus::Name {
            name_line.push(Span::styled(
                "Enter property name...",
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(name_line)), name_area);

        let mut kind_line = vec![Span::styled("Type: ", label_style(DraftFocus::Kind))];
        for kind in PropertyKind::ALL {
            let style = if kind == draft.kind {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            kind_line.push(Span::styled(format!(" {} ", kind.label()), style));
            kind_line.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(kind_line)), kind_area);

        if let Some(error) = draft.error.as_deref() {
            let first_line = error.lines().next().unwrap_or_default();
            frame.render_widget(
                Paragraph::new(Line::styled(first_line.to_string(), Style::default().fg(Color::Red))),
                error_area,
            );
        }

        let button_style = if self.palette.can_submit() {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let button = if self.palette.is_request_pending() {
            " Creating... "
        } else {
            " Create "
        };
        let footer = Line::from(vec![
            Span::styled(button, button_style),
            Span::raw("  "),
            Span::styled(FORM_HELP, Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(footer), footer_area);

        self.hit_areas.palette = Some(panel);
    }
}

/// Applies a key to a single-line input. Returns whether the text changed.
fn edit_text_input(input: &mut TextInputState, key: &KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Backspace if ctrl || alt => input.delete_word_backward(),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Char('w') if ctrl => input.delete_word_backward(),
        KeyCode::Char('u') if ctrl => input.delete_to_start(),
        KeyCode::Left => {
            input.move_left();
            false
        }
        KeyCode::Right => {
            input.move_right();
            false
        }
        KeyCode::Home => {
            input.move_to_start();
            false
        }
        KeyCode::End => {
            input.move_to_end();
            false
        }
        KeyCode::Char(ch) if !ctrl && !alt => {
            input.insert_char(ch);
            true
        }
        _ => false,
    }
}

fn caret(text: &str) -> Span<'static> {
    Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::REVERSED),
    )
}

fn input_spans(input: &TextInputState) -> Vec<Span<'static>> {
    let (before, after) = input.split_at_cursor();
    let mut chars = after.chars();
    let under_cursor = chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
    vec![
        Span::raw(before.to_string()),
        caret(&under_cursor),
        Span::raw(chars.as_str().to_string()),
    ]
}

fn panel_rect(area: Rect, height: u16) -> Rect {
    let width = PALETTE_WIDTH.min(area.width.saturating_sub(4)).max(area.width.min(20));
    let height = height.min(area.height.saturating_sub(PALETTE_TOP_MARGIN));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + PALETTE_TOP_MARGIN.min(area.height),
        width,
        height,
    }
}
