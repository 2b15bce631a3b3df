use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};
use tably_api::{FieldValue, Property, PropertyKind};
use tably_toast::ToastKind;

use super::{CHECKBOX_COLUMN_WIDTH, TableView};
use crate::keybindings::Keystroke;

const INDEX_COLUMN_WIDTH: u16 = 4;
const FILE_COLUMN_WIDTH: u16 = 24;
const BOOLEAN_COLUMN_WIDTH: u16 = 8;
const JSON_COLUMN_WIDTH: u16 = 30;

impl TableView {
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [hint_area, table_area, footer_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_hint(frame, hint_area);
        self.render_table(frame, table_area);
        self.render_selection_footer(frame, footer_area);
        self.render_status(frame, status_area);
        self.render_command_palette(frame, area);
    }

    fn render_hint(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if let Some(project) = self.store.project() {
            spans.push(Span::styled(
                project.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw("  "));
        }

        let hint = match self.palette_trigger() {
            Some(trigger) => format!("Press {} to add properties", display_trigger(trigger)),
            None => "Open the command palette to add properties".to_string(),
        };
        let hint_width = hint.chars().count() as u16;
        let hint_x = area.x + spans.iter().map(|span| span.width() as u16).sum::<u16>();
        spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        self.hit_areas.hint = Rect {
            x: hint_x.min(area.right()),
            y: area.y,
            width: hint_width.min(area.right().saturating_sub(hint_x)),
            height: area.height,
        };
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        self.hit_areas.table_header = Rect::default();
        self.hit_areas.table_body = Rect::default();

        let Some(project) = self.store.project() else {
            let message = if self.store.is_fetching() {
                "Loading project..."
            } else {
                "No project loaded"
            };
            frame.render_widget(
                Paragraph::new(Line::styled(message, Style::default().fg(Color::DarkGray))),
                area,
            );
            return;
        };

        let entities = self.store.entities();
        let row_count = entities.len();
        let select_all = if self.selection.is_all_selected(entities) {
            "[x]"
        } else if self.selection.count() > 0 {
            "[-]"
        } else {
            "[ ]"
        };

        let mut header = vec![Cell::from(select_all), Cell::from("#")];
        header.extend(project.properties.iter().map(|property| {
            Cell::from(Line::from(vec![
                Span::styled(
                    property.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" ({})", property.kind.as_str()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        }));

        let rows = entities.iter().enumerate().map(|(index, entity)| {
            let checkbox = if self.selection.is_selected(entity) {
                "[x]"
            } else {
                "[ ]"
            };
            let mut cells = vec![Cell::from(checkbox), Cell::from((index + 1).to_string())];
            cells.extend(project.properties.iter().map(|property| {
                let value = FieldValue::from_raw(
                    &property.kind,
                    &property.slug,
                    entity.field(&property.slug),
                );
                Cell::from(render_value(&value))
            }));
            let row = Row::new(cells);
            if self.selection.is_selected(entity) {
                row.style(Style::default().fg(Color::Cyan))
            } else {
                row
            }
        });

        let widths = [
            Constraint::Length(CHECKBOX_COLUMN_WIDTH),
            Constraint::Length(INDEX_COLUMN_WIDTH),
        ]
        .into_iter()
        .chain(project.properties.iter().map(column_width))
        .collect::<Vec<_>>();

        let table = Table::new(rows, widths)
            .header(Row::new(header).style(Style::default().add_modifier(Modifier::UNDERLINED)))
            .column_spacing(1)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = TableState::default();
        if row_count > 0 {
            state.select(Some(self.selection.cursor()));
        }
        frame.render_stateful_widget(table, area, &mut state);

        if row_count == 0 {
            let empty_area = Rect {
                y: area.y.saturating_add(2).min(area.bottom()),
                height: area.height.saturating_sub(2),
                ..area
            };
            frame.render_widget(
                Paragraph::new(Line::styled(
                    "No entities in this project",
                    Style::default().fg(Color::DarkGray),
                )),
                empty_area,
            );
        }

        self.hit_areas.table_header = Rect {
            height: area.height.min(1),
            ..area
        };
        self.hit_areas.table_body = Rect {
            y: area.y.saturating_add(1).min(area.bottom()),
            height: area.height.saturating_sub(1),
            ..area
        };
        self.hit_areas.table_offset = state.offset();
    }

    fn render_selection_footer(&self, frame: &mut Frame, area: Rect) {
        let selected = self.selection.count();
        if selected == 0 {
            return;
        }

        let line = Line::from(vec![
            Span::styled(
                format!("{} of {} selected", selected, self.store.entities().len()),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                "  Delete: remove  Ctrl+A: toggle all",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let Some(toast) = self.toasts.latest() else {
            return;
        };

        let color = match toast.kind {
            ToastKind::Info => Color::Blue,
            ToastKind::Success => Color::Green,
            ToastKind::Warning => Color::Yellow,
            ToastKind::Error => Color::Red,
            ToastKind::Loading => Color::Gray,
        };
        let message = toast.message.lines().next().unwrap_or_default().to_string();
        let line = Line::from(vec![
            Span::styled(
                format!("[{}] ", toast.kind.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(message),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn column_width(property: &Property) -> Constraint {
    match (property.kind.kind(), property.kind.as_str()) {
        (Some(PropertyKind::File), _) => Constraint::Length(FILE_COLUMN_WIDTH),
        (None, "boolean") => Constraint::Length(BOOLEAN_COLUMN_WIDTH),
        (Some(PropertyKind::Json), _) => Constraint::Length(JSON_COLUMN_WIDTH),
        _ => Constraint::Fill(1),
    }
}

fn render_value(value: &FieldValue) -> Line<'static> {
    match value {
        FieldValue::Status(true) => Line::styled("Yes", Style::default().fg(Color::Green)),
        FieldValue::Status(false) => Line::styled("No", Style::default().fg(Color::Red)),
        FieldValue::Url(url) => Line::styled(
            url.clone(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        ),
        FieldValue::Json(_) | FieldValue::Unrecognized(_) => {
            Line::styled(value.display(), Style::default().fg(Color::Gray))
        }
        other => Line::raw(other.display()),
    }
}

/// `ctrl-k` becomes `Ctrl+K` for on-screen hints.
pub(super) fn display_trigger(keystroke: &Keystroke) -> String {
    let mut parts = Vec::new();
    if keystroke.ctrl {
        parts.push("Ctrl".to_string());
    }
    if keystroke.alt {
        parts.push("Alt".to_string());
    }
    if keystroke.shift {
        parts.push("Shift".to_string());
    }
    let key = if keystroke.key.chars().count() == 1 {
        keystroke.key.to_uppercase()
    } else {
        let mut chars = keystroke.key.chars();
        chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default()
    };
    parts.push(key);
    parts.join("+")
}
