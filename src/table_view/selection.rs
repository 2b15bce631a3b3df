use std::collections::HashSet;

use tably_api::Entity;

/// Checked rows by entity id, plus the keyboard cursor by row index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    selected: HashSet<String>,
    cursor: usize,
}

impl RowSelection {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self, entity: &Entity) -> bool {
        self.selected.contains(&entity.id)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_all_selected(&self, entities: &[Entity]) -> bool {
        !entities.is_empty() && entities.iter().all(|entity| self.is_selected(entity))
    }

    pub fn toggle(&mut self, entity: &Entity) {
        if !self.selected.remove(&entity.id) {
            self.selected.insert(entity.id.clone());
        }
    }

    pub fn toggle_cursor_row(&mut self, entities: &[Entity]) {
        if let Some(entity) = entities.get(self.cursor) {
            self.toggle(entity);
        }
    }

    /// Selects every row, or none when every row is already selected.
    pub fn toggle_all(&mut self, entities: &[Entity]) {
        if entities.is_empty() {
            return;
        }
        if self.is_all_selected(entities) {
            self.selected.clear();
        } else {
            self.selected = entities.iter().map(|entity| entity.id.clone()).collect();
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Selected ids in row order.
    pub fn selected_ids<'a>(&self, entities: &'a [Entity]) -> Vec<&'a str> {
        entities
            .iter()
            .filter(|entity| self.is_selected(entity))
            .map(|entity| entity.id.as_str())
            .collect()
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, row_count: usize) {
        if self.cursor + 1 < row_count {
            self.cursor += 1;
        }
    }

    pub fn set_cursor(&mut self, row: usize, row_count: usize) {
        self.cursor = row.min(row_count.saturating_sub(1));
    }

    /// Forgets ids that are no longer in the table after a reload.
    pub fn retain_present(&mut self, entities: &[Entity]) {
        let present = entities
            .iter()
            .map(|entity| entity.id.as_str())
            .collect::<HashSet<_>>();
        self.selected.retain(|id| present.contains(id.as_str()));
        self.cursor = self.cursor.min(entities.len().saturating_sub(1));
    }
}
