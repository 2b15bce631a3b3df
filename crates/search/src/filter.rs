use crate::matcher::matches;

/// Anything that can be listed in the command palette.
pub trait Searchable {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
}

/// A query is kept when it matches the name or the description. The two
/// fields are checked independently, so a query never spans both.
pub fn is_match<T: Searchable + ?Sized>(query: &str, item: &T) -> bool {
    matches(query, item.name()) || matches(query, item.description())
}

/// Returns the items that match `query`, in their original order.
pub fn filter_items<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items.iter().filter(|item| is_match(query, *item)).collect()
}

/// Filters a registry by index and remembers the last query, so repeated
/// renders with an unchanged query skip the scan.
#[derive(Debug, Clone, Default)]
pub struct CommandFilter {
    query: String,
    source_len: usize,
    indices: Vec<usize>,
    primed: bool,
}

impl CommandFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices into `items` of the entries matching `query`.
    pub fn indices<T: Searchable>(&mut self, items: &[T], query: &str) -> &[usize] {
        if !self.primed || self.query != query || self.source_len != items.len() {
            self.indices = items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| is_match(query, item).then_some(index))
                .collect();
            self.query = query.to_string();
            self.source_len = items.len();
            self.primed = true;
        }

        &self.indices
    }

    /// Forget the cached result. Call after the registry changes in place.
    pub fn invalidate(&mut self) {
        self.primed = false;
    }

    pub fn last_query(&self) -> Option<&str> {
        self.primed.then_some(self.query.as_str())
    }
}
