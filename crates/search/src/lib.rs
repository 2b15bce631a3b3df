//! Command search utilities for Tably.

mod filter;
mod matcher;

pub use filter::{CommandFilter, Searchable, filter_items, is_match};
pub use matcher::{match_indices, matches};
