//! View models for collection screens.
//!
//! A list screen shows exactly one of six states, checked in a fixed order:
//!
//! 1. authentication still pending
//! 2. loading
//! 3. error (with a retry hint)
//! 4. empty collection
//! 5. no item matches the search term
//! 6. the populated table
//!
//! [`compute_list_view`] applies that precedence to a store snapshot and its
//! filtered view. View models hold display-ready strings only.

use crate::app::search::{match_ranges, FilteredView};
use crate::domain::{Institution, ItemId, Pump, PumpModel, Resource, Service};
use crate::store::CollectionState;
use std::ops::Range;

/// Row rendering for a record type.
pub trait Tabular {
    /// Column headings, in display order.
    const COLUMNS: &'static [&'static str];

    /// Cell values, one per column.
    fn cells(&self) -> Vec<String>;
}

impl Tabular for Pump {
    const COLUMNS: &'static [&'static str] = &["ID", "SERIAL", "INVENTORY", "STATUS", "NOTES"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.serial_number.clone(),
            self.inventory_code.clone(),
            self.status.to_string(),
            self.notes.clone().unwrap_or_default(),
        ]
    }
}

impl Tabular for PumpModel {
    const COLUMNS: &'static [&'static str] = &["ID", "CODE", "NAME", "MANUFACTURER"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.code.clone(),
            self.name.clone(),
            self.manufacturer.clone(),
        ]
    }
}

impl Tabular for Institution {
    const COLUMNS: &'static [&'static str] = &["ID", "CODE", "NAME"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.code.clone(), self.name.clone()]
    }
}

impl Tabular for Service {
    const COLUMNS: &'static [&'static str] = &["ID", "CODE", "NAME", "INSTITUTION"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.code.clone(),
            self.name.clone(),
            self.institution_id.to_string(),
        ]
    }
}

/// Message block for the empty and no-match states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: ItemId,
    pub cells: Vec<String>,
    pub is_selected: bool,

    /// Byte ranges to highlight, one list per cell.
    pub highlights: Vec<Vec<Range<usize>>>,
}

/// Populated table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<DisplayRow>,

    /// "Showing X of Y" footer.
    pub summary: String,
}

/// What a list screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    AuthPending,
    Loading,
    Error { message: String, retry_hint: String },
    Empty(EmptyState),
    NoMatches(EmptyState),
    Populated(TableView),
}

impl ListView {
    /// Short state name, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AuthPending => "auth_pending",
            Self::Loading => "loading",
            Self::Error { .. } => "error",
            Self::Empty(_) => "empty",
            Self::NoMatches(_) => "no_matches",
            Self::Populated(_) => "populated",
        }
    }
}

/// Builds the list view for a collection screen.
///
/// `label` is the plural record name shown in messages (e.g. `"pumps"`).
#[must_use]
pub fn compute_list_view<T: Resource + Tabular>(
    label: &str,
    auth_pending: bool,
    state: &CollectionState<T>,
    view: &FilteredView<T>,
) -> ListView {
    if auth_pending {
        return ListView::AuthPending;
    }
    if state.loading {
        return ListView::Loading;
    }
    if let Some(message) = &state.error {
        return ListView::Error {
            message: message.clone(),
            retry_hint: format!("Run the command again to reload {label}"),
        };
    }
    if state.items.is_empty() {
        return ListView::Empty(EmptyState {
            message: format!("No {label} yet"),
            subtitle: format!("Created {label} will appear here"),
        });
    }
    if view.items.is_empty() {
        return ListView::NoMatches(EmptyState {
            message: format!("No {label} match \"{}\"", view.term.trim()),
            subtitle: "Try a different search term".to_string(),
        });
    }

    let selected = state.selected.as_ref().map(|s| s.id());
    let rows = view
        .items
        .iter()
        .map(|item| {
            let cells = item.cells();
            let highlights = cells.iter().map(|cell| match_ranges(cell, &view.term)).collect();
            DisplayRow {
                id: item.id(),
                is_selected: selected == Some(item.id()),
                cells,
                highlights,
            }
        })
        .collect();

    ListView::Populated(TableView {
        columns: T::COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        rows,
        summary: view.summary(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn model(id: i64, code: &str) -> Arc<PumpModel> {
        Arc::new(PumpModel {
            id,
            code: code.to_string(),
            name: format!("Model {code}"),
            manufacturer: "Acme".to_string(),
        })
    }

    fn state(items: Vec<Arc<PumpModel>>) -> CollectionState<PumpModel> {
        CollectionState {
            items,
            ..CollectionState::default()
        }
    }

    #[test]
    fn precedence_is_fixed() {
        let mut s = state(vec![]);
        s.loading = true;
        s.error = Some("boom".into());
        let view = FilteredView::compute(&s.items, "");

        assert_eq!(compute_list_view("models", true, &s, &view), ListView::AuthPending);
        assert_eq!(compute_list_view("models", false, &s, &view), ListView::Loading);

        s.loading = false;
        assert_eq!(compute_list_view("models", false, &s, &view).kind(), "error");

        s.error = None;
        assert_eq!(compute_list_view("models", false, &s, &view).kind(), "empty");
    }

    #[test]
    fn no_matches_is_distinct_from_empty() {
        let s = state(vec![model(1, "A")]);
        let view = FilteredView::compute(&s.items, "zzz");

        let ListView::NoMatches(empty) = compute_list_view("models", false, &s, &view) else {
            panic!("expected no-match state");
        };
        assert_eq!(empty.message, "No models match \"zzz\"");
    }

    #[test]
    fn populated_rows_carry_selection_and_highlights() {
        let mut s = state(vec![model(1, "AB"), model(2, "BC")]);
        s.selected = Some(Arc::clone(&s.items[1]));
        let view = FilteredView::compute(&s.items, "b");

        let ListView::Populated(table) = compute_list_view("models", false, &s, &view) else {
            panic!("expected table");
        };
        assert_eq!(table.columns, vec!["ID", "CODE", "NAME", "MANUFACTURER"]);
        assert_eq!(table.summary, "Showing 2 of 2");
        assert!(!table.rows[0].is_selected);
        assert!(table.rows[1].is_selected);
        assert_eq!(table.rows[0].highlights[1], vec![1..2]);
        assert_eq!(table.rows[1].highlights[2], vec![6..7]);
    }
}
