//! Collection state held by a resource store.

use crate::domain::{ItemId, Resource};
use std::sync::Arc;

/// Coarse status derived from a [`CollectionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    /// No operation running and the last one succeeded.
    Idle,
    /// An operation is in flight.
    Loading,
    /// No operation running and the last one failed.
    Error,
}

/// In-memory state of one collection.
///
/// Items are shared behind [`Arc`] so a store can replace a single record without
/// cloning the rest; callers can rely on `Arc::ptr_eq` to detect which records
/// actually changed.
#[derive(Debug)]
pub struct CollectionState<T> {
    pub items: Vec<Arc<T>>,
    pub loading: bool,
    pub error: Option<String>,
    pub search_term: String,
    pub selected: Option<Arc<T>>,

    /// Bumped on every change of `items`.
    pub revision: u64,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            search_term: String::new(),
            selected: None,
            revision: 0,
        }
    }
}

impl<T> Clone for CollectionState<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            loading: self.loading,
            error: self.error.clone(),
            search_term: self.search_term.clone(),
            selected: self.selected.clone(),
            revision: self.revision,
        }
    }
}

impl<T> CollectionState<T> {
    /// Derived status: `Loading` while a request runs, `Error` when the last one failed.
    #[must_use]
    pub fn status(&self) -> StoreStatus {
        if self.loading {
            StoreStatus::Loading
        } else if self.error.is_some() {
            StoreStatus::Error
        } else {
            StoreStatus::Idle
        }
    }

    /// Number of loaded items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when no items are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Marks an operation as started.
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Marks the running operation as failed.
    pub(crate) fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// Swaps in a whole new collection.
    pub(crate) fn replace_items(&mut self, items: Vec<Arc<T>>) {
        self.items = items;
        self.revision += 1;
    }
}

impl<T: Resource> CollectionState<T> {
    /// Looks up an item by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Arc<T>> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Index of the item with `id`.
    ///
    /// # Parameters
    ///
    /// * `id` - Server-assigned identifier
    ///
    /// # Returns
    ///
    /// The position in display order, or `None` if the item is not loaded
    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Re-points the selection at the current copy of the selected record, or
    /// clears it if the record is gone.
    pub(crate) fn refresh_selection(&mut self) {
        if let Some(id) = self.selected.as_ref().map(|s| s.id()) {
            self.selected = self.get(id).cloned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_prefers_loading_over_error() {
        let mut state = CollectionState::<()>::default();
        assert_eq!(state.status(), StoreStatus::Idle);

        state.fail("boom".into());
        assert_eq!(state.status(), StoreStatus::Error);

        state.begin();
        assert_eq!(state.status(), StoreStatus::Loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn replacing_items_bumps_revision() {
        let mut state = CollectionState::<u8>::default();
        state.replace_items(vec![Arc::new(1)]);
        state.replace_items(vec![Arc::new(1)]);
        assert_eq!(state.revision, 2);
    }
}
