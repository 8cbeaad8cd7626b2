//! Search overlay for list views.
//!
//! Filtering is a pure function of `(items, term)`: an item matches when any of
//! its searchable fields contains the term, ignoring case. A blank term matches
//! everything. [`SearchOverlay`] memoizes the last view keyed by the collection
//! revision and the term, so changing either one always recomputes.

use crate::domain::Searchable;
use std::ops::Range;
use std::sync::Arc;

/// Normalized needle for `term`, or `None` when the term is blank.
fn needle(term: &str) -> Option<String> {
    let term = term.trim();
    (!term.is_empty()).then(|| term.to_lowercase())
}

fn matches_needle<T: Searchable>(item: &T, needle: &str) -> bool {
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Returns `true` if `item` matches `term`.
#[must_use]
pub fn matches<T: Searchable>(item: &T, term: &str) -> bool {
    needle(term).map_or(true, |needle| matches_needle(item, &needle))
}

/// Items of `items` matching `term`, in their original order.
#[must_use]
pub fn filter_items<T: Searchable>(items: &[Arc<T>], term: &str) -> Vec<Arc<T>> {
    match needle(term) {
        None => items.to_vec(),
        Some(needle) => items
            .iter()
            .filter(|item| matches_needle(item.as_ref(), &needle))
            .cloned()
            .collect(),
    }
}

/// Result of filtering a collection.
#[derive(Debug)]
pub struct FilteredView<T> {
    pub items: Vec<Arc<T>>,
    pub total: usize,
    pub filtered: usize,
    pub term: String,
}

impl<T> Clone for FilteredView<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            total: self.total,
            filtered: self.filtered,
            term: self.term.clone(),
        }
    }
}

impl<T> FilteredView<T> {
    /// "Showing X of Y" line for the list footer.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Showing {} of {}", self.filtered, self.total)
    }

    /// Whether a non-blank term is narrowing the collection.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.term.trim().is_empty()
    }

    /// `true` when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Searchable> FilteredView<T> {
    /// Filters `items` by `term` without caching.
    ///
    /// # Parameters
    ///
    /// * `items` - Collection in display order
    /// * `term` - Raw search term; blank matches everything
    ///
    /// # Returns
    ///
    /// The matching items in their original order with total and filtered counts
    #[must_use]
    pub fn compute(items: &[Arc<T>], term: &str) -> Self {
        let filtered = filter_items(items, term);
        Self {
            total: items.len(),
            filtered: filtered.len(),
            items: filtered,
            term: term.to_string(),
        }
    }
}

/// Memoized [`FilteredView`] for one collection.
#[derive(Debug)]
pub struct SearchOverlay<T> {
    cached: Option<(u64, String, FilteredView<T>)>,
}

impl<T> Default for SearchOverlay<T> {
    fn default() -> Self {
        Self { cached: None }
    }
}

impl<T: Searchable> SearchOverlay<T> {
    /// Creates an overlay with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// View of `items` at `revision` filtered by `term`.
    ///
    /// `revision` must change whenever `items` does; the cached result is reused
    /// only when both the revision and the term are unchanged.
    pub fn view(&mut self, items: &[Arc<T>], revision: u64, term: &str) -> FilteredView<T> {
        if let Some((cached_revision, cached_term, view)) = &self.cached {
            if *cached_revision == revision && cached_term == term {
                tracing::trace!(revision, "search cache hit");
                return view.clone();
            }
        }

        let view = FilteredView::compute(items, term);
        tracing::trace!(revision, total = view.total, filtered = view.filtered, "search recomputed");
        self.cached = Some((revision, term.to_string(), view.clone()));
        view
    }

    /// Drops the cached view so the next call recomputes.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

/// Byte ranges of `text` matching `term` case-insensitively, for highlighting.
///
/// Ranges are non-overlapping and always fall on char boundaries of `text`.
#[must_use]
pub fn match_ranges(text: &str, term: &str) -> Vec<Range<usize>> {
    let Some(needle) = needle(term) else {
        return Vec::new();
    };
    let needle: Vec<char> = needle.chars().collect();

    let mut ranges = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let rest = &text[start..];
        if let Some(len) = match_prefix(rest, &needle) {
            ranges.push(start..start + len);
            start += len;
        } else {
            start += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    ranges
}

/// Byte length of the prefix of `haystack` equal to `needle` ignoring case.
fn match_prefix(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut pending = needle.iter().peekable();
    for (offset, c) in haystack.char_indices() {
        for lower in c.to_lowercase() {
            match pending.next() {
                Some(&n) if n == lower => {}
                _ => return None,
            }
        }
        if pending.peek().is_none() {
            return Some(offset + c.len_utf8());
        }
    }
    None
}
