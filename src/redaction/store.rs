//! Per-page redaction marks awaiting commit.

use std::collections::BTreeMap;

use crate::domain::Rect;

/// Ordered redaction rectangles per page, in document units.
///
/// Insertion order matters: [`pop_last`](Self::pop_last) undoes the most
/// recent mark and [`remove_at`](Self::remove_at) addresses marks by
/// position. Every operation is total; requests that refer to nothing are
/// no-ops, since they usually come from a UI racing itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedactionStore {
    pages: BTreeMap<usize, Vec<Rect>>,
}

impl RedactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, page: usize, rect: Rect) {
        self.pages.entry(page).or_default().push(rect);
    }

    pub fn extend<I>(&mut self, page: usize, rects: I)
    where
        I: IntoIterator<Item = Rect>,
    {
        self.pages.entry(page).or_default().extend(rects);
    }

    /// Removes and returns the page's most recent mark.
    pub fn pop_last(&mut self, page: usize) -> Option<Rect> {
        self.pages.get_mut(&page)?.pop()
    }

    /// Removes the mark at `index`, shifting later marks down.
    pub fn remove_at(&mut self, page: usize, index: usize) -> Option<Rect> {
        let rects = self.pages.get_mut(&page)?;
        if index < rects.len() {
            Some(rects.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self, page: usize) {
        if let Some(rects) = self.pages.get_mut(&page) {
            rects.clear();
        }
    }

    /// Drops every mark on every page.
    pub fn reset(&mut self) {
        self.pages.clear();
    }

    /// Marks on `page` in insertion order; empty if the page has none.
    pub fn snapshot(&self, page: usize) -> &[Rect] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pages with at least one mark, in ascending order.
    pub fn marked_pages(&self) -> impl Iterator<Item = (usize, &[Rect])> {
        self.pages
            .iter()
            .filter(|(_, rects)| !rects.is_empty())
            .map(|(page, rects)| (*page, rects.as_slice()))
    }

    pub fn len(&self, page: usize) -> usize {
        self.snapshot(page).len()
    }

    pub fn total(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
