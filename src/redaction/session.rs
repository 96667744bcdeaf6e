//! One open document, its render geometry and its pending redactions.

use std::path::{Path, PathBuf};

use super::commit::{CommitCoordinator, CommitSummary};
use super::provider::{DocumentBackend, DocumentProvider};
use super::store::RedactionStore;
use crate::config::RedactionSettings;
use crate::domain::{
    adjust_vertical, match_rects, to_document_rect, PageGeometry, PageLayout, Point, Query, Rect,
    SearchMode,
};
use crate::error::{RedactorError, RedactorResult};

/// Editing state for a single document.
///
/// The session owns the redaction store and the per-page geometry of the
/// current render pass. UI concerns such as the current page or an
/// in-progress drag stay with the caller, which passes page indices and
/// canvas coordinates explicitly.
pub struct RedactionSession<P: DocumentProvider> {
    provider: P,
    source: PathBuf,
    settings: RedactionSettings,
    store: RedactionStore,
    layout: PageLayout,
    geometry: Vec<PageGeometry>,
    canvas_width: f64,
}

/// Page layout and per-page geometry for every page of `provider`.
fn measure<P: DocumentProvider>(
    provider: &P,
    settings: &RedactionSettings,
    canvas_width: f64,
) -> RedactorResult<(PageLayout, Vec<PageGeometry>)> {
    let page_count = provider.page_count();
    let mut units = Vec::with_capacity(page_count);
    let mut pixels = Vec::with_capacity(page_count);
    for page in 0..page_count {
        units.push(provider.page_rect_units(page)?);
        pixels.push(provider.rendered_pixel_size(page)?);
    }

    let layout = PageLayout::flow(
        &pixels,
        canvas_width,
        settings.page_spacing_px,
        settings.min_canvas_width_px,
    );
    let geometry = units
        .into_iter()
        .zip(pixels)
        .zip(&layout.origins)
        .map(|((u, px), origin)| PageGeometry::new(u, px, *origin))
        .collect();
    Ok((layout, geometry))
}

impl<P: DocumentProvider> RedactionSession<P> {
    /// Starts a session with an empty store and a single-column layout.
    pub fn open(
        provider: P,
        source: impl Into<PathBuf>,
        settings: RedactionSettings,
    ) -> RedactorResult<Self> {
        settings.validate()?;
        let mut session = Self {
            provider,
            source: source.into(),
            settings,
            store: RedactionStore::new(),
            layout: PageLayout::default(),
            geometry: Vec::new(),
            canvas_width: 0.0,
        };
        session.relayout(0.0)?;
        tracing::info!(
            source = %session.source.display(),
            pages = session.page_count(),
            "document opened"
        );
        Ok(session)
    }

    /// Swaps in a new document, discarding every pending mark.
    ///
    /// The new document is measured first; if that fails the session keeps
    /// its current document, layout and marks.
    pub fn replace_document(&mut self, provider: P, source: impl Into<PathBuf>) -> RedactorResult<()> {
        let (layout, geometry) = measure(&provider, &self.settings, self.canvas_width)?;
        self.provider = provider;
        self.source = source.into();
        self.store.reset();
        self.layout = layout;
        self.geometry = geometry;
        Ok(())
    }

    /// Recomputes page positions and scale factors.
    ///
    /// Call after the canvas is resized or the provider re-renders at a
    /// different zoom.
    pub fn relayout(&mut self, canvas_width: f64) -> RedactorResult<()> {
        let (layout, geometry) = measure(&self.provider, &self.settings, canvas_width)?;
        self.layout = layout;
        self.geometry = geometry;
        self.canvas_width = canvas_width;
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.geometry.len()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn settings(&self) -> &RedactionSettings {
        &self.settings
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable provider access, e.g. to change its zoom before [`relayout`](Self::relayout).
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn geometry(&self, page: usize) -> RedactorResult<&PageGeometry> {
        self.geometry.get(page).ok_or(RedactorError::PageOutOfRange {
            page,
            page_count: self.geometry.len(),
        })
    }

    pub fn store(&self) -> &RedactionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RedactionStore {
        &mut self.store
    }

    /// Unpadded rectangles for every match of `query` on `page`.
    pub fn find_matches(
        &self,
        page: usize,
        query: &str,
        mode: SearchMode,
    ) -> RedactorResult<Vec<Rect>> {
        let query = Query::compile(query, mode)?;
        self.page_matches(page, &query)
    }

    fn page_matches(&self, page: usize, query: &Query) -> RedactorResult<Vec<Rect>> {
        self.geometry(page)?;
        let words = self.provider.page_words(page)?;
        let rects = match_rects(&words, query);
        if !rects.is_empty() {
            tracing::debug!(page, matches = rects.len(), "search hits");
        }
        Ok(rects)
    }

    /// Searches every page, pads each hit by `pad_y_px` and stores it.
    ///
    /// Returns the number of rectangles added. The query is trimmed first.
    /// Hits are collected for all pages before any is stored, so on error
    /// the store is unchanged.
    ///
    /// # Errors
    /// - [`RedactorError::InvalidInput`] for an empty query
    /// - [`RedactorError::InvalidPattern`] if a pattern does not compile
    /// - any error from the provider while reading page text
    pub fn adjusted_find_and_store(
        &mut self,
        query: &str,
        mode: SearchMode,
        pad_y_px: f64,
    ) -> RedactorResult<usize> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RedactorError::InvalidInput {
                parameter: "query".to_string(),
                reason: "search string is empty".to_string(),
            });
        }
        let compiled = Query::compile(query, mode)?;

        let mut found = Vec::new();
        for page in 0..self.page_count() {
            let geometry = self.geometry[page];
            let rects = self.page_matches(page, &compiled)?;
            if rects.is_empty() {
                continue;
            }
            let adjusted: Vec<Rect> = rects
                .into_iter()
                .map(|r| adjust_vertical(&geometry, r, pad_y_px))
                .collect();
            found.push((page, adjusted));
        }

        let mut added = 0;
        for (page, rects) in found {
            added += rects.len();
            self.store.extend(page, rects);
        }
        tracing::info!(query, ?mode, added, "search redaction");
        Ok(added)
    }

    /// [`adjusted_find_and_store`](Self::adjusted_find_and_store) with the
    /// configured `search_pad_y`.
    pub fn find_and_store(&mut self, query: &str, mode: SearchMode) -> RedactorResult<usize> {
        let pad = self.settings.search_pad_y;
        self.adjusted_find_and_store(query, mode, pad)
    }

    /// Converts a drag between two canvas points into a document rectangle.
    ///
    /// Nothing is stored.
    ///
    /// # Errors
    /// - [`RedactorError::PageOutOfRange`] for an unknown page
    /// - [`RedactorError::DegenerateDraw`] for a drag below the noise threshold
    pub fn resolve_manual_draw(&self, page: usize, p0: Point, p1: Point) -> RedactorResult<Rect> {
        let geometry = self.geometry(page)?;
        Ok(to_document_rect(geometry, p0, p1, self.settings.min_draw_px)?)
    }

    /// [`resolve_manual_draw`](Self::resolve_manual_draw) for interactive
    /// callers: a rejected drag yields `None`.
    pub fn register_manual_draw(&self, page: usize, p0: Point, p1: Point) -> Option<Rect> {
        match self.resolve_manual_draw(page, p0, p1) {
            Ok(rect) => Some(rect),
            Err(rejected) if rejected.is_silent() => {
                tracing::debug!(page, %rejected, "draw ignored");
                None
            }
            Err(rejected) => {
                tracing::warn!(page, %rejected, "draw rejected");
                None
            }
        }
    }

    /// Registers a drag and appends the resulting mark to the store.
    pub fn add_manual_draw(&mut self, page: usize, p0: Point, p1: Point) -> Option<Rect> {
        let rect = self.register_manual_draw(page, p0, p1)?;
        self.store.append(page, rect);
        Some(rect)
    }

    /// Like [`add_manual_draw`](Self::add_manual_draw), reporting why a drag was rejected.
    pub fn try_add_manual_draw(&mut self, page: usize, p0: Point, p1: Point) -> RedactorResult<Rect> {
        let rect = self.resolve_manual_draw(page, p0, p1)?;
        self.store.append(page, rect);
        Ok(rect)
    }

    /// The page whose rendered box contains a canvas point.
    pub fn page_at(&self, point: Point) -> Option<usize> {
        self.geometry
            .iter()
            .position(|g| g.canvas_bounds().contains_point(point))
    }

    /// The topmost mark under a canvas point, as `(page, index)`.
    ///
    /// The result is meant for [`RedactionStore::remove_at`].
    pub fn mark_at(&self, point: Point) -> Option<(usize, usize)> {
        let page = self.page_at(point)?;
        let geometry = &self.geometry[page];
        self.store
            .snapshot(page)
            .iter()
            .rposition(|r| geometry.to_canvas(r).contains_point(point))
            .map(|index| (page, index))
    }

    /// Undoes the most recent mark on `page`.
    pub fn undo_last(&mut self, page: usize) -> Option<Rect> {
        self.store.pop_last(page)
    }

    pub fn clear_page(&mut self, page: usize) {
        self.store.clear(page);
    }

    pub fn remove_mark(&mut self, page: usize, index: usize) -> Option<Rect> {
        self.store.remove_at(page, index)
    }

    /// Applies all marks to a fresh copy of the source and writes `dest`.
    pub fn commit<B: DocumentBackend>(&self, backend: &B, dest: &Path) -> RedactorResult<CommitSummary> {
        CommitCoordinator::new(self.settings.fill(), self.settings.save_options()).commit(
            backend,
            &self.source,
            dest,
            &self.store,
        )
    }
}
