//! Seams to the document library.
//!
//! [`DocumentProvider`] is the read side used for searching and geometry.
//! [`DocumentBackend`] opens independent [`DocumentHandle`]s that can be
//! mutated and saved without disturbing the provider.

use std::path::Path;

use crate::domain::{Rect, WordRecord};
use crate::error::RedactorResult;

/// Opaque fill applied where content is removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl FillColor {
    pub const BLACK: FillColor = FillColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn components(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for FillColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Options for persisting a redacted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    pub compact_structure: bool,
    pub compress_streams: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            compact_structure: true,
            compress_streams: true,
        }
    }
}

/// Read access to the document being displayed.
pub trait DocumentProvider {
    fn page_count(&self) -> usize;

    /// Page size in document units, `(width, height)`.
    fn page_rect_units(&self, page: usize) -> RedactorResult<(f64, f64)>;

    /// The page's words, in the order the text layer produced them.
    fn page_words(&self, page: usize) -> RedactorResult<Vec<WordRecord>>;

    /// Size of the page as currently rendered, `(width, height)` in pixels.
    fn rendered_pixel_size(&self, page: usize) -> RedactorResult<(f64, f64)>;
}

/// Opens handles that are independent of any displayed document.
pub trait DocumentBackend {
    type Handle: DocumentHandle;

    fn open_independent(&self, path: &Path) -> RedactorResult<Self::Handle>;
}

/// A mutable document used only for committing redactions.
pub trait DocumentHandle {
    fn page_count(&self) -> RedactorResult<usize>;

    /// Registers an opaque-fill redaction over `rect` on `page`.
    fn add_redaction_mark(&mut self, page: usize, rect: Rect, fill: FillColor)
        -> RedactorResult<()>;

    /// Permanently removes every glyph and image under the page's marks.
    fn apply_redactions(&mut self, page: usize) -> RedactorResult<()>;

    fn save(&mut self, path: &Path, options: SaveOptions) -> RedactorResult<()>;
}
