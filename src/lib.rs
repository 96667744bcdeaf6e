//! Mark regions of a PDF for redaction and strip the content under them.
//!
//! Marks come from two places: rectangles the operator draws on rendered
//! pages, and text or regex searches whose hits are traced back to the word
//! boxes that produced them. Committing opens a fresh copy of the source and
//! uses MuPDF's redaction API to physically remove the text and images under
//! every mark, not just paint over them.
//!
//! # Architecture
//!
//! - [`domain`]: pure geometry. Line reconstruction, match finding,
//!   span-to-rectangle mapping, vertical padding, draw conversion, layout
//! - [`redaction`]: the redaction store, session facade, commit coordinator
//!   and the MuPDF backend
//! - [`config`]: tunable settings
//! - [`error`]: error taxonomy
//!
//! # Quick Start
//!
//! ```no_run
//! use redmark::{MuPdfBackend, MuPdfDocument, RedactionSession, RedactionSettings, SearchMode};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = RedactionSettings::default();
//! let source = Path::new("input.pdf");
//! let document = MuPdfDocument::open(source, settings.zoom)?;
//! let mut session = RedactionSession::open(document, source, settings)?;
//!
//! session.find_and_store(r"\d{3}-\d{2}-\d{4}", SearchMode::Pattern)?;
//! session.commit(&MuPdfBackend::new(), Path::new("redacted.pdf"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Geometry without a document
//!
//! ```
//! use redmark::domain::{match_rects, Query, Rect, SearchMode, WordRecord};
//!
//! let words = vec![
//!     WordRecord::new(Rect::new(0.0, 0.0, 20.0, 10.0), "Page", 0, 0, 0),
//!     WordRecord::new(Rect::new(25.0, 0.0, 35.0, 10.0), "12", 0, 0, 1),
//! ];
//! let query = Query::compile(r"\d+", SearchMode::Pattern).unwrap();
//! assert_eq!(match_rects(&words, &query), vec![Rect::new(25.0, 0.0, 35.0, 10.0)]);
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod redaction;

pub use config::RedactionSettings;
pub use domain::{Point, Rect, SearchMode, WordRecord};
pub use error::{DegenerateDraw, RedactorError, RedactorResult};
pub use redaction::{
    CommitCoordinator, CommitSummary, DocumentBackend, DocumentHandle, DocumentProvider,
    FillColor, MuPdfBackend, MuPdfDocument, RedactionSession, RedactionStore, SaveOptions,
};
