//! Redaction state, document seams and commit.
//!
//! The [`RedactionSession`] is the entry point for a hosting application:
//! it turns searches and pointer drags into marks in a [`RedactionStore`]
//! and commits them through a [`DocumentBackend`].

pub mod commit;
pub mod mupdf_backend;
pub mod provider;
pub mod session;
pub mod store;

pub use commit::{CommitCoordinator, CommitSummary};
pub use mupdf_backend::{MuPdfBackend, MuPdfDocument, MuPdfHandle};
pub use provider::{DocumentBackend, DocumentHandle, DocumentProvider, FillColor, SaveOptions};
pub use session::RedactionSession;
pub use store::RedactionStore;
