//! Replays stored marks against a fresh copy of the source document.

use std::path::Path;

use super::provider::{DocumentBackend, DocumentHandle, FillColor, SaveOptions};
use super::store::RedactionStore;
use crate::error::{RedactorError, RedactorResult};

/// Statistics about a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Pages that had marks applied.
    pub pages_modified: usize,
    /// Marks registered and applied across all pages.
    pub marks_applied: usize,
    /// Pages in the store that the opened document does not have.
    pub pages_skipped: usize,
}

impl CommitSummary {
    /// Returns true if any content was removed.
    pub fn has_redactions(&self) -> bool {
        self.marks_applied > 0
    }
}

/// Applies a [`RedactionStore`] to a document and saves the result.
///
/// Each commit opens its own handle to the source path, so the document
/// used for display is never mutated. The store is only read.
#[derive(Debug, Clone, Default)]
pub struct CommitCoordinator {
    fill: FillColor,
    options: SaveOptions,
}

impl CommitCoordinator {
    pub fn new(fill: FillColor, options: SaveOptions) -> Self {
        Self { fill, options }
    }

    /// Strips content under every stored mark and writes `dest`.
    ///
    /// An empty store is not refused here; confirming that intent is up to
    /// the caller.
    ///
    /// # Errors
    /// [`RedactorError::Commit`] if the source cannot be opened, a page
    /// fails to apply, or saving fails. Nothing is written on a page
    /// failure.
    pub fn commit<B: DocumentBackend>(
        &self,
        backend: &B,
        source: &Path,
        dest: &Path,
        store: &RedactionStore,
    ) -> RedactorResult<CommitSummary> {
        let mut handle = backend
            .open_independent(source)
            .map_err(|e| RedactorError::commit("failed to open source document", None, e))?;
        let page_count = handle
            .page_count()
            .map_err(|e| RedactorError::commit("failed to read page count", None, e))?;

        let mut summary = CommitSummary::default();
        for (page, rects) in store.marked_pages() {
            if page >= page_count {
                tracing::warn!(page, page_count, "marks on a page the document lacks, skipped");
                summary.pages_skipped += 1;
                continue;
            }

            for rect in rects {
                handle
                    .add_redaction_mark(page, *rect, self.fill)
                    .map_err(|e| RedactorError::commit("failed to add redaction mark", Some(page), e))?;
            }
            handle
                .apply_redactions(page)
                .map_err(|e| RedactorError::commit("failed to apply redactions", Some(page), e))?;

            tracing::debug!(page, marks = rects.len(), "page redacted");
            summary.pages_modified += 1;
            summary.marks_applied += rects.len();
        }

        handle
            .save(dest, self.options)
            .map_err(|e| RedactorError::commit("failed to save redacted document", None, e))?;

        tracing::info!(
            dest = %dest.display(),
            pages = summary.pages_modified,
            marks = summary.marks_applied,
            "redacted document saved"
        );
        Ok(summary)
    }
}
