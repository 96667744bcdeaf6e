//! Test doubles for the document seams.
//!
//! [`FakeDocument`] lays out words on a fixed grid so expected rectangles
//! are easy to compute by hand. [`RecordingBackend`] logs every call its
//! handles receive and can be told to fail at a given step.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use redmark::{
    DocumentBackend, DocumentHandle, DocumentProvider, FillColor, Rect, RedactorError,
    RedactorResult, SaveOptions, WordRecord,
};

/// Left margin of every fake line, in document units.
pub const LEFT: f64 = 10.0;
/// Width of one character.
pub const CHAR_W: f64 = 6.0;
/// Horizontal gap between words.
pub const GAP: f64 = 4.0;
/// Height of a word box.
pub const LINE_H: f64 = 12.0;

#[derive(Debug, Clone)]
pub struct FakePage {
    pub size_units: (f64, f64),
    pub words: Vec<WordRecord>,
}

/// In-memory provider with a configurable zoom.
#[derive(Debug, Clone)]
pub struct FakeDocument {
    pub pages: Vec<FakePage>,
    pub zoom: f64,
    /// Page whose text lookup fails, to exercise error paths.
    pub failing_page: Option<usize>,
    pub unrenderable_page: Option<usize>,
}

impl FakeDocument {
    pub fn new(zoom: f64) -> Self {
        Self {
            pages: Vec::new(),
            zoom,
            failing_page: None,
            unrenderable_page: None,
        }
    }

    /// Adds a blank page.
    pub fn with_page(mut self, width: f64, height: f64) -> Self {
        self.pages.push(FakePage {
            size_units: (width, height),
            words: Vec::new(),
        });
        self
    }

    /// Adds a line of words at `y` on the last page.
    ///
    /// Words are placed left to right starting at [`LEFT`], each
    /// `CHAR_W * len` wide, [`GAP`] apart.
    pub fn with_line(mut self, block: usize, line: usize, y: f64, text: &str) -> Self {
        let page = self.pages.last_mut().expect("add a page first");
        page.words.extend(line_words(block, line, y, text));
        self
    }

    pub fn failing_on(mut self, page: usize) -> Self {
        self.failing_page = Some(page);
        self
    }

    /// Makes `rendered_pixel_size` fail for `page`.
    pub fn unrenderable_on(mut self, page: usize) -> Self {
        self.unrenderable_page = Some(page);
        self
    }
}

/// Words for `text` laid out the way [`FakeDocument::with_line`] does.
pub fn line_words(block: usize, line: usize, y: f64, text: &str) -> Vec<WordRecord> {
    let mut x = LEFT;
    text.split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            let w = token.chars().count() as f64 * CHAR_W;
            let word = WordRecord::new(Rect::new(x, y, x + w, y + LINE_H), token, block, line, i);
            x += w + GAP;
            word
        })
        .collect()
}

/// Box of the `index`th word of `text` laid out at `y`.
pub fn word_rect(text: &str, y: f64, index: usize) -> Rect {
    line_words(0, 0, y, text)[index].rect
}

impl DocumentProvider for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_rect_units(&self, page: usize) -> RedactorResult<(f64, f64)> {
        self.pages
            .get(page)
            .map(|p| p.size_units)
            .ok_or(RedactorError::PageOutOfRange {
                page,
                page_count: self.pages.len(),
            })
    }

    fn page_words(&self, page: usize) -> RedactorResult<Vec<WordRecord>> {
        if self.failing_page == Some(page) {
            return Err(RedactorError::Backend {
                backend: "fake".to_string(),
                message: format!("text layer unavailable on page {}", page),
                source: None,
            });
        }
        self.pages
            .get(page)
            .map(|p| p.words.clone())
            .ok_or(RedactorError::PageOutOfRange {
                page,
                page_count: self.pages.len(),
            })
    }

    fn rendered_pixel_size(&self, page: usize) -> RedactorResult<(f64, f64)> {
        if self.unrenderable_page == Some(page) {
            return Err(RedactorError::Backend {
                backend: "fake".to_string(),
                message: format!("cannot render page {}", page),
                source: None,
            });
        }
        let (w, h) = self.page_rect_units(page)?;
        Ok((w * self.zoom, h * self.zoom))
    }
}

/// One call received by a [`RecordingHandle`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(PathBuf),
    AddMark(usize, Rect, FillColor),
    Apply(usize),
    Save(PathBuf, SaveOptions),
}

/// Backend whose handles append to a shared call log.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub page_count: usize,
    pub fail_open: bool,
    pub fail_apply_on: Option<usize>,
    pub fail_save: bool,
}

impl RecordingBackend {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn saved(&self) -> bool {
        self.calls().iter().any(|c| matches!(c, Call::Save(..)))
    }

    pub fn marks_on(&self, page: usize) -> Vec<Rect> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::AddMark(p, r, _) if p == page => Some(r),
                _ => None,
            })
            .collect()
    }
}

pub struct RecordingHandle {
    backend: RecordingBackend,
}

fn injected(message: &str) -> RedactorError {
    RedactorError::Backend {
        backend: "recording".to_string(),
        message: message.to_string(),
        source: None,
    }
}

impl DocumentBackend for RecordingBackend {
    type Handle = RecordingHandle;

    fn open_independent(&self, path: &Path) -> RedactorResult<RecordingHandle> {
        if self.fail_open {
            return Err(injected("open failed"));
        }
        self.calls.borrow_mut().push(Call::Open(path.to_path_buf()));
        Ok(RecordingHandle {
            backend: self.clone(),
        })
    }
}

impl DocumentHandle for RecordingHandle {
    fn page_count(&self) -> RedactorResult<usize> {
        Ok(self.backend.page_count)
    }

    fn add_redaction_mark(&mut self, page: usize, rect: Rect, fill: FillColor) -> RedactorResult<()> {
        self.backend
            .calls
            .borrow_mut()
            .push(Call::AddMark(page, rect, fill));
        Ok(())
    }

    fn apply_redactions(&mut self, page: usize) -> RedactorResult<()> {
        if self.backend.fail_apply_on == Some(page) {
            return Err(injected("apply failed"));
        }
        self.backend.calls.borrow_mut().push(Call::Apply(page));
        Ok(())
    }

    fn save(&mut self, path: &Path, options: SaveOptions) -> RedactorResult<()> {
        if self.backend.fail_save {
            return Err(injected("disk full"));
        }
        self.backend
            .calls
            .borrow_mut()
            .push(Call::Save(path.to_path_buf(), options));
        Ok(())
    }
}

/// A two-page document used across session tests.
///
/// Page 0: "Page 12 of 34" at y=100 and "foo bar foo" at y=200.
/// Page 1: "nothing to see" at y=50, "foo" at y=300 in a second block.
pub fn sample_document() -> FakeDocument {
    FakeDocument::new(2.0)
        .with_page(612.0, 792.0)
        .with_line(0, 0, 100.0, "Page 12 of 34")
        .with_line(0, 1, 200.0, "foo bar foo")
        .with_page(612.0, 792.0)
        .with_line(0, 0, 50.0, "nothing to see")
        .with_line(1, 0, 300.0, "foo")
}
