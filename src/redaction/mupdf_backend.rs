//! MuPDF-backed document provider and commit backend.
//!
//! [`MuPdfDocument`] serves page text and geometry for searching and
//! drawing. [`MuPdfBackend`] opens separate [`MuPdfHandle`]s that apply
//! redactions with `pdf_redact_page`, which removes the glyphs and images
//! under each mark instead of painting over them. Each mark is then painted
//! in its fill colour as extra page content.

use std::collections::BTreeMap;
use std::path::Path;

use mupdf::pdf::{PdfAnnotationType, PdfDocument, PdfObject, PdfPage, PdfWriteOptions};
use mupdf::{Document, Matrix, Quad, TextPageOptions};

use super::provider::{DocumentBackend, DocumentHandle, DocumentProvider, FillColor, SaveOptions};
use crate::domain::{split_glyphs_into_words, Rect, WordRecord};
use crate::error::{RedactorError, RedactorResult};

const BACKEND: &str = "MuPDF";

/// Garbage collection level that also compacts the xref and merges duplicates.
const COMPACT_GARBAGE_LEVEL: i32 = 4;

fn path_str(path: &Path, parameter: &str) -> RedactorResult<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| RedactorError::InvalidInput {
            parameter: parameter.to_string(),
            reason: "Path contains invalid UTF-8".to_string(),
        })
}

fn backend_error(message: String, err: mupdf::Error) -> RedactorError {
    RedactorError::Backend {
        backend: BACKEND.to_string(),
        message,
        source: Some(Box::new(err)),
    }
}

fn quad_bounds(quad: &Quad) -> Rect {
    let xs = [quad.ul.x, quad.ur.x, quad.ll.x, quad.lr.x];
    let ys = [quad.ul.y, quad.ur.y, quad.ll.y, quad.lr.y];
    let min = |v: &[f32; 4]| v.iter().copied().fold(f32::INFINITY, f32::min) as f64;
    let max = |v: &[f32; 4]| v.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    Rect::new(min(&xs), min(&ys), max(&xs), max(&ys))
}

/// Pixel count MuPDF produces for an edge range at `zoom`.
///
/// Mirrors `fz_round_rect`: the low edge is floored and the high edge
/// ceiled, each with a small tolerance against float noise.
fn pixel_extent(lo: f64, hi: f64, zoom: f64) -> f64 {
    ((hi * zoom - 0.001).ceil() - (lo * zoom + 0.001).floor()).max(0.0)
}

/// Page bounds in document units, as `(x0, y0, x1, y1)`.
type PageBounds = (f64, f64, f64, f64);

/// A document opened for display: text extraction and render geometry.
pub struct MuPdfDocument {
    document: Document,
    bounds: Vec<PageBounds>,
    zoom: f64,
}

impl MuPdfDocument {
    /// Opens `path` and records every page's bounds.
    pub fn open(path: &Path, zoom: f64) -> RedactorResult<Self> {
        if !path.exists() {
            return Err(RedactorError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Input file does not exist",
                ),
            });
        }
        let path = path_str(path, "input")?;
        let document = Document::open(&path)
            .map_err(|e| backend_error(format!("Failed to open '{}'", path), e))?;

        let page_count = document
            .page_count()
            .map_err(|e| backend_error("Failed to get page count".to_string(), e))?;
        let mut bounds = Vec::with_capacity(page_count.max(0) as usize);
        for index in 0..page_count {
            let page = document
                .load_page(index)
                .map_err(|e| backend_error(format!("Failed to load page {}", index + 1), e))?;
            let b = page
                .bounds()
                .map_err(|e| backend_error(format!("Failed to get bounds for page {}", index + 1), e))?;
            bounds.push((b.x0 as f64, b.y0 as f64, b.x1 as f64, b.y1 as f64));
        }

        Ok(Self {
            document,
            bounds,
            zoom,
        })
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Changes the render zoom. Page geometry derived earlier is stale afterwards.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    fn page_bounds(&self, page: usize) -> RedactorResult<PageBounds> {
        self.bounds
            .get(page)
            .copied()
            .ok_or(RedactorError::PageOutOfRange {
                page,
                page_count: self.bounds.len(),
            })
    }
}

impl DocumentProvider for MuPdfDocument {
    fn page_count(&self) -> usize {
        self.bounds.len()
    }

    fn page_rect_units(&self, page: usize) -> RedactorResult<(f64, f64)> {
        let (x0, y0, x1, y1) = self.page_bounds(page)?;
        Ok((x1 - x0, y1 - y0))
    }

    fn page_words(&self, page: usize) -> RedactorResult<Vec<WordRecord>> {
        self.page_bounds(page)?;
        let loaded = self
            .document
            .load_page(page as i32)
            .map_err(|e| backend_error(format!("Failed to load page {}", page + 1), e))?;
        let text_page = loaded
            .to_text_page(TextPageOptions::empty())
            .map_err(|e| backend_error(format!("Failed to extract text on page {}", page + 1), e))?;

        let mut words = Vec::new();
        for (block_id, block) in text_page.blocks().enumerate() {
            for (line_id, line) in block.lines().enumerate() {
                let glyphs = line
                    .chars()
                    .filter_map(|ch| ch.char().map(|c| (c, quad_bounds(&ch.quad()))));
                words.extend(split_glyphs_into_words(block_id, line_id, glyphs));
            }
        }
        Ok(words)
    }

    fn rendered_pixel_size(&self, page: usize) -> RedactorResult<(f64, f64)> {
        let (x0, y0, x1, y1) = self.page_bounds(page)?;
        Ok((
            pixel_extent(x0, x1, self.zoom),
            pixel_extent(y0, y1, self.zoom),
        ))
    }
}

/// Opens documents for committing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MuPdfBackend;

impl MuPdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBackend for MuPdfBackend {
    type Handle = MuPdfHandle;

    fn open_independent(&self, path: &Path) -> RedactorResult<MuPdfHandle> {
        let path = path_str(path, "source")?;
        let document = PdfDocument::open(&path)
            .map_err(|e| backend_error(format!("Failed to open '{}' as PDF", path), e))?;
        Ok(MuPdfHandle {
            document,
            pending: BTreeMap::new(),
        })
    }
}

/// A private PDF document collecting redaction annotations per page.
pub struct MuPdfHandle {
    document: PdfDocument,
    pending: BTreeMap<usize, PendingPage>,
}

/// A loaded page and the fills to paint once its redactions are applied.
struct PendingPage {
    page: PdfPage,
    fills: Vec<(Rect, FillColor)>,
}

/// Affine map `[a, b, c, d, e, f]` taking a point to `(a*x + c*y + e, b*x + d*y + f)`.
type Affine = [f64; 6];

/// Inverts a page transform so page-space rectangles can be written as
/// content in the page's own user space.
fn invert_ctm(m: &Matrix) -> Option<Affine> {
    let [a, b, c, d, e, f] = [m.a, m.b, m.c, m.d, m.e, m.f].map(f64::from);
    let det = a * d - b * c;
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let (ia, ib, ic, id) = (d / det, -b / det, -c / det, a / det);
    Some([ia, ib, ic, id, -(e * ia + f * ic), -(e * ib + f * id)])
}

fn apply_affine(m: &Affine, x: f64, y: f64) -> (f64, f64) {
    (m[0] * x + m[2] * y + m[4], m[1] * x + m[3] * y + m[5])
}

/// Content operators painting each rectangle in its fill colour.
///
/// Corners are mapped one by one so rotated pages still get the right area.
fn fill_content(fills: &[(Rect, FillColor)], to_user: &Affine) -> String {
    let mut ops = String::from("q\n");
    for (rect, fill) in fills {
        let [r, g, b] = fill.components();
        ops.push_str(&format!("{} {} {} rg\n", r, g, b));
        let corners = [
            (rect.x0, rect.y0),
            (rect.x1, rect.y0),
            (rect.x1, rect.y1),
            (rect.x0, rect.y1),
        ];
        for (i, (x, y)) in corners.into_iter().enumerate() {
            let (ux, uy) = apply_affine(to_user, x, y);
            let op = if i == 0 { "m" } else { "l" };
            ops.push_str(&format!("{:.3} {:.3} {}\n", ux, uy, op));
        }
        ops.push_str("h f\n");
    }
    ops.push_str("Q\n");
    ops
}

impl MuPdfHandle {
    fn pending_page(&mut self, page: usize) -> RedactorResult<&mut PendingPage> {
        if !self.pending.contains_key(&page) {
            let loaded = self
                .document
                .load_page(page as i32)
                .map_err(|e| backend_error(format!("Failed to load page {}", page + 1), e))?;
            let pdf_page = PdfPage::try_from(loaded)
                .map_err(|e| backend_error(format!("Page {} is not a PDF page", page + 1), e))?;
            self.pending.insert(
                page,
                PendingPage {
                    page: pdf_page,
                    fills: Vec::new(),
                },
            );
        }
        self.pending
            .get_mut(&page)
            .ok_or(RedactorError::PageOutOfRange {
                page,
                page_count: self.pending.len(),
            })
    }

    fn content_stream(&mut self, ops: &str) -> Result<PdfObject, mupdf::Error> {
        let dict = self.document.new_dict()?;
        let mut stream = self.document.add_object(&dict)?;
        stream.write_stream_string(ops)?;
        Ok(stream)
    }

    /// Wraps the page's existing content in `q`/`Q` and appends the fills,
    /// so they paint over whatever remains and ignore leftover graphics state.
    fn append_fills(&mut self, page: &PdfPage, ops: &str) -> Result<(), mupdf::Error> {
        let mut page_obj = page.object();
        let mut contents = self.document.new_array()?;
        contents.array_push(self.content_stream("q\n")?)?;
        if let Some(existing) = page_obj.get_dict("Contents")? {
            if existing.is_array()? {
                for i in 0..existing.len()? {
                    if let Some(item) = existing.get_array(i as i32)? {
                        contents.array_push(item)?;
                    }
                }
            } else {
                contents.array_push(existing)?;
            }
        }
        contents.array_push(self.content_stream(&format!("Q\n{}", ops))?)?;
        page_obj.dict_put("Contents", contents)
    }
}

impl DocumentHandle for MuPdfHandle {
    fn page_count(&self) -> RedactorResult<usize> {
        self.document
            .page_count()
            .map(|n| n.max(0) as usize)
            .map_err(|e| backend_error("Failed to get page count".to_string(), e))
    }

    fn add_redaction_mark(&mut self, page: usize, rect: Rect, fill: FillColor) -> RedactorResult<()> {
        let pending = self.pending_page(page)?;
        let annot = pending
            .page
            .create_annotation(PdfAnnotationType::Redact)
            .map_err(|e| backend_error(format!("Failed to create redaction on page {}", page + 1), e))?;

        let mu_rect = mupdf::Rect {
            x0: rect.x0 as f32,
            y0: rect.y0 as f32,
            x1: rect.x1 as f32,
            y1: rect.y1 as f32,
        };
        unsafe {
            ffi::set_annotation_rect(&annot, mu_rect);
        }
        pending.fills.push((rect, fill));
        Ok(())
    }

    fn apply_redactions(&mut self, page: usize) -> RedactorResult<()> {
        let Some(PendingPage { page: mut pdf_page, fills }) = self.pending.remove(&page) else {
            return Ok(());
        };
        pdf_page
            .redact()
            .map_err(|e| backend_error(format!("Failed to apply redactions on page {}", page + 1), e))?;

        let ctm = pdf_page
            .ctm()
            .map_err(|e| backend_error(format!("Failed to read transform of page {}", page + 1), e))?;
        let to_user = invert_ctm(&ctm).ok_or_else(|| RedactorError::Backend {
            backend: BACKEND.to_string(),
            message: format!("Page {} has a singular transform", page + 1),
            source: None,
        })?;
        let ops = fill_content(&fills, &to_user);
        self.append_fills(&pdf_page, &ops)
            .map_err(|e| backend_error(format!("Failed to fill redactions on page {}", page + 1), e))
    }

    fn save(&mut self, path: &Path, options: SaveOptions) -> RedactorResult<()> {
        let path = path_str(path, "output")?;
        let mut write_options = PdfWriteOptions::default();
        write_options
            .set_garbage_level(if options.compact_structure {
                COMPACT_GARBAGE_LEVEL
            } else {
                0
            })
            .set_compress(options.compress_streams);

        self.document
            .save_with_options(&path, write_options)
            .map_err(|e| backend_error(format!("Failed to save '{}'", path), e))
    }
}

/// FFI helper for the annotation rectangle, which the safe API does not cover.
mod ffi {
    use mupdf::pdf::PdfAnnotation;
    use mupdf::Rect;

    #[repr(C)]
    struct PdfAnnotRaw {
        inner: *mut mupdf_sys::pdf_annot,
    }

    /// Sets the rectangle for a PDF annotation via FFI.
    ///
    /// # Safety
    /// The annotation must be valid and the MuPDF context initialized.
    pub unsafe fn set_annotation_rect(annot: &PdfAnnotation, rect: Rect) {
        let annot_raw = std::mem::transmute::<&PdfAnnotation, &PdfAnnotRaw>(annot);
        let ctx = mupdf_sys::mupdf_new_base_context();

        if !ctx.is_null() {
            let fz_rect = mupdf_sys::fz_rect {
                x0: rect.x0,
                y0: rect.y0,
                x1: rect.x1,
                y1: rect.y1,
            };

            mupdf_sys::pdf_set_annot_rect(ctx, annot_raw.inner, fz_rect);
            mupdf_sys::mupdf_drop_base_context(ctx);
        }
    }
}
