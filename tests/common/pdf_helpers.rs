//! Real PDF fixtures and inspection helpers.

use anyhow::Result;
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Builder for test PDFs with one text line per entry.
///
/// ```no_run
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// TestPdfBuilder::new()
///     .with_page(&["Name: Jane Roe", "Account 12345"])
///     .with_page(&["Second page"])
///     .build(std::path::Path::new("/tmp/test.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    pages: Vec<Vec<String>>,
    font_size: f32,
}

impl TestPdfBuilder {
    pub fn new() -> Self {
        Self {
            title: "Test Document".to_string(),
            pages: Vec::new(),
            font_size: 12.0,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a page whose lines are written top to bottom, 10 mm apart.
    pub fn with_page(mut self, lines: &[&str]) -> Self {
        self.pages
            .push(lines.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.title, Mm(210.0), Mm(297.0), "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        let pages = if self.pages.is_empty() {
            vec![Vec::new()]
        } else {
            self.pages
        };

        for (index, lines) in pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(210.0), Mm(297.0), "Layer 1")
            };
            let current_layer = doc.get_page(page).get_layer(layer);
            for (row, line) in lines.iter().enumerate() {
                let y = 270.0 - row as f32 * 10.0;
                current_layer.use_text(line.as_str(), self.font_size, Mm(20.0), Mm(y), &font);
            }
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts all text from a PDF.
pub fn extract_text(pdf_path: &Path) -> Result<String> {
    pdf_extract::extract_text(pdf_path).map_err(|e| anyhow::anyhow!("Failed to extract text: {}", e))
}

/// Validates that a PDF is loadable and has basic structure.
/// Decoded content of a page (1-based), all content streams concatenated.
pub fn page_content(pdf_path: &Path, page: u32) -> Result<String> {
    let doc = ::lopdf::Document::load(pdf_path)?;
    let page_id = *doc
        .get_pages()
        .get(&page)
        .ok_or_else(|| anyhow::anyhow!("page {} not found", page))?;
    Ok(String::from_utf8_lossy(&doc.get_page_content(page_id)?).into_owned())
}

pub fn is_valid_pdf(pdf_path: &Path) -> bool {
    ::lopdf::Document::load(pdf_path).is_ok()
}

/// Asserts that a string no longer appears in the PDF's text.
pub fn assert_redacted(pdf_path: &Path, pattern: &str) {
    let text = extract_text(pdf_path)
        .unwrap_or_else(|e| panic!("Failed to read '{}': {}", pdf_path.display(), e));
    assert!(
        !text.contains(pattern),
        "Pattern '{}' should be redacted but was found in '{}'",
        pattern,
        pdf_path.display()
    );
}

/// Asserts that a string is still present in the PDF's text.
pub fn assert_preserved(pdf_path: &Path, pattern: &str) {
    let text = extract_text(pdf_path)
        .unwrap_or_else(|e| panic!("Failed to read '{}': {}", pdf_path.display(), e));
    assert!(
        text.contains(pattern),
        "Pattern '{}' should be preserved but was not found in '{}'",
        pattern,
        pdf_path.display()
    );
}
