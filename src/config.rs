//! Redaction settings, loadable from a TOML file.

use std::path::Path;

use serde::Deserialize;

use crate::domain::draw::DEFAULT_MIN_DRAW_PX;
use crate::domain::layout::{DEFAULT_MIN_CANVAS_WIDTH_PX, DEFAULT_PAGE_SPACING_PX};
use crate::error::{RedactorError, RedactorResult};
use crate::redaction::provider::{FillColor, SaveOptions};

/// Tunables for searching, drawing, layout and saving.
///
/// Every field has a default, so a settings file only needs the keys it
/// changes:
///
/// ```
/// use redmark::RedactionSettings;
///
/// let settings = RedactionSettings::from_toml_str("search_pad_y = 1.0").unwrap();
/// assert_eq!(settings.search_pad_y, 1.0);
/// assert_eq!(settings.zoom, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RedactionSettings {
    /// Rendered pixels per document unit.
    pub zoom: f64,
    /// Vertical padding in pixels applied to search hits; negative shrinks.
    pub search_pad_y: f64,
    /// Drawn rectangles smaller than this along either axis are ignored.
    pub min_draw_px: f64,
    /// RGB fill of applied redactions, components in `0.0..=1.0`.
    pub fill_color: [f32; 3],
    pub page_spacing_px: f64,
    pub min_canvas_width_px: f64,
    /// Drop unused objects and renumber the rest when saving.
    pub compact_structure: bool,
    /// Deflate uncompressed streams when saving.
    pub compress_streams: bool,
}

impl Default for RedactionSettings {
    fn default() -> Self {
        Self {
            zoom: 2.0,
            search_pad_y: -2.0,
            min_draw_px: DEFAULT_MIN_DRAW_PX,
            fill_color: [0.0, 0.0, 0.0],
            page_spacing_px: DEFAULT_PAGE_SPACING_PX,
            min_canvas_width_px: DEFAULT_MIN_CANVAS_WIDTH_PX,
            compact_structure: true,
            compress_streams: true,
        }
    }
}

impl RedactionSettings {
    pub fn from_toml_str(text: &str) -> RedactorResult<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> RedactorResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| RedactorError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects values that would make geometry or saving meaningless.
    pub fn validate(&self) -> RedactorResult<()> {
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(config_error(format!("zoom must be positive, got {}", self.zoom)));
        }
        if !self.search_pad_y.is_finite() {
            return Err(config_error("search_pad_y must be finite"));
        }
        if !(self.min_draw_px.is_finite() && self.min_draw_px >= 0.0) {
            return Err(config_error(format!(
                "min_draw_px must be non-negative, got {}",
                self.min_draw_px
            )));
        }
        if self
            .fill_color
            .iter()
            .any(|c| !(0.0..=1.0).contains(c))
        {
            return Err(config_error(format!(
                "fill_color components must be within 0..=1, got {:?}",
                self.fill_color
            )));
        }
        if [self.page_spacing_px, self.min_canvas_width_px]
            .iter()
            .any(|v| !(v.is_finite() && *v >= 0.0))
        {
            return Err(config_error("layout sizes must be finite and non-negative"));
        }
        Ok(())
    }

    pub fn fill(&self) -> FillColor {
        FillColor::rgb(self.fill_color[0], self.fill_color[1], self.fill_color[2])
    }

    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            compact_structure: self.compact_structure,
            compress_streams: self.compress_streams,
        }
    }
}

fn config_error(reason: impl Into<String>) -> RedactorError {
    RedactorError::Config {
        reason: reason.into(),
    }
}
