//! Per-page render geometry and vertical padding of search hits.

use super::geometry::{Point, Rect};

/// How one page was rendered and where it sits on the canvas.
///
/// Valid for a single render pass; recompute it whenever the page is
/// rendered at a different zoom or the layout moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Rendered pixels per document unit.
    pub scale: f64,
    /// Top-left corner of the rendered page on the canvas, in pixels.
    pub origin: Point,
    pub width_px: f64,
    pub height_px: f64,
    pub width_units: f64,
    pub height_units: f64,
}

impl PageGeometry {
    /// Derives the scale factor as `width_px / width_units`.
    ///
    /// A page with zero width gets a scale of zero, which every consumer
    /// treats as "no usable scale".
    pub fn new(size_units: (f64, f64), size_px: (f64, f64), origin: Point) -> Self {
        let scale = if size_units.0 > 0.0 {
            size_px.0 / size_units.0
        } else {
            0.0
        };
        Self {
            scale,
            origin,
            width_px: size_px.0,
            height_px: size_px.1,
            width_units: size_units.0,
            height_units: size_units.1,
        }
    }

    /// Returns true if the scale can be divided by.
    pub fn has_usable_scale(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0
    }

    /// The page's rendered box on the canvas, edges inclusive.
    pub fn canvas_bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.width_px,
            self.origin.y + self.height_px,
        )
    }

    /// Maps a document rectangle onto the canvas for overlay drawing.
    pub fn to_canvas(&self, rect: &Rect) -> Rect {
        Rect::new(
            self.origin.x + rect.x0 * self.scale,
            self.origin.y + rect.y0 * self.scale,
            self.origin.x + rect.x1 * self.scale,
            self.origin.y + rect.y1 * self.scale,
        )
    }
}

/// Grows (`pad_y_px > 0`) or shrinks (`pad_y_px < 0`) a rectangle vertically.
///
/// The pixel amount is converted to document units with the page's scale.
/// A shrink that would leave `y1 <= y0` returns the input unchanged, as does
/// any adjustment on a page without a usable scale. Horizontal edges are
/// never touched.
pub fn adjust_vertical(geometry: &PageGeometry, rect: Rect, pad_y_px: f64) -> Rect {
    if pad_y_px == 0.0 {
        return rect;
    }
    if !geometry.has_usable_scale() || !pad_y_px.is_finite() {
        tracing::warn!(scale = geometry.scale, pad_y_px, "unusable scale, padding skipped");
        return rect;
    }

    let dy = pad_y_px.abs() / geometry.scale;
    let mut adjusted = rect;
    if pad_y_px > 0.0 {
        adjusted.y0 -= dy;
        adjusted.y1 += dy;
    } else {
        adjusted.y0 += dy;
        adjusted.y1 -= dy;
        if adjusted.y1 <= adjusted.y0 {
            tracing::debug!(?rect, pad_y_px, "shrink would invert rectangle, kept original");
            return rect;
        }
    }
    adjusted
}
