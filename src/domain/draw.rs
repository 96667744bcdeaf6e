//! Conversion of pointer-drawn canvas rectangles into document rectangles.

use super::adjust::PageGeometry;
use super::geometry::{Point, Rect};
use crate::error::DegenerateDraw;

/// Draws smaller than this many pixels along either axis are treated as clicks.
pub const DEFAULT_MIN_DRAW_PX: f64 = 3.0;

/// Converts two canvas corners into a rectangle in document units.
///
/// The corners may come in any order. They are made page-local, clamped to
/// the rendered page, checked against `min_px`, divided by the page scale and
/// finally clamped to the page's document size so that rounding in the
/// division can never place an edge outside the page.
///
/// # Errors
/// [`DegenerateDraw`] when the clamped pixel width or height is below
/// `min_px`, or the page has no usable scale or a non-finite or negative size.
pub fn to_document_rect(
    geometry: &PageGeometry,
    p0: Point,
    p1: Point,
    min_px: f64,
) -> Result<Rect, DegenerateDraw> {
    let sizes = [
        geometry.width_px,
        geometry.height_px,
        geometry.width_units,
        geometry.height_units,
    ];
    if !geometry.has_usable_scale() || sizes.iter().any(|v| !(v.is_finite() && *v >= 0.0)) {
        return Err(DegenerateDraw {
            width_px: 0.0,
            height_px: 0.0,
            threshold_px: min_px,
        });
    }

    let local = Rect::from_points(p0, p1);

    let lx0 = (local.x0 - geometry.origin.x).clamp(0.0, geometry.width_px);
    let lx1 = (local.x1 - geometry.origin.x).clamp(0.0, geometry.width_px);
    let ly0 = (local.y0 - geometry.origin.y).clamp(0.0, geometry.height_px);
    let ly1 = (local.y1 - geometry.origin.y).clamp(0.0, geometry.height_px);

    let width_px = lx1 - lx0;
    let height_px = ly1 - ly0;
    if !(width_px >= min_px && height_px >= min_px) {
        return Err(DegenerateDraw {
            width_px,
            height_px,
            threshold_px: min_px,
        });
    }

    let scale = geometry.scale;
    Ok(Rect::new(
        (lx0 / scale).clamp(0.0, geometry.width_units),
        (ly0 / scale).clamp(0.0, geometry.height_units),
        (lx1 / scale).clamp(0.0, geometry.width_units),
        (ly1 / scale).clamp(0.0, geometry.height_units),
    ))
}
