//! Flow layout of rendered pages on a scrolling canvas.

use super::geometry::Point;

pub const DEFAULT_PAGE_SPACING_PX: f64 = 16.0;
pub const DEFAULT_MIN_CANVAS_WIDTH_PX: f64 = 400.0;

/// Page origins on the canvas plus the total scrollable extent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub origins: Vec<Point>,
    pub extent_width: f64,
    pub extent_height: f64,
}

impl PageLayout {
    /// Places pages left to right, wrapping to a new row when a page would
    /// overflow `canvas_width` (never narrower than `min_canvas_width`).
    ///
    /// A page always goes on the current row if the row is still empty, so
    /// a page wider than the canvas gets a row of its own.
    pub fn flow(
        sizes_px: &[(f64, f64)],
        canvas_width: f64,
        spacing: f64,
        min_canvas_width: f64,
    ) -> Self {
        let canvas_width = canvas_width.max(min_canvas_width);
        let mut origins = Vec::with_capacity(sizes_px.len());
        let (mut x, mut y, mut row_height, mut max_x) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);

        for &(w, h) in sizes_px {
            if x > 0.0 && x + w > canvas_width {
                x = 0.0;
                y += row_height + spacing;
                row_height = 0.0;
            }
            origins.push(Point::new(x, y));
            x += w + spacing;
            row_height = row_height.max(h);
            max_x = max_x.max(x);
        }

        Self {
            origins,
            extent_width: max_x,
            extent_height: y + row_height + spacing,
        }
    }

    /// Vertical scroll fraction that brings `page` to the top of the view.
    pub fn scroll_fraction(&self, page: usize) -> Option<f64> {
        let origin = self.origins.get(page)?;
        Some(origin.y / self.extent_height.max(1.0))
    }
}
