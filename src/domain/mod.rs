//! Match geometry: from word boxes and pointer drags to document rectangles.
//!
//! Everything in this module is pure. Page text goes through
//! [`line::reconstruct_lines`], [`matcher::Query::find_spans`] and
//! [`mapping::spans_to_rects`]; the resulting rectangles are then padded by
//! [`adjust::adjust_vertical`]. Drawn rectangles take the separate path
//! through [`draw::to_document_rect`].

pub mod adjust;
pub mod draw;
pub mod geometry;
pub mod layout;
pub mod line;
pub mod mapping;
pub mod matcher;
pub mod words;

pub use adjust::{adjust_vertical, PageGeometry};
pub use draw::{to_document_rect, DEFAULT_MIN_DRAW_PX};
pub use geometry::{Point, Rect};
pub use layout::PageLayout;
pub use line::{reconstruct_lines, Line, LineKey, OffsetEntry, OffsetMap};
pub use mapping::{span_to_rect, spans_intersect, spans_to_rects};
pub use matcher::{find_spans, MatchSpan, Query, SearchMode};
pub use words::{split_glyphs_into_words, WordRecord};

/// Rectangles for every match of `query` among one page's words.
///
/// One rectangle per match, in line-key order and left to right within a
/// line. Rectangles are unpadded and in document units.
pub fn match_rects(words: &[WordRecord], query: &Query) -> Vec<Rect> {
    reconstruct_lines(words)
        .values()
        .flat_map(|line| {
            let spans = query.find_spans(&line.text);
            spans_to_rects(line, &spans)
        })
        .collect()
}
