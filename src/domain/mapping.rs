//! Maps match spans back onto the word boxes that produced them.

use super::geometry::Rect;
use super::line::{Line, OffsetMap};
use super::matcher::MatchSpan;

/// Half-open interval intersection: `[m0, m1)` and `[s0, s1)` share a byte.
///
/// Written as `!(m1 <= s0 || m0 >= s1)`; symmetric in its two intervals.
pub fn spans_intersect(m0: usize, m1: usize, s0: usize, s1: usize) -> bool {
    !(m1 <= s0 || m0 >= s1)
}

/// Rectangle covering every word the span touches, in document units.
///
/// Returns `None` when the span only touches separator bytes. Coverage is
/// whole-word: a match on part of a word claims that word's full box.
pub fn span_to_rect(offsets: &OffsetMap, span: MatchSpan) -> Option<Rect> {
    let covered = offsets
        .iter()
        .filter(|e| spans_intersect(span.start, span.end, e.start, e.end))
        .map(|e| &e.word.rect);
    Rect::union_all(covered)
}

/// Maps every span of a line, dropping those that cover no word.
pub fn spans_to_rects(line: &Line, spans: &[MatchSpan]) -> Vec<Rect> {
    spans
        .iter()
        .filter_map(|&span| {
            let rect = span_to_rect(&line.offsets, span);
            if rect.is_none() {
                tracing::debug!(
                    line = ?line.key,
                    start = span.start,
                    end = span.end,
                    "match covers no word, dropped"
                );
            }
            rect
        })
        .collect()
}
