//! Line reconstruction from a page's word records.
//!
//! Words are grouped by `(block_id, line_id)`, ordered by `word_index`, and
//! joined with a single space. The resulting [`OffsetMap`] records which byte
//! range of the joined string each word occupies, which is what lets a text
//! match be traced back to the boxes that produced it.

use std::collections::BTreeMap;

use super::words::WordRecord;

/// Width of the separator inserted between consecutive tokens.
pub const SEPARATOR_LEN: usize = 1;

/// `(block_id, line_id)` identifying one logical line.
pub type LineKey = (usize, usize);

/// The byte range `[start, end)` that one word occupies in a reconstructed line.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetEntry {
    pub start: usize,
    pub end: usize,
    pub word: WordRecord,
}

/// Offset-to-word index for one reconstructed line.
///
/// Ranges are non-overlapping, in word order, and exactly
/// [`SEPARATOR_LEN`] apart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OffsetMap {
    entries: Vec<OffsetEntry>,
}

impl OffsetMap {
    /// Builds the map for words that are already in line order.
    ///
    /// The cursor advances past a separator after every word, including
    /// the last one; the separator width is fixed rather than measured.
    pub fn build(words: Vec<WordRecord>) -> Self {
        let mut cursor = 0;
        let entries = words
            .into_iter()
            .map(|word| {
                let start = cursor;
                let end = start + word.token.len();
                cursor = end + SEPARATOR_LEN;
                OffsetEntry { start, end, word }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[OffsetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OffsetEntry> {
        self.entries.iter()
    }
}

/// A logical line: its key, the joined search string, and the offset map.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub key: LineKey,
    pub text: String,
    pub offsets: OffsetMap,
}

impl Line {
    /// Builds a line from words sharing one key, sorting them by `word_index`.
    pub fn from_words(key: LineKey, mut words: Vec<WordRecord>) -> Self {
        words.sort_by_key(|w| w.word_index);
        let text = words
            .iter()
            .map(|w| w.token.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            key,
            text,
            offsets: OffsetMap::build(words),
        }
    }

    /// Words of this line in reading order.
    pub fn words(&self) -> impl Iterator<Item = &WordRecord> {
        self.offsets.iter().map(|e| &e.word)
    }
}

/// Groups a page's words into lines keyed by `(block_id, line_id)`.
///
/// Order across lines carries no meaning; the map is ordered by key only so
/// that results are reproducible.
pub fn reconstruct_lines(words: &[WordRecord]) -> BTreeMap<LineKey, Line> {
    let mut groups: BTreeMap<LineKey, Vec<WordRecord>> = BTreeMap::new();
    for word in words {
        groups.entry(word.line_key()).or_default().push(word.clone());
    }

    groups
        .into_iter()
        .map(|(key, group)| (key, Line::from_words(key, group)))
        .collect()
}
