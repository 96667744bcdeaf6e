//! Word records as delivered by a page's text layer.

use super::geometry::Rect;

/// One whitespace-free token on a page, positioned in document units.
///
/// `block_id` and `line_id` jointly identify the logical line the word
/// belongs to; `word_index` orders words within that line.
#[derive(Debug, Clone, PartialEq)]
pub struct WordRecord {
    pub rect: Rect,
    pub token: String,
    pub block_id: usize,
    pub line_id: usize,
    pub word_index: usize,
}

impl WordRecord {
    pub fn new(
        rect: Rect,
        token: impl Into<String>,
        block_id: usize,
        line_id: usize,
        word_index: usize,
    ) -> Self {
        Self {
            rect,
            token: token.into(),
            block_id,
            line_id,
            word_index,
        }
    }

    /// Key of the logical line this word belongs to.
    pub fn line_key(&self) -> (usize, usize) {
        (self.block_id, self.line_id)
    }
}

/// Splits one text line's glyphs into words on Unicode whitespace.
///
/// Each maximal run of non-whitespace glyphs becomes one [`WordRecord`]
/// whose rectangle is the union of its glyph boxes. Word indices are
/// assigned in glyph order starting at zero.
pub fn split_glyphs_into_words<I>(block_id: usize, line_id: usize, glyphs: I) -> Vec<WordRecord>
where
    I: IntoIterator<Item = (char, Rect)>,
{
    let mut words = Vec::new();
    let mut token = String::new();
    let mut bounds: Option<Rect> = None;

    for (c, rect) in glyphs {
        if c.is_whitespace() {
            if let Some(b) = bounds.take() {
                let index = words.len();
                words.push(WordRecord::new(b, std::mem::take(&mut token), block_id, line_id, index));
            }
            continue;
        }
        token.push(c);
        bounds = Some(match bounds {
            Some(b) => b.union(&rect),
            None => rect,
        });
    }
    if let Some(b) = bounds {
        let index = words.len();
        words.push(WordRecord::new(b, token, block_id, line_id, index));
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(text: &str) -> Vec<(char, Rect)> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let x = i as f64 * 5.0;
                (c, Rect::new(x, 0.0, x + 5.0, 10.0))
            })
            .collect()
    }

    #[test]
    fn test_split_on_whitespace() {
        let words = split_glyphs_into_words(1, 2, glyphs("foo  bar"));
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].token, "foo");
        assert_eq!(words[0].rect, Rect::new(0.0, 0.0, 15.0, 10.0));
        assert_eq!(words[1].token, "bar");
        assert_eq!(words[1].word_index, 1);
        assert_eq!(words[1].rect, Rect::new(25.0, 0.0, 40.0, 10.0));
        assert_eq!(words[1].line_key(), (1, 2));
    }

    #[test]
    fn test_leading_and_trailing_whitespace_ignored() {
        let words = split_glyphs_into_words(0, 0, glyphs(" \tx "));
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].token, "x");
        assert_eq!(words[0].word_index, 0);
    }

    #[test]
    fn test_blank_line_has_no_words() {
        assert!(split_glyphs_into_words(0, 0, glyphs("   ")).is_empty());
        assert!(split_glyphs_into_words(0, 0, Vec::new()).is_empty());
    }
}
