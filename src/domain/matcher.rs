//! Match finding inside reconstructed lines.
//!
//! Spans are byte offsets into the line string, the same unit the
//! [`OffsetMap`](super::line::OffsetMap) uses.

use regex::Regex;

use crate::error::{RedactorError, RedactorResult};

/// How a query string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Case-sensitive exact substring.
    #[default]
    Literal,
    /// Regular expression.
    Pattern,
}

/// Half-open byte range `[start, end)` of a match in a line string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Byte length; zero for an empty or inverted span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A query ready to be run against any number of lines.
///
/// Compiling up front means an invalid pattern is reported before any page
/// is searched.
#[derive(Debug, Clone)]
pub enum Query {
    Literal(String),
    Pattern(Regex),
}

impl Query {
    /// Compiles `query` according to `mode`.
    ///
    /// # Errors
    /// [`RedactorError::InvalidPattern`] with the regex engine's diagnostic
    /// if `mode` is [`SearchMode::Pattern`] and the pattern does not compile.
    pub fn compile(query: &str, mode: SearchMode) -> RedactorResult<Self> {
        match mode {
            SearchMode::Literal => Ok(Self::Literal(query.to_string())),
            SearchMode::Pattern => Regex::new(query)
                .map(Self::Pattern)
                .map_err(|e| RedactorError::invalid_pattern(query, e)),
        }
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            Self::Literal(_) => SearchMode::Literal,
            Self::Pattern(_) => SearchMode::Pattern,
        }
    }

    /// Non-overlapping matches in left-to-right order.
    ///
    /// Zero-width matches are discarded: a span must cover at least one byte.
    pub fn find_spans(&self, line: &str) -> Vec<MatchSpan> {
        match self {
            Self::Literal(needle) => find_literal(line, needle),
            Self::Pattern(re) => re
                .find_iter(line)
                .map(|m| MatchSpan::new(m.start(), m.end()))
                .filter(|span| !span.is_empty())
                .collect(),
        }
    }
}

/// Repeated forward scan for `needle`.
///
/// After a hit at `j` the scan resumes at `j + max(1, needle.len())`, so an
/// occurrence overlapping the previous hit is never reported: `"aa"` in
/// `"aaa"` yields a single span.
fn find_literal(line: &str, needle: &str) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    if needle.is_empty() {
        return spans;
    }

    let mut start = 0;
    while let Some(j) = line.get(start..).and_then(|rest| rest.find(needle)) {
        let j = start + j;
        spans.push(MatchSpan::new(j, j + needle.len()));
        start = j + needle.len().max(1);
    }
    spans
}

/// Compiles `query` and runs it over a single line.
pub fn find_spans(line: &str, query: &str, mode: SearchMode) -> RedactorResult<Vec<MatchSpan>> {
    Ok(Query::compile(query, mode)?.find_spans(line))
}
