use crate::Severity;
use std::ops::Range;

/// One flagged occurrence.
///
/// `start` and `end` are half-open char (Unicode scalar value) offsets into the original text,
/// and `word` is exactly the original text between them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    pub word: String,
    pub severity: Severity,
    pub start: usize,
    pub end: usize,
}

impl Match {
    /// Builds a match by slicing `text` at the given char span.
    pub(crate) fn from_span(text: &str, span: Range<usize>, severity: Severity) -> Self {
        Self {
            word: slice_chars(text, span.clone()).to_owned(),
            severity,
            start: span.start,
            end: span.end,
        }
    }

    /// Number of chars covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Matches in the order they were discovered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Detection {
    pub matches: Vec<Match>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Highest severity among the matches, or [`Severity::NONE`].
    pub fn max_severity(&self) -> Severity {
        self.matches
            .iter()
            .map(|m| m.severity)
            .max()
            .unwrap_or(Severity::NONE)
    }

    /// Matches in positional order (discovery order is kept for ties).
    pub fn sorted(&self) -> Vec<&Match> {
        let mut sorted: Vec<&Match> = self.matches.iter().collect();
        sorted.sort_by_key(|m| m.start);
        sorted
    }
}

/// Number of chars in `text`.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Substring of `text` by char offsets. Out-of-range offsets are clamped.
pub(crate) fn slice_chars(text: &str, span: Range<usize>) -> &str {
    let start = byte_offset(text, span.start);
    let end = byte_offset(text, span.end.max(span.start));
    &text[start..end]
}

/// Converts a byte range (on char boundaries) into a char range.
pub(crate) fn char_span(text: &str, bytes: Range<usize>) -> Range<usize> {
    let start = text[..bytes.start].chars().count();
    start..start + text[bytes].chars().count()
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
