use crate::Map;
use finl_unicode::categories::{CharacterCategories, MinorCategory};
use lazy_static::lazy_static;
use std::ops::Range;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref LEETSPEAK: Map<char, char> = include_str!("leetspeak.csv")
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let comma = line.find(',').unwrap();
            (
                line[..comma].chars().next().unwrap(),
                line[comma + 1..].chars().next().unwrap(),
            )
        })
        .collect();
}

/// Digraphs and letters that sound alike. Applied in order, globally, not word bounded.
const PHONETIC: [(&str, &str); 4] = [("ph", "f"), ("ck", "k"), ("x", "ks"), ("z", "s")];

/// Reduces `text` to lowercase ASCII letters, digits and single spaces, undoing accents,
/// leetspeak, inserted punctuation and a few phonetic spellings.
///
/// The output is only good for searching. Its offsets do not line up with `text`; use
/// [`Normalized`] to translate them.
///
/// ```
/// assert_eq!(swearjar::normalize("pút@ madre"), "puta madre");
/// assert_eq!(swearjar::normalize("  PH0N3   c@ll "), "fone call");
/// ```
pub fn normalize(text: &str) -> String {
    Normalized::new(text).text
}

/// Normalized text that remembers where each of its characters came from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Normalized {
    text: String,
    /// For each char of `text`, the half-open span of original chars it derives from.
    spans: Vec<(usize, usize)>,
}

/// A normalized char and its original span.
#[derive(Copy, Clone, Debug)]
struct Unit {
    c: char,
    start: usize,
    end: usize,
}

impl Normalized {
    pub fn new(text: &str) -> Self {
        let mut units = Vec::with_capacity(text.len());

        for (i, raw) in text.chars().enumerate() {
            for lower in raw.to_lowercase() {
                // Decompose, so that accents become separate marks that can be dropped.
                for c in std::iter::once(lower).nfd() {
                    if c.get_minor_category() == MinorCategory::Mn {
                        continue;
                    }
                    let c = LEETSPEAK.get(&c).copied().unwrap_or(c);
                    if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                        units.push(Unit {
                            c,
                            start: i,
                            end: i + 1,
                        });
                    }
                }
            }
        }

        // Repeat until stable, otherwise "cck" -> "ck" would need a second normalization.
        loop {
            let mut changed = false;
            for (from, to) in PHONETIC {
                changed |= substitute(&mut units, from, to);
            }
            if !changed {
                break;
            }
        }

        let mut collapsed: Vec<Unit> = Vec::with_capacity(units.len());
        for unit in units {
            if unit.c.is_whitespace() {
                if collapsed.last().map_or(true, |last| last.c == ' ') {
                    continue;
                }
                collapsed.push(Unit { c: ' ', ..unit });
            } else {
                collapsed.push(unit);
            }
        }
        if collapsed.last().map_or(false, |last| last.c == ' ') {
            collapsed.pop();
        }

        Self {
            text: collapsed.iter().map(|u| u.c).collect(),
            spans: collapsed.iter().map(|u| (u.start, u.end)).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in chars (always ASCII, so also in bytes).
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Translates a range of normalized chars into the range of original chars that produced
    /// them. Returns `None` for an empty or out of bounds range.
    pub fn original_span(&self, range: Range<usize>) -> Option<Range<usize>> {
        if range.start >= range.end || range.end > self.spans.len() {
            return None;
        }
        Some(self.spans[range.start].0..self.spans[range.end - 1].1)
    }
}

/// Replaces every non-overlapping occurrence of `from`, scanning left to right. Replacement chars
/// inherit the combined span of the chars they replace. Returns whether anything changed.
fn substitute(units: &mut Vec<Unit>, from: &str, to: &str) -> bool {
    let n = from.chars().count();
    let mut output = Vec::with_capacity(units.len());
    let mut changed = false;
    let mut i = 0;

    while i < units.len() {
        let hit = units
            .get(i..i + n)
            .map_or(false, |window| window.iter().map(|u| u.c).eq(from.chars()));
        if hit {
            let (start, end) = (units[i].start, units[i + n - 1].end);
            output.extend(to.chars().map(|c| Unit { c, start, end }));
            i += n;
            changed = true;
        } else {
            output.push(units[i]);
            i += 1;
        }
    }

    if changed {
        *units = output;
    }
    changed
}
