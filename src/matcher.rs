use crate::mtch::char_span;
use crate::phrase::canonical;
use crate::{normalize, Detection, Match, Normalized, Phrase, Result, Set};
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use tracing::{debug, trace, warn};

/// Matcher finds blacklisted phrases in text, in two passes per phrase.
///
/// 1. Whole words in the original text, ignoring case (`"hell"` matches `"Hell!"`, not `"hello"`).
/// 2. Anywhere in the [normalized](crate::normalize) text, which catches obfuscations such as
///    `"h3ll"`. Hits are mapped back to the original text, and dropped if they look like
///    something already reported.
///
/// A phrase that also appears in the whitelist is never matched.
#[derive(Clone, Debug)]
pub struct Matcher {
    blacklist: Vec<Phrase>,
    /// Whole-word pattern of each blacklist entry, compiled up front.
    patterns: Vec<std::result::Result<Regex, regex::Error>>,
    /// In the order given, without blanks or repeats.
    whitelist: Vec<String>,
    whitelisted: Set<String>,
    normalize_phrases: bool,
    duplicate_window: usize,
    size_limit: Option<usize>,
}

impl Matcher {
    /// Takes a snapshot of both lists. Phrases are trimmed and lowercased; blank ones are dropped.
    pub fn new<B, W, S>(blacklist: B, whitelist: W) -> Self
    where
        B: IntoIterator<Item = Phrase>,
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut whitelisted = Set::default();
        let whitelist = whitelist
            .into_iter()
            .map(|phrase| canonical(phrase.as_ref()))
            .filter(|phrase| !phrase.is_empty() && whitelisted.insert(phrase.clone()))
            .collect();

        let mut matcher = Self {
            blacklist: blacklist
                .into_iter()
                .map(|entry| Phrase {
                    phrase: canonical(&entry.phrase),
                    severity: entry.severity,
                })
                .filter(|entry| !entry.phrase.is_empty())
                .collect(),
            patterns: Vec::new(),
            whitelist,
            whitelisted,
            normalize_phrases: false,
            duplicate_window: 3,
            size_limit: None,
        };
        matcher.compile();
        matcher
    }

    fn compile(&mut self) {
        let size_limit = self.size_limit;
        self.patterns = self
            .blacklist
            .iter()
            .map(|entry| {
                let mut builder =
                    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(&entry.phrase)));
                builder.case_insensitive(true);
                if let Some(size_limit) = size_limit {
                    builder.size_limit(size_limit);
                }
                builder.build()
            })
            .collect();
    }

    /// Also normalize each phrase before the second pass, so phrases containing accents or
    /// digraphs (`"café"`, `"duck"`) can be found in normalized text.
    ///
    /// The default is `false`.
    pub fn with_normalize_phrases(mut self, normalize_phrases: bool) -> Self {
        self.normalize_phrases = normalize_phrases;
        self
    }

    /// A second pass hit is considered a duplicate of an existing match that contains the phrase
    /// and starts fewer than this many chars away.
    ///
    /// The default is `3`.
    pub fn with_duplicate_window(mut self, duplicate_window: usize) -> Self {
        self.duplicate_window = duplicate_window;
        self
    }

    /// Caps the compiled size of each whole-word pattern. Phrases that exceed it make detection
    /// fail.
    ///
    /// The default is the `regex` crate's default.
    pub fn with_pattern_size_limit(mut self, size_limit: usize) -> Self {
        self.size_limit = Some(size_limit);
        self.compile();
        self
    }

    pub fn blacklist(&self) -> &[Phrase] {
        &self.blacklist
    }

    /// The whitelist snapshot, trimmed and lowercased.
    pub fn whitelist(&self) -> &[String] {
        &self.whitelist
    }

    pub fn is_whitelisted(&self, phrase: &str) -> bool {
        self.whitelisted.contains(&canonical(phrase))
    }

    /// Finds every match in `text`, in discovery order.
    ///
    /// Never fails. If something goes wrong internally, the problem is logged and the result is
    /// empty, so callers should not read an empty result as proof that `text` is clean when
    /// moderation depends on it. Use [`Matcher::try_detect`] to see the error.
    pub fn detect(&self, text: &str) -> Detection {
        match self.try_detect(text) {
            Ok(detection) => detection,
            Err(e) => {
                warn!("detection failed, reporting no matches: {}", e);
                Detection::default()
            }
        }
    }

    pub fn try_detect(&self, text: &str) -> Result<Detection> {
        let normalized = Normalized::new(text);
        let mut matches = Vec::new();

        for (entry, pattern) in self.blacklist.iter().zip(&self.patterns) {
            if self.whitelisted.contains(&entry.phrase) {
                continue;
            }
            let pattern = pattern.as_ref().map_err(|e| e.clone())?;
            find_words(text, entry, pattern, &mut matches);
            self.find_substrings(text, &normalized, entry, &mut matches);
        }

        debug!(
            "{} matches in {} chars against {} phrases",
            matches.len(),
            normalized.len(),
            self.blacklist.len()
        );
        Ok(Detection { matches })
    }

    /// Second pass: substrings of the normalized text.
    fn find_substrings(
        &self,
        text: &str,
        normalized: &Normalized,
        entry: &Phrase,
        matches: &mut Vec<Match>,
    ) {
        let needle = if self.normalize_phrases {
            Cow::Owned(normalize(&entry.phrase))
        } else {
            Cow::Borrowed(entry.phrase.as_str())
        };
        if needle.is_empty() {
            return;
        }

        // Normalized text is ASCII, so byte offsets are char offsets.
        for (offset, _) in normalized.as_str().match_indices(needle.as_ref()) {
            let span = match normalized.original_span(offset..offset + needle.len()) {
                Some(span) => span,
                None => continue,
            };

            let duplicate = matches.iter().any(|m| {
                m.start.abs_diff(span.start) < self.duplicate_window
                    && m.word.to_lowercase().contains(entry.phrase.as_str())
            });
            if duplicate {
                continue;
            }

            let m = Match::from_span(text, span, entry.severity);
            trace!("\"{}\" matched substring {:?} at {}", entry.phrase, m.word, m.start);
            matches.push(m);
        }
    }
}

/// First pass: whole, case-insensitive words of the original text.
fn find_words(text: &str, entry: &Phrase, pattern: &Regex, matches: &mut Vec<Match>) {
    for found in pattern.find_iter(text) {
        let m = Match::from_span(text, char_span(text, found.range()), entry.severity);
        trace!("\"{}\" matched word {:?} at {}", entry.phrase, m.word, m.start);
        matches.push(m);
    }
}

/// Finds `blacklist` phrases in `text`, skipping any phrase that is also in `whitelist`.
///
/// ```
/// use swearjar::{detect, Phrase, Severity};
///
/// let blacklist = [Phrase::new("hell", Severity::MILD).unwrap()];
/// let detection = detect("what the h3ll", &blacklist, &["heck"]);
/// assert_eq!(detection.matches[0].word, "h3ll");
/// assert_eq!(detection.max_severity(), Severity::MILD);
///
/// assert!(detect("what the hell", &blacklist, &["hell"]).is_empty());
/// ```
pub fn detect<S: AsRef<str>>(text: &str, blacklist: &[Phrase], whitelist: &[S]) -> Detection {
    Matcher::new(blacklist.iter().cloned(), whitelist).detect(text)
}
