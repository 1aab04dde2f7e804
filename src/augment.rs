use crate::mtch::{char_len, char_span};
use crate::{Detection, Match, Phrase, Result, Severity};
use async_trait::async_trait;
use regex::RegexBuilder;
use std::ops::Range;
use tracing::trace;

/// A second opinion on a text, from outside the rule-based matcher (a remote classifier, a local
/// model, ...).
///
/// Whatever an augmenter returns is untrusted: every [`Candidate`] goes through [`sanitize`]
/// before it can become a [`Match`].
#[async_trait]
pub trait Augmenter: Send + Sync {
    /// Looks for profanity in `text`. `whitelist` phrases should never be flagged and
    /// `blacklist` phrases always should.
    async fn augment(
        &self,
        text: &str,
        whitelist: &[String],
        blacklist: &[Phrase],
    ) -> Result<Augmentation>;
}

/// An augmenter that never finds anything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopAugmenter;

#[async_trait]
impl Augmenter for NoopAugmenter {
    async fn augment(&self, _: &str, _: &[String], _: &[Phrase]) -> Result<Augmentation> {
        Ok(Augmentation::default())
    }
}

/// What an augmenter reported.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Augmentation {
    pub contains_profanity: bool,
    pub candidates: Vec<Candidate>,
}

/// A match as reported by an augmenter. Any field may be missing or wrong.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Candidate {
    pub word: Option<String>,
    pub severity: Option<f64>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

/// When [`crate::Engine::evaluate`] consults its augmenter, given that augmentation was
/// requested.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AugmentPolicy {
    /// Only if the rule-based pass found nothing.
    #[default]
    WhenClean,
    /// Every time.
    Always,
}

/// Turns a candidate into a match against `text`, or rejects it.
///
/// - Blank words are rejected.
/// - Severity is forced into 1..=3 (see [`Severity::sanitize`]).
/// - If the offsets are not a non-empty span inside `text`, the word is looked up in `text`
///   (ignoring case) and the first occurrence is used. No occurrence means rejection.
///
/// The reported word is always the text at the final span.
pub fn sanitize(text: &str, candidate: &Candidate) -> Option<Match> {
    let word = candidate
        .word
        .as_deref()
        .map(str::trim)
        .filter(|word| !word.is_empty())?;
    let severity = Severity::sanitize(candidate.severity);

    let span = match (candidate.start, candidate.end) {
        (Some(start), Some(end))
            if 0 <= start && start < end && end as u64 <= char_len(text) as u64 =>
        {
            start as usize..end as usize
        }
        _ => locate(text, word)?,
    };

    Some(Match::from_span(text, span, severity))
}

/// Char span of the first case-insensitive occurrence of `word`.
fn locate(text: &str, word: &str) -> Option<Range<usize>> {
    let pattern = RegexBuilder::new(&regex::escape(word))
        .case_insensitive(true)
        .build()
        .ok()?;
    pattern
        .find(text)
        .map(|found| char_span(text, found.range()))
}

/// Appends the sanitized candidates of `augmentation` to `detection`. Nothing is de-duplicated.
pub fn merge(text: &str, mut detection: Detection, augmentation: &Augmentation) -> Detection {
    for candidate in &augmentation.candidates {
        match sanitize(text, candidate) {
            Some(m) => detection.matches.push(m),
            None => trace!("discarded augmenter candidate {:?}", candidate),
        }
    }
    detection
}
