use crate::{Detection, Masker, Match, Matcher, Phrase, PhraseSource, SeedLists, Severity};
#[cfg(feature = "augment")]
use crate::{merge, AugmentPolicy, Augmentation, Augmenter, Error, NoopAugmenter, Result};
#[cfg(feature = "augment")]
use std::time::Duration;
use tracing::debug;
#[cfg(feature = "augment")]
use tracing::warn;

/// The verdict on one text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Whether there is at least one match.
    pub contains_profanity: bool,
    /// Highest severity among the matches, [`Severity::NONE`] if there are none.
    pub severity: Severity,
    /// The text with every match masked.
    pub masked_text: String,
    pub matches: Vec<Match>,
}

/// Engine ties a [`Matcher`], a [`Masker`] and, optionally, an [`Augmenter`] together.
///
/// The blacklist and whitelist are snapshots taken at construction. Build a new `Engine` to pick
/// up changes to them.
pub struct Engine {
    matcher: Matcher,
    masker: Masker,
    #[cfg(feature = "augment")]
    augmenter: Box<dyn Augmenter>,
    #[cfg(feature = "augment")]
    augment_timeout: Duration,
    #[cfg(feature = "augment")]
    augment_policy: AugmentPolicy,
}

impl Default for Engine {
    /// An engine over the bundled seed lists.
    fn default() -> Self {
        Self::from_source(&SeedLists)
    }
}

impl Engine {
    pub fn new<B, W, S>(blacklist: B, whitelist: W) -> Self
    where
        B: IntoIterator<Item = Phrase>,
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            matcher: Matcher::new(blacklist, whitelist),
            masker: Masker::default(),
            #[cfg(feature = "augment")]
            augmenter: Box::new(NoopAugmenter),
            #[cfg(feature = "augment")]
            augment_timeout: Duration::from_secs(10),
            #[cfg(feature = "augment")]
            augment_policy: AugmentPolicy::default(),
        }
    }

    /// Snapshots both lists of `source`.
    pub fn from_source<P: PhraseSource + ?Sized>(source: &P) -> Self {
        Self::new(source.blacklist(), source.whitelist())
    }

    /// Replaces the matcher, for example to change its options. The matcher brings its own
    /// blacklist and whitelist snapshot, which the augmenter is also given from then on.
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// See [`Matcher::with_normalize_phrases`].
    pub fn with_normalize_phrases(mut self, normalize_phrases: bool) -> Self {
        self.matcher = self.matcher.with_normalize_phrases(normalize_phrases);
        self
    }

    /// Sets the character used to mask matched words.
    ///
    /// The default is `'*'`.
    pub fn with_censor_replacement(mut self, replacement: char) -> Self {
        self.masker = self.masker.with_replacement(replacement);
        self
    }

    /// Sets the augmenter consulted by [`Engine::evaluate`].
    ///
    /// The default is [`NoopAugmenter`].
    #[cfg(feature = "augment")]
    pub fn with_augmenter<A: Augmenter + 'static>(mut self, augmenter: A) -> Self {
        self.augmenter = Box::new(augmenter);
        self
    }

    /// How long to wait for the augmenter before giving up on it.
    ///
    /// The default is 10 seconds.
    #[cfg(feature = "augment")]
    pub fn with_augment_timeout(mut self, augment_timeout: Duration) -> Self {
        self.augment_timeout = augment_timeout;
        self
    }

    /// The default is [`AugmentPolicy::WhenClean`].
    #[cfg(feature = "augment")]
    pub fn with_augment_policy(mut self, augment_policy: AugmentPolicy) -> Self {
        self.augment_policy = augment_policy;
        self
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// See [`Matcher::whitelist`].
    pub fn whitelist(&self) -> &[String] {
        self.matcher.whitelist()
    }

    /// Evaluates `text` with the rule-based matcher only.
    pub fn analyze(&self, text: &str) -> Evaluation {
        self.conclude(text, self.matcher.detect(text))
    }

    /// Evaluates `text`, asking the augmenter for a second opinion if `use_augmentation` is set
    /// and the [`AugmentPolicy`] allows it.
    ///
    /// Augmenter failures (including timeouts) are logged and ignored, so this always returns
    /// at least the rule-based result. Must be called within a Tokio runtime.
    #[cfg(feature = "augment")]
    pub async fn evaluate(&self, text: &str, use_augmentation: bool) -> Evaluation {
        let mut detection = self.matcher.detect(text);

        let wanted = match self.augment_policy {
            AugmentPolicy::WhenClean => detection.is_empty(),
            AugmentPolicy::Always => true,
        };
        if use_augmentation && wanted {
            match self.augment(text).await {
                Ok(augmentation) => {
                    debug!(
                        "augmenter reported {} candidates (contains_profanity = {})",
                        augmentation.candidates.len(),
                        augmentation.contains_profanity
                    );
                    detection = merge(text, detection, &augmentation);
                }
                Err(e) => warn!("augmentation failed, using rule-based matches only: {}", e),
            }
        }

        self.conclude(text, detection)
    }

    #[cfg(feature = "augment")]
    async fn augment(&self, text: &str) -> Result<Augmentation> {
        let pending = self
            .augmenter
            .augment(text, self.matcher.whitelist(), self.matcher.blacklist());
        tokio::time::timeout(self.augment_timeout, pending)
            .await
            .map_err(|_| Error::AugmentTimeout(self.augment_timeout))?
    }

    fn conclude(&self, text: &str, detection: Detection) -> Evaluation {
        let severity = detection.max_severity();
        let masked_text = self.masker.mask(text, &detection.matches);
        debug!("{} matches, severity {}", detection.matches.len(), severity);
        Evaluation {
            contains_profanity: !detection.is_empty(),
            severity,
            masked_text,
            matches: detection.matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Engine;
    use crate::{Matcher, Phrase, Severity};

    #[test]
    fn damn() {
        let evaluation = Engine::default().analyze("I said damn it");
        assert!(evaluation.contains_profanity);
        assert_eq!(evaluation.severity, Severity::MILD);
        assert_eq!(evaluation.masked_text, "I said d*** it");
        assert_eq!(evaluation.masked_text.chars().count(), 14);
        assert_eq!(evaluation.matches.len(), 1);
    }

    #[test]
    fn clean() {
        let evaluation = Engine::default().analyze("Emily Dickinson, of Massachusetts");
        assert!(!evaluation.contains_profanity);
        assert_eq!(evaluation.severity, Severity::NONE);
        assert_eq!(evaluation.masked_text, "Emily Dickinson, of Massachusetts");
        assert!(evaluation.matches.is_empty());
    }

    #[test]
    fn worst_severity() {
        let evaluation = Engine::default().analyze("crap, this b!tch is a motherfucker");
        assert_eq!(evaluation.severity, Severity::SEVERE);
        assert_eq!(evaluation.masked_text, "c***, this b**** is a mo**********");
    }

    #[test]
    fn whitelist_snapshot() {
        let engine = Engine::new(
            [Phrase::new("heck", Severity::MILD).unwrap()],
            [" Heck ", ""],
        );
        assert_eq!(engine.whitelist(), ["heck"]);
        assert!(!engine.analyze("heck").contains_profanity);
    }

    #[test]
    fn replaced_matcher_brings_whitelist() {
        let heck = || Phrase::new("heck", Severity::MILD).unwrap();
        let engine = Engine::new([heck()], ["heck"]);
        assert!(!engine.analyze("heck").contains_profanity);

        let engine = engine.with_matcher(Matcher::new([heck()], ["gosh"]));
        assert_eq!(engine.whitelist(), ["gosh"]);
        assert!(engine.analyze("heck").contains_profanity);
    }

    #[test]
    fn options() {
        let evaluation = Engine::default()
            .with_normalize_phrases(true)
            .with_censor_replacement('#')
            .analyze("f.u.c.k off");
        assert_eq!(evaluation.masked_text, "f.##### off");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json() {
        let evaluation = Engine::default().analyze("fuck this");
        assert_eq!(
            serde_json::to_value(&evaluation).unwrap(),
            serde_json::json!({
                "contains_profanity": true,
                "severity": 3,
                "masked_text": "f*** this",
                "matches": [{"word": "fuck", "severity": 3, "start": 0, "end": 4}]
            })
        );
    }

    #[cfg(feature = "augment")]
    mod augmented {
        use super::super::Engine;
        use crate::{
            AugmentPolicy, Augmentation, Augmenter, Candidate, Error, Phrase, Result, Severity,
        };
        use async_trait::async_trait;
        use crate::Matcher;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::{Arc, Mutex};
        use std::time::Duration;

        /// Reports "muppet", counting calls.
        #[derive(Clone, Default)]
        struct Muppets {
            calls: Arc<AtomicUsize>,
        }

        #[async_trait]
        impl Augmenter for Muppets {
            async fn augment(&self, _: &str, _: &[String], _: &[Phrase]) -> Result<Augmentation> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(Augmentation {
                    contains_profanity: true,
                    candidates: vec![
                        Candidate {
                            word: Some(String::from("muppet")),
                            severity: Some(7.0),
                            start: Some(-1),
                            end: None,
                        },
                        Candidate::default(),
                    ],
                })
            }
        }

        /// Remembers the lists it was given.
        #[derive(Clone, Default)]
        struct Recorder {
            seen: Arc<Mutex<Option<(Vec<String>, Vec<Phrase>)>>>,
        }

        #[async_trait]
        impl Augmenter for Recorder {
            async fn augment(
                &self,
                _: &str,
                whitelist: &[String],
                blacklist: &[Phrase],
            ) -> Result<Augmentation> {
                *self.seen.lock().unwrap() = Some((whitelist.to_vec(), blacklist.to_vec()));
                Ok(Augmentation::default())
            }
        }

        struct Broken;

        #[async_trait]
        impl Augmenter for Broken {
            async fn augment(&self, _: &str, _: &[String], _: &[Phrase]) -> Result<Augmentation> {
                Err(Error::Augment(String::from("unavailable")))
            }
        }

        struct Slow;

        #[async_trait]
        impl Augmenter for Slow {
            async fn augment(&self, _: &str, _: &[String], _: &[Phrase]) -> Result<Augmentation> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Augmentation::default())
            }
        }

        #[tokio::test]
        async fn noop_by_default() {
            let engine = Engine::default();
            assert_eq!(
                engine.evaluate("I said damn it", true).await,
                engine.analyze("I said damn it")
            );
            assert!(!engine.evaluate("hello", true).await.contains_profanity);
        }

        #[tokio::test]
        async fn merged() {
            let engine = Engine::default().with_augmenter(Muppets::default());
            let evaluation = engine.evaluate("you utter muppet", true).await;
            assert!(evaluation.contains_profanity);
            assert_eq!(evaluation.severity, Severity::MODERATE);
            assert_eq!(evaluation.matches.len(), 1);
            assert_eq!(evaluation.matches[0].span(), 10..16);
            assert_eq!(evaluation.masked_text, "you utter mu****");
        }

        #[tokio::test]
        async fn policy() {
            let muppets = Muppets::default();
            let engine = Engine::default().with_augmenter(muppets.clone());

            // Not requested.
            engine.evaluate("you utter muppet", false).await;
            // Rules already found something.
            let evaluation = engine.evaluate("damn muppet", true).await;
            assert_eq!(evaluation.matches.len(), 1);
            assert_eq!(muppets.calls.load(Ordering::SeqCst), 0);

            let engine = engine.with_augment_policy(AugmentPolicy::Always);
            let evaluation = engine.evaluate("damn muppet", true).await;
            assert_eq!(evaluation.matches.len(), 2);
            assert_eq!(evaluation.severity, Severity::MODERATE);
            assert_eq!(evaluation.masked_text, "d*** mu****");
            assert_eq!(muppets.calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn augmenter_sees_matcher_lists() {
            let heck = || Phrase::new("heck", Severity::MILD).unwrap();
            let recorder = Recorder::default();
            let engine = Engine::new([heck()], ["heck"])
                .with_matcher(Matcher::new([heck()], ["gosh"]))
                .with_augmenter(recorder.clone())
                .with_augment_policy(AugmentPolicy::Always);

            let evaluation = engine.evaluate("heck", true).await;
            assert!(evaluation.contains_profanity);

            let (whitelist, blacklist) = recorder.seen.lock().unwrap().take().unwrap();
            assert_eq!(whitelist, ["gosh"]);
            assert_eq!(blacklist, [heck()]);
        }

        #[tokio::test]
        async fn failure_degrades() {
            let engine = Engine::default().with_augmenter(Broken);
            let evaluation = engine.evaluate("you utter muppet", true).await;
            assert!(!evaluation.contains_profanity);
            assert_eq!(evaluation.masked_text, "you utter muppet");
        }

        #[tokio::test]
        async fn timeout_degrades() {
            let engine = Engine::default()
                .with_augmenter(Slow)
                .with_augment_timeout(Duration::from_millis(20));
            let evaluation = engine.evaluate("you utter muppet", true).await;
            assert!(!evaluation.contains_profanity);
            assert_eq!(evaluation.severity, Severity::NONE);

            let evaluation = engine
                .with_augment_policy(AugmentPolicy::Always)
                .evaluate("h3ll no", true)
                .await;
            assert_eq!(evaluation.severity, Severity::MILD);
            assert_eq!(evaluation.masked_text, "h*** no");
        }
    }
}
