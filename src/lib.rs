//! swearjar flags, grades and masks blacklisted phrases in free-form text.
//!
//! Detection runs two passes over every blacklisted phrase: a whole-word, case-insensitive
//! search of the original text, and a substring search of the [normalized](normalize) text,
//! which sees through accents, leetspeak and some phonetic spellings. Matches always refer to
//! char offsets of the original text, so they can be [masked](mask) in place.
//!
//! With the `augment` feature (on by default), an [`Engine`] can also ask an [`Augmenter`], such
//! as a remote language model, for a second opinion. Its answers are sanitized before being
//! merged, and any failure degrades to the rule-based result.

#[cfg(feature = "augment")]
mod augment;
mod engine;
mod error;
mod mask;
mod matcher;
mod mtch;
mod normalize;
#[cfg(feature = "openai")]
mod openai;
mod phrase;
mod severity;

#[cfg(feature = "augment")]
pub use augment::{
    merge, sanitize, AugmentPolicy, Augmentation, Augmenter, Candidate, NoopAugmenter,
};
pub use engine::{Engine, Evaluation};
pub use error::{Error, Result};
pub use mask::{mask, Masker};
pub use matcher::{detect, Matcher};
pub use mtch::{Detection, Match};
pub use normalize::{normalize, Normalized};
#[cfg(feature = "openai")]
pub use openai::{OpenAiAugmenter, OpenAiConfig};
pub use phrase::{Phrase, PhraseSource, SeedLists};
pub use severity::Severity;

pub(crate) type Map<K, V> = rustc_hash::FxHashMap<K, V>;
pub(crate) type Set<V> = rustc_hash::FxHashSet<V>;

#[cfg(doctest)]
use doc_comment::doctest;
#[cfg(doctest)]
doctest!("../README.md");
