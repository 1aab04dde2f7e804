use std::time::Duration;

/// Everything that can go wrong inside swearjar.
///
/// Most of these never reach the caller of [`crate::Engine`], which degrades to
/// "no detection" or "no augmentation" instead. They surface from the fallible
/// constructors and from [`crate::Matcher::try_detect`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Severities are 1 (mild), 2 (moderate) or 3 (severe).
    #[error("invalid severity {0}, expected 1, 2 or 3")]
    InvalidSeverity(u8),

    /// A phrase was blank after trimming.
    #[error("phrase is empty")]
    EmptyPhrase,

    /// A phrase could not be compiled into a search pattern.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// The augmenter did not answer in time.
    #[error("augmentation timed out after {0:?}")]
    AugmentTimeout(Duration),

    /// The augmenter answered with something unusable.
    #[error("augmentation failed: {0}")]
    Augment(String),

    #[cfg(feature = "openai")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "openai")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "openai")]
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}

pub type Result<T> = std::result::Result<T, Error>;
