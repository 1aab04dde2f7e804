use crate::{Error, Result, Severity};
use lazy_static::lazy_static;

lazy_static! {
    static ref BLACKLIST: Vec<Phrase> = include_str!("blacklist.csv")
        .lines()
        .skip(1)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let comma = line.rfind(',').unwrap();
            Phrase::new(
                &line[..comma],
                Severity::try_from(line[comma + 1..].trim().parse::<u8>().unwrap()).unwrap(),
            )
            .unwrap()
        })
        .collect();
    static ref WHITELIST: Vec<String> = include_str!("whitelist.txt")
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(canonical)
        .collect();
}

/// A blacklisted phrase and how offensive it is.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Phrase {
    pub phrase: String,
    pub severity: Severity,
}

impl Phrase {
    /// Trims and lowercases `phrase`.
    pub fn new(phrase: &str, severity: Severity) -> Result<Self> {
        let phrase = canonical(phrase);
        if phrase.is_empty() {
            return Err(Error::EmptyPhrase);
        }
        Ok(Self { phrase, severity })
    }
}

/// The form in which phrases are stored and compared.
pub(crate) fn canonical(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

/// Read access to wherever the blacklist and whitelist are kept.
///
/// Implementations own uniqueness and currency of the lists. The engine takes one snapshot of
/// each and never writes back.
pub trait PhraseSource {
    fn blacklist(&self) -> Vec<Phrase>;

    fn whitelist(&self) -> Vec<String>;
}

/// The lists bundled with the crate.
#[derive(Copy, Clone, Debug, Default)]
pub struct SeedLists;

impl PhraseSource for SeedLists {
    fn blacklist(&self) -> Vec<Phrase> {
        BLACKLIST.clone()
    }

    fn whitelist(&self) -> Vec<String> {
        WHITELIST.clone()
    }
}
