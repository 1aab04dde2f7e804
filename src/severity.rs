use crate::Error;
use std::fmt::{self, Display, Formatter};

/// Severity ranks how offensive a phrase is. Higher is worse.
///
/// Individual phrases and matches are always [`Severity::MILD`], [`Severity::MODERATE`] or
/// [`Severity::SEVERE`]. [`Severity::NONE`] only appears as the aggregate of zero matches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Severity(u8);

impl Severity {
    /// Nothing detected.
    pub const NONE: Self = Self(0);
    /// Not that bad.
    pub const MILD: Self = Self(1);
    /// Bad.
    pub const MODERATE: Self = Self(2);
    /// Cover your eyes!
    pub const SEVERE: Self = Self(3);

    /// Numeric level, 0 through 3.
    pub fn level(self) -> u8 {
        self.0
    }

    /// Returns `true` if and only if self meets the given threshold.
    pub fn is(self, threshold: Self) -> bool {
        self >= threshold && self != Self::NONE
    }

    /// Logical opposite of `Self::is`.
    pub fn isnt(self, threshold: Self) -> bool {
        !self.is(threshold)
    }

    /// Coerces an untrusted severity (for example, one reported by an augmenter) into the
    /// valid range. Missing, non-finite and out-of-range values become [`Severity::MODERATE`].
    pub fn sanitize(raw: Option<f64>) -> Self {
        match raw {
            Some(n) if n.is_finite() && (1.0..=3.0).contains(&n) => Self(n.round() as u8),
            _ => Self::MODERATE,
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1..=3 => Ok(Self(level)),
            _ => Err(Error::InvalidSeverity(level)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self.0 {
            0 => "none",
            1 => "mild",
            2 => "moderate",
            _ => "severe",
        })
    }
}
