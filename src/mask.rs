use crate::Match;

/// Masker redacts matched spans of text, keeping a short prefix of each so the result stays
/// readable (`"damn"` becomes `"d***"`).
#[derive(Copy, Clone, Debug)]
pub struct Masker {
    replacement: char,
}

impl Default for Masker {
    fn default() -> Self {
        Self { replacement: '*' }
    }
}

impl Masker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the character used to mask matched words.
    ///
    /// The default is `'*'`.
    pub fn with_replacement(mut self, replacement: char) -> Self {
        self.replacement = replacement;
        self
    }

    /// Returns `text` with every match masked. Offsets are chars of `text`, and the output has
    /// as many chars as the input.
    ///
    /// Matches are applied from the rightmost start to the leftmost, so if two matches overlap,
    /// the one starting first decides how the shared chars look. Spans reaching past the end
    /// of `text` are cut short.
    pub fn mask(&self, text: &str, matches: &[Match]) -> String {
        if matches.is_empty() {
            return text.to_owned();
        }

        let original: Vec<char> = text.chars().collect();
        let mut masked = original.clone();

        let mut sorted: Vec<&Match> = matches.iter().collect();
        sorted.sort_by(|a, b| b.start.cmp(&a.start));

        for m in sorted {
            let end = m.end.min(original.len());
            if m.start >= end {
                continue;
            }
            let len = end - m.start;
            let keep = match len {
                1 => 0,
                2 => 1,
                _ => (len / 3).min(2),
            };
            masked[m.start + keep..end].fill(self.replacement);
            // Restore the kept prefix, which an overlapping match may have masked.
            masked[m.start..m.start + keep].copy_from_slice(&original[m.start..m.start + keep]);
        }

        masked.into_iter().collect()
    }
}

/// Masks `text` with the default [`Masker`].
///
/// ```
/// use swearjar::{detect, mask, Phrase, Severity};
///
/// let text = "I said damn it";
/// let detection = detect(text, &[Phrase::new("damn", Severity::MILD).unwrap()], &[""; 0]);
/// assert_eq!(mask(text, &detection.matches), "I said d*** it");
/// ```
pub fn mask(text: &str, matches: &[Match]) -> String {
    Masker::default().mask(text, matches)
}
