#![no_main]
use libfuzzer_sys::fuzz_target;
use swearjar::{normalize, Engine, Matcher, PhraseSource, SeedLists};

fuzz_target!(|data: &[u8]| {
    if !data.is_empty() {
        let flags = data[0];
        let input = &data[1..];

        if let Ok(text) = std::str::from_utf8(input) {
            let normalized = normalize(text);
            assert_eq!(normalize(&normalized), normalized);

            let matcher = Matcher::new(SeedLists.blacklist(), SeedLists.whitelist())
                .with_normalize_phrases(flag(flags, 0))
                .with_duplicate_window((flags >> 1) as usize & 7);
            let engine = Engine::default()
                .with_matcher(matcher)
                .with_censor_replacement(if flag(flags, 4) { '#' } else { '*' });

            let evaluation = engine.analyze(text);
            let len = text.chars().count();
            assert_eq!(evaluation.masked_text.chars().count(), len);
            assert_eq!(evaluation.contains_profanity, !evaluation.matches.is_empty());
            for m in &evaluation.matches {
                assert!(m.start < m.end && m.end <= len);
                assert!(m.severity.level() >= 1 && m.severity.level() <= 3);
            }
        }
    }
});

fn flag(flags: u8, index: u8) -> bool {
    ((flags >> index) & 1) == 1
}
