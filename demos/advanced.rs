use async_trait::async_trait;
use std::time::Duration;
use swearjar::{
    AugmentPolicy, Augmentation, Augmenter, Candidate, Engine, Phrase, Result, Severity,
};

/// Flags "git", which no blacklist will ever contain.
struct Grumpy;

#[async_trait]
impl Augmenter for Grumpy {
    async fn augment(&self, text: &str, _: &[String], _: &[Phrase]) -> Result<Augmentation> {
        let found = text.to_lowercase().contains("git");
        Ok(Augmentation {
            contains_profanity: found,
            candidates: found
                .then(|| Candidate {
                    word: Some(String::from("git")),
                    severity: Some(1.0),
                    start: None,
                    end: None,
                })
                .into_iter()
                .collect(),
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let engine = Engine::new(
        [
            Phrase::new("crap", Severity::MILD).unwrap(),
            Phrase::new("heck", Severity::MILD).unwrap(),
        ],
        ["heck"],
    )
    .with_censor_replacement('?')
    .with_augmenter(Grumpy)
    .with_augment_policy(AugmentPolicy::Always)
    .with_augment_timeout(Duration::from_secs(1));

    let evaluation = engine.analyze("123 Crap");
    assert_eq!(evaluation.masked_text, "123 C???");
    assert!(evaluation.severity.is(Severity::MILD));
    assert!(evaluation.severity.isnt(Severity::MODERATE));

    // Whitelisted entries are never reported, even though they are on the blacklist.
    assert!(!engine.analyze("what the heck").contains_profanity);

    let evaluation = engine.evaluate("Crap, you old Git", true).await;
    assert_eq!(evaluation.matches.len(), 2);
    assert_eq!(evaluation.masked_text, "C???, you old G??");
}
