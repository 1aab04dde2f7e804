use std::env::args;
use swearjar::Engine;
use tracing_subscriber::EnvFilter;

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let input = args().skip(1).collect::<Vec<_>>().join(" ");
    let evaluation = Engine::default().analyze(&input);
    println!(
        "\"{}\" -> \"{}\" ({} {})",
        input, evaluation.masked_text, evaluation.contains_profanity, evaluation.severity
    );
    for m in &evaluation.matches {
        println!("  {}..{} {:?} {}", m.start, m.end, m.word, m.severity);
    }
}
