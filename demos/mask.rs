use swearjar::Engine;

fn main() {
    let engine = Engine::default();

    // Okay words are unaffected.
    show_mask(&engine, "Helló world!");

    // Bad words are masked, keeping a short prefix.
    show_mask(&engine, "Hello shit world, you bastard");

    // Whitelisted phrases are left alone.
    show_mask(&engine, "Emily Dickinson of Massachusetts");

    // Accents and leetspeak are seen through.
    show_mask(&engine, "$h1t, what the hèll");
}

fn show_mask(engine: &Engine, text: &str) {
    println!("{} -> {}", text, engine.analyze(text).masked_text);
}
