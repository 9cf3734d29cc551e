//! `fame similarity <a> <b>`: name similarity score.

use crate::cli::output;
use crate::text::similarity::{similarity, tokenize};
use anyhow::Result;

/// Run the similarity command.
pub fn run(a: &str, b: &str) -> Result<()> {
    let score = similarity(a, b);

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "a": a,
            "b": b,
            "tokens_a": tokenize(a),
            "tokens_b": tokenize(b),
            "similarity": score,
        }));
        return Ok(());
    }

    println!("{score:.4}");
    if output::is_verbose() {
        eprintln!("  tokens: {:?} / {:?}", tokenize(a), tokenize(b));
    }
    Ok(())
}
