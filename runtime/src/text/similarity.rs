//! Bag-of-words cosine similarity between short strings.

use super::normalize::normalize;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Word tokens of two or more characters. Single letters (initials) carry
/// no weight.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Lower-cased, accent-stripped word tokens of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    let folded = normalize(text).to_lowercase();
    TOKEN_RE
        .find_iter(&folded)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Similarity in [0, 1] between two names.
///
/// Both strings are tokenized, counted over their shared vocabulary, and
/// compared by cosine. Returns 0.0 when either side has no tokens.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (va, vb) = count_vectors(&tokenize(a), &tokenize(b));
    cosine_similarity(&va, &vb)
}

/// Count vectors over the sorted union vocabulary of both token lists.
fn count_vectors(a: &[String], b: &[String]) -> (Vec<f64>, Vec<f64>) {
    let mut vocab: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for t in a {
        vocab.entry(t.as_str()).or_default().0 += 1.0;
    }
    for t in b {
        vocab.entry(t.as_str()).or_default().1 += 1.0;
    }
    vocab.values().copied().unzip()
}

/// Compute cosine similarity between two equal-length vectors.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
