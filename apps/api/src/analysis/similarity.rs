//! TF-IDF cosine similarity between two texts.
//!
//! The vector space is fitted on exactly the two input documents:
//! - tokens: `\b\w\w+\b` on lowercased text (single characters ignored)
//! - tf: raw counts
//! - idf: smoothed, `ln((1 + n) / (1 + df)) + 1`
//! - each vector L2-normalised, so the cosine is the dot product
//!
//! Not part of the ATS score; exposed as a standalone primitive.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static TERM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("term regex is valid"));

fn term_counts(text: &str) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    for m in TERM_RE.find_iter(&text.to_lowercase()) {
        *counts.entry(m.as_str().to_string()).or_insert(0.0) += 1.0;
    }
    counts
}

fn weigh_and_normalise(counts: &HashMap<String, f64>, idf: &HashMap<&str, f64>) -> HashMap<String, f64> {
    let mut weighted: HashMap<String, f64> = counts
        .iter()
        .map(|(term, tf)| (term.clone(), tf * idf[term.as_str()]))
        .collect();

    let norm = weighted.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in weighted.values_mut() {
            *w /= norm;
        }
    }
    weighted
}

/// Cosine similarity of the TF-IDF vectors of `a` and `b`, in [0, 1].
///
/// Returns 0 when either text has no terms or the texts share no vocabulary.
pub fn similarity(a: &str, b: &str) -> f64 {
    let counts_a = term_counts(a);
    let counts_b = term_counts(b);

    if counts_a.is_empty() || counts_b.is_empty() {
        return 0.0;
    }

    const N_DOCS: f64 = 2.0;
    let mut idf: HashMap<&str, f64> = HashMap::new();
    for term in counts_a.keys().chain(counts_b.keys()) {
        idf.entry(term.as_str()).or_insert_with(|| {
            let df = counts_a.contains_key(term) as u8 + counts_b.contains_key(term) as u8;
            ((1.0 + N_DOCS) / (1.0 + df as f64)).ln() + 1.0
        });
    }

    let vec_a = weigh_and_normalise(&counts_a, &idf);
    let vec_b = weigh_and_normalise(&counts_b, &idf);

    let dot: f64 = vec_a
        .iter()
        .filter_map(|(term, wa)| vec_b.get(term).map(|wb| wa * wb))
        .sum();

    dot.clamp(0.0, 1.0)
}
