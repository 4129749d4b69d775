//! Skill and keyword extraction.
//!
//! Skills come from two independent passes merged into one set:
//! 1. entity spans labelled Org/Product/Tech, lowercased verbatim;
//! 2. nouns and proper nouns from any sentence mentioning a skill trigger word.
//!
//! Keywords are the most frequent non-stopword tokens.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::lexicon::{is_stopword, SKILL_TRIGGERS};
use crate::analysis::nlp::LanguageModel;
use crate::analysis::AnalysisError;
use crate::models::analysis::{KeywordList, SkillSet};

/// Number of keywords kept per text.
pub const TOP_KEYWORDS: usize = 20;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("word regex is valid"));

/// Extracts candidate skill terms. Model failures propagate.
pub fn extract_skills(model: &dyn LanguageModel, text: &str) -> Result<SkillSet, AnalysisError> {
    let mut skills = SkillSet::new();

    for entity in model.extract_entities(text)? {
        if entity.label.is_skill_like() {
            skills.insert(entity.text.to_lowercase());
        }
    }

    for sentence in model.tokenize_with_pos(text)? {
        let lowered = sentence.text.to_lowercase();
        if !SKILL_TRIGGERS.iter().any(|t| lowered.contains(t)) {
            continue;
        }
        for token in sentence.tokens.iter().filter(|t| t.pos.is_nominal()) {
            let word = token.text.to_lowercase();
            if !is_stopword(&word) {
                skills.insert(word);
            }
        }
    }

    Ok(skills)
}

/// Top `TOP_KEYWORDS` tokens with their counts, by descending count.
/// Ties keep first-occurrence order.
pub fn rank_keywords(text: &str) -> Vec<(String, usize)> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (position, m) in WORD_RE.find_iter(&lowered).enumerate() {
        let word = m.as_str();
        if is_stopword(word) {
            continue;
        }
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(TOP_KEYWORDS)
        .map(|(word, count, _)| (word.to_string(), count))
        .collect()
}

/// The most frequent keyword terms, rank order.
pub fn extract_keywords(text: &str) -> KeywordList {
    rank_keywords(text).into_iter().map(|(word, _)| word).collect()
}
