//! Language Model — the narrow NLP interface the analyzer depends on.
//!
//! The analyzer only ever needs two things from a model: entity spans and POS-tagged
//! sentences. `LanguageModel` exposes exactly that, so backends can be swapped (or mocked
//! in tests) without touching the scoring code.
//!
//! Default: `RuleBasedModel` (pure-Rust, deterministic). It uses a technology gazetteer,
//! closed-class word lists and capitalisation/suffix heuristics. It is a heuristic with
//! high false-positive and false-negative rates; there is no confidence scoring.
//! Builds with the `rust-bert` feature can load pretrained pipelines instead (see `bert`).

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::analysis::lexicon;
use crate::analysis::AnalysisError;

// ────────────────────────────────────────────────────────────────────────────
// Model output types
// ────────────────────────────────────────────────────────────────────────────

/// Coarse part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    Noun,
    PropNoun,
    Verb,
    Adj,
    Adv,
    Det,
    Adp,
    Pron,
    Conj,
    Num,
    Other,
}

impl PosTag {
    pub fn is_nominal(self) -> bool {
        matches!(self, PosTag::Noun | PosTag::PropNoun)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub pos: PosTag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub text: String,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Org,
    Product,
    Tech,
    Other,
}

impl EntityLabel {
    /// Labels whose spans count as skills.
    pub fn is_skill_like(self) -> bool {
        matches!(self, EntityLabel::Org | EntityLabel::Product | EntityLabel::Tech)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// NLP backend used by the skill extractor.
///
/// Carried by the analyzer as `Arc<dyn LanguageModel>`.
pub trait LanguageModel: Send + Sync {
    /// Short backend name, logged at startup.
    fn name(&self) -> &str;

    fn extract_entities(&self, text: &str) -> Result<Vec<Entity>, AnalysisError>;

    fn tokenize_with_pos(&self, text: &str) -> Result<Vec<Sentence>, AnalysisError>;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedModel
// ────────────────────────────────────────────────────────────────────────────

/// Word-like runs; keeps `c++`, `c#`, `node.js`, `.net` and `scikit-learn` whole.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.?[\p{L}\p{N}_]+(?:[.\-'][\p{L}\p{N}_]+)*[+#]*").expect("token regex is valid")
});

/// Gazetteer terms this short only match capitalised tokens ("Go", "R", "C").
const SHORT_TERM_LEN: usize = 2;

/// A token with byte offsets into its sentence.
#[derive(Debug, Clone)]
struct SpanToken {
    start: usize,
    end: usize,
    pos: PosTag,
}

pub struct RuleBasedModel {
    tech_terms: HashSet<String>,
    /// Longest gazetteer entry, in tokens.
    max_phrase_tokens: usize,
}

impl RuleBasedModel {
    /// Model backed by the built-in technology gazetteer.
    pub fn new() -> Self {
        Self::with_terms(lexicon::builtin_tech_terms().map(str::to_string))
    }

    /// Built-in gazetteer extended with additional terms (lowercased).
    pub fn with_terms(extra: impl IntoIterator<Item = String>) -> Self {
        let tech_terms: HashSet<String> = lexicon::builtin_tech_terms()
            .map(str::to_string)
            .chain(extra.into_iter().map(|t| t.trim().to_lowercase()))
            .filter(|t| !t.is_empty())
            .collect();

        let max_phrase_tokens = tech_terms
            .iter()
            .map(|t| TOKEN_RE.find_iter(t).count())
            .max()
            .unwrap_or(1)
            .max(1);

        Self {
            tech_terms,
            max_phrase_tokens,
        }
    }

    /// Loads extra gazetteer terms from a newline-separated file. `#` starts a comment line.
    pub fn from_lexicon_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::ModelFailure(format!(
                "cannot read skill lexicon '{}': {e}",
                path.display()
            ))
        })?;

        let terms: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect();

        if terms.is_empty() {
            return Err(AnalysisError::ModelFailure(format!(
                "skill lexicon '{}' contains no terms",
                path.display()
            )));
        }

        info!(
            "Loaded {} extra lexicon terms from {}",
            terms.len(),
            path.display()
        );
        Ok(Self::with_terms(terms))
    }

    fn tag_sentence(&self, sentence: &str) -> Vec<SpanToken> {
        let words: Vec<(usize, usize)> = TOKEN_RE
            .find_iter(sentence)
            .map(|m| (m.start(), m.end()))
            .collect();

        words
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| {
                let word = &sentence[start..end];
                let next_capitalised = words
                    .get(i + 1)
                    .map(|&(s, e)| is_capitalised(&sentence[s..e]))
                    .unwrap_or(false);
                SpanToken {
                    start,
                    end,
                    pos: tag_word(word, i == 0, next_capitalised),
                }
            })
            .collect()
    }

    /// Length in tokens of the longest gazetteer phrase starting at `i`, if any.
    fn gazetteer_match(&self, sentence: &str, tokens: &[SpanToken], i: usize) -> Option<usize> {
        let longest = self.max_phrase_tokens.min(tokens.len() - i);
        (1..=longest).rev().find(|&len| {
            let span = &sentence[tokens[i].start..tokens[i + len - 1].end];
            let lower = span.to_lowercase();
            if !self.tech_terms.contains(&lower) {
                return false;
            }
            lower.chars().count() > SHORT_TERM_LEN || span.chars().any(char::is_uppercase)
        })
    }

    fn sentence_entities(&self, sentence: &str, tokens: &[SpanToken], out: &mut Vec<Entity>) {
        let mut i = 0;
        while i < tokens.len() {
            if let Some(len) = self.gazetteer_match(sentence, tokens, i) {
                out.push(Entity {
                    text: sentence[tokens[i].start..tokens[i + len - 1].end].to_string(),
                    label: EntityLabel::Tech,
                });
                i += len;
                continue;
            }

            if tokens[i].pos != PosTag::PropNoun {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < tokens.len()
                && tokens[j].pos == PosTag::PropNoun
                && self.gazetteer_match(sentence, tokens, j).is_none()
            {
                j += 1;
            }

            let first = &tokens[i];
            let last = &tokens[j - 1];
            let text = &sentence[first.start..last.end];
            let last_word = sentence[last.start..last.end].to_lowercase();

            let label = if j - i >= 2 && lexicon::is_org_suffix(&last_word) {
                EntityLabel::Org
            } else if j - i == 1 && is_distinctive(text) {
                EntityLabel::Product
            } else {
                EntityLabel::Other
            };

            out.push(Entity {
                text: text.to_string(),
                label,
            });
            i = j;
        }
    }
}

/// Which `LanguageModel` backend the service loads at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelBackend {
    #[default]
    RuleBased,
    /// Pretrained transformer pipelines; needs the `rust-bert` cargo feature.
    RustBert,
}

impl FromStr for ModelBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "rule-based" => Ok(Self::RuleBased),
            "rust-bert" => Ok(Self::RustBert),
            other => Err(format!("unknown language model backend '{other}'")),
        }
    }
}

impl LanguageModel for RuleBasedModel {
    fn name(&self) -> &str {
        "rule-based"
    }

    fn extract_entities(&self, text: &str) -> Result<Vec<Entity>, AnalysisError> {
        let mut entities = Vec::new();
        for sentence in split_sentences(text) {
            let tokens = self.tag_sentence(sentence);
            self.sentence_entities(sentence, &tokens, &mut entities);
        }
        Ok(entities)
    }

    fn tokenize_with_pos(&self, text: &str) -> Result<Vec<Sentence>, AnalysisError> {
        Ok(split_sentences(text)
            .into_iter()
            .map(|sentence| Sentence {
                text: sentence.to_string(),
                tokens: self
                    .tag_sentence(sentence)
                    .into_iter()
                    .map(|t| Token {
                        text: sentence[t.start..t.end].to_string(),
                        pos: t.pos,
                    })
                    .collect(),
            })
            .collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Heuristics
// ────────────────────────────────────────────────────────────────────────────

/// Splits at `.`/`!`/`?` followed by whitespace and at line breaks.
/// A line ending in `:` is a heading and stays attached to the line after it.
pub(crate) fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let boundary = match c {
            '\n' => !text[start..i].trim_end().ends_with(':'),
            '.' | '!' | '?' => chars.peek().map(|&(_, n)| n.is_whitespace()).unwrap_or(false),
            _ => false,
        };
        if boundary {
            let end = i + c.len_utf8();
            sentences.push(&text[start..end]);
            start = end;
        }
    }
    sentences.push(&text[start..]);
    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_capitalised(word: &str) -> bool {
    word.chars()
        .find(|c| c.is_alphabetic())
        .map(char::is_uppercase)
        .unwrap_or(false)
}

/// Mixed case (`PostgreSQL`, `iOS`), digits next to letters (`S3`), or `+`/`#`/`.` inside.
fn is_distinctive(word: &str) -> bool {
    let has_alpha = word.chars().any(char::is_alphabetic);
    let has_digit = word.chars().any(|c| c.is_ascii_digit());
    let has_symbol = word.contains(['+', '#']) || word.trim_start_matches('.').contains('.');
    let inner_upper = word.chars().skip(1).any(char::is_uppercase);
    let has_lower = word.chars().any(char::is_lowercase);
    has_alpha && (has_symbol || has_digit || (inner_upper && has_lower))
}

fn is_all_caps(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

fn tag_word(word: &str, sentence_initial: bool, next_capitalised: bool) -> PosTag {
    if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return PosTag::Num;
    }
    if is_all_caps(word) {
        return PosTag::PropNoun;
    }

    let lower = word.to_lowercase();
    let lower = lower.as_str();

    if lexicon::is_determiner(lower) {
        return PosTag::Det;
    }
    if lexicon::is_pronoun(lower) {
        return PosTag::Pron;
    }
    if lexicon::is_adposition(lower) {
        return PosTag::Adp;
    }
    if lexicon::is_conjunction(lower) {
        return PosTag::Conj;
    }
    if lexicon::is_common_verb(lower) {
        return PosTag::Verb;
    }
    if lexicon::is_common_adverb(lower) {
        return PosTag::Adv;
    }

    if is_distinctive(word) || (is_capitalised(word) && (!sentence_initial || next_capitalised)) {
        return PosTag::PropNoun;
    }

    let len = lower.chars().count();
    if len > 4 && lower.ends_with("ly") {
        return PosTag::Adv;
    }
    if (len > 5 && lower.ends_with("ing")) || (len > 4 && lower.ends_with("ed")) {
        return PosTag::Verb;
    }
    const ADJ_SUFFIXES: &[&str] = &["ful", "ous", "ive", "able", "ible", "ical", "less"];
    if len > 5 && ADJ_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return PosTag::Adj;
    }
    if word.chars().all(|c| !c.is_alphanumeric()) {
        return PosTag::Other;
    }

    PosTag::Noun
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels_of(entities: &[Entity], label: EntityLabel) -> Vec<String> {
        entities
            .iter()
            .filter(|e| e.label == label)
            .map(|e| e.text.clone())
            .collect()
    }

    #[test]
    fn test_split_sentences_on_punctuation_and_lines() {
        let sentences = split_sentences("Built APIs. Led a team!\nSkills: Rust\n\n  ");
        assert_eq!(sentences, vec!["Built APIs.", "Led a team!", "Skills: Rust"]);
    }

    #[test]
    fn test_heading_line_joins_the_following_line() {
        let sentences = split_sentences("Skills:\nFigma, Jira\nLed design reviews. Shipped v2");
        assert_eq!(
            sentences,
            vec!["Skills:\nFigma, Jira", "Led design reviews.", "Shipped v2"]
        );
    }

    #[test]
    fn test_decimal_point_does_not_split() {
        let sentences = split_sentences("Improved latency by 3.5x over baseline.");
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn test_tokenizer_keeps_symbol_terms_whole() {
        let model = RuleBasedModel::new();
        let sentences = model
            .tokenize_with_pos("Wrote C++ and C# services on Node.js and .NET")
            .unwrap();
        let words: Vec<&str> = sentences[0].tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            words,
            vec!["Wrote", "C++", "and", "C#", "services", "on", "Node.js", "and", ".NET"]
        );
    }

    #[test]
    fn test_pos_tags_basic_sentence() {
        let model = RuleBasedModel::new();
        let sentences = model
            .tokenize_with_pos("I have strong knowledge of Python and databases")
            .unwrap();
        let tags: Vec<PosTag> = sentences[0].tokens.iter().map(|t| t.pos).collect();
        assert_eq!(
            tags,
            vec![
                PosTag::Pron,
                PosTag::Verb,
                PosTag::Noun,
                PosTag::Noun,
                PosTag::Adp,
                PosTag::PropNoun,
                PosTag::Conj,
                PosTag::Noun,
            ]
        );
    }

    #[test]
    fn test_sentence_initial_capital_is_common_noun() {
        assert_eq!(tag_word("Experience", true, false), PosTag::Noun);
        assert_eq!(tag_word("Experience", false, false), PosTag::PropNoun);
        assert_eq!(tag_word("Acme", true, true), PosTag::PropNoun);
    }

    #[test]
    fn test_suffix_rules() {
        assert_eq!(tag_word("quickly", false, false), PosTag::Adv);
        assert_eq!(tag_word("deployed", false, false), PosTag::Verb);
        assert_eq!(tag_word("scalable", false, false), PosTag::Adj);
        assert_eq!(tag_word("2024", false, false), PosTag::Num);
    }

    #[test]
    fn test_gazetteer_entities_longest_match() {
        let model = RuleBasedModel::new();
        let entities = model
            .extract_entities("Worked on machine learning pipelines with Python and Spring Boot")
            .unwrap();
        let tech = labels_of(&entities, EntityLabel::Tech);
        assert_eq!(tech, vec!["machine learning", "Python", "Spring Boot"]);
    }

    #[test]
    fn test_short_terms_need_capitalisation() {
        let model = RuleBasedModel::new();
        let lower = model.extract_entities("we go to market quickly").unwrap();
        assert!(labels_of(&lower, EntityLabel::Tech).is_empty());

        let upper = model.extract_entities("Services written in Go and R").unwrap();
        assert_eq!(labels_of(&upper, EntityLabel::Tech), vec!["Go", "R"]);
    }

    #[test]
    fn test_org_and_product_entities() {
        let model = RuleBasedModel::new();
        let entities = model
            .extract_entities("Interned at Globex Corp and Stanford University using GraphQL and S3")
            .unwrap();
        assert_eq!(
            labels_of(&entities, EntityLabel::Org),
            vec!["Globex Corp", "Stanford University"]
        );
        assert_eq!(labels_of(&entities, EntityLabel::Product), vec!["S3"]);
        assert_eq!(labels_of(&entities, EntityLabel::Tech), vec!["GraphQL"]);
    }

    #[test]
    fn test_extra_lexicon_terms() {
        let model = RuleBasedModel::with_terms(vec!["Apache Beam".to_string()]);
        let entities = model
            .extract_entities("Streaming jobs on apache beam")
            .unwrap();
        assert_eq!(labels_of(&entities, EntityLabel::Tech), vec!["apache beam"]);
    }

    #[test]
    fn test_model_backend_parsing() {
        assert_eq!("rule-based".parse(), Ok(ModelBackend::RuleBased));
        assert_eq!("RUST_BERT".parse(), Ok(ModelBackend::RustBert));
        assert!("spacy".parse::<ModelBackend>().is_err());
    }

    #[test]
    fn test_lexicon_file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills.txt");
        std::fs::write(&path, "# custom terms\nZig\n\nbevy\n").unwrap();
        let model = RuleBasedModel::from_lexicon_file(&path).unwrap();
        assert!(model.tech_terms.contains("zig"));
        assert!(model.tech_terms.contains("bevy"));
        assert!(model.tech_terms.contains("python"));
    }

    #[test]
    fn test_lexicon_file_errors_are_model_failures() {
        let missing = RuleBasedModel::from_lexicon_file(Path::new("/no/such/lexicon.txt"));
        assert!(matches!(missing, Err(AnalysisError::ModelFailure(_))));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "# nothing here\n\n").unwrap();
        let empty = RuleBasedModel::from_lexicon_file(&path);
        assert!(matches!(empty, Err(AnalysisError::ModelFailure(_))));
    }
}
