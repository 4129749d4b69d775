//! `RustBertModel` — pretrained transformer backend for `LanguageModel`.
//!
//! Entities come from rust-bert's CoNLL-03 NER pipeline, tags from its Penn Treebank
//! POS pipeline. Weights are fetched and cached by rust-bert on first load, so `new`
//! blocks for a long time; build it once at startup, off the async executor.
//!
//! Only compiled with the `rust-bert` cargo feature (needs libtorch).

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

use rust_bert::pipelines::ner::NERModel;
use rust_bert::pipelines::pos_tagging::POSModel;
use tracing::info;

use crate::analysis::nlp::{
    split_sentences, Entity, EntityLabel, LanguageModel, PosTag, Sentence, Token,
};
use crate::analysis::AnalysisError;

pub struct RustBertModel {
    ner: Mutex<NERModel>,
    pos: Mutex<POSModel>,
}

impl RustBertModel {
    pub fn new() -> Result<Self, AnalysisError> {
        let ner = NERModel::new(Default::default())
            .map_err(|e| AnalysisError::ModelFailure(format!("cannot load NER pipeline: {e}")))?;
        let pos = POSModel::new(Default::default())
            .map_err(|e| AnalysisError::ModelFailure(format!("cannot load POS pipeline: {e}")))?;

        info!("rust-bert NER and POS pipelines loaded");
        Ok(Self {
            ner: Mutex::new(ner),
            pos: Mutex::new(pos),
        })
    }
}

impl LanguageModel for RustBertModel {
    fn name(&self) -> &str {
        "rust-bert"
    }

    fn extract_entities(&self, text: &str) -> Result<Vec<Entity>, AnalysisError> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let ner = self
            .ner
            .lock()
            .map_err(|_| AnalysisError::ModelFailure("NER pipeline lock poisoned".to_string()))?;
        let predicted =
            catch_unwind(AssertUnwindSafe(|| ner.predict_full_entities(sentences.as_slice())))
                .map_err(|_| AnalysisError::ModelFailure("NER pipeline panicked".to_string()))?;

        Ok(predicted
            .into_iter()
            .flatten()
            .map(|entity| Entity {
                label: conll_label(&entity.label),
                text: entity.word,
            })
            .collect())
    }

    fn tokenize_with_pos(&self, text: &str) -> Result<Vec<Sentence>, AnalysisError> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let pos = self
            .pos
            .lock()
            .map_err(|_| AnalysisError::ModelFailure("POS pipeline lock poisoned".to_string()))?;
        let predicted = catch_unwind(AssertUnwindSafe(|| pos.predict(sentences.as_slice())))
            .map_err(|_| AnalysisError::ModelFailure("POS pipeline panicked".to_string()))?;

        Ok(sentences
            .into_iter()
            .zip(predicted)
            .map(|(sentence, tags)| Sentence {
                text: sentence.to_string(),
                tokens: tags
                    .into_iter()
                    .map(|tag| Token {
                        pos: penn_tag(&tag.label),
                        text: tag.word,
                    })
                    .collect(),
            })
            .collect())
    }
}

/// CoNLL-03 entity classes. `MISC` covers languages, products and events.
fn conll_label(label: &str) -> EntityLabel {
    let bare = label
        .split_once('-')
        .filter(|(prefix, _)| matches!(*prefix, "B" | "I" | "E" | "S"))
        .map(|(_, rest)| rest)
        .unwrap_or(label);
    match bare {
        "ORG" => EntityLabel::Org,
        "MISC" => EntityLabel::Product,
        _ => EntityLabel::Other,
    }
}

fn penn_tag(label: &str) -> PosTag {
    match label {
        "NN" | "NNS" => PosTag::Noun,
        "NNP" | "NNPS" => PosTag::PropNoun,
        "MD" => PosTag::Verb,
        l if l.starts_with("VB") => PosTag::Verb,
        l if l.starts_with("JJ") => PosTag::Adj,
        l if l.starts_with("RB") || l == "WRB" => PosTag::Adv,
        "DT" | "PDT" | "WDT" => PosTag::Det,
        "IN" | "TO" | "RP" => PosTag::Adp,
        "PRP" | "PRP$" | "WP" | "WP$" | "EX" => PosTag::Pron,
        "CC" => PosTag::Conj,
        "CD" => PosTag::Num,
        _ => PosTag::Other,
    }
}
