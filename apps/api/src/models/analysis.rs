use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Deduplicated lowercase skill terms. Ordered only so output is deterministic.
pub type SkillSet = BTreeSet<String>;

/// Keyword terms in rank order (most frequent first).
pub type KeywordList = Vec<String>;

/// The two texts being compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub resume_text: String,
    pub job_description_text: String,
}

/// Score report for one resume against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ats_score: f64,         // 0 – 100
    pub skill_match_pct: f64,   // 0 – 100
    pub keyword_match_pct: f64, // 0 – 100
    pub candidate_skills: SkillSet,
    pub required_skills: SkillSet,
    pub suggestions: Vec<String>,
}
