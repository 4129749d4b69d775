//! Resume Analyzer — orchestrates extraction, scoring and suggestion generation.
//!
//! Scoring:
//! - skill_match   = |resume_skills ∩ job_skills| / |job_skills| × 100
//! - keyword_match = |resume_keywords ∩ job_keywords| / |job_keywords| × 100
//! - ats_score     = 0.6 × skill_match + 0.4 × keyword_match
//!
//! All three are rounded to two decimals; the ATS score is computed before rounding.
//! Analysis is all-or-nothing: any extraction or model error aborts the call.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::extractor::extract_text;
use crate::analysis::keywords::{extract_keywords, extract_skills};
use crate::analysis::nlp::LanguageModel;
use crate::analysis::AnalysisError;
use crate::models::analysis::{AnalysisInput, AnalysisResult, KeywordList, SkillSet};

pub const SKILL_WEIGHT: f64 = 0.6;
pub const KEYWORD_WEIGHT: f64 = 0.4;

pub const LOOKS_GOOD_SUGGESTION: &str =
    "Your resume looks good! Consider adding more specific achievements.";

/// What to do when the job description yields no skills or no keywords,
/// which leaves the match percentage without a denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReferencePolicy {
    /// Report 0% for that component.
    #[default]
    Zero,
    /// Fail the analysis with `EmptyReferenceSet`.
    Reject,
}

impl FromStr for EmptyReferencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown empty reference policy '{other}'")),
        }
    }
}

pub struct ResumeAnalyzer {
    model: Arc<dyn LanguageModel>,
    empty_policy: EmptyReferencePolicy,
}

impl ResumeAnalyzer {
    pub fn new(model: Arc<dyn LanguageModel>, empty_policy: EmptyReferencePolicy) -> Self {
        Self {
            model,
            empty_policy,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn extract_skills(&self, text: &str) -> Result<SkillSet, AnalysisError> {
        extract_skills(self.model.as_ref(), text)
    }

    /// Extracts the resume's text, then scores it against the job description.
    pub fn analyze(
        &self,
        resume_path: &Path,
        job_description: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let resume_text = extract_text(resume_path)?;
        self.analyze_text(&AnalysisInput {
            resume_text,
            job_description_text: job_description.to_string(),
        })
    }

    /// Scores already-extracted resume text against the job description.
    pub fn analyze_text(&self, input: &AnalysisInput) -> Result<AnalysisResult, AnalysisError> {
        let resume_skills = self.extract_skills(&input.resume_text)?;
        let job_skills = self.extract_skills(&input.job_description_text)?;

        let resume_keywords = extract_keywords(&input.resume_text);
        let job_keywords = extract_keywords(&input.job_description_text);

        debug!(
            "Extracted {} resume skills, {} job skills, {} resume keywords, {} job keywords",
            resume_skills.len(),
            job_skills.len(),
            resume_keywords.len(),
            job_keywords.len()
        );

        let skill_match = self.resolve(match_percentage(&resume_skills, &job_skills), "skills")?;

        let resume_kw: BTreeSet<&str> = resume_keywords.iter().map(String::as_str).collect();
        let job_kw: BTreeSet<&str> = job_keywords.iter().map(String::as_str).collect();
        let keyword_match = self.resolve(match_percentage(&resume_kw, &job_kw), "keywords")?;

        let ats = ats_score(skill_match, keyword_match);
        let suggestions =
            build_suggestions(&resume_skills, &job_skills, &resume_keywords, &job_keywords);

        info!(
            "Analysis complete: ats={:.2} skill={:.2} keyword={:.2}",
            ats, skill_match, keyword_match
        );

        Ok(AnalysisResult {
            ats_score: round2(ats),
            skill_match_pct: round2(skill_match),
            keyword_match_pct: round2(keyword_match),
            candidate_skills: resume_skills,
            required_skills: job_skills,
            suggestions,
        })
    }

    fn resolve(&self, pct: Option<f64>, which: &'static str) -> Result<f64, AnalysisError> {
        match (pct, self.empty_policy) {
            (Some(p), _) => Ok(p),
            (None, EmptyReferencePolicy::Zero) => {
                warn!("Job description yields no {which}; scoring that component as 0");
                Ok(0.0)
            }
            (None, EmptyReferencePolicy::Reject) => Err(AnalysisError::EmptyReferenceSet(which)),
        }
    }
}

/// Share of `reference` covered by `candidate`, as a percentage.
/// `None` when `reference` is empty.
pub fn match_percentage<T: Ord>(candidate: &BTreeSet<T>, reference: &BTreeSet<T>) -> Option<f64> {
    if reference.is_empty() {
        return None;
    }
    let common = reference.intersection(candidate).count();
    Some(common as f64 / reference.len() as f64 * 100.0)
}

pub fn ats_score(skill_match_pct: f64, keyword_match_pct: f64) -> f64 {
    skill_match_pct * SKILL_WEIGHT + keyword_match_pct * KEYWORD_WEIGHT
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Missing-skills message first, then missing-keywords; the fallback only when both are empty.
fn build_suggestions(
    resume_skills: &SkillSet,
    job_skills: &SkillSet,
    resume_keywords: &KeywordList,
    job_keywords: &KeywordList,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    let missing_skills: Vec<&str> = job_skills
        .difference(resume_skills)
        .map(String::as_str)
        .collect();
    if !missing_skills.is_empty() {
        suggestions.push(format!(
            "Add these missing skills: {}",
            missing_skills.join(", ")
        ));
    }

    let have: HashSet<&str> = resume_keywords.iter().map(String::as_str).collect();
    let missing_keywords: Vec<&str> = job_keywords
        .iter()
        .map(String::as_str)
        .filter(|k| !have.contains(k))
        .collect();
    if !missing_keywords.is_empty() {
        suggestions.push(format!(
            "Incorporate these keywords: {}",
            missing_keywords.join(", ")
        ));
    }

    if suggestions.is_empty() {
        suggestions.push(LOOKS_GOOD_SUGGESTION.to_string());
    }

    suggestions
}
