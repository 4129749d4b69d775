use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of `resume_data`. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryRecordRow {
    pub id: i64,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub ats_score: f64,
    pub skill_match: f64,
    pub keyword_match: f64,
}

/// Row of `resume_analysis`, linked many-to-one to `resume_data`. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SuggestionRecordRow {
    pub id: i64,
    pub resume_id: i64,
    pub analysis_date: DateTime<Utc>,
    /// JSON array of suggestion strings.
    pub suggestions: String,
}

/// Dashboard summary over all stored analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickStats {
    pub total_count: i64,
    pub avg_ats_score: f64,
    pub high_performing_count: i64,
    pub success_rate_pct: f64,
}

/// One point of the recent-history series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub ats_score: f64,
    pub skill_match_pct: f64,
    pub keyword_match_pct: f64,
}

impl From<HistoryRecordRow> for HistoryPoint {
    fn from(row: HistoryRecordRow) -> Self {
        Self {
            timestamp: row.upload_date,
            ats_score: row.ats_score,
            skill_match_pct: row.skill_match,
            keyword_match_pct: row.keyword_match,
        }
    }
}
