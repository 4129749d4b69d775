//! History Store — append-only persistence of analyses plus dashboard aggregates.
//!
//! Two tables:
//! - `resume_data`     one row per analysis (scores, filename, upload time)
//! - `resume_analysis` the suggestion list, linked many-to-one to `resume_data`
//!
//! There is no update or delete path.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::models::history::{HistoryPoint, HistoryRecordRow, QuickStats, SuggestionRecordRow};

/// Scores at or above this count as high performing.
pub const HIGH_PERFORMING_THRESHOLD: f64 = 70.0;

pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Owned handle over the store's pool. Cloning shares the pool.
#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates both tables if missing. Safe to call on every startup.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resume_data (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                upload_date TEXT NOT NULL,
                ats_score REAL NOT NULL,
                skill_match REAL NOT NULL,
                keyword_match REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resume_analysis (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                resume_id INTEGER NOT NULL,
                analysis_date TEXT NOT NULL,
                suggestions TEXT NOT NULL,
                FOREIGN KEY (resume_id) REFERENCES resume_data (id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_resume_data_upload_date ON resume_data (upload_date)",
        )
        .execute(&self.pool)
        .await?;

        info!("History schema ready");
        Ok(())
    }

    /// Appends one history row and its linked suggestion row in a single transaction.
    /// Returns the new history id.
    pub async fn save_analysis(
        &self,
        filename: &str,
        result: &AnalysisResult,
    ) -> Result<i64, AppError> {
        let now = Utc::now();
        let suggestions = serde_json::to_string(&result.suggestions)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("cannot encode suggestions: {e}")))?;

        let mut tx = self.pool.begin().await?;

        let resume_id = sqlx::query(
            r#"
            INSERT INTO resume_data (filename, upload_date, ats_score, skill_match, keyword_match)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(filename)
        .bind(now)
        .bind(result.ats_score)
        .bind(result.skill_match_pct)
        .bind(result.keyword_match_pct)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query(
            "INSERT INTO resume_analysis (resume_id, analysis_date, suggestions) VALUES (?1, ?2, ?3)",
        )
        .bind(resume_id)
        .bind(now)
        .bind(&suggestions)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            "Saved analysis {resume_id} for '{filename}' (ats={:.2})",
            result.ats_score
        );
        Ok(resume_id)
    }

    /// Aggregates over every stored analysis. Averages and rates are 0 when the store is empty.
    pub async fn get_quick_stats(&self) -> Result<QuickStats, AppError> {
        let (total_count, avg_ats, high_performing_count): (i64, Option<f64>, i64) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*),
                       AVG(ats_score),
                       COALESCE(SUM(CASE WHEN ats_score >= ?1 THEN 1 ELSE 0 END), 0)
                FROM resume_data
                "#,
            )
            .bind(HIGH_PERFORMING_THRESHOLD)
            .fetch_one(&self.pool)
            .await?;

        let success_rate_pct = if total_count > 0 {
            high_performing_count as f64 / total_count as f64 * 100.0
        } else {
            0.0
        };

        Ok(QuickStats {
            total_count,
            avg_ats_score: avg_ats.unwrap_or(0.0),
            high_performing_count,
            success_rate_pct,
        })
    }

    /// Most recent analyses first, at most `limit` of them.
    pub async fn get_recent_history(&self, limit: i64) -> Result<Vec<HistoryPoint>, AppError> {
        let rows = sqlx::query_as::<_, HistoryRecordRow>(
            r#"
            SELECT id, filename, upload_date, ats_score, skill_match, keyword_match
            FROM resume_data
            ORDER BY upload_date DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(HistoryPoint::from).collect())
    }

    /// Stored suggestion list for one analysis.
    pub async fn get_suggestions(&self, history_id: i64) -> Result<Vec<String>, AppError> {
        let record = sqlx::query_as::<_, SuggestionRecordRow>(
            "SELECT * FROM resume_analysis WHERE resume_id = ?1 ORDER BY id LIMIT 1",
        )
        .bind(history_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {history_id} not found")))?;

        serde_json::from_str(&record.suggestions).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "corrupt suggestions for analysis {history_id}: {e}"
            ))
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("History store closed");
    }
}
