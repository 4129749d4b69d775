//! Axum route handlers for the Analysis API.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::analysis::extractor::DocumentKind;
use crate::analysis::similarity::similarity;
use crate::analysis::AnalysisError;
use crate::errors::AppError;
use crate::models::analysis::{AnalysisInput, AnalysisResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// History id, present when the analysis was persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub result: AnalysisResult,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    #[serde(flatten)]
    pub input: AnalysisInput,
    pub filename: Option<String>,
    #[serde(default)]
    pub persist: bool,
}

#[derive(Debug, Deserialize)]
pub struct SimilarityRequest {
    pub text_a: String,
    pub text_b: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarityResponse {
    pub similarity: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyses
///
/// Multipart fields: `resume` (file, .pdf/.docx), `job_description` (text),
/// optional `persist` ("true"/"false", default true).
/// The upload lives in a temp file that is removed when the analysis finishes or fails.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut upload: Option<(String, NamedTempFile)> = None;
    let mut job_description: Option<String> = None;
    let mut persist = true;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("resume must be a file".to_string()))?;
                let kind = DocumentKind::from_path(Path::new(&filename))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("cannot read resume upload: {e}")))?;
                let dir = state.config.upload_dir.as_deref();
                upload = Some((filename, write_temp_upload(kind, &bytes, dir)?));
            }
            "job_description" => {
                job_description = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("cannot read job_description: {e}"))
                })?);
            }
            "persist" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("cannot read persist: {e}")))?;
                persist = parse_flag(&raw)?;
            }
            _ => {}
        }
    }

    let (filename, temp_file) =
        upload.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let job_description = job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_description cannot be empty".to_string()))?;

    let _guard = state.analysis_lock.lock().await;
    info!("Analyzing upload '{filename}'");

    let result = run_analysis(state.analyzer.clone(), move |analyzer| {
        let result = analyzer.analyze(temp_file.path(), &job_description);
        drop(temp_file);
        result
    })
    .await?;

    let id = if persist {
        Some(state.history.save_analysis(&filename, &result).await?)
    } else {
        None
    };

    Ok(Json(AnalysisResponse { id, result }))
}

/// POST /api/v1/analyses/text
///
/// Scores already-extracted resume text. Not persisted unless `persist` is true.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    if request.input.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if request.input.job_description_text.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description_text cannot be empty".to_string(),
        ));
    }

    let _guard = state.analysis_lock.lock().await;

    let input = request.input;
    let result = run_analysis(state.analyzer.clone(), move |analyzer| {
        analyzer.analyze_text(&input)
    })
    .await?;

    let id = if request.persist {
        let filename = request.filename.as_deref().unwrap_or("pasted-text");
        Some(state.history.save_analysis(filename, &result).await?)
    } else {
        None
    };

    Ok(Json(AnalysisResponse { id, result }))
}

/// POST /api/v1/similarity
///
/// TF-IDF cosine similarity of two texts. Independent of the ATS score.
pub async fn handle_similarity(
    Json(request): Json<SimilarityRequest>,
) -> Result<Json<SimilarityResponse>, AppError> {
    Ok(Json(SimilarityResponse {
        similarity: similarity(&request.text_a, &request.text_b),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Runs a CPU-bound analysis on the blocking pool.
async fn run_analysis<F>(analyzer: Arc<ResumeAnalyzer>, job: F) -> Result<AnalysisResult, AppError>
where
    F: FnOnce(&ResumeAnalyzer) -> Result<AnalysisResult, AnalysisError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || job(&analyzer))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in analysis: {e}")))?
        .map_err(AppError::from)
}

/// Writes an upload to `resume-upload-*.{pdf,docx}` in `dir` (the system temp dir if unset).
fn write_temp_upload(
    kind: DocumentKind,
    bytes: &[u8],
    dir: Option<&Path>,
) -> Result<NamedTempFile, AppError> {
    let suffix = match kind {
        DocumentKind::Pdf => ".pdf",
        DocumentKind::Docx => ".docx",
    };
    let mut builder = tempfile::Builder::new();
    builder.prefix("resume-upload-").suffix(suffix);
    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| AppError::Internal(anyhow::anyhow!("cannot create temp file: {e}")))?;
    file.write_all(bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("cannot write temp file: {e}")))?;
    Ok(file)
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AppError::Validation(format!(
            "persist must be true or false, got '{other}'"
        ))),
    }
}
