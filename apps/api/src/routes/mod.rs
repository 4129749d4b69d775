pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::history::handlers as history;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analyses", post(analysis::handle_analyze_upload))
        .route("/api/v1/analyses/text", post(analysis::handle_analyze_text))
        .route(
            "/api/v1/analyses/:id/suggestions",
            get(history::handle_get_suggestions),
        )
        .route("/api/v1/similarity", post(analysis::handle_similarity))
        // Dashboard API
        .route("/api/v1/dashboard/stats", get(history::handle_quick_stats))
        .route(
            "/api/v1/dashboard/history",
            get(history::handle_recent_history),
        )
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::analyzer::{EmptyReferencePolicy, ResumeAnalyzer};
    use crate::analysis::extractor::fixtures;
    use crate::analysis::nlp::RuleBasedModel;
    use crate::config::Config;
    use crate::db::create_pool;
    use crate::history::store::HistoryStore;

    async fn test_app() -> Router {
        test_app_with_upload_dir(None).await
    }

    async fn test_app_with_upload_dir(upload_dir: Option<&Path>) -> Router {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "UPLOAD_DIR" => upload_dir.map(|d| d.display().to_string()),
            _ => None,
        })
        .unwrap();
        let history = HistoryStore::new(create_pool(&config.database_url).await.unwrap());
        history.init_schema().await.unwrap();
        let analyzer = ResumeAnalyzer::new(
            Arc::new(RuleBasedModel::new()),
            EmptyReferencePolicy::Zero,
        );
        build_router(AppState::new(history, analyzer, config))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_stats_on_empty_store() {
        let app = test_app().await;
        let (status, body) = send(&app, get("/api/v1/dashboard/stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 0);
        assert_eq!(body["avg_ats_score"], 0.0);
        assert_eq!(body["success_rate_pct"], 0.0);
    }

    #[tokio::test]
    async fn test_history_limit_is_validated() {
        let app = test_app().await;
        let (status, body) = send(&app, get("/api/v1/dashboard/history?limit=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app, get("/api/v1/dashboard/history")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_text_analysis_persists_when_asked() {
        let app = test_app().await;
        let request = json!({
            "resume_text": "Backend engineer. Built services in Rust and Python on PostgreSQL.",
            "job_description_text": "We need a Rust engineer who knows Python, PostgreSQL and Docker.",
            "filename": "jane.txt",
            "persist": true
        });

        let (status, body) = send(&app, post_json("/api/v1/analyses/text", request)).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_i64().expect("persisted analysis has an id");
        let score = body["result"]["ats_score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score));

        let (status, stats) = send(&app, get("/api/v1/dashboard/stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_count"], 1);

        let (status, history) = send(&app, get("/api/v1/dashboard/history?limit=5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().unwrap().len(), 1);

        let uri = format!("/api/v1/analyses/{id}/suggestions");
        let (status, stored) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["suggestions"], body["result"]["suggestions"]);
    }

    #[tokio::test]
    async fn test_text_analysis_without_persist_leaves_store_empty() {
        let app = test_app().await;
        let request = json!({
            "resume_text": "Rust developer",
            "job_description_text": "Rust developer wanted"
        });

        let (status, body) = send(&app, post_json("/api/v1/analyses/text", request)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("id").is_none());

        let (_, stats) = send(&app, get("/api/v1/dashboard/stats")).await;
        assert_eq!(stats["total_count"], 0);
    }

    #[tokio::test]
    async fn test_unknown_suggestions_is_not_found() {
        let app = test_app().await;
        let (status, body) = send(&app, get("/api/v1/analyses/999/suggestions")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    const BOUNDARY: &str = "resume-boundary";

    fn multipart_upload(filename: &str, file: &[u8], job_description: &str) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"resume\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file);
        body.extend_from_slice(
            format!(
                "\r\n--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"job_description\"\r\n\r\n\
                 {job_description}\r\n\
                 --{BOUNDARY}--\r\n"
            )
            .as_bytes(),
        );

        Request::builder()
            .method("POST")
            .uri("/api/v1/analyses")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn leftover_uploads(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("resume-upload-"))
            .collect()
    }

    #[tokio::test]
    async fn test_upload_with_unsupported_extension_is_rejected() {
        let app = test_app().await;
        let request = multipart_upload("cv.txt", b"plain text resume", "Rust engineer");

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_docx_upload_is_analyzed_persisted_and_cleaned_up() {
        let uploads = tempfile::tempdir().unwrap();
        let app = test_app_with_upload_dir(Some(uploads.path())).await;
        let docx = fixtures::docx_with_text(
            "Jane Doe\nBackend engineer with experience in Rust, Python and PostgreSQL",
        );
        let request = multipart_upload(
            "jane.docx",
            &docx,
            "Looking for a Rust engineer with Python and Docker experience",
        );

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["id"], 1);
        assert!(body["result"]["candidate_skills"]
            .as_array()
            .unwrap()
            .contains(&json!("rust")));
        assert!(leftover_uploads(uploads.path()).is_empty());

        let (_, stats) = send(&app, get("/api/v1/dashboard/stats")).await;
        assert_eq!(stats["total_count"], 1);
    }

    #[tokio::test]
    async fn test_failed_extraction_leaves_no_upload_behind() {
        let uploads = tempfile::tempdir().unwrap();
        let app = test_app_with_upload_dir(Some(uploads.path())).await;
        let request = multipart_upload("broken.docx", b"not a zip container", "Rust engineer");

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EXTRACTION_FAILED");
        assert!(leftover_uploads(uploads.path()).is_empty());

        let (_, stats) = send(&app, get("/api/v1/dashboard/stats")).await;
        assert_eq!(stats["total_count"], 0);
    }

    #[tokio::test]
    async fn test_similarity_endpoint() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/similarity",
                json!({ "text_a": "", "text_b": "rust engineer" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["similarity"], 0.0);
    }
}
