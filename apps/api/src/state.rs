use std::sync::Arc;

use tokio::sync::Mutex;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::config::Config;
use crate::history::store::HistoryStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub history: HistoryStore,
    pub analyzer: Arc<ResumeAnalyzer>,
    pub config: Config,
    /// Held for the whole analyze-and-persist sequence; one analysis runs at a time.
    pub analysis_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(history: HistoryStore, analyzer: ResumeAnalyzer, config: Config) -> Self {
        Self {
            history,
            analyzer: Arc::new(analyzer),
            config,
            analysis_lock: Arc::new(Mutex::new(())),
        }
    }
}
