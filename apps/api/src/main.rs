mod analysis;
mod config;
mod db;
mod errors;
mod history;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::analysis::nlp::{LanguageModel, ModelBackend, RuleBasedModel};
use crate::config::Config;
use crate::db::create_pool;
use crate::history::store::HistoryStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite history store
    let pool = create_pool(&config.database_url).await?;
    let history = HistoryStore::new(pool);
    history
        .init_schema()
        .await
        .context("Failed to initialize history schema")?;

    // Load the language model once; it is shared read-only by every analysis
    let model = load_language_model(&config).await?;

    let analyzer = ResumeAnalyzer::new(model, config.empty_reference_policy);
    info!(
        "Resume analyzer ready (model: {}, empty reference policy: {:?})",
        analyzer.model_name(),
        config.empty_reference_policy
    );

    let state = AppState::new(history.clone(), analyzer, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the dashboard has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    history.close().await;
    Ok(())
}

async fn load_language_model(config: &Config) -> Result<Arc<dyn LanguageModel>> {
    match config.language_model {
        ModelBackend::RuleBased => {
            let model = match &config.skill_lexicon_path {
                Some(path) => RuleBasedModel::from_lexicon_file(path)
                    .with_context(|| format!("Failed to load skill lexicon {}", path.display()))?,
                None => RuleBasedModel::new(),
            };
            Ok(Arc::new(model))
        }
        ModelBackend::RustBert => load_rust_bert(config).await,
    }
}

#[cfg(feature = "rust-bert")]
async fn load_rust_bert(config: &Config) -> Result<Arc<dyn LanguageModel>> {
    use crate::analysis::bert::RustBertModel;

    if config.skill_lexicon_path.is_some() {
        tracing::warn!("SKILL_LEXICON_PATH only applies to the rule-based model; ignoring it");
    }

    // rust-bert downloads weights with a blocking client, which must not run on the executor
    info!("Loading rust-bert pipelines (first run downloads model weights)...");
    let model = tokio::task::spawn_blocking(RustBertModel::new)
        .await
        .context("rust-bert loader task failed")?
        .context("Failed to load rust-bert pipelines")?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "rust-bert"))]
async fn load_rust_bert(_config: &Config) -> Result<Arc<dyn LanguageModel>> {
    anyhow::bail!("LANGUAGE_MODEL=rust-bert needs a build with `--features rust-bert`")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received");
}
