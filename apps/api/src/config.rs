use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::analysis::analyzer::EmptyReferencePolicy;
use crate::analysis::nlp::ModelBackend;

const DEFAULT_DATABASE_URL: &str = "sqlite://resume_analysis.db";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub language_model: ModelBackend,
    /// Extra gazetteer terms for the rule-based language model.
    pub skill_lexicon_path: Option<PathBuf>,
    pub empty_reference_policy: EmptyReferencePolicy,
    pub max_upload_bytes: usize,
    /// Where uploads are staged while analyzed. System temp dir if unset.
    pub upload_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the environment, in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            language_model: match lookup("LANGUAGE_MODEL") {
                Some(raw) => raw
                    .parse()
                    .map_err(|e: String| anyhow!(e))
                    .context("LANGUAGE_MODEL must be 'rule-based' or 'rust-bert'")?,
                None => ModelBackend::default(),
            },
            skill_lexicon_path: lookup("SKILL_LEXICON_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            empty_reference_policy: match lookup("EMPTY_REFERENCE_POLICY") {
                Some(raw) => raw
                    .parse()
                    .map_err(|e: String| anyhow!(e))
                    .context("EMPTY_REFERENCE_POLICY must be 'zero' or 'reject'")?,
                None => EmptyReferencePolicy::default(),
            },
            max_upload_bytes: match lookup("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            upload_dir: lookup("UPLOAD_DIR")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}
