use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::matching::MatchConfig;

/// Which semantic similarity backend to wire into the matcher at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticBackendKind {
    Gemini,
    None,
}

impl FromStr for SemanticBackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "embedding" => Ok(Self::Gemini),
            "none" | "off" | "disabled" => Ok(Self::None),
            other => bail!("SEMANTIC_BACKEND must be 'gemini' or 'none', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Only numeric parse failures abort startup; every integration is optional.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_embedding_model: String,
    pub semantic_backend: SemanticBackendKind,
    pub semantic_timeout_ms: u64,
    pub semantic_weight: f64,
    pub top_n_keywords: usize,
    pub redis_url: Option<String>,
    pub cache_ttl_secs: u64,
    pub output_dir: PathBuf,
    pub typst_bin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let gemini_api_key = optional_env("GEMINI_API_KEY")
            .filter(|key| key != "your_gemini_api_key_here");

        let semantic_backend = match optional_env("SEMANTIC_BACKEND") {
            Some(raw) => raw.parse()?,
            None if gemini_api_key.is_some() => SemanticBackendKind::Gemini,
            None => SemanticBackendKind::None,
        };

        let semantic_weight: f64 = parse_env("SEMANTIC_WEIGHT", 0.6)?;
        if !(0.0..=1.0).contains(&semantic_weight) {
            bail!("SEMANTIC_WEIGHT must be between 0.0 and 1.0, got {semantic_weight}");
        }

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            gemini_api_key,
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            gemini_embedding_model: optional_env("GEMINI_EMBEDDING_MODEL")
                .unwrap_or_else(|| "text-embedding-004".to_string()),
            semantic_backend,
            semantic_timeout_ms: parse_env("SEMANTIC_TIMEOUT_MS", 5000)?,
            semantic_weight,
            top_n_keywords: parse_env("TOP_N_KEYWORDS", 20)?,
            redis_url: optional_env("REDIS_URL"),
            cache_ttl_secs: parse_env("CACHE_TTL_SECS", 3600)?,
            output_dir: PathBuf::from(
                optional_env("OUTPUT_DIR").unwrap_or_else(|| "output".to_string()),
            ),
            typst_bin: optional_env("TYPST_BIN").unwrap_or_else(|| "typst".to_string()),
        })
    }

    /// Matching policy derived from the environment, handed to the scorer explicitly.
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            top_n_keywords: self.top_n_keywords,
            semantic_weight: self.semantic_weight,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}
