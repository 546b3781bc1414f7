//! # Application Configuration
//!
//! Environment-driven configuration for the `observatory` binary. Values
//! are read once at startup, after `dotenvy` has loaded any `.env` file,
//! and every knob carries a default suitable for a local setup.

use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Chat completions endpoint (OpenAI-compatible).
    pub ai_api_url: String,
    pub ai_api_key: Option<String>,
    pub ai_model: Option<String>,
    /// Embeddings endpoint (OpenAI-compatible).
    pub embeddings_api_url: String,
    pub embeddings_model: String,
    pub embeddings_api_key: Option<String>,
    /// Path to the SQLite database file.
    pub db_url: String,
    /// Feed entries older than this many days are dropped.
    pub lookback_days: i64,
    /// Maximum accepted items per feed per cycle.
    pub per_feed_limit: usize,
    /// Minutes between scheduled cycles; zero or negative disables.
    pub schedule_interval_minutes: i64,
    /// Articles retrieved as answer context.
    pub top_k: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let ai_api_key = env_opt("AI_API_KEY");
        Self {
            ai_api_url: env_or(
                "AI_API_URL",
                "http://localhost:1234/v1/chat/completions",
            ),
            ai_api_key: ai_api_key.clone(),
            ai_model: env_opt("AI_MODEL"),
            embeddings_api_url: env_or(
                "EMBEDDINGS_API_URL",
                "http://localhost:1234/v1/embeddings",
            ),
            embeddings_model: env_or("EMBEDDINGS_MODEL", "text-embedding-3-small"),
            embeddings_api_key: env_opt("EMBEDDINGS_API_KEY").or(ai_api_key),
            db_url: env_or("DB_URL", "db/observatory.db"),
            lookback_days: env_parsed("LOOKBACK_DAYS", 7),
            per_feed_limit: env_parsed("PER_FEED_LIMIT", 5),
            schedule_interval_minutes: env_parsed("SCHEDULE_INTERVAL_MINUTES", 360),
            top_k: env_parsed("TOP_K", observatory::DEFAULT_TOP_K),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, raw, "Unparseable value; using default");
                default
            }
        },
        Err(_) => default,
    }
}
