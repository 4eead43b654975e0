use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_SCHEMA: &str = "jobs";
pub const DEFAULT_SCORING_TIMEOUT_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Schema whose tables are the job partitions.
    pub jobs_schema: String,
    /// Absent means résumé checks use the simulated scorer.
    pub scoring_endpoint_url: Option<String>,
    pub scoring_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jobs_schema: std::env::var("JOBS_SCHEMA")
                .unwrap_or_else(|_| DEFAULT_SCHEMA.to_string()),
            scoring_endpoint_url: optional_env("SCORING_ENDPOINT_URL"),
            scoring_timeout: Duration::from_secs(
                std::env::var("SCORING_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_SCORING_TIMEOUT_SECS.to_string())
                    .parse::<u64>()
                    .context("SCORING_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank are the same thing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
