use anyhow::{Context, Result};

use crate::backend::SkillLogic;

/// Application configuration loaded from environment variables.
/// Everything has a sensible default so the client runs out of the box
/// against a local backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub use_mock: bool,
    pub skill_logic: SkillLogic,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            use_mock: std::env::var("USE_MOCK")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            skill_logic: std::env::var("SKILL_LOGIC")
                .unwrap_or_else(|_| "and".to_string())
                .parse()
                .map_err(anyhow::Error::msg)
                .context("SKILL_LOGIC must be 'and' or 'or'")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
