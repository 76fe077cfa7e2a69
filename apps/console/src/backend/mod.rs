//! Backend collaborator — the single point of entry for `/ask` calls.
//!
//! The controller only sees the [`QaBackend`] trait, so the live HTTP
//! backend can be swapped for the canned fixture (local development, tests)
//! without touching session logic.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AskError;
use crate::models::AskResult;

pub mod fixture;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Skill-matching mode forwarded to the backend with every question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLogic {
    #[default]
    And,
    Or,
}

impl std::str::FromStr for SkillLogic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(SkillLogic::And),
            "or" => Ok(SkillLogic::Or),
            other => Err(format!("unknown skill logic '{other}' (expected and|or)")),
        }
    }
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    skill_logic: SkillLogic,
}

/// The question-answering collaborator. One logical call per question; the
/// controller enforces that calls do not overlap.
#[async_trait]
pub trait QaBackend: Send + Sync {
    async fn ask(&self, question: &str, skill_logic: SkillLogic) -> Result<AskResult, AskError>;
}

/// Live backend speaking JSON to `{base_url}/ask`.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AskError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AskError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl QaBackend for HttpBackend {
    async fn ask(&self, question: &str, skill_logic: SkillLogic) -> Result<AskResult, AskError> {
        let url = format!("{}/ask", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&AskRequest {
                question,
                skill_logic,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AskError::Transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            )));
        }

        // Read the body first so a shape mismatch is a Format error, not a
        // Transport one.
        let body = response.text().await?;
        let result: AskResult =
            serde_json::from_str(&body).map_err(|e| AskError::Format(e.to_string()))?;

        debug!(
            facts = result.facts.len(),
            docs = result.docs.len(),
            sections = result.sections.len(),
            "ask call succeeded"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_logic_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SkillLogic::And).unwrap(), r#""and""#);
        assert_eq!(serde_json::to_string(&SkillLogic::Or).unwrap(), r#""or""#);
    }

    #[test]
    fn test_skill_logic_from_str() {
        assert_eq!("AND".parse::<SkillLogic>().unwrap(), SkillLogic::And);
        assert_eq!("or".parse::<SkillLogic>().unwrap(), SkillLogic::Or);
        assert!("xor".parse::<SkillLogic>().is_err());
    }

    #[test]
    fn test_ask_request_wire_shape() {
        let request = AskRequest {
            question: "What is Amanda's experience?",
            skill_logic: SkillLogic::default(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["question"], "What is Amanda's experience?");
        assert_eq!(json["skill_logic"], "and");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://localhost:8000/").unwrap();
        assert_eq!(backend.base_url, "http://localhost:8000");
    }
}
