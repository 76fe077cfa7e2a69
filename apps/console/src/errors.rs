use thiserror::Error;

/// Error taxonomy for one query attempt.
///
/// `Validation` and `Concurrency` are rejected before any network activity.
/// `Transport` and `Format` are kept distinct so the banner can distinguish
/// "server unreachable" from "server returned something unexpected".
#[derive(Debug, Error)]
pub enum AskError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Another question is still in flight")]
    Concurrency,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Format(String),
}

impl AskError {
    pub fn empty_question() -> Self {
        AskError::Validation("question must not be empty".to_string())
    }
}

impl From<reqwest::Error> for AskError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AskError::Format(e.to_string())
        } else {
            AskError::Transport(e.to_string())
        }
    }
}
