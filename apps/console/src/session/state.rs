//! Session state and its pure transition function.
//!
//! Every phase change goes through [`apply`] so the whole machine can be
//! exercised without a backend or a clock.

use chrono::{DateTime, Duration, Utc};

use crate::models::AskResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Mutable state of one query session. Owned exclusively by the controller;
/// consumers read clones via `QuerySessionController::snapshot`.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: Phase,
    pub current_question: String,
    pub last_result: Option<AskResult>,
    pub last_error: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub last_elapsed: Option<Duration>,
    /// Result version, bumped on every completed query. Keys the
    /// invalidation of per-snippet expansion state.
    pub generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            current_question: String::new(),
            last_result: None,
            last_error: None,
            submitted_at: None,
            last_elapsed: None,
            generation: 0,
        }
    }
}

#[derive(Debug)]
pub enum SessionEvent {
    Submitted {
        question: String,
        at: DateTime<Utc>,
    },
    Completed {
        result: AskResult,
        at: DateTime<Utc>,
    },
    Failed {
        message: String,
    },
    ErrorDismissed,
}

/// Applies one event to the session state.
pub fn apply(state: &mut SessionState, event: SessionEvent) {
    match event {
        SessionEvent::Submitted { question, at } => {
            state.phase = Phase::Loading;
            state.current_question = question;
            state.submitted_at = Some(at);
            state.last_error = None;
            state.last_elapsed = None;
        }
        SessionEvent::Completed { result, at } => {
            state.phase = Phase::Succeeded;
            state.last_elapsed = state.submitted_at.map(|started| at - started);
            state.last_result = Some(result);
            state.generation += 1;
        }
        SessionEvent::Failed { message } => {
            state.phase = Phase::Failed;
            state.last_error = Some(message);
        }
        SessionEvent::ErrorDismissed => {
            state.last_error = None;
        }
    }
}
