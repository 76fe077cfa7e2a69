//! Query session orchestration.
//!
//! One controller owns one [`SessionState`] and one [`HistoryStore`] behind a
//! single mutex, calls the backend collaborator, and never races two in-flight
//! questions: a submission while `Loading` is rejected with
//! `AskError::Concurrency` rather than cancel-and-replace, so a stale
//! completion can never overwrite a newer question's state.

pub mod history;
pub mod state;

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};

use crate::backend::{QaBackend, SkillLogic};
use crate::errors::AskError;
use history::{HistoryEntry, HistoryStore};
use state::{apply, Phase, SessionEvent, SessionState};

pub struct QuerySessionController {
    backend: Arc<dyn QaBackend>,
    skill_logic: SkillLogic,
    // Never held across an await.
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    state: SessionState,
    history: HistoryStore,
}

impl QuerySessionController {
    pub fn new(backend: Arc<dyn QaBackend>, skill_logic: SkillLogic) -> Self {
        Self {
            backend,
            skill_logic,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Submits a question.
    ///
    /// Returns `Err` only for the pre-network rejections (`Validation`,
    /// `Concurrency`); a backend failure resolves to `Ok(())` with the
    /// message stored in `last_error`, which the UI surfaces as the
    /// dismissible, retryable banner.
    pub async fn submit(&self, question: &str) -> Result<(), AskError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AskError::empty_question());
        }

        {
            let mut inner = self.lock();
            if inner.state.phase == Phase::Loading {
                return Err(AskError::Concurrency);
            }
            apply(
                &mut inner.state,
                SessionEvent::Submitted {
                    question: question.to_string(),
                    at: Utc::now(),
                },
            );
        }

        info!(question, "submitting question");
        match self.backend.ask(question, self.skill_logic).await {
            Ok(result) => {
                let mut inner = self.lock();
                inner
                    .history
                    .add(HistoryEntry::new(question, result.clone()));
                apply(
                    &mut inner.state,
                    SessionEvent::Completed {
                        result,
                        at: Utc::now(),
                    },
                );
                info!(
                    elapsed_ms = inner
                        .state
                        .last_elapsed
                        .map(|d| d.num_milliseconds())
                        .unwrap_or_default(),
                    "question answered"
                );
            }
            Err(e) => {
                warn!(error = %e, "question failed");
                let mut inner = self.lock();
                apply(
                    &mut inner.state,
                    SessionEvent::Failed {
                        message: e.to_string(),
                    },
                );
            }
        }

        Ok(())
    }

    /// Re-submits the last question in full. No-op without a prior question;
    /// one immediate retry per call, no backoff.
    pub async fn retry(&self) -> Result<(), AskError> {
        let question = self.lock().state.current_question.clone();
        if question.is_empty() {
            return Ok(());
        }
        self.submit(&question).await
    }

    /// Re-runs a question picked from the history list. The stored result is
    /// not replayed; the backend may answer differently than last time.
    pub async fn select_from_history(&self, question: &str) -> Result<(), AskError> {
        self.submit(question).await
    }

    pub fn dismiss_error(&self) {
        let mut inner = self.lock();
        apply(&mut inner.state, SessionEvent::ErrorDismissed);
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn recent_history(&self) -> Vec<HistoryEntry> {
        self.lock().history.recent().to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.lock().history.len()
    }

    pub fn clear_history(&self) {
        self.lock().history.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Recover the guard if a previous holder panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::backend::fixture::FixtureBackend;
    use crate::models::AskResult;

    /// Records every question it is asked; resolves after a fixed delay.
    struct CountingBackend {
        calls: AtomicUsize,
        questions: Mutex<Vec<String>>,
        delay: Duration,
    }

    impl CountingBackend {
        fn new(delay: Duration) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                questions: Mutex::new(Vec::new()),
                delay,
            }
        }
    }

    #[async_trait]
    impl QaBackend for CountingBackend {
        async fn ask(
            &self,
            question: &str,
            _skill_logic: SkillLogic,
        ) -> Result<AskResult, AskError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.questions.lock().unwrap().push(question.to_string());
            tokio::time::sleep(self.delay).await;
            Ok(AskResult {
                sections: vec![],
                facts: vec![],
                docs: vec![],
                answer: Some("ok".to_string()),
                why: None,
            })
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl QaBackend for FailingBackend {
        async fn ask(
            &self,
            _question: &str,
            _skill_logic: SkillLogic,
        ) -> Result<AskResult, AskError> {
            Err(AskError::Transport(
                "HTTP 500: Internal Server Error".to_string(),
            ))
        }
    }

    fn controller(backend: Arc<dyn QaBackend>) -> QuerySessionController {
        QuerySessionController::new(backend, SkillLogic::And)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixture_submission_succeeds() {
        let ctrl = controller(Arc::new(FixtureBackend::canned()));
        ctrl.submit("What is Amanda's experience?").await.unwrap();

        let state = ctrl.snapshot();
        assert_eq!(state.phase, Phase::Succeeded);
        assert!(state.last_error.is_none());
        assert!(state.last_elapsed.is_some());

        let result = state.last_result.unwrap();
        assert_eq!(result.facts.len(), 1);
        assert_eq!(result.docs.len(), 2);
        assert_eq!(ctrl.history_len(), 1);
        assert_eq!(
            ctrl.recent_history()[0].question,
            "What is Amanda's experience?"
        );
    }

    #[tokio::test]
    async fn test_failed_submission_sets_banner_and_skips_history() {
        let ctrl = controller(Arc::new(FailingBackend));
        ctrl.submit("anything").await.unwrap();

        let state = ctrl.snapshot();
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(
            state.last_error.as_deref(),
            Some("Transport error: HTTP 500: Internal Server Error")
        );
        assert_eq!(ctrl.history_len(), 0);
    }

    #[tokio::test]
    async fn test_empty_question_never_reaches_backend() {
        let backend = Arc::new(CountingBackend::new(Duration::ZERO));
        let ctrl = controller(backend.clone());

        for question in ["", "   ", "\t\n"] {
            let err = ctrl.submit(question).await.unwrap_err();
            assert!(matches!(err, AskError::Validation(_)));
        }

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ctrl.snapshot().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_question_is_trimmed_before_submission() {
        let backend = Arc::new(CountingBackend::new(Duration::ZERO));
        let ctrl = controller(backend.clone());
        ctrl.submit("  who knows React?  ").await.unwrap();

        assert_eq!(backend.questions.lock().unwrap()[0], "who knows React?");
        assert_eq!(ctrl.snapshot().current_question, "who knows React?");
    }

    #[tokio::test]
    async fn test_retry_without_prior_question_is_noop() {
        let backend = Arc::new(CountingBackend::new(Duration::ZERO));
        let ctrl = controller(backend.clone());

        ctrl.retry().await.unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ctrl.snapshot().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_retry_reissues_identical_question() {
        let backend = Arc::new(CountingBackend::new(Duration::ZERO));
        let ctrl = controller(backend.clone());

        ctrl.submit("who knows Python?").await.unwrap();
        ctrl.retry().await.unwrap();

        let questions = backend.questions.lock().unwrap();
        assert_eq!(*questions, vec!["who knows Python?", "who knows Python?"]);
        // Each success appends its own entry, no dedup.
        assert_eq!(ctrl.history_len(), 2);
    }

    #[tokio::test]
    async fn test_select_from_history_reruns_question() {
        let backend = Arc::new(CountingBackend::new(Duration::ZERO));
        let ctrl = controller(backend.clone());

        ctrl.submit("first").await.unwrap();
        ctrl.select_from_history("first").await.unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        assert_eq!(ctrl.history_len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_double_submit_rejects_second() {
        let backend = Arc::new(CountingBackend::new(Duration::from_millis(500)));
        let ctrl = controller(backend.clone());

        let (first, second) = tokio::join!(ctrl.submit("first"), ctrl.submit("second"));

        first.unwrap();
        assert!(matches!(second, Err(AskError::Concurrency)));

        // The session still reflects the first question's eventual result.
        let state = ctrl.snapshot();
        assert_eq!(state.phase, Phase::Succeeded);
        assert_eq!(state.current_question, "first");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctrl.history_len(), 1);
    }

    #[tokio::test]
    async fn test_dismiss_error_clears_banner() {
        let ctrl = controller(Arc::new(FailingBackend));
        ctrl.submit("boom").await.unwrap();
        assert!(ctrl.snapshot().last_error.is_some());

        ctrl.dismiss_error();
        let state = ctrl.snapshot();
        assert!(state.last_error.is_none());
        assert_eq!(state.phase, Phase::Failed);
    }

    #[tokio::test]
    async fn test_resubmission_after_failure_recovers() {
        struct FlakyBackend {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl QaBackend for FlakyBackend {
            async fn ask(
                &self,
                _question: &str,
                _skill_logic: SkillLogic,
            ) -> Result<AskResult, AskError> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(AskError::Transport("connection refused".to_string()))
                } else {
                    Ok(AskResult {
                        sections: vec![],
                        facts: vec![],
                        docs: vec![],
                        answer: Some("recovered".to_string()),
                        why: None,
                    })
                }
            }
        }

        let ctrl = controller(Arc::new(FlakyBackend {
            calls: AtomicUsize::new(0),
        }));

        ctrl.submit("flaky").await.unwrap();
        assert_eq!(ctrl.snapshot().phase, Phase::Failed);
        assert_eq!(ctrl.history_len(), 0);

        ctrl.retry().await.unwrap();
        let state = ctrl.snapshot();
        assert_eq!(state.phase, Phase::Succeeded);
        assert!(state.last_error.is_none());
        assert_eq!(ctrl.history_len(), 1);
    }
}
