//! Scoring session: one résumé-check workflow from file pick to result.
//!
//! IDLE → FILE_SELECTED → SUBMITTING → RESULT_READY | ERROR. Every submission
//! carries the session epoch; closing the session bumps the epoch so a result
//! that arrives afterwards is discarded instead of applied.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::jobs::model::CanonicalJob;
use crate::scoring::report::CompatibilityReport;
use crate::scoring::scorer::{CompatibilityScorer, ScoringError, ScoringRequest};
use crate::scoring::upload::{validate, ResumeFile, UploadError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Idle,
    FileSelected,
    Submitting,
    ResultReady,
    Error,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] UploadError),

    #[error("{0}")]
    Scoring(String),

    #[error("Cannot {action} while the session is {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },
}

/// An in-flight submission. Hand it back to `ScoringSession::complete` with
/// the scorer's outcome.
#[derive(Debug)]
pub struct Submission {
    epoch: u64,
    pub request: ScoringRequest,
}

#[derive(Debug)]
pub struct ScoringSession {
    state: SessionState,
    file: Option<ResumeFile>,
    result: Option<CompatibilityReport>,
    error_message: Option<String>,
    epoch: u64,
}

impl Default for ScoringSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            file: None,
            result: None,
            error_message: None,
            epoch: 0,
        }
    }

    /// IDLE | ERROR → FILE_SELECTED, or → ERROR when the file fails validation.
    pub fn select_file(&mut self, file: ResumeFile) -> Result<(), SessionError> {
        self.require_state(&[SessionState::Idle, SessionState::Error], "select a file")?;

        if let Err(e) = validate(&file) {
            self.fail(e.to_string());
            return Err(SessionError::Validation(e));
        }

        self.state = SessionState::FileSelected;
        self.file = Some(file);
        self.error_message = None;
        Ok(())
    }

    /// FILE_SELECTED → SUBMITTING. Returns the request to send.
    pub fn begin_submit(&mut self, job: &CanonicalJob) -> Result<Submission, SessionError> {
        self.require_state(&[SessionState::FileSelected], "submit")?;
        let file = match self.file.clone() {
            Some(file) => file,
            None => {
                return Err(SessionError::InvalidTransition {
                    action: "submit without a file",
                    state: self.state,
                })
            }
        };

        if let Err(e) = validate(&file) {
            self.fail(e.to_string());
            return Err(SessionError::Validation(e));
        }

        self.epoch += 1;
        self.state = SessionState::Submitting;
        debug!(epoch = self.epoch, job_id = %job.id, "Scoring submission started");

        Ok(Submission {
            epoch: self.epoch,
            request: ScoringRequest::for_job(job, file),
        })
    }

    /// SUBMITTING → RESULT_READY | ERROR. Returns false when the outcome was
    /// discarded because the session was closed or restarted meanwhile.
    pub fn complete(
        &mut self,
        submission: Submission,
        outcome: Result<CompatibilityReport, ScoringError>,
    ) -> bool {
        if submission.epoch != self.epoch || self.state != SessionState::Submitting {
            debug!(
                submission_epoch = submission.epoch,
                session_epoch = self.epoch,
                "Discarding stale scoring result"
            );
            return false;
        }

        match outcome {
            Ok(report) => {
                info!(
                    score = report.overall_assessment.overall_score,
                    "Scoring result ready"
                );
                self.state = SessionState::ResultReady;
                self.result = Some(report);
            }
            Err(e) => self.fail(e.user_message()),
        }
        true
    }

    /// Submits and awaits the scorer in one step.
    pub async fn run(
        &mut self,
        scorer: &dyn CompatibilityScorer,
        job: &CanonicalJob,
    ) -> Result<&CompatibilityReport, SessionError> {
        let submission = self.begin_submit(job)?;
        let outcome = scorer.score(&submission.request).await;
        self.complete(submission, outcome);

        match (&self.result, &self.error_message) {
            (Some(report), _) if self.state == SessionState::ResultReady => Ok(report),
            (_, Some(message)) => Err(SessionError::Scoring(message.clone())),
            _ => Err(SessionError::InvalidTransition {
                action: "finish scoring",
                state: self.state,
            }),
        }
    }

    fn require_state(
        &self,
        allowed: &[SessionState],
        action: &'static str,
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }

    fn fail(&mut self, message: String) {
        self.clear(SessionState::Error);
        self.error_message = Some(message);
    }

    fn clear(&mut self, state: SessionState) {
        self.state = state;
        self.file = None;
        self.result = None;
        self.error_message = None;
    }
}

/// Accessors and user-driven transitions for an interactive client. The HTTP
/// handler runs each session straight through with `run`.
#[allow(dead_code)]
impl ScoringSession {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn file(&self) -> Option<&ResumeFile> {
        self.file.as_ref()
    }

    pub fn result(&self) -> Option<&CompatibilityReport> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Submit is only possible with a validated file and nothing in flight.
    pub fn can_submit(&self) -> bool {
        self.state == SessionState::FileSelected
    }

    /// FILE_SELECTED → IDLE.
    pub fn remove_file(&mut self) -> Result<(), SessionError> {
        self.require_state(&[SessionState::FileSelected], "remove the file")?;
        self.clear(SessionState::Idle);
        Ok(())
    }

    /// RESULT_READY → IDLE ("check another résumé").
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.require_state(&[SessionState::ResultReady], "reset")?;
        self.clear(SessionState::Idle);
        Ok(())
    }

    /// ERROR → IDLE.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.require_state(&[SessionState::Error], "cancel")?;
        self.clear(SessionState::Idle);
        Ok(())
    }

    /// Workflow closed: back to IDLE from any state. An in-flight submission
    /// is orphaned and its result will be discarded.
    pub fn close(&mut self) {
        self.epoch += 1;
        self.clear(SessionState::Idle);
    }
}
