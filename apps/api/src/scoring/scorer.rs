//! Compatibility scorers: pluggable backends behind one trait.
//!
//! `RemoteScorer` posts the résumé to the external scoring endpoint.
//! `SimulatedScorer` is the offline fallback: it invents per-skill scores and
//! says so in the result.
//!
//! `AppState` holds an `Arc<dyn CompatibilityScorer>`, chosen at startup from config.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::jobs::model::CanonicalJob;
use crate::scoring::experience::parse_experience;
use crate::scoring::report::{
    CompatibilityReport, OverallAssessment, ReportSource, SelectionDecision, SkillEvaluation,
    SkillScore,
};
use crate::scoring::upload::ResumeFile;

pub const GENERIC_FAILURE: &str = "Failed to analyze resume";

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Scoring request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Scoring endpoint error (status {status}): {message}")]
    Endpoint { status: u16, message: String },

    #[error("Malformed scoring payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ScoringError {
    /// Message shown to the user: the endpoint's own error text when it sent
    /// one, otherwise a generic failure.
    pub fn user_message(&self) -> String {
        match self {
            ScoringError::Endpoint { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            ScoringError::Timeout(_) => format!("{GENERIC_FAILURE}: the request timed out"),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Everything sent for one scoring submission.
#[derive(Debug, Clone)]
pub struct ScoringRequest {
    pub resume: ResumeFile,
    pub job_description: String,
    pub required_experience: u32,
    pub skills: Vec<String>,
}

impl ScoringRequest {
    pub fn for_job(job: &CanonicalJob, resume: ResumeFile) -> Self {
        Self {
            resume,
            job_description: job.description.to_plain_text(),
            required_experience: parse_experience(&job.experience),
            skills: job.skills.clone(),
        }
    }

    /// Skills as the comma-joined form field.
    pub fn skills_field(&self) -> String {
        self.skills.join(",")
    }
}

/// The scorer trait. Implement this to swap backends without touching the
/// session or handler code.
#[async_trait]
pub trait CompatibilityScorer: Send + Sync {
    async fn score(&self, request: &ScoringRequest) -> Result<CompatibilityReport, ScoringError>;

    /// "remote" or "simulated", echoed in responses and logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// RemoteScorer
// ────────────────────────────────────────────────────────────────────────────

/// Posts one multipart request per submission. No retries.
#[derive(Clone)]
pub struct RemoteScorer {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct EndpointErrorBody {
    #[serde(alias = "message", alias = "detail")]
    error: String,
}

impl RemoteScorer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ScoringError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    fn form(request: &ScoringRequest) -> Result<Form, ScoringError> {
        let mut resume = Part::bytes(request.resume.bytes.to_vec())
            .file_name(request.resume.file_name.clone());
        if let Some(media_type) = request.resume.effective_media_type() {
            resume = resume.mime_str(&media_type)?;
        }

        Ok(Form::new()
            .part("resume", resume)
            .text("job_description", request.job_description.clone())
            .text("required_experience", request.required_experience.to_string())
            .text("skills", request.skills_field()))
    }
}

#[async_trait]
impl CompatibilityScorer for RemoteScorer {
    async fn score(&self, request: &ScoringRequest) -> Result<CompatibilityReport, ScoringError> {
        debug!(
            endpoint = %self.endpoint,
            file = %request.resume.file_name,
            bytes = request.resume.size(),
            required_experience = request.required_experience,
            "Submitting resume for scoring"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(Self::form(request)?)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScoringError::Timeout(self.timeout)
                } else {
                    ScoringError::Http(e)
                }
            })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            warn!("Scoring endpoint returned {}: {}", status, text);
            let message = serde_json::from_slice::<EndpointErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| text.trim().to_string());
            return Err(ScoringError::Endpoint {
                status: status.as_u16(),
                message,
            });
        }

        let mut report: CompatibilityReport = serde_json::from_slice(&body)?;
        report.source = ReportSource::Remote;
        Ok(report)
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SimulatedScorer: offline fallback
// ────────────────────────────────────────────────────────────────────────────

pub const SUGGESTION_THRESHOLD: f64 = 50.0;

/// Assigns each skill a uniform random score in [0, 100]; the overall score is
/// their mean. The résumé itself is never read.
pub struct SimulatedScorer;

#[async_trait]
impl CompatibilityScorer for SimulatedScorer {
    async fn score(&self, request: &ScoringRequest) -> Result<CompatibilityReport, ScoringError> {
        Ok(simulate(&request.skills, &mut rand::thread_rng()))
    }

    fn backend(&self) -> &'static str {
        "simulated"
    }
}

pub fn simulate<R: Rng + ?Sized>(skills: &[String], rng: &mut R) -> CompatibilityReport {
    let scored: Vec<SkillScore> = skills
        .iter()
        .map(|skill| SkillScore {
            skill_name: skill.clone(),
            match_score: rng.gen_range(0..=100) as f64,
            remark: "Simulated score".to_string(),
        })
        .collect();

    let overall_score = if scored.is_empty() {
        0.0
    } else {
        scored.iter().map(|s| s.match_score).sum::<f64>() / scored.len() as f64
    };

    let suggestions = scored
        .iter()
        .filter(|s| s.match_score < SUGGESTION_THRESHOLD)
        .map(|s| format!("Consider strengthening your {} skills", s.skill_name))
        .collect();

    CompatibilityReport {
        source: ReportSource::Simulated,
        overall_assessment: OverallAssessment {
            overall_score,
            ..Default::default()
        },
        selection_decision: SelectionDecision {
            selected: overall_score >= 60.0,
            reason: "Simulated estimate; no resume analysis was performed.".to_string(),
        },
        skill_evaluation: SkillEvaluation { skills: scored },
        quick_summary: vec![
            "This is a simulated result generated offline for demonstration.".to_string(),
        ],
        suggestions,
        ..Default::default()
    }
}
