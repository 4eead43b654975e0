//! Axum route handler for résumé compatibility checks.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::jobs::aggregate::find_by_id;
use crate::scoring::report::ReportView;
use crate::scoring::session::ScoringSession;
use crate::scoring::upload::ResumeFile;
use crate::state::AppState;

/// Multipart field carrying the résumé.
pub const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct CompatibilityResponse {
    pub job_id: String,
    pub job_title: String,
    pub scorer_backend: &'static str,
    pub report: ReportView,
}

/// POST /api/v1/jobs/:id/compatibility
///
/// Multipart body with a single `resume` file field (PDF, DOC or DOCX, at most 5 MB).
pub async fn handle_compatibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<CompatibilityResponse>, AppError> {
    let job = find_by_id(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;

    let resume = read_resume(multipart).await?;
    info!(
        job_id = %job.id,
        file = %resume.file_name,
        bytes = resume.size(),
        backend = state.scorer.backend(),
        "Compatibility check requested"
    );

    let mut session = ScoringSession::new();
    session.select_file(resume)?;
    let report = session.run(state.scorer.as_ref(), &job).await?;

    Ok(Json(CompatibilityResponse {
        job_id: job.id.clone(),
        job_title: job.title.clone(),
        scorer_backend: state.scorer.backend(),
        report: ReportView::render(report),
    }))
}

async fn read_resume(mut multipart: Multipart) -> Result<ResumeFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationFailed(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("resume").to_string();
        let media_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::ValidationFailed(format!("Failed to read upload: {e}")))?;

        return Ok(ResumeFile::new(file_name, media_type, bytes));
    }

    Err(AppError::ValidationFailed(format!(
        "Missing '{RESUME_FIELD}' file field"
    )))
}
