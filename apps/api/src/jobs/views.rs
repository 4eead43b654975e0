//! Response shapes for listing and detail pages.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::jobs::format::{company_profile_slug, format_posted_at, format_salary, truncate_text};
use crate::jobs::model::CanonicalJob;

pub const CARD_SKILL_PREVIEW: usize = 4;
pub const CARD_SNIPPET_CHARS: usize = 150;

/// Compact listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct JobCard {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub posted: String,
    pub skills: Vec<String>,
    /// Skills beyond the preview ("+N more").
    pub more_skills: usize,
    pub snippet: String,
    pub collection: String,
}

impl JobCard {
    pub fn new(job: &CanonicalJob, now: DateTime<Utc>) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            salary: format_salary(&job.salary),
            posted: format_posted_at(&job.posted_at, now),
            skills: job.skills.iter().take(CARD_SKILL_PREVIEW).cloned().collect(),
            more_skills: job.skills.len().saturating_sub(CARD_SKILL_PREVIEW),
            snippet: truncate_text(&job.description.to_plain_text(), CARD_SNIPPET_CHARS),
            collection: job.collection.clone(),
        }
    }
}

/// Full detail page: the canonical record plus derived display fields.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    pub job: CanonicalJob,
    pub salary_display: String,
    pub posted_display: String,
    /// False when the posting has no apply link; the apply action is disabled.
    pub can_apply: bool,
    pub description_text: String,
    pub company_profile_url: String,
}

impl JobDetail {
    pub fn new(job: CanonicalJob, now: DateTime<Utc>) -> Self {
        Self {
            salary_display: format_salary(&job.salary),
            posted_display: format_posted_at(&job.posted_at, now),
            can_apply: job.apply_link().is_some(),
            description_text: job.description.to_plain_text(),
            company_profile_url: format!(
                "https://www.linkedin.com/company/{}/posts/?feedView=all",
                company_profile_slug(&job.company)
            ),
            job,
        }
    }
}
