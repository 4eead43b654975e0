//! Client-side faceted search over an already aggregated job set.
//!
//! Nothing here touches the store. Functions borrow the aggregated jobs and
//! return references into them.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::Serialize;

use crate::jobs::model::{CanonicalJob, DEFAULT_JOB_TYPE};

pub const RECENT_WINDOW_DAYS: i64 = 7;
pub const POPULAR_SAMPLE_SIZE: usize = 6;

/// Retains jobs whose title, company, location or any skill contains `query`,
/// case-insensitively. A blank query keeps everything.
pub fn filter_by_query<'a>(jobs: &'a [CanonicalJob], query: &str) -> Vec<&'a CanonicalJob> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return jobs.iter().collect();
    }

    jobs.iter()
        .filter(|job| {
            job.title.to_lowercase().contains(&query)
                || job.company.to_lowercase().contains(&query)
                || job.location.to_lowercase().contains(&query)
                || job.skills.iter().any(|s| s.to_lowercase().contains(&query))
        })
        .collect()
}

/// Multi-select company/location filter. An empty selection does not filter.
pub fn filter_by_facets<'a>(
    jobs: &[&'a CanonicalJob],
    companies: &[String],
    locations: &[String],
) -> Vec<&'a CanonicalJob> {
    jobs.iter()
        .copied()
        .filter(|job| companies.is_empty() || companies.contains(&job.company))
        .filter(|job| locations.is_empty() || locations.contains(&job.location))
        .collect()
}

/// Distinct values of a field, in first-seen order.
fn distinct<'a>(
    jobs: &[&'a CanonicalJob],
    field: impl Fn(&'a CanonicalJob) -> &'a str,
) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for job in jobs {
        let value = field(*job);
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

pub fn collections(jobs: &[&CanonicalJob]) -> Vec<String> {
    distinct(jobs, |job| job.collection.as_str())
}

pub fn company_facets(jobs: &[&CanonicalJob]) -> Vec<String> {
    distinct(jobs, |job| job.company.as_str())
}

pub fn location_facets(jobs: &[&CanonicalJob]) -> Vec<String> {
    distinct(jobs, |job| job.location.as_str())
}

// ────────────────────────────────────────────────────────────────────────────
// Tabs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tab {
    All,
    Recent,
    Popular,
    FullTime,
    Remote,
    Collection(String),
}

impl Tab {
    /// Resolves a tab id. Known collection names win over pseudo-tab ids;
    /// anything unrecognised is `All`.
    pub fn parse(id: &str, collections: &[String]) -> Tab {
        if let Some(collection) = collections.iter().find(|c| c.as_str() == id) {
            return Tab::Collection(collection.clone());
        }
        match id {
            "recent" => Tab::Recent,
            "popular" => Tab::Popular,
            "fulltime" => Tab::FullTime,
            "remote" => Tab::Remote,
            _ => Tab::All,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Tab::All => "all",
            Tab::Recent => "recent",
            Tab::Popular => "popular",
            Tab::FullTime => "fulltime",
            Tab::Remote => "remote",
            Tab::Collection(name) => name.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabSummary {
    pub id: String,
    pub label: String,
    pub count: usize,
    /// Route token for collection tabs; `None` for "all".
    pub slug: Option<String>,
}

/// "All" first, then one tab per collection seen in `jobs`.
pub fn build_tabs(jobs: &[&CanonicalJob]) -> Vec<TabSummary> {
    let mut tabs = vec![TabSummary {
        id: "all".to_string(),
        label: "All Jobs".to_string(),
        count: jobs.len(),
        slug: None,
    }];

    tabs.extend(collections(jobs).into_iter().map(|collection| TabSummary {
        count: jobs.iter().filter(|j| j.collection == collection).count(),
        slug: Some(slugify(&collection)),
        label: collection.clone(),
        id: collection,
    }));

    tabs
}

/// Jobs shown under `tab`. Pseudo-tabs are computed on every call.
pub fn jobs_for_tab<'a, R: Rng + ?Sized>(
    jobs: &[&'a CanonicalJob],
    tab: &Tab,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<&'a CanonicalJob> {
    match tab {
        Tab::All => jobs.to_vec(),
        Tab::Collection(name) => jobs
            .iter()
            .copied()
            .filter(|j| &j.collection == name)
            .collect(),
        Tab::Recent => jobs
            .iter()
            .copied()
            .filter(|j| is_recent(&j.posted_at, now))
            .collect(),
        Tab::Popular => popular_sample(jobs, rng),
        Tab::FullTime => jobs
            .iter()
            .copied()
            .filter(|j| j.job_type == DEFAULT_JOB_TYPE)
            .collect(),
        Tab::Remote => jobs
            .iter()
            .copied()
            .filter(|j| j.location.to_lowercase().contains("remote"))
            .collect(),
    }
}

/// Random sample of up to `POPULAR_SAMPLE_SIZE` jobs, without replacement.
pub fn popular_sample<'a, R: Rng + ?Sized>(
    jobs: &[&'a CanonicalJob],
    rng: &mut R,
) -> Vec<&'a CanonicalJob> {
    let amount = POPULAR_SAMPLE_SIZE.min(jobs.len());
    jobs.choose_multiple(rng, amount).copied().collect()
}

/// True when `posted_at` parses and falls within the last seven days.
/// Unparseable values are never recent.
pub fn is_recent(posted_at: &str, now: DateTime<Utc>) -> bool {
    parse_posted_at(posted_at)
        .map(|posted| posted >= now - Duration::days(RECENT_WINDOW_DAYS))
        .unwrap_or(false)
}

/// Best-effort timestamp parse for display values such as "2026-10-15",
/// "2026-10-15T08:00:00Z" or "Oct 15, 2026".
pub fn parse_posted_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

// ────────────────────────────────────────────────────────────────────────────
// Route tokens
// ────────────────────────────────────────────────────────────────────────────

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn non_slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9-]").expect("valid slug regex"))
}

/// Collection display name → URL token: lower-case, whitespace runs become
/// one hyphen, anything outside `[a-z0-9-]` is dropped.
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    let hyphenated = whitespace_re().replace_all(&lower, "-");
    non_slug_re().replace_all(&hyphenated, "").into_owned()
}

/// Reverse of `slugify`: the first known collection whose slug equals `slug`.
pub fn resolve_slug<'a>(slug: &str, collections: &'a [String]) -> Option<&'a str> {
    collections
        .iter()
        .find(|c| slugify(c) == slug)
        .map(String::as_str)
}
