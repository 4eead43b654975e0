//! Axum route handlers for the job listing API.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::aggregate::{aggregate_all, find_by_id};
use crate::jobs::model::CanonicalJob;
use crate::jobs::search::{
    build_tabs, collections, company_facets, filter_by_facets, filter_by_query, jobs_for_tab,
    location_facets, resolve_slug, Tab, TabSummary,
};
use crate::jobs::views::{JobCard, JobDetail};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub id: Option<String>,
}

/// Listing parameters. `company` and `location` may repeat.
#[derive(Debug, Default, PartialEq)]
pub struct ListingParams {
    pub query: String,
    pub tab: Option<String>,
    pub companies: Vec<String>,
    pub locations: Vec<String>,
}

impl ListingParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = ListingParams::default();
        for (key, value) in pairs {
            match key.as_str() {
                "q" => params.query = value,
                "tab" => params.tab = Some(value),
                "company" => params.companies.push(value),
                "location" => params.locations.push(value),
                _ => {}
            }
        }
        params
    }
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub title: String,
    pub query: String,
    pub active_tab: String,
    pub tabs: Vec<TabSummary>,
    pub companies: Vec<String>,
    pub locations: Vec<String>,
    pub jobs: Vec<JobCard>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub slug: String,
    pub collection: Option<String>,
    pub title: String,
    pub tabs: Vec<TabSummary>,
    pub jobs: Vec<JobCard>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/jobs[?id=]
///
/// Without `id`: every job from every partition. With `id`: that job or 404.
pub async fn handle_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobsQuery>,
) -> Result<Response, AppError> {
    match params.id.filter(|id| !id.is_empty()) {
        Some(id) => {
            let job = find_by_id(state.store.as_ref(), &id)
                .await?
                .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
            Ok(Json(job).into_response())
        }
        None => {
            let jobs = aggregate_all(state.store.as_ref()).await?;
            Ok(Json(jobs).into_response())
        }
    }
}

/// GET /api/v1/jobs?q=&tab=&company=&location=
pub async fn handle_listing(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListingResponse>, AppError> {
    let params = ListingParams::from_pairs(pairs);
    let jobs = aggregate_all(state.store.as_ref()).await?;

    let listing = build_listing(&jobs, &params, Utc::now(), &mut rand::thread_rng());
    Ok(Json(listing))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobDetail>, AppError> {
    let job = find_by_id(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;

    Ok(Json(JobDetail::new(job, Utc::now())))
}

/// GET /api/v1/categories/:slug
///
/// An unknown slug is not an error: it yields an empty page.
pub async fn handle_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryResponse>, AppError> {
    let jobs = aggregate_all(state.store.as_ref()).await?;
    Ok(Json(build_category(&jobs, &slug, Utc::now())))
}

// ────────────────────────────────────────────────────────────────────────────
// Page assembly
// ────────────────────────────────────────────────────────────────────────────

pub fn build_listing<R: Rng + ?Sized>(
    jobs: &[CanonicalJob],
    params: &ListingParams,
    now: DateTime<Utc>,
    rng: &mut R,
) -> ListingResponse {
    let filtered = filter_by_query(jobs, &params.query);
    let tabs = build_tabs(&filtered);
    let known = collections(&filtered);
    let tab = params
        .tab
        .as_deref()
        .map(|id| Tab::parse(id, &known))
        .unwrap_or(Tab::All);

    let in_tab = jobs_for_tab(&filtered, &tab, now, rng);
    let shown = filter_by_facets(&in_tab, &params.companies, &params.locations);

    let query = params.query.trim();
    let title = if !query.is_empty() {
        format!("Search Results for \"{query}\"")
    } else {
        tab_title(&tab)
    };

    ListingResponse {
        title,
        query: query.to_string(),
        active_tab: tab.id().to_string(),
        tabs,
        companies: company_facets(&in_tab),
        locations: location_facets(&in_tab),
        jobs: shown.into_iter().map(|job| JobCard::new(job, now)).collect(),
    }
}

pub fn build_category(jobs: &[CanonicalJob], slug: &str, now: DateTime<Utc>) -> CategoryResponse {
    let all: Vec<&CanonicalJob> = jobs.iter().collect();
    let known = collections(&all);
    let collection = resolve_slug(slug, &known).map(str::to_string);

    let cards = match &collection {
        Some(name) => all
            .iter()
            .filter(|job| &job.collection == name)
            .map(|job| JobCard::new(job, now))
            .collect(),
        None => Vec::new(),
    };

    CategoryResponse {
        slug: slug.to_string(),
        title: match &collection {
            Some(name) => format!("{name} Jobs"),
            None => "No Jobs Found".to_string(),
        },
        collection,
        tabs: build_tabs(&all),
        jobs: cards,
    }
}

fn tab_title(tab: &Tab) -> String {
    match tab {
        Tab::All => "All Jobs".to_string(),
        Tab::Recent => "Recent Jobs".to_string(),
        Tab::Popular => "Popular Jobs".to_string(),
        Tab::FullTime => "Full-time Jobs".to_string(),
        Tab::Remote => "Remote Jobs".to_string(),
        Tab::Collection(name) => name.clone(),
    }
}
