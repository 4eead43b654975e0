pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::scoring::handlers as scoring;
use crate::scoring::upload::MAX_RESUME_BYTES;
use crate::state::AppState;

/// Upload bodies may exceed the résumé limit so oversized files reach
/// validation and get a proper error instead of a bare 413.
pub const UPLOAD_BODY_LIMIT: usize = 2 * MAX_RESUME_BYTES;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Flat job API
        .route("/api/jobs", get(jobs::handle_jobs))
        // Listing, detail and category pages
        .route("/api/v1/jobs", get(jobs::handle_listing))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route("/api/v1/categories/:slug", get(jobs::handle_category))
        // Résumé compatibility
        .route(
            "/api/v1/jobs/:id/compatibility",
            post(scoring::handle_compatibility).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::scoring::report::CompatibilityReport;
    use crate::scoring::scorer::{
        simulate, CompatibilityScorer, ScoringError, ScoringRequest,
    };
    use crate::store::memory::InMemoryStore;

    const BOUNDARY: &str = "jobboard-test-boundary";

    /// Deterministic stand-in for the remote endpoint.
    struct StubScorer {
        fail_with: Option<String>,
    }

    #[async_trait]
    impl CompatibilityScorer for StubScorer {
        async fn score(
            &self,
            request: &ScoringRequest,
        ) -> Result<CompatibilityReport, ScoringError> {
            if let Some(message) = &self.fail_with {
                return Err(ScoringError::Endpoint {
                    status: 500,
                    message: message.clone(),
                });
            }
            let mut report = simulate(&request.skills, &mut rand::thread_rng());
            report.overall_assessment.overall_score = 85.0;
            Ok(report)
        }

        fn backend(&self) -> &'static str {
            "stub"
        }
    }

    fn job_id() -> Uuid {
        Uuid::parse_str("6f1c2b1e-0000-4000-8000-000000000001").unwrap()
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_document(
                "Data Science",
                job_id(),
                json!({
                    "title": "Data Analyst",
                    "company_name": "Numbers Inc",
                    "location": "Remote",
                    "skills": ["SQL", "Python"],
                    "experience_level": "2+ years",
                }),
            )
            .with_partition(
                "Senior Engineers",
                vec![json!({ "title": "Rust Engineer", "company_name": "Ferrous" })],
            )
    }

    fn app_with(store: InMemoryStore, fail_with: Option<&str>) -> Router {
        build_router(AppState {
            store: Arc::new(store),
            scorer: Arc::new(StubScorer {
                fail_with: fail_with.map(str::to_string),
            }),
        })
    }

    fn app() -> Router {
        app_with(store(), None)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        read_json(response).await
    }

    async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn multipart_request(
        uri: &str,
        field: &str,
        file_name: &str,
        media_type: &str,
        size: usize,
    ) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: {media_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend(std::iter::repeat(b'x').take(size));
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn compatibility_uri() -> String {
        format!("/api/v1/jobs/{}/compatibility", job_id())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "jobboard-api");
    }

    #[tokio::test]
    async fn test_all_jobs_are_canonical() {
        let (status, body) = get_json(app(), "/api/jobs").await;
        assert_eq!(status, StatusCode::OK);
        let jobs = body.as_array().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0]["company"], "Numbers Inc");
        assert_eq!(jobs[0]["collection"], "Data Science");
        assert_eq!(jobs[0]["salary"], "Not Disclosed");
        assert_eq!(jobs[0]["type"], "full-time");
    }

    #[tokio::test]
    async fn test_job_by_id() {
        let (status, body) = get_json(app(), &format!("/api/jobs?id={}", job_id())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Data Analyst");
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        let missing = Uuid::new_v4();
        let (status, body) = get_json(app(), &format!("/api/jobs?id={missing}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Job not found");

        let (status, _) = get_json(app(), "/api/jobs?id=not-a-uuid").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(app(), "/api/v1/jobs/not-a-uuid").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_outage_is_service_unavailable() {
        let (status, body) = get_json(app_with(store().unreachable(), None), "/api/jobs").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "STORE_UNAVAILABLE");
        assert_eq!(body["error"]["message"], "Failed to load job listings");
    }

    #[tokio::test]
    async fn test_listing_search_and_tabs() {
        let (status, body) = get_json(app(), "/api/v1/jobs?q=analyst").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Search Results for \"analyst\"");
        assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
        assert_eq!(body["tabs"][0]["label"], "All Jobs");
        assert_eq!(body["tabs"][0]["count"], 1);
    }

    #[tokio::test]
    async fn test_category_page() {
        let (status, body) = get_json(app(), "/api/v1/categories/senior-engineers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["collection"], "Senior Engineers");
        assert_eq!(body["jobs"][0]["title"], "Rust Engineer");

        let (status, body) = get_json(app(), "/api/v1/categories/unknown").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "No Jobs Found");
    }

    #[tokio::test]
    async fn test_compatibility_success() {
        let response = app()
            .oneshot(multipart_request(
                &compatibility_uri(),
                "resume",
                "cv.pdf",
                "application/pdf",
                2048,
            ))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_title"], "Data Analyst");
        assert_eq!(body["scorer_backend"], "stub");
        assert_eq!(body["report"]["overall_score"], 85);
        assert_eq!(body["report"]["color"], "green");
    }

    #[tokio::test]
    async fn test_compatibility_rejects_oversized_file() {
        let response = app()
            .oneshot(multipart_request(
                &compatibility_uri(),
                "resume",
                "cv.pdf",
                "application/pdf",
                6 * 1024 * 1024,
            ))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_compatibility_rejects_wrong_type_and_missing_field() {
        let response = app()
            .oneshot(multipart_request(
                &compatibility_uri(),
                "resume",
                "cv.png",
                "image/png",
                10,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app()
            .oneshot(multipart_request(
                &compatibility_uri(),
                "attachment",
                "cv.pdf",
                "application/pdf",
                10,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_compatibility_unknown_job() {
        let uri = format!("/api/v1/jobs/{}/compatibility", Uuid::new_v4());
        let response = app()
            .oneshot(multipart_request(
                &uri,
                "resume",
                "cv.pdf",
                "application/pdf",
                10,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_compatibility_endpoint_failure_surfaces_message() {
        let response = app_with(store(), Some("Could not parse resume"))
            .oneshot(multipart_request(
                &compatibility_uri(),
                "resume",
                "cv.pdf",
                "application/pdf",
                10,
            ))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "SCORING_FAILED");
        assert_eq!(body["error"]["message"], "Could not parse resume");
    }
}
