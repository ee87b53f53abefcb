//! Studio job reads and completion polling against the mock.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use paddock::server::build_router;
use paddock::studio::{JobPoller, JobStatus, StudioJobs};
use paddock::types::PaddockError;

use crate::mock_studio::MockStudio;
use crate::{body_json, test_state};

#[tokio::test]
async fn test_poller_sees_partial_results_then_completes() {
    let studio = MockStudio::full_pipeline();

    let first = studio.fetch_job("job-1").await.unwrap();
    assert_eq!(first.status, JobStatus::New);
    assert!(first.transcript.is_none());

    let poller = JobPoller::new(Duration::from_millis(1), Duration::from_secs(5));
    let done = poller.wait_for_completion(&studio, "job-1").await.unwrap();
    assert_eq!(done.status, JobStatus::Complete);
    assert!(done.transcript.is_some());
    assert!(done.enrichment.is_some());
    assert!(done.refined.is_some());
    assert_eq!(studio.fetch_count(), 5);
}

#[tokio::test]
async fn test_poller_surfaces_upstream_failure() {
    let studio = MockStudio::full_pipeline();
    studio.set_error("connection reset");
    let poller = JobPoller::new(Duration::from_millis(1), Duration::from_secs(5));
    let err = poller.wait_for_completion(&studio, "job-2").await.unwrap_err();
    assert!(matches!(err, PaddockError::Studio(ref msg) if msg.contains("connection reset")));
}

#[tokio::test]
async fn test_poller_gives_up_on_stalled_job() {
    let studio = MockStudio::scripted(vec![JobStatus::New, JobStatus::Refining]);
    let poller = JobPoller::new(Duration::from_millis(2), Duration::from_millis(20));
    let err = poller.wait_for_completion(&studio, "job-3").await.unwrap_err();
    match err {
        PaddockError::StudioTimeout { last_status, .. } => assert_eq!(last_status, "REFINING"),
        other => panic!("expected timeout, got {other}"),
    }
}

#[tokio::test]
async fn test_job_endpoints() {
    let studio: Arc<dyn StudioJobs> = Arc::new(MockStudio::full_pipeline());
    let app = build_router(test_state(Some(studio)));

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/studio/jobs/job-9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["id"], "job-9");
    assert_eq!(json["status"], "NEW");

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/studio/jobs/job-9/completion")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "COMPLETE");
    assert_eq!(json["refined"], "Paddock Star jumps cleanly");
}

#[tokio::test]
async fn test_job_endpoint_upstream_error_is_bad_gateway() {
    let mock = MockStudio::full_pipeline();
    mock.set_error("503 from upstream");
    let studio: Arc<dyn StudioJobs> = Arc::new(mock);
    let app = build_router(test_state(Some(studio)));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/studio/jobs/job-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}
