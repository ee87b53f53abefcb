//! The syndicator onboarding wizard end to end, over HTTP.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use paddock::server::build_router;
use paddock::storage::DraftStore;

use crate::{body_json, test_state};

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    (status, body_json(resp).await)
}

fn profile() -> Value {
    json!({
        "name": "Jo Bloggs",
        "businessName": "Bloggs Bloodstock",
        "email": "jo@bloggs.co.nz",
        "region": "Waikato"
    })
}

fn horse() -> Value {
    json!({
        "name": "Paddock Star",
        "foalingYear": 2022,
        "sex": "filly",
        "sire": "Savabeel",
        "dam": "Night Sky",
        "trainer": { "name": "Ann Trainer", "email": "ann@stables.nz" },
        "racingManager": { "name": "Rex Manager" }
    })
}

fn lease() -> Value {
    json!({
        "pricePerOnePercentPerYear": 1000,
        "stakePercent": 10,
        "durationMonths": 12,
        "ownerRevenueSharePercent": 25,
        "deductionPercent": 15,
        "commencement": "2026-08-01",
        "authority": { "signatoryName": "Jo Bloggs", "position": "Director", "confirmed": true }
    })
}

#[tokio::test]
async fn test_full_wizard() {
    let app = build_router(test_state(None));

    let (status, created) = send(&app, "POST", "/api/drafts", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["nextStep"], "profile");
    let id = created["draft"]["id"].as_str().unwrap().to_string();
    let base = format!("/api/drafts/{id}");

    let (status, view) = send(&app, "PUT", &format!("{base}/profile"), Some(profile())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["nextStep"], "horse");

    let (status, view) = send(&app, "PUT", &format!("{base}/horse"), Some(horse())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["nextStep"], "lease");

    let (status, view) = send(&app, "PUT", &format!("{base}/lease"), Some(lease())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["nextStep"], "termSheet");

    let (status, sheet) = send(&app, "POST", &format!("{base}/term-sheet"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sheet["termSheet"]["upfrontFee"], 10_000.0);
    assert_eq!(sheet["termSheet"]["expiry"], "2027-08-01");
    assert_eq!(sheet["termSheet"]["syndicatorBreakeven"]["kind"], "crossing");
    assert!(sheet["termSheet"]["reference"].as_str().unwrap().starts_with("TS-"));
    assert!(sheet["document"].as_str().unwrap().contains("Paddock Star"));

    let (status, view) = send(&app, "GET", &base, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["nextStep"], "complete");

    let (status, submission) = send(&app, "GET", &format!("{base}/submission"), None).await;
    assert_eq!(status, StatusCode::OK);
    let syndicator_id = &submission["syndicator"]["id"];
    assert_eq!(&submission["horse"]["syndicator_id"], syndicator_id);
    assert_eq!(&submission["term_sheet"]["syndicator_id"], syndicator_id);
    assert_eq!(submission["horse"]["trainer_id"], submission["trainer"]["id"]);
    assert_eq!(
        submission["horse"]["racing_manager_id"],
        submission["racing_manager"]["id"]
    );
    assert!(submission["horse"].get("owner_id").is_none());
}

#[tokio::test]
async fn test_steps_out_of_order_conflict() {
    let app = build_router(test_state(None));
    let (_, created) = send(&app, "POST", "/api/drafts", None).await;
    let base = format!("/api/drafts/{}", created["draft"]["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &format!("{base}/horse"), Some(horse())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "step_out_of_order");

    let (status, _) = send(&app, "POST", &format!("{base}/term-sheet"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "GET", &format!("{base}/submission"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_step_payload_names_field() {
    let app = build_router(test_state(None));
    let (_, created) = send(&app, "POST", "/api/drafts", None).await;
    let base = format!("/api/drafts/{}", created["draft"]["id"].as_str().unwrap());

    let mut bad = profile();
    bad["email"] = json!("not-an-email");
    let (status, body) = send(&app, "PUT", &format!("{base}/profile"), Some(bad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "email");

    send(&app, "PUT", &format!("{base}/profile"), Some(profile())).await;
    send(&app, "PUT", &format!("{base}/horse"), Some(horse())).await;

    let mut unconfirmed = lease();
    unconfirmed["authority"]["confirmed"] = json!(false);
    let (status, body) = send(&app, "PUT", &format!("{base}/lease"), Some(unconfirmed)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "authority.confirmed");

    let mut too_much = lease();
    too_much["stakePercent"] = json!(120);
    let (status, body) = send(&app, "PUT", &format!("{base}/lease"), Some(too_much)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "stakePercent");

    // Failed edits leave the draft where it was.
    let (_, view) = send(&app, "GET", &base, None).await;
    assert_eq!(view["nextStep"], "lease");
}

#[tokio::test]
async fn test_incomplete_lease_body_names_nested_field() {
    let app = build_router(test_state(None));
    let (_, created) = send(&app, "POST", "/api/drafts", None).await;
    let base = format!("/api/drafts/{}", created["draft"]["id"].as_str().unwrap());
    send(&app, "PUT", &format!("{base}/profile"), Some(profile())).await;
    send(&app, "PUT", &format!("{base}/horse"), Some(horse())).await;

    let mut partial = lease();
    partial["authority"].as_object_mut().unwrap().remove("confirmed");
    let (status, body) = send(&app, "PUT", &format!("{base}/lease"), Some(partial)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");
    assert_eq!(body["field"], "authority.confirmed");
}

#[tokio::test]
async fn test_bad_draft_id_is_json_error() {
    let app = build_router(test_state(None));
    let (status, body) = send(&app, "GET", "/api/drafts/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_editing_lease_discards_term_sheet() {
    let app = build_router(test_state(None));
    let (_, created) = send(&app, "POST", "/api/drafts", None).await;
    let base = format!("/api/drafts/{}", created["draft"]["id"].as_str().unwrap());

    send(&app, "PUT", &format!("{base}/profile"), Some(profile())).await;
    send(&app, "PUT", &format!("{base}/horse"), Some(horse())).await;
    send(&app, "PUT", &format!("{base}/lease"), Some(lease())).await;
    let (status, _) = send(&app, "POST", &format!("{base}/term-sheet"), None).await;
    assert_eq!(status, StatusCode::OK);

    let mut longer = lease();
    longer["durationMonths"] = json!(24);
    let (status, view) = send(&app, "PUT", &format!("{base}/lease"), Some(longer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["nextStep"], "termSheet");
    assert!(view["draft"]["termSheet"].is_null());

    let (_, sheet) = send(&app, "POST", &format!("{base}/term-sheet"), None).await;
    assert_eq!(sheet["termSheet"]["upfrontFee"], 20_000.0);
    assert_eq!(sheet["termSheet"]["expiry"], "2028-08-01");
}

#[tokio::test]
async fn test_drafts_survive_reopen() {
    let state = test_state(None);
    let dir = state.drafts.dir().to_path_buf();
    let app = build_router(state);

    let (_, created) = send(&app, "POST", "/api/drafts", None).await;
    let id = created["draft"]["id"].as_str().unwrap().to_string();
    send(&app, "PUT", &format!("/api/drafts/{id}/profile"), Some(profile())).await;

    let reopened = DraftStore::open(&dir).unwrap();
    let draft = reopened.get(id.parse().unwrap()).await.unwrap();
    assert_eq!(draft.profile.unwrap().name, "Jo Bloggs");
    assert!(draft.horse.is_none());
}
