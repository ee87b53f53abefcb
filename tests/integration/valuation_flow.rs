//! Valuation through the HTTP API.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use paddock::server::build_router;

use crate::{body_json, test_state};

async fn post_valuation(body: Value) -> (StatusCode, Value) {
    let app = build_router(test_state(None));
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/valuation")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    (status, body_json(resp).await)
}

fn inputs(rrr: f64, nztr: f64) -> Value {
    json!({
        "pricePerOnePercentPerYear": 1000,
        "stakePercent": 10,
        "durationMonths": 12,
        "ownerRevenueSharePercent": rrr,
        "deductionPercent": nztr,
    })
}

#[tokio::test]
async fn test_reference_scenario() {
    let (status, json) = post_valuation(inputs(25.0, 15.0)).await;
    assert_eq!(status, StatusCode::OK);

    let result = &json["result"];
    assert_eq!(result["upfrontIncome"], 10_000.0);

    let syndicator = result["syndicatorBreakevenTotalStakes"].as_f64().unwrap();
    let investor = result["investorBreakevenTotalStakes"].as_f64().unwrap();
    assert!((syndicator - 133_333.333).abs() < 0.01);
    assert!((investor - 166_666.667).abs() < 0.01);
    assert!(investor >= syndicator);

    // Both strategies pay the same at the crossing.
    let with_lease = result["returnWithLease"].as_f64().unwrap();
    let without_lease = result["returnWithoutLease"].as_f64().unwrap();
    assert!((with_lease - without_lease).abs() < 1e-6);
    assert!((with_lease - 11_333.333).abs() < 0.01);

    let points = result["curvePoints"].as_array().unwrap();
    assert_eq!(points.len(), 51);
    assert_eq!(points[0]["totalStakes"], 0.0);
    assert_eq!(points[0]["leaseRevenueNet"], 10_000.0);
    assert_eq!(points[0]["noLeaseRevenue"], 0.0);
    let mid = points[25]["totalStakes"].as_f64().unwrap();
    assert!((mid - syndicator).abs() < 1e-6);

    let summary = &json["summary"];
    assert_eq!(summary["currency"], "NZD");
    assert_eq!(summary["upfrontIncome"], "$10,000");
    assert_eq!(summary["syndicatorBreakeven"]["kind"], "crossing");
    assert_eq!(
        summary["syndicatorBreakevenLabel"],
        "$133,333 total stakes won ($13,333 owner share)"
    );
    assert_eq!(summary["returnWithLease"], "$11,333");
    assert_eq!(summary["chartAxisMax"], "$267k");
}

#[tokio::test]
async fn test_parallel_lines_have_no_finite_breakeven() {
    // Full owner share, no deduction: lease and no-lease slopes are equal.
    let (status, json) = post_valuation(inputs(100.0, 0.0)).await;
    assert_eq!(status, StatusCode::OK);

    // Non-finite values go over the wire as null.
    assert!(json["result"]["syndicatorBreakevenTotalStakes"].is_null());
    assert_eq!(json["summary"]["syndicatorBreakeven"]["kind"], "noFiniteBreakeven");
    assert_eq!(json["summary"]["returnWithLease"], "n/a");
    assert_eq!(json["summary"]["chartAxisMax"], "n/a");
}

#[tokio::test]
async fn test_investor_lease_always_ahead() {
    // Gross share 90% beats the 80% kept after deduction at every volume.
    let (status, json) = post_valuation(inputs(90.0, 20.0)).await;
    assert_eq!(status, StatusCode::OK);

    let investor = json["result"]["investorBreakevenTotalStakes"].as_f64().unwrap();
    assert!(investor < 0.0);
    assert_eq!(json["summary"]["investorBreakeven"]["kind"], "leaseAlwaysAhead");
    assert_eq!(json["summary"]["syndicatorBreakeven"]["kind"], "crossing");
}

#[tokio::test]
async fn test_out_of_range_inputs_rejected() {
    let cases = [
        ("stakePercent", json!(101)),
        ("durationMonths", json!(0)),
        ("deductionPercent", json!(-1)),
        ("pricePerOnePercentPerYear", json!(-5)),
    ];
    for (field, value) in cases {
        let mut body = inputs(25.0, 15.0);
        body[field] = value;
        let (status, json) = post_valuation(body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{field}");
        assert_eq!(json["error"], "validation");
        assert_eq!(json["field"], field);
    }
}

#[tokio::test]
async fn test_zero_price_means_zero_breakeven() {
    let mut body = inputs(25.0, 15.0);
    body["pricePerOnePercentPerYear"] = json!(0);
    let (status, json) = post_valuation(body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["upfrontIncome"], 0.0);
    assert_eq!(json["result"]["syndicatorBreakevenTotalStakes"], 0.0);
}

#[tokio::test]
async fn test_form_query_matches_json_body() {
    let app = build_router(test_state(None));
    let uri = "/api/valuation?pricePerOnePercentPerYear=1000&stakePercent=10\
               &durationMonths=12&ownerRevenueSharePercent=25&deductionPercent=15";
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let from_form = body_json(resp).await;

    let (_, from_json) = post_valuation(inputs(25.0, 15.0)).await;
    assert_eq!(from_form, from_json);
}

#[tokio::test]
async fn test_missing_field_names_field() {
    let mut body = inputs(25.0, 15.0);
    body.as_object_mut().unwrap().remove("deductionPercent");
    let (status, json) = post_valuation(body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "validation");
    assert_eq!(json["field"], "deductionPercent");
    assert!(json["message"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_wrong_type_names_field() {
    let mut body = inputs(25.0, 15.0);
    body["stakePercent"] = json!("ten");
    let (status, json) = post_valuation(body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "validation");
    assert_eq!(json["field"], "stakePercent");
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let app = build_router(test_state(None));
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/valuation")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "bad_request");
    assert!(json.get("field").is_none());
}

#[tokio::test]
async fn test_large_amounts_format_exactly() {
    let mut body = inputs(25.0, 15.0);
    body["pricePerOnePercentPerYear"] = json!(1e30);
    let (status, json) = post_valuation(body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"]["upfrontIncome"], format!("$10{}", ",000".repeat(10)));
}
