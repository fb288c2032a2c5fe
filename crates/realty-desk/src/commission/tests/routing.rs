use super::common::*;
use axum::extract::{Path, Query, State};
use axum::http::{header, Request, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::commission::domain::AgentLevel;
use crate::commission::router::{progress_handler, ProgressQuery};

fn json_request(method: &str, uri: &str, body: Value) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serialize body"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn calculate_route_returns_breakdown() {
    let desk = build_desk(10);
    let router = router_with_desk(desk.clone());

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/commissions/calculate",
            json!({
                "property_value": 1000000,
                "deal_type": "sale",
                "agent_level": "master"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let final_commission: Decimal = payload["final_commission"]
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .expect("decimal string");
    assert_eq!(final_commission, dec!(45500));
    assert_eq!(
        payload.get("final_commission_display"),
        Some(&json!("R$ 45.500,00"))
    );
    assert_eq!(payload.get("tier_match"), Some(&json!("exact")));
    assert_eq!(desk.history().len(), 1);
}

#[tokio::test]
async fn calculate_route_rejects_unknown_level() {
    let router = router_with_desk(build_desk(10));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/commissions/calculate",
            json!({ "property_value": 1000, "agent_level": "partner" }),
        ))
        .await
        .expect("route executes");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn history_route_lists_and_clears() {
    let desk = build_desk(10);
    desk.calculate(input(500000, AgentLevel::Junior));
    desk.calculate(input(250000, AgentLevel::Expert));

    let response = router_with_desk(desk.clone())
        .oneshot(
            Request::get("/api/v1/commissions/history")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("history array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].get("agent_level"), Some(&json!("expert")));

    let response = router_with_desk(desk.clone())
        .oneshot(
            Request::delete("/api/v1/commissions/history")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(desk.history().is_empty());
}

#[tokio::test]
async fn tiers_route_lists_reference_table() {
    let response = router_with_desk(build_desk(10))
        .oneshot(
            Request::get("/api/v1/commissions/tiers")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let tiers = payload.as_array().expect("tier array");
    assert_eq!(tiers.len(), 4);
    assert_eq!(tiers[0].get("next_level"), Some(&json!("senior")));
    assert_eq!(tiers[3].get("next_level"), Some(&Value::Null));
}

#[tokio::test]
async fn progress_route_reports_remaining_deals() {
    let response = router_with_desk(build_desk(10))
        .oneshot(
            Request::get("/api/v1/commissions/tiers/senior/progress?closed_deals=16")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("deals_remaining"), Some(&json!(9)));
    assert_eq!(payload.get("next_label"), Some(&json!("Expert")));
}

#[tokio::test]
async fn progress_handler_returns_not_found_for_unknown_level() {
    let response = progress_handler(
        State(build_desk(10)),
        Path("partner".to_string()),
        Query(ProgressQuery { closed_deals: 3 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn batch_route_returns_summary() {
    let response = router_with_desk(build_desk(10))
        .oneshot(json_request(
            "POST",
            "/api/v1/commissions/batch",
            json!({ "csv": DEAL_CSV }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let summary = payload.get("summary").expect("summary present");
    assert_eq!(summary["totals"]["deals"], json!(4));
    assert_eq!(summary["flagged_deals"][0]["deal_id"], json!("D-103"));
    assert_eq!(
        payload["entries"].as_array().map(Vec::len),
        Some(4)
    );
}

#[tokio::test]
async fn batch_route_rejects_bad_rows() {
    let response = router_with_desk(build_desk(10))
        .oneshot(json_request(
            "POST",
            "/api/v1/commissions/batch",
            json!({ "csv": "Deal ID,Property Value,Deal Type,Agent Level,Override Rate\nD-1,abc,sale,junior,\n" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    let message = payload["error"].as_str().unwrap_or_default();
    assert!(message.starts_with("deal import error"));
    assert!(message.contains("line 1"));
}

#[tokio::test]
async fn calculate_route_caps_amounts_at_decimal_limit() {
    let response = router_with_desk(build_desk(10))
        .oneshot(json_request(
            "POST",
            "/api/v1/commissions/calculate",
            json!({
                "property_value": Decimal::MAX.to_string(),
                "agent_level": "senior",
                "override_rate": "1"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["saturated"], Value::Bool(true));
    assert_eq!(payload["advisories"], json!(["commission_saturated"]));
    let final_commission: Decimal = payload["final_commission"]
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .expect("final commission is a decimal string");
    assert_eq!(final_commission, Decimal::MAX);
}
