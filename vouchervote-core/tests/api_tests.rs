// File: vouchervote-core/tests/api_tests.rs

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use vouchervote_common::models::{NewVoucher, Project, VoucherCode};
use vouchervote_common::traits::repository_traits::VoucherRepository;
use vouchervote_core::http::{DEFAULT_CORS_ORIGINS, cors_layer, router};
use vouchervote_core::services::VotingService;
use vouchervote_core::test_utils::InMemoryStore;

async fn app_with_store() -> (Router, InMemoryStore) {
    let store = InMemoryStore::new();
    store
        .put_project(Project {
            project_id: 7,
            project_name: "Community Garden".to_string(),
            project_country: "Uganda".to_string(),
            icon_code: "yard".to_string(),
            graph_colour: "#2e8b57".to_string(),
            vote_count: None,
        })
        .await;
    store
        .insert_vouchers(&[
            NewVoucher { code: VoucherCode(1234), expiry_date: Utc::now() + Duration::days(10) },
            NewVoucher { code: VoucherCode(5678), expiry_date: Utc::now() - Duration::days(10) },
        ])
        .await
        .unwrap();

    let voting = VotingService::new(Arc::new(store.clone()), Arc::new(store.clone()));
    let cors = cors_layer(DEFAULT_CORS_ORIGINS).unwrap();
    (router(voting, cors), store)
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

#[tokio::test]
async fn test_vote_then_summary() {
    let (app, _store) = app_with_store().await;

    let (status, body) = send(&app, Method::GET, "/projects/votes-summary/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["VoteCount"], Value::Null);

    let (status, body) = send(&app, Method::POST, "/voucher/vote/?code=1234&proj_id=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "voting successful" }));

    let (status, body) = send(&app, Method::GET, "/projects/votes-summary/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "ProjectName": "Community Garden",
            "ProjectCountry": "Uganda",
            "IconCode": "yard",
            "GraphColour": "#2e8b57",
            "VoteCount": 1
        }])
    );
}

#[tokio::test]
async fn test_second_use_is_not_acceptable() {
    let (app, _store) = app_with_store().await;

    let (status, _) = send(&app, Method::POST, "/voucher/vote/?code=1234&proj_id=7").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, "/voucher/vote/?code=1234&proj_id=7").await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body["detail"], "Voucher code is invalid, please use another voucher");
}

#[tokio::test]
async fn test_expired_voucher_is_not_acceptable() {
    let (app, _store) = app_with_store().await;

    let (status, _) = send(&app, Method::POST, "/voucher/vote/?code=5678&proj_id=7").await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn test_not_found_errors() {
    let (app, store) = app_with_store().await;

    let (status, body) = send(&app, Method::POST, "/voucher/vote/?code=4321&proj_id=7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Voucher not found, please check voucher code is valid!");

    let (status, body) = send(&app, Method::POST, "/voucher/vote/?code=1234&proj_id=99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Project not found, please check project id is valid!");

    let voucher = store.get_voucher_by_code(VoucherCode(1234)).await.unwrap().unwrap();
    assert!(!voucher.used);
}

#[tokio::test]
async fn test_malformed_query_is_unprocessable() {
    let (app, _store) = app_with_store().await;

    for uri in [
        "/voucher/vote/?code=12ab&proj_id=7",
        "/voucher/vote/?code=1234&proj_id=seven",
        "/voucher/vote/?proj_id=7",
        "/voucher/vote/?code=1234",
        "/voucher/vote/?code=1&code=2&proj_id=7",
    ] {
        let (status, body) = send(&app, Method::POST, uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert!(body["detail"].is_string());
    }
}

#[tokio::test]
async fn test_routes_without_trailing_slash() {
    let (app, _store) = app_with_store().await;

    let (status, _) = send(&app, Method::GET, "/projects/votes-summary").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::POST, "/voucher/vote?code=1234&proj_id=7").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_preflight_for_allowed_origin() {
    let (app, _store) = app_with_store().await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/voucher/vote/")
                .header(header::ORIGIN, "http://localhost:8080")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:8080"
    );
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}
