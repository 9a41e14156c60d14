//! End-to-end tests against the router, without binding a socket.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use hensachi_test_utils::{database_with_values, sample_database, HEIGHT, MOUNTAINS, PUSHUPS};
use hensachi_web::{config::CorsConfig, router::build_router, state::AppState};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(db: Arc<hensachi_db::Database>) -> Router {
    build_router(AppState::new(db), &CorsConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Body>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if body.is_some() {
        req = req.header(header::CONTENT_TYPE, "application/json");
    }
    let req = req.body(body.unwrap_or_else(Body::empty)).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(Body::from(body.to_string()))).await
}

fn dec_of(v: &Value) -> Decimal {
    v.as_str().expect("decimal fields are strings").parse().unwrap()
}

fn close(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < dec!(0.000001)
}

// ── datasets ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lists_datasets() {
    let app = app(sample_database());
    let (status, body) = get(&app, "/api/datasets/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": 1, "slug": MOUNTAINS, "name": "Mountains of Japan", "description": "Highest peaks"}])
    );
}

#[tokio::test]
async fn lists_metrics_sorted_by_key() {
    let app = app(sample_database());
    let (status, body) = get(&app, &format!("/api/datasets/{MOUNTAINS}/metrics/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"key": "height_m", "name": "Height", "unit": "m"},
            {"key": "prominence_m", "name": "Prominence", "unit": "m"}
        ])
    );

    let (status, body) = get(&app, "/api/datasets/nowhere/metrics/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "not found"}));
}

#[tokio::test]
async fn metric_leaderboard_is_sorted_with_population_std() {
    let db = database_with_values(&[("a", dec!(10)), ("b", dec!(20)), ("c", dec!(30))]);
    let app = app(db);
    let (status, body) = get(&app, "/api/datasets/ds/metrics/m/hensachi/").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["dataset"], "ds");
    assert_eq!(body["metric"], "m");
    assert_eq!(body["count"], 3);
    assert_eq!(dec_of(&body["mean"]), dec!(20));
    assert!(close(dec_of(&body["std"]), dec!(8.164966)));

    let results = body["results"].as_array().unwrap();
    let keys: Vec<&str> = results.iter().map(|r| r["item"]["key"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["c", "b", "a"]);
    assert_eq!(results[0]["value"], "30");
    assert!(close(dec_of(&results[0]["hensachi"]), dec!(62.247449)));
    assert_eq!(dec_of(&results[1]["hensachi"]), dec!(50));
    assert!(close(dec_of(&results[2]["hensachi"]), dec!(37.752551)));
    assert_eq!(results[0]["item"]["meta"], json!({}));
}

#[tokio::test]
async fn metric_leaderboard_carries_item_meta() {
    let app = app(sample_database());
    let (status, body) = get(&app, &format!("/api/datasets/{MOUNTAINS}/metrics/{HEIGHT}/hensachi")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unit"], "m");
    assert_eq!(body["results"][0]["item"], json!({"key": "fuji", "name": "Mt. Fuji", "meta": {"pref": "Shizuoka"}}));
}

#[tokio::test]
async fn metric_without_values_is_no_data_not_not_found() {
    let app = app(sample_database());
    let (status, body) = get(&app, &format!("/api/datasets/{MOUNTAINS}/metrics/prominence_m/hensachi/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "no data"}));

    let (status, body) = get(&app, &format!("/api/datasets/{MOUNTAINS}/metrics/missing/hensachi/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "not found"}));
}

#[tokio::test]
async fn single_value_metric_scores_fifty() {
    let app = app(database_with_values(&[("only", dec!(42.5))]));
    let (status, body) = get(&app, "/api/datasets/ds/metrics/m/hensachi/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_of(&body["std"]), Decimal::ZERO);
    assert_eq!(dec_of(&body["results"][0]["hensachi"]), dec!(50));
}

#[tokio::test]
async fn widest_column_values_still_rank() {
    let wide = dec!(99999999999999.999999);
    let keys = ["a", "b", "c", "d", "e", "f", "g", "h"];
    let rows: Vec<(&str, Decimal)> = keys
        .iter()
        .enumerate()
        .map(|(i, k)| (*k, if i % 2 == 0 { wide } else { -wide }))
        .collect();
    let app = app(database_with_values(&rows));

    let (status, body) = get(&app, "/api/datasets/ds/metrics/m/hensachi/").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["count"], 8);
    assert!(close(dec_of(&body["std"]), wide));
    assert!(close(dec_of(&body["results"][0]["hensachi"]), dec!(60)));
    assert!(close(dec_of(&body["results"][7]["hensachi"]), dec!(40)));
}

// ── apex ranks ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn apex_rank_is_case_insensitive() {
    let app = app(sample_database());
    let (status, body) = get(&app, "/api/apex/rank/hensachi/GOLD-2/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game"], "apex-legends");
    assert_eq!(body["metric"], "rank");
    assert_eq!(body["rank_code"], "gold-2");
    assert_eq!(body["top_percent"], "57.55");
    assert_eq!(body["bottom_percent"], "42.45");
    assert!(close(dec_of(&body["hensachi"]), dec!(48.096055)));
    assert_eq!(body["meta"]["season"], "27");

    let (_, lower) = get(&app, "/api/apex/rank/hensachi/gold-2").await;
    assert_eq!(lower, body);
}

#[tokio::test]
async fn apex_unknown_rank_lists_allowed_codes() {
    let app = app(sample_database());
    let (status, body) = get(&app, "/api/apex/rank/hensachi/gold-9/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "unknown rank_code");
    assert_eq!(body["rank_code"], "gold-9");
    assert!(body["hint"].as_str().unwrap().contains("gold-2"));
    let allowed = body["allowed"].as_array().unwrap();
    assert_eq!(allowed.len(), 26);
    assert_eq!(allowed[0], "bronze-1");
}

// ── user metrics ────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_then_history_round_trips_decimal_text() {
    let app = app(sample_database());
    let submit = format!("/api/u/{PUSHUPS}/submit/");

    let (status, body) = post_json(&app, &submit, json!({"user_hash": "u_me", "value": "12.345600"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"detail": "ok"}));
    post_json(&app, &submit, json!({"user_hash": "u_me", "value": 7.5})).await;
    post_json(&app, &submit, json!({"user_hash": "u_other", "value": 99})).await;

    let (status, body) = get(&app, &format!("/api/u/{PUSHUPS}/history/?user_hash=u_me")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_metric"], PUSHUPS);
    assert_eq!(body["user_hash"], "u_me");
    assert_eq!(body["limit"], 10);
    let values: Vec<&str> = body["items"].as_array().unwrap().iter().map(|i| i["value"].as_str().unwrap()).collect();
    assert_eq!(values, vec!["7.5", "12.345600"]);
    assert!(body["items"][0]["created_at"].as_str().unwrap().contains('T'));

    let (_, body) = get(&app, &format!("/api/u/{PUSHUPS}/history/?user_hash=u_me&limit=1")).await;
    assert_eq!(body["limit"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (_, body) = get(&app, &format!("/api/u/{PUSHUPS}/history/?user_hash=u_me&limit=lots")).await;
    assert_eq!(body["limit"], 10);
}

#[tokio::test]
async fn submit_validation_errors() {
    let app = app(sample_database());
    let submit = format!("/api/u/{PUSHUPS}/submit/");

    for bad in [json!({"value": 1}), json!({"user_hash": "", "value": 1}), json!({"user_hash": "u", "value": null})] {
        let (status, body) = post_json(&app, &submit, bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"detail": "user_hash and value required"}));
    }

    let (status, body) = post_json(&app, &submit, json!({"user_hash": "u", "value": "ten"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("ten"));

    let (status, body) = send(&app, Method::POST, &submit, Some(Body::from("{not json"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (status, body) = post_json(&app, "/api/u/unknown/submit/", json!({"user_hash": "u", "value": 1})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "not found"}));
}

#[tokio::test]
async fn history_requires_user_hash() {
    let app = app(sample_database());
    let (status, body) = get(&app, &format!("/api/u/{PUSHUPS}/history/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "user_hash required"}));
}

#[tokio::test]
async fn user_hensachi_scores_against_all_submissions() {
    let app = app(sample_database());
    let (status, body) = get(&app, &format!("/api/u/{PUSHUPS}/hensachi/20/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "no data yet"}));

    let submit = format!("/api/u/{PUSHUPS}/submit/");
    for (user, v) in [("a", 10), ("b", 20), ("c", 30)] {
        post_json(&app, &submit, json!({"user_hash": user, "value": v})).await;
    }

    let (status, body) = get(&app, &format!("/api/u/{PUSHUPS}/hensachi/30/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_metric"], PUSHUPS);
    assert_eq!(body["x"], "30");
    assert_eq!(body["count"], 3);
    assert_eq!(body["unit"], "reps");
    assert_eq!(dec_of(&body["mean"]), dec!(20));
    assert!(close(dec_of(&body["hensachi"]), dec!(62.247449)));
    assert_eq!(dec_of(&body["diff"]), dec!(10));
    assert_eq!(body["rank"], 1);
    assert!(close(dec_of(&body["top_percent"]), dec!(33.333333)));
    assert!(close(dec_of(&body["percentile"]), dec!(66.666667)));

    let (status, body) = get(&app, &format!("/api/u/{PUSHUPS}/hensachi/abc/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "x must be number"}));

    for huge in ["79228162514264337593543950335", "-79228162514264337593543950335"] {
        let (status, body) = get(&app, &format!("/api/u/{PUSHUPS}/hensachi/{huge}/")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"detail": "x must be number"}));
    }

    let (status, _) = get(&app, "/api/u/unknown/hensachi/1/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── system ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_table_sizes() {
    let app = app(sample_database());
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["tables"]["values"], 3);
}
