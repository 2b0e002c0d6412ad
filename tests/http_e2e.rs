//! End-to-end HTTP tests.

mod common;

use common::fixtures::CorpusFixture;
use common::harness::spawn_server;
use forage::FORAGE_STATUS_HEADER;
use forage::gateway::payload::{FoodLookupResponse, StatsResponse};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_lookup_tiers_over_http() {
    let dir = TempDir::new().unwrap();
    let server = spawn_server(CorpusFixture::new().write(dir.path()))
        .await
        .expect("Server should start");
    let client = reqwest::Client::new();
    let url = format!("{}/food_lookup", server.url());

    let first = client
        .post(&url)
        .json(&json!({"food_text": "Greek Yogurt"}))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);
    assert_eq!(first.headers()[FORAGE_STATUS_HEADER], "RESOLVED_SEMANTIC");
    let body: FoodLookupResponse = first.json().await.unwrap();
    assert_eq!(body.result.product_name, "greek yogurt");
    assert_eq!(body.result.code, "001");
    assert_eq!(body.result.nutrients, Some(json!({"energy-kcal_100g": 101})));

    let exact = client
        .post(&url)
        .json(&json!({"food_text": "greek yogurt"}))
        .send()
        .await
        .unwrap();
    assert_eq!(exact.headers()[FORAGE_STATUS_HEADER], "HIT_EXACT");

    let fuzzy = client
        .post(&url)
        .json(&json!({"food_text": "greek yoghurt"}))
        .send()
        .await
        .unwrap();
    assert_eq!(fuzzy.headers()[FORAGE_STATUS_HEADER], "HIT_FUZZY");

    let stats: StatsResponse = client
        .get(format!("{}/cache/stats", server.url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.corpus_rows, 4);
}

#[tokio::test]
async fn test_missing_food_text_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let server = spawn_server(CorpusFixture::new().write(dir.path()))
        .await
        .expect("Server should start");

    let resp = reqwest::Client::new()
        .post(format!("{}/food_lookup", server.url()))
        .json(&json!({"text": "apple"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_health_and_ready() {
    let dir = TempDir::new().unwrap();
    let server = spawn_server(CorpusFixture::new().write(dir.path()))
        .await
        .expect("Server should start");
    let client = reqwest::Client::new();

    let health = client
        .get(format!("{}/healthz", server.url()))
        .send()
        .await
        .unwrap();
    assert!(health.status().is_success());

    let ready: serde_json::Value = client
        .get(format!("{}/ready", server.url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ready["status"], "ok");
    assert_eq!(ready["components"]["embedder_mode"], "stub");
}
