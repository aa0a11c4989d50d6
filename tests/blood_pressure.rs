//! tests/blood_pressure.rs
//! End-to-end checks of the blood pressure resource mounted at /api/blood-pressure.

mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

fn reading(systolic: i32, diastolic: i32) -> Value {
    json!({
        "timestamp": "2019-04-02T07:30:00Z",
        "systolic": systolic,
        "diastolic": diastolic
    })
}

fn owned_reading(systolic: i32, user_id: i64) -> Value {
    let mut body: Value = reading(systolic, 80);
    body["userId"] = json!(user_id);
    body
}

fn ids(json: &Value) -> Vec<i64> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect()
}

async fn search(client: &reqwest::Client, base_url: &str, query: &str) -> Value {
    let resp: reqwest::Response = client
        .get(format!("{}/api/blood-pressure/_search", base_url))
        .query(&[("query", query)])
        .send()
        .await
        .expect("Failed to search readings.");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

async fn create(client: &reqwest::Client, base_url: &str, body: &Value) -> Value {
    let resp: reqwest::Response = client
        .post(format!("{}/api/blood-pressure", base_url))
        .json(body)
        .send()
        .await
        .expect("Failed to create reading.");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json: Value = resp.json().await.unwrap();
    json["data"].clone()
}

#[tokio::test]
async fn create_returns_location_and_alert_headers() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/api/blood-pressure", base_url))
        .json(&reading(120, 80))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers()["location"], "/api/blood-pressure/1");
    assert_eq!(
        resp.headers()["x-healthapp-alert"],
        "A new bloodPressure is created with identifier 1"
    );
    assert_eq!(resp.headers()["x-healthapp-params"], "1");

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "CREATED");
    assert_eq!(json["data"]["id"], 1);
    assert_eq!(json["data"]["systolic"], 120);
    assert_eq!(json["data"]["userId"], Value::Null);
}

#[tokio::test]
async fn create_with_id_is_rejected() {
    let base_url: String = common::spawn_app();
    let mut body: Value = reading(120, 80);
    body["id"] = json!(5);

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/api/blood-pressure", base_url))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()["x-healthapp-error"], "error.idexists");
    assert_eq!(resp.headers()["x-healthapp-params"], "bloodPressure");
}

#[tokio::test]
async fn missing_required_fields_are_reported() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/api/blood-pressure", base_url))
        .json(&json!({ "systolic": 120 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = resp.json().await.unwrap();
    let fields: Vec<&str> = json["data"]["fieldErrors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["timestamp", "diastolic"]);
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/api/blood-pressure", base_url))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["error"], "invalid_payload");
}

#[tokio::test]
async fn update_get_and_delete_lifecycle() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();
    let mut created: Value = create(&client, &base_url, &reading(130, 85)).await;

    // Update
    created["systolic"] = json!(125);
    let resp: reqwest::Response = client
        .put(format!("{}/api/blood-pressure", base_url))
        .json(&created)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["x-healthapp-alert"],
        "A bloodPressure is updated with identifier 1"
    );

    // Get
    let resp: reqwest::Response = client
        .get(format!("{}/api/blood-pressure/1", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["systolic"], 125);

    // Delete
    let resp: reqwest::Response = client
        .delete(format!("{}/api/blood-pressure/1", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        resp.headers()["x-healthapp-alert"],
        "A bloodPressure is deleted with identifier 1"
    );

    // Gone
    let resp: reqwest::Response = client
        .get(format!("{}/api/blood-pressure/1", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_without_or_with_unknown_id_fails() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();

    let resp: reqwest::Response = client
        .put(format!("{}/api/blood-pressure", base_url))
        .json(&reading(120, 80))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()["x-healthapp-error"], "error.idnull");

    let mut body: Value = reading(120, 80);
    body["id"] = json!(42);
    let resp: reqwest::Response = client
        .put(format!("{}/api/blood-pressure", base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_is_paginated_with_link_headers() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();
    for systolic in 110..115 {
        create(&client, &base_url, &reading(systolic, 80)).await;
    }

    let resp: reqwest::Response = client
        .get(format!("{}/api/blood-pressure?page=1&size=2", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-total-count"], "5");
    let link: String = resp.headers()["link"].to_str().unwrap().to_string();
    assert!(link.contains("</api/blood-pressure?page=2&size=2>; rel=\"next\""));
    assert!(link.contains("</api/blood-pressure?page=0&size=2>; rel=\"prev\""));
    assert!(link.contains("</api/blood-pressure?page=2&size=2>; rel=\"last\""));

    let json: Value = resp.json().await.unwrap();
    assert_eq!(ids(&json), vec![3, 4]);
}

#[tokio::test]
async fn search_matches_numeric_terms() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();
    create(&client, &base_url, &reading(120, 80)).await;
    create(&client, &base_url, &reading(140, 90)).await;
    create(&client, &base_url, &reading(120, 75)).await;

    let resp: reqwest::Response = client
        .get(format!("{}/api/blood-pressure/_search?query=120", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-total-count"], "2");
    let json: Value = resp.json().await.unwrap();
    assert_eq!(ids(&json), vec![1, 3]);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response = reqwest::get(format!("{}/api/blood-pressure/77", base_url))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "NOT_FOUND");
    assert_eq!(json["data"]["id"], 77);
}

#[tokio::test]
async fn update_after_delete_is_not_found() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();
    let created: Value = create(&client, &base_url, &reading(130, 85)).await;

    client
        .delete(format!("{}/api/blood-pressure/1", base_url))
        .send()
        .await
        .unwrap();

    let resp: reqwest::Response = client
        .put(format!("{}/api/blood-pressure", base_url))
        .json(&created)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp: reqwest::Response = client
        .get(format!("{}/api/blood-pressure/1", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn page_number_at_the_upper_limit_returns_an_empty_page() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();
    create(&client, &base_url, &reading(120, 80)).await;

    let resp: reqwest::Response = client
        .get(format!("{}/api/blood-pressure?page={}", base_url, u64::MAX))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-total-count"], "1");
    let link: String = resp.headers()["link"].to_str().unwrap().to_string();
    assert!(!link.contains("rel=\"next\""));
    assert!(link.contains("</api/blood-pressure?page=0&size=20>; rel=\"first\""));

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn owned_readings_report_the_owner_login() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();

    let created: Value = create(&client, &base_url, &owned_reading(120, 3)).await;
    assert_eq!(created["userId"], 3);
    assert_eq!(created["userLogin"], "admin");

    let resp: reqwest::Response = client
        .get(format!("{}/api/blood-pressure/1", base_url))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["userLogin"], "admin");
}

#[tokio::test]
async fn unknown_owner_is_a_field_error() {
    let base_url: String = common::spawn_app();

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/api/blood-pressure", base_url))
        .json(&owned_reading(120, 999))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()["x-healthapp-error"], "error.validation");
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["fieldErrors"][0]["field"], "userId");
}

#[tokio::test]
async fn search_matches_owner_login_substrings() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();
    create(&client, &base_url, &owned_reading(120, 3)).await;
    create(&client, &base_url, &owned_reading(125, 4)).await;
    create(&client, &base_url, &reading(130, 80)).await;

    let json: Value = search(&client, &base_url, "ADM").await;
    assert_eq!(ids(&json), vec![1]);
    assert_eq!(json["data"][0]["userLogin"], "admin");
}

#[tokio::test]
async fn search_requires_every_term_to_match() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();
    create(&client, &base_url, &owned_reading(120, 3)).await;
    create(&client, &base_url, &owned_reading(140, 3)).await;
    create(&client, &base_url, &owned_reading(120, 4)).await;

    assert_eq!(ids(&search(&client, &base_url, "admin 120").await), vec![1]);
    assert_eq!(ids(&search(&client, &base_url, "120").await), vec![1, 3]);
    assert_eq!(ids(&search(&client, &base_url, "admin 999").await), Vec::<i64>::new());
}

#[tokio::test]
async fn search_without_query_parameter_is_rejected() {
    let base_url: String = common::spawn_app();
    let client: reqwest::Client = reqwest::Client::new();
    create(&client, &base_url, &reading(120, 80)).await;

    let resp: reqwest::Response = client
        .get(format!("{}/api/blood-pressure/_search", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()["x-healthapp-error"], "error.queryrequired");
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["error"], "invalid_query");

    // An empty query is still a valid request matching everything
    assert_eq!(ids(&search(&client, &base_url, "").await), vec![1]);
}
