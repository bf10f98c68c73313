mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn get_job_reshapes_document() {
    let app = TestApp::spawn().await;
    app.store
        .insert(
            "jobs",
            "j1",
            json!({
                "title": "Backend Engineer",
                "company": "Acme",
                "location": "Remote",
                "salary": "120k",
                "requirements": ["Rust", "Tokio"],
                "createdAt": 1700000000000_i64,
                "recruiter_notes": "internal only",
            }),
        )
        .await;

    let response = app.get("/jobs/j1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["id"], "j1");
    assert_eq!(body["title"], "Backend Engineer");
    assert_eq!(body["company"], "Acme");
    assert_eq!(body["description"], Value::Null);
    assert_eq!(body["requirements"], json!(["Rust", "Tokio"]));
    assert!(body.get("recruiter_notes").is_none());
}

#[tokio::test]
async fn repeated_reads_return_the_same_shape() {
    let app = TestApp::spawn().await;
    app.store
        .insert("jobs", "j1", json!({ "title": "Backend Engineer" }))
        .await;

    let first: Value = app.get("/jobs/j1").await.json().await.unwrap();
    let second: Value = app.get("/jobs/j1").await.json().await.unwrap();

    let keys = |v: &Value| {
        let mut keys: Vec<String> = v.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    };
    assert_eq!(keys(&first), keys(&second));
    assert_eq!(keys(&first).len(), 8);
    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_job_returns_404() {
    let app = TestApp::spawn().await;

    let response = app.get("/jobs/nope").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_job_id_is_rejected_before_any_fetch() {
    let app = TestApp::spawn().await;

    let response = app.get("/jobs/").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Job ID is required");
    assert_eq!(app.store.fetch_count(), 0);
}

#[tokio::test]
async fn unavailable_store_returns_generic_503() {
    let app = TestApp::spawn().await;
    app.store.set_unavailable(true);

    let response = app.get("/jobs/j1").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Service unavailable");
}
