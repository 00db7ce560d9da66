//! Router tests: requests go through the full axum stack via `oneshot`,
//! backed by a SQLite file in a temporary directory.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{router, AppState};

async fn test_app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = db::pool::create_pool(&dir.path().join("jobs.db"), 4)
        .await
        .expect("open database");
    (dir, router(AppState::new(pool)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn bulk_create(app: &Router, jobs: Value) -> Vec<i64> {
    let (status, body) = send(app, Method::POST, "/jobs/bulk", Some(jobs)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["jobs"]
        .as_array()
        .expect("jobs array")
        .iter()
        .map(|j| j["id"].as_i64().expect("id"))
        .collect()
}

// ============================================================
// bulk create + fetch
// ============================================================

#[tokio::test]
async fn bulk_create_then_fetch_returns_job_with_links() {
    let (_dir, app) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/jobs/bulk",
        Some(json!([{
            "title": "Backend Engineer",
            "companyName": "Acme",
            "status": "applied",
            "applyLink": [{ "title": "Apply", "link": "https://acme.example/apply" }]
        }])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Added 1 jobs"));
    assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
    assert_eq!(body["jobs"][0]["title"], json!("Backend Engineer"));
    let id = body["jobs"][0]["id"].as_i64().unwrap();

    let (status, job) = send(&app, Method::GET, &format!("/jobs/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["id"], json!(id));
    assert_eq!(job["status"], json!("new"));
    assert_eq!(job["companyName"], json!("Acme"));
    assert_eq!(job["applyLink"].as_array().unwrap().len(), 1);
    assert_eq!(job["applyLink"][0]["link"], json!("https://acme.example/apply"));
    assert_eq!(job["applyLink"][0]["jobId"], json!(id));
}

#[tokio::test]
async fn bulk_create_rejects_non_array_bodies() {
    let (_dir, app) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/jobs/bulk",
        Some(json!({ "title": "Not wrapped" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Expected an array of jobs"));

    let (status, _) = send(&app, Method::POST, "/jobs/bulk", Some(json!([]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, jobs) = send(&app, Method::GET, "/jobs", None).await;
    assert_eq!(jobs, json!([]));
}

#[tokio::test]
async fn bulk_create_rejects_elements_without_title() {
    let (_dir, app) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/jobs/bulk",
        Some(json!([{ "title": "Fine" }, { "companyName": "No title" }])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid job"));

    let (_, stats) = send(&app, Method::GET, "/stats", None).await;
    assert_eq!(stats["total"], json!(0));
}

#[tokio::test]
async fn single_create_returns_created_job() {
    let (_dir, app) = test_app().await;

    let (status, job) = send(
        &app,
        Method::POST,
        "/jobs",
        Some(json!({ "title": "Platform Engineer", "location": "Remote" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(job["title"], json!("Platform Engineer"));
    assert_eq!(job["location"], json!("Remote"));
    assert_eq!(job["status"], json!("new"));
    assert_eq!(job["applyLink"], json!([]));
}

// ============================================================
// list / get
// ============================================================

#[tokio::test]
async fn search_filter_returns_matches_newest_first() {
    let (_dir, app) = test_app().await;
    bulk_create(
        &app,
        json!([
            { "title": "Backend Engineer" },
            { "title": "Office Manager" },
            { "title": "Designer", "description": "Pairs with an Engineer" }
        ]),
    )
    .await;

    let (status, jobs) = send(&app, Method::GET, "/jobs?search=Engineer", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = jobs
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Designer", "Backend Engineer"]);
}

#[tokio::test]
async fn empty_query_parameters_apply_no_filter() {
    let (_dir, app) = test_app().await;
    bulk_create(&app, json!([{ "title": "A" }, { "title": "B" }])).await;

    let (status, jobs) = send(&app, Method::GET, "/jobs?status=&company=&search=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(jobs.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn missing_job_is_404() {
    let (_dir, app) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/jobs/12345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Job not found"));

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/jobs/12345",
        Some(json!({ "status": "applied" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/jobs/12345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_json_404() {
    let (_dir, app) = test_app().await;

    for (method, body) in [
        (Method::GET, None),
        (Method::PATCH, Some(json!({ "status": "applied" }))),
        (Method::DELETE, None),
    ] {
        let (status, body) = send(&app, method.clone(), "/jobs/abc", body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(body, json!({ "error": "Job not found" }), "{method}");
    }
}

// ============================================================
// update / delete
// ============================================================

#[tokio::test]
async fn patch_updates_status_and_notes_independently() {
    let (_dir, app) = test_app().await;
    let ids = bulk_create(&app, json!([{ "title": "Role", "companyName": "Acme" }])).await;
    let uri = format!("/jobs/{}", ids[0]);

    let (status, job) = send(&app, Method::PATCH, &uri, Some(json!({ "notes": "ping recruiter" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["notes"], json!("ping recruiter"));
    assert_eq!(job["status"], json!("new"));

    let (status, job) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "interviewed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["status"], json!("interviewed"));
    assert_eq!(job["notes"], json!("ping recruiter"));
    assert_eq!(job["companyName"], json!("Acme"));
}

#[tokio::test]
async fn patch_with_null_notes_clears_them() {
    let (_dir, app) = test_app().await;
    let ids = bulk_create(&app, json!([{ "title": "Role" }])).await;
    let uri = format!("/jobs/{}", ids[0]);

    send(&app, Method::PATCH, &uri, Some(json!({ "notes": "follow up" }))).await;

    let (status, job) = send(&app, Method::PATCH, &uri, Some(json!({ "notes": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["notes"], Value::Null);

    let (_, job) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(job["notes"], Value::Null);
}

#[tokio::test]
async fn delete_one_job() {
    let (_dir, app) = test_app().await;
    let ids = bulk_create(&app, json!([{ "title": "Gone", "applyLink": [{ "title": "x", "link": "y" }] }])).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/jobs/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = send(&app, Method::GET, &format!("/jobs/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_delete_accepts_both_body_shapes() {
    let (_dir, app) = test_app().await;
    let ids = bulk_create(
        &app,
        json!([{ "title": "One" }, { "title": "Two" }, { "title": "Three" }]),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/jobs/bulk",
        Some(json!([ids[0], ids[0], ids[1]])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "requested": 2, "deleted": 2 }));

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/jobs/bulk",
        Some(json!({ "ids": [ids[2].to_string(), 99_999] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "requested": 2, "deleted": 1 }));
}

#[tokio::test]
async fn bulk_delete_without_valid_ids_is_400() {
    let (_dir, app) = test_app().await;

    for payload in [json!([]), json!([-1, "abc"]), json!({ "ids": [] }), json!("1")] {
        let (status, body) = send(&app, Method::DELETE, "/jobs/bulk", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert!(body["error"].is_string());
    }
}

// ============================================================
// stats / probes
// ============================================================

#[tokio::test]
async fn stats_reflect_statuses_and_companies() {
    let (_dir, app) = test_app().await;
    let ids = bulk_create(
        &app,
        json!([
            { "title": "A", "companyName": "Acme" },
            { "title": "B", "companyName": "Acme" },
            { "title": "C", "companyName": "Globex" }
        ]),
    )
    .await;
    send(
        &app,
        Method::PATCH,
        &format!("/jobs/{}", ids[1]),
        Some(json!({ "status": "applied" })),
    )
    .await;

    let (status, stats) = send(&app, Method::GET, "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({ "total": 3, "new": 2, "applied": 1, "interviewed": 0, "rejected": 0, "companies": 2 })
    );
}

#[tokio::test]
async fn healthz_is_ok() {
    let (_dir, app) = test_app().await;
    let (status, _) = send(&app, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}
