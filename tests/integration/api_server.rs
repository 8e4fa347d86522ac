//! Integration tests for the API Server
//!
//! Tests health, Prometheus metrics and every dashboard view endpoint.


use funnelboard::store::RecordStore;
use serde_json::{json, Value};

use test_utils::TestApiServer;

#[tokio::test]
async fn health_endpoint_reports_loaded_dataset() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "funnelboard");
    assert_eq!(body["leads_loaded"], 38);
    assert!(body["uptime_seconds"].as_u64().is_some());
}

#[tokio::test]
async fn health_endpoint_reports_degraded_without_leads() {
    let app = TestApiServer::with_store(RecordStore::default()).await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["leads_loaded"], 0);
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.get("/api/v1/funnel").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("http_request_duration_seconds"));
    assert!(body.contains("http_requests_in_flight"));
    assert!(
        body.contains("aggregation_duration_seconds_count{view=\"funnel\"} 1"),
        "Expected one timed funnel aggregation"
    );
}

#[tokio::test]
async fn metrics_middleware_counts_requests() {
    let app = TestApiServer::new().await;
    for _ in 0..3 {
        let _ = app.server.get("/health").await;
    }
    assert_eq!(app.metrics.http_requests_total.get(), 3);
    assert_eq!(app.metrics.http_requests_in_flight.get(), 0);
}

#[tokio::test]
async fn funnel_endpoint_applies_development_filter() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/v1/funnel?desarrollos=Altavista").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["total_leads"], 10);

    let stages = body["stages"].as_array().expect("stages array");
    let counts: Vec<u64> = stages.iter().filter_map(|s| s["count"].as_u64()).collect();
    assert_eq!(counts, vec![10, 8, 5, 0, 0]);
    assert_eq!(stages[0]["stage"], "lead");
    assert!(stages[0].get("conversion_from_previous").is_none());
    assert_eq!(stages[2]["conversion_from_previous"], 62.5);
    assert_eq!(stages[4]["stage_label"], "Escrituración");
}

#[tokio::test]
async fn unknown_region_returns_empty_funnel() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/v1/funnel?regiones=Atlantida").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["total_leads"], 0);
    assert_eq!(body["stages"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn malformed_year_is_rejected() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/v1/funnel?year=abc").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn kpi_endpoint_reports_costs() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/v1/metrics?desarrollos=Altavista").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["total_investment"], 1000.0);
    assert_eq!(body["cost_per_lead"], 100.0);
    assert_eq!(body["cost_per_contact"], 125.0);
    assert_eq!(body["cost_per_sale"], 0.0);
}

#[tokio::test]
async fn heatmap_defaults_to_contact_stage() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/v1/cohorts/heatmap?desarrollos=Bosque%20Real")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["stage"], "contacto");
    assert_eq!(body["cohort_labels"], serde_json::json!(["2024-W03", "2024-W05"]));
    assert_eq!(body["week_labels"], serde_json::json!([0, 1, 2]));
    assert_eq!(body["matrix"][1], serde_json::json!([45.0, 90.0, 90.0]));
}

#[tokio::test]
async fn heatmap_marks_unobservable_cells_as_null() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/v1/cohorts/heatmap?stage=contacto").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["cohort_labels"][3], "2024-W10");
    // the dataset ends on 2024-03-12, one week into the last cohort
    assert_eq!(body["matrix"][3], serde_json::json!([80.0, 80.0, null]));
}

#[tokio::test]
async fn heatmap_accepts_stage_parameter() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/v1/cohorts/heatmap?stage=cita&week_iso=2024-W10")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["stage"], "cita");
    assert_eq!(body["week_labels"], serde_json::json!([0, 1]));
    assert_eq!(body["matrix"][0], serde_json::json!([0.0, 50.0]));
}

#[tokio::test]
async fn heatmap_rejects_unknown_stage() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/v1/cohorts/heatmap?stage=closing").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn heatmap_rejects_lead_stage() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/v1/cohorts/heatmap?stage=lead").await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .server
        .post("/api/v1/cohorts/heatmap?stage=lead")
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn posted_heatmap_reads_filters_from_body() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/v1/cohorts/heatmap?stage=cita")
        .json(&json!({ "week_iso": "2024-W10", "desarrollos": null }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["stage"], "cita");
    assert_eq!(body["week_labels"], json!([0, 1]));
    assert_eq!(body["matrix"][0], json!([0.0, 50.0]));
}

#[tokio::test]
async fn posted_heatmap_defaults_to_contact_stage() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/v1/cohorts/heatmap")
        .json(&json!({ "desarrollos": ["Bosque Real"] }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["stage"], "contacto");
    assert_eq!(body["cohort_labels"], json!(["2024-W03", "2024-W05"]));
    assert_eq!(body["matrix"][1], json!([45.0, 90.0, 90.0]));
}

#[tokio::test]
async fn posted_cohort_list_filters_by_development_array() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/v1/cohorts")
        .json(&json!({ "desarrollos": ["Bosque Real"] }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let cohorts = body.as_array().expect("cohort list");
    let initial: u64 = cohorts.iter().filter_map(|c| c["initial_leads"].as_u64()).sum();
    assert_eq!(cohorts.len(), 2);
    assert_eq!(initial, 24);
}

#[tokio::test]
async fn posted_cohort_list_without_body_matches_get() {
    let app = TestApiServer::new().await;
    let posted: Value = app.server.post("/api/v1/cohorts").await.json();
    let fetched: Value = app.server.get("/api/v1/cohorts").await.json();
    assert_eq!(posted, fetched);
}

#[tokio::test]
async fn posted_cohort_list_rejects_malformed_body() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/v1/cohorts")
        .json(&json!({ "year": "twenty" }))
        .await;
    assert_eq!(response.status_code(), 422);
}

#[tokio::test]
async fn cohort_list_returns_summaries() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/v1/cohorts?week_iso=2024-W05").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let cohorts = body.as_array().expect("cohort list");
    assert_eq!(cohorts.len(), 1);
    assert_eq!(cohorts[0]["cohort_week"], "2024-W05");
    assert_eq!(cohorts[0]["initial_leads"], 20);
    assert_eq!(cohorts[0]["conversions"]["contacto"]["1"], 90.0);
}

#[tokio::test]
async fn trends_endpoint_is_monthly() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/v1/funnel/trends").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["period_type"], "monthly");
    let periods: Vec<&str> = body["data"]
        .as_array()
        .expect("trend points")
        .iter()
        .filter_map(|p| p["period"].as_str())
        .collect();
    assert_eq!(periods, vec!["2024-01", "2024-02", "2024-03"]);
}

#[tokio::test]
async fn developments_endpoint_lists_catalog() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/v1/developments?regiones=Sur").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let rows = body.as_array().expect("development list");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2]["name"], "Costa Azul");
    assert_eq!(rows[2]["region"], "Sur");
    assert_eq!(rows[2]["total_closings"], 1);
    assert_eq!(rows[0]["total_leads"], 0);
}

#[tokio::test]
async fn filter_options_endpoint() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/v1/filters/options").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["regiones"], serde_json::json!(["Centro", "Norte", "Sur"]));
    assert_eq!(body["years"], serde_json::json!([2024]));
    assert_eq!(body["months"].as_array().map(Vec::len), Some(12));
    assert_eq!(body["weeks"][0], "2024-W03");
}

#[tokio::test]
async fn snapshot_routes_absent_without_directory() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/data/funnel.json").await;
    assert_eq!(response.status_code(), 404);
}
