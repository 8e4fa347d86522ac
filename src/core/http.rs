//! HTTP endpoint server using Axum

use axum::{
    body::Bytes,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::analytics::DashboardEngine;
use crate::config::{AnalyticsConfig, Config};
use crate::models::{
    CohortHeatmap, CohortSummary, ConversionTrendResponse, DevelopmentLocation, FilterCriteria,
    FilterBody, FilterOptions, FilterQuery, FunnelResponse, FunnelStage, MetricsResponse,
};
use crate::store::RecordStore;
use crate::telemetry::Metrics;

pub const SERVICE_NAME: &str = "funnelboard";

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub store: Arc<RecordStore>,
    pub analytics: AnalyticsConfig,
    /// Pre-exported snapshot tree served under `/data`.
    pub snapshot_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<RecordStore>, analytics: AnalyticsConfig) -> Result<Self, prometheus::Error> {
        Ok(Self {
            metrics: Arc::new(Metrics::new()?),
            start_time: Arc::new(Instant::now()),
            store,
            analytics,
            snapshot_dir: None,
        })
    }

    pub fn with_snapshot_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.snapshot_dir = dir;
        self
    }

    fn engine(&self) -> DashboardEngine<'_> {
        DashboardEngine::new(&self.store, self.analytics)
    }
}

/// `degraded` when the store came up without any lead.
pub fn health_status(store: &RecordStore) -> &'static str {
    if store.leads().is_empty() {
        "degraded"
    } else {
        "healthy"
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health_status(&state.store),
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME,
        "leads_loaded": state.store.leads().len(),
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct StageQuery {
    stage: Option<String>,
}

/// Heatmap stage, `contacto` when absent. `lead` is the cohort base, not a
/// conversion, and is rejected.
fn heatmap_stage(query: &StageQuery) -> Result<FunnelStage, StatusCode> {
    let stage = match query.stage.as_deref().map(str::trim) {
        None | Some("") => FunnelStage::Contacto,
        Some(raw) => raw.parse::<FunnelStage>().map_err(|e| {
            warn!(error = %e, "Rejected cohort heatmap request");
            StatusCode::BAD_REQUEST
        })?,
    };
    if !stage.is_conversion() {
        warn!(stage = %stage, "Rejected cohort heatmap request for a non-conversion stage");
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(stage)
}

/// Empty body or `null` selects everything.
fn body_criteria(body: &[u8]) -> Result<FilterCriteria, StatusCode> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FilterCriteria::all());
    }
    serde_json::from_slice::<Option<FilterBody>>(body)
        .map(|filters| FilterCriteria::from(filters.unwrap_or_default()))
        .map_err(|e| {
            warn!(error = %e, "Rejected filter body");
            StatusCode::UNPROCESSABLE_ENTITY
        })
}

/// Gated funnel for the selection
async fn get_funnel(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<FunnelResponse> {
    let criteria = FilterCriteria::from(query);
    let engine = state.engine();
    Json(state.metrics.time_view("funnel", || engine.funnel(&criteria)))
}

/// Monthly conversion trend
async fn get_trends(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<ConversionTrendResponse> {
    let criteria = FilterCriteria::from(query);
    let engine = state.engine();
    Json(state.metrics.time_view("trends", || engine.trends(&criteria)))
}

/// Investment and conversion KPIs
async fn get_kpis(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<MetricsResponse> {
    let criteria = FilterCriteria::from(query);
    let engine = state.engine();
    Json(state.metrics.time_view("metrics", || engine.metrics(&criteria)))
}

async fn list_cohorts(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<Vec<CohortSummary>> {
    let criteria = FilterCriteria::from(query);
    let engine = state.engine();
    Json(state.metrics.time_view("cohorts", || engine.cohort_summaries(&criteria)))
}

async fn post_cohorts(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<CohortSummary>>, StatusCode> {
    let criteria = body_criteria(&body)?;
    let engine = state.engine();
    Ok(Json(state.metrics.time_view("cohorts", || engine.cohort_summaries(&criteria))))
}

fn cohort_heatmap(state: &AppState, criteria: &FilterCriteria, stage: FunnelStage) -> CohortHeatmap {
    let engine = state.engine();
    state
        .metrics
        .time_view("cohort_heatmap", || engine.cohort_heatmap(criteria, stage))
}

/// Cohort heatmap for one stage (default `contacto`)
async fn get_cohort_heatmap(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
    Query(stage): Query<StageQuery>,
) -> Result<Json<CohortHeatmap>, StatusCode> {
    let stage = heatmap_stage(&stage)?;
    let criteria = FilterCriteria::from(query);
    Ok(Json(cohort_heatmap(&state, &criteria, stage)))
}

async fn post_cohort_heatmap(
    State(state): State<AppState>,
    Query(stage): Query<StageQuery>,
    body: Bytes,
) -> Result<Json<CohortHeatmap>, StatusCode> {
    let stage = heatmap_stage(&stage)?;
    let criteria = body_criteria(&body)?;
    Ok(Json(cohort_heatmap(&state, &criteria, stage)))
}

async fn get_developments(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<Vec<DevelopmentLocation>> {
    let criteria = FilterCriteria::from(query);
    let engine = state.engine();
    Json(state.metrics.time_view("developments", || engine.developments(&criteria)))
}

async fn get_filter_options(State(state): State<AppState>) -> Json<FilterOptions> {
    let engine = state.engine();
    Json(state.metrics.time_view("filter_options", || engine.filter_options()))
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/funnel", get(get_funnel))
        .route("/funnel/trends", get(get_trends))
        .route("/metrics", get(get_kpis))
        .route("/cohorts", get(list_cohorts).post(post_cohorts))
        .route(
            "/cohorts/heatmap",
            get(get_cohort_heatmap).post(post_cohort_heatmap),
        )
        .route("/developments", get(get_developments))
        .route("/filters/options", get(get_filter_options));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest("/api/v1", api);

    if let Some(dir) = state.snapshot_dir.as_ref() {
        router = router.nest_service("/data", ServeDir::new(dir));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    config: &Config,
    store: Arc<RecordStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState::new(store, config.analytics)
        .map_err(|e| format!("failed to register metrics: {e}"))?
        .with_snapshot_dir(config.snapshot_dir.clone());
    if let Some(dir) = &state.snapshot_dir {
        info!(dir = %dir.display(), "Serving static snapshot under /data");
    }

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        config.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
