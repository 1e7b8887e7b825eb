use crate::config::AppConfig;
use crate::data_structures::{SharedAnalyzer, SharedReportCache};
use crate::page::{self, AnalysisParams, Outcome};
use axum::{
    extract::{FromRef, Json, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tickerscope::api::{AnalysisError, AnalysisReport, StockAnalyzer};
use tickerscope::models::FetchRequest;
use tickerscope::services::{CsvError, CSV_MIME};
use tracing::{debug, error, info, instrument, warn};

pub type SharedConfig = Arc<AppConfig>;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: SharedAnalyzer,
    pub cache: SharedReportCache,
    pub config: SharedConfig,
}

impl FromRef<AppState> for SharedAnalyzer {
    fn from_ref(app_state: &AppState) -> SharedAnalyzer {
        app_state.analyzer.clone()
    }
}

impl FromRef<AppState> for SharedReportCache {
    fn from_ref(app_state: &AppState) -> SharedReportCache {
        app_state.cache.clone()
    }
}

impl FromRef<AppState> for SharedConfig {
    fn from_ref(app_state: &AppState) -> SharedConfig {
        app_state.config.clone()
    }
}

/// Routes that hit the market-data provider; these get the per-IP limiter.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/api/analysis", get(analysis_handler))
        .route("/download", get(download_handler))
}

/// Every route, without rate limiting.
pub fn router(state: AppState) -> Router {
    public_routes()
        .route("/health", get(health_handler))
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    Analysis(AnalysisError),
    Export(CsvError),
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        ApiError::Analysis(e)
    }
}

impl From<CsvError> for ApiError {
    fn from(e: CsvError) -> Self {
        ApiError::Export(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Analysis(e) => {
                let status = match e {
                    AnalysisError::Request(_) => StatusCode::BAD_REQUEST,
                    AnalysisError::NoData { .. } => StatusCode::NOT_FOUND,
                    AnalysisError::MarketData(_) => StatusCode::BAD_GATEWAY,
                    AnalysisError::Trend(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            ApiError::Export(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };
        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            debug!(%status, %message, "Request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Cached report for the selection, or a fresh analysis stored for next time.
async fn load_report(
    analyzer: &StockAnalyzer,
    cache: &SharedReportCache,
    params: &AnalysisParams,
) -> Result<Arc<AnalysisReport>, AnalysisError> {
    let request = FetchRequest::parse(
        params.symbol.as_deref().unwrap_or_default(),
        params.interval.as_deref(),
        params.lookback.as_deref(),
    )?;

    let flight = {
        let mut guard = cache.lock().await;
        if let Some(report) = guard.get(&request) {
            debug!(symbol = %request.symbol, "Serving report from cache");
            return Ok(report);
        }
        guard.flight(&request)
    };

    // Only one caller per selection reaches the provider; the rest wait here
    let _flight = flight.lock().await;
    let cached = cache.lock().await.get(&request);
    if let Some(report) = cached {
        debug!(symbol = %request.symbol, "Serving report loaded by a concurrent request");
        return Ok(report);
    }

    let report = Arc::new(analyzer.analyze(&request).await?);
    cache.lock().await.insert(report.clone());
    info!(
        symbol = %request.symbol,
        interval = %request.interval,
        lookback = %request.lookback,
        bars = report.series.len(),
        trend = %report.trend,
        "Analysis complete"
    );
    Ok(report)
}

#[instrument(skip(analyzer, cache, config))]
pub async fn dashboard_handler(
    State(analyzer): State<SharedAnalyzer>,
    State(cache): State<SharedReportCache>,
    State(config): State<SharedConfig>,
    Query(params): Query<AnalysisParams>,
) -> Html<String> {
    let theme = params.theme_or(config.default_theme);

    if params.symbol().is_none() {
        return Html(page::render_dashboard(&params, Outcome::Prompt, theme));
    }

    let html = match load_report(&analyzer, &cache, &params).await {
        Ok(report) => page::render_dashboard(&params, Outcome::Report(&report), theme),
        Err(AnalysisError::NoData { symbol, .. }) => {
            warn!(%symbol, "No data for dashboard request");
            page::render_dashboard(&params, Outcome::NoData, theme)
        }
        Err(e) => {
            warn!(error = %e, "Dashboard analysis failed");
            page::render_dashboard(&params, Outcome::Failed(e.to_string()), theme)
        }
    };
    Html(html)
}

#[instrument(skip(analyzer, cache))]
pub async fn analysis_handler(
    State(analyzer): State<SharedAnalyzer>,
    State(cache): State<SharedReportCache>,
    Query(params): Query<AnalysisParams>,
) -> Result<Json<Arc<AnalysisReport>>, ApiError> {
    let report = load_report(&analyzer, &cache, &params).await?;
    Ok(Json(report))
}

#[instrument(skip(analyzer, cache))]
pub async fn download_handler(
    State(analyzer): State<SharedAnalyzer>,
    State(cache): State<SharedReportCache>,
    Query(params): Query<AnalysisParams>,
) -> Result<Response, ApiError> {
    let report = load_report(&analyzer, &cache, &params).await?;
    let body = report.to_csv()?;
    let file_name = report.request.csv_file_name();

    info!(%file_name, bytes = body.len(), "Serving CSV download");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CSV_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}

pub async fn health_handler() -> &'static str {
    "OK"
}
