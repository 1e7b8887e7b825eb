pub mod api;
pub mod config;
pub mod data_structures;
pub mod page;
pub mod worker;

use crate::api::AppState;
use crate::data_structures::{ReportCache, SharedAnalyzer, SharedReportCache};
use anyhow::Context;
use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tickerscope::api::AnalysisBuilder;
use tokio::sync::Mutex;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::AppConfig::load()?;

    // Initialize tracing with server_name in all logs
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tickerscope_server=info,tickerscope=info".into()),
        )
        .with_target(false)
        .init();

    let _span = tracing::info_span!("server", name = %app_config.server_name).entered();

    tracing::info!("Starting tickerscope-server");
    tracing::info!(
        environment = %app_config.environment,
        port = app_config.port,
        short_window = app_config.short_window,
        long_window = app_config.long_window,
        cache_ttl_secs = app_config.cache_ttl.as_secs(),
        "Loaded configuration"
    );

    let analyzer: SharedAnalyzer = Arc::new(
        AnalysisBuilder::new()
            .with_windows(app_config.short_window, app_config.long_window)
            .with_base_url(app_config.yahoo_base_url.clone())
            .with_timeout(app_config.request_timeout)
            .with_rate_limit(app_config.rate_limit_per_minute)
            .build()
            .context("Failed to build analyzer")?,
    );
    let cache: SharedReportCache = Arc::new(Mutex::new(ReportCache::new(app_config.cache_ttl)));

    tracing::info!("Spawning report cache sweeper");
    tokio::spawn(worker::run(
        cache.clone(),
        worker::sweep_interval(app_config.cache_ttl),
    ));

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(app_config.client_requests_per_second)
            .burst_size(app_config.client_burst_size)
            .finish()
            .context("Invalid client rate limit configuration")?,
    );

    let app_state = AppState {
        analyzer,
        cache,
        config: Arc::new(app_config.clone()),
    };

    let app = Router::new()
        .merge(api::public_routes().layer(GovernorLayer::new(governor_conf)))
        .route("/health", get(api::health_handler))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    tracing::info!(%addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("Server error")?;

    Ok(())
}
