//! obu-aggregator - OBU Distance Aggregation Service
//!
//! Accepts distance reports over gRPC and HTTP, keeps a running total per
//! On-Board Unit and computes invoices from it on request.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use obu_aggregator::api::{self, AppState};
use obu_aggregator::grpc::AggregatorGrpcServer;
use obu_aggregator::{
    AggregatorService, Config, LoggingAggregator, MemoryStore, MetricsAggregator, SharedAggregator,
};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "obu_aggregator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the global Prometheus recorder
fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .add_global_label("service", "obu_aggregator")
        .install_recorder()?;
    Ok(handle)
}

/// Build the store → service → logging → metrics chain shared by both transports
fn build_aggregator(config: &Config) -> SharedAggregator {
    let store = Arc::new(MemoryStore::new());
    let service = AggregatorService::new(store, config.rate_per_unit);
    Arc::new(MetricsAggregator::new(LoggingAggregator::new(service)))
}

/// Build the application router
fn build_router(state: AppState) -> Router {
    // Layers run outermost first: logging -> metrics -> handler
    api::create_router()
        .route_layer(middleware::from_fn(api::middleware::metrics_middleware))
        .layer(middleware::from_fn(api::middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn run_http(
    addr: SocketAddr,
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP transport listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await?;

    tracing::info!("HTTP transport stopped");
    Ok(())
}

async fn run_grpc(
    addr: SocketAddr,
    aggregator: SharedAggregator,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    tracing::info!("gRPC transport listening on {}", addr);

    tonic::transport::Server::builder()
        .add_service(AggregatorGrpcServer::new(aggregator).into_service())
        .serve_with_shutdown(addr, async move {
            let _ = shutdown.changed().await;
        })
        .await?;

    tracing::info!("gRPC transport stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;
    let metrics = init_metrics()?;

    tracing::info!(rate_per_unit = %config.rate_per_unit, "Starting OBU aggregator");

    let aggregator = build_aggregator(&config);
    let state = AppState::new(aggregator.clone()).with_metrics(metrics);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let http = run_http(config.http_addr, state, shutdown_rx.clone());
    let grpc = run_grpc(config.grpc_addr, aggregator, shutdown_rx);

    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    tokio::try_join!(http, grpc)?;

    tracing::info!("Aggregated state discarded. Goodbye!");
    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
