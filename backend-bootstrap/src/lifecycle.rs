use anyhow::{bail, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use backend_application::commands::ingest_commands;
use backend_application::queries::event_queries;
use backend_application::AppState;
use backend_domain::{parse_date, DateRange};
use backend_infrastructure::{schedule_ingest, AppConfig};
use backend_interfaces_http::build_router;

use crate::context::AppContext;

fn build_router_with_layers(state: AppState) -> Router {
    build_router(state.clone())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(
            usize::try_from(state.config.max_body_bytes).unwrap_or(usize::MAX),
        ))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(
            state.config.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_standalone(config: &AppConfig) -> Result<()> {
    let context = AppContext::new(config).await?;
    let state = context.state;

    if state.config.ingest_on_startup {
        let range = ingest_commands::default_range(&state);
        if let Err(err) = ingest_commands::run_ingest(&state, range).await {
            warn!("startup ingest failed, serving stored events: {}", err);
        }
    }
    tokio::spawn(schedule_ingest(state.clone()));

    let app = build_router_with_layers(state.clone());
    let addr: std::net::SocketAddr = state.config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// One ingest pass over `--from`/`--to`, each defaulting to the configured
/// window. Prints the run report as JSON.
pub async fn run_ingest_once(
    config: &AppConfig,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let context = AppContext::new(config).await?;
    let state = context.state;

    let range = resolve_range(ingest_commands::default_range(&state), from, to)?;
    let report = ingest_commands::run_ingest(&state, range).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub async fn print_event_ids(config: &AppConfig) -> Result<()> {
    let context = AppContext::new(config).await?;
    for id in event_queries::list_event_ids(&context.state).await? {
        println!("{}", id);
    }
    Ok(())
}

fn resolve_range(default: DateRange, from: Option<&str>, to: Option<&str>) -> Result<DateRange> {
    let start = match from {
        Some(raw) => parse_date(raw)?,
        None => default.start,
    };
    let end = match to {
        Some(raw) => parse_date(raw)?,
        None => default.end,
    };
    if start > end {
        bail!("ingest range starts after it ends: {} > {}", start, end);
    }
    Ok(DateRange::new(start, end))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("sigterm handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
