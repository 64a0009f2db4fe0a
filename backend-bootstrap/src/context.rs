use std::sync::Arc;

use anyhow::Result;
use chrono::Duration;
use clickhouse::Client;
use tracing::info;

use backend_application::{AppState, Metrics};
use backend_domain::ports::{Clock, EventStore};
use backend_domain::{DbConfig, StorageBackend};
use backend_infrastructure::{
    AppConfig, ClickhouseEventStore, HttpUpstreamClient, InMemoryEventStore, SystemClock,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config()?;
        let db_config = config.to_db_config()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let latest_window = Duration::days(i64::from(runtime_config.latest_window_days));

        let event_store = build_event_store(&db_config, clock.clone(), latest_window);
        event_store.ensure_schema().await?;

        let upstream = Arc::new(HttpUpstreamClient::from_config(&runtime_config)?);
        let whitelist = config.whitelist();
        info!(
            storage = ?db_config.storage_backend,
            countries = whitelist.len(),
            "application context ready"
        );

        let state = AppState {
            config: runtime_config,
            event_store,
            upstream,
            whitelist: Arc::new(whitelist),
            clock,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}

fn build_event_store(
    db_config: &DbConfig,
    clock: Arc<dyn Clock>,
    latest_window: Duration,
) -> Arc<dyn EventStore> {
    match db_config.storage_backend {
        StorageBackend::Memory => Arc::new(InMemoryEventStore::new(clock, latest_window)),
        StorageBackend::Clickhouse => {
            let mut clickhouse = Client::default()
                .with_url(&db_config.clickhouse_url)
                .with_database(&db_config.clickhouse_database);
            if let Some(user) = &db_config.clickhouse_user {
                clickhouse = clickhouse.with_user(user);
            }
            if let Some(password) = &db_config.clickhouse_password {
                clickhouse = clickhouse.with_password(password);
            }
            Arc::new(ClickhouseEventStore::new(
                clickhouse,
                db_config.clickhouse_database.clone(),
                clock,
                latest_window,
            ))
        }
    }
}
