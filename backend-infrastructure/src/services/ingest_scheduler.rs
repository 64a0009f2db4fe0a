use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use backend_application::commands::ingest_commands;
use backend_application::AppState;
use backend_domain::RuntimeConfig;

pub fn ingest_interval(config: &RuntimeConfig) -> Option<Duration> {
    config
        .ingest_interval_minutes
        .filter(|minutes| *minutes > 0)
        .map(|minutes| Duration::from_secs(minutes.saturating_mul(60)))
}

/// Re-runs the batch ingest on a fixed cadence. The first run happens one
/// interval after start; a failed run is logged and the next tick proceeds.
pub async fn schedule_ingest(state: AppState) {
    let Some(period) = ingest_interval(&state.config) else {
        return;
    };
    info!("scheduled ingest every {}s", period.as_secs());

    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let range = ingest_commands::default_range(&state);
        if let Err(err) = ingest_commands::run_ingest(&state, range).await {
            error!("scheduled ingest failed: {}", err);
        }
    }
}
