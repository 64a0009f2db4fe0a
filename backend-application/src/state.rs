use std::sync::Arc;

use backend_domain::ports::{Clock, EventStore, UpstreamClient};
use backend_domain::{CountryWhitelist, RuntimeConfig};

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub event_store: Arc<dyn EventStore>,
    pub upstream: Arc<dyn UpstreamClient>,
    pub whitelist: Arc<CountryWhitelist>,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<Metrics>,
}
