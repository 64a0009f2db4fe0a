use backend_domain::DateRange;
use serde::{Deserialize, Serialize};

/// Raw query-string parameters of an event listing request.
///
/// Kept as strings so the offending input can be echoed back unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    pub query_type: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub range: DateRange,
    pub pages: usize,
    pub fetched: usize,
    pub kept: usize,
}
