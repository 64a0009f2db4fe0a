// Runtime configuration handed from infrastructure to the application and HTTP layers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_UPSTREAM_URL: &str = "https://gdg.community.dev/api/event/";
pub const DEFAULT_UPSTREAM_FIELDS: &str = "id,chapter,title,status,start_date,end_date,url";
pub const DEFAULT_INGEST_START_DATE: &str = "2022-01-01";
pub const DEFAULT_INGEST_HORIZON_MONTHS: u32 = 12;
pub const DEFAULT_LATEST_WINDOW_DAYS: u32 = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutInfo {
    pub github: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub upstream_base_url: String,
    pub upstream_fields: String,
    pub upstream_timeout_seconds: u64,
    pub ingest_start_date: NaiveDate,
    pub ingest_horizon_months: u32,
    pub ingest_on_startup: bool,
    pub ingest_interval_minutes: Option<u64>,
    pub latest_window_days: u32,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub about: AboutInfo,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:4000".to_string(),
            upstream_base_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_fields: DEFAULT_UPSTREAM_FIELDS.to_string(),
            upstream_timeout_seconds: 30,
            ingest_start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            ingest_horizon_months: DEFAULT_INGEST_HORIZON_MONTHS,
            ingest_on_startup: false,
            ingest_interval_minutes: None,
            latest_window_days: DEFAULT_LATEST_WINDOW_DAYS,
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
            about: AboutInfo::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Clickhouse,
    Memory,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub storage_backend: StorageBackend,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
