use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{
    parse_date, AboutInfo, CountryWhitelist, DbConfig, RuntimeConfig, StorageBackend,
    DEFAULT_COUNTRY_CODES, DEFAULT_INGEST_HORIZON_MONTHS, DEFAULT_INGEST_START_DATE,
    DEFAULT_LATEST_WINDOW_DAYS, DEFAULT_UPSTREAM_FIELDS, DEFAULT_UPSTREAM_URL,
};

use crate::config::validation::{validate_country_code, validate_upstream_url};

pub const CONFIG_PATH_ENV: &str = "EVENTS_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub storage_backend: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub upstream_base_url: String,
    pub upstream_fields: String,
    pub upstream_timeout_seconds: u64,
    pub country_whitelist: Vec<String>,
    pub ingest_start_date: String,
    pub ingest_horizon_months: u32,
    pub ingest_on_startup: bool,
    pub ingest_interval_minutes: Option<u64>,
    pub latest_window_days: u32,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub log_format: LogFormat,
    pub log_dir: Option<String>,
    pub about_github: Option<String>,
    pub about_email: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:4000".to_string(),
            storage_backend: "clickhouse".to_string(),
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "chapter_events".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            upstream_base_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_fields: DEFAULT_UPSTREAM_FIELDS.to_string(),
            upstream_timeout_seconds: 30,
            country_whitelist: DEFAULT_COUNTRY_CODES.iter().map(ToString::to_string).collect(),
            ingest_start_date: DEFAULT_INGEST_START_DATE.to_string(),
            ingest_horizon_months: DEFAULT_INGEST_HORIZON_MONTHS,
            ingest_on_startup: false,
            ingest_interval_minutes: None,
            latest_window_days: DEFAULT_LATEST_WINDOW_DAYS,
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
            log_format: LogFormat::Text,
            log_dir: None,
            about_github: None,
            about_email: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        if !file_path.exists() {
            warn!("{} not found, using defaults", path);
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.clickhouse_user = normalize_optional(self.clickhouse_user.take());
        self.clickhouse_password = normalize_optional(self.clickhouse_password.take());
        self.log_dir = normalize_optional(self.log_dir.take());
        self.about_github = normalize_optional(self.about_github.take());
        self.about_email = normalize_optional(self.about_email.take());
        if let Some(minutes) = self.ingest_interval_minutes {
            if minutes == 0 {
                self.ingest_interval_minutes = None;
            }
        }
        self.storage_backend = self.storage_backend.trim().to_ascii_lowercase();
        self.upstream_base_url = self.upstream_base_url.trim().to_string();
        self.upstream_fields = self.upstream_fields.trim().to_string();
        self.ingest_start_date = self.ingest_start_date.trim().to_string();
        self.country_whitelist = normalize_codes(std::mem::take(&mut self.country_whitelist));
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        self.backend()?;
        validate_upstream_url(&self.upstream_base_url)?;
        if self.upstream_fields.is_empty() {
            return Err(anyhow!("upstream_fields must not be empty"));
        }
        parse_date(&self.ingest_start_date)
            .map_err(|err| anyhow!("invalid ingest_start_date: {}", err))?;
        if self.country_whitelist.is_empty() {
            return Err(anyhow!("country_whitelist must not be empty"));
        }
        for code in &self.country_whitelist {
            validate_country_code(code)?;
        }
        if self.upstream_timeout_seconds == 0 || self.request_timeout_seconds == 0 {
            return Err(anyhow!("timeouts must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.latest_window_days == 0 {
            return Err(anyhow!("latest_window_days must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> Result<RuntimeConfig> {
        Ok(RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            upstream_base_url: self.upstream_base_url.clone(),
            upstream_fields: self.upstream_fields.clone(),
            upstream_timeout_seconds: self.upstream_timeout_seconds,
            ingest_start_date: parse_date(&self.ingest_start_date)?,
            ingest_horizon_months: self.ingest_horizon_months,
            ingest_on_startup: self.ingest_on_startup,
            ingest_interval_minutes: self.ingest_interval_minutes,
            latest_window_days: self.latest_window_days,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            about: AboutInfo {
                github: self.about_github.clone().unwrap_or_default(),
                email: self.about_email.clone().unwrap_or_default(),
            },
        })
    }

    pub fn to_db_config(&self) -> Result<DbConfig> {
        Ok(DbConfig {
            storage_backend: self.backend()?,
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        })
    }

    fn backend(&self) -> Result<StorageBackend> {
        parse_storage_backend(&self.storage_backend)
            .ok_or_else(|| anyhow!("unknown storage_backend '{}'", self.storage_backend))
    }

    pub fn whitelist(&self) -> CountryWhitelist {
        CountryWhitelist::new(&self.country_whitelist)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Applies `EVENTS_*` overrides resolved through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("EVENTS_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("EVENTS_STORAGE_BACKEND") {
            self.storage_backend = value;
        }
        if let Some(value) = lookup("EVENTS_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Some(value) = lookup("EVENTS_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Some(value) = lookup("EVENTS_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Some(value) = lookup("EVENTS_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Some(value) = lookup("EVENTS_UPSTREAM_BASE_URL") {
            self.upstream_base_url = value;
        }
        if let Some(value) = lookup("EVENTS_UPSTREAM_FIELDS") {
            self.upstream_fields = value;
        }
        if let Some(value) = lookup("EVENTS_UPSTREAM_TIMEOUT_SECONDS") {
            self.upstream_timeout_seconds = value.parse().unwrap_or(self.upstream_timeout_seconds);
        }
        if let Some(value) = lookup("EVENTS_COUNTRY_WHITELIST") {
            self.country_whitelist = parse_env_list(&value);
        }
        if let Some(value) = lookup("EVENTS_INGEST_START_DATE") {
            self.ingest_start_date = value;
        }
        if let Some(value) = lookup("EVENTS_INGEST_HORIZON_MONTHS") {
            self.ingest_horizon_months = value.parse().unwrap_or(self.ingest_horizon_months);
        }
        if let Some(value) = lookup("EVENTS_INGEST_ON_STARTUP") {
            self.ingest_on_startup = value.parse().unwrap_or(self.ingest_on_startup);
        }
        if let Some(value) = lookup("EVENTS_INGEST_INTERVAL_MINUTES") {
            self.ingest_interval_minutes = value.parse().ok();
        }
        if let Some(value) = lookup("EVENTS_LATEST_WINDOW_DAYS") {
            self.latest_window_days = value.parse().unwrap_or(self.latest_window_days);
        }
        if let Some(value) = lookup("EVENTS_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = lookup("EVENTS_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("EVENTS_LOG_FORMAT") {
            self.log_format = if value.trim().eq_ignore_ascii_case("json") {
                LogFormat::Json
            } else {
                LogFormat::Text
            };
        }
        if let Some(value) = lookup("EVENTS_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Some(value) = lookup("EVENTS_ABOUT_GITHUB") {
            self.about_github = Some(value);
        }
        if let Some(value) = lookup("EVENTS_ABOUT_EMAIL") {
            self.about_email = Some(value);
        }
    }
}

fn parse_storage_backend(value: &str) -> Option<StorageBackend> {
    match value.trim().to_ascii_lowercase().as_str() {
        "clickhouse" => Some(StorageBackend::Clickhouse),
        "memory" => Some(StorageBackend::Memory),
        _ => None,
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_env_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn normalize_codes(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = values
        .into_iter()
        .map(|item| item.trim().to_ascii_uppercase())
        .filter(|item| !item.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
