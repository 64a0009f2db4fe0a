use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use backend_domain::ports::{FetchTarget, UpstreamClient};
use backend_domain::{DateRange, EventPage, RuntimeConfig, UpstreamError};

use crate::config::validate_upstream_url;

/// Upstream event listing over HTTP.
pub struct HttpUpstreamClient {
    client: Client,
    base_url: Url,
    fields: String,
}

impl HttpUpstreamClient {
    pub fn new(base_url: &str, fields: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("events-backend/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: validate_upstream_url(base_url)?,
            fields: fields.to_string(),
        })
    }

    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        Self::new(
            &config.upstream_base_url,
            &config.upstream_fields,
            Duration::from_secs(config.upstream_timeout_seconds.max(1)),
        )
    }

    fn target_url(&self, target: &FetchTarget) -> String {
        match target {
            FetchTarget::Range(range) => first_page_url(&self.base_url, &self.fields, range).to_string(),
            FetchTarget::Cursor(cursor) => cursor.clone(),
        }
    }
}

/// First-page request for published events starting inside `range`.
pub fn first_page_url(base: &Url, fields: &str, range: &DateRange) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("fields", fields)
        .append_pair("status", "Published")
        .append_pair("start_date", &range.start_param())
        .append_pair("end_date", &range.end_param());
    url
}

pub fn decode_page(url: &str, body: &[u8]) -> Result<EventPage, UpstreamError> {
    serde_json::from_slice(body).map_err(|source| UpstreamError::Decode {
        url: url.to_string(),
        source,
    })
}

fn network_error(url: &str) -> impl Fn(reqwest::Error) -> UpstreamError + '_ {
    move |err| UpstreamError::Network {
        url: url.to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn fetch_page(&self, target: &FetchTarget) -> Result<EventPage, UpstreamError> {
        let url = self.target_url(target);
        debug!(url = %url, "fetching upstream page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(network_error(&url))?;
        let body = response.bytes().await.map_err(network_error(&url))?;
        decode_page(&url, &body)
    }
}
