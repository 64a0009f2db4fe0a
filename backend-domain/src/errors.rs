// Errors raised at the domain's port boundaries

use thiserror::Error;

/// Failure while fetching one page from the upstream listing.
///
/// Either variant aborts the ingest run that triggered it.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("upstream response from {url} is not an event page: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl UpstreamError {
    pub fn url(&self) -> &str {
        match self {
            UpstreamError::Network { url, .. } | UpstreamError::Decode { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown query mode '{0}'")]
pub struct UnknownQueryMode(pub String);
