use backend_domain::UpstreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid page '{0}'")]
    InvalidPage(String),
    #[error("invalid pageSize '{0}'")]
    InvalidPageSize(String),
    #[error("invalid queryType '{0}'")]
    InvalidQueryMode(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl AppError {
    /// Input errors are rejected before storage is touched.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AppError::InvalidPage(_) | AppError::InvalidPageSize(_) | AppError::InvalidQueryMode(_)
        )
    }
}
