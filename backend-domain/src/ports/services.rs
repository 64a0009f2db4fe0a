use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::EventPage;
use crate::errors::UpstreamError;
use crate::value_objects::DateRange;

/// What to fetch: the first page of a date range, or a page named by an
/// opaque continuation cursor that already encodes every filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    Range(DateRange),
    Cursor(String),
}

#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn fetch_page(&self, target: &FetchTarget) -> Result<EventPage, UpstreamError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
