// Date range value object for upstream listings

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::format_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Window used by the top-level ingest trigger: a fixed start date through
    /// `horizon_months` past `now`. The end moves forward on every run.
    ///
    /// A day that does not exist in the target month clamps to that month's
    /// last day (2024-02-29 plus 12 months is 2025-02-28) rather than rolling
    /// into the next month.
    pub fn ingest_window(start: NaiveDate, now: DateTime<Utc>, horizon_months: u32) -> Self {
        let today = now.date_naive();
        let end = today
            .checked_add_months(Months::new(horizon_months))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    pub fn start_param(&self) -> String {
        format_date(self.start)
    }

    pub fn end_param(&self) -> String {
        format_date(self.end)
    }
}
