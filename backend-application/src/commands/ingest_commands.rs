use tracing::{debug, error, info};

use backend_domain::ports::{FetchTarget, UpstreamClient};
use backend_domain::{CountryWhitelist, DateRange, Event, UpstreamError};

use crate::dtos::IngestReport;
use crate::{AppError, AppState};

/// Every page of one upstream listing, whitelist-filtered.
#[derive(Debug, Clone)]
pub struct CollectedEvents {
    pub pages: usize,
    pub fetched: usize,
    pub events: Vec<Event>,
}

/// Follows the cursor chain for `range` one page at a time, then drops events
/// whose chapter country is not whitelisted. Page order is preserved and
/// duplicate ids are left for the store to resolve.
pub async fn collect_events(
    upstream: &dyn UpstreamClient,
    whitelist: &CountryWhitelist,
    range: DateRange,
) -> Result<CollectedEvents, UpstreamError> {
    let mut page = upstream.fetch_page(&FetchTarget::Range(range)).await?;
    let mut pages = 1usize;
    let mut events = std::mem::take(&mut page.results);

    while let Some(cursor) = page.next_cursor().map(ToString::to_string) {
        debug!(pages, cursor = %cursor, "following upstream cursor");
        page = upstream.fetch_page(&FetchTarget::Cursor(cursor)).await?;
        pages += 1;
        events.append(&mut page.results);
    }

    let fetched = events.len();
    events.retain(|event| whitelist.contains(&event.chapter.country));
    Ok(CollectedEvents {
        pages,
        fetched,
        events,
    })
}

/// Window used when no explicit range is given.
pub fn default_range(state: &AppState) -> DateRange {
    DateRange::ingest_window(
        state.config.ingest_start_date,
        state.clock.now(),
        state.config.ingest_horizon_months,
    )
}

/// One ingest pass without persisting: every page of `range`, whitelist-filtered.
/// An upstream failure aborts the pass and is counted as an ingest error.
pub async fn ingest_events(state: &AppState, range: DateRange) -> Result<CollectedEvents, AppError> {
    collect_events(state.upstream.as_ref(), &state.whitelist, range)
        .await
        .map_err(|err| {
            state.metrics.record_ingest_error();
            error!(url = err.url(), "ingest aborted: {}", err);
            AppError::Upstream(err)
        })
}

/// Fetches the whole range and persists it as one batch. Nothing is written
/// unless every page was fetched.
pub async fn run_ingest(state: &AppState, range: DateRange) -> Result<IngestReport, AppError> {
    info!(
        start = %range.start_param(),
        end = %range.end_param(),
        "ingest started"
    );
    let collected = ingest_events(state, range).await?;

    if let Err(err) = state.event_store.save_events(&collected.events).await {
        state.metrics.record_ingest_error();
        error!("failed to save ingested events: {:#}", err);
        return Err(AppError::Storage(err));
    }

    state
        .metrics
        .record_ingest(collected.pages, collected.fetched, collected.events.len());
    info!(
        pages = collected.pages,
        fetched = collected.fetched,
        kept = collected.events.len(),
        "ingest finished"
    );
    Ok(IngestReport {
        range,
        pages: collected.pages,
        fetched: collected.fetched,
        kept: collected.events.len(),
    })
}
