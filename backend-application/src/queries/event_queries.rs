use tracing::{debug, error};

use backend_domain::{Event, PageRequest, QueryMode};

use crate::dtos::EventListQuery;
use crate::{AppError, AppState};

/// Validates raw listing parameters in the order `page`, `pageSize`,
/// `queryType`. Errors carry the raw input.
pub fn parse_listing(
    query_type: &str,
    page: &str,
    page_size: &str,
) -> Result<(QueryMode, PageRequest), AppError> {
    let page_number = page
        .parse::<i64>()
        .map_err(|_| AppError::InvalidPage(page.to_string()))?;
    let size = page_size
        .parse::<i64>()
        .map_err(|_| AppError::InvalidPageSize(page_size.to_string()))?;
    let mode = query_type
        .parse::<QueryMode>()
        .map_err(|err| AppError::InvalidQueryMode(err.0))?;
    Ok((mode, PageRequest::new(page_number, size)))
}

pub async fn resolve(
    state: &AppState,
    query_type: &str,
    page: &str,
    page_size: &str,
) -> Result<Vec<Event>, AppError> {
    let (mode, page) = match parse_listing(query_type, page, page_size) {
        Ok(parsed) => parsed,
        Err(err) => {
            state.metrics.record_query_rejected();
            return Err(err);
        }
    };
    state.metrics.record_query();
    debug!(mode = %mode, page = page.page, page_size = page.page_size, "listing events");

    state
        .event_store
        .get_events(mode, page)
        .await
        .map_err(|err| {
            error!("failed to fetch events: {:#}", err);
            AppError::Storage(err)
        })
}

pub async fn list_events(state: &AppState, query: EventListQuery) -> Result<Vec<Event>, AppError> {
    resolve(
        state,
        query.query_type.as_deref().unwrap_or(""),
        query.page.as_deref().unwrap_or(""),
        query.page_size.as_deref().unwrap_or(""),
    )
    .await
}

pub async fn list_event_ids(state: &AppState) -> Result<Vec<i64>, AppError> {
    state.event_store.get_event_ids().await.map_err(|err| {
        error!("failed to fetch event ids: {:#}", err);
        AppError::Storage(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{event, state_with, MockEventStore, ScriptedUpstream};
    use mockall::predicate::eq;
    use std::sync::Arc;

    fn state_with_store(store: MockEventStore) -> AppState {
        state_with(Arc::new(store), Arc::new(ScriptedUpstream::new(Vec::new())))
    }

    fn untouched_store() -> MockEventStore {
        let mut store = MockEventStore::new();
        store.expect_get_events().never();
        store
    }

    #[tokio::test]
    async fn bogus_mode_is_rejected_before_storage() {
        let state = state_with_store(untouched_store());
        let err = resolve(&state, "bogus", "1", "10").await.expect_err("reject");
        assert!(matches!(err, AppError::InvalidQueryMode(ref raw) if raw == "bogus"));
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn unparsable_page_reports_raw_input() {
        let state = state_with_store(untouched_store());
        let err = resolve(&state, "all", "abc", "10").await.expect_err("reject");
        assert!(matches!(err, AppError::InvalidPage(ref raw) if raw == "abc"));

        let err = resolve(&state, "all", "1", "1.5").await.expect_err("reject");
        assert!(matches!(err, AppError::InvalidPageSize(ref raw) if raw == "1.5"));
    }

    #[tokio::test]
    async fn page_is_checked_before_mode() {
        let state = state_with_store(untouched_store());
        let err = resolve(&state, "bogus", "x", "y").await.expect_err("reject");
        assert!(matches!(err, AppError::InvalidPage(_)));
    }

    #[tokio::test]
    async fn missing_parameters_are_invalid() {
        let state = state_with_store(untouched_store());
        let err = list_events(&state, EventListQuery::default())
            .await
            .expect_err("reject");
        assert!(matches!(err, AppError::InvalidPage(ref raw) if raw.is_empty()));
    }

    #[tokio::test]
    async fn valid_request_delegates_to_store() {
        let mut store = MockEventStore::new();
        store
            .expect_get_events()
            .with(eq(QueryMode::Upcoming), eq(PageRequest::new(2, 5)))
            .times(1)
            .returning(|_, _| Ok(vec![event(7, "TR")]));
        let state = state_with_store(store);

        let events = list_events(
            &state,
            EventListQuery {
                query_type: Some("upcoming".to_string()),
                page: Some("2".to_string()),
                page_size: Some("5".to_string()),
            },
        )
        .await
        .expect("events");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, 7);
    }

    #[tokio::test]
    async fn negative_page_passes_through_to_store() {
        let mut store = MockEventStore::new();
        store
            .expect_get_events()
            .with(eq(QueryMode::All), eq(PageRequest::new(-1, 10)))
            .returning(|_, _| Ok(Vec::new()));
        let state = state_with_store(store);
        let events = resolve(&state, "all", "-1", "10").await.expect("events");
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn store_failure_becomes_storage_error() {
        let mut store = MockEventStore::new();
        store
            .expect_get_events()
            .returning(|_, _| Err(anyhow::anyhow!("connection refused")));
        let state = state_with_store(store);
        let err = resolve(&state, "old", "1", "10").await.expect_err("fail");
        assert!(matches!(err, AppError::Storage(_)));
        assert!(!err.is_invalid_input());
    }
}
