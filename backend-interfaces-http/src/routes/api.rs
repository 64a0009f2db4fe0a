use axum::routing::get;
use axum::Router;

use backend_application::AppState;

use crate::handlers::{event_handlers, ops_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops_handlers::service_info))
        .route("/api/events", get(event_handlers::list_events))
        .route("/api/events/ids", get(event_handlers::list_event_ids))
        .route("/ops/health/live", get(ops_handlers::health_live))
        .route("/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::Value;
    use tower::ServiceExt;

    use backend_application::Metrics;
    use backend_domain::ports::{EventStore, FetchTarget, FixedClock, UpstreamClient};
    use backend_domain::{
        AboutInfo, Chapter, CountryWhitelist, Event, EventPage, PageRequest, QueryMode,
        RuntimeConfig, UpstreamError,
    };

    /// Store holding a fixed list, counting reads.
    struct ListStore {
        events: Vec<Event>,
        broken: bool,
        reads: AtomicUsize,
    }

    impl ListStore {
        fn with(events: Vec<Event>) -> Arc<Self> {
            Arc::new(Self {
                events,
                broken: false,
                reads: AtomicUsize::new(0),
            })
        }

        fn broken() -> Arc<Self> {
            Arc::new(Self {
                events: Vec::new(),
                broken: true,
                reads: AtomicUsize::new(0),
            })
        }

        fn check(&self) -> anyhow::Result<()> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                anyhow::bail!("clickhouse unavailable");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EventStore for ListStore {
        async fn ensure_schema(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn save_events(&self, _events: &[Event]) -> anyhow::Result<()> {
            Ok(())
        }

        async fn get_event_ids(&self) -> anyhow::Result<Vec<i64>> {
            self.check()?;
            Ok(self.events.iter().map(|event| event.id).collect())
        }

        async fn get_events(
            &self,
            _mode: QueryMode,
            page: PageRequest,
        ) -> anyhow::Result<Vec<Event>> {
            self.check()?;
            let Some(window) = page.window() else {
                return Ok(Vec::new());
            };
            Ok(self
                .events
                .iter()
                .skip(window.offset)
                .take(window.limit)
                .cloned()
                .collect())
        }

        async fn ping(&self) -> anyhow::Result<()> {
            self.check()
        }
    }

    struct NoUpstream;

    #[async_trait]
    impl UpstreamClient for NoUpstream {
        async fn fetch_page(&self, target: &FetchTarget) -> Result<EventPage, UpstreamError> {
            Err(UpstreamError::Network {
                url: format!("{:?}", target),
                message: "not reachable in tests".to_string(),
            })
        }
    }

    fn event(id: i64) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 10, 5, 9, 0, 0).unwrap();
        Event {
            id,
            title: format!("DevFest #{}", id),
            chapter: Chapter {
                country: "KZ".to_string(),
                title: "GDG Almaty".to_string(),
            },
            start_date: start,
            end_date: start + Duration::hours(9),
            url: format!("https://upstream.test/events/{}", id),
        }
    }

    fn state(store: Arc<ListStore>) -> AppState {
        let config = RuntimeConfig {
            about: AboutInfo {
                github: "https://github.com/chapter-events".to_string(),
                email: "maintainers@chapter-events.test".to_string(),
            },
            ..RuntimeConfig::default()
        };
        AppState {
            config,
            event_store: store,
            upstream: Arc::new(NoUpstream),
            whitelist: Arc::new(CountryWhitelist::default()),
            clock: Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
            )),
            metrics: Arc::new(Metrics::default()),
        }
    }

    async fn get(state: AppState, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = build_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn json(body: &[u8]) -> Value {
        serde_json::from_slice(body).expect("json body")
    }

    #[tokio::test]
    async fn lists_a_page_of_events() {
        let store = ListStore::with((1..=3).map(event).collect());
        let (status, body) = get(
            state(store),
            "/api/events?queryType=all&page=1&pageSize=2",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        let events = body.as_array().expect("array");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["id"], 1);
        assert_eq!(events[0]["chapter"]["country"], "KZ");
        assert_eq!(events[0]["start_date"], "2024-10-05T09:00:00Z");
    }

    #[tokio::test]
    async fn page_past_the_end_is_an_empty_list() {
        let store = ListStore::with((1..=3).map(event).collect());
        let (status, body) = get(
            state(store),
            "/api/events?queryType=upcoming&page=9&pageSize=10",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), serde_json::json!([]));
    }

    #[tokio::test]
    async fn invalid_parameters_are_rejected_without_reading_storage() {
        let cases = [
            ("/api/events?queryType=soon&page=1&pageSize=10", "invalid queryType 'soon'"),
            ("/api/events?queryType=ALL&page=1&pageSize=10", "invalid queryType 'ALL'"),
            ("/api/events?queryType=all&page=one&pageSize=10", "invalid page 'one'"),
            ("/api/events?queryType=all&page=1", "invalid pageSize ''"),
            ("/api/events", "invalid page ''"),
        ];
        for (uri, message) in cases {
            let store = ListStore::with(vec![event(1)]);
            let app_state = state(store.clone());
            let metrics = app_state.metrics.clone();
            let (status, body) = get(app_state, uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(json(&body)["error"], message, "{}", uri);
            assert_eq!(store.reads.load(Ordering::SeqCst), 0, "{}", uri);
            assert!(metrics
                .render_prometheus()
                .contains("events_queries_rejected_total 1\n"));
        }
    }

    #[tokio::test]
    async fn storage_failure_is_a_server_error() {
        let (status, body) = get(
            state(ListStore::broken()),
            "/api/events?queryType=latest&page=1&pageSize=10",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = json(&body)["error"].as_str().unwrap_or_default().to_string();
        assert!(message.contains("clickhouse unavailable"));
    }

    #[tokio::test]
    async fn lists_event_ids() {
        let store = ListStore::with(vec![event(7), event(11)]);
        let (status, body) = get(state(store), "/api/events/ids").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), serde_json::json!([7, 11]));
    }

    #[tokio::test]
    async fn root_describes_the_service() {
        let (status, body) = get(state(ListStore::with(Vec::new())), "/").await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["author"]["github"], "https://github.com/chapter-events");
        assert_eq!(body["author"]["email"], "maintainers@chapter-events.test");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn readiness_follows_the_store() {
        let (live, _) = get(state(ListStore::broken()), "/ops/health/live").await;
        assert_eq!(live, StatusCode::OK);
        let (ready, _) = get(state(ListStore::with(Vec::new())), "/ops/health/ready").await;
        assert_eq!(ready, StatusCode::OK);
        let (not_ready, _) = get(state(ListStore::broken()), "/ops/health/ready").await;
        assert_eq!(not_ready, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn metrics_are_rendered_as_prometheus_text() {
        let app_state = state(ListStore::with(vec![event(1)]));
        app_state.metrics.record_ingest(2, 40, 5);
        let (status, body) = get(app_state, "/ops/metrics/prometheus").await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("events_ingest_kept_total 5\n"));
    }
}
