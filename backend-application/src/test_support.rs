// Shared fakes for application tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockall::mock;

use backend_domain::ports::{EventStore, FetchTarget, FixedClock, UpstreamClient};
use backend_domain::{
    Chapter, CountryWhitelist, Event, EventPage, PageLinks, PageRequest, QueryMode,
    RuntimeConfig, UpstreamError,
};

use crate::{AppState, Metrics};

mock! {
    pub EventStore {}

    #[async_trait]
    impl EventStore for EventStore {
        async fn ensure_schema(&self) -> anyhow::Result<()>;
        async fn save_events(&self, events: &[Event]) -> anyhow::Result<()>;
        async fn get_event_ids(&self) -> anyhow::Result<Vec<i64>>;
        async fn get_events(&self, mode: QueryMode, page: PageRequest) -> anyhow::Result<Vec<Event>>;
        async fn ping(&self) -> anyhow::Result<()>;
    }
}

pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn event(id: i64, country: &str) -> Event {
    let start = test_now() + Duration::days(id);
    Event {
        id,
        title: format!("Meetup #{}", id),
        chapter: Chapter {
            country: country.to_string(),
            title: format!("GDG {}", country),
        },
        start_date: start,
        end_date: start + Duration::hours(3),
        url: format!("https://upstream.test/events/{}", id),
    }
}

pub fn page(results: Vec<Event>, next: Option<&str>) -> EventPage {
    EventPage {
        links: PageLinks {
            next: next.map(ToString::to_string),
            previous: None,
        },
        count: results.len() as i64,
        results,
    }
}

/// Serves a fixed list of pages in call order and records each request.
pub struct ScriptedUpstream {
    pages: Vec<EventPage>,
    fail_at: Option<usize>,
    calls: Mutex<Vec<FetchTarget>>,
}

impl ScriptedUpstream {
    pub fn new(pages: Vec<EventPage>) -> Self {
        Self {
            pages,
            fail_at: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<FetchTarget> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamClient for ScriptedUpstream {
    async fn fetch_page(&self, target: &FetchTarget) -> Result<EventPage, UpstreamError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(target.clone());
            calls.len() - 1
        };
        let url = match target {
            FetchTarget::Range(_) => "first-page".to_string(),
            FetchTarget::Cursor(cursor) => cursor.clone(),
        };
        if self.fail_at == Some(index) {
            return Err(UpstreamError::Network {
                url,
                message: "connection reset".to_string(),
            });
        }
        self.pages.get(index).cloned().ok_or(UpstreamError::Network {
            url,
            message: "no scripted page".to_string(),
        })
    }
}

pub fn state_with(store: Arc<dyn EventStore>, upstream: Arc<dyn UpstreamClient>) -> AppState {
    AppState {
        config: RuntimeConfig::default(),
        event_store: store,
        upstream,
        whitelist: Arc::new(CountryWhitelist::default()),
        clock: Arc::new(FixedClock(test_now())),
        metrics: Arc::new(Metrics::default()),
    }
}
