use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::RwLock;

use backend_domain::ports::{Clock, EventStore};
use backend_domain::{select_events, Event, PageRequest, QueryMode, StoredEvent};

/// Process-local event store. A batch is applied under one write lock, so
/// readers see either none or all of it.
pub struct InMemoryEventStore {
    events: RwLock<HashMap<i64, StoredEvent>>,
    clock: Arc<dyn Clock>,
    latest_window: Duration,
}

impl InMemoryEventStore {
    pub fn new(clock: Arc<dyn Clock>, latest_window: Duration) -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            clock,
            latest_window,
        }
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn get(&self, id: i64) -> Option<StoredEvent> {
        self.events.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn save_events(&self, events: &[Event]) -> Result<()> {
        let now = self.clock.now();
        let mut stored = self.events.write().await;
        for event in events {
            match stored.get_mut(&event.id) {
                Some(existing) => existing.overwrite(event.clone()),
                None => {
                    stored.insert(event.id, StoredEvent::new(event.clone(), now));
                }
            }
        }
        Ok(())
    }

    async fn get_event_ids(&self) -> Result<Vec<i64>> {
        let mut ids: Vec<i64> = self.events.read().await.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn get_events(&self, mode: QueryMode, page: PageRequest) -> Result<Vec<Event>> {
        if page.window().is_none() {
            return Ok(Vec::new());
        }
        let now = self.clock.now();
        let stored = self.events.read().await;
        Ok(select_events(
            stored.values(),
            mode,
            page,
            now,
            self.latest_window,
        ))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
