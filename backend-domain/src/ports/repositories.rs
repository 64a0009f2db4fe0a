use async_trait::async_trait;

use crate::entities::Event;
use crate::value_objects::{PageRequest, QueryMode};

/// Event-keyed document collection.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;

    /// Upserts the whole batch by `id` atomically. A later duplicate in the
    /// batch wins; `created_at` is only assigned the first time an id is seen.
    async fn save_events(&self, events: &[Event]) -> anyhow::Result<()>;

    async fn get_event_ids(&self) -> anyhow::Result<Vec<i64>>;

    /// Events matching `mode`, ordered by `start_date` descending, then paged.
    async fn get_events(&self, mode: QueryMode, page: PageRequest) -> anyhow::Result<Vec<Event>>;

    async fn ping(&self) -> anyhow::Result<()>;
}
