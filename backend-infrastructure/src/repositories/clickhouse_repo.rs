use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use backend_domain::ports::{Clock, EventStore};
use backend_domain::{collapse_by_id, latest_cutoff, Chapter, Event, PageRequest, QueryMode};

use crate::utils::{chrono_to_offset, offset_to_chrono};

const EVENT_COLUMNS: &str =
    "id, title, chapter_country, chapter_title, start_date, end_date, url, created_at, updated_at";

#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct EventRow {
    pub id: i64,
    pub title: String,
    pub chapter_country: String,
    pub chapter_title: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub start_date: OffsetDateTime,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub end_date: OffsetDateTime,
    pub url: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub created_at: OffsetDateTime,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub updated_at: OffsetDateTime,
}

impl EventRow {
    fn from_event(event: &Event, created_at: OffsetDateTime, updated_at: OffsetDateTime) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            chapter_country: event.chapter.country.clone(),
            chapter_title: event.chapter.title.clone(),
            start_date: chrono_to_offset(event.start_date),
            end_date: chrono_to_offset(event.end_date),
            url: event.url.clone(),
            created_at,
            updated_at,
        }
    }

    fn into_event(self) -> Event {
        Event {
            id: self.id,
            title: self.title,
            chapter: Chapter {
                country: self.chapter_country,
                title: self.chapter_title,
            },
            start_date: offset_to_chrono(self.start_date),
            end_date: offset_to_chrono(self.end_date),
            url: self.url,
        }
    }
}

#[derive(Debug, Clone, Row, Serialize, Deserialize)]
struct CreatedAtRow {
    id: i64,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    created_at: OffsetDateTime,
}

/// Event store over a ClickHouse `ReplacingMergeTree` keyed by id.
///
/// Each `save_events` call is a single INSERT, which ClickHouse applies as
/// one block. Reads use `FINAL` so only the newest version of an id is seen.
#[derive(Clone)]
pub struct ClickhouseEventStore {
    client: Client,
    database: String,
    clock: Arc<dyn Clock>,
    latest_window: Duration,
}

impl ClickhouseEventStore {
    pub fn new(
        client: Client,
        database: String,
        clock: Arc<dyn Clock>,
        latest_window: Duration,
    ) -> Self {
        Self {
            client,
            database,
            clock,
            latest_window,
        }
    }

    async fn existing_created_at(&self, ids: &[i64]) -> Result<HashMap<i64, OffsetDateTime>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = self
            .client
            .query("SELECT id, created_at FROM events FINAL WHERE has(?, id)")
            .bind(ids)
            .fetch_all::<CreatedAtRow>()
            .await?;
        Ok(rows.into_iter().map(|row| (row.id, row.created_at)).collect())
    }
}

/// WHERE clause for a mode; `?` takes a unix-millis instant.
pub fn mode_predicate(mode: QueryMode) -> &'static str {
    match mode {
        QueryMode::All => "1",
        QueryMode::Latest => "created_at > fromUnixTimestamp64Milli(toInt64(?), 'UTC')",
        QueryMode::Upcoming => "start_date > fromUnixTimestamp64Milli(toInt64(?), 'UTC')",
        QueryMode::Old => "start_date < fromUnixTimestamp64Milli(toInt64(?), 'UTC')",
    }
}

pub fn select_sql(mode: QueryMode) -> String {
    format!(
        "SELECT {} FROM events FINAL WHERE {} ORDER BY start_date DESC, id DESC LIMIT ? OFFSET ?",
        EVENT_COLUMNS,
        mode_predicate(mode)
    )
}

#[async_trait]
impl EventStore for ClickhouseEventStore {
    async fn ensure_schema(&self) -> Result<()> {
        // Target database may not exist yet; create it from `default`.
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client
            .clone()
            .with_database("default")
            .query(&create_db)
            .execute()
            .await?;

        let create_events = r#"
CREATE TABLE IF NOT EXISTS events (
    id Int64,
    title String,
    chapter_country LowCardinality(String),
    chapter_title String,
    start_date DateTime64(3, 'UTC'),
    end_date DateTime64(3, 'UTC'),
    url String,
    created_at DateTime64(3, 'UTC'),
    updated_at DateTime64(3, 'UTC')
) ENGINE = ReplacingMergeTree(updated_at)
ORDER BY id
"#;

        self.client.query(create_events).execute().await?;
        Ok(())
    }

    async fn save_events(&self, events: &[Event]) -> Result<()> {
        let batch = collapse_by_id(events);
        if batch.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = batch.iter().map(|event| event.id).collect();
        let existing = self.existing_created_at(&ids).await?;
        let now = chrono_to_offset(self.clock.now());
        debug!(
            batch = batch.len(),
            existing = existing.len(),
            "upserting events"
        );

        let mut insert = self.client.insert("events")?;
        for event in &batch {
            let created_at = existing.get(&event.id).copied().unwrap_or(now);
            insert
                .write(&EventRow::from_event(event, created_at, now))
                .await?;
        }
        insert.end().await?;
        Ok(())
    }

    async fn get_event_ids(&self) -> Result<Vec<i64>> {
        let ids = self
            .client
            .query("SELECT DISTINCT id FROM events FINAL ORDER BY id")
            .fetch_all::<i64>()
            .await?;
        Ok(ids)
    }

    async fn get_events(&self, mode: QueryMode, page: PageRequest) -> Result<Vec<Event>> {
        let Some(window) = page.window() else {
            return Ok(Vec::new());
        };
        let now = self.clock.now();
        let sql = select_sql(mode);
        let mut query = self.client.query(&sql);
        query = match mode {
            QueryMode::All => query,
            QueryMode::Latest => query.bind(latest_cutoff(now, self.latest_window).timestamp_millis()),
            QueryMode::Upcoming | QueryMode::Old => query.bind(now.timestamp_millis()),
        };
        let rows = query
            .bind(window.limit as u64)
            .bind(window.offset as u64)
            .fetch_all::<EventRow>()
            .await?;
        Ok(rows.into_iter().map(EventRow::into_event).collect())
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}
