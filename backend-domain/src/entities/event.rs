// Event entity
// A developer-community event as listed upstream and as served back out

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

/// Upstream records may carry `null` for any text field or for the whole
/// chapter. Those decode to empty values; an empty country never passes the
/// whitelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chapter: Chapter,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An [`Event`] as held by a store, plus the time the store first saw its id.
///
/// `created_at` is written once per id and survives every later overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    #[serde(flatten)]
    pub event: Event,
    pub created_at: DateTime<Utc>,
}

impl StoredEvent {
    pub fn new(event: Event, created_at: DateTime<Utc>) -> Self {
        Self { event, created_at }
    }

    /// Replaces the event body, keeping the original `created_at`.
    pub fn overwrite(&mut self, event: Event) {
        self.event = event;
    }
}
