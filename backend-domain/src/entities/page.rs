// Upstream page envelope
// Consumed transiently by the ingestor, never persisted

use serde::{Deserialize, Serialize};

use crate::entities::Event;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPage {
    #[serde(default)]
    pub links: PageLinks,
    #[serde(default)]
    pub count: i64,
    pub results: Vec<Event>,
}

impl EventPage {
    /// Continuation cursor for the following page, if upstream sent a non-blank one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.links
            .next
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
    }
}
