use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};

use crate::entities::{Event, StoredEvent};
use crate::value_objects::{PageRequest, QueryMode};

/// Whether `stored` belongs to the selection for `mode` at instant `now`.
///
/// Time boundaries are strict: an event starting exactly at `now` is neither
/// upcoming nor old, and one created exactly `latest_window` ago is not latest.
pub fn matches_mode(
    mode: QueryMode,
    stored: &StoredEvent,
    now: DateTime<Utc>,
    latest_window: Duration,
) -> bool {
    match mode {
        QueryMode::All => true,
        QueryMode::Latest => stored.created_at > latest_cutoff(now, latest_window),
        QueryMode::Upcoming => stored.event.start_date > now,
        QueryMode::Old => stored.event.start_date < now,
    }
}

pub fn latest_cutoff(now: DateTime<Utc>, latest_window: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(latest_window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Newest start first; equal starts fall back to the larger id first.
pub fn by_start_date_desc(a: &Event, b: &Event) -> Ordering {
    b.start_date
        .cmp(&a.start_date)
        .then_with(|| b.id.cmp(&a.id))
}

/// Selects, orders and pages stored events. Paging is applied to the full
/// ordered selection.
pub fn select_events<'a, I>(
    stored: I,
    mode: QueryMode,
    page: PageRequest,
    now: DateTime<Utc>,
    latest_window: Duration,
) -> Vec<Event>
where
    I: IntoIterator<Item = &'a StoredEvent>,
{
    let Some(window) = page.window() else {
        return Vec::new();
    };

    let mut selected: Vec<&Event> = stored
        .into_iter()
        .filter(|item| matches_mode(mode, item, now, latest_window))
        .map(|item| &item.event)
        .collect();
    selected.sort_by(|a, b| by_start_date_desc(a, b));

    selected
        .into_iter()
        .skip(window.offset)
        .take(window.limit)
        .cloned()
        .collect()
}
