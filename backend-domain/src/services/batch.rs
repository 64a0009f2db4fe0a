use std::collections::HashMap;

use crate::entities::Event;

/// Collapses repeated ids so each id appears once, carrying the value of its
/// last occurrence. Ids keep the position of their first occurrence.
pub fn collapse_by_id(events: &[Event]) -> Vec<Event> {
    let mut positions: HashMap<i64, usize> = HashMap::with_capacity(events.len());
    let mut out: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        match positions.get(&event.id) {
            Some(&index) => out[index] = event.clone(),
            None => {
                positions.insert(event.id, out.len());
                out.push(event.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Chapter;
    use chrono::{TimeZone, Utc};

    fn event(id: i64, title: &str) -> Event {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        Event {
            id,
            title: title.to_string(),
            chapter: Chapter {
                country: "TR".to_string(),
                title: "GDG Ankara".to_string(),
            },
            start_date: at,
            end_date: at,
            url: String::new(),
        }
    }

    #[test]
    fn last_duplicate_wins() {
        let batch = vec![event(1, "a"), event(2, "b"), event(1, "a2")];
        let collapsed = collapse_by_id(&batch);
        assert_eq!(collapsed.len(), 2);
        assert_eq!(collapsed[0].id, 1);
        assert_eq!(collapsed[0].title, "a2");
        assert_eq!(collapsed[1].title, "b");
    }
}
