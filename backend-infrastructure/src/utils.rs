use chrono::{DateTime, Utc};
use time::OffsetDateTime;

pub fn millis_to_utc(ms: i64) -> OffsetDateTime {
    let nanos = i128::from(ms).saturating_mul(1_000_000);
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

pub fn chrono_to_offset(value: DateTime<Utc>) -> OffsetDateTime {
    millis_to_utc(value.timestamp_millis())
}

pub fn offset_to_chrono(value: OffsetDateTime) -> DateTime<Utc> {
    let millis = (value.unix_timestamp_nanos() / 1_000_000) as i64;
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn converts_between_time_crates_at_millisecond_precision() {
        let at = Utc.with_ymd_and_hms(2023, 11, 4, 6, 0, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        let offset = chrono_to_offset(at);
        assert_eq!(offset.unix_timestamp(), at.timestamp());
        assert_eq!(offset_to_chrono(offset), at);
    }
}
