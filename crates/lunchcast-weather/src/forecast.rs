//! Pick the forecast slot closest to lunch.

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};

use crate::types::ForecastEntry;

/// Today's lunch time in the city, as a UTC instant.
///
/// "Today" is the calendar date of `now` in the city's offset, not in UTC.
/// Returns `None` if the offset is out of range.
pub fn lunch_target(now: DateTime<Utc>, utc_offset_secs: i32, target: NaiveTime) -> Option<DateTime<Utc>> {
    let offset = FixedOffset::east_opt(utc_offset_secs)?;
    let local_date = now.with_timezone(&offset).date_naive();
    let local = local_date.and_time(target).and_local_timezone(offset).single()?;
    Some(local.with_timezone(&Utc))
}

/// Entry with the smallest absolute distance to `target`; the earlier entry
/// in the list wins a tie.
pub fn nearest_entry(entries: &[ForecastEntry], target: DateTime<Utc>) -> Option<&ForecastEntry> {
    let target_ts = target.timestamp();
    entries.iter().min_by_key(|e| e.dt.abs_diff(target_ts))
}
