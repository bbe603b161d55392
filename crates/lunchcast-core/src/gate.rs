//! Decide whether today's suggestion should be emailed.

use chrono::{DateTime, Datelike, Utc, Weekday};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendDecision {
    Send,
    /// Sent because of the force override, whatever the day.
    Forced,
    SkipWeekend(Weekday),
}

impl SendDecision {
    pub fn should_send(&self) -> bool {
        matches!(self, Self::Send | Self::Forced)
    }
}

/// `now` is converted to `tz` before looking at the weekday, so a Friday
/// evening in California is still Friday even though it is Saturday in UTC.
pub fn should_send(now: DateTime<Utc>, tz: Tz, weekday_only: bool, force_send: bool) -> SendDecision {
    if force_send {
        return SendDecision::Forced;
    }

    let weekday = now.with_timezone(&tz).weekday();
    if weekday_only && matches!(weekday, Weekday::Sat | Weekday::Sun) {
        return SendDecision::SkipWeekend(weekday);
    }

    SendDecision::Send
}
