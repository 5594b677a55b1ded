//! Time source abstraction.
//!
//! # Responsibility
//! - Provide epoch-millisecond "now" to store and controllers.
//! - Keep deadline-based feedback deterministic under test.
//!
//! # Invariants
//! - All timestamps in core are UTC epoch milliseconds.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::cell::Cell;
use std::rc::Rc;

const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of the current time in epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock.
///
/// Clones share the same instant, so a test can hand one clone to a store
/// and keep another to advance time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_ms)),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

/// Formats epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_iso8601_utc(epoch_ms: i64) -> String {
    utc_datetime(epoch_ms).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats the UTC calendar date of epoch milliseconds as `YYYY-MM-DD`.
pub fn format_utc_date(epoch_ms: i64) -> String {
    utc_datetime(epoch_ms)
        .date_naive()
        .format(CALENDAR_DATE_FORMAT)
        .to_string()
}

/// Parses a `YYYY-MM-DD` text into a real calendar date.
///
/// Returns `None` for impossible dates such as `2023-02-29`.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, CALENDAR_DATE_FORMAT).ok()
}

// Out-of-range instants clamp to the epoch.
fn utc_datetime(epoch_ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms).unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::{format_iso8601_utc, format_utc_date, parse_calendar_date, Clock, ManualClock};

    #[test]
    fn iso8601_formats_epoch_and_known_dates() {
        assert_eq!(format_iso8601_utc(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(
            format_iso8601_utc(1_704_067_200_000),
            "2024-01-01T00:00:00.000Z"
        );
        assert_eq!(
            format_iso8601_utc(1_709_210_096_789),
            "2024-02-29T12:34:56.789Z"
        );
    }

    #[test]
    fn utc_date_handles_pre_epoch_values() {
        assert_eq!(format_utc_date(-1), "1969-12-31");
        assert_eq!(format_utc_date(1_706_832_000_000), "2024-02-02");
    }

    #[test]
    fn calendar_dates_must_exist() {
        assert!(parse_calendar_date("2024-02-29").is_some());
        assert!(parse_calendar_date("2023-02-29").is_none());
        assert!(parse_calendar_date("2024-04-31").is_none());
        assert!(parse_calendar_date("2024-13-01").is_none());
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();
        handle.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        handle.set(10);
        assert_eq!(clock.now_ms(), 10);
    }
}
