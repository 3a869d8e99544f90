//! Calendar and wall-clock access.

use chrono::{Datelike, Local, Utc};

pub use chrono::NaiveDate;

/// Month and day on which the seasonal text overlay is requested.
pub const OVERLAY_MONTH_DAY: (u32, u32) = (4, 1);

/// Source of the current date and time.
pub trait Clock {
    /// Today's date in the local time zone.
    fn today(&self) -> NaiveDate;

    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Whether `date` is the day the seasonal text overlay applies.
#[must_use]
pub fn is_overlay_day(date: NaiveDate) -> bool {
    (date.month(), date.day()) == OVERLAY_MONTH_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2024, 4, 1, true)]
    #[case(2031, 4, 1, true)]
    #[case(2024, 4, 2, false)]
    #[case(2024, 3, 31, false)]
    #[case(2024, 1, 4, false)]
    fn recognises_overlay_day(
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
        #[case] expected: bool,
    ) {
        let date = NaiveDate::from_ymd_opt(year, month, day).expect("valid date");
        assert_eq!(is_overlay_day(date), expected);
    }

    #[rstest]
    fn system_clock_reports_time_after_epoch() {
        assert!(SystemClock.now_millis() > 0);
    }
}
