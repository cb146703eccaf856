//! Temporal window selection.
//!
//! The analysis always targets "ten years ago": the before/after windows
//! bracket a suspected mid-October flood onset in the computed year. The
//! day boundaries are fixed design constants, not request parameters.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// How far back the analysis year lies from the request time.
pub const YEARS_BACK: i32 = 10;

/// The year whose October windows an analysis issued `now` will cover.
#[must_use]
pub fn analysis_year(now: DateTime<Utc>) -> i32 {
    now.year() - YEARS_BACK
}

/// Before/after acquisition windows bracketing the suspected flood onset.
///
/// Invariant: `pre_start < pre_end <= post_start < post_end`, all four in
/// October of the same year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalWindow {
    /// Pre-event window start (inclusive).
    pub pre_start: NaiveDate,
    /// Pre-event window end (exclusive).
    pub pre_end: NaiveDate,
    /// Post-event window start (inclusive).
    pub post_start: NaiveDate,
    /// Post-event window end (exclusive).
    pub post_end: NaiveDate,
}

impl TemporalWindow {
    /// Builds the fixed October windows for `year`.
    ///
    /// # Panics
    ///
    /// Cannot panic for any year representable as an `i32` that `chrono`
    /// accepts; the day/month constants are always valid.
    #[must_use]
    pub fn for_year(year: i32) -> Self {
        let date = |day| NaiveDate::from_ymd_opt(year, 10, day).expect("fixed October date");
        Self {
            pre_start: date(1),
            pre_end: date(17),
            post_start: date(18),
            post_end: date(25),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    #[test]
    fn windows_are_ordered_and_in_october() {
        for year in [1995, 2013, 2024] {
            let window = TemporalWindow::for_year(year);
            assert!(window.pre_start < window.pre_end);
            assert!(window.pre_end <= window.post_start);
            assert!(window.post_start < window.post_end);
            for date in [
                window.pre_start,
                window.pre_end,
                window.post_start,
                window.post_end,
            ] {
                assert_eq!(date.year(), year);
                assert_eq!(date.month(), 10);
            }
        }
    }

    #[test]
    fn fixed_day_offsets() {
        let window = TemporalWindow::for_year(2013);
        assert_eq!(window.pre_start.day(), 1);
        assert_eq!(window.pre_end.day(), 17);
        assert_eq!(window.post_start.day(), 18);
        assert_eq!(window.post_end.day(), 25);
    }

    #[test]
    fn analysis_year_is_ten_back() {
        let now = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(analysis_year(now), 2013);
    }
}
