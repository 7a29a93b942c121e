//! Civil-time week arithmetic.
//!
//! All date math for the rotation happens in a fixed civil offset (UTC+9 by
//! default). The offset is a plain shift with no daylight-saving rules.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

use crate::error::{Result, RotaError};
use crate::types::WeekStamp;

pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Converts instants into civil dates and (year, week) stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekClock {
    offset: FixedOffset,
}

impl WeekClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Build a clock from a whole-hour offset east of UTC.
    pub fn from_hours(hours: i32) -> Result<Self> {
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .ok_or_else(|| RotaError::Config(format!("utc offset out of range: {hours}h")))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// `now` expressed in the civil offset.
    pub fn local(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        now.with_timezone(&self.offset)
    }

    pub fn stamp(&self, now: DateTime<Utc>) -> WeekStamp {
        let local = self.local(now).naive_local();
        WeekStamp {
            year: local.year(),
            week: week_number(local),
        }
    }
}

impl Default for WeekClock {
    fn default() -> Self {
        let offset = FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600).unwrap_or(Utc.fix());
        Self::new(offset)
    }
}

const MILLIS_PER_DAY: u64 = 86_400_000;

/// Week of the year: `ceil((days since Jan 1 00:00 + weekday of Jan 1 + 1) / 7)`,
/// weekday counted from Sunday = 0 and elapsed days kept fractional. The
/// fraction moves the week boundary to just after Saturday 00:00, so the
/// Saturday afternoon, Sunday and Monday of one rotation all share a number.
/// This is not ISO-8601; Dec 31 of a year whose Jan 1 fell on a Sunday lands
/// in week 53.
pub fn week_number(at: NaiveDateTime) -> u32 {
    let jan1 = NaiveDate::from_yo_opt(at.year(), 1).unwrap_or(at.date());
    let elapsed_ms = (at - jan1.and_time(chrono::NaiveTime::MIN))
        .num_milliseconds()
        .max(0) as u64;
    let jan1_weekday = u64::from(jan1.weekday().num_days_from_sunday());
    let week = (elapsed_ms + (jan1_weekday + 1) * MILLIS_PER_DAY).div_ceil(7 * MILLIS_PER_DAY);
    week as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Weekday};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn jan_first_2024_is_week_one() {
        assert_eq!(week_number(at(2024, 1, 1, 0)), 1);
        assert_eq!(week_number(at(2024, 1, 1, 23)), 1);
    }

    #[test]
    fn dec_31_2023_is_week_53() {
        assert_eq!(week_number(at(2023, 12, 31, 0)), 53);
        assert_eq!(week_number(at(2023, 12, 31, 12)), 53);
    }

    #[test]
    fn week_turns_over_after_saturday_midnight() {
        // Jan 1 2024 is a Monday. Saturday 00:00 still closes week 1; any
        // later instant that Saturday already counts as week 2.
        assert_eq!(week_number(at(2024, 1, 6, 0)), 1);
        assert_eq!(week_number(at(2024, 1, 6, 12)), 2);
        assert_eq!(week_number(at(2024, 1, 7, 9)), 2);
        assert_eq!(week_number(at(2024, 1, 8, 9)), 2);
        assert_eq!(week_number(at(2024, 1, 13, 1)), 3);
    }

    #[test]
    fn default_clock_is_utc_plus_nine() {
        let clock = WeekClock::default();
        assert_eq!(clock.offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn local_shifts_into_civil_offset() {
        let clock = WeekClock::default();
        // 2024-01-07 23:30 UTC is Monday 08:30 in UTC+9.
        let now = Utc.with_ymd_and_hms(2024, 1, 7, 23, 30, 0).unwrap();
        let local = clock.local(now);
        assert_eq!(local.weekday(), Weekday::Mon);
        assert_eq!(local.hour(), 8);
    }

    #[test]
    fn stamp_crosses_year_in_civil_time() {
        let clock = WeekClock::default();
        // Still Dec 31 in UTC, already Jan 1 in UTC+9.
        let now = Utc.with_ymd_and_hms(2023, 12, 31, 16, 0, 0).unwrap();
        assert_eq!(clock.stamp(now), WeekStamp { year: 2024, week: 1 });

        let before = Utc.with_ymd_and_hms(2023, 12, 31, 14, 0, 0).unwrap();
        assert_eq!(clock.stamp(before), WeekStamp { year: 2023, week: 53 });
    }

    #[test]
    fn from_hours_rejects_out_of_range() {
        assert!(WeekClock::from_hours(9).is_ok());
        assert!(WeekClock::from_hours(30).is_err());
    }
}
