//! Physical time encodings shared by the source and transform layers.
//!
//! Dates are carried as days since 1970-01-01 (i32) and timestamps as
//! microseconds since 1970-01-01T00:00:00 (i64), matching the polars
//! physical representation of `Date` and `Datetime` columns. All
//! conversions floor toward the earlier instant so pre-1970 values land on
//! the correct calendar day.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::TimeUnit;

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

/// Converts days-since-epoch to a calendar date.
pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_CE_DAYS)?)
}

/// Converts a calendar date to days-since-epoch.
pub fn epoch_days_from_date(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_CE_DAYS
}

/// Converts microseconds-since-epoch to a naive timestamp.
pub fn datetime_from_epoch_micros(micros: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros).map(|instant| instant.naive_utc())
}

/// Converts a naive timestamp to microseconds-since-epoch.
pub fn epoch_micros_from_datetime(datetime: NaiveDateTime) -> i64 {
    datetime.and_utc().timestamp_micros()
}

/// Scales a raw column value in the given unit to microseconds.
///
/// Nanosecond inputs use flooring division so instants before 1970 stay on
/// the earlier microsecond rather than rounding toward zero.
pub fn raw_timestamp_to_micros(value: i64, unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Nanoseconds => value.div_euclid(1_000),
        TimeUnit::Microseconds => value,
        TimeUnit::Milliseconds => value.saturating_mul(1_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn epoch_day_zero_is_unix_epoch() {
        assert_eq!(date_from_epoch_days(0), Some(date(1970, 1, 1)));
        assert_eq!(epoch_days_from_date(date(1970, 1, 1)), 0);
    }

    #[test]
    fn negative_days_fall_before_the_epoch() {
        assert_eq!(date_from_epoch_days(-1), Some(date(1969, 12, 31)));
        assert_eq!(epoch_days_from_date(date(1899, 1, 1)), -25_932);
    }

    #[test]
    fn days_round_trip() {
        for days in [-25_932, -1, 0, 1, 19_723] {
            let converted = date_from_epoch_days(days).unwrap();
            assert_eq!(epoch_days_from_date(converted), days);
        }
    }

    #[test]
    fn micros_round_trip_across_the_epoch() {
        let instants = [
            date(1899, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
            date(1969, 12, 31).and_hms_opt(23, 59, 59).unwrap(),
            date(2024, 6, 15).and_hms_opt(13, 45, 30).unwrap(),
        ];
        for instant in instants {
            let micros = epoch_micros_from_datetime(instant);
            assert_eq!(datetime_from_epoch_micros(micros), Some(instant));
        }
    }

    #[test]
    fn nanosecond_scaling_floors_pre_epoch_values() {
        assert_eq!(raw_timestamp_to_micros(1_500, TimeUnit::Nanoseconds), 1);
        assert_eq!(raw_timestamp_to_micros(-1, TimeUnit::Nanoseconds), -1);
        assert_eq!(raw_timestamp_to_micros(7, TimeUnit::Milliseconds), 7_000);
        assert_eq!(raw_timestamp_to_micros(42, TimeUnit::Microseconds), 42);
    }
}
