//! Calendar arithmetic on integer index values.
//!
//! A [`DatePolicy`] interprets an index value as an instant and answers
//! calendar questions about it. Policies are stateless; every method is an
//! associated function so partition functions can be resolved statically.
//!
//! Two policies ship with the crate:
//! - [`GregorianDays`]: whole days since 1970-01-01 (`i32` or `i64`)
//! - [`PosixSeconds`]: seconds since the Unix epoch in UTC (`i64`)

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::fmt::Write;

/// Day number of 1970-01-01 counted from 0001-01-01 (day 1).
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;
const SECONDS_PER_DAY: i64 = 86_400;

/// Calendar operations on an index type `I`.
///
/// Day of week runs from 0 (Sunday) to 6 (Saturday).
pub trait DatePolicy<I> {
    /// Formats `idx` with a strftime-style pattern. An invalid pattern falls
    /// back to ISO-8601.
    fn to_string(idx: I, format: &str) -> String;

    /// Builds an index value, or `None` for a non-existent calendar date.
    fn to_date(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Option<I>;

    fn day_of_week(idx: I) -> u32;
    fn day_of_month(idx: I) -> u32;
    fn month(idx: I) -> u32;
    fn year(idx: I) -> i32;
    fn hour(idx: I) -> u32;
    fn minute(idx: I) -> u32;
    fn second(idx: I) -> u32;

    /// Index value of the last day of the month containing `idx`.
    fn last_day_of_month(idx: I) -> I;

    /// Adds calendar years; Feb 29 clamps to Feb 28 in non-leap years.
    fn add_years(idx: I, n: i32) -> I;

    /// Adds calendar months, clamping the day to the target month's length.
    fn add_months(idx: I, n: i32) -> I;

    fn add_days(idx: I, n: i32) -> I;

    /// Signed distance `x - y` measured in days.
    fn daily_distance(x: I, y: I) -> f64;
}

fn render(display: impl std::fmt::Display, fallback: impl FnOnce() -> String) -> String {
    let mut out = String::new();
    if write!(out, "{}", display).is_err() {
        return fallback();
    }
    out
}

fn date_from_days(days: i64) -> NaiveDate {
    let ce = days.saturating_add(UNIX_EPOCH_DAYS_FROM_CE);
    i32::try_from(ce)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

fn days_from_date(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 - UNIX_EPOCH_DAYS_FROM_CE
}

fn shift_months(date: NaiveDate, n: i32) -> NaiveDate {
    let months = Months::new(n.unsigned_abs());
    let shifted = if n >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Whole days since 1970-01-01. Time-of-day accessors always return 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct GregorianDays;

macro_rules! gregorian_days {
    ($($t:ty),*) => {$(
        impl DatePolicy<$t> for GregorianDays {
            fn to_string(idx: $t, format: &str) -> String {
                let date = date_from_days(idx as i64);
                render(date.format(format), || date.to_string())
            }

            fn to_date(
                year: i32,
                month: u32,
                day: u32,
                _hour: u32,
                _minute: u32,
                _second: u32,
                _millisecond: u32,
            ) -> Option<$t> {
                let date = NaiveDate::from_ymd_opt(year, month, day)?;
                <$t>::try_from(days_from_date(date)).ok()
            }

            fn day_of_week(idx: $t) -> u32 {
                date_from_days(idx as i64).weekday().num_days_from_sunday()
            }

            fn day_of_month(idx: $t) -> u32 {
                date_from_days(idx as i64).day()
            }

            fn month(idx: $t) -> u32 {
                date_from_days(idx as i64).month()
            }

            fn year(idx: $t) -> i32 {
                date_from_days(idx as i64).year()
            }

            fn hour(_idx: $t) -> u32 {
                0
            }

            fn minute(_idx: $t) -> u32 {
                0
            }

            fn second(_idx: $t) -> u32 {
                0
            }

            fn last_day_of_month(idx: $t) -> $t {
                let date = end_of_month(date_from_days(idx as i64));
                <$t>::try_from(days_from_date(date)).unwrap_or(idx)
            }

            fn add_years(idx: $t, n: i32) -> $t {
                <Self as DatePolicy<$t>>::add_months(idx, n.saturating_mul(12))
            }

            fn add_months(idx: $t, n: i32) -> $t {
                let date = shift_months(date_from_days(idx as i64), n);
                <$t>::try_from(days_from_date(date)).unwrap_or(idx)
            }

            fn add_days(idx: $t, n: i32) -> $t {
                idx.saturating_add(n as $t)
            }

            fn daily_distance(x: $t, y: $t) -> f64 {
                x as f64 - y as f64
            }
        }
    )*};
}

gregorian_days!(i32, i64);

/// Seconds since 1970-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixSeconds;

fn datetime_from_seconds(secs: i64) -> NaiveDateTime {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or(if secs < 0 {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX
        })
}

fn seconds_from_datetime(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp()
}

impl DatePolicy<i64> for PosixSeconds {
    fn to_string(idx: i64, format: &str) -> String {
        let dt = datetime_from_seconds(idx);
        render(dt.format(format), || dt.to_string())
    }

    fn to_date(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Option<i64> {
        let dt = NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_milli_opt(hour, minute, second, millisecond)?;
        Some(seconds_from_datetime(dt))
    }

    fn day_of_week(idx: i64) -> u32 {
        datetime_from_seconds(idx).weekday().num_days_from_sunday()
    }

    fn day_of_month(idx: i64) -> u32 {
        datetime_from_seconds(idx).day()
    }

    fn month(idx: i64) -> u32 {
        datetime_from_seconds(idx).month()
    }

    fn year(idx: i64) -> i32 {
        datetime_from_seconds(idx).year()
    }

    fn hour(idx: i64) -> u32 {
        datetime_from_seconds(idx).hour()
    }

    fn minute(idx: i64) -> u32 {
        datetime_from_seconds(idx).minute()
    }

    fn second(idx: i64) -> u32 {
        datetime_from_seconds(idx).second()
    }

    fn last_day_of_month(idx: i64) -> i64 {
        let dt = datetime_from_seconds(idx);
        let last = end_of_month(dt.date()).and_time(dt.time());
        seconds_from_datetime(last)
    }

    fn add_years(idx: i64, n: i32) -> i64 {
        Self::add_months(idx, n.saturating_mul(12))
    }

    fn add_months(idx: i64, n: i32) -> i64 {
        let dt = datetime_from_seconds(idx);
        let shifted = shift_months(dt.date(), n).and_time(dt.time());
        seconds_from_datetime(shifted)
    }

    fn add_days(idx: i64, n: i32) -> i64 {
        idx.saturating_add(n as i64 * SECONDS_PER_DAY)
    }

    fn daily_distance(x: i64, y: i64) -> f64 {
        (x as f64 - y as f64) / SECONDS_PER_DAY as f64
    }
}
