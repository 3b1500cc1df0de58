//! Partition functions mapping index values to coarser period keys.
//!
//! A key is the index value at the start of the period containing the input,
//! so keys never decrease along an ascending index. `n` groups `n`
//! consecutive periods into one bucket; `n == 0` is treated as 1.

use crate::date_policy::DatePolicy;
use std::marker::PhantomData;

/// Maps an index value to the key of its output period.
pub trait PartitionFunction<I> {
    fn key(&self, idx: I, n: u32) -> I;
}

impl<I, F> PartitionFunction<I> for F
where
    F: Fn(I, u32) -> I,
{
    fn key(&self, idx: I, n: u32) -> I {
        self(idx, n)
    }
}

macro_rules! partition_type {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<P> {
            _policy: PhantomData<P>,
        }

        impl<P> $name<P> {
            pub fn new() -> Self {
                $name { _policy: PhantomData }
            }
        }

        impl<P> Default for $name<P> {
            fn default() -> Self {
                Self::new()
            }
        }
    )*};
}

partition_type! {
    /// Calendar years, bucketed `n` at a time from year 0.
    Yearly,
    /// Calendar quarters, bucketed `n` at a time.
    Quarterly,
    /// Calendar months, bucketed `n` at a time.
    Monthly,
    /// Sunday-anchored weeks, bucketed `n` at a time from 1970-01-04.
    Weekly,
    /// Calendar days, bucketed `n` at a time from 1970-01-01.
    Daily,
    /// Hours of the day, bucketed `n` at a time within each day.
    Hourly,
    /// Minutes of the hour, bucketed `n` at a time within each hour.
    Minutely,
}

fn span(n: u32) -> i64 {
    n.max(1) as i64
}

/// Start of the `months`-month bucket holding `idx`, counted from year 0.
fn month_bucket<I: Copy, P: DatePolicy<I>>(idx: I, months: i64) -> I {
    let total = P::year(idx) as i64 * 12 + (P::month(idx) as i64 - 1);
    let bucket = total - total.rem_euclid(months);
    let year = bucket.div_euclid(12) as i32;
    let month = bucket.rem_euclid(12) as u32 + 1;
    P::to_date(year, month, 1, 0, 0, 0, 0).unwrap_or(idx)
}

fn day_start<I: Copy, P: DatePolicy<I>>(idx: I) -> I {
    P::to_date(P::year(idx), P::month(idx), P::day_of_month(idx), 0, 0, 0, 0).unwrap_or(idx)
}

fn day_bucket<I: Copy, P: DatePolicy<I>>(day: I, anchor: Option<I>, days: i64) -> i32 {
    let offset = match anchor {
        Some(anchor) => P::daily_distance(day, anchor).floor() as i64,
        None => 0,
    };
    offset.rem_euclid(days) as i32
}

impl<I: Copy, P: DatePolicy<I>> PartitionFunction<I> for Yearly<P> {
    fn key(&self, idx: I, n: u32) -> I {
        month_bucket::<I, P>(idx, 12 * span(n))
    }
}

impl<I: Copy, P: DatePolicy<I>> PartitionFunction<I> for Quarterly<P> {
    fn key(&self, idx: I, n: u32) -> I {
        month_bucket::<I, P>(idx, 3 * span(n))
    }
}

impl<I: Copy, P: DatePolicy<I>> PartitionFunction<I> for Monthly<P> {
    fn key(&self, idx: I, n: u32) -> I {
        month_bucket::<I, P>(idx, span(n))
    }
}

impl<I: Copy, P: DatePolicy<I>> PartitionFunction<I> for Weekly<P> {
    fn key(&self, idx: I, n: u32) -> I {
        let day = day_start::<I, P>(idx);
        let sunday = P::add_days(day, -(P::day_of_week(day) as i32));
        let anchor = P::to_date(1970, 1, 4, 0, 0, 0, 0);
        let weeks_back = match anchor {
            Some(anchor) => {
                let weeks = (P::daily_distance(sunday, anchor) / 7.0).floor() as i64;
                weeks.rem_euclid(span(n)) as i32
            }
            None => 0,
        };
        P::add_days(sunday, -7 * weeks_back)
    }
}

impl<I: Copy, P: DatePolicy<I>> PartitionFunction<I> for Daily<P> {
    fn key(&self, idx: I, n: u32) -> I {
        let day = day_start::<I, P>(idx);
        let anchor = P::to_date(1970, 1, 1, 0, 0, 0, 0);
        P::add_days(day, -day_bucket::<I, P>(day, anchor, span(n)))
    }
}

impl<I: Copy, P: DatePolicy<I>> PartitionFunction<I> for Hourly<P> {
    fn key(&self, idx: I, n: u32) -> I {
        let hour = P::hour(idx);
        let bucket = hour - hour % n.max(1);
        P::to_date(P::year(idx), P::month(idx), P::day_of_month(idx), bucket, 0, 0, 0)
            .unwrap_or(idx)
    }
}

impl<I: Copy, P: DatePolicy<I>> PartitionFunction<I> for Minutely<P> {
    fn key(&self, idx: I, n: u32) -> I {
        let minute = P::minute(idx);
        let bucket = minute - minute % n.max(1);
        P::to_date(
            P::year(idx),
            P::month(idx),
            P::day_of_month(idx),
            P::hour(idx),
            bucket,
            0,
            0,
        )
        .unwrap_or(idx)
    }
}
