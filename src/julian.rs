//! # Julian Dates
//!
//! Continuous day counts used by the position model. Two conversions are provided:
//!
//! - [`julian_date`]: elapsed seconds since JD 0 (−4713‑11‑24 12:00 UTC, proleptic
//!   Gregorian) divided by the length of a day. Exact to the millisecond.
//! - [`julian_date_classical`]: the step-wise calendar method from section 3 of
//!   "Practical Astronomy with Your Calculator", simplified to Gregorian dates only.
//!
//! The calendar method uses 365.243 days per year with no century correction, so
//! it slips by a whole day in some years between 1800 and 2100. The position model
//! only ever sees [`days_since_epoch`], which is built on the elapsed method.

use crate::Instant;
use chrono::{Datelike, Timelike, Utc};

/// Julian date of the Unix epoch, 1970-01-01T00:00:00Z.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian date of 1990 January 0.0 (i.e. 1989-12-31T00:00:00Z).
pub const EPOCH_1990: f64 = 2_447_891.5;

/// 1990 January 0.0 as milliseconds since the Unix epoch.
const EPOCH_1990_UNIX_MILLIS: i64 = 7_304 * 86_400_000;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Julian date for `instant`, computed from elapsed time.
pub fn julian_date(instant: Instant) -> f64 {
    instant.timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JD
}

/// Julian date for `instant` using the calendar method.
///
/// Only whole seconds are taken into account. Dates before the Gregorian reform
/// are treated as proleptic Gregorian.
pub fn julian_date_classical(instant: Instant) -> f64 {
    let utc = instant.with_timezone(&Utc);

    // step 1
    let mut year = utc.year();
    let mut month = utc.month() as i32;
    let day = utc.day() as f64;
    let hour = utc.hour() as f64 / 24.0;
    let minute = utc.minute() as f64 / 24.0 / 60.0;
    let second = utc.second() as f64 / 24.0 / 60.0 / 60.0;

    // step 2: January and February count as months 13 and 14 of the previous year
    if month <= 2 {
        year -= 1;
        month += 12;
    }

    // step 6
    1_720_995.5
        + (365.243 * year as f64).floor()
        + (30.6 * (month + 1) as f64).floor()
        + day
        + hour
        + minute
        + second
}

/// Days elapsed since 1990 January 0.0, as a real number.
///
/// Equal to `julian_date(instant) - EPOCH_1990`, but subtracted in integer
/// milliseconds so sub-second steps survive.
pub fn days_since_epoch(instant: Instant) -> f64 {
    (instant.timestamp_millis() - EPOCH_1990_UNIX_MILLIS) as f64 / MILLIS_PER_DAY
}
