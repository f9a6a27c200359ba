//! # Moon Angle and Illumination
//!
//! The moon angle is the Moon's true longitude minus the Sun's ecliptic longitude,
//! kept within `[0, 360)`:
//!
//! - **0 / 360**: new moon
//! - **90**: first quarter
//! - **180**: full moon
//! - **270**: last quarter
//!
//! The illuminated fraction is derived from the angle with a plain cosine and then
//! rounded to three decimals. The rounding is deliberate: it flattens the plateau
//! around full moon the same way on every evaluation, which keeps the phase search
//! comparisons stable.

use crate::moon::MoonPosition;
use crate::Instant;

/// Number of decimals kept by [`illuminated_fraction`].
pub const ILLUMINATION_PRECISION: i32 = 3;

/// Bring any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees - (degrees / 360.0).floor() * 360.0;
    // floor() can leave exactly 360.0 behind for tiny negative inputs
    if normalized >= 360.0 {
        normalized - 360.0
    } else {
        normalized
    }
}

pub fn sin_degrees(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

pub fn cos_degrees(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

/// Round `value` to `digits` decimal places, halves away from zero.
pub fn round_to_precision(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// Angle between the Moon and the Sun along the ecliptic, in `[0, 360)` degrees.
pub fn moon_angle(instant: Instant) -> f64 {
    let moon = MoonPosition::at(instant);
    angle_between(moon.true_longitude(), moon.sun().ecliptic_longitude())
}

/// Fraction of the Moon's disc that is lit, in `[0, 1]`, to three decimals.
///
/// A low-precision proxy: `0.5 * (1 - cos(angle))`, not a terminator calculation.
pub fn illuminated_fraction(instant: Instant) -> f64 {
    illumination_for_angle(moon_angle(instant))
}

/// Moon angle and illuminated fraction from a single position evaluation.
pub(crate) fn angle_and_illumination(instant: Instant) -> (f64, f64) {
    let angle = moon_angle(instant);
    (angle, illumination_for_angle(angle))
}

pub(crate) fn illumination_for_angle(angle: f64) -> f64 {
    round_to_precision(0.5 * (1.0 - cos_degrees(angle)), ILLUMINATION_PRECISION)
}

fn angle_between(moon_longitude: f64, sun_longitude: f64) -> f64 {
    let age = moon_longitude - sun_longitude;
    let age = if age < 0.0 { 360.0 + age } else { age };
    // the uncorrected difference can leave 0..360 by a fraction of a degree
    normalize_degrees(age)
}
