//! # Moon Position
//!
//! True orbital longitude of the Moon, section 65 of "Practical Astronomy with Your
//! Calculator". The mean longitude is refined by a chain of periodic corrections
//! which must be applied in order:
//!
//! 1. **Evection** (E v), from the mean longitude, the Sun's longitude and the mean anomaly
//! 2. **Annual equation** (A e) and a third term (A 3), both from the Sun's mean anomaly
//! 3. **Corrected anomaly** (M′ m), from the mean anomaly and the three terms above
//! 4. **Equation of centre** (E c) and a fourth term (A 4), from the corrected anomaly
//! 5. **Variation** (V), from the corrected longitude, subtracted last
//!
//! Accuracy is a few hundredths of a degree near the epoch, which is what limits
//! phase times to tens of minutes.

use crate::angle::{normalize_degrees, sin_degrees};
use crate::julian::days_since_epoch;
use crate::sun::SunPosition;
use crate::Instant;

/// Mean longitude at 1990 January 0.0 (l 0).
const MEAN_LONGITUDE_AT_EPOCH: f64 = 318.351648;

/// Mean longitude of perigee at 1990 January 0.0 (P 0).
const MEAN_LONGITUDE_OF_PERIGEE_AT_EPOCH: f64 = 36.340410;

/// Daily motion of the mean longitude, degrees per day.
const MEAN_LONGITUDE_RATE: f64 = 13.1763966;

/// Daily motion of the perigee, degrees per day.
const PERIGEE_RATE: f64 = 0.1114041;

/// The Moon's position at a single instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPosition {
    corrections: MoonCorrections,
    true_longitude: f64,
    sun: SunPosition,
}

impl MoonPosition {
    /// Compute the Moon's position at `instant`.
    pub fn at(instant: Instant) -> Self {
        let days = days_since_epoch(instant);
        Self::from_days_since_epoch(days, SunPosition::from_days_since_epoch(days))
    }

    pub(crate) fn from_days_since_epoch(days: f64, sun: SunPosition) -> Self {
        // l
        let mean_longitude = normalize_degrees(MEAN_LONGITUDE_RATE * days + MEAN_LONGITUDE_AT_EPOCH);
        // M m
        let mean_anomaly = normalize_degrees(
            mean_longitude - PERIGEE_RATE * days - MEAN_LONGITUDE_OF_PERIGEE_AT_EPOCH,
        );

        let corrections = MoonCorrections::new(
            mean_longitude,
            mean_anomaly,
            sun.ecliptic_longitude(),
            sun.mean_anomaly(),
        );
        let true_longitude = corrections.corrected_longitude - corrections.variation;

        MoonPosition {
            corrections,
            true_longitude,
            sun,
        }
    }

    /// True orbital longitude l″, in degrees. Not normalized: it may fall slightly
    /// outside 0..360 after the corrections are applied.
    pub fn true_longitude(&self) -> f64 {
        self.true_longitude
    }

    /// The intermediate correction terms behind [`Self::true_longitude`].
    pub fn corrections(&self) -> &MoonCorrections {
        &self.corrections
    }

    /// The Sun's position used for the corrections.
    pub fn sun(&self) -> &SunPosition {
        &self.sun
    }
}

/// Periodic correction terms, all in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonCorrections {
    /// l
    pub mean_longitude: f64,
    /// M m
    pub mean_anomaly: f64,
    /// E v
    pub evection: f64,
    /// A e
    pub annual_equation: f64,
    /// A 3
    pub third_correction: f64,
    /// M′ m
    pub corrected_anomaly: f64,
    /// E c
    pub equation_of_centre: f64,
    /// A 4
    pub fourth_correction: f64,
    /// l′
    pub corrected_longitude: f64,
    /// V
    pub variation: f64,
}

impl MoonCorrections {
    fn new(mean_longitude: f64, mean_anomaly: f64, sun_longitude: f64, sun_mean_anomaly: f64) -> Self {
        let evection = 1.2739 * sin_degrees(2.0 * (mean_longitude - sun_longitude) - mean_anomaly);
        let annual_equation = 0.1858 * sin_degrees(sun_mean_anomaly);
        let third_correction = 0.37 * sin_degrees(sun_mean_anomaly);

        let corrected_anomaly = mean_anomaly + evection - annual_equation - third_correction;

        let equation_of_centre = 6.2886 * sin_degrees(corrected_anomaly);
        let fourth_correction = 0.214 * sin_degrees(2.0 * corrected_anomaly);

        let corrected_longitude =
            mean_longitude + evection + equation_of_centre - annual_equation + fourth_correction;

        let variation = 0.6583 * sin_degrees(2.0 * (corrected_longitude - sun_longitude));

        MoonCorrections {
            mean_longitude,
            mean_anomaly,
            evection,
            annual_equation,
            third_correction,
            corrected_anomaly,
            equation_of_centre,
            fourth_correction,
            corrected_longitude,
            variation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_true_longitude_book_example() {
        let instant = DateTime::parse_from_rfc3339("1979-02-26T16:00:50Z").unwrap();
        let moon = MoonPosition::at(instant);

        // Worked example gives 336.967472; this model lands within 0.025
        assert!(
            (moon.true_longitude() - 336.967472).abs() < 0.025,
            "got {}",
            moon.true_longitude()
        );
    }

    #[test]
    fn test_corrected_anomaly_depends_on_earlier_terms() {
        let instant = DateTime::parse_from_rfc3339("2015-12-25T11:11:00Z").unwrap();
        let c = *MoonPosition::at(instant).corrections();

        let expected = c.mean_anomaly + c.evection - c.annual_equation - c.third_correction;
        assert_eq!(c.corrected_anomaly, expected);

        let expected_longitude = c.mean_longitude + c.evection + c.equation_of_centre
            - c.annual_equation
            + c.fourth_correction;
        assert_eq!(c.corrected_longitude, expected_longitude);
    }

    #[test]
    fn test_correction_amplitudes_are_bounded() {
        let mut days = -30_000.0;
        while days < 40_000.0 {
            let sun = SunPosition::from_days_since_epoch(days);
            let c = *MoonPosition::from_days_since_epoch(days, sun).corrections();
            assert!(c.evection.abs() <= 1.2739);
            assert!(c.equation_of_centre.abs() <= 6.2886);
            assert!(c.annual_equation.abs() <= 0.1858);
            assert!(c.fourth_correction.abs() <= 0.214);
            assert!(c.variation.abs() <= 0.6583);
            assert!((0.0..360.0).contains(&c.mean_longitude));
            assert!((0.0..360.0).contains(&c.mean_anomaly));
            days += 77.77;
        }
    }

    #[test]
    fn test_moon_moves_about_thirteen_degrees_per_day() {
        let sun_a = SunPosition::from_days_since_epoch(500.0);
        let sun_b = SunPosition::from_days_since_epoch(500.25);
        let a = MoonPosition::from_days_since_epoch(500.0, sun_a);
        let b = MoonPosition::from_days_since_epoch(500.25, sun_b);
        let step = normalize_degrees(b.true_longitude() - a.true_longitude()) * 4.0;
        assert!((10.0..16.0).contains(&step), "daily motion {step}");
    }
}
