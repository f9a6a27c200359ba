//! # Sun Position
//!
//! Geocentric ecliptic longitude and mean anomaly of the Sun from section 46 of
//! "Practical Astronomy with Your Calculator". One mean-motion term plus a single
//! equation-of-centre correction; good to about three decimal places of a degree
//! around the 1990 epoch.

use crate::angle::sin_degrees;
use crate::julian::days_since_epoch;
use crate::Instant;
use std::f64::consts::PI;

/// Ecliptic longitude at 1990 January 0.0 (ε g).
const ECLIPTIC_LONGITUDE_AT_EPOCH: f64 = 279.403303;

/// Ecliptic longitude of perigee (ϖ g).
const ECLIPTIC_LONGITUDE_OF_PERIGEE: f64 = 282.768422;

/// Eccentricity of the Earth–Sun orbit (e).
const ECCENTRICITY_OF_ORBIT: f64 = 0.016713;

/// Length of the tropical year in days.
const TROPICAL_YEAR_DAYS: f64 = 365.242191;

/// The Sun's position at a single instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    ecliptic_longitude: f64,
    mean_anomaly: f64,
}

impl SunPosition {
    /// Compute the Sun's position at `instant`.
    pub fn at(instant: Instant) -> Self {
        Self::from_days_since_epoch(days_since_epoch(instant))
    }

    pub(crate) fn from_days_since_epoch(days: f64) -> Self {
        // N: mean motion since epoch, kept within 0..360
        let mut n = (360.0 / TROPICAL_YEAR_DAYS * days) % 360.0;
        if n < 0.0 {
            n += 360.0;
        }

        let mean_anomaly = compute_mean_anomaly(n);
        let ecliptic_longitude = compute_ecliptic_longitude(n, mean_anomaly);

        SunPosition {
            ecliptic_longitude,
            mean_anomaly,
        }
    }

    /// Geocentric ecliptic longitude λ, in degrees.
    pub fn ecliptic_longitude(&self) -> f64 {
        self.ecliptic_longitude
    }

    /// Mean anomaly M, in degrees.
    pub fn mean_anomaly(&self) -> f64 {
        self.mean_anomaly
    }
}

fn compute_mean_anomaly(n: f64) -> f64 {
    let m = n + ECLIPTIC_LONGITUDE_AT_EPOCH - ECLIPTIC_LONGITUDE_OF_PERIGEE;
    if m < 0.0 {
        m + 360.0
    } else {
        m
    }
}

fn compute_ecliptic_longitude(n: f64, mean_anomaly: f64) -> f64 {
    // E c
    let equation_of_centre = (360.0 / PI) * ECCENTRICITY_OF_ORBIT * sin_degrees(mean_anomaly);
    let longitude = n + equation_of_centre + ECLIPTIC_LONGITUDE_AT_EPOCH;
    if longitude > 360.0 {
        longitude - 360.0
    } else {
        longitude
    }
}
