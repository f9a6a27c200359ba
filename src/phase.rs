//! # Phase Predicates
//!
//! Each principal phase has a test telling whether a `(moon angle, illuminated
//! percent)` reading lies past the phase within the current synodic cycle. The phase
//! search bisects on the point where this test flips from `false` to `true`.
//!
//! A plain `angle < threshold` comparison would break where the angle wraps from
//! 360 back to 0, and its discontinuity would sit right on the phase being searched
//! for. Full and quarter moons therefore rotate the angle first, which moves the
//! discontinuity half a cycle away:
//!
//! ```text
//! past_phase = (angle + rotation) % 360 < 180
//! ```
//!
//! The rotations are close to, but not exactly, `360 - target`. They are tuned
//! against published phase tables and must not be rounded.

use crate::angle::normalize_degrees;
use crate::search::PhaseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rotation for full moon. 180 would be the obvious value; this one matches
/// observatory times better across 1800–2100.
pub const FULL_MOON_ROTATION: f64 = 179.95;

/// Rotation for first quarter, placing the flip just past 90°.
pub const FIRST_QUARTER_ROTATION: f64 = 269.95;

/// Rotation for last quarter, placing the flip just past 270°.
pub const LAST_QUARTER_ROTATION: f64 = 89.95;

/// Largest angle, in degrees, still read as new moon.
pub const NEW_MOON_MAX_ANGLE: f64 = 0.01;

/// Largest illuminated percentage still read as new moon.
pub const NEW_MOON_MAX_PERCENT: f64 = 1.0;

const HALF_CIRCLE: f64 = 180.0;

/// The four principal lunar phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseKind {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl PhaseKind {
    /// All phases in the order they occur within a synodic month.
    pub const ALL: [PhaseKind; 4] = [
        PhaseKind::New,
        PhaseKind::FirstQuarter,
        PhaseKind::Full,
        PhaseKind::LastQuarter,
    ];

    /// Whether the reading lies past this phase in the current cycle.
    ///
    /// `angle` need not be normalized. `illuminated_percent` is in `0..=100`.
    pub fn is_before_phase(self, angle: f64, illuminated_percent: f64) -> bool {
        let angle = normalize_degrees(angle);
        match self {
            PhaseKind::New => angle < HALF_CIRCLE && !is_new_moon(angle, illuminated_percent),
            PhaseKind::FirstQuarter => rotated_past(angle, FIRST_QUARTER_ROTATION),
            PhaseKind::Full => rotated_past(angle, FULL_MOON_ROTATION),
            PhaseKind::LastQuarter => rotated_past(angle, LAST_QUARTER_ROTATION),
        }
    }

    /// Short machine-friendly name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            PhaseKind::New => "new",
            PhaseKind::FirstQuarter => "first-quarter",
            PhaseKind::Full => "full",
            PhaseKind::LastQuarter => "last-quarter",
        }
    }
}

/// Below 0.01° the lit share rounds to 0%, so within the waxing half the percent
/// test always passes once the angle test does.
fn is_new_moon(angle: f64, illuminated_percent: f64) -> bool {
    angle < NEW_MOON_MAX_ANGLE && illuminated_percent < NEW_MOON_MAX_PERCENT
}

fn rotated_past(angle: f64, rotation: f64) -> bool {
    (angle + rotation) % 360.0 < HALF_CIRCLE
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PhaseKind::New => "New Moon",
            PhaseKind::FirstQuarter => "First Quarter",
            PhaseKind::Full => "Full Moon",
            PhaseKind::LastQuarter => "Last Quarter",
        };
        f.write_str(label)
    }
}

impl FromStr for PhaseKind {
    type Err = PhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "new" | "new-moon" => Ok(PhaseKind::New),
            "first-quarter" | "first" => Ok(PhaseKind::FirstQuarter),
            "full" | "full-moon" => Ok(PhaseKind::Full),
            "last-quarter" | "last" | "third-quarter" => Ok(PhaseKind::LastQuarter),
            _ => Err(PhaseError::UnknownPhase(s.to_string())),
        }
    }
}
