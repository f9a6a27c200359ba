//! # Moon Phase Core Library
//!
//! This library computes the angle between the Moon and the Sun along the ecliptic,
//! the fraction of the Moon's disc that is lit, and the next instant at which the
//! Moon reaches one of the four principal phases.
//!
//! ## Design Philosophy
//!
//! ### Low-Precision Ephemeris
//! Positions come from the closed-form formulas in "Practical Astronomy with Your
//! Calculator" (Duffett-Smith, 3rd ed.), referenced to 1990 January 0.0:
//! - **Sun**: one mean-motion term plus an equation-of-centre correction
//! - **Moon**: mean longitude plus evection, equation of centre, annual equation,
//!   a fourth periodic term and the variation
//! - **Accuracy**: tens of minutes for phase times between roughly 1800 and 2100
//!
//! ### Phase Search
//! The phase of interest is located by bisecting a fixed window slightly longer
//! than a synodic month, rounding to the minute, and triangulating from anchors a
//! day either side of the input so that the answer is always strictly in the future.
//!
//! ### Time Representation
//! Every public function takes an [`Instant`], a `chrono` timestamp carrying a fixed
//! UTC offset. Results are returned in the same offset as the input.
//!
//! ## Core Types
//! - [`PhaseKind`]: new, first quarter, full or last quarter
//! - [`PhaseEvent`]: a phase together with the instant it occurs
//! - [`PhaseError`]: the search failed its internal consistency check
//!
//! # Example
//! ```
//! use chrono::DateTime;
//! use moon_phase_lib::find_next_full_moon;
//!
//! let anchor = DateTime::parse_from_rfc3339("2011-06-12T00:00:00-05:00").unwrap();
//! let full = find_next_full_moon(anchor).unwrap();
//! assert_eq!(full.format("%Y-%m-%d").to_string(), "2011-06-15");
//! ```

use chrono::{DateTime, FixedOffset};

// Module declarations
pub mod angle;
pub mod calendar;
pub mod config;
pub mod julian;
pub mod moon;
pub mod phase;
pub mod renderer;
pub mod search;
pub mod sun;

#[cfg(test)]
mod tests;

/// An absolute point in time with a fixed offset from UTC.
///
/// All arithmetic in the crate stays in this representation, so a search started
/// from a `+11:00` timestamp also answers in `+11:00`.
pub type Instant = DateTime<FixedOffset>;

pub use angle::{illuminated_fraction, moon_angle};
pub use calendar::{phases_between, upcoming_phases, upcoming_phases_of, PhaseEvent};
pub use phase::PhaseKind;
pub use search::{
    find_next_first_quarter, find_next_full_moon, find_next_last_quarter, find_next_new_moon,
    find_phase_following, PhaseError,
};
