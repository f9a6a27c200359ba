//! # Phase Search Engine
//!
//! Finds the next instant at which the Moon reaches a given phase.
//!
//! ## Algorithm
//!
//! 1. **Bracket**: a window of [`SEARCH_WINDOW_MILLIS`] after the anchor, a little
//!    longer than the longest synodic month.
//! 2. **Bisect**: evaluate the phase predicate at the middle of the window and keep
//!    the half in which it flips, until the window is no wider than
//!    [`BISECTION_TOLERANCE_MILLIS`].
//! 3. **Round**: to the nearest minute (30 seconds rounds up). The ephemeris cannot
//!    support finer claims.
//! 4. **Triangulate**: repeat from anchors one day before and one day after, sort the
//!    three answers and keep the earliest strictly after the anchor.
//!
//! A single bisection started right at a phase boundary can land on or just before
//! its own anchor once the 500 ms tolerance and the minute rounding compound. Step 4
//! recovers the next crossing deterministically. If none of the three answers is in
//! the future the tuned constants are wrong, and [`PhaseError::NoCrossing`] is
//! returned rather than guessed around.
//!
//! Two checks guard the bisection itself, since the predicate is only `true` for
//! half a cycle and the window is not a monotonic bracket:
//!
//! - a bisection that never moved one of its edges saw only one predicate value and
//!   bracketed no flip, so its answer is dropped before triangulation;
//! - when the chosen answer is more than [`SHORTEST_CYCLE_MILLIS`] away, the first
//!   probe of every window can have overshot a short half-cycle and skipped a
//!   crossing just after the anchor. The stretch before the answer is bisected
//!   again, and a crossing found there wins.
//!
//! ## Cost
//! 23 predicate evaluations per anchor, 69 per call, plus at most 25 for the
//! skipped-crossing check. No state is shared between
//! calls, so the functions can be used from any number of threads.

use crate::angle::angle_and_illumination;
use crate::phase::PhaseKind;
use crate::Instant;
use chrono::{Duration, Timelike};
use thiserror::Error;
use tracing::{debug, error};

/// Width of the bisection window: 31 days 5 hours 49 minutes.
///
/// Longer than any synodic month, short enough not to reach the following
/// crossing. Found by trial against reference tables; it minimises boundary
/// rounding errors and must not be rounded to a whole number of days.
pub const SEARCH_WINDOW_MILLIS: i64 =
    31 * 24 * 60 * 60 * 1000 + 5 * 60 * 60 * 1000 + 49 * 60 * 1000;

/// Bisection stops once the window is this narrow.
pub const BISECTION_TOLERANCE_MILLIS: i64 = 500;

/// Distance of the extra anchors used to triangulate the answer.
const TRIANGULATION_DAYS: i64 = 1;

/// Lower bound on the spacing of two crossings of the same phase. The model's
/// shortest quarter-to-quarter month is about 29.18 days.
pub const SHORTEST_CYCLE_MILLIS: i64 = 29 * 24 * 60 * 60 * 1000;

/// Errors raised by the phase search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseError {
    /// None of the triangulated answers was after the anchor. This is a defect in
    /// the search constants, not in the caller's input.
    #[error("no {phase} found after {anchor}: search window constants are inconsistent")]
    NoCrossing { phase: PhaseKind, anchor: Instant },

    /// The anchor is too close to the limits of the supported date range to fit a
    /// search window.
    #[error("anchor {0} is outside the searchable date range")]
    OutOfRange(Instant),

    /// A phase name that is not one of the four principal phases.
    #[error("unknown phase: {0:?}")]
    UnknownPhase(String),
}

/// A bisection bracket, as millisecond offsets from an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub start: i64,
    pub end: i64,
}

impl SearchWindow {
    /// The full `[0, SEARCH_WINDOW_MILLIS]` bracket.
    pub const fn full() -> Self {
        Self::within(SEARCH_WINDOW_MILLIS)
    }

    /// A bracket over the first `width` milliseconds after the anchor.
    pub const fn within(width: i64) -> Self {
        SearchWindow {
            start: 0,
            end: width,
        }
    }

    pub fn is_converged(&self) -> bool {
        self.end - self.start <= BISECTION_TOLERANCE_MILLIS
    }

    pub fn middle(&self) -> i64 {
        self.start + (self.end - self.start) / 2
    }

    /// Keep the half in which the predicate flips: `[start, middle]` if the phase
    /// already lies before `middle`, otherwise `[middle, end]`.
    pub fn narrow(&mut self, middle: i64, phase_is_before: bool) {
        if phase_is_before {
            self.end = middle;
        } else {
            self.start = middle;
        }
    }

    /// Whether bisection moved both edges away from `initial`. Otherwise every
    /// probe returned the same predicate value and no flip was bracketed.
    pub fn brackets_flip(&self, initial: &SearchWindow) -> bool {
        self.start != initial.start && self.end != initial.end
    }
}

/// Next full moon strictly after `anchor`.
pub fn find_next_full_moon(anchor: Instant) -> Result<Instant, PhaseError> {
    find_phase_following(anchor, PhaseKind::Full)
}

/// Next new moon strictly after `anchor`.
pub fn find_next_new_moon(anchor: Instant) -> Result<Instant, PhaseError> {
    find_phase_following(anchor, PhaseKind::New)
}

/// Next first quarter strictly after `anchor`.
pub fn find_next_first_quarter(anchor: Instant) -> Result<Instant, PhaseError> {
    find_phase_following(anchor, PhaseKind::FirstQuarter)
}

/// Next last quarter strictly after `anchor`.
pub fn find_next_last_quarter(anchor: Instant) -> Result<Instant, PhaseError> {
    find_phase_following(anchor, PhaseKind::LastQuarter)
}

/// Next occurrence of `phase` strictly after `anchor`, to the minute.
///
/// The result carries the same UTC offset as `anchor`.
///
/// # Errors
/// - [`PhaseError::OutOfRange`] if the search window does not fit in `chrono`'s
///   representable range around `anchor`.
/// - [`PhaseError::NoCrossing`] if triangulation finds no future crossing.
///
/// # Example
/// ```
/// use chrono::DateTime;
/// use moon_phase_lib::{find_phase_following, PhaseKind};
///
/// let anchor = DateTime::parse_from_rfc3339("2015-12-27T00:00:00+11:00").unwrap();
/// let full = find_phase_following(anchor, PhaseKind::Full).unwrap();
/// assert_eq!(full.to_rfc3339(), "2016-01-24T12:54:00+11:00");
/// ```
pub fn find_phase_following(anchor: Instant, phase: PhaseKind) -> Result<Instant, PhaseError> {
    let day = Duration::days(TRIANGULATION_DAYS);
    let before = anchor
        .checked_sub_signed(day)
        .ok_or(PhaseError::OutOfRange(anchor))?;
    let after = anchor
        .checked_add_signed(day)
        .ok_or(PhaseError::OutOfRange(anchor))?;
    // last instant the bisection from `after` may touch, plus rounding slack
    after
        .checked_add_signed(Duration::milliseconds(SEARCH_WINDOW_MILLIS) + Duration::minutes(1))
        .ok_or(PhaseError::OutOfRange(anchor))?;

    let mut candidates: Vec<Instant> = [before, anchor, after]
        .into_iter()
        .filter_map(|from| find_rounded_crossing(from, phase))
        .collect();
    candidates.sort();

    let Some(found) = candidates.iter().copied().find(|candidate| *candidate > anchor) else {
        error!(%phase, %anchor, ?candidates, "no candidate after anchor");
        return Err(PhaseError::NoCrossing { phase, anchor });
    };

    if let Some(skipped) = find_skipped_crossing(anchor, found, phase) {
        debug!(%phase, %anchor, %found, %skipped, "recovered skipped crossing");
        return Ok(skipped);
    }

    debug!(%phase, %anchor, %found, ?candidates, "phase found");
    Ok(found)
}

/// One bisection of the full window from `anchor`, rounded to the minute.
/// `None` when the window held no flip.
fn find_rounded_crossing(anchor: Instant, phase: PhaseKind) -> Option<Instant> {
    let initial = SearchWindow::full();
    let (middle, window) = bisect(anchor, phase, initial);
    window
        .brackets_flip(&initial)
        .then(|| round_to_minute(middle))
}

/// Look for a crossing between `anchor` and one short cycle before `found`.
///
/// Any crossing there must be the only one, so the stretch is a proper bracket
/// when the predicate is `false` at its start and `true` at its end.
fn find_skipped_crossing(anchor: Instant, found: Instant, phase: PhaseKind) -> Option<Instant> {
    let gap = (found - anchor).num_milliseconds() - SHORTEST_CYCLE_MILLIS;
    if gap <= 0 {
        return None;
    }

    let gap_end = anchor + Duration::milliseconds(gap);
    if is_before_phase_at(anchor, phase) || !is_before_phase_at(gap_end, phase) {
        return None;
    }

    let (middle, _) = bisect(anchor, phase, SearchWindow::within(gap));
    let rounded = round_to_minute(middle);
    (rounded > anchor).then_some(rounded)
}

fn is_before_phase_at(instant: Instant, phase: PhaseKind) -> bool {
    let (angle, fraction) = angle_and_illumination(instant);
    phase.is_before_phase(angle, 100.0 * fraction)
}

/// Bisect `window` after `anchor` for the flip of `phase`'s predicate.
///
/// Returns the last instant evaluated and the final bracket. The window must fit
/// in range; callers check this up front.
fn bisect(anchor: Instant, phase: PhaseKind, mut window: SearchWindow) -> (Instant, SearchWindow) {
    let mut middle_instant = anchor;

    while !window.is_converged() {
        let middle = window.middle();
        middle_instant = anchor + Duration::milliseconds(middle);
        window.narrow(middle, is_before_phase_at(middle_instant, phase));
    }

    (middle_instant, window)
}

/// Round to the nearest whole minute; 30 seconds and over rounds up.
pub(crate) fn round_to_minute(instant: Instant) -> Instant {
    let seconds = instant.second() as i64;
    let change = if seconds < 30 { -seconds } else { 60 - seconds };
    instant + Duration::seconds(change) - Duration::nanoseconds(instant.nanosecond() as i64)
}
