//! # Phase Calendar
//!
//! Sequences of phase events built by chaining single searches. Each kind of phase
//! is followed on its own; the streams are then merged in time order.

use crate::phase::PhaseKind;
use crate::search::{find_phase_following, PhaseError};
use crate::Instant;
use chrono::{Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A crossing found from its own instant can round back to that same minute, so
/// the next search of a kind starts this far past the previous event.
const CHAIN_STEP_MINUTES: i64 = 1;

/// A principal phase and the minute it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub kind: PhaseKind,
    pub at: Instant,
}

impl PhaseEvent {
    /// The first `kind` event strictly after `anchor`.
    pub fn next_after(anchor: Instant, kind: PhaseKind) -> Result<Self, PhaseError> {
        let at = find_phase_following(anchor, kind)?;
        Ok(PhaseEvent { kind, at })
    }

    /// The event of the same kind one cycle later.
    pub fn following(&self) -> Result<Self, PhaseError> {
        Self::next_after(self.at + Duration::minutes(CHAIN_STEP_MINUTES), self.kind)
    }

    /// The same event expressed in another UTC offset.
    pub fn with_offset(&self, offset: FixedOffset) -> Self {
        PhaseEvent {
            kind: self.kind,
            at: self.at.with_timezone(&offset),
        }
    }
}

impl fmt::Display for PhaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.at.format("%Y-%m-%d %H:%M %:z"))
    }
}

/// The next `count` phase events of any kind after `anchor`, oldest first.
///
/// # Example
/// ```
/// use chrono::DateTime;
/// use moon_phase_lib::{upcoming_phases, PhaseKind};
///
/// let anchor = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
/// let events = upcoming_phases(anchor, 4).unwrap();
/// assert_eq!(events[0].kind, PhaseKind::LastQuarter);
/// assert_eq!(events[3].kind, PhaseKind::Full);
/// ```
pub fn upcoming_phases(anchor: Instant, count: usize) -> Result<Vec<PhaseEvent>, PhaseError> {
    upcoming_phases_of(anchor, &PhaseKind::ALL, count)
}

/// The next `count` events of the given kinds after `anchor`, oldest first.
pub fn upcoming_phases_of(
    anchor: Instant,
    kinds: &[PhaseKind],
    count: usize,
) -> Result<Vec<PhaseEvent>, PhaseError> {
    let mut events = Vec::new();
    if count == 0 {
        return Ok(events);
    }

    let mut pending = distinct(kinds)
        .into_iter()
        .map(|kind| PhaseEvent::next_after(anchor, kind))
        .collect::<Result<Vec<_>, _>>()?;

    while events.len() < count {
        let Some(slot) = earliest(&pending) else {
            break;
        };
        let event = pending[slot];
        events.push(event);
        if events.len() < count {
            pending[slot] = event.following()?;
        }
    }

    Ok(events)
}

/// Every event of the given kinds in `(start, end]`, oldest first.
///
/// Kinds listed twice are only searched once. An empty range or an empty `kinds`
/// slice gives an empty calendar.
pub fn phases_between(
    start: Instant,
    end: Instant,
    kinds: &[PhaseKind],
) -> Result<Vec<PhaseEvent>, PhaseError> {
    let mut events = Vec::new();
    if end <= start {
        return Ok(events);
    }

    for kind in distinct(kinds) {
        let mut event = PhaseEvent::next_after(start, kind)?;
        while event.at <= end {
            events.push(event);
            event = event.following()?;
        }
    }

    events.sort_by_key(|event| event.at);
    Ok(events)
}

fn distinct(kinds: &[PhaseKind]) -> Vec<PhaseKind> {
    let mut kinds = kinds.to_vec();
    kinds.sort();
    kinds.dedup();
    kinds
}

fn earliest(pending: &[PhaseEvent]) -> Option<usize> {
    pending
        .iter()
        .enumerate()
        .min_by_key(|(_, event)| event.at)
        .map(|(slot, _)| slot)
}
