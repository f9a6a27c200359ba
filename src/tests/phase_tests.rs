//! # Phase Search Scenarios and Properties
//!
//! Known phase times in several UTC offsets, followed by properties that must hold
//! for any anchor: results are in the future, no more than a month away, stable
//! inside a cycle, and spaced by a synodic month when chained.

use crate::search::SEARCH_WINDOW_MILLIS;
use crate::{
    find_next_first_quarter, find_next_full_moon, find_next_last_quarter, find_next_new_moon,
    find_phase_following, illuminated_fraction, moon_angle, Instant, PhaseKind,
};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn at(s: &str) -> Instant {
    DateTime::parse_from_rfc3339(s).unwrap()
}

/// Full and new moon after an anchor in US Central daylight time.
#[test]
fn october_2010_full_and_new_moon() {
    let anchor = at("2010-10-20T00:00:00-05:00");
    assert_eq!(
        find_next_full_moon(anchor).unwrap(),
        at("2010-10-22T21:08:00-05:00")
    );
    assert_eq!(
        find_next_new_moon(anchor).unwrap(),
        at("2010-11-06T00:05:00-05:00")
    );
}

/// The anchor's offset changes the printed time, not the instant found.
#[test]
fn utc_anchor_finds_same_local_day() {
    let found = find_next_full_moon(at("2010-10-20T00:00:00Z")).unwrap();
    assert_eq!(found, at("2010-10-23T02:08:00Z"));

    let central = found.with_timezone(&FixedOffset::west_opt(5 * 3600).unwrap());
    assert_eq!(central.format("%Y-%m-%d").to_string(), "2010-10-22");
}

#[test]
fn june_2011_full_moon() {
    let found = find_next_full_moon(at("2011-06-12T00:00:00-05:00")).unwrap();
    assert_eq!(found, at("2011-06-15T15:19:00-05:00"));

    let angle = moon_angle(found);
    assert!((angle - 180.0).abs() < 0.1, "angle {angle}");
    assert_eq!(illuminated_fraction(found), 1.0);
}

/// Australian anchors, including the December 2015 full moon that falls late in
/// the evening local time.
#[test]
fn australian_full_moons() {
    let cases = [
        ("2015-05-01T00:00:00+10:00", "2015-05-04T13:42:00+10:00"),
        ("2015-11-27T00:00:00+11:00", "2015-12-25T22:11:00+11:00"),
        ("2015-12-27T00:00:00+11:00", "2016-01-24T12:54:00+11:00"),
    ];
    for (anchor, expected) in cases {
        assert_eq!(find_next_full_moon(at(anchor)).unwrap(), at(expected), "{anchor}");
    }
}

/// Anchors minutes either side of a full moon must pick the right one.
#[test]
fn anchors_around_december_2015_full_moon() {
    assert_eq!(
        find_next_full_moon(at("2015-12-25T22:09:00+11:00")).unwrap(),
        at("2015-12-25T22:11:00+11:00")
    );

    for anchor in [
        "2015-12-25T22:11:49+11:00",
        "2015-12-25T22:16:49+11:00",
        "2015-12-25T22:20:02+11:00",
        "2015-12-25T22:26:48+11:00",
        "2015-12-25T23:29:27+11:00",
        "2015-12-26T04:02:14+11:00",
    ] {
        assert_eq!(
            find_next_full_moon(at(anchor)).unwrap(),
            at("2016-01-24T12:54:00+11:00"),
            "{anchor}"
        );
    }
}

/// Anchors within two hours before the January 2016 full moon.
#[test]
fn anchors_just_before_january_2016_full_moon() {
    for anchor in [
        "2016-01-24T11:00:31+11:00",
        "2016-01-24T11:30:31+11:00",
        "2016-01-24T12:00:31+11:00",
    ] {
        assert_eq!(
            find_next_full_moon(at(anchor)).unwrap(),
            at("2016-01-24T12:54:00+11:00"),
            "{anchor}"
        );
    }
}

#[test]
fn december_2015_quarters() {
    let anchor = at("2015-12-01T00:00:00Z");
    assert_eq!(
        find_next_first_quarter(anchor).unwrap(),
        at("2015-12-18T15:15:00Z")
    );
    assert_eq!(
        find_next_last_quarter(anchor).unwrap(),
        at("2015-12-03T08:14:00Z")
    );
}

/// Stepping 30 days at a time through 2011 lands on every full moon of the year.
#[test]
fn full_moons_of_2011_by_monthly_steps() {
    let expected = [
        "2011-01-19", "2011-02-18", "2011-03-19", "2011-04-18", "2011-05-17", "2011-06-15",
        "2011-07-15", "2011-08-13", "2011-09-12", "2011-10-12", "2011-11-10", "2011-12-10",
    ];
    let mut anchor = at("2011-01-01T01:01:00Z");
    for day in expected {
        let found = find_next_full_moon(anchor).unwrap();
        assert_eq!(found.format("%Y-%m-%d").to_string(), day);
        anchor += Duration::days(30);
    }
}

/// Random anchors between late November 2015 and the January 2016 full moon must
/// resolve to one of the two full moons on either side.
#[test]
fn random_anchors_resolve_to_surrounding_full_moon() {
    let december = at("2015-12-25T22:11:00+11:00");
    let january = at("2016-01-24T12:54:00+11:00");
    let start = (december - Duration::days(28)).timestamp_millis();
    let end = january.timestamp_millis();
    let offset = *december.offset();

    let mut rng = StdRng::seed_from_u64(808);
    for _ in 0..20_000 {
        let millis = rng.gen_range(start..end);
        let anchor = Utc
            .timestamp_millis_opt(millis)
            .unwrap()
            .with_timezone(&offset);
        let expected = if anchor > december { january } else { december };
        assert_eq!(find_next_full_moon(anchor).unwrap(), expected, "{anchor}");
    }
}

/// Every result is strictly after its anchor and no further than one window away.
#[test]
fn results_are_in_the_future_and_within_a_month() {
    let window = Duration::milliseconds(SEARCH_WINDOW_MILLIS);
    let mut anchor = at("2015-01-01T00:00:00Z");
    let end = at("2020-01-01T00:00:00Z");
    while anchor < end {
        for kind in PhaseKind::ALL {
            let found = find_phase_following(anchor, kind).unwrap();
            assert!(found > anchor, "{kind} from {anchor}: {found}");
            assert!(found - anchor <= window, "{kind} from {anchor}: {found}");
        }
        anchor += Duration::hours(6);
    }
}

/// Any anchor inside the same cycle gives the same answer.
#[test]
fn anchors_within_one_cycle_agree() {
    let base = at("2016-01-10T00:00:00+11:00");
    for hours in (-24..=24).step_by(3) {
        let anchor = base + Duration::hours(hours);
        assert_eq!(
            find_next_full_moon(anchor).unwrap(),
            at("2016-01-24T12:54:00+11:00"),
            "{anchor}"
        );
    }
}

/// A later anchor never yields an earlier phase.
#[test]
fn later_anchor_never_finds_earlier_phase() {
    for kind in PhaseKind::ALL {
        let mut anchor = at("2019-03-01T00:00:00Z");
        let mut previous = find_phase_following(anchor, kind).unwrap();
        for _ in 0..200 {
            anchor += Duration::hours(5);
            let found = find_phase_following(anchor, kind).unwrap();
            assert!(found >= previous, "{kind}: {found} after {previous}");
            previous = found;
        }
    }
}

/// Chained full moons and new moons are a synodic month apart.
#[test]
fn chained_full_and_new_moons_are_a_synodic_month_apart() {
    for kind in [PhaseKind::Full, PhaseKind::New] {
        let mut found = find_phase_following(at("2000-01-01T00:00:00Z"), kind).unwrap();
        for _ in 0..130 {
            let next = find_phase_following(found + Duration::minutes(1), kind).unwrap();
            let days = (next - found).num_seconds() as f64 / 86_400.0;
            assert!((29.27..=29.83).contains(&days), "{kind} at {found}: {days} days");
            found = next;
        }
    }
}
