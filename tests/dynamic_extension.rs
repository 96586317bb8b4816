//! Queries far past the concrete rule data, answered by materializing
//! the recurring tail for the year in question.

extern crate zoneinfo_periods;

mod common;

use common::civil;
use zoneinfo_periods::WallTimes;
use zoneinfo_periods::Month::*;


#[test]
fn paris_still_observes_summer_time_in_2500() {
    let index = common::index();

    let summer = civil(2500, July, 1, 12, 0, 0).unix_seconds();
    let period = index.period_for_utc_instant("Europe/Paris", summer).unwrap();
    assert_eq!(period.utc_offset, 3600);
    assert_eq!(period.std_offset, 3600);
    assert_eq!(period.zone_abbr, "CEST");

    let winter = civil(2500, January, 15, 12, 0, 0).unix_seconds();
    let period = index.period_for_utc_instant("Europe/Paris", winter).unwrap();
    assert_eq!(period.utc_offset, 3600);
    assert_eq!(period.std_offset, 0);
    assert_eq!(period.zone_abbr, "CET");
}

#[test]
fn new_york_still_observes_daylight_saving_in_2500() {
    let index = common::index();

    let summer = civil(2500, July, 1, 12, 0, 0).unix_seconds();
    let period = index.period_for_utc_instant("America/New_York", summer).unwrap();
    assert_eq!(period.utc_offset, -18000);
    assert_eq!(period.std_offset, 3600);
    assert_eq!(period.zone_abbr, "EDT");

    let winter = civil(2500, December, 25, 12, 0, 0).unix_seconds();
    let period = index.period_for_utc_instant("America/New_York", winter).unwrap();
    assert_eq!(period.std_offset, 0);
    assert_eq!(period.zone_abbr, "EST");
}

#[test]
fn far_future_gaps_and_ambiguities_are_still_reported() {
    let index = common::index();

    // In 2500 the last Sunday of March is the 28th, and the last
    // Sunday of October is the 31st.
    let answer = index.periods_for_wall_datetime("Europe/Paris", civil(2500, March, 28, 2, 30, 0)).unwrap();
    match answer {
        WallTimes::Gap { start, end, .. } => {
            assert_eq!(start, civil(2500, March, 28, 2, 0, 0));
            assert_eq!(end, civil(2500, March, 28, 3, 0, 0));
        }
        other => panic!("expected a gap, got {:?}", other),
    }

    let answer = index.periods_for_wall_datetime("Europe/Paris", civil(2500, October, 31, 2, 30, 0)).unwrap();
    match answer {
        WallTimes::Ambiguous { earlier, later } => {
            assert_eq!(earlier.zone_abbr, "CEST");
            assert_eq!(later.zone_abbr, "CET");
        }
        other => panic!("expected an ambiguity, got {:?}", other),
    }
}

#[test]
fn materialization_is_pure() {
    let index = common::index();
    let instant = civil(2500, July, 1, 12, 0, 0).unix_seconds();

    // Nothing is cached, so asking twice computes twice; the answers
    // had better agree.
    let first = index.period_for_utc_instant("Europe/Paris", instant).unwrap();
    let second = index.period_for_utc_instant("Europe/Paris", instant).unwrap();
    assert_eq!(first, second);
}

#[test]
fn materialization_leaves_history_alone() {
    let index = common::index();

    let far_future = civil(2500, July, 1, 12, 0, 0).unix_seconds();
    index.period_for_utc_instant("Europe/Paris", far_future).unwrap();

    // The stored periods are untouched by the ephemeral extension.
    let answer = index.periods_for_wall_datetime("Europe/Paris", civil(2021, October, 31, 2, 30, 0)).unwrap();
    assert!(answer.is_ambiguous());

    let period = index.period_for_utc_instant("Europe/Paris", civil(2021, July, 14, 12, 0, 0).unix_seconds()).unwrap();
    assert_eq!(period.zone_abbr, "CEST");
}

#[test]
fn new_years_around_the_materialized_year_are_covered() {
    let index = common::index();

    // Instants minutes either side of new year land in different query
    // years but must resolve seamlessly.
    let new_year = civil(2501, January, 1, 0, 0, 30).unix_seconds();
    let before = index.period_for_utc_instant("Europe/Paris", new_year - 60).unwrap();
    let after = index.period_for_utc_instant("Europe/Paris", new_year).unwrap();

    assert_eq!(before.zone_abbr, "CET");
    assert_eq!(after.zone_abbr, "CET");
    assert_eq!(before, after);
}
