//! Shared fixture zones, built from real zoneinfo values.
//!
//! The rule sets are in the denormalized shape a parser produces: one
//! record per span of constant saving, each ending where the next one
//! starts, with the recurring records at the end left open and
//! carrying the raw rule they came from.

#![allow(dead_code)]

use std::collections::HashMap;

use zoneinfo_periods::{Bound, CivilDateTime, DaySpec, Format, Month, PeriodIndex, RawRule, Rule, Saving, TimeType, Weekday, ZoneLine};
use zoneinfo_periods::Month::*;
use zoneinfo_periods::TimeType::*;

pub fn civil(year: i64, month: Month, day: i8, hour: i8, minute: i8, second: i8) -> CivilDateTime {
    CivilDateTime::ymd_hms(year, month, day, hour, minute, second).unwrap()
}

fn at(year: i64, month: Month, day: i8, hour: i8, minute: i8, second: i8, time_type: TimeType) -> Bound {
    Bound::At(civil(year, month, day, hour, minute, second), time_type)
}

fn line(utc_offset: i64, saving: Saving, format: &str, from: Bound, to: Bound) -> ZoneLine {
    ZoneLine { utc_offset, saving, format: Format::new(format), from, to }
}

fn span(from: Bound, to: Bound, dst_offset: i64, letter: &str) -> Rule {
    Rule { from, to, dst_offset, letter: letter.to_owned(), recurrence: None }
}

fn open_span(from: Bound, dst_offset: i64, letter: &str, recurrence: RawRule) -> Rule {
    Rule { from, to: Bound::Max, dst_offset, letter: letter.to_owned(), recurrence: Some(recurrence) }
}


pub fn paris_lines() -> Vec<ZoneLine> {
    vec![
        line(561, Saving::NoSaving, "LMT",
             Bound::Min,
             at(1911, March, 11, 0, 0, 0, UTC)),
        line(0, Saving::NoSaving, "WET",
             at(1911, March, 11, 0, 0, 0, UTC),
             at(1940, June, 14, 23, 0, 0, UTC)),
        line(3600, Saving::NoSaving, "CET",
             at(1940, June, 14, 23, 0, 0, UTC),
             at(1976, March, 28, 1, 0, 0, UTC)),
        line(3600, Saving::Named("EC".to_owned()), "CE%sT",
             at(1976, March, 28, 1, 0, 0, UTC),
             Bound::Max),
    ]
}

/// European summer time: last Sunday of March to last Sunday of
/// October, switching at 01:00 universal time.
pub fn ec_rules() -> Vec<Rule> {
    let march = RawRule {
        name: "EC".to_owned(),
        from_year: 1981,
        to_year: None,
        month: March,
        day: DaySpec::Last(Weekday::Sunday),
        at_seconds: 3600,
        at_type: UTC,
        dst_offset: 3600,
        letter: "S".to_owned(),
    };

    let october = RawRule {
        name: "EC".to_owned(),
        from_year: 1996,
        to_year: None,
        month: October,
        day: DaySpec::Last(Weekday::Sunday),
        at_seconds: 3600,
        at_type: UTC,
        dst_offset: 0,
        letter: String::new(),
    };

    vec![
        span(at(2019, March, 31, 1, 0, 0, UTC), at(2019, October, 27, 1, 0, 0, UTC), 3600, "S"),
        span(at(2019, October, 27, 1, 0, 0, UTC), at(2020, March, 29, 1, 0, 0, UTC), 0, ""),
        span(at(2020, March, 29, 1, 0, 0, UTC), at(2020, October, 25, 1, 0, 0, UTC), 3600, "S"),
        span(at(2020, October, 25, 1, 0, 0, UTC), at(2021, March, 28, 1, 0, 0, UTC), 0, ""),
        span(at(2021, March, 28, 1, 0, 0, UTC), at(2021, October, 31, 1, 0, 0, UTC), 3600, "S"),
        span(at(2021, October, 31, 1, 0, 0, UTC), at(2022, March, 27, 1, 0, 0, UTC), 0, ""),
        open_span(at(2022, March, 27, 1, 0, 0, UTC), 3600, "S", march),
        open_span(at(2022, October, 30, 1, 0, 0, UTC), 0, "", october),
    ]
}


pub fn new_york_lines() -> Vec<ZoneLine> {
    vec![
        line(-17762, Saving::NoSaving, "LMT",
             Bound::Min,
             at(1883, November, 18, 12, 3, 58, Wall)),
        line(-18000, Saving::Named("US".to_owned()), "E%sT",
             at(1883, November, 18, 12, 3, 58, Wall),
             Bound::Max),
    ]
}

/// United States daylight saving in its post-2007 shape: second Sunday
/// of March to first Sunday of November, switching at 02:00 wall time.
pub fn us_rules() -> Vec<Rule> {
    let march = RawRule {
        name: "US".to_owned(),
        from_year: 2007,
        to_year: None,
        month: March,
        day: DaySpec::FirstOnOrAfter(Weekday::Sunday, 8),
        at_seconds: 7200,
        at_type: Wall,
        dst_offset: 3600,
        letter: "D".to_owned(),
    };

    let november = RawRule {
        name: "US".to_owned(),
        from_year: 2007,
        to_year: None,
        month: November,
        day: DaySpec::FirstOnOrAfter(Weekday::Sunday, 1),
        at_seconds: 7200,
        at_type: Wall,
        dst_offset: 0,
        letter: "S".to_owned(),
    };

    vec![
        span(at(1918, March, 31, 2, 0, 0, Wall), at(1918, October, 27, 2, 0, 0, Wall), 3600, "D"),
        span(at(1918, October, 27, 2, 0, 0, Wall), at(2019, March, 10, 2, 0, 0, Wall), 0, "S"),
        span(at(2019, March, 10, 2, 0, 0, Wall), at(2019, November, 3, 2, 0, 0, Wall), 3600, "D"),
        span(at(2019, November, 3, 2, 0, 0, Wall), at(2020, March, 8, 2, 0, 0, Wall), 0, "S"),
        span(at(2020, March, 8, 2, 0, 0, Wall), at(2020, November, 1, 2, 0, 0, Wall), 3600, "D"),
        span(at(2020, November, 1, 2, 0, 0, Wall), at(2021, March, 14, 2, 0, 0, Wall), 0, "S"),
        span(at(2021, March, 14, 2, 0, 0, Wall), at(2021, November, 7, 2, 0, 0, Wall), 3600, "D"),
        span(at(2021, November, 7, 2, 0, 0, Wall), at(2022, March, 13, 2, 0, 0, Wall), 0, "S"),
        span(at(2022, March, 13, 2, 0, 0, Wall), at(2022, November, 6, 2, 0, 0, Wall), 3600, "D"),
        span(at(2022, November, 6, 2, 0, 0, Wall), at(2023, March, 12, 2, 0, 0, Wall), 0, "S"),
        open_span(at(2023, March, 12, 2, 0, 0, Wall), 3600, "D", march),
        open_span(at(2023, November, 5, 2, 0, 0, Wall), 0, "S", november),
    ]
}


pub fn kolkata_lines() -> Vec<ZoneLine> {
    vec![
        line(21208, Saving::NoSaving, "LMT",
             Bound::Min,
             at(1854, June, 28, 0, 0, 0, Wall)),
        line(21200, Saving::NoSaving, "HMT",
             at(1854, June, 28, 0, 0, 0, Wall),
             at(1906, January, 1, 0, 0, 0, Wall)),
        line(19800, Saving::NoSaving, "IST",
             at(1906, January, 1, 0, 0, 0, Wall),
             at(1941, October, 1, 0, 0, 0, Wall)),
        line(19800, Saving::Fixed(3600), "+0630",
             at(1941, October, 1, 0, 0, 0, Wall),
             at(1942, May, 15, 0, 0, 0, Wall)),
        line(19800, Saving::NoSaving, "IST",
             at(1942, May, 15, 0, 0, 0, Wall),
             at(1942, September, 1, 0, 0, 0, Wall)),
        line(19800, Saving::Fixed(3600), "+0630",
             at(1942, September, 1, 0, 0, 0, Wall),
             at(1945, October, 15, 0, 0, 0, Wall)),
        line(19800, Saving::NoSaving, "IST",
             at(1945, October, 15, 0, 0, 0, Wall),
             Bound::Max),
    ]
}


pub fn utc_lines() -> Vec<ZoneLine> {
    vec![
        line(0, Saving::NoSaving, "UTC", Bound::Min, Bound::Max),
    ]
}


pub fn rule_sets() -> HashMap<String, Vec<Rule>> {
    let mut rule_sets = HashMap::new();
    rule_sets.insert("EC".to_owned(), ec_rules());
    rule_sets.insert("US".to_owned(), us_rules());
    rule_sets
}

pub fn index() -> PeriodIndex {
    let rule_sets = rule_sets();
    let mut index = PeriodIndex::new();

    index.compile_zone("Europe/Paris", &paris_lines(), &rule_sets).unwrap();
    index.compile_zone("America/New_York", &new_york_lines(), &rule_sets).unwrap();
    index.compile_zone("Asia/Kolkata", &kolkata_lines(), &rule_sets).unwrap();
    index.compile_zone("Etc/UTC", &utc_lines(), &rule_sets).unwrap();

    index
}

pub const ZONES: &[&str] = &[ "Europe/Paris", "America/New_York", "Asia/Kolkata", "Etc/UTC" ];
