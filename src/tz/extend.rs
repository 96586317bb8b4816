//! Re-materializing a zone’s recurring tail for a specific year.
//!
//! A zone that still observes daylight saving ends in two open periods,
//! one per recurring rule, which say nothing about *which* dates the
//! switches fall on in any particular year. When a query lands out
//! there, the retained recurring rules are expanded for the year in
//! question (and its two neighbours, so the year’s edges are covered),
//! the ordinary builder is run over the single tail zone line against
//! that tiny rule set, and the result is cut down to the periods around
//! the year itself. The caller resolves against that short list and
//! throws it away.

use std::collections::HashMap;

use cal::{CivilDateTime, Month};
use cal::datetime::SECONDS_IN_DAY;
use tz::Structural;
use tz::builder::PeriodBuilder;
use tz::model::{Bound, RawRule, Recurrence, Rule, Saving, TimeType};
use tz::shrink::{self, CompiledPeriod};


/// Builds the short period list covering the given year for a zone
/// whose compiled list (newest-first) ends in two recurring periods.
pub(crate) fn materialize_year(zone: &str, periods: &[CompiledPeriod], year: i64) -> Result<Vec<CompiledPeriod>, Structural> {
    let recurrences = tail_recurrences(zone, periods)?;

    debug!("materializing year {} for zone {:?}", year, zone);

    // Expand each recurring rule into its concrete transition datetimes
    // for the year and its neighbours, in chronological order.
    let mut occurrences: Vec<(CivilDateTime, TimeType, RawRule)> = Vec::new();

    for recurrence in &recurrences {
        let restricted = recurrence.rule.with_year_range(year - 1, year + 1);

        for y in year - 1 .. year + 2 {
            if !restricted.applies_to_year(y) {
                continue;
            }

            match restricted.occurrence_in(y) {
                Ok(datetime) => occurrences.push((datetime, restricted.at_type, recurrence.rule.clone())),
                Err(_) => return Err(Structural::RuleOutOfCalendar { zone: zone.to_owned(), year: y }),
            }
        }
    }

    occurrences.sort_by(|a, b| a.0.cmp(&b.0));

    // Denormalize: each transition is in force until the next one, and
    // the last is in force forever.
    let mut rules = Vec::with_capacity(occurrences.len());
    for (index, &(datetime, time_type, ref raw)) in occurrences.iter().enumerate() {
        let to = match occurrences.get(index + 1) {
            Some(&(next, next_type, _)) => Bound::At(next, next_type),
            None => Bound::Max,
        };

        rules.push(Rule {
            from: Bound::At(datetime, time_type),
            to,
            dst_offset: raw.dst_offset,
            letter: raw.letter.clone(),
            recurrence: Some(raw.clone()),
        });
    }

    // Regroup the expansion under the tail line’s rule set name and run
    // the ordinary build over the single line.
    let line = recurrences[0].line.clone();
    let name = match line.saving {
        Saving::Named(ref name) => name.clone(),
        _ => return Err(Structural::MissingRecurrence { zone: zone.to_owned() }),
    };

    let mut rule_sets = HashMap::new();
    rule_sets.insert(name, rules);

    let built = PeriodBuilder::build(zone, &[line], &rule_sets)?;
    let mut compiled = shrink::shrink(built);

    // Keep only the periods around the year itself, padded by a day so
    // wall-clock readings near new year stay covered. The expansion
    // reached a year further out on both sides, so the cut can never
    // leave an open-ended period behind, which is also what stops a
    // lookup against this list from re-entering here.
    let from_edge = year_start(year) - SECONDS_IN_DAY;
    let to_edge = year_start(year + 1) + SECONDS_IN_DAY;

    compiled.retain(|period| {
        let (from, to) = period.unix_span();
        from.map_or(true, |from| from <= to_edge)
            && to.map_or(true, |to| to >= from_edge)
    });

    trace!("zone {:?} extends to {} periods around year {}", zone, compiled.len(), year);
    Ok(compiled)
}

/// Digs the two retained recurrences out of a zone’s open tail.
fn tail_recurrences<'p>(zone: &str, periods: &'p [CompiledPeriod]) -> Result<[&'p Recurrence; 2], Structural> {
    let missing = || Structural::MissingRecurrence { zone: zone.to_owned() };

    match (periods.get(0), periods.get(1)) {
        (Some(&CompiledPeriod::Regular(ref last)), Some(&CompiledPeriod::Regular(ref second_last))) => {
            match (&second_last.recurrence, &last.recurrence) {
                (&Some(ref earlier), &Some(ref later)) => Ok([earlier, later]),
                _ => Err(missing()),
            }
        }
        _ => Err(missing()),
    }
}

/// The first instant of the given year, in Unix seconds.
fn year_start(year: i64) -> i64 {
    // The 1st of January exists in every year.
    CivilDateTime::ymd_hms(year, Month::January, 1, 0, 0, 0).unwrap().unix_seconds()
}
