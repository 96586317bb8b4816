//! The compiled-zone index, and the two lookups that run against it.

use std::collections::HashMap;

use cal::CivilDateTime;
use cal::datetime::SECONDS_IN_DAY;
use system;
use tz::{Error, Structural};
use tz::builder::PeriodBuilder;
use tz::extend;
use tz::model::{Rule, ZoneLine};
use tz::shrink::{self, CompiledPeriod, Edge, GapSide, RegularPeriod};


/// An index of compiled zones.
///
/// Zones are compiled in once, after which the index is never mutated
/// by queries: lookups borrow the period lists read-only, so a shared
/// index can serve any number of threads at once.
pub struct PeriodIndex {
    zones: HashMap<String, Vec<CompiledPeriod>>,
}

impl PeriodIndex {

    /// Creates a new index with no zones.
    pub fn new() -> PeriodIndex {
        PeriodIndex { zones: HashMap::new() }
    }

    /// Compiles a zone’s lines into periods and stores them under the
    /// given name, resolving named rule sets through the given map.
    ///
    /// A zone either compiles to a fully-consistent period list or is
    /// rejected outright; there are no partial results.
    pub fn compile_zone(&mut self, name: &str, lines: &[ZoneLine], rule_sets: &HashMap<String, Vec<Rule>>) -> Result<(), Error> {
        let built = PeriodBuilder::build(name, lines, rule_sets)?;
        let compiled = shrink::shrink(built);

        debug!("zone {:?} compiled to {} periods", name, compiled.len());
        self.zones.insert(name.to_owned(), compiled);
        Ok(())
    }

    /// Whether the index knows a zone with the given name.
    pub fn contains_zone(&self, name: &str) -> bool {
        self.zones.contains_key(name)
    }

    /// The names of every compiled zone, in no particular order.
    pub fn zone_names(&self) -> Vec<&str> {
        self.zones.keys().map(|name| &**name).collect()
    }

    /// The compiled period list of a zone, newest-first, as a host
    /// would persist it.
    pub fn compiled_periods(&self, name: &str) -> Option<&[CompiledPeriod]> {
        self.zones.get(name).map(|periods| &**periods)
    }

    /// Returns the one period of the zone that contains the given UTC
    /// instant.
    pub fn period_for_utc_instant(&self, zone: &str, unix_time: i64) -> Result<RegularPeriod, Error> {
        let periods = self.periods_of(zone)?;

        let found = match utc_match(periods, unix_time) {
            Some(found) => found,
            None => return Err(Error::Structure(Structural::NoPeriod { zone: zone.to_owned(), unix_time })),
        };

        // Landing in one of the two recurring tail periods says nothing
        // about which of them is actually in force at the instant; the
        // year has to be materialized to find out.
        if found.to == Edge::Max && has_recurring_tail(periods) {
            trace!("instant {} lands in the open tail of zone {:?}", unix_time, zone);
            let year = CivilDateTime::from_unix_seconds(unix_time).year();
            let extended = extend::materialize_year(zone, periods, year)?;

            match utc_match(&extended, unix_time) {
                Some(found) => Ok(found.clone()),
                None => Err(Error::Structure(Structural::NoPeriod { zone: zone.to_owned(), unix_time })),
            }
        }
        else {
            Ok(found.clone())
        }
    }

    /// Resolves a wall-clock datetime against the zone: the one period
    /// it happened in, or a report of the gap it fell into, or the two
    /// periods it happened in twice.
    pub fn periods_for_wall_datetime(&self, zone: &str, datetime: CivilDateTime) -> Result<WallTimes, Error> {
        let periods = self.periods_of(zone)?;
        let wall_seconds = datetime.gregorian_seconds();

        let matches = wall_matches(periods, wall_seconds);

        let open_ended = matches.iter().any(|period| match **period {
            CompiledPeriod::Regular(ref regular) => regular.to == Edge::Max,
            _ => false,
        });

        if open_ended && has_recurring_tail(periods) {
            trace!("wall time {} lands in the open tail of zone {:?}", datetime, zone);
            let extended = extend::materialize_year(zone, periods, datetime.year())?;
            let matches = wall_matches(&extended, wall_seconds);
            return resolve_wall(zone, datetime, &matches);
        }

        resolve_wall(zone, datetime, &matches)
    }

    /// Returns the zone’s period containing the current system time.
    pub fn current_period(&self, zone: &str) -> Result<RegularPeriod, Error> {
        self.period_for_utc_instant(zone, system::sys_time())
    }

    fn periods_of(&self, zone: &str) -> Result<&[CompiledPeriod], Error> {
        match self.zones.get(zone) {
            Some(periods) => Ok(periods),
            None => Err(Error::UnknownZone(zone.to_owned())),
        }
    }
}

impl Default for PeriodIndex {
    fn default() -> PeriodIndex {
        PeriodIndex::new()
    }
}


/// The result of resolving a *wall-clock* datetime against a zone. See
/// `PeriodIndex::periods_for_wall_datetime` for more information.
#[derive(PartialEq, Debug, Clone)]
pub enum WallTimes {

    /// The datetime happened exactly once, in this period.
    Precise(RegularPeriod),

    /// The datetime never happened: the clock jumped from `start`
    /// straight to `end`, from a period with the `before` offsets to
    /// one with the `after` offsets.
    Gap {
        before: GapSide,
        after: GapSide,
        start: CivilDateTime,
        end: CivilDateTime,
    },

    /// The datetime happened twice, first in `earlier` and then again
    /// in `later`.
    Ambiguous {
        earlier: RegularPeriod,
        later: RegularPeriod,
    },
}

impl WallTimes {

    /// Extracts the *precise* period, if present; **panics otherwise**.
    ///
    /// It is almost always preferable to use pattern matching on a
    /// `WallTimes` value and handle the gap/ambiguous cases explicitly,
    /// rather than risking a panic.
    pub fn unwrap_precise(self) -> RegularPeriod {
        match self {
            WallTimes::Precise(period)   => period,
            WallTimes::Gap { .. }        => panic!("called `WallTimes::unwrap_precise()` on a `Gap` value"),
            WallTimes::Ambiguous { .. }  => panic!("called `WallTimes::unwrap_precise()` on an `Ambiguous` value: {:?}", self),
        }
    }

    /// Returns whether this result is a gap (a time that never
    /// happened, because the clock jumped over it).
    pub fn is_gap(&self) -> bool {
        match *self {
            WallTimes::Gap { .. } => true,
            _ => false,
        }
    }

    /// Returns whether this result is ambiguous (a time that happened
    /// twice, because the clock fell back over it).
    pub fn is_ambiguous(&self) -> bool {
        match *self {
            WallTimes::Ambiguous { .. } => true,
            _ => false,
        }
    }
}


/// Finds the regular period containing the given UTC instant.
///
/// The list is newest-first and regular periods tile the UTC axis, so
/// the first period that has started by the instant is the match, as
/// long as it hasn’t also ended (which can only fail on corrupt data).
fn utc_match(periods: &[CompiledPeriod], unix_time: i64) -> Option<&RegularPeriod> {
    for period in periods {
        let regular = match *period {
            CompiledPeriod::Regular(ref regular) => regular,
            _ => continue,
        };

        let started = match regular.from {
            Edge::Min => true,
            Edge::At { unix_time: from, .. } => from <= unix_time,
            Edge::Max => false,
        };

        if started {
            let still_running = match regular.to {
                Edge::Max => true,
                Edge::At { unix_time: to, .. } => unix_time < to,
                Edge::Min => false,
            };

            return if still_running { Some(regular) } else { None };
        }
    }

    None
}

/// Collects every period whose wall-clock span contains the given key,
/// in newest-first order.
fn wall_matches(periods: &[CompiledPeriod], wall_seconds: i64) -> Vec<&CompiledPeriod> {
    let mut matches = Vec::new();

    for period in periods {
        if period.wall_contains(wall_seconds) {
            matches.push(period);
        }

        // Early exit: once the walk reaches a period that starts a full
        // day before the key, nothing older can still contain it:
        // offsets never come close to a day, and every older period
        // ends where a newer one starts. This only holds because the
        // list is newest-first.
        match period.wall_span().0 {
            None => break,
            Some(from) if from + SECONDS_IN_DAY <= wall_seconds => break,
            _ => {}
        }
    }

    matches
}

/// Whether the zone still observes recurring daylight saving: its two
/// chronologically last periods (the first two of the newest-first
/// list) are both open-ended.
fn has_recurring_tail(periods: &[CompiledPeriod]) -> bool {
    match (periods.get(0), periods.get(1)) {
        (Some(&CompiledPeriod::Regular(ref last)), Some(&CompiledPeriod::Regular(ref second_last))) => {
            last.to == Edge::Max && second_last.to == Edge::Max
        }
        _ => false,
    }
}

/// Interprets a set of wall-clock matches. One match is a plain answer
/// or a gap; a regular–overlap–regular triple is an ambiguity; any
/// other shape means the period list is corrupt.
fn resolve_wall(zone: &str, datetime: CivilDateTime, matches: &[&CompiledPeriod]) -> Result<WallTimes, Error> {
    let miscount = |count| Error::Structure(Structural::WallMatches {
        zone: zone.to_owned(),
        datetime,
        count,
    });

    match matches.len() {
        1 => match *matches[0] {
            CompiledPeriod::Regular(ref regular) => Ok(WallTimes::Precise(regular.clone())),

            CompiledPeriod::Gap(ref gap) => Ok(WallTimes::Gap {
                before: gap.before,
                after: gap.after,
                start: gap.from.wall,
                end: gap.to.wall,
            }),

            CompiledPeriod::Overlap(_) => Err(miscount(1)),
        },

        // The walk runs newest-first, so the first match is the later
        // of the two repeated periods.
        3 => match (matches[0], matches[1], matches[2]) {
            (&CompiledPeriod::Regular(ref later), &CompiledPeriod::Overlap(_), &CompiledPeriod::Regular(ref earlier)) => {
                Ok(WallTimes::Ambiguous {
                    earlier: earlier.clone(),
                    later: later.clone(),
                })
            }
            _ => Err(miscount(3)),
        },

        count => Err(miscount(count)),
    }
}
