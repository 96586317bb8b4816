//! Time zone periods: building them from zone and rule records, and
//! looking them up.
//!
//! ### From records to periods
//!
//! A zone arrives as an ordered list of [`ZoneLine`]s, each describing
//! one epoch of the zone’s history: a standard offset from UTC, an
//! abbreviation template, a [`Saving`] policy (none, a fixed amount, or
//! a named rule set), and the datetimes at which the epoch begins and
//! ends. Named rule sets arrive as ordered lists of [`Rule`]s, each an
//! interval during which some daylight-saving offset was in force.
//!
//! The builder walks the zone lines in order and emits one regular
//! period per stretch of constant behaviour, translating every boundary
//! into all three clocks (wall, standard, universal) plus the two
//! integer keys lookups run on. Where the total offset changes between
//! two adjacent periods, the local clock either skipped some wall-clock
//! times or repeated them, and a synthetic gap or overlap period is
//! recorded so that wall-clock lookups can report what actually
//! happened instead of guessing.
//!
//! The built list is then *shrunk* into the compact, queryable form
//! (see [`CompiledPeriod`]) and stored newest-first in a
//! [`PeriodIndex`].
//!
//! ### The open future
//!
//! A zone whose last line defers to recurring rules never stops
//! transitioning, so its final two periods are both open-ended and
//! remember the recurring rule they came from. A query that lands out
//! there re-materializes those rules for the year in question and
//! resolves against the result, so the answer for the year 2500 is
//! computed exactly like the answer for last week.

pub mod model;

mod builder;
mod extend;
mod index;
mod shrink;

use std::error::Error as ErrorTrait;
use std::fmt;

use cal::CivilDateTime;

pub use self::model::{Bound, DaySpec, Format, RawRule, Recurrence, Rule, Saving, TimeType, ZoneLine};
pub use self::shrink::{CompiledPeriod, Edge, GapEdge, GapPeriod, GapSide, OverlapPeriod, RegularPeriod};
pub use self::index::{PeriodIndex, WallTimes};


/// An error produced when querying or compiling a zone.
#[derive(PartialEq, Debug, Clone)]
pub enum Error {

    /// The requested zone name is not known to the index.
    UnknownZone(String),

    /// The input records for a zone are inconsistent, or a compiled
    /// period list turned out not to cover a queried time. Either way
    /// the zone data is corrupt and the operation cannot proceed.
    Structure(Structural),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::UnknownZone(ref name)  => write!(f, "unknown zone {:?}", name),
            Error::Structure(ref e)       => e.fmt(f),
        }
    }
}

impl ErrorTrait for Error {
    fn cause(&self) -> Option<&dyn ErrorTrait> {
        if let Error::Structure(ref e) = *self {
            Some(e)
        }
        else {
            None
        }
    }
}

impl From<Structural> for Error {
    fn from(error: Structural) -> Error {
        Error::Structure(error)
    }
}


/// The ways a zone’s records can fail to describe a consistent
/// timeline. Any of these means the database being compiled is corrupt;
/// none of them is recoverable.
#[derive(PartialEq, Debug, Clone)]
pub enum Structural {

    /// A zone line named a rule set the resolver has never heard of.
    MissingRuleSet { zone: String, name: String },

    /// A zone line claims to begin at a datetime that the previous
    /// line’s last period does not end at.
    BrokenStitch { zone: String, expected: CivilDateTime, found: Option<CivilDateTime> },

    /// Two adjacent periods that should share a boundary instant have
    /// ended up on different UTC instants.
    SplitBoundary { zone: String, earlier: i64, later: i64 },

    /// A period was built with the same start and end instant.
    DegeneratePeriod { zone: String, at: i64 },

    /// No period contains the queried UTC instant.
    NoPeriod { zone: String, unix_time: i64 },

    /// A wall-clock datetime matched a number of periods that has no
    /// interpretation (anything other than one, or a regular–overlap–
    /// regular triple).
    WallMatches { zone: String, datetime: CivilDateTime, count: usize },

    /// A zone’s open-ended tail periods do not carry the recurring
    /// rules needed to extend them.
    MissingRecurrence { zone: String },

    /// A recurring rule resolved to a date that does not exist.
    RuleOutOfCalendar { zone: String, year: i64 },
}

impl fmt::Display for Structural {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Structural::MissingRuleSet { ref zone, ref name } => {
                write!(f, "zone {:?} refers to missing rule set {:?}", zone, name)
            }
            Structural::BrokenStitch { ref zone, ref expected, found: Some(ref found) } => {
                write!(f, "zone {:?} line starts at {} but the previous period ends at {}", zone, expected, found)
            }
            Structural::BrokenStitch { ref zone, ref expected, found: None } => {
                write!(f, "zone {:?} line starts at {} but the previous period never ends", zone, expected)
            }
            Structural::SplitBoundary { ref zone, earlier, later } => {
                write!(f, "zone {:?} has non-coincident boundary instants {} and {}", zone, earlier, later)
            }
            Structural::DegeneratePeriod { ref zone, at } => {
                write!(f, "zone {:?} has a period of zero length at {}", zone, at)
            }
            Structural::NoPeriod { ref zone, unix_time } => {
                write!(f, "zone {:?} has no period containing instant {}", zone, unix_time)
            }
            Structural::WallMatches { ref zone, ref datetime, count } => {
                write!(f, "wall time {} in zone {:?} matches {} periods instead of one or three", datetime, zone, count)
            }
            Structural::MissingRecurrence { ref zone } => {
                write!(f, "zone {:?} has an open tail with no recurring rules attached", zone)
            }
            Structural::RuleOutOfCalendar { ref zone, year } => {
                write!(f, "zone {:?} has a recurring rule with no valid date in year {}", zone, year)
            }
        }
    }
}

impl ErrorTrait for Structural {
}
