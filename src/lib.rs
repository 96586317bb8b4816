#![crate_name = "zoneinfo_periods"]

//! Compilation of raw zoneinfo records into time zone **periods**, and
//! lookups against them.
//!
//! The zoneinfo database describes a time zone as a sequence of *zone
//! lines* (“this standard offset and these daylight-saving rules applied
//! until this datetime”) together with named sets of *rules* describing
//! when the daylight-saving offset switches on and off. Neither form is
//! directly queryable: the zone lines and rules have to be reconciled
//! into a single timeline first.
//!
//! That timeline is a list of periods. A **regular** period is a span of
//! time during which the zone’s UTC offset, daylight-saving offset, and
//! abbreviation are all constant. Wherever two adjacent regular periods
//! disagree on the total offset, the local clock either skipped over some
//! wall-clock times (a **gap** period) or visited some of them twice (an
//! **overlap** period), and a synthetic period is recorded for the span
//! in question.
//!
//! The [`PeriodIndex`] owns the compiled periods for any number of zones
//! and answers the two useful questions: which period contains a given
//! UTC instant, and which period or periods contain a given wall-clock
//! datetime. Zones whose last periods depend on recurring rules are
//! extended on the fly for whichever year a query lands in, so lookups
//! keep working arbitrarily far into the future.
//!
//! Parsing the zoneinfo text files is *not* this crate’s job; the input
//! types in [`tz`] are meant to be produced by a parser crate.

extern crate libc;
#[macro_use]
extern crate log;
#[cfg(feature = "with_serde")]
extern crate serde;
#[cfg(windows)]
extern crate winapi;

mod system;
mod util;

pub mod cal;
pub mod tz;

pub use cal::{CivilDateTime, Month, Weekday};
pub use system::system_time_zone;
pub use tz::{Bound, Rule, RawRule, DaySpec, Recurrence, Saving, Format, TimeType, ZoneLine};
pub use tz::{CompiledPeriod, RegularPeriod, GapPeriod, OverlapPeriod, Edge, GapEdge, GapSide};
pub use tz::{PeriodIndex, WallTimes, Error};
