//! The records that describe a zone, and the boundary calculations
//! shared by everything that builds periods out of them.

use cal::{is_leap_year, CivilDateTime, Month, Weekday};
use cal::Error as CalendarError;

#[cfg(feature = "with_serde")]
use serde::{Deserialize, Serialize};


/// The “type” of time that a time is.
///
/// In the zoneinfo database, a datetime may be followed with a letter
/// signifying what ‘type’ of time it is:
///
/// - **w** for “wall clock” time (the default),
/// - **s** for local standard time,
/// - **u** or **g** or **z** for universal time.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub enum TimeType {

    /// Wall-clock time: the local time including any daylight-saving
    /// offset.
    Wall,

    /// Standard Time: the local time excluding any daylight-saving
    /// offset.
    Standard,

    /// Universal Co-ordinated Time.
    UTC,
}


/// One end of a zone line’s or rule’s span of applicability: either a
/// datetime expressed in one of the three time types, or unbounded in
/// that direction.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub enum Bound {

    /// Unbounded towards the past.
    Min,

    /// Bounded at the given datetime, read in the given type of time.
    At(CivilDateTime, TimeType),

    /// Unbounded towards the future.
    Max,
}


/// A single instant on a period boundary, carried in every
/// representation a lookup might need: the three civil clock readings,
/// plus the two integer keys that UTC and wall-clock lookups compare
/// on.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub(crate) struct BoundaryInstant {
    pub wall: CivilDateTime,
    pub standard: CivilDateTime,
    pub utc: CivilDateTime,
    pub unix_time: i64,
    pub wall_seconds: i64,
}

impl BoundaryInstant {

    /// Resolves a civil datetime read in the given type of time, under
    /// the given standard and daylight-saving offsets, into all of its
    /// representations at once.
    ///
    /// The three clocks are related by
    /// `wall = standard + dst_offset = utc + utc_offset + dst_offset`.
    pub fn from_civil(datetime: CivilDateTime, time_type: TimeType, utc_offset: i64, dst_offset: i64) -> BoundaryInstant {
        let standard = match time_type {
            TimeType::Wall      => datetime.add_seconds(-dst_offset),
            TimeType::Standard  => datetime,
            TimeType::UTC       => datetime.add_seconds(utc_offset),
        };

        let wall = standard.add_seconds(dst_offset);
        let utc = standard.add_seconds(-utc_offset);

        BoundaryInstant {
            wall, standard, utc,
            unix_time: utc.unix_seconds(),
            wall_seconds: wall.gregorian_seconds(),
        }
    }

    /// The civil reading of this instant on the given type of clock.
    pub fn civil(&self, time_type: TimeType) -> CivilDateTime {
        match time_type {
            TimeType::Wall      => self.wall,
            TimeType::Standard  => self.standard,
            TimeType::UTC       => self.utc,
        }
    }
}


/// A period boundary as the builder sees it: a full instant, or one of
/// the two open ends of a zone’s history.
#[derive(PartialEq, Debug, Copy, Clone)]
pub(crate) enum Boundary {
    Min,
    At(BoundaryInstant),
    Max,
}

impl Boundary {
    pub fn instant(&self) -> Option<&BoundaryInstant> {
        match *self {
            Boundary::At(ref instant) => Some(instant),
            _ => None,
        }
    }

    pub fn is_max(&self) -> bool {
        match *self {
            Boundary::Max => true,
            _ => false,
        }
    }
}


/// The amount of daylight saving time (DST) to apply while a zone line
/// is in effect. This column of a zone line can hold different types of
/// value.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub enum Saving {

    /// Just stick to the standard offset.
    NoSaving,

    /// This many seconds should be saved while the zone line is in
    /// effect. (This is the equivalent of there being a single one-off
    /// rule with the given amount of time to save.)
    Fixed(i64),

    /// All the rules in the set with the given name should apply while
    /// the zone line is in effect.
    Named(String),
}


/// A zone’s abbreviation template, pre-split into the three shapes that
/// occur in the wild.
#[derive(PartialEq, Eq, Debug, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub enum Format {

    /// A fixed abbreviation, such as `GMT`.
    Constant(String),

    /// An abbreviation with a `%s` marker where a rule’s letter gets
    /// substituted in, such as `CE%sT`.
    Placeholder(String),

    /// A pair of standard-time and daylight-saving abbreviations
    /// separated by a slash, such as `+00/+01`.
    Pair(String, String),
}

impl Format {

    /// Classifies an abbreviation template string.
    pub fn new(template: &str) -> Format {
        if let Some(position) = template.find('/') {
            Format::Pair(template[.. position].to_owned(),
                         template[position + 1 ..].to_owned())
        }
        else if template.contains("%s") {
            Format::Placeholder(template.to_owned())
        }
        else {
            Format::Constant(template.to_owned())
        }
    }

    /// Renders the abbreviation for a period with the given
    /// daylight-saving offset and rule letter.
    pub fn format(&self, dst_offset: i64, letter: &str) -> String {
        match *self {
            Format::Constant(ref name) => name.clone(),
            Format::Placeholder(ref template) => template.replace("%s", letter),
            Format::Pair(ref standard, ref dst) => {
                if dst_offset == 0 { standard.clone() } else { dst.clone() }
            }
        }
    }
}


/// A **zone line** describes one continuous epoch of a named zone: its
/// standard offset from UTC, its abbreviation template, the
/// daylight-saving policy in force, and the datetimes at which the
/// epoch begins and ends.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct ZoneLine {

    /// The zone’s standard offset from UTC during this epoch, in
    /// seconds.
    pub utc_offset: i64,

    /// The daylight-saving policy in force during this epoch.
    pub saving: Saving,

    /// The template the zone’s abbreviation is rendered from.
    pub format: Format,

    /// Where this epoch begins, which is where the previous zone
    /// line’s epoch ends.
    pub from: Bound,

    /// Where this epoch ends.
    pub to: Bound,
}


/// One concrete span of a named rule set: between `from` and `to`, the
/// given daylight-saving offset was in force.
///
/// Rule sets arrive already expanded into these one-per-span records,
/// ordered chronologically; a set whose last records recur forever has
/// those records end at [`Bound::Max`] and carry the [`RawRule`] they
/// were expanded from, so the open future can be re-expanded on demand.
#[derive(PartialEq, Debug, Clone)]
pub struct Rule {

    /// Where this span starts.
    pub from: Bound,

    /// Where this span ends, which is where the next span of the set
    /// starts.
    pub to: Bound,

    /// The daylight-saving offset in force during this span, in seconds
    /// on top of the zone’s standard offset. Zero means standard time.
    pub dst_offset: i64,

    /// The letter (or word, or nothing) substituted into `%s`
    /// abbreviation templates while this span is in force.
    pub letter: String,

    /// The recurring rule this span was expanded from, for spans that
    /// extend indefinitely.
    pub recurrence: Option<RawRule>,
}


/// A recurring rule as it appears in the zoneinfo database: “every year
/// in this range, on this day of this month, at this time, save this
/// much”.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct RawRule {

    /// The name of the rule set this rule belongs to.
    pub name: String,

    /// The first year the rule applies in.
    pub from_year: i64,

    /// The final year the rule applies in, or `None` if it recurs
    /// forever.
    pub to_year: Option<i64>,

    /// The month the transition happens in.
    pub month: Month,

    /// Which day of the month the transition happens on.
    pub day: DaySpec,

    /// The time of day of the transition, as seconds after midnight.
    pub at_seconds: i64,

    /// Which type of time `at_seconds` is expressed in.
    pub at_type: TimeType,

    /// The daylight-saving offset this rule switches to, in seconds.
    pub dst_offset: i64,

    /// The letter substituted into `%s` abbreviation templates.
    pub letter: String,
}

impl RawRule {

    /// Returns a copy of this rule restricted to the given range of
    /// years.
    pub fn with_year_range(&self, from_year: i64, to_year: i64) -> RawRule {
        RawRule {
            from_year,
            to_year: Some(to_year),
            .. self.clone()
        }
    }

    /// Whether this rule has a transition in the given year.
    pub fn applies_to_year(&self, year: i64) -> bool {
        year >= self.from_year
            && match self.to_year {
                Some(to_year) => year <= to_year,
                None => true,
            }
    }

    /// The datetime of this rule’s transition in the given year,
    /// expressed in the rule’s own type of time.
    ///
    /// Fails if the day specification resolves to a date that does not
    /// exist, which only a corrupt rule can make happen.
    pub fn occurrence_in(&self, year: i64) -> Result<CivilDateTime, CalendarError> {
        let day = self.day.resolve(year, self.month);
        CivilDateTime::ymd_hms(year, self.month, day,
                               (self.at_seconds / 60 / 60) as i8,
                               (self.at_seconds / 60 % 60) as i8,
                               (self.at_seconds % 60) as i8)
    }
}


/// Which day of the month a rule’s transition happens on.
#[derive(PartialEq, Debug, Copy, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub enum DaySpec {

    /// A fixed day of the month.
    Ordinal(i8),

    /// The last occurrence of the given weekday in the month.
    Last(Weekday),

    /// The first occurrence of the given weekday on or after the given
    /// day of the month.
    FirstOnOrAfter(Weekday, i8),
}

impl DaySpec {

    /// The day of the month this specification picks in the given year
    /// and month.
    ///
    /// A `FirstOnOrAfter` specification near the end of a month can
    /// resolve to a day past the month’s last, which the caller’s date
    /// construction will reject.
    pub fn resolve(&self, year: i64, month: Month) -> i8 {
        match *self {
            DaySpec::Ordinal(day) => day,

            DaySpec::Last(weekday) => {
                let last = month.days_in_month(is_leap_year(year));
                last - days_until(weekday, weekday_on(year, month, last))
            }

            DaySpec::FirstOnOrAfter(weekday, day) => {
                day + days_until(weekday_on(year, month, day), weekday)
            }
        }
    }
}

/// The weekday of a day of the given month, without requiring the day
/// to exist: day 1 always exists, and the rest is modular arithmetic.
fn weekday_on(year: i64, month: Month, day: i8) -> Weekday {
    let first = CivilDateTime::ymd_hms(year, month, 1, 0, 0, 0)
        .expect("the first of a month always exists")
        .weekday();
    Weekday::from_days_ahead(first, day - 1)
}

/// The number of days needed to get from one weekday to the next
/// occurrence of another, between 0 and 6.
fn days_until(from: Weekday, to: Weekday) -> i8 {
    (to.days_from_monday() - from.days_from_monday() + 7) % 7
}


/// The recurring rule and zone line an open-ended period was built
/// from, retained so the period can be re-expanded for any query year.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct Recurrence {

    /// The recurring rule behind the period.
    pub rule: RawRule,

    /// The zone line the period was built under.
    pub line: ZoneLine,
}


/// A record of consecutive daylight-saving offsets around a clock
/// discontinuity, kept on gap periods so callers can see both sides of
/// the jump.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub(crate) struct OffsetPair {
    pub utc_offset: i64,
    pub dst_offset: i64,
}


/// A regular period as the builder emits it, before shrinking: a span
/// of constant offsets and abbreviation, with fully-expanded
/// boundaries.
#[derive(PartialEq, Debug, Clone)]
pub(crate) struct RawRegular {
    pub from: Boundary,
    pub to: Boundary,

    /// The standard offset from UTC, in seconds.
    pub utc_offset: i64,

    /// The extra daylight-saving offset on top of standard time, in
    /// seconds. Zero means the period is on standard time.
    pub dst_offset: i64,

    /// The rendered abbreviation, such as `CEST`.
    pub abbr: String,

    /// For open-ended periods that came from a recurring rule: the rule
    /// and zone line needed to re-expand them for a specific year.
    pub recurrence: Option<Recurrence>,
}

impl RawRegular {
    pub fn total_offset(&self) -> i64 {
        self.utc_offset + self.dst_offset
    }

    pub fn offsets(&self) -> OffsetPair {
        OffsetPair { utc_offset: self.utc_offset, dst_offset: self.dst_offset }
    }
}


/// A period as the builder emits it: regular behaviour, or a synthetic
/// record of a clock discontinuity.
#[derive(PartialEq, Debug, Clone)]
pub(crate) enum RawPeriod {

    /// A span of constant clock behaviour.
    Regular(RawRegular),

    /// A span of wall-clock time that never happened: the two instants
    /// coincide in UTC, but the wall clock jumped from one to the
    /// other.
    Gap { from: BoundaryInstant, to: BoundaryInstant, before: OffsetPair, after: OffsetPair },

    /// A span of wall-clock time that happened twice: again the two
    /// instants coincide in UTC, but the wall clock fell back from the
    /// end to the start.
    Overlap { from: BoundaryInstant, to: BoundaryInstant },
}
