//! Shrinking built periods into their compact, queryable form.
//!
//! The builder’s output carries every boundary in five representations,
//! because building needs all of them. Lookups don’t: a UTC lookup
//! compares Unix seconds, a wall-clock lookup compares seconds on the
//! year-zero scale, and only gap boundaries are ever reported back to
//! callers as civil datetimes. Everything else is dropped here, the
//! offset fields take their outward-facing names, and the list is
//! reversed so that lookups walk it newest-first.

use cal::CivilDateTime;
use tz::model::{Boundary, OffsetPair, RawPeriod, RawRegular, Recurrence};

#[cfg(feature = "with_serde")]
use serde::{Deserialize, Serialize};


/// One end of a compiled period: the two integer keys lookups compare
/// on, or an open end.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub enum Edge {

    /// Open towards the past.
    Min,

    /// A concrete boundary instant.
    At {

        /// Seconds since the Unix epoch.
        unix_time: i64,

        /// Seconds since `0000-01-01 00:00:00` on the wall clock.
        wall_seconds: i64,
    },

    /// Open towards the future.
    Max,
}


/// A compiled span of uniform clock behaviour.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct RegularPeriod {

    /// Where the period starts.
    pub from: Edge,

    /// Where the period ends.
    pub to: Edge,

    /// The zone’s standard offset from UTC during the period, in
    /// seconds.
    pub utc_offset: i64,

    /// The extra offset from standard time during the period, in
    /// seconds, better known as the daylight-saving amount. Zero means
    /// the period is on standard time.
    pub std_offset: i64,

    /// The zone abbreviation during the period, such as `CEST`.
    pub zone_abbr: String,

    /// For open-ended periods built from a recurring rule: what is
    /// needed to re-expand them for a specific year.
    pub recurrence: Option<Recurrence>,
}

impl RegularPeriod {

    /// The period’s total offset from UTC, in seconds.
    pub fn total_offset(&self) -> i64 {
        self.utc_offset + self.std_offset
    }
}


/// The offsets on one side of a gap, reported to callers so they can
/// see what the clock jumped between.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct GapSide {

    /// The standard offset from UTC on this side of the gap.
    pub utc_offset: i64,

    /// The daylight-saving offset on this side of the gap.
    pub std_offset: i64,
}


/// One end of a gap period. Unlike every other boundary, gap boundaries
/// keep their wall-clock civil datetime: they are the “the clock jumped
/// from 02:00 to 03:00” part of a gap report.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct GapEdge {

    /// The wall-clock reading at this end of the gap.
    pub wall: CivilDateTime,

    /// Seconds since the Unix epoch. Both ends of a gap sit on the
    /// *same* instant; only the wall clock disagrees.
    pub unix_time: i64,

    /// Seconds since `0000-01-01 00:00:00` on the wall clock.
    pub wall_seconds: i64,
}


/// A compiled span of wall-clock time that never happened.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct GapPeriod {

    /// The wall-clock reading the clock jumped from.
    pub from: GapEdge,

    /// The wall-clock reading the clock jumped to.
    pub to: GapEdge,

    /// The offsets in force before the jump.
    pub before: GapSide,

    /// The offsets in force after the jump.
    pub after: GapSide,
}


/// A compiled span of wall-clock time that happened twice.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct OverlapPeriod {

    /// Where the repeated span starts: the *later* period’s first
    /// wall-clock reading.
    pub from: Edge,

    /// Where the repeated span ends: the *earlier* period’s last
    /// wall-clock reading.
    pub to: Edge,
}


/// A compiled period of any kind.
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub enum CompiledPeriod {
    Regular(RegularPeriod),
    Gap(GapPeriod),
    Overlap(OverlapPeriod),
}

impl CompiledPeriod {

    /// The period’s wall-clock span as `(from, to)` keys on the
    /// year-zero seconds scale, with `None` for an open end.
    pub(crate) fn wall_span(&self) -> (Option<i64>, Option<i64>) {
        match *self {
            CompiledPeriod::Regular(ref period) => (edge_wall(&period.from), edge_wall(&period.to)),
            CompiledPeriod::Overlap(ref period) => (edge_wall(&period.from), edge_wall(&period.to)),
            CompiledPeriod::Gap(ref period) => (Some(period.from.wall_seconds), Some(period.to.wall_seconds)),
        }
    }

    /// Whether the period’s wall-clock span contains the given key.
    pub(crate) fn wall_contains(&self, wall_seconds: i64) -> bool {
        let (from, to) = self.wall_span();
        from.map_or(true, |from| from <= wall_seconds)
            && to.map_or(true, |to| wall_seconds < to)
    }

    /// The period’s UTC span as `(from, to)` in Unix seconds, with
    /// `None` for an open end. Gap and overlap periods are empty on
    /// this axis, as both their ends sit on one instant.
    pub(crate) fn unix_span(&self) -> (Option<i64>, Option<i64>) {
        match *self {
            CompiledPeriod::Regular(ref period) => (edge_unix(&period.from), edge_unix(&period.to)),
            CompiledPeriod::Overlap(ref period) => (edge_unix(&period.from), edge_unix(&period.to)),
            CompiledPeriod::Gap(ref period) => (Some(period.from.unix_time), Some(period.to.unix_time)),
        }
    }
}

fn edge_wall(edge: &Edge) -> Option<i64> {
    match *edge {
        Edge::At { wall_seconds, .. } => Some(wall_seconds),
        _ => None,
    }
}

fn edge_unix(edge: &Edge) -> Option<i64> {
    match *edge {
        Edge::At { unix_time, .. } => Some(unix_time),
        _ => None,
    }
}


/// Converts a freshly-built period list into its compiled form,
/// reversing it into newest-first order along the way.
pub(crate) fn shrink(built: Vec<RawPeriod>) -> Vec<CompiledPeriod> {
    let mut compiled: Vec<_> = built.into_iter().map(compile).collect();

    // Most queries are about the recent past or near future, so the
    // lookup walk wants the newest periods first.
    compiled.reverse();
    compiled
}

fn compile(period: RawPeriod) -> CompiledPeriod {
    match period {
        RawPeriod::Regular(period) => CompiledPeriod::Regular(compile_regular(period)),

        RawPeriod::Gap { from, to, before, after } => CompiledPeriod::Gap(GapPeriod {
            from: GapEdge { wall: from.wall, unix_time: from.unix_time, wall_seconds: from.wall_seconds },
            to: GapEdge { wall: to.wall, unix_time: to.unix_time, wall_seconds: to.wall_seconds },
            before: side(before),
            after: side(after),
        }),

        RawPeriod::Overlap { from, to } => CompiledPeriod::Overlap(OverlapPeriod {
            from: Edge::At { unix_time: from.unix_time, wall_seconds: from.wall_seconds },
            to: Edge::At { unix_time: to.unix_time, wall_seconds: to.wall_seconds },
        }),
    }
}

fn compile_regular(period: RawRegular) -> RegularPeriod {
    RegularPeriod {
        from: edge(&period.from),
        to: edge(&period.to),
        utc_offset: period.utc_offset,
        std_offset: period.dst_offset,
        zone_abbr: period.abbr,
        recurrence: period.recurrence,
    }
}

fn side(offsets: OffsetPair) -> GapSide {
    GapSide { utc_offset: offsets.utc_offset, std_offset: offsets.dst_offset }
}

fn edge(boundary: &Boundary) -> Edge {
    match *boundary {
        Boundary::Min => Edge::Min,
        Boundary::Max => Edge::Max,
        Boundary::At(ref instant) => Edge::At {
            unix_time: instant.unix_time,
            wall_seconds: instant.wall_seconds,
        },
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use cal::CivilDateTime;
    use cal::Month::*;
    use tz::model::{BoundaryInstant, TimeType};

    fn instant(year: i64, month: ::cal::Month, day: i8, hour: i8) -> BoundaryInstant {
        let datetime = CivilDateTime::ymd_hms(year, month, day, hour, 0, 0).unwrap();
        BoundaryInstant::from_civil(datetime, TimeType::UTC, 3600, 0)
    }

    fn regular(from: Boundary, to: Boundary, abbr: &str) -> RawPeriod {
        RawPeriod::Regular(RawRegular {
            from, to,
            utc_offset: 3600,
            dst_offset: 0,
            abbr: abbr.to_owned(),
            recurrence: None,
        })
    }

    #[test]
    fn shrinking_reverses() {
        let built = vec![
            regular(Boundary::Min, Boundary::At(instant(1940, June, 14, 23)), "OLD"),
            regular(Boundary::At(instant(1940, June, 14, 23)), Boundary::Max, "NEW"),
        ];

        let compiled = shrink(built);
        assert_eq!(compiled.len(), 2);

        match (&compiled[0], &compiled[1]) {
            (&CompiledPeriod::Regular(ref newest), &CompiledPeriod::Regular(ref oldest)) => {
                assert_eq!(newest.zone_abbr, "NEW");
                assert_eq!(newest.to, Edge::Max);
                assert_eq!(oldest.zone_abbr, "OLD");
                assert_eq!(oldest.from, Edge::Min);
            }
            other => panic!("unexpected periods {:?}", other),
        }
    }

    #[test]
    fn offsets_take_their_external_names() {
        let built = vec![ RawPeriod::Regular(RawRegular {
            from: Boundary::Min,
            to: Boundary::Max,
            utc_offset: -18000,
            dst_offset: 3600,
            abbr: "EDT".to_owned(),
            recurrence: None,
        }) ];

        match shrink(built).remove(0) {
            CompiledPeriod::Regular(period) => {
                assert_eq!(period.utc_offset, -18000);
                assert_eq!(period.std_offset, 3600);
                assert_eq!(period.total_offset(), -14400);
            }
            other => panic!("unexpected period {:?}", other),
        }
    }

    #[test]
    fn wall_spans() {
        let open = RegularPeriod {
            from: Edge::Min,
            to: Edge::At { unix_time: 0, wall_seconds: 1000 },
            utc_offset: 0,
            std_offset: 0,
            zone_abbr: "X".to_owned(),
            recurrence: None,
        };

        let period = CompiledPeriod::Regular(open);
        assert!(period.wall_contains(-5000));
        assert!(period.wall_contains(999));
        assert!(!period.wall_contains(1000));
    }
}
