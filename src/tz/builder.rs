//! Building a zone’s period list out of its zone lines and rule sets.
//!
//! The builder folds a zone’s lines in order, threading the previously
//! emitted period through so that every new period starts exactly where
//! the last one ended: on the same UTC instant, even when the wall
//! clock disagrees about what that instant is called. Lines that defer
//! to a named rule set are expanded into one period per applicable rule
//! span; lines with a fixed saving become a single period.

use std::collections::HashMap;

use cal::CivilDateTime;
use tz::Structural;
use tz::model::{Bound, Boundary, BoundaryInstant, RawPeriod, RawRegular, Recurrence, Rule, Saving, TimeType, ZoneLine};


/// The builder for a single zone’s periods. All of the state lives in
/// the output list and the threaded previous period, so building is
/// freely re-entrant; the dynamic extension path relies on being able
/// to run a second, tiny build in the middle of a lookup.
pub(crate) struct PeriodBuilder<'z> {
    zone: &'z str,
    periods: Vec<RawPeriod>,
}

impl<'z> PeriodBuilder<'z> {

    /// Builds the ordered period list for one zone from its lines,
    /// resolving named rule sets through the given map.
    pub fn build(zone: &'z str, lines: &[ZoneLine], rule_sets: &HashMap<String, Vec<Rule>>) -> Result<Vec<RawPeriod>, Structural> {
        let mut builder = PeriodBuilder { zone, periods: Vec::new() };
        let mut previous: Option<RawRegular> = None;

        for line in lines {
            builder.check_stitch(previous.as_ref(), line)?;

            previous = Some(match line.saving {
                Saving::NoSaving       => builder.push_fixed(previous.as_ref(), line, 0)?,
                Saving::Fixed(amount)  => builder.push_fixed(previous.as_ref(), line, amount)?,
                Saving::Named(ref name) => {
                    match rule_sets.get(name) {
                        Some(rules) => builder.push_rule_spans(previous, line, rules)?,
                        None => return Err(Structural::MissingRuleSet {
                            zone: zone.to_owned(),
                            name: name.clone(),
                        }),
                    }
                }
            });
        }

        debug!("built {} periods for zone {:?}", builder.periods.len(), zone);
        Ok(builder.periods)
    }

    /// Checks that a line beginning at a concrete datetime begins
    /// exactly where the previous line’s last period ends, read on the
    /// same type of clock.
    fn check_stitch(&self, previous: Option<&RawRegular>, line: &ZoneLine) -> Result<(), Structural> {
        let (datetime, time_type) = match line.from {
            Bound::At(datetime, time_type) => (datetime, time_type),
            _ => return Ok(()),
        };

        let previous = match previous {
            Some(previous) => previous,
            None => return Ok(()),
        };

        match previous.to.instant() {
            Some(instant) if instant.civil(time_type) == datetime => Ok(()),
            Some(instant) => Err(Structural::BrokenStitch {
                zone: self.zone.to_owned(),
                expected: datetime,
                found: Some(instant.civil(time_type)),
            }),
            None => Err(Structural::BrokenStitch {
                zone: self.zone.to_owned(),
                expected: datetime,
                found: None,
            }),
        }
    }

    /// Emits the single period for a line with no rules, just a fixed
    /// (possibly zero) saving.
    fn push_fixed(&mut self, previous: Option<&RawRegular>, line: &ZoneLine, dst_offset: i64) -> Result<RawRegular, Structural> {
        let period = RawRegular {
            from: start_boundary(previous, line, dst_offset),
            to: close_boundary(line.to, line.utc_offset, dst_offset),
            utc_offset: line.utc_offset,
            dst_offset,
            abbr: line.format.format(dst_offset, ""),
            recurrence: None,
        };

        self.append(previous, period)
    }

    /// Emits one period per applicable rule span of a line that defers
    /// to a named rule set.
    fn push_rule_spans(&mut self, previous: Option<RawRegular>, line: &ZoneLine, rules: &[Rule]) -> Result<RawRegular, Structural> {
        let applicable = applicable_rules(previous.as_ref(), line, rules);
        let spans = pad_and_trim(previous.as_ref(), line, rules, applicable);

        let mut previous = previous;
        for span in &spans {
            let to = close_boundary(span.to, line.utc_offset, span.dst_offset);

            let recurrence = match (&to, &span.recurrence) {
                (&Boundary::Max, &Some(ref raw)) => Some(Recurrence {
                    rule: raw.clone(),
                    line: line.clone(),
                }),
                _ => None,
            };

            let period = RawRegular {
                from: span_start_boundary(previous.as_ref(), line, span),
                to,
                utc_offset: line.utc_offset,
                dst_offset: span.dst_offset,
                abbr: line.format.format(span.dst_offset, &span.letter),
                recurrence,
            };

            previous = Some(self.append(previous.as_ref(), period)?);
        }

        // pad_and_trim never returns an empty list, so a period has
        // always been emitted by this point.
        match previous {
            Some(previous) => Ok(previous),
            None => Err(Structural::NoPeriod { zone: self.zone.to_owned(), unix_time: 0 }),
        }
    }

    /// Records a new regular period, preceded by whatever synthetic
    /// period its offsets call for.
    fn append(&mut self, previous: Option<&RawRegular>, period: RawRegular) -> Result<RawRegular, Structural> {
        if let Some(previous) = previous {
            self.bridge(previous, &period)?;
        }

        if let (Some(from), Some(to)) = (period.from.instant(), period.to.instant()) {
            if from.unix_time == to.unix_time {
                return Err(Structural::DegeneratePeriod {
                    zone: self.zone.to_owned(),
                    at: from.unix_time,
                });
            }
        }

        self.periods.push(RawPeriod::Regular(period.clone()));
        Ok(period)
    }

    /// Inserts a gap or overlap period between two adjacent regular
    /// periods whose total offsets differ. Their boundary instants must
    /// coincide in UTC for the synthetic period to mean anything.
    fn bridge(&mut self, previous: &RawRegular, next: &RawRegular) -> Result<(), Structural> {
        if previous.to.is_max() {
            // Nothing comes after an open tail.
            return Ok(());
        }

        let end = match previous.to.instant() {
            Some(end) => *end,
            None => return Ok(()),
        };

        let start = match next.from.instant() {
            Some(start) => *start,
            None => return Ok(()),
        };

        if end.unix_time != start.unix_time {
            return Err(Structural::SplitBoundary {
                zone: self.zone.to_owned(),
                earlier: end.unix_time,
                later: start.unix_time,
            });
        }

        let difference = next.total_offset() - previous.total_offset();

        if difference > 0 {
            trace!("gap of {}s in zone {:?} at {}", difference, self.zone, end.wall);
            self.periods.push(RawPeriod::Gap {
                from: end,
                to: start,
                before: previous.offsets(),
                after: next.offsets(),
            });
        }
        else if difference < 0 {
            trace!("overlap of {}s in zone {:?} at {}", -difference, self.zone, end.wall);
            self.periods.push(RawPeriod::Overlap { from: start, to: end });
        }

        Ok(())
    }
}


/// Where a fixed-saving line’s period starts.
fn start_boundary(previous: Option<&RawRegular>, line: &ZoneLine, dst_offset: i64) -> Boundary {
    match (line.from, previous) {
        (Bound::Min, _) => Boundary::Min,
        (Bound::Max, _) => Boundary::Max,
        (Bound::At(datetime, time_type), None) => {
            Boundary::At(BoundaryInstant::from_civil(datetime, time_type, line.utc_offset, dst_offset))
        }
        (Bound::At(..), Some(previous)) => shifted_start(previous, line.utc_offset, dst_offset),
    }
}

/// Where a rule span’s period starts.
fn span_start_boundary(previous: Option<&RawRegular>, line: &ZoneLine, span: &Rule) -> Boundary {
    match previous {

        // The very first period of the zone takes the line’s own start,
        // read on the standard clock.
        None => close_boundary(line.from, line.utc_offset, 0),

        // After an open-ended period there is no boundary to continue
        // from, so the span’s own start is used, read under the
        // *previous* saving, because that is the clock the span’s start
        // is observed on.
        Some(previous) if previous.to.is_max() => {
            close_boundary(span.from, line.utc_offset, previous.dst_offset)
        }

        // Otherwise the new period starts at the very instant the
        // previous one ends.
        Some(previous) => shifted_start(previous, line.utc_offset, span.dst_offset),
    }
}

/// The boundary at the exact UTC instant the previous period ends,
/// re-expressed under a new pair of offsets: the old wall reading,
/// shifted by the change in total offset, lands on the new wall clock.
fn shifted_start(previous: &RawRegular, utc_offset: i64, dst_offset: i64) -> Boundary {
    match previous.to.instant() {
        Some(end) => {
            let difference = (utc_offset + dst_offset) - previous.total_offset();
            let wall = end.wall.add_seconds(difference);
            Boundary::At(BoundaryInstant::from_civil(wall, TimeType::Wall, utc_offset, dst_offset))
        }
        None => Boundary::Min,
    }
}

/// Translates an input-side bound into a period boundary under the
/// given offsets.
fn close_boundary(bound: Bound, utc_offset: i64, dst_offset: i64) -> Boundary {
    match bound {
        Bound::Min => Boundary::Min,
        Bound::Max => Boundary::Max,
        Bound::At(datetime, time_type) => {
            Boundary::At(BoundaryInstant::from_civil(datetime, time_type, utc_offset, dst_offset))
        }
    }
}


/// Selects the rules of a set whose active spans overlap the zone
/// line’s span.
///
/// The running saving matters here: a rule’s start is observed on the
/// clock left behind by whatever was in force before it, so the saving
/// of the last *included* rule is carried forward into the next
/// comparison.
fn applicable_rules<'r>(previous: Option<&RawRegular>, line: &ZoneLine, rules: &'r [Rule]) -> Vec<&'r Rule> {
    let utc_offset = match previous {
        Some(previous) => previous.utc_offset,
        None => line.utc_offset,
    };
    let mut running_dst = previous.map_or(0, |p| p.dst_offset);

    let mut applicable = Vec::new();
    for rule in rules {
        let include = match (line.to, rule.to) {
            (Bound::Max, Bound::Max) => true,
            (Bound::Max, Bound::At(end, end_type)) => {
                ends_after_previous(previous, end, end_type)
            }
            (Bound::At(line_end, line_type), Bound::Max) => {
                starts_before(rule, line_end, line_type, utc_offset, running_dst)
            }
            (Bound::At(line_end, line_type), Bound::At(end, end_type)) => {
                ends_after_previous(previous, end, end_type)
                    && starts_before(rule, line_end, line_type, utc_offset, running_dst)
            }

            // A line or rule that ends before it begins describes
            // nothing.
            _ => false,
        };

        if include {
            running_dst = rule.dst_offset;
            applicable.push(rule);
        }
    }

    applicable
}

/// Whether a rule ending at the given datetime ends after the zone’s
/// previous period does, read on the rule’s own type of clock.
fn ends_after_previous(previous: Option<&RawRegular>, end: CivilDateTime, end_type: TimeType) -> bool {
    match previous {
        None => true,
        Some(previous) => match previous.to {
            Boundary::Min => true,
            Boundary::Max => false,
            Boundary::At(ref instant) => instant.civil(end_type) < end,
        },
    }
}

/// Whether a rule starts before the zone line ends, read on the line’s
/// type of clock under the given offsets.
fn starts_before(rule: &Rule, line_end: CivilDateTime, line_type: TimeType, utc_offset: i64, dst_offset: i64) -> bool {
    match rule.from {
        Bound::Min => true,
        Bound::Max => false,
        Bound::At(datetime, time_type) => {
            let start = BoundaryInstant::from_civil(datetime, time_type, utc_offset, dst_offset);
            line_end > start.civil(line_type)
        }
    }
}


/// Fits the selected rule spans to the zone line’s own span: a span
/// hanging over either end is clipped to the line, and time the line
/// covers before its first rule is filled with a synthetic
/// standard-time span.
fn pad_and_trim(previous: Option<&RawRegular>, line: &ZoneLine, all_rules: &[Rule], applicable: Vec<&Rule>) -> Vec<Rule> {
    let initial_dst = previous.map_or(0, |p| p.dst_offset);
    let mut spans: Vec<Rule> = applicable.into_iter().cloned().collect();

    if spans.is_empty() {
        // A line whose rule set contributes nothing still covers its
        // span; it simply stays on standard time throughout.
        let letter = match line.from {
            Bound::Min => standard_letter(all_rules),
            _ => String::new(),
        };
        return vec![standard_span(line.from, line.to, letter)];
    }

    match line.from {
        Bound::Min => {
            if spans[0].from != Bound::Min {
                // Before the first rule there was standard time, with
                // the abbreviation letter standard time uses elsewhere
                // in the set.
                let first_start = spans[0].from;
                spans.insert(0, standard_span(Bound::Min, first_start, standard_letter(all_rules)));
            }
        }

        Bound::At(line_start, line_type) => {
            match span_start_civil(&spans[0], line.utc_offset, initial_dst, line_type) {
                Some(start) if start > line_start => {
                    let first_start = spans[0].from;
                    spans.insert(0, standard_span(line.from, first_start, String::new()));
                }
                Some(start) if start < line_start => {
                    spans[0].from = line.from;
                }
                _ => {}
            }
        }

        Bound::Max => {}
    }

    if let Bound::At(line_end, line_type) = line.to {
        if let Some(last) = spans.last_mut() {
            let runs_past = match last.to {
                Bound::Max => true,
                Bound::Min => false,
                Bound::At(datetime, time_type) => {
                    BoundaryInstant::from_civil(datetime, time_type, line.utc_offset, last.dst_offset)
                        .civil(line_type) > line_end
                }
            };

            if runs_past {
                last.to = line.to;
            }
        }
    }

    spans
}

/// A span’s start as a civil datetime on the given type of clock, or
/// `None` when the span is unbounded.
fn span_start_civil(span: &Rule, utc_offset: i64, dst_offset: i64, time_type: TimeType) -> Option<CivilDateTime> {
    match span.from {
        Bound::At(datetime, from_type) => {
            Some(BoundaryInstant::from_civil(datetime, from_type, utc_offset, dst_offset).civil(time_type))
        }
        _ => None,
    }
}

/// A synthetic standard-time span.
fn standard_span(from: Bound, to: Bound, letter: String) -> Rule {
    Rule { from, to, dst_offset: 0, letter, recurrence: None }
}

/// The abbreviation letter standard time uses in a rule set: the letter
/// of the first rule with no saving, or nothing if the set never
/// returns to standard time.
fn standard_letter(rules: &[Rule]) -> String {
    match rules.iter().find(|rule| rule.dst_offset == 0) {
        Some(rule) => rule.letter.clone(),
        None => String::new(),
    }
}
