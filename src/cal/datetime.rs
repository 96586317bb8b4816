//! Dates and times on the proleptic Gregorian calendar, with second
//! precision and no attached time zone.

use std::error::Error as ErrorTrait;
use std::fmt;

use util::RangeExt;

#[cfg(feature = "with_serde")]
use serde::{Deserialize, Serialize};

use self::Month::*;


/// Number of days guaranteed to be in four years.
const DAYS_IN_4Y:   i64 = 365 *   4 +  1;

/// Number of days guaranteed to be in a hundred years.
const DAYS_IN_100Y: i64 = 365 * 100 + 24;

/// Number of days guaranteed to be in four hundred years.
const DAYS_IN_400Y: i64 = 365 * 400 + 97;

/// Number of seconds in a day. As everywhere in this library, leap
/// seconds are simply ignored.
pub(crate) const SECONDS_IN_DAY: i64 = 86400;


/// Number of days between **1st January, year 0** and **1st March,
/// year 0**, the anchor the cycle calculations below are based on.
///
/// Anchoring the maths immediately after a possible leap-year day makes
/// the day-to-date calculation come out a *lot* simpler: the Gregorian
/// calendar operates on a 400-year cycle, year 0 is a multiple of 400,
/// and placing the anchor on the 1st of March puts the leap day at the
/// very *end* of a cycle, reducing everything to plain division.
///
/// Counting from year 0 rather than 1970 is not nostalgia: the number of
/// seconds since `0000-01-01 00:00:00` is the key that wall-clock
/// datetimes are matched on, so the calendar has to speak it natively.
const MARCH_ANCHOR_DIFFERENCE: i64 = 31 + 29;

/// Number of seconds between **1st January, year 0** and the Unix epoch,
/// **1st January, 1970** (which is 719,528 days later).
pub(crate) const UNIX_EPOCH_SECONDS: i64 = 719_528 * SECONDS_IN_DAY;


/// This rather strange triangle is an array of the number of days elapsed
/// at the end of each month, starting at the beginning of March (the
/// first month after the anchor above), going backwards, ignoring
/// February.
const TIME_TRIANGLE: &[i64; 11] =
    &[31 + 30 + 31 + 30 + 31 + 31 + 30 + 31 + 30 + 31 + 31,  // January
      31 + 30 + 31 + 30 + 31 + 31 + 30 + 31 + 30 + 31,  // December
      31 + 30 + 31 + 30 + 31 + 31 + 30 + 31 + 30,  // November
      31 + 30 + 31 + 30 + 31 + 31 + 30 + 31,  // October
      31 + 30 + 31 + 30 + 31 + 31 + 30,  // September
      31 + 30 + 31 + 30 + 31 + 31,  // August
      31 + 30 + 31 + 30 + 31,  // July
      31 + 30 + 31 + 30,  // June
      31 + 30 + 31,  // May
      31 + 30,  // April
      31]; // March


/// A **civil date-time** is a point on a wall calendar and clock: a year,
/// month, day, hour, minute, and second, with no time zone attached.
///
/// Values are ordered field-by-field, which coincides with chronological
/// order. Construction is checked, so an instance always denotes a date
/// that actually exists on the (proleptic Gregorian) calendar.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub struct CivilDateTime {
    year:   i64,
    month:  Month,
    day:    i8,
    hour:   i8,
    minute: i8,
    second: i8,
}

impl CivilDateTime {

    /// Creates a new civil date-time from the given year, month, day,
    /// hour, minute, and second fields.
    ///
    /// The values are checked for validity before instantiation, and
    /// passing in values out of range will return an error.
    ///
    /// ### Examples
    ///
    /// ```
    /// use zoneinfo_periods::{CivilDateTime, Month};
    ///
    /// let datetime = CivilDateTime::ymd_hms(1969, Month::July, 20, 20, 17, 0).unwrap();
    /// assert_eq!(datetime.year(), 1969);
    /// assert_eq!(datetime.day(), 20);
    ///
    /// assert!(CivilDateTime::ymd_hms(1969, Month::February, 29, 0, 0, 0).is_err());
    /// ```
    pub fn ymd_hms(year: i64, month: Month, day: i8, hour: i8, minute: i8, second: i8) -> Result<CivilDateTime, Error> {
        if day >= 1 && day <= month.days_in_month(is_leap_year(year))
        && hour.is_within(0..24)
        && minute.is_within(0..60)
        && second.is_within(0..60)
        {
            Ok(CivilDateTime { year, month, day, hour, minute, second })
        }
        else {
            Err(Error::OutOfRange)
        }
    }

    /// The year, in absolute (human-readable) terms.
    pub fn year(&self) -> i64 { self.year }

    /// The month of the year.
    pub fn month(&self) -> Month { self.month }

    /// The day of the month, from 1 to 31.
    pub fn day(&self) -> i8 { self.day }

    /// The hour of the day, from 0 to 23.
    pub fn hour(&self) -> i8 { self.hour }

    /// The minute of the hour, from 0 to 59.
    pub fn minute(&self) -> i8 { self.minute }

    /// The second of the minute, from 0 to 59.
    pub fn second(&self) -> i8 { self.second }

    /// The day of the week.
    pub fn weekday(&self) -> Weekday {
        days_to_weekday(self.days_from_year_zero())
    }

    /// The number of seconds between `0000-01-01 00:00:00` and this
    /// date-time.
    pub fn gregorian_seconds(&self) -> i64 {
        self.days_from_year_zero() * SECONDS_IN_DAY
            + self.hour as i64 * 3600
            + self.minute as i64 * 60
            + self.second as i64
    }

    /// Computes a complete date-time from a number of seconds since
    /// `0000-01-01 00:00:00`.
    pub fn from_gregorian_seconds(seconds: i64) -> CivilDateTime {

        // Just split the input value into days and seconds, and let the
        // date and time halves do all the hard work.
        let (days, secs) = split_cycles(seconds, SECONDS_IN_DAY);
        let (year, month, day) = date_from_days(days);

        CivilDateTime {
            year, month, day,
            hour:   (secs / 60 / 60) as i8,
            minute: (secs / 60 % 60) as i8,
            second: (secs % 60) as i8,
        }
    }

    /// The number of seconds between the Unix epoch and this date-time,
    /// read as a UTC date-time.
    pub fn unix_seconds(&self) -> i64 {
        self.gregorian_seconds() - UNIX_EPOCH_SECONDS
    }

    /// Computes a complete date-time from a number of seconds since the
    /// Unix epoch, **midnight, 1st January, 1970**.
    pub fn from_unix_seconds(seconds: i64) -> CivilDateTime {
        CivilDateTime::from_gregorian_seconds(seconds + UNIX_EPOCH_SECONDS)
    }

    /// Returns the date-time the given number of seconds after this one
    /// (or before it, for a negative number).
    ///
    /// ### Examples
    ///
    /// ```
    /// use zoneinfo_periods::{CivilDateTime, Month};
    ///
    /// let datetime = CivilDateTime::ymd_hms(2021, Month::March, 28, 2, 0, 0).unwrap();
    /// let shifted = datetime.add_seconds(3600);
    /// assert_eq!(shifted.hour(), 3);
    /// ```
    pub fn add_seconds(&self, seconds: i64) -> CivilDateTime {
        CivilDateTime::from_gregorian_seconds(self.gregorian_seconds() + seconds)
    }

    /// Calculates the number of days that have elapsed between
    /// `0000-01-01` and this date.
    fn days_from_year_zero(&self) -> i64 {
        let (num_400y_cycles, years) = split_cycles(self.year, 400);

        // Count the leap days in the current 400-year cycle that fall
        // before the current year: one for every fourth year, minus one
        // for every hundredth, plus the one for the cycle-opening year
        // itself once any years of the cycle have passed at all.
        let leap_days_elapsed = (years + 3) / 4
                              - (years + 99) / 100
                              + if years > 0 { 1 } else { 0 };

        num_400y_cycles * DAYS_IN_400Y
            + years * 365
            + leap_days_elapsed
            + self.month.days_before_start() as i64
            + if is_leap_year(self.year) && self.month >= March { 1 } else { 0 }
            + (self.day - 1) as i64
    }
}

impl fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.year.is_within(0..10000) {
            write!(f, "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                   self.year, self.month as i8, self.day,
                   self.hour, self.minute, self.second)
        }
        else {
            write!(f, "{:+05}-{:02}-{:02}T{:02}:{:02}:{:02}",
                   self.year, self.month as i8, self.day,
                   self.hour, self.minute, self.second)
        }
    }
}

impl fmt::Debug for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CivilDateTime({})", self)
    }
}


/// Computes a year, month, and day given the number of days that have
/// passed since `0000-01-01`.
fn date_from_days(days: i64) -> (i64, Month, i8) {

    // The Gregorian calendar works in 400-year cycles, which repeat
    // themselves ever after.
    //
    // This calculation works by finding the number of 400-year,
    // 100-year, and 4-year cycles, then constantly subtracting the
    // number of leftover days.
    let (num_400y_cycles, mut remainder) = split_cycles(days - MARCH_ANCHOR_DIFFERENCE, DAYS_IN_400Y);

    // Calculate the numbers of 100-year cycles, 4-year cycles, and
    // leftover years, continually reducing the number of days left to
    // think about.
    //
    // The 100-year count has to be capped at three: the last day of a
    // 400-year cycle is the leap day that the fourth century is one day
    // short of, and dividing it through would place it in a fifth one.
    let num_100y_cycles = std::cmp::min(remainder / DAYS_IN_100Y, 3);
    remainder -= num_100y_cycles * DAYS_IN_100Y;  // remainder is now days left in this 100-year cycle

    let num_4y_cycles = remainder / DAYS_IN_4Y;
    remainder -= num_4y_cycles * DAYS_IN_4Y;  // remainder is now days left in this 4-year cycle

    let mut years = std::cmp::min(remainder / 365, 3);
    remainder -= years * 365;  // remainder is now days left in this year

    // Work out the month and number of days into the month by scanning
    // the time triangle, finding the month that has the correct number
    // of days elapsed at the end of it.
    // (it’s “11 - index” below because the triangle goes backwards)
    let result = TIME_TRIANGLE.iter()
                              .enumerate()
                              .find(|&(_, days)| *days <= remainder);

    let (mut month, month_days) = match result {
        Some((index, days)) => (11 - index as i8, remainder - *days),
        None => (0, remainder),  // No month found? Then it’s March.
    };

    // Need to add 2 to the month in order to compensate for the anchor
    // being in March.
    month += 2;

    // Turn all those cycles into an actual number of years.
    years +=   4 * num_4y_cycles
           + 100 * num_100y_cycles
           + 400 * num_400y_cycles;

    if month >= 12 {
        years += 1;   // wrap around for January and February
        month -= 12;  // (yes, again)
    }

    // The check immediately above means we can `unwrap` this, as the
    // month number is guaranteed to be in the range (0..12).
    let month_variant = Month::from_zero(month).unwrap();

    // Finally, adjust the day number for human reasons: the first day
    // of the month is the 1st, rather than the 0th.
    (years, month_variant, (month_days + 1) as i8)
}

/// Computes the weekday, given the number of days that have passed
/// since `0000-01-01`.
fn days_to_weekday(days: i64) -> Weekday {
    // The 1st of January, year 0 was a Saturday, five days on from a
    // week starting on a Monday.
    let weekday = (days + 5) % 7;

    // We can unwrap since we’ve already done the bounds checking.
    Weekday::from_zero(if weekday < 0 { weekday + 7 } else { weekday } as i8).unwrap()
}

/// Split a number of years into a number of year-cycles, and the number
/// of years left over that don’t fit into a cycle. This is also used
/// for day-cycles and second-cycles.
///
/// This is essentially a division operation with the result and the
/// remainder, with the difference that a negative value gets ‘wrapped
/// around’ to be a positive value, owing to the way the modulo operator
/// works for negative values.
fn split_cycles(number_of_periods: i64, cycle_length: i64) -> (i64, i64) {
    let mut cycles    = number_of_periods / cycle_length;
    let mut remainder = number_of_periods % cycle_length;

    if remainder < 0 {
        remainder += cycle_length;
        cycles    -= 1;
    }

    (cycles, remainder)
}


/// Returns whether the given year is a leap year.
///
/// ### Examples
///
/// ```
/// use zoneinfo_periods::cal::is_leap_year;
///
/// assert_eq!(is_leap_year(2000), true);
/// assert_eq!(is_leap_year(1900), false);
/// assert_eq!(is_leap_year(2024), true);
/// ```
pub fn is_leap_year(year: i64) -> bool {
    let (_, remainder) = split_cycles(year, 400);
    remainder == 0 || (remainder % 100 != 0 && remainder % 4 == 0)
}


#[derive(PartialEq, Debug, Copy, Clone)]
pub enum Error {
    OutOfRange,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "datetime field out of range")
    }
}

impl ErrorTrait for Error {
}


/// A month of the year, starting with January, and ending with December.
///
/// This is stored as an enum instead of just a number to prevent
/// off-by-one errors: is month 2 February (1-indexed) or March
/// (0-indexed)? In this case, it’s 1-indexed, to have January become 1
/// when you use `as i8` in code.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub enum Month {
    January =  1, February =  2, March     =  3,
    April   =  4, May      =  5, June      =  6,
    July    =  7, August   =  8, September =  9,
    October = 10, November = 11, December  = 12,
}

impl Month {

    /// Returns the number of days in this month, depending on whether
    /// it’s a leap year or not.
    pub fn days_in_month(self, leap_year: bool) -> i8 {
        match self {
            January   => 31, February  => if leap_year { 29 } else { 28 },
            March     => 31, April     => 30,
            May       => 31, June      => 30,
            July      => 31, August    => 31,
            September => 30, October   => 31,
            November  => 30, December  => 31,
        }
    }

    /// Returns the number of days that have elapsed in a year *before*
    /// this month begins, with no leap year check.
    fn days_before_start(self) -> i16 {
        match self {
            January =>   0, February =>  31, March     =>  59,
            April   =>  90, May      => 120, June      => 151,
            July    => 181, August   => 212, September => 243,
            October => 273, November => 304, December  => 334,
        }
    }

    /// Returns the month based on a number, with January as month 0,
    /// February as month 1, and so on.
    fn from_zero(month: i8) -> Result<Month, Error> {
        match month {
             0 => Ok(January),   1 => Ok(February),   2 => Ok(March),
             3 => Ok(April),     4 => Ok(May),        5 => Ok(June),
             6 => Ok(July),      7 => Ok(August),     8 => Ok(September),
             9 => Ok(October),  10 => Ok(November),  11 => Ok(December),
             _ => Err(Error::OutOfRange),
        }
    }
}


/// A day of the week, starting with Monday, and ending with Sunday.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[cfg_attr(feature = "with_serde", derive(Serialize, Deserialize))]
pub enum Weekday {
    Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday,
}

impl Weekday {

    /// The number of days this weekday is from Monday, with Monday as
    /// day 0, Tuesday as day 1, and so on.
    pub fn days_from_monday(self) -> i8 {
        self as i8
    }

    /// The weekday the given number of days after this one.
    pub(crate) fn from_days_ahead(start: Weekday, days: i8) -> Weekday {
        // We can unwrap here, as the remainder is guaranteed to be in
        // the range (0..7).
        Weekday::from_zero(((start.days_from_monday() + days % 7) % 7 + 7) % 7).unwrap()
    }

    /// Returns the weekday based on a number, with Monday as day 0,
    /// Tuesday as day 1, and so on.
    fn from_zero(weekday: i8) -> Result<Weekday, Error> {
        match weekday {
            0 => Ok(Weekday::Monday),    1 => Ok(Weekday::Tuesday),
            2 => Ok(Weekday::Wednesday), 3 => Ok(Weekday::Thursday),
            4 => Ok(Weekday::Friday),    5 => Ok(Weekday::Saturday),
            6 => Ok(Weekday::Sunday),
            _ => Err(Error::OutOfRange),
        }
    }
}
