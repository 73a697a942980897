use jiff::{
    Span, ToSpan, Unit,
    civil::{Date, DateTime, Time, Weekday},
};

use crate::{
    error::Error,
    iter::{Dates, Segments, Weekdays},
    weekdate,
};

/// An ordered pair of civil datetimes.
///
/// A period always satisfies `start <= end`. The constructor accepts its
/// endpoints in either order and swaps them when needed, so the invariant
/// holds for every observable period. A zero-length period (`start == end`)
/// is valid.
///
/// Periods are plain values. The accessors [`Period::start`] and
/// [`Period::end`] return copies of the endpoints, never handles into the
/// period itself. The only mutation entry points are the named shift
/// operations ([`Period::add`], [`Period::sub`] and their unit wrappers),
/// which move both endpoints by the same interval and therefore cannot
/// invert their order.
///
/// The textual form of a period is the ISO 8601 time interval shape
/// `<start>/<end>`, available via its `Display` and `FromStr`
/// implementations. Serde support round-trips through that same form.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Period {
    start: DateTime,
    end: DateTime,
}

impl Period {
    /// Creates a new period from two endpoints.
    ///
    /// The endpoints may be given in either order. This is the one place
    /// where normalization happens; everything else in this crate relies
    /// on `start <= end` already holding.
    pub fn new(start: DateTime, end: DateTime) -> Period {
        if start <= end {
            Period { start, end }
        } else {
            Period { start: end, end: start }
        }
    }

    /// Creates a period from endpoints that are already ordered.
    ///
    /// Callers must guarantee `start <= end`. This is used by the
    /// iterators, which construct one period per step from cursor state
    /// whose ordering is structurally guaranteed.
    pub(crate) fn from_ordered(start: DateTime, end: DateTime) -> Period {
        debug_assert!(start <= end);
        Period { start, end }
    }

    /// Creates a one-day period beginning at `start`.
    ///
    /// The end is the first instant of the day following `start`'s date.
    /// This fails only when `start` falls on the last day of Jiff's
    /// supported range.
    pub fn starting(start: DateTime) -> Result<Period, Error> {
        let end = start
            .date()
            .tomorrow()
            .map_err(Error::Arithmetic)?
            .to_datetime(Time::midnight());
        Ok(Period { start, end })
    }

    /// Returns the period spanning the civil day containing `date`.
    pub fn day_of(date: Date) -> Result<Period, Error> {
        Period::starting(date.to_datetime(Time::midnight()))
    }

    /// Returns the period spanning the week containing `date`.
    ///
    /// The starting point of the week is determined by `week_start`. The
    /// period runs from that weekday's midnight to the next one, seven
    /// days later.
    pub fn week_of(date: Date, week_start: Weekday) -> Result<Period, Error> {
        let first = weekdate::first_of_week(week_start, date)?;
        let end = first.checked_add(1.weeks()).map_err(Error::Arithmetic)?;
        Ok(Period::from_ordered(
            first.to_datetime(Time::midnight()),
            end.to_datetime(Time::midnight()),
        ))
    }

    /// Returns the period spanning the calendar month containing `date`.
    pub fn month_of(date: Date) -> Result<Period, Error> {
        let first = date.first_of_month();
        let end = first.checked_add(1.months()).map_err(Error::Arithmetic)?;
        Ok(Period::from_ordered(
            first.to_datetime(Time::midnight()),
            end.to_datetime(Time::midnight()),
        ))
    }

    /// Returns a copy of this period's starting point.
    pub fn start(&self) -> DateTime {
        self.start
    }

    /// Returns a copy of this period's ending point.
    pub fn end(&self) -> DateTime {
        self.end
    }

    /// Returns the number of whole units of `largest` between this
    /// period's endpoints.
    ///
    /// The count is a floor of whole units elapsed, not a rounding: a
    /// period of 13 days has a length of 1 week. Given the ordering
    /// invariant, the count is never negative.
    pub fn length_in(&self, largest: Unit) -> Result<i64, Error> {
        let span = self
            .start
            .until((largest, self.end))
            .map_err(Error::Arithmetic)?;
        Ok(unit_count(&span, largest))
    }

    /// Returns the number of whole years in this period.
    pub fn years(&self) -> Result<i64, Error> {
        self.length_in(Unit::Year)
    }

    /// Returns the number of whole months in this period.
    pub fn months(&self) -> Result<i64, Error> {
        self.length_in(Unit::Month)
    }

    /// Returns the number of whole weeks in this period.
    pub fn weeks(&self) -> Result<i64, Error> {
        self.length_in(Unit::Week)
    }

    /// Returns the number of whole days in this period.
    pub fn days(&self) -> Result<i64, Error> {
        self.length_in(Unit::Day)
    }

    /// Returns the number of whole hours in this period.
    pub fn hours(&self) -> Result<i64, Error> {
        self.length_in(Unit::Hour)
    }

    /// Returns the number of whole minutes in this period.
    pub fn minutes(&self) -> Result<i64, Error> {
        self.length_in(Unit::Minute)
    }

    /// Returns the number of whole seconds in this period.
    pub fn seconds(&self) -> Result<i64, Error> {
        self.length_in(Unit::Second)
    }

    /// Returns true if `point` falls within this period, where the
    /// period's endpoints count as inside it.
    pub fn contains(&self, point: DateTime) -> bool {
        self.contains_with(point, Bounds::Inclusive)
    }

    /// Returns true if `point` falls within this period, where `bounds`
    /// selects whether the endpoints count as inside it.
    pub fn contains_with(&self, point: DateTime, bounds: Bounds) -> bool {
        match bounds {
            Bounds::Inclusive => self.start <= point && point <= self.end,
            Bounds::Exclusive => self.start < point && point < self.end,
        }
    }

    /// Parses `point` as a civil datetime and tests it for membership.
    ///
    /// A date without a time is accepted and refers to that day's
    /// midnight. A malformed datetime is an error.
    pub fn contains_str(
        &self,
        point: &str,
        bounds: Bounds,
    ) -> Result<bool, Error> {
        let point: DateTime = point.parse().map_err(Error::Parse)?;
        Ok(self.contains_with(point, bounds))
    }

    /// Shifts both endpoints of this period forward by `span`, in place,
    /// returning `self` for chaining.
    ///
    /// Both endpoints move by the same interval, so the ordering
    /// invariant is preserved. Note that calendar units are not uniform:
    /// shifting by months can change the period's length in days, since
    /// day numbers are constrained to the target month
    /// (`[Jan 31, Mar 31]` plus one month is `[Feb 28, Apr 30]`).
    ///
    /// This fails when either shifted endpoint would leave Jiff's
    /// supported range, in which case the period is left unchanged.
    pub fn add(&mut self, span: Span) -> Result<&mut Period, Error> {
        let start = self.start.checked_add(span).map_err(Error::Arithmetic)?;
        let end = self.end.checked_add(span).map_err(Error::Arithmetic)?;
        // Jiff's calendar addition is monotone, so shifting both
        // endpoints by the same span cannot invert their order.
        debug_assert!(start <= end);
        self.start = start;
        self.end = end;
        Ok(self)
    }

    /// Shifts both endpoints of this period backward by `span`, in place,
    /// returning `self` for chaining.
    ///
    /// For day and time units, `sub` exactly undoes `add`. For month and
    /// year units it may not, because of day number constraining: adding
    /// one month to `Jan 31` gives `Feb 28`, and subtracting one month
    /// from that gives `Jan 28`.
    pub fn sub(&mut self, span: Span) -> Result<&mut Period, Error> {
        self.add(span.negate())
    }

    /// Shifts this period forward by `n` years.
    pub fn add_years(&mut self, n: i64) -> Result<&mut Period, Error> {
        self.add(Span::new().try_years(n).map_err(Error::Arithmetic)?)
    }

    /// Shifts this period forward by `n` months.
    pub fn add_months(&mut self, n: i64) -> Result<&mut Period, Error> {
        self.add(Span::new().try_months(n).map_err(Error::Arithmetic)?)
    }

    /// Shifts this period forward by `n` days.
    pub fn add_days(&mut self, n: i64) -> Result<&mut Period, Error> {
        self.add(Span::new().try_days(n).map_err(Error::Arithmetic)?)
    }

    /// Shifts this period backward by `n` years.
    pub fn sub_years(&mut self, n: i64) -> Result<&mut Period, Error> {
        self.sub(Span::new().try_years(n).map_err(Error::Arithmetic)?)
    }

    /// Shifts this period backward by `n` months.
    pub fn sub_months(&mut self, n: i64) -> Result<&mut Period, Error> {
        self.sub(Span::new().try_months(n).map_err(Error::Arithmetic)?)
    }

    /// Shifts this period backward by `n` days.
    pub fn sub_days(&mut self, n: i64) -> Result<&mut Period, Error> {
        self.sub(Span::new().try_days(n).map_err(Error::Arithmetic)?)
    }

    /// Returns an iterator over sub-periods of `interval` length.
    ///
    /// Segments begin at this period's start and advance by `interval`.
    /// The final segment is clamped so that it never extends past this
    /// period's end, even when `interval` does not evenly divide the
    /// period's length. At least one segment is always yielded: a
    /// zero-length period yields exactly one zero-length segment.
    ///
    /// This fails when `interval` is zero or negative.
    ///
    /// # Example
    ///
    /// ```
    /// use jiff::ToSpan;
    /// use period::Period;
    ///
    /// let p: Period = "2024-03-01/2024-03-08".parse()?;
    /// let mut segments = p.each(3.days())?;
    /// assert_eq!(
    ///     segments.next().map(|s| s.to_string()),
    ///     Some("2024-03-01T00:00:00/2024-03-04T00:00:00".to_string()),
    /// );
    /// # Ok::<(), period::Error>(())
    /// ```
    pub fn each(&self, interval: Span) -> Result<Segments, Error> {
        Segments::new(*self, interval, None)
    }

    /// Returns an iterator over sub-periods of `n` days each.
    pub fn each_days(&self, n: i64) -> Result<Segments, Error> {
        let interval = Span::new().try_days(n).map_err(Error::Arithmetic)?;
        Segments::new(*self, interval, None)
    }

    /// Returns an iterator over sub-periods of `n` weeks each.
    ///
    /// When this period is shorter than one whole week, the iterator is
    /// empty: there is no week to walk, not even a clamped one. Combine
    /// with [`Segments::only_full`] to also drop the trailing partial
    /// week.
    pub fn each_weeks(&self, n: i64) -> Result<Segments, Error> {
        let interval = Span::new().try_weeks(n).map_err(Error::Arithmetic)?;
        Segments::new(*self, interval, Some(Unit::Week))
    }

    /// Returns an iterator over sub-periods of `n` months each.
    ///
    /// When this period is shorter than one whole month, the iterator is
    /// empty. Combine with [`Segments::only_full`] to also drop the
    /// trailing partial month.
    pub fn each_months(&self, n: i64) -> Result<Segments, Error> {
        let interval = Span::new().try_months(n).map_err(Error::Arithmetic)?;
        Segments::new(*self, interval, Some(Unit::Month))
    }

    /// Returns an iterator over the days in this period that fall on
    /// `weekday`, each as a one-day period.
    ///
    /// The walk begins at the first occurrence of `weekday` on or after
    /// this period's start: the start itself when it already falls on
    /// that weekday, otherwise the next occurrence at midnight. The
    /// iterator is empty when no such weekday occurs before this
    /// period's end.
    pub fn each_weekday(&self, weekday: Weekday) -> Result<Weekdays, Error> {
        Weekdays::new(*self, weekday)
    }

    /// Returns an iterator over the calendar days this period touches.
    ///
    /// Both endpoints are truncated to their civil dates and one date is
    /// yielded per day in the half-open range between them, regardless
    /// of the endpoints' time-of-day.
    pub fn dates(&self) -> Dates {
        Dates::new(*self)
    }
}

/// Whether a period's endpoints count as inside the period for membership
/// tests.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Bounds {
    /// Boundary points are contained: `start <= point <= end`.
    #[default]
    Inclusive,
    /// Boundary points are not contained: `start < point < end`.
    Exclusive,
}

/// Plucks the count of `unit` out of a span that was computed with `unit`
/// as its largest unit.
fn unit_count(span: &Span, unit: Unit) -> i64 {
    match unit {
        Unit::Year => i64::from(span.get_years()),
        Unit::Month => i64::from(span.get_months()),
        Unit::Week => i64::from(span.get_weeks()),
        Unit::Day => i64::from(span.get_days()),
        Unit::Hour => i64::from(span.get_hours()),
        Unit::Minute => span.get_minutes(),
        Unit::Second => span.get_seconds(),
        Unit::Millisecond => span.get_milliseconds(),
        Unit::Microsecond => span.get_microseconds(),
        Unit::Nanosecond => span.get_nanoseconds(),
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}

impl std::str::FromStr for Period {
    type Err = Error;

    /// Parses the ISO 8601 time interval shape `<start>/<end>`, e.g.
    /// `2024-03-01T00:00:00/2024-03-08T00:00:00`. Each half is parsed as
    /// a civil datetime, with a missing time meaning midnight. A lone
    /// datetime with no `/` parses as the default one-day period
    /// beginning there.
    fn from_str(s: &str) -> Result<Period, Error> {
        match s.split_once('/') {
            None => {
                let start: DateTime = s.parse().map_err(Error::Parse)?;
                Period::starting(start)
            }
            Some((start, end)) => {
                let start: DateTime = start.parse().map_err(Error::Parse)?;
                let end: DateTime = end.parse().map_err(Error::Parse)?;
                Ok(Period::new(start, end))
            }
        }
    }
}

impl serde::Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Period, D::Error> {
        use serde::de;

        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = Period;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("a period string")
            }

            #[inline]
            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<Period, E> {
                value.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}
