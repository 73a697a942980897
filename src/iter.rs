use jiff::{
    Span, ToSpan, Unit,
    civil::{Date, DateTime, Time, Weekday},
};

use crate::{error::Error, period::Period, weekdate};

/// An iterator over the sub-periods of a parent period.
///
/// Segments begin at the parent's start and advance by a fixed interval.
/// The final segment's end is clamped to the parent's end, so the yielded
/// segments cover the parent exactly: gapless, in chronological order and
/// overlapping only at shared boundary points. A zero-length parent yields
/// exactly one zero-length segment.
///
/// Created by [`Period::each`], [`Period::each_days`],
/// [`Period::each_weeks`] and [`Period::each_months`].
#[derive(Clone, Debug)]
pub struct Segments {
    /// The start of the next segment to yield.
    ///
    /// The cursor is a bare datetime rather than a `Period` so that
    /// advancing it does not re-check the ordering invariant. A full
    /// `Period` is only materialized when a segment is yielded.
    cursor: DateTime,
    /// The parent period's end. No segment extends past it.
    parent_end: DateTime,
    /// How far the cursor advances per segment. Always positive.
    interval: Span,
    /// When set, segments whose end was clamped are suppressed.
    only_full: bool,
    /// Set once the cursor has reached or passed the parent's end.
    done: bool,
}

impl Segments {
    /// Builds a segment walk over `parent`.
    ///
    /// When `guard` is set and the parent is shorter than one whole unit
    /// of it, the walk is empty. The week and month entry points use this
    /// so that a parent shorter than the unit produces nothing at all,
    /// rather than a single clamped fragment.
    pub(crate) fn new(
        parent: Period,
        interval: Span,
        guard: Option<Unit>,
    ) -> Result<Segments, Error> {
        if interval.signum() <= 0 {
            return Err(Error::InvalidInterval { interval });
        }
        let mut done = false;
        if let Some(unit) = guard {
            done = parent.length_in(unit)? == 0;
        }
        log::trace!("iterating {parent} by {interval}");
        Ok(Segments {
            cursor: parent.start(),
            parent_end: parent.end(),
            interval,
            only_full: false,
            done,
        })
    }

    /// Suppresses the trailing clamped segment, if any.
    ///
    /// Every segment other than possibly the last spans exactly one
    /// interval; the last spans less whenever the interval does not
    /// evenly divide the parent. With this set, only segments spanning
    /// the full interval are yielded: a parent of one week and three
    /// days walked by whole weeks yields a single segment.
    pub fn only_full(mut self) -> Segments {
        self.only_full = true;
        self
    }
}

impl Iterator for Segments {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        if self.done {
            return None;
        }
        let start = self.cursor;
        // Overflow past Jiff's maximum is folded into clamping: the
        // segment still ends at the parent's end, and the saturated
        // cursor terminates the walk.
        let (next, clamped) = match start.checked_add(self.interval) {
            Ok(next) if next <= self.parent_end => (next, false),
            Ok(next) => (next, true),
            Err(_) => (DateTime::MAX, true),
        };
        let end = if clamped { self.parent_end } else { next };
        // The continuation test runs on the advanced cursor, so the
        // clamped tail is yielded exactly once and a parent that divides
        // evenly has no tail.
        self.cursor = next;
        if self.cursor >= self.parent_end {
            self.done = true;
        }
        if clamped && self.only_full {
            return None;
        }
        Some(Period::from_ordered(start, end))
    }
}

impl std::iter::FusedIterator for Segments {}

/// An iterator over the days in a period that fall on a given weekday.
///
/// Each item is a one-day period. Created by [`Period::each_weekday`].
#[derive(Clone, Debug)]
pub struct Weekdays {
    /// A 7-day walk beginning on the first matching weekday, or `None`
    /// when no matching weekday occurs before the parent's end.
    weeks: Option<Segments>,
}

impl Weekdays {
    pub(crate) fn new(
        parent: Period,
        weekday: Weekday,
    ) -> Result<Weekdays, Error> {
        let start = parent.start();
        let aligned = if start.date().weekday() == weekday {
            // The parent already begins on the right weekday. Keep its
            // time-of-day.
            start
        } else {
            let date = weekdate::on_or_after(start.date(), weekday)?;
            date.to_datetime(Time::midnight())
        };
        let weeks = if aligned < parent.end() {
            let walk = Period::from_ordered(aligned, parent.end());
            Some(Segments::new(walk, 7.days(), None)?)
        } else {
            log::trace!("no {weekday:?} occurs within {parent}");
            None
        };
        Ok(Weekdays { weeks })
    }
}

impl Iterator for Weekdays {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        let segment = self.weeks.as_mut()?.next()?;
        let start = segment.start();
        // Each week of the walk is re-sliced to its first day. The
        // saturating add only saturates on Jiff's final day, where a
        // shortened day period is the best that can be represented.
        let end = start.saturating_add(1.days());
        Some(Period::from_ordered(start, end))
    }
}

impl std::iter::FusedIterator for Weekdays {}

/// An iterator over the calendar days a period touches.
///
/// Both endpoints are truncated to their civil dates and one date is
/// yielded per day in the half-open range between them. Created by
/// [`Period::dates`].
#[derive(Clone, Debug)]
pub struct Dates {
    cursor: Date,
    end: Date,
}

impl Dates {
    pub(crate) fn new(parent: Period) -> Dates {
        Dates { cursor: parent.start().date(), end: parent.end().date() }
    }
}

impl Iterator for Dates {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        if self.cursor >= self.end {
            return None;
        }
        let date = self.cursor;
        // OK because `cursor < end` implies `cursor` is not Jiff's
        // maximum date.
        self.cursor = date.tomorrow().unwrap();
        Some(date)
    }
}

impl std::iter::FusedIterator for Dates {}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(s: &str) -> Period {
        s.parse().unwrap()
    }

    fn rendered(it: impl Iterator<Item = Period>) -> Vec<String> {
        it.map(|p| p.to_string()).collect()
    }

    #[test]
    fn three_days_by_one_day() {
        let p = period("2024-03-01/2024-03-04");
        assert_eq!(
            rendered(p.each_days(1).unwrap()),
            vec![
                "2024-03-01T00:00:00/2024-03-02T00:00:00",
                "2024-03-02T00:00:00/2024-03-03T00:00:00",
                "2024-03-03T00:00:00/2024-03-04T00:00:00",
            ],
        );
    }

    #[test]
    fn final_segment_is_clamped() {
        let p = period("2024-03-01/2024-03-08");
        assert_eq!(
            rendered(p.each(3.days()).unwrap()),
            vec![
                "2024-03-01T00:00:00/2024-03-04T00:00:00",
                "2024-03-04T00:00:00/2024-03-07T00:00:00",
                "2024-03-07T00:00:00/2024-03-08T00:00:00",
            ],
        );
    }

    #[test]
    fn segments_cover_parent_exactly() {
        let p = period("2024-01-05T07:30:00/2024-03-02T18:45:00");
        let segments: Vec<Period> = p.each(11.days()).unwrap().collect();
        assert_eq!(segments.first().unwrap().start(), p.start());
        assert_eq!(segments.last().unwrap().end(), p.end());
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
        for segment in &segments {
            assert!(p.contains(segment.start()));
            assert!(p.contains(segment.end()));
        }
    }

    #[test]
    fn mixed_unit_intervals_work() {
        let p = period("2024-01-01/2024-03-20");
        let interval = 1.months().days(3);
        assert_eq!(
            rendered(p.each(interval).unwrap()),
            vec![
                "2024-01-01T00:00:00/2024-02-04T00:00:00",
                "2024-02-04T00:00:00/2024-03-07T00:00:00",
                "2024-03-07T00:00:00/2024-03-20T00:00:00",
            ],
        );
    }

    #[test]
    fn zero_length_parent_yields_one_empty_segment() {
        let p = period("2024-03-01/2024-03-01");
        let segments: Vec<Period> = p.each(1.days()).unwrap().collect();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start(), segments[0].end());

        // With the full-unit filter, the lone clamped segment is gone.
        assert_eq!(p.each(1.days()).unwrap().only_full().count(), 0);
    }

    #[test]
    fn exact_multiple_has_no_partial_tail() {
        let p = period("2024-03-01/2024-03-15");
        assert_eq!(p.each_weeks(1).unwrap().count(), 2);
        assert_eq!(p.each_weeks(1).unwrap().only_full().count(), 2);
    }

    #[test]
    fn only_full_drops_clamped_tail() {
        // One full week plus three days.
        let p = period("2024-03-01/2024-03-11");
        assert_eq!(p.each_weeks(1).unwrap().count(), 2);
        assert_eq!(p.each_weeks(1).unwrap().only_full().count(), 1);
        assert_eq!(
            rendered(p.each_weeks(1).unwrap().only_full()),
            vec!["2024-03-01T00:00:00/2024-03-08T00:00:00"],
        );
    }

    #[test]
    fn weeks_guard_short_parent() {
        let p = period("2024-03-01/2024-03-04");
        assert_eq!(p.each_weeks(1).unwrap().count(), 0);
    }

    #[test]
    fn months_guard_short_parent() {
        let p = period("2024-03-01/2024-03-20");
        assert_eq!(p.each_months(1).unwrap().count(), 0);
    }

    #[test]
    fn month_cursor_drifts_at_month_ends() {
        // Re-adding one month to an already advanced cursor constrains
        // the day number and stays constrained, so the walk drifts from
        // the 31st to the 28th.
        let p = period("2025-01-31/2025-03-31");
        assert_eq!(
            rendered(p.each_months(1).unwrap()),
            vec![
                "2025-01-31T00:00:00/2025-02-28T00:00:00",
                "2025-02-28T00:00:00/2025-03-28T00:00:00",
                "2025-03-28T00:00:00/2025-03-31T00:00:00",
            ],
        );
    }

    #[test]
    fn non_positive_intervals_are_rejected() {
        let p = period("2024-03-01/2024-03-08");
        assert!(matches!(
            p.each(Span::new()),
            Err(Error::InvalidInterval { .. }),
        ));
        assert!(matches!(
            p.each((-1).weeks()),
            Err(Error::InvalidInterval { .. }),
        ));
        assert!(matches!(
            p.each_days(0),
            Err(Error::InvalidInterval { .. }),
        ));
        assert!(matches!(
            p.each_days(-2),
            Err(Error::InvalidInterval { .. }),
        ));
        assert!(matches!(
            p.each_months(-1),
            Err(Error::InvalidInterval { .. }),
        ));
    }

    #[test]
    fn fridays_in_march() {
        // March 2024 begins on a Friday.
        let p = period("2024-03-01/2024-04-01");
        assert_eq!(
            rendered(p.each_weekday(Weekday::Friday).unwrap()),
            vec![
                "2024-03-01T00:00:00/2024-03-02T00:00:00",
                "2024-03-08T00:00:00/2024-03-09T00:00:00",
                "2024-03-15T00:00:00/2024-03-16T00:00:00",
                "2024-03-22T00:00:00/2024-03-23T00:00:00",
                "2024-03-29T00:00:00/2024-03-30T00:00:00",
            ],
        );
    }

    #[test]
    fn weekday_alignment_advances_to_next_occurrence() {
        let p = period("2024-03-01/2024-03-31");
        assert_eq!(
            rendered(p.each_weekday(Weekday::Monday).unwrap()),
            vec![
                "2024-03-04T00:00:00/2024-03-05T00:00:00",
                "2024-03-11T00:00:00/2024-03-12T00:00:00",
                "2024-03-18T00:00:00/2024-03-19T00:00:00",
                "2024-03-25T00:00:00/2024-03-26T00:00:00",
            ],
        );
    }

    #[test]
    fn weekday_absent_from_range() {
        // 2024-03-03 is a Sunday and the next Saturday is the 9th,
        // which is not before the parent's end.
        let p = period("2024-03-03/2024-03-09");
        assert_eq!(p.each_weekday(Weekday::Saturday).unwrap().count(), 0);

        let p = period("2024-03-03/2024-03-03");
        assert_eq!(p.each_weekday(Weekday::Sunday).unwrap().count(), 0);
    }

    #[test]
    fn weekday_start_keeps_time_of_day() {
        let p = period("2024-03-01T10:00:00/2024-03-09T00:00:00");
        assert_eq!(
            rendered(p.each_weekday(Weekday::Friday).unwrap()),
            vec![
                "2024-03-01T10:00:00/2024-03-02T10:00:00",
                "2024-03-08T10:00:00/2024-03-09T10:00:00",
            ],
        );
    }

    #[test]
    fn dates_walks_whole_days() {
        let p = period("2024-03-30T17:45:00/2024-04-02T09:00:00");
        let days: Vec<String> =
            p.dates().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2024-03-30", "2024-03-31", "2024-04-01"]);
    }

    #[test]
    fn dates_within_a_single_day() {
        let p = period("2024-03-01T05:00:00/2024-03-01T22:00:00");
        assert_eq!(p.dates().count(), 0);

        let p = period("2024-03-01");
        let days: Vec<String> =
            p.dates().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2024-03-01"]);
    }

    #[test]
    fn iterators_are_fused() {
        let p = period("2024-03-01/2024-03-02");
        let mut segments = p.each_days(1).unwrap();
        assert!(segments.next().is_some());
        assert!(segments.next().is_none());
        assert!(segments.next().is_none());
    }
}
