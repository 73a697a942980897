use jiff::civil::{Date, Weekday};

use crate::error::Error;

/// Returns the first date on or after `date` that falls on `weekday`.
///
/// If `date` already falls on `weekday`, then `date` itself is returned.
pub(crate) fn on_or_after(
    date: Date,
    weekday: Weekday,
) -> Result<Date, Error> {
    if date.weekday() == weekday {
        Ok(date)
    } else {
        date.nth_weekday(1, weekday).map_err(Error::Arithmetic)
    }
}

/// Returns the start of the week that the given date resides in.
///
/// The starting point of the week is determined by `start`.
pub(crate) fn first_of_week(
    start: Weekday,
    date: Date,
) -> Result<Date, Error> {
    if date.weekday() == start {
        Ok(date)
    } else {
        date.nth_weekday(-1, start).map_err(Error::Arithmetic)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{Weekday::*, date};

    use super::*;

    // 2024-03-01 is a Friday.
    #[test]
    fn on_or_after_stays_or_advances() {
        let d = date(2024, 3, 1);
        assert_eq!(on_or_after(d, Friday).unwrap(), d);
        assert_eq!(on_or_after(d, Saturday).unwrap(), date(2024, 3, 2));
        assert_eq!(on_or_after(d, Thursday).unwrap(), date(2024, 3, 7));
    }

    #[test]
    fn first_of_week_for_different_week_starts() {
        let d = date(2024, 3, 15);
        assert_eq!(first_of_week(Monday, d).unwrap(), date(2024, 3, 11));
        assert_eq!(first_of_week(Sunday, d).unwrap(), date(2024, 3, 10));
        assert_eq!(first_of_week(Friday, d).unwrap(), d);
    }

    // 9999-12-31 is a Friday and -9999-01-01 is a Monday, so alignment in
    // the "wrong" direction at either boundary must fail rather than wrap.
    #[test]
    fn boundaries_near_jiff_range() {
        assert_eq!(on_or_after(Date::MAX, Friday).unwrap(), Date::MAX);
        assert!(on_or_after(Date::MAX, Monday).is_err());
        assert_eq!(first_of_week(Monday, Date::MIN).unwrap(), Date::MIN);
        assert!(first_of_week(Sunday, Date::MIN).is_err());
    }
}
