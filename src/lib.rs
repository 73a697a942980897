/*!
A library for calendar periods.

A [`Period`] is an ordered pair of civil datetimes. Its constructor accepts
endpoints in either order and normalizes them, so every observable period
satisfies `start <= end`. On top of that invariant, this crate provides
measurement (length in any calendar unit, membership tests), in-place
shifting by a calendar duration, and iteration of a period into sub-periods:
by days, weeks, months or an arbitrary [`jiff::Span`], by weekday, or one
calendar day at a time.

All calendar arithmetic is delegated to [Jiff](https://docs.rs/jiff). This
crate works in civil time only. If you need time zone aware periods, convert
at the edges of your application and hand civil datetimes to this crate.

# Example

Split one week into 3-day segments. The interval does not evenly divide the
period, so the final segment is clamped to the period's end:

```
use jiff::{ToSpan, civil::date};
use period::Period;

let parent = Period::new(
    date(2024, 3, 1).at(0, 0, 0, 0),
    date(2024, 3, 8).at(0, 0, 0, 0),
);
let segments = parent.each(3.days())?.collect::<Vec<Period>>();
assert_eq!(segments.len(), 3);
assert_eq!(
    segments[2].to_string(),
    "2024-03-07T00:00:00/2024-03-08T00:00:00",
);
# Ok::<(), period::Error>(())
```

Iteration is driven by the consumer, so stopping early is just a matter of
not asking for more segments (`break`, `Iterator::take`, and friends).
*/

mod error;
mod iter;
mod period;
mod weekdate;

pub use crate::{
    error::Error,
    iter::{Dates, Segments, Weekdays},
    period::{Bounds, Period},
};
