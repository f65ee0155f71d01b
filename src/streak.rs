//! Daily contribution streaks over a sparse calendar.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Current and longest streak, in days.
///
/// The two values are independent: the current streak is anchored on the
/// reference day, the longest one is measured over the whole history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

/// Compute streaks from `(date, count)` pairs, relative to `today`.
///
/// Days missing from the input count as zero. The current streak walks
/// backward from `today` when it lies inside the recorded range, from the last
/// recorded day when `today` is exactly one day past it, and is zero when
/// `today` is further out than that.
pub fn calculate<I>(days: I, today: NaiveDate) -> Streaks
where
    I: IntoIterator<Item = (NaiveDate, u32)>,
{
    let counts: BTreeMap<NaiveDate, u32> = days.into_iter().collect();

    let (Some((&first, _)), Some((&last, _))) =
        (counts.first_key_value(), counts.last_key_value())
    else {
        return Streaks::default();
    };

    let active = |date: NaiveDate| counts.get(&date).is_some_and(|&count| count > 0);

    let mut longest = 0;
    let mut run = 0;
    let mut date = first;
    while date <= last {
        if active(date) {
            run += 1;
        } else {
            longest = longest.max(run);
            run = 0;
        }
        date += Duration::days(1);
    }
    longest = longest.max(run);

    let anchor = if today <= last {
        Some(today)
    } else if today - last == Duration::days(1) {
        Some(last)
    } else {
        None
    };

    let mut current = 0;
    if let Some(mut date) = anchor {
        while date >= first && active(date) {
            current += 1;
            date -= Duration::days(1);
        }
    }

    Streaks { current, longest }
}
