//! Report horizon arithmetic
//!
//! A budget report looks at everything up to the last day of the month that
//! is `n` months after the current one.

use chrono::{Datelike, Duration, Months, NaiveDate};

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

/// Last day of the month containing `date`
///
/// `None` when the following month is past the last representable date.
pub fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    month_start(date)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Last day of the month `months_ahead` months after `today`'s month
///
/// Month arithmetic is done from the first of the month, so a short target
/// month never overflows: Jan 31 + 1 month gives Feb 28 (or 29). `None` when
/// the target month is beyond the calendar.
pub fn horizon(today: NaiveDate, months_ahead: u32) -> Option<NaiveDate> {
    let target = month_start(today)?.checked_add_months(Months::new(months_ahead))?;
    month_end(target)
}

/// Whether two dates fall in the same calendar month of the same year
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// The `count` most recent days ending at `today`, oldest first
pub fn recent_days(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    (0..count)
        .rev()
        .map(|offset| today - Duration::days(i64::from(offset)))
        .collect()
}
