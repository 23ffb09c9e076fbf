use chrono::{Datelike, NaiveDate};

/// Returns the number of days in the given month using chrono.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    // Create a date for the first day of the next month
    let next_month_year = year + (month / 12) as i32;
    let next_month = (month % 12) + 1;

    // Go back one day from the first of the next month
    let first_day_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1).unwrap();
    first_day_next_month.pred_opt().unwrap().day()
}

/// Adds `offset` calendar months to a (year, month) pair.
pub fn add_months(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let zero_based = (month as i32 - 1) + offset as i32;
    (
        year + zero_based.div_euclid(12),
        (zero_based.rem_euclid(12) + 1) as u32,
    )
}

/// Number of calendar months from `from` to `to`. Negative when `to` is
/// an earlier month.
pub fn month_span(from: (i32, u32), to: (i32, u32)) -> i32 {
    (to.0 - from.0) * 12 + to.1 as i32 - from.1 as i32
}

/// Builds a date in the given month with the day clamped to the month's
/// length, so day 31 lands on Feb 29 in a leap year rather than failing.
pub fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// True when both dates fall in the same calendar month.
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
