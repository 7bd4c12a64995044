//! Date arithmetic for eligibility windows.
//!
//! Approval letters state limits per week ("4 part days per week"), while
//! usage is tracked per month. These helpers let the dashboard approximate a
//! monthly allowance from a weekly one, and project how many more attendances
//! a child can rack up before the month ends.
//!
//! Weekday indexes follow the calendar convention used everywhere else in the
//! app: 0 = Sunday, 1 = Monday, ..., 6 = Saturday.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid weekday index {0}, expected 0 (Sunday) through 6 (Saturday)")]
    InvalidWeekday(u32),
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| DateError::InvalidDate(s.to_string()))
}

/// Convert a Sunday-based weekday index to a `Weekday`
pub fn weekday_from_index(index: u32) -> Result<Weekday, DateError> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(DateError::InvalidWeekday(other)),
    }
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month
    date.with_day(1).unwrap_or(date)
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_day_of_month(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    last_day_of_month(date).day()
}

/// How many weeks have days that count as part of this month?
///
/// January 2021 starts on a Friday and has 31 days, so five weeks touch it.
/// This is `ceil(days_in_month / 7)`, which is what the monthly allowance
/// approximation multiplies weekly limits by.
pub fn weeks_in_month(date: NaiveDate) -> u32 {
    (days_in_month(date) + 6) / 7
}

/// Count the days from `date` through the end of its month, inclusive, that
/// fall on `weekday`.
pub fn remaining_days_in_month_including_today(date: NaiveDate, weekday: Weekday) -> u32 {
    let end = last_day_of_month(date);
    let offset = (7 + weekday.num_days_from_sunday() - date.weekday().num_days_from_sunday()) % 7;
    // Past the end of the calendar means past the end of the month
    match date.checked_add_signed(Duration::days(offset as i64)) {
        Some(first_match) if first_match <= end => ((end - first_match).num_days() / 7 + 1) as u32,
        _ => 0,
    }
}

/// Same as [`remaining_days_in_month_including_today`] with a Sunday-based index
pub fn remaining_days_in_month_for_index(date: NaiveDate, weekday_index: u32) -> Result<u32, DateError> {
    let weekday = weekday_from_index(weekday_index)?;
    Ok(remaining_days_in_month_including_today(date, weekday))
}

/// The Sunday through Saturday week containing `date`, as an inclusive range.
///
/// Weeks straddling the ends of the calendar are cut at `NaiveDate::MIN`/`MAX`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date
        .checked_sub_signed(Duration::days(date.weekday().num_days_from_sunday() as i64))
        .unwrap_or(NaiveDate::MIN);
    let end = start.checked_add_signed(Duration::days(6)).unwrap_or(NaiveDate::MAX);
    (start, end)
}
