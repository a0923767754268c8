use crate::errors::AnalysisError;
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Last day of the week used to anchor the generated series.
pub const WEEK_ENDING_DAY: Weekday = Weekday::Sun;

/// Rejects ranges where `start` is not strictly before `end`.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), AnalysisError> {
    if start >= end {
        return Err(AnalysisError::InvalidDateRange { start, end });
    }
    Ok(())
}

/// Moves `date` forward to the next week-ending day, or returns it unchanged
/// when it already is one. Fails when that day lies past the calendar's end.
pub fn week_ending(date: NaiveDate) -> Result<NaiveDate, AnalysisError> {
    let days_until_end = 6 - date.weekday().num_days_from_monday();
    date.checked_add_days(Days::new(u64::from(days_until_end)))
        .ok_or(AnalysisError::DateOutOfRange { date })
}

/// Number of weeks `weekly_dates` yields for the range, without building it.
pub fn week_count(start: NaiveDate, end: NaiveDate) -> Result<usize, AnalysisError> {
    validate_range(start, end)?;
    let first = week_ending(start)?;
    let last = week_ending(end)?;
    Ok(((last - first).num_days() / 7) as usize + 1)
}

/// One week-ending date per week between `start` and the week ending `end`,
/// inclusive on both sides.
pub fn weekly_dates(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, AnalysisError> {
    let count = week_count(start, end)?;
    let mut dates = Vec::with_capacity(count);
    let mut current = Some(week_ending(start)?);
    while let Some(date) = current.filter(|_| dates.len() < count) {
        dates.push(date);
        current = date.checked_add_days(Days::new(7));
    }
    Ok(dates)
}
