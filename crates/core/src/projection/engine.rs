//! Budget projection engine.

use chrono::{DateTime, Datelike, Utc};
use tally_shared::types::parse_timestamp;

use super::classify::classify;
use super::error::ProjectionError;
use super::types::{Projection, Totals};
use crate::budget::{Budget, Entry};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Projects `budget` and its `entries` at `now`.
///
/// Pure and linear in the number of entries. Neither input is modified;
/// the result carries copies.
///
/// # Errors
///
/// - `DivisionPrecondition` if `period_limit` is zero, checked before anything else.
/// - `MalformedTimestamp` if the start date or a realized entry's
///   `created_at` does not parse.
/// - `Overflow` if a figure leaves the i64 range.
pub fn project(
    budget: &Budget,
    entries: &[Entry],
    now: DateTime<Utc>,
) -> Result<Projection, ProjectionError> {
    if budget.period_limit == 0 {
        return Err(ProjectionError::DivisionPrecondition);
    }
    let start = parse_timestamp(&budget.start_date)?;

    let mut totals = Totals::default();
    for entry in entries {
        totals.record(classify(entry, now)?, entry.cost)?;
    }

    let days_passed = days_passed(start, now);
    let weekday = i64::from(now.weekday().number_from_monday());

    let today_limit = budget
        .period_limit
        .checked_mul(days_passed)
        .and_then(|allowance| allowance.checked_add(totals.spends_cost))
        .ok_or(ProjectionError::Overflow("todayLimit"))?;
    let today_budget = budget
        .limit
        .checked_add(totals.spends_cost)
        .and_then(|v| v.checked_add(totals.credit))
        .ok_or(ProjectionError::Overflow("todayBudget"))?;
    let week_limit = budget
        .period_limit
        .checked_mul(7 - weekday)
        .and_then(|rest| today_limit.checked_add(rest))
        .ok_or(ProjectionError::Overflow("weekLimit"))?;
    let days_left = budget
        .limit
        .checked_div(budget.period_limit)
        .and_then(|days| days.checked_sub(days_passed))
        .ok_or(ProjectionError::Overflow("daysLeft"))?;

    Ok(Projection {
        budget: budget.clone(),
        days_passed,
        days_left,
        today_limit,
        today_budget,
        week_limit,
        month_spend: totals.month_spend,
        month_income: totals.month_income,
        credit: totals.credit,
        spends_cost: totals.spends_cost,
        spends: entries.to_vec(),
    })
}

/// Whole days from `start` to `now`, floored, plus one.
///
/// A `now` before `start` yields zero or a negative count.
#[must_use]
pub fn days_passed(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_milliseconds().div_euclid(MILLIS_PER_DAY) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    #[rstest]
    #[case::same_instant("2024-03-01T00:00:00.0Z", 1)]
    #[case::end_of_first_day("2024-03-01T23:59:59.9Z", 1)]
    #[case::second_day("2024-03-02T00:00:00.0Z", 2)]
    #[case::tenth_day("2024-03-10T12:00:00.0Z", 10)]
    #[case::just_before_start("2024-02-29T23:59:59.9Z", 0)]
    #[case::day_before_start("2024-02-29T00:00:00.0Z", 0)]
    #[case::two_days_before_start("2024-02-28T12:00:00.0Z", -1)]
    fn test_days_passed(#[case] now: &str, #[case] expected: i64) {
        assert_eq!(days_passed(at("2024-03-01T00:00:00.0Z"), at(now)), expected);
    }
}
