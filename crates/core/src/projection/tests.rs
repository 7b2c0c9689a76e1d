//! Scenario tests for the projection engine.

use chrono::{DateTime, Utc};
use tally_shared::types::{BudgetId, EntryId, UserId, parse_timestamp};

use super::engine::project;
use super::error::ProjectionError;
use crate::budget::{Budget, Entry};

const START: &str = "2024-03-01T00:00:00.0Z";

fn at(s: &str) -> DateTime<Utc> {
    parse_timestamp(s).unwrap()
}

fn budget(limit: i64, period_limit: i64, start_date: &str) -> Budget {
    Budget {
        id: BudgetId::new(),
        user_id: UserId::new(),
        name: "Holiday".to_string(),
        limit,
        period_limit,
        start_date: start_date.to_string(),
        created_at: START.to_string(),
        updated_at: START.to_string(),
    }
}

fn entry(b: &Budget, cost: i64, created_at: &str) -> Entry {
    Entry {
        id: EntryId::new(),
        budget_id: b.id,
        user_id: b.user_id,
        cost,
        category: "food".to_string(),
        is_credit: false,
        description: None,
        date: None,
        repeat: None,
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
    }
}

#[test]
fn test_single_expense_on_first_day() {
    let b = budget(35000, 5000, START);
    let entries = vec![entry(&b, -1000, START)];

    let p = project(&b, &entries, at(START)).unwrap();

    assert_eq!(p.days_passed, 1);
    assert_eq!(p.spends_cost, -1000);
    assert_eq!(p.today_limit, 4000);
    assert_eq!(p.today_budget, 34000);
    assert_eq!(p.month_spend, -1000);
    assert_eq!(p.month_income, 0);
    assert_eq!(p.credit, 0);
    // 2024-03-01 is a Friday
    assert_eq!(p.week_limit, 4000 + 5000 * 2);
    assert_eq!(p.days_left, 35000 / 5000 - 1);
}

#[test]
fn test_credit_entry_only_affects_credit() {
    let b = budget(35000, 5000, START);
    let entries = vec![Entry {
        is_credit: true,
        ..entry(&b, -2000, START)
    }];

    let p = project(&b, &entries, at(START)).unwrap();

    assert_eq!(p.spends_cost, 0);
    assert_eq!(p.credit, -2000);
    assert_eq!(p.today_budget, 33000);
    assert_eq!(p.today_limit, 5000);
    assert_eq!(p.month_spend, 0);
}

#[test]
fn test_planned_entry_is_echoed_but_not_counted() {
    let b = budget(35000, 5000, START);
    let planned = Entry {
        date: Some("2024-03-20T00:00:00.0Z".to_string()),
        ..entry(&b, -9000, START)
    };
    let entries = vec![planned.clone()];

    let p = project(&b, &entries, at(START)).unwrap();

    assert_eq!(p.spends_cost, 0);
    assert_eq!(p.month_spend, 0);
    assert_eq!(p.month_income, 0);
    assert_eq!(p.credit, 0);
    assert_eq!(p.spends, vec![planned]);
}

#[test]
fn test_previous_month_counts_toward_spends_only() {
    let b = budget(100_000, 1000, "2024-02-20T00:00:00.0Z");
    let entries = vec![
        entry(&b, -3000, "2024-02-25T10:00:00.0Z"),
        entry(&b, -500, "2024-03-02T10:00:00.0Z"),
        entry(&b, 700, "2024-03-03T10:00:00.0Z"),
    ];

    let p = project(&b, &entries, at("2024-03-05T08:00:00.0Z")).unwrap();

    assert_eq!(p.spends_cost, -2800);
    assert_eq!(p.month_spend, -500);
    assert_eq!(p.month_income, 700);
    assert_eq!(p.days_passed, 15);
    assert_eq!(p.today_limit, 1000 * 15 - 2800);
}

#[test]
fn test_entries_echoed_in_input_order() {
    let b = budget(35000, 5000, START);
    let entries = vec![
        entry(&b, -1, "2024-03-01T03:00:00.0Z"),
        entry(&b, -2, "2024-03-01T01:00:00.0Z"),
        entry(&b, -3, "2024-03-01T02:00:00.0Z"),
    ];

    let p = project(&b, &entries, at(START)).unwrap();

    let costs: Vec<i64> = p.spends.iter().map(|e| e.cost).collect();
    assert_eq!(costs, vec![-1, -2, -3]);
}

#[test]
fn test_future_start_date_gives_non_positive_days() {
    let b = budget(35000, 5000, "2024-03-04T00:00:00.0Z");

    let p = project(&b, &[], at("2024-03-01T12:00:00.0Z")).unwrap();

    assert_eq!(p.days_passed, -2);
    assert_eq!(p.today_limit, -10000);
    assert_eq!(p.days_left, 9);
}

#[test]
fn test_sunday_week_limit_equals_today_limit() {
    let b = budget(35000, 5000, START);

    // 2024-03-03 is a Sunday
    let p = project(&b, &[], at("2024-03-03T18:00:00.0Z")).unwrap();

    assert_eq!(p.week_limit, p.today_limit);
}

#[test]
fn test_days_left_truncates_toward_zero() {
    let b = budget(-7, 2, START);

    let p = project(&b, &[], at(START)).unwrap();

    assert_eq!(p.days_left, -3 - 1);
}

#[test]
fn test_zero_period_limit_is_rejected_upfront() {
    let b = budget(35000, 0, "not a timestamp");

    assert!(matches!(
        project(&b, &[], at(START)),
        Err(ProjectionError::DivisionPrecondition)
    ));
}

#[test]
fn test_malformed_start_date() {
    let b = budget(35000, 5000, "2024-03-01");

    assert!(matches!(
        project(&b, &[], at(START)),
        Err(ProjectionError::MalformedTimestamp(_))
    ));
}

#[test]
fn test_malformed_entry_aborts_projection() {
    let b = budget(35000, 5000, START);
    let entries = vec![entry(&b, -100, START), entry(&b, -100, "03/01/2024")];

    assert!(matches!(
        project(&b, &entries, at(START)),
        Err(ProjectionError::MalformedTimestamp(_))
    ));
}

#[test]
fn test_overflow_is_reported() {
    let b = budget(i64::MAX, i64::MAX, START);
    let entries = vec![entry(&b, -1, START)];

    assert!(matches!(
        project(&b, &entries, at("2024-03-05T00:00:00.0Z")),
        Err(ProjectionError::Overflow(_))
    ));
}

#[test]
fn test_projection_json_shape() {
    let b = budget(35000, 5000, START);
    let entries = vec![entry(&b, -1000, START)];

    let json = serde_json::to_value(project(&b, &entries, at(START)).unwrap()).unwrap();

    assert_eq!(json["id"], b.id.to_string());
    assert_eq!(json["periodLimit"], 5000);
    assert_eq!(json["startDate"], START);
    assert_eq!(json["daysPassed"], 1);
    assert_eq!(json["todayBudget"], 34000);
    assert_eq!(json["monthSpend"], -1000);
    assert_eq!(json["spends"][0]["cost"], -1000);
    assert!(json.get("spendsCost").is_none());
}
