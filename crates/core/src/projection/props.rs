//! Property-based tests for the projection engine.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use tally_shared::types::{BudgetId, EntryId, UserId, format_timestamp};

use super::engine::project;
use crate::budget::{Budget, Entry};

/// Strategy for an instant between 2020 and 2030, at tenth-of-second precision.
fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    (15_778_368_000i64..18_934_560_000i64)
        .prop_map(|tenths| DateTime::from_timestamp_millis(tenths * 100).unwrap_or_default())
}

fn cost() -> impl Strategy<Value = i64> {
    -1_000_000i64..1_000_000i64
}

#[derive(Debug, Clone)]
struct EntrySeed {
    cost: i64,
    is_credit: bool,
    planned: bool,
    age_days: i64,
}

fn entry_seed() -> impl Strategy<Value = EntrySeed> {
    (cost(), any::<bool>(), any::<bool>(), 0i64..120).prop_map(
        |(cost, is_credit, planned, age_days)| EntrySeed {
            cost,
            is_credit,
            planned,
            age_days,
        },
    )
}

fn budget(start: DateTime<Utc>, limit: i64, period_limit: i64) -> Budget {
    let stamp = format_timestamp(start);
    Budget {
        id: BudgetId::new(),
        user_id: UserId::new(),
        name: "prop".to_string(),
        limit,
        period_limit,
        start_date: stamp.clone(),
        created_at: stamp.clone(),
        updated_at: stamp,
    }
}

fn materialize(b: &Budget, seed: &EntrySeed, now: DateTime<Utc>) -> Entry {
    let created = format_timestamp(now - Duration::days(seed.age_days));
    Entry {
        id: EntryId::new(),
        budget_id: b.id,
        user_id: b.user_id,
        cost: seed.cost,
        category: "prop".to_string(),
        is_credit: seed.is_credit,
        description: None,
        date: seed
            .planned
            .then(|| format_timestamp(now + Duration::days(7))),
        repeat: None,
        created_at: created.clone(),
        updated_at: created,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The start day is day 1.
    #[test]
    fn prop_first_day_is_day_one(
        start in instant(),
        limit in 1i64..10_000_000,
        period_limit in 1i64..100_000,
    ) {
        let b = budget(start, limit, period_limit);
        let p = project(&b, &[], start).unwrap();
        prop_assert_eq!(p.days_passed, 1);
    }

    /// Planned entries are echoed and never counted.
    #[test]
    fn prop_planned_entries_excluded(
        now in instant(),
        seeds in prop::collection::vec(entry_seed(), 0..20),
    ) {
        let b = budget(now - Duration::days(30), 1_000_000, 1000);
        let mut entries: Vec<Entry> = seeds.iter().map(|s| materialize(&b, s, now)).collect();
        for e in &mut entries {
            e.date = Some(format_timestamp(now + Duration::days(3)));
        }

        let p = project(&b, &entries, now).unwrap();

        prop_assert_eq!(p.spends_cost, 0);
        prop_assert_eq!(p.month_spend, 0);
        prop_assert_eq!(p.month_income, 0);
        prop_assert_eq!(p.credit, 0);
        prop_assert_eq!(p.spends, entries);
    }

    /// Credit is the sum of realized credit entries and nothing else feeds it.
    #[test]
    fn prop_credit_isolation(
        now in instant(),
        seeds in prop::collection::vec(entry_seed(), 0..20),
    ) {
        let b = budget(now - Duration::days(30), 1_000_000, 1000);
        let entries: Vec<Entry> = seeds.iter().map(|s| materialize(&b, s, now)).collect();

        let p = project(&b, &entries, now).unwrap();

        let credit: i64 = entries
            .iter()
            .filter(|e| e.is_credit && e.date.is_none())
            .map(|e| e.cost)
            .sum();
        let spends: i64 = entries
            .iter()
            .filter(|e| !e.is_credit && e.date.is_none())
            .map(|e| e.cost)
            .sum();
        prop_assert_eq!(p.credit, credit);
        prop_assert_eq!(p.spends_cost, spends);
        prop_assert_eq!(p.today_budget, b.limit + spends + credit);
    }

    /// Month spend is never positive and month income never negative.
    #[test]
    fn prop_sign_split(
        now in instant(),
        seeds in prop::collection::vec(entry_seed(), 0..20),
    ) {
        let b = budget(now - Duration::days(90), 1_000_000, 1000);
        let entries: Vec<Entry> = seeds.iter().map(|s| materialize(&b, s, now)).collect();

        let p = project(&b, &entries, now).unwrap();

        prop_assert!(p.month_spend <= 0);
        prop_assert!(p.month_income >= 0);
    }

    /// The week allowance never undercuts today's allowance.
    #[test]
    fn prop_week_bound(
        start in instant(),
        now in instant(),
        limit in -10_000_000i64..10_000_000,
        period_limit in 1i64..100_000,
        seeds in prop::collection::vec(entry_seed(), 0..10),
    ) {
        let b = budget(start, limit, period_limit);
        let entries: Vec<Entry> = seeds.iter().map(|s| materialize(&b, s, now)).collect();

        let p = project(&b, &entries, now).unwrap();

        prop_assert!(p.week_limit >= p.today_limit);
    }

    /// Projection never modifies its inputs.
    #[test]
    fn prop_inputs_unchanged(
        now in instant(),
        seeds in prop::collection::vec(entry_seed(), 0..10),
    ) {
        let b = budget(now - Duration::days(10), 50_000, 500);
        let entries: Vec<Entry> = seeds.iter().map(|s| materialize(&b, s, now)).collect();
        let (b_before, entries_before) = (b.clone(), entries.clone());

        let first = project(&b, &entries, now).unwrap();
        let second = project(&b, &entries, now).unwrap();

        prop_assert_eq!(&b, &b_before);
        prop_assert_eq!(&entries, &entries_before);
        prop_assert_eq!(first.today_limit, second.today_limit);
        prop_assert_eq!(first.week_limit, second.week_limit);
    }
}
