//! Entry classification.
//!
//! Every entry gets exactly one tag, and the aggregation only ever looks at
//! the tag, so each rule can be tested on its own.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tally_shared::types::parse_timestamp;

use super::error::ProjectionError;
use crate::budget::Entry;

/// How an entry contributes to a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryClass {
    /// Carries a planned date; echoed only.
    Planned,
    /// Realized credit; counted in `credit` only.
    Credit,
    /// Realized cash movement in the same calendar month as `now`.
    RealizedCurrentMonth,
    /// Realized cash movement in any other month.
    RealizedEarlier,
}

/// Classifies `entry` relative to `now`.
///
/// Credit and planned entries are tagged without parsing `created_at`.
///
/// # Errors
///
/// Returns `ProjectionError::MalformedTimestamp` if a realized, non-credit
/// entry has an unparsable `created_at`.
pub fn classify(entry: &Entry, now: DateTime<Utc>) -> Result<EntryClass, ProjectionError> {
    if entry.is_planned() {
        return Ok(EntryClass::Planned);
    }
    if entry.is_credit {
        return Ok(EntryClass::Credit);
    }

    let realized = parse_timestamp(&entry.created_at)?;
    if same_month(realized, now) {
        Ok(EntryClass::RealizedCurrentMonth)
    } else {
        Ok(EntryClass::RealizedEarlier)
    }
}

fn same_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tally_shared::types::{BudgetId, EntryId, UserId};

    fn entry(created_at: &str, is_credit: bool, date: Option<&str>) -> Entry {
        Entry {
            id: EntryId::new(),
            budget_id: BudgetId::new(),
            user_id: UserId::new(),
            cost: -100,
            category: "misc".to_string(),
            is_credit,
            description: None,
            date: date.map(str::to_string),
            repeat: None,
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-03-15T12:00:00.0Z").unwrap()
    }

    #[rstest]
    #[case::planned(entry("2024-03-01T00:00:00.0Z", false, Some("2024-04-01T00:00:00.0Z")), EntryClass::Planned)]
    #[case::planned_credit(entry("2024-03-01T00:00:00.0Z", true, Some("2024-04-01T00:00:00.0Z")), EntryClass::Planned)]
    #[case::credit(entry("2024-03-01T00:00:00.0Z", true, None), EntryClass::Credit)]
    #[case::current_month(entry("2024-03-01T00:00:00.0Z", false, None), EntryClass::RealizedCurrentMonth)]
    #[case::previous_month(entry("2024-02-29T23:59:59.9Z", false, None), EntryClass::RealizedEarlier)]
    #[case::same_month_last_year(entry("2023-03-10T00:00:00.0Z", false, None), EntryClass::RealizedEarlier)]
    fn test_classify(#[case] entry: Entry, #[case] expected: EntryClass) {
        assert_eq!(classify(&entry, now()).unwrap(), expected);
    }

    #[test]
    fn test_credit_and_planned_skip_timestamp_parsing() {
        assert_eq!(
            classify(&entry("garbage", true, None), now()).unwrap(),
            EntryClass::Credit
        );
        assert_eq!(
            classify(&entry("garbage", false, Some("also garbage")), now()).unwrap(),
            EntryClass::Planned
        );
    }

    #[test]
    fn test_realized_entry_with_bad_timestamp_fails() {
        assert!(matches!(
            classify(&entry("garbage", false, None), now()),
            Err(ProjectionError::MalformedTimestamp(_))
        ));
    }
}
