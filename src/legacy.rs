//! Upgrade path for events stored with a bare repeat pattern instead of a rule.

/// Rule text for an old `daily`/`weekly`/`monthly`/`yearly` pattern, ignoring case.
/// Anything else is treated as daily.
pub fn rule_for_pattern(pattern: &str) -> &'static str {
    match pattern.trim().to_ascii_lowercase().as_str() {
        "daily" => "FREQ=DAILY",
        "weekly" => "FREQ=WEEKLY",
        "monthly" => "FREQ=MONTHLY",
        "yearly" => "FREQ=YEARLY",
        other => {
            tracing::debug!(pattern = other, "Unknown legacy pattern, using daily");
            "FREQ=DAILY"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Frequency, RecurrenceRule};

    #[test]
    fn known_patterns() {
        assert_eq!(rule_for_pattern("daily"), "FREQ=DAILY");
        assert_eq!(rule_for_pattern("Weekly"), "FREQ=WEEKLY");
        assert_eq!(rule_for_pattern("MONTHLY"), "FREQ=MONTHLY");
        assert_eq!(rule_for_pattern(" yearly "), "FREQ=YEARLY");
    }

    #[test]
    fn unknown_is_daily() {
        assert_eq!(rule_for_pattern("fortnightly"), "FREQ=DAILY");
        assert_eq!(rule_for_pattern(""), "FREQ=DAILY");
    }

    #[test]
    fn upgraded_rules_parse() {
        let rule: RecurrenceRule = rule_for_pattern("monthly").parse().unwrap();
        assert_eq!(rule, RecurrenceRule::new(Frequency::Monthly));
    }
}
