//! Date scope resolution for report runs.
//!
//! A run is scoped either to an explicit date token (`today`, `yesterday`,
//! `all`, or a verbatim YYYY-MM-DD literal) or to the last N calendar days.
//! The resolved filter is a plain set of date strings; a session matches when
//! its derived date is in the set. An unbounded filter admits everything,
//! including sessions whose date could not be derived.

use chrono::{Duration, Local, NaiveDate};
use std::collections::BTreeSet;

/// Resolved set of in-scope calendar dates, or unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter {
    dates: Option<BTreeSet<String>>,
}

impl DateFilter {
    /// No filter at all: every session is in scope, dateless ones included.
    pub fn unbounded() -> Self {
        Self { dates: None }
    }

    /// Resolve CLI arguments against the current local date.
    ///
    /// An explicit date token takes precedence over `--days`. Unknown tokens
    /// pass through verbatim: an invalid date simply matches no session,
    /// which is accepted behavior rather than an error.
    pub fn resolve(date: Option<&str>, days: Option<i64>) -> Self {
        Self::resolve_from(date, days, Local::now().date_naive())
    }

    /// Same as [`DateFilter::resolve`] with an injectable "today".
    pub fn resolve_from(date: Option<&str>, days: Option<i64>, today: NaiveDate) -> Self {
        if let Some(token) = date {
            let resolved = match token {
                "all" => return Self::unbounded(),
                "today" => today.format("%Y-%m-%d").to_string(),
                "yesterday" => (today - Duration::days(1)).format("%Y-%m-%d").to_string(),
                literal => literal.to_string(),
            };
            let mut dates = BTreeSet::new();
            dates.insert(resolved);
            return Self { dates: Some(dates) };
        }

        // Zero or negative day counts gate the default last-24-hours view,
        // so they clamp to 1 instead of producing an empty window.
        let span = days.unwrap_or(1).max(1);
        let dates = (0..span)
            .map(|offset| (today - Duration::days(offset)).format("%Y-%m-%d").to_string())
            .collect();
        Self { dates: Some(dates) }
    }

    /// Whether a session with the given derived date is in scope.
    /// An active filter rejects dateless sessions.
    pub fn matches(&self, session_date: Option<&str>) -> bool {
        match (&self.dates, session_date) {
            (None, _) => true,
            (Some(dates), Some(date)) => dates.contains(date),
            (Some(_), None) => false,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.dates.is_none()
    }

    /// The in-scope dates in ascending order, None when unbounded.
    pub fn dates(&self) -> Option<Vec<String>> {
        self.dates
            .as_ref()
            .map(|dates| dates.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_default_is_single_current_date() {
        let filter = DateFilter::resolve_from(None, None, day("2026-08-30"));
        assert_eq!(filter.dates(), Some(vec!["2026-08-30".to_string()]));
    }

    #[test]
    fn test_days_expand_to_consecutive_window() {
        let filter = DateFilter::resolve_from(None, Some(7), day("2026-08-30"));
        let dates = filter.dates().unwrap();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates.first().map(String::as_str), Some("2026-08-24"));
        assert_eq!(dates.last().map(String::as_str), Some("2026-08-30"));
    }

    #[test]
    fn test_explicit_date_wins_over_days() {
        let filter = DateFilter::resolve_from(Some("2026-02-02"), Some(30), day("2026-08-30"));
        assert_eq!(filter.dates(), Some(vec!["2026-02-02".to_string()]));
    }

    #[test]
    fn test_today_and_yesterday_tokens() {
        let today = day("2026-08-30");
        assert!(DateFilter::resolve_from(Some("today"), None, today).matches(Some("2026-08-30")));
        let yesterday = DateFilter::resolve_from(Some("yesterday"), None, today);
        assert!(yesterday.matches(Some("2026-08-29")));
        assert!(!yesterday.matches(Some("2026-08-30")));
    }

    #[test]
    fn test_all_token_is_unbounded() {
        let filter = DateFilter::resolve_from(Some("all"), Some(3), day("2026-08-30"));
        assert!(filter.is_unbounded());
        assert!(filter.matches(Some("1999-01-01")));
        assert!(filter.matches(None));
    }

    #[test]
    fn test_invalid_token_passes_through_verbatim() {
        let filter = DateFilter::resolve_from(Some("not-a-date"), None, day("2026-08-30"));
        assert_eq!(filter.dates(), Some(vec!["not-a-date".to_string()]));
        assert!(!filter.matches(Some("2026-08-30")));
    }

    #[test]
    fn test_zero_and_negative_days_clamp_to_one() {
        let today = day("2026-08-30");
        for days in [0, -5] {
            let filter = DateFilter::resolve_from(None, Some(days), today);
            assert_eq!(filter.dates(), Some(vec!["2026-08-30".to_string()]));
        }
    }

    #[test]
    fn test_active_filter_rejects_dateless_sessions() {
        let filter = DateFilter::resolve_from(None, Some(1), day("2026-08-30"));
        assert!(!filter.matches(None));
    }
}
