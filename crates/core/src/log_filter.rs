//! Search, date filtering and aggregate counts for the admin log view.
//!
//! The admin view fetches one page of the newest logs and narrows it down
//! here: a case-insensitive substring match over driver name, company and
//! location, and an exact match on the UTC calendar date of `createdAt`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::Timestamp;

/// Read access to the log fields the admin filter looks at.
pub trait LogFields {
    fn driver_name(&self) -> &str;
    fn company(&self) -> &str;
    fn location(&self) -> &str;
    fn created_at(&self) -> Timestamp;
}

/// A compiled admin filter. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    needle: Option<String>,
    date: Option<NaiveDate>,
}

impl LogFilter {
    /// Build a filter; a blank search term is treated as absent.
    pub fn new(search: Option<&str>, date: Option<NaiveDate>) -> Self {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self { needle, date }
    }

    pub fn matches<L: LogFields>(&self, log: &L) -> bool {
        let matches_search = match &self.needle {
            None => true,
            Some(needle) => [log.driver_name(), log.company(), log.location()]
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        };
        let matches_date = self
            .date
            .map_or(true, |date| log.created_at().date_naive() == date);
        matches_search && matches_date
    }

    /// Keep only matching logs, preserving order.
    pub fn apply<L: LogFields>(&self, logs: Vec<L>) -> Vec<L> {
        logs.into_iter().filter(|log| self.matches(log)).collect()
    }
}

/// Aggregate counts shown above the admin table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSummary {
    /// Number of logs in the (filtered) set.
    pub total: usize,
    /// Logs whose UTC date equals `today`.
    pub today: usize,
    /// Log count per company name.
    pub companies: BTreeMap<String, usize>,
}

pub fn summarize<L: LogFields>(logs: &[L], today: NaiveDate) -> LogSummary {
    let mut summary = LogSummary {
        total: logs.len(),
        ..LogSummary::default()
    };
    for log in logs {
        if log.created_at().date_naive() == today {
            summary.today += 1;
        }
        *summary.companies.entry(log.company().to_string()).or_default() += 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    struct Entry {
        driver: &'static str,
        company: &'static str,
        location: &'static str,
        at: Timestamp,
    }

    impl LogFields for Entry {
        fn driver_name(&self) -> &str {
            self.driver
        }
        fn company(&self) -> &str {
            self.company
        }
        fn location(&self) -> &str {
            self.location
        }
        fn created_at(&self) -> Timestamp {
            self.at
        }
    }

    fn entries() -> Vec<Entry> {
        vec![
            Entry {
                driver: "Kim",
                company: "Acme",
                location: "Gate 1",
                at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap(),
            },
            Entry {
                driver: "Lee",
                company: "Hanbit Logistics",
                location: "Gate 2",
                at: Utc.with_ymd_and_hms(2026, 10, 18, 23, 59, 0).unwrap(),
            },
            Entry {
                driver: "Park",
                company: "Acme",
                location: "North Yard",
                at: Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap(),
            },
        ]
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = LogFilter::new(Some("   "), None);
        assert_eq!(filter, LogFilter::default());
        assert_eq!(filter.apply(entries()).len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let by_company = LogFilter::new(Some("ACME"), None).apply(entries());
        assert_eq!(
            by_company.iter().map(|e| e.driver).collect::<Vec<_>>(),
            vec!["Kim", "Park"]
        );

        let by_location = LogFilter::new(Some("yard"), None).apply(entries());
        assert_eq!(by_location.len(), 1);
        assert_eq!(by_location[0].driver, "Park");

        let by_driver = LogFilter::new(Some("lee"), None).apply(entries());
        assert_eq!(by_driver.len(), 1);
    }

    #[test]
    fn date_filter_uses_utc_calendar_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let matched = LogFilter::new(None, Some(date)).apply(entries());
        assert_eq!(
            matched.iter().map(|e| e.driver).collect::<Vec<_>>(),
            vec!["Kim", "Lee"]
        );
    }

    #[test]
    fn search_and_date_combine() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let matched = LogFilter::new(Some("acme"), Some(date)).apply(entries());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].driver, "Kim");
    }

    #[test]
    fn summary_counts_today_and_companies() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let summary = summarize(&entries(), today);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.today, 2);
        assert_eq!(summary.companies.get("Acme"), Some(&2));
        assert_eq!(summary.companies.get("Hanbit Logistics"), Some(&1));
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(summarize::<Entry>(&[], today), LogSummary::default());
    }
}
