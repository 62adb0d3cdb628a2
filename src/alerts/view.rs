//! Presentation helpers: filter, search, sort and tally an alert list

use std::cmp::Reverse;

use chrono::DateTime;

use crate::alerts::alert::{Alert, AlertKind};
use crate::core::types::Timestamp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlertSort {
    /// Most recent first
    #[default]
    Newest,
    Priority,
    /// Critical, warning, info, success
    Severity,
}

impl AlertSort {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "timestamp" | "time" => Some(AlertSort::Newest),
            "priority" => Some(AlertSort::Priority),
            "severity" | "type" => Some(AlertSort::Severity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    /// `None` shows every kind
    pub kind: Option<AlertKind>,
    /// Case-insensitive substring of title, message or source
    pub search: Option<String>,
}

impl AlertFilter {
    pub fn kind(kind: AlertKind) -> Self {
        Self { kind: Some(kind), search: None }
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self { kind: None, search: Some(term.into()) }
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        if self.kind.is_some_and(|kind| alert.kind != kind) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                alert.title.to_lowercase().contains(&term)
                    || alert.message.to_lowercase().contains(&term)
                    || alert.source.as_str().to_lowercase().contains(&term)
            }
        }
    }
}

/// Alerts passing `filter`, ordered by `sort`; ties keep creation order
pub fn select<'a>(alerts: &'a [Alert], filter: &AlertFilter, sort: AlertSort) -> Vec<&'a Alert> {
    let mut selected: Vec<&Alert> = alerts.iter().filter(|a| filter.matches(a)).collect();
    match sort {
        AlertSort::Newest => selected.sort_by_key(|a| Reverse(a.timestamp)),
        AlertSort::Priority => selected.sort_by_key(|a| Reverse(a.priority.rank())),
        AlertSort::Severity => selected.sort_by_key(|a| Reverse(a.kind.rank())),
    }
    selected
}

/// Per-kind counts for the summary footer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertTally {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub success: usize,
    pub action_required: usize,
}

impl AlertTally {
    pub fn of(alerts: &[Alert]) -> Self {
        let mut tally = Self { total: alerts.len(), ..Self::default() };
        for alert in alerts {
            match alert.kind {
                AlertKind::Critical => tally.critical += 1,
                AlertKind::Warning => tally.warning += 1,
                AlertKind::Info => tally.info += 1,
                AlertKind::Success => tally.success += 1,
            }
            if alert.action_required {
                tally.action_required += 1;
            }
        }
        tally
    }
}

/// "Just now", "5m ago", "3h ago", or the UTC date for anything older
pub fn format_age(now: Timestamp, timestamp: Timestamp) -> String {
    let diff = now - timestamp;
    let minutes = diff / 60_000;
    let hours = diff / 3_600_000;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        DateTime::from_timestamp_millis(timestamp)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::alert::{AlertDraft, AlertId, AlertSource};
    use crate::core::types::Priority;

    fn alert(seq: u64, draft: AlertDraft, timestamp: Timestamp) -> Alert {
        draft.into_alert(AlertId::new(seq, timestamp), timestamp)
    }

    fn sample() -> Vec<Alert> {
        vec![
            alert(1, AlertDraft::warning(AlertSource::Budget, "Low Efficiency - Sales", "Sales efficiency at 55%"), 100),
            alert(2, AlertDraft::critical(AlertSource::Risk, "Critical Risk Level - Market Risk", "score 85"), 200),
            alert(
                3,
                AlertDraft::new(AlertKind::Info, AlertSource::System, Priority::Low, "Sync", "all good").informational(),
                300,
            ),
            alert(4, AlertDraft::warning(AlertSource::Market, "Market Event: TECHNOLOGY SHIFT", "disruption"), 300),
        ]
    }

    fn titles(alerts: &[&Alert]) -> Vec<String> {
        alerts.iter().map(|a| a.title.clone()).collect()
    }

    #[test]
    fn test_filter_by_kind() {
        let alerts = sample();
        let warnings = select(&alerts, &AlertFilter::kind(AlertKind::Warning), AlertSort::Newest);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|a| a.kind == AlertKind::Warning));
    }

    #[test]
    fn test_search_covers_source_case_insensitively() {
        let alerts = sample();
        let hits = select(&alerts, &AlertFilter::search("RISK"), AlertSort::Newest);
        assert_eq!(titles(&hits), ["Critical Risk Level - Market Risk"]);

        let by_source = select(&alerts, &AlertFilter::search("budget"), AlertSort::Newest);
        assert_eq!(titles(&by_source), ["Low Efficiency - Sales"]);

        assert_eq!(select(&alerts, &AlertFilter::search("  "), AlertSort::Newest).len(), 4);
    }

    #[test]
    fn test_newest_first_is_stable() {
        let alerts = sample();
        let sorted = select(&alerts, &AlertFilter::default(), AlertSort::Newest);
        assert_eq!(sorted[0].title, "Sync");
        assert_eq!(sorted[1].title, "Market Event: TECHNOLOGY SHIFT");
        assert_eq!(sorted[3].title, "Low Efficiency - Sales");
    }

    #[test]
    fn test_severity_and_priority_sorts() {
        let alerts = sample();
        let by_severity = select(&alerts, &AlertFilter::default(), AlertSort::Severity);
        assert_eq!(by_severity[0].kind, AlertKind::Critical);
        assert_eq!(by_severity[3].kind, AlertKind::Info);

        let by_priority = select(&alerts, &AlertFilter::default(), AlertSort::Priority);
        assert_eq!(by_priority[0].priority, Priority::High);
        assert_eq!(by_priority[3].priority, Priority::Low);
    }

    #[test]
    fn test_tally() {
        let tally = AlertTally::of(&sample());
        assert_eq!(
            tally,
            AlertTally { total: 4, critical: 1, warning: 2, info: 1, success: 0, action_required: 3 }
        );
    }

    #[test]
    fn test_format_age() {
        let now = 1_760_875_200_000;
        assert_eq!(format_age(now, now - 59_999), "Just now");
        assert_eq!(format_age(now, now - 5 * 60_000), "5m ago");
        assert_eq!(format_age(now, now - 3 * 3_600_000), "3h ago");
        assert_eq!(format_age(now, now - 2 * 86_400_000), "2025-10-17");
    }
}
