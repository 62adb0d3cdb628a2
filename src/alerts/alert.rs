//! Alert records

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{Priority, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Info,
    Warning,
    Critical,
    Success,
}

impl AlertKind {
    /// Sort rank, higher is more severe
    pub fn rank(self) -> u8 {
        match self {
            AlertKind::Critical => 4,
            AlertKind::Warning => 3,
            AlertKind::Info => 2,
            AlertKind::Success => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Info => "info",
            AlertKind::Warning => "warning",
            AlertKind::Critical => "critical",
            AlertKind::Success => "success",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Some(AlertKind::Info),
            "warning" => Some(AlertKind::Warning),
            "critical" => Some(AlertKind::Critical),
            "success" => Some(AlertKind::Success),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertSource {
    #[serde(rename = "KPI")]
    Kpi,
    Risk,
    Budget,
    CashFlow,
    System,
    Market,
}

impl AlertSource {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertSource::Kpi => "KPI",
            AlertSource::Risk => "Risk",
            AlertSource::Budget => "Budget",
            AlertSource::CashFlow => "CashFlow",
            AlertSource::System => "System",
            AlertSource::Market => "Market",
        }
    }
}

/// Identifier of the form `alert_<seq>_<timestamp>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(pub String);

impl AlertId {
    pub fn new(seq: u64, timestamp: Timestamp) -> Self {
        Self(format!("alert_{}_{}", seq, timestamp))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub timestamp: Timestamp,
    pub source: AlertSource,
    pub priority: Priority,
    pub action_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
}

impl Alert {
    pub fn is_critical(&self) -> bool {
        self.kind == AlertKind::Critical
    }
}

/// An alert before the manager assigns its id and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub source: AlertSource,
    pub priority: Priority,
    pub action_required: bool,
    pub threshold: Option<f64>,
    pub current_value: Option<f64>,
}

impl AlertDraft {
    pub fn new(
        kind: AlertKind,
        source: AlertSource,
        priority: Priority,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            source,
            priority,
            action_required: true,
            threshold: None,
            current_value: None,
        }
    }

    /// Critical, high priority, action required
    pub fn critical(source: AlertSource, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::Critical, source, Priority::High, title, message)
    }

    /// Warning, medium priority, action required
    pub fn warning(source: AlertSource, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::Warning, source, Priority::Medium, title, message)
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn current_value(mut self, value: f64) -> Self {
        self.current_value = Some(value);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn informational(mut self) -> Self {
        self.action_required = false;
        self
    }

    /// Whether `alert` carries the same (source, title, kind) identity
    pub fn matches(&self, alert: &Alert) -> bool {
        alert.source == self.source && alert.kind == self.kind && alert.title == self.title
    }

    pub fn into_alert(self, id: AlertId, timestamp: Timestamp) -> Alert {
        Alert {
            id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            timestamp,
            source: self.source,
            priority: self.priority,
            action_required: self.action_required,
            threshold: self.threshold,
            current_value: self.current_value,
        }
    }
}
