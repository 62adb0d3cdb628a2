//! De-duplicated alert list
//!
//! Alerts are kept in creation order. An incoming alert whose
//! (source, title, kind) matches one already present is dropped, which is
//! the only guard against repeated generator passes piling up duplicates.

use serde::{Deserialize, Serialize};

use crate::alerts::alert::{Alert, AlertDraft, AlertId, AlertKind};
use crate::core::types::Timestamp;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertManager {
    alerts: Vec<Alert>,
    /// Last sequence number handed out; survives `clear_all`
    last_seq: u64,
}

impl AlertManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `draft` unless an alert with the same identity exists
    ///
    /// Returns the new id, or `None` when the draft was a duplicate.
    pub fn add(&mut self, draft: AlertDraft, now: Timestamp) -> Option<AlertId> {
        if self.alerts.iter().any(|existing| draft.matches(existing)) {
            tracing::trace!(title = %draft.title, "duplicate alert suppressed");
            return None;
        }

        self.last_seq += 1;
        let id = AlertId::new(self.last_seq, now);
        if draft.kind == AlertKind::Critical {
            tracing::warn!(id = %id, source = draft.source.as_str(), title = %draft.title, "critical alert raised");
        } else {
            tracing::debug!(id = %id, source = draft.source.as_str(), title = %draft.title, "alert raised");
        }
        self.alerts.push(draft.into_alert(id.clone(), now));
        Some(id)
    }

    /// Add every draft in order, returning how many were new
    pub fn extend(&mut self, drafts: impl IntoIterator<Item = AlertDraft>, now: Timestamp) -> usize {
        drafts.into_iter().filter_map(|d| self.add(d, now)).count()
    }

    /// Remove the alert with `id`; false when no such alert exists
    pub fn clear(&mut self, id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id.as_str() != id);
        self.alerts.len() != before
    }

    pub fn clear_all(&mut self) {
        self.alerts.clear();
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id.as_str() == id)
    }

    pub fn count(&self) -> usize {
        self.alerts.len()
    }

    pub fn critical_count(&self) -> usize {
        self.alerts.iter().filter(|a| a.is_critical()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
