//! Alerting: records, de-duplicating manager, threshold rules and views

pub mod alert;
pub mod manager;
pub mod rules;
pub mod thresholds;
pub mod view;

pub use alert::{Alert, AlertDraft, AlertId, AlertKind, AlertSource};
pub use manager::AlertManager;
pub use view::{AlertFilter, AlertSort, AlertTally};
