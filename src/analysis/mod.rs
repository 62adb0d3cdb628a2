//! Analysis on top of fetched data: series statistics, what-if scenarios and
//! saved snapshots

pub mod scenario;
pub mod snapshots;
pub mod stats;

pub use scenario::{project, ProjectedResults, ScenarioInputs};
pub use snapshots::{SavedConfig, SavedScenario, SnapshotStore};
pub use stats::SeriesStats;
