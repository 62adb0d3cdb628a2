//! Async service layer: simulated latency, stale-response guarding and polling

pub mod dashboard;
pub mod epoch;
pub mod poller;

pub use dashboard::Dashboard;
pub use epoch::StreamEpochs;
pub use poller::{PanelUpdate, Poller};
