//! Simulation state model: derived business metrics and market events

pub mod business;
pub mod market;

pub use business::BusinessMetrics;
pub use market::{MarketEvent, MarketEventKind, MarketEvents};
