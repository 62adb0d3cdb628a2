//! AI CFO - financial dashboard simulation engine
//!
//! Synthesizes KPIs, cash flow, budgets, risk scores, insights, KPI history
//! and alerts from a set of simulation levers, with interdependent business
//! metrics and randomly generated market events.

pub mod alerts;
pub mod analysis;
pub mod core;
pub mod generators;
pub mod model;
pub mod service;
pub mod simulation;

pub use crate::core::{CfoError, ConfigPatch, EngineSettings, Result, SimulationConfig};
pub use crate::service::Dashboard;
pub use crate::simulation::SimulationEngine;
