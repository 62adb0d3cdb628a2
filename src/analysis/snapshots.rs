//! Named scenario and configuration snapshots on disk
//!
//! Two JSON arrays in one directory, appended to on every save:
//! `scenarios.json` and `simulation-configs.json`. A missing file reads as an
//! empty list. The engine never touches these files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::analysis::scenario::{ProjectedResults, ScenarioInputs};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::Timestamp;

pub const SCENARIOS_FILE: &str = "scenarios.json";
pub const CONFIGS_FILE: &str = "simulation-configs.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedScenario {
    pub name: String,
    pub inputs: ScenarioInputs,
    pub results: ProjectedResults,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedConfig {
    pub name: String,
    pub config: SimulationConfig,
    pub timestamp: Timestamp,
}

pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_list<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_list<T: Serialize>(&self, file: &str, items: &[T]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file);
        fs::write(&path, serde_json::to_string_pretty(items)?)?;
        tracing::debug!(path = %path.display(), count = items.len(), "snapshot list written");
        Ok(())
    }

    pub fn scenarios(&self) -> Result<Vec<SavedScenario>> {
        self.read_list(SCENARIOS_FILE)
    }

    /// Append a scenario; returns the new list length
    pub fn save_scenario(&self, scenario: SavedScenario) -> Result<usize> {
        let mut all = self.scenarios()?;
        all.push(scenario);
        self.write_list(SCENARIOS_FILE, &all)?;
        Ok(all.len())
    }

    pub fn configs(&self) -> Result<Vec<SavedConfig>> {
        self.read_list(CONFIGS_FILE)
    }

    pub fn save_config(&self, saved: SavedConfig) -> Result<usize> {
        let mut all = self.configs()?;
        all.push(saved);
        self.write_list(CONFIGS_FILE, &all)?;
        Ok(all.len())
    }

    /// Most recently saved config with `name`
    pub fn find_config(&self, name: &str) -> Result<Option<SavedConfig>> {
        Ok(self.configs()?.into_iter().rev().find(|c| c.name == name))
    }
}
