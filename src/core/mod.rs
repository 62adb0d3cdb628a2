pub mod clock;
pub mod config;
pub mod error;
pub mod random;
pub mod settings;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigPatch, SimulationConfig};
pub use error::{CfoError, Result};
pub use random::{RandomSource, SeededRng, SequenceRng};
pub use settings::{EngineSettings, LatencyProfile, PollingIntervals};
