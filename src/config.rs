//! Simulation parameters.
//!
//! A `SimulationConfig` can be built in code, loaded from a JSON file, or assembled by the
//! command-line runner from a file plus flag overrides. Every field is optional in JSON and
//! falls back to its default:
//!
//! ```json
//! {
//!     "population_size": 100,
//!     "spread_factor": 3,
//!     "row_width": 6,
//!     "tick_interval": "1s",
//!     "random_seed": 0,
//!     "initial_infections": [0]
//! }
//! ```
use std::fs;
use std::path::Path;
use std::time::Duration;

use log::trace;
use serde::{Deserialize, Deserializer};

use crate::error::ContagionError;

pub const DEFAULT_POPULATION_SIZE: usize = 100;
pub const DEFAULT_SPREAD_FACTOR: usize = 3;
pub const DEFAULT_ROW_WIDTH: usize = 6;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub population_size: usize,
    /// Upper bound on the new infections a single source causes per tick.
    pub spread_factor: usize,
    /// Members per grid row.
    pub row_width: usize,
    /// How often the scheduler calls `tick`. The engine itself never reads this.
    #[serde(deserialize_with = "deserialize_duration")]
    pub tick_interval: Duration,
    pub random_seed: u64,
    /// Members infected before the first tick.
    pub initial_infections: Vec<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            population_size: DEFAULT_POPULATION_SIZE,
            spread_factor: DEFAULT_SPREAD_FACTOR,
            row_width: DEFAULT_ROW_WIDTH,
            tick_interval: DEFAULT_TICK_INTERVAL,
            random_seed: 0,
            initial_infections: Vec::new(),
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(&text).map_err(serde::de::Error::custom)
}

impl SimulationConfig {
    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, ContagionError> {
        trace!("loading simulation config from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// # Errors
    /// Returns `ContagionError::JsonError` if `text` is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, ContagionError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Checks that an engine can be built from this configuration.
    ///
    /// # Errors
    /// Returns `ContagionError::InvalidConfiguration` describing the first problem found.
    pub fn validate(&self) -> Result<(), ContagionError> {
        if self.spread_factor < 1 {
            return Err(ContagionError::InvalidConfiguration(
                "spread factor must be at least 1".to_string(),
            ));
        }
        if self.row_width < 1 {
            return Err(ContagionError::InvalidConfiguration(
                "row width must be at least 1".to_string(),
            ));
        }
        if let Some(index) = self
            .initial_infections
            .iter()
            .find(|&&index| index >= self.population_size)
        {
            return Err(ContagionError::InvalidConfiguration(format!(
                "initial infection {} is outside a population of {}",
                index, self.population_size
            )));
        }
        Ok(())
    }
}
