mod adapter;
mod model;
mod training;

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

pub use adapter::{Adapted, Adapter};
pub use model::{ActFnConfig, LayerConfig, ModelConfig, ParamGenConfig};
pub use training::{DatasetConfig, DegeneracyConfig, DispatchConfig, TrainingConfig};

use crate::error::OrchestratorError;

/// The whole JSON configuration of a run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RunConfig {
    pub model: ModelConfig,
    pub training: TrainingConfig,
}

impl RunConfig {
    pub fn from_json(content: &str) -> Result<Self, OrchestratorError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, OrchestratorError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
