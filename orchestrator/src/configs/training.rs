use std::{num::NonZeroUsize, path::PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetConfig {
    Inline {
        data: Vec<f32>,
        x_size: usize,
        y_size: usize,
    },
    Csv {
        path: PathBuf,
        x_size: usize,
        y_size: usize,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchConfig {
    #[default]
    PerLayer,
    Fused,
}

/// What to do with a step whose activations or gradients are not finite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegeneracyConfig {
    Apply,
    #[default]
    Skip,
    Backoff {
        factor: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrainingConfig {
    pub dataset: DatasetConfig,
    pub learning_rate: f32,
    pub epochs: NonZeroUsize,
    pub batch_size: NonZeroUsize,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub on_degeneracy: DegeneracyConfig,
    /// Where to write the trained parameters as JSON.
    #[serde(default)]
    pub output: Option<PathBuf>,
}
