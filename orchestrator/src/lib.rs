pub mod configs;
pub mod dataset;
pub mod error;
pub mod metrics;
mod session;

use configs::{Adapted, Adapter};

pub use dataset::{Dataset, DatasetError};
pub use error::OrchestratorError;
pub use metrics::TrainingMetrics;
pub use session::{DegeneracyPolicy, Session, SessionOptions, TrainingEvent};

use crate::configs::{ModelConfig, TrainingConfig};

/// Validates the configs and prepares a training session.
///
/// # Errors
/// Returns an `OrchestratorError` if the configs are invalid or the dataset can't be loaded.
pub fn train(model: ModelConfig, training: TrainingConfig) -> Result<Session, OrchestratorError> {
    log::info!("adapting configs");
    let adapter = Adapter::new();

    let Adapted {
        engine,
        params,
        dataset,
        options,
        seed,
    } = adapter.adapt_configs(model, training)?;

    log::info!(
        "network {:?} with {} parameters, {} samples, seed {seed}",
        engine.topology().sizes(),
        params.len(),
        dataset.len()
    );

    Ok(Session::new(engine, params, dataset, options, seed))
}
