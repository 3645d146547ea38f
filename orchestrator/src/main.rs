use std::{env, fs};

use log::info;
use orchestrator::{OrchestratorError, TrainingEvent, configs::RunConfig};
use serde::Serialize;

/// The trained network as written to the output file.
#[derive(Serialize)]
struct TrainedModel<'a> {
    sizes: &'a [usize],
    params: &'a [f32],
}

fn main() -> Result<(), OrchestratorError> {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .or_else(|| env::var("CONFIG").ok())
        .ok_or_else(|| {
            OrchestratorError::InvalidConfig(
                "usage: orchestrator <config.json> (or set CONFIG)".into(),
            )
        })?;

    info!("loading config from {path}");
    let RunConfig { model, training } = RunConfig::load(&path)?;
    let output = training.output.clone();

    let session = orchestrator::train(model, training)?;
    let sizes = session.engine().topology().sizes().to_vec();

    let (params, metrics) = session.run(|event| match event {
        TrainingEvent::EpochFinished { epoch, loss } => info!("epoch {epoch}: loss={loss:.6}"),
        TrainingEvent::BatchSkipped {
            epoch,
            step,
            learning_rate,
            ..
        } => info!("epoch {epoch} step {step} skipped, learning rate now {learning_rate}"),
        _ => {}
    })?;

    info!(
        "{} steps, {} skipped batches, compute {:?}, apply {:?}",
        metrics.steps, metrics.skipped_batches, metrics.compute_time, metrics.apply_time
    );

    if let Some(output) = output {
        let model = TrainedModel {
            sizes: &sizes,
            params: params.as_slice(),
        };

        fs::write(&output, serde_json::to_string_pretty(&model)?)?;
        info!("trained parameters written to {}", output.display());
    }

    Ok(())
}
