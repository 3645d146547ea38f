use std::time::Instant;

use engine::{Degeneracy, Engine, ParameterStore};
use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};

use crate::{dataset::Dataset, error::OrchestratorError, metrics::TrainingMetrics};

/// What to do with a step whose activations or gradients are not finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegeneracyPolicy {
    /// Apply the update anyway.
    Apply,
    /// Discard the update.
    Skip,
    /// Discard the update and scale the learning rate by `factor`.
    Backoff { factor: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f32,
    pub shuffle: bool,
    pub policy: DegeneracyPolicy,
}

/// Progress notifications of a training run.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingEvent {
    StepFinished {
        epoch: usize,
        step: usize,
        loss: f32,
    },
    BatchSkipped {
        epoch: usize,
        step: usize,
        degeneracy: Degeneracy,
        learning_rate: f32,
    },
    EpochFinished {
        epoch: usize,
        loss: f32,
    },
    Finished {
        metrics: TrainingMetrics,
    },
}

/// A training run over an in-memory dataset, one engine step per batch.
#[derive(Debug)]
pub struct Session {
    engine: Engine,
    params: ParameterStore,
    dataset: Dataset,
    options: SessionOptions,
    rng: StdRng,
    metrics: TrainingMetrics,
}

impl Session {
    /// Creates a new `Session`.
    ///
    /// # Arguments
    /// * `engine` - The engine of the network to train.
    /// * `params` - The initial parameters.
    /// * `dataset` - The training data.
    /// * `options` - The training hyperparameters.
    /// * `seed` - The seed of the shuffling.
    ///
    /// # Returns
    /// A new `Session` instance.
    pub fn new(
        engine: Engine,
        params: ParameterStore,
        dataset: Dataset,
        options: SessionOptions,
        seed: u64,
    ) -> Self {
        Self {
            engine,
            params,
            dataset,
            options,
            rng: StdRng::seed_from_u64(seed),
            metrics: TrainingMetrics::default(),
        }
    }

    #[inline]
    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    #[inline]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[inline]
    pub fn learning_rate(&self) -> f32 {
        self.options.learning_rate
    }

    #[inline]
    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    /// Trains for every configured epoch.
    ///
    /// # Arguments
    /// * `on_event` - Called with every `TrainingEvent`, in order.
    ///
    /// # Returns
    /// The trained parameters and the run's metrics, or the first engine error.
    pub fn run<F>(
        mut self,
        mut on_event: F,
    ) -> Result<(ParameterStore, TrainingMetrics), OrchestratorError>
    where
        F: FnMut(TrainingEvent),
    {
        info!(
            "training for {} epoch(s) over {} samples",
            self.options.epochs,
            self.dataset.len()
        );

        for epoch in 0..self.options.epochs {
            let loss = self.run_epoch(epoch, &mut on_event)?;
            on_event(TrainingEvent::EpochFinished { epoch, loss });
        }

        info!(
            steps = self.metrics.steps,
            skipped = self.metrics.skipped_batches;
            "training finished"
        );
        on_event(TrainingEvent::Finished {
            metrics: self.metrics.clone(),
        });

        Ok((self.params, self.metrics))
    }

    /// Trains over the whole dataset once.
    ///
    /// # Returns
    /// The mean loss of the applied steps, weighted by their amount of samples.
    pub fn run_epoch<F>(
        &mut self,
        epoch: usize,
        on_event: &mut F,
    ) -> Result<f32, OrchestratorError>
    where
        F: FnMut(TrainingEvent),
    {
        if self.options.shuffle {
            self.dataset.shuffle(&mut self.rng);
        }

        let mut loss_sum = 0.;
        let mut samples = 0;

        for (step, batch) in self.dataset.batches(self.options.batch_size).enumerate() {
            let start = Instant::now();
            let update = self.engine.compute(&self.params, &batch)?;
            self.metrics.compute_time += start.elapsed();

            let report = *update.report();

            if let Some(degeneracy) = report.degeneracy {
                let learning_rate = match self.options.policy {
                    DegeneracyPolicy::Apply => None,
                    DegeneracyPolicy::Skip => Some(self.options.learning_rate),
                    DegeneracyPolicy::Backoff { factor } => {
                        Some(self.options.learning_rate * factor)
                    }
                };

                if let Some(learning_rate) = learning_rate {
                    warn!("epoch {epoch} step {step}: skipping batch, {degeneracy}");
                    self.options.learning_rate = learning_rate;
                    self.metrics.bump_skipped();

                    on_event(TrainingEvent::BatchSkipped {
                        epoch,
                        step,
                        degeneracy,
                        learning_rate,
                    });
                    continue;
                }
            }

            let start = Instant::now();
            self.engine
                .apply(&mut self.params, update, self.options.learning_rate)?;
            self.metrics.apply_time += start.elapsed();

            self.metrics.bump_step();
            self.metrics.add_samples(report.passes);
            loss_sum += report.loss * report.passes as f32;
            samples += report.passes;

            on_event(TrainingEvent::StepFinished {
                epoch,
                step,
                loss: report.loss,
            });
        }

        self.metrics.bump_epoch();

        let loss = if samples == 0 { f32::NAN } else { loss_sum / samples as f32 };
        debug!(epoch = epoch, loss = loss; "epoch finished");
        Ok(loss)
    }
}
