use log::{debug, warn};

use crate::{
    buffers::{ActivationCache, GradientBuffer, ParameterStore},
    dispatch::{Dispatch, LayerLedger},
    error::{BatchErr, ConfigErr, Result},
    kernels::{StepCtx, apply, backward, forward},
    loss::Mse,
    numerics::Degeneracy,
    topology::{MAX_BATCH_SIZE, Topology},
};

/// A single training example, borrowed from wherever the host keeps its data.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub input: &'a [f32],
    pub expected: &'a [f32],
}

impl<'a> Sample<'a> {
    pub fn new(input: &'a [f32], expected: &'a [f32]) -> Self {
        Self { input, expected }
    }
}

/// What the host learns about a computed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Mean squared error over every pass and output, before the update.
    pub loss: f32,
    pub passes: usize,
    pub degeneracy: Option<Degeneracy>,
}

/// The result of forward and backward propagation over a batch, not yet applied.
///
/// Dropping it discards the step, the parameter store is only ever touched by `Engine::apply`.
#[derive(Debug)]
pub struct PendingUpdate {
    cache: ActivationCache,
    grads: GradientBuffer,
    forward: LayerLedger,
    backward: LayerLedger,
    report: StepReport,
}

impl PendingUpdate {
    #[inline]
    pub fn report(&self) -> &StepReport {
        &self.report
    }

    /// The gradients of every pass.
    #[inline]
    pub fn gradients(&self) -> &GradientBuffer {
        &self.grads
    }

    /// The output activations of `pass`.
    pub fn outputs(&self, pass: usize) -> Vec<f32> {
        self.cache.outputs(pass)
    }

    /// Neurons completed per layer by forward propagation.
    #[inline]
    pub fn forward_ledger(&self) -> &LayerLedger {
        &self.forward
    }

    /// Neurons completed per layer by backward propagation.
    #[inline]
    pub fn backward_ledger(&self) -> &LayerLedger {
        &self.backward
    }
}

/// Drives the forward, backward and application kernels for one network.
#[derive(Debug, Clone)]
pub struct Engine {
    topology: Topology,
    dispatch: Dispatch,
}

impl Engine {
    /// Creates a new `Engine`.
    ///
    /// # Arguments
    /// * `topology` - The network to train.
    /// * `dispatch` - How the kernels are driven over the layers.
    pub fn new(topology: Topology, dispatch: Dispatch) -> Self {
        Self { topology, dispatch }
    }

    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[inline]
    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    /// Runs forward and backward propagation over `batch`.
    ///
    /// # Arguments
    /// * `params` - The current parameters, read only.
    /// * `batch` - Between `1` and `MAX_BATCH_SIZE` samples.
    ///
    /// # Returns
    /// The pending update or an error if the parameters or the batch don't fit the topology,
    /// in which case nothing was dispatched.
    pub fn compute(&self, params: &ParameterStore, batch: &[Sample<'_>]) -> Result<PendingUpdate> {
        self.check_params(params)?;
        self.check_batch(batch)?;

        let sizes = self.topology.sizes();
        let passes = batch.len();

        let cache = ActivationCache::new(sizes, passes);
        let grads = GradientBuffer::new(sizes, passes);

        for (pass, sample) in batch.iter().enumerate() {
            cache.write_inputs(pass, sample.input);
            grads.write_expected(pass, sample.expected);
        }

        let ctx = StepCtx {
            topology: &self.topology,
            params: params.as_slice(),
            cache: &cache,
            grads: &grads,
        };

        let forward_ledger = LayerLedger::new(sizes.len());
        forward::run(&ctx, self.dispatch, &forward_ledger);

        let backward_ledger = LayerLedger::new(sizes.len());
        backward::run(&ctx, self.dispatch, &backward_ledger);

        let outputs: Vec<_> = (0..passes).map(|pass| cache.outputs(pass)).collect();
        let loss = Mse.batch_loss(
            outputs
                .iter()
                .zip(batch)
                .map(|(y_pred, sample)| (y_pred.as_slice(), sample.expected)),
        );

        let degeneracy = Degeneracy::scan(sizes, &cache, &grads);
        if let Some(degeneracy) = degeneracy {
            warn!("degenerate step over {passes} passes: {degeneracy}");
        }

        debug!(passes = passes, loss = loss; "computed step");

        Ok(PendingUpdate {
            cache,
            grads,
            forward: forward_ledger,
            backward: backward_ledger,
            report: StepReport {
                loss,
                passes,
                degeneracy,
            },
        })
    }

    /// Applies a pending update to the parameters.
    ///
    /// # Arguments
    /// * `params` - The parameters the update was computed from.
    /// * `update` - The result of `compute`.
    /// * `lr` - The learning rate, finite and not negative.
    ///
    /// # Returns
    /// The report of the applied step or a configuration error, in which case `params` was not
    /// modified.
    pub fn apply(
        &self,
        params: &mut ParameterStore,
        update: PendingUpdate,
        lr: f32,
    ) -> Result<StepReport> {
        apply::apply(
            params.as_mut_slice(),
            self.topology.sizes(),
            &update.grads,
            lr,
        )?;

        Ok(update.report)
    }

    /// Computes and applies one step.
    ///
    /// The learning rate is validated before anything is dispatched.
    pub fn train_step(
        &self,
        params: &mut ParameterStore,
        batch: &[Sample<'_>],
        lr: f32,
    ) -> Result<StepReport> {
        if !lr.is_finite() || lr < 0. {
            return Err(ConfigErr::InvalidLearningRate { got: lr }.into());
        }

        let update = self.compute(params, batch)?;
        self.apply(params, update, lr)
    }

    /// Runs forward propagation only.
    ///
    /// # Arguments
    /// * `params` - The parameters of the network.
    /// * `inputs` - Any amount of input vectors, split in batches of at most `MAX_BATCH_SIZE`.
    ///
    /// # Returns
    /// The output activations of every input, in order.
    pub fn predict(&self, params: &ParameterStore, inputs: &[&[f32]]) -> Result<Vec<Vec<f32>>> {
        self.check_params(params)?;

        let sizes = self.topology.sizes();
        for (pass, input) in inputs.iter().enumerate() {
            self.check_input(pass, input)?;
        }

        let mut outputs = Vec::with_capacity(inputs.len());

        for chunk in inputs.chunks(MAX_BATCH_SIZE) {
            let cache = ActivationCache::new(sizes, chunk.len());
            // forward propagation never reads gradients
            let grads = GradientBuffer::new(sizes, 0);

            for (pass, input) in chunk.iter().enumerate() {
                cache.write_inputs(pass, input);
            }

            let ctx = StepCtx {
                topology: &self.topology,
                params: params.as_slice(),
                cache: &cache,
                grads: &grads,
            };

            forward::run(&ctx, self.dispatch, &LayerLedger::new(sizes.len()));
            outputs.extend((0..chunk.len()).map(|pass| cache.outputs(pass)));
        }

        Ok(outputs)
    }

    fn check_params(&self, params: &ParameterStore) -> std::result::Result<(), ConfigErr> {
        let expected = self.topology.nparams();

        if params.len() != expected {
            return Err(ConfigErr::ParamsLengthMismatch {
                got: params.len(),
                expected,
            });
        }

        Ok(())
    }

    fn check_input(&self, pass: usize, input: &[f32]) -> std::result::Result<(), BatchErr> {
        let expected = self.topology.input_size();

        if input.len() != expected {
            return Err(BatchErr::InputLengthMismatch {
                pass,
                got: input.len(),
                expected,
            });
        }

        Ok(())
    }

    fn check_batch(&self, batch: &[Sample<'_>]) -> std::result::Result<(), BatchErr> {
        if batch.is_empty() {
            return Err(BatchErr::Empty);
        }

        if batch.len() > MAX_BATCH_SIZE {
            return Err(BatchErr::TooLarge {
                got: batch.len(),
                max: MAX_BATCH_SIZE,
            });
        }

        let expected = self.topology.output_size();

        for (pass, sample) in batch.iter().enumerate() {
            self.check_input(pass, sample.input)?;

            if sample.expected.len() != expected {
                return Err(BatchErr::ExpectedLengthMismatch {
                    pass,
                    got: sample.expected.len(),
                    expected,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{activations::ActFn, error::KernelErr};

    fn engine() -> Engine {
        let topology = Topology::uniform(vec![2, 3, 1], ActFn::sigmoid()).unwrap();
        Engine::new(topology, Dispatch::PerLayer)
    }

    #[test]
    fn empty_batch() {
        let engine = engine();
        let params = ParameterStore::zeroed(engine.topology());

        let err = engine.compute(&params, &[]).unwrap_err();
        assert_eq!(err, KernelErr::Batch(BatchErr::Empty));
    }

    #[test]
    fn oversized_batch() {
        let engine = engine();
        let params = ParameterStore::zeroed(engine.topology());
        let sample = Sample::new(&[0., 0.], &[0.]);
        let batch = vec![sample; MAX_BATCH_SIZE + 1];

        let err = engine.compute(&params, &batch).unwrap_err();
        assert!(matches!(err, KernelErr::Batch(BatchErr::TooLarge { .. })));
    }

    #[test]
    fn mismatched_sample() {
        let engine = engine();
        let params = ParameterStore::zeroed(engine.topology());
        let batch = [
            Sample::new(&[0., 0.], &[0.]),
            Sample::new(&[0., 0.], &[0., 1.]),
        ];

        let err = engine.compute(&params, &batch).unwrap_err();
        assert_eq!(
            err,
            KernelErr::Batch(BatchErr::ExpectedLengthMismatch {
                pass: 1,
                got: 2,
                expected: 1
            })
        );

        let err = engine.predict(&params, &[&[1.]]).unwrap_err();
        assert!(matches!(
            err,
            KernelErr::Batch(BatchErr::InputLengthMismatch { pass: 0, .. })
        ));
    }

    #[test]
    fn invalid_learning_rate_leaves_params_untouched() {
        let engine = engine();
        let mut params = ParameterStore::zeroed(engine.topology());
        let batch = [Sample::new(&[1., 0.], &[1.])];

        let err = engine.train_step(&mut params, &batch, -1.).unwrap_err();

        assert!(matches!(
            err,
            KernelErr::Config(ConfigErr::InvalidLearningRate { .. })
        ));
        assert_eq!(params, ParameterStore::zeroed(engine.topology()));
    }

    #[test]
    fn zero_params_predict_half() {
        let engine = engine();
        let params = ParameterStore::zeroed(engine.topology());

        let outputs = engine.predict(&params, &[&[1., 2.], &[3., 4.]]).unwrap();

        assert_eq!(outputs, [[0.5], [0.5]]);
    }

    #[test]
    fn report_carries_the_loss() {
        let engine = engine();
        let params = ParameterStore::zeroed(engine.topology());
        let batch = [Sample::new(&[1., 2.], &[1.]), Sample::new(&[0., 0.], &[0.])];

        let update = engine.compute(&params, &batch).unwrap();

        assert_eq!(update.report().passes, 2);
        assert_eq!(update.report().loss, 0.25);
        assert_eq!(update.report().degeneracy, None);
    }
}
