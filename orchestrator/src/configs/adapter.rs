use std::{cell::RefCell, rc::Rc};

use engine::{
    ActFn, Dispatch, Engine, MAX_BATCH_SIZE, ParameterStore, Topology,
    initialization::{ChainedParamGen, ConstParamGen, ParamGen, RandErr, RandParamGen},
    layout,
};
use rand::{SeedableRng, rngs::StdRng};

use super::{
    ActFnConfig, DatasetConfig, DegeneracyConfig, DispatchConfig, ModelConfig, ParamGenConfig,
    TrainingConfig,
};
use crate::{
    dataset::Dataset,
    error::OrchestratorError,
    session::{DegeneracyPolicy, SessionOptions},
};

/// Everything a `Session` is made of.
#[derive(Debug)]
pub struct Adapted {
    pub engine: Engine,
    pub params: ParameterStore,
    pub dataset: Dataset,
    pub options: SessionOptions,
    pub seed: u64,
}

/// Validates the user facing configs and turns them into engine types.
#[derive(Debug, Default)]
pub struct Adapter;

impl Adapter {
    pub fn new() -> Self {
        Self
    }

    /// Validates and adapts a run configuration.
    ///
    /// # Arguments
    /// * `model` - The network and its initialization.
    /// * `training` - The dataset and the training hyperparameters.
    ///
    /// # Returns
    /// The pieces of a `Session` or the first problem found in the configuration.
    pub fn adapt_configs(
        &self,
        model: ModelConfig,
        training: TrainingConfig,
    ) -> Result<Adapted, OrchestratorError> {
        self.validate_training(&training)?;

        let topology = self.adapt_topology(&model)?;
        let dataset = self.adapt_dataset(training.dataset)?;
        self.validate_dataset(&topology, &dataset, training.batch_size.get())?;

        let seed = training.seed.unwrap_or_else(rand::random);
        let params = self.adapt_params(&topology, model, seed)?;

        let options = SessionOptions {
            epochs: training.epochs.get(),
            batch_size: training.batch_size.get(),
            learning_rate: training.learning_rate,
            shuffle: training.shuffle,
            policy: self.adapt_policy(training.on_degeneracy),
        };

        let engine = Engine::new(topology, self.adapt_dispatch(training.dispatch));

        Ok(Adapted {
            engine,
            params,
            dataset,
            options,
            seed,
        })
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    fn validate_training(&self, training: &TrainingConfig) -> Result<(), OrchestratorError> {
        let lr = training.learning_rate;
        if !lr.is_finite() || lr <= 0. {
            return Err(OrchestratorError::InvalidConfig(format!(
                "learning_rate must be finite and greater than 0, got {lr}"
            )));
        }

        let batch_size = training.batch_size.get();
        if batch_size > MAX_BATCH_SIZE {
            return Err(OrchestratorError::InvalidConfig(format!(
                "batch_size ({batch_size}) exceeds the engine limit ({MAX_BATCH_SIZE})"
            )));
        }

        if let DegeneracyConfig::Backoff { factor } = training.on_degeneracy {
            if !(factor > 0. && factor < 1.) {
                return Err(OrchestratorError::InvalidConfig(format!(
                    "backoff factor must be in (0, 1), got {factor}"
                )));
            }
        }

        Ok(())
    }

    fn validate_dataset(
        &self,
        topology: &Topology,
        dataset: &Dataset,
        batch_size: usize,
    ) -> Result<(), OrchestratorError> {
        if dataset.x_size() != topology.input_size() {
            return Err(OrchestratorError::InvalidConfig(format!(
                "dataset x_size ({}) does not match the input layer ({})",
                dataset.x_size(),
                topology.input_size()
            )));
        }

        if dataset.y_size() != topology.output_size() {
            return Err(OrchestratorError::InvalidConfig(format!(
                "dataset y_size ({}) does not match the output layer ({})",
                dataset.y_size(),
                topology.output_size()
            )));
        }

        if batch_size > dataset.len() {
            return Err(OrchestratorError::InvalidConfig(format!(
                "batch_size ({batch_size}) exceeds dataset size ({} samples)",
                dataset.len()
            )));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Adaptation
    // -------------------------------------------------------------------------

    fn adapt_topology(&self, model: &ModelConfig) -> Result<Topology, OrchestratorError> {
        let sizes = std::iter::once(model.input_size)
            .chain(model.layers.iter().map(|layer| layer.size))
            .collect();

        let act_fns = model
            .layers
            .iter()
            .map(|layer| self.adapt_act_fn(layer.act_fn))
            .collect();

        Ok(Topology::new(sizes, act_fns)?)
    }

    fn adapt_act_fn(&self, act_fn: ActFnConfig) -> ActFn {
        match act_fn {
            ActFnConfig::Sigmoid => ActFn::sigmoid(),
            ActFnConfig::Relu => ActFn::relu(),
            ActFnConfig::LeakyRelu => ActFn::leaky_relu(),
            ActFnConfig::NormalizedTanh => ActFn::normalized_tanh(),
        }
    }

    fn adapt_dataset(&self, dataset: DatasetConfig) -> Result<Dataset, OrchestratorError> {
        let dataset = match dataset {
            DatasetConfig::Inline {
                data,
                x_size,
                y_size,
            } => Dataset::new(data, x_size, y_size)?,
            DatasetConfig::Csv {
                path,
                x_size,
                y_size,
            } => Dataset::from_csv(path, x_size, y_size)?,
        };

        Ok(dataset)
    }

    fn adapt_params(
        &self,
        topology: &Topology,
        model: ModelConfig,
        seed: u64,
    ) -> Result<ParameterStore, OrchestratorError> {
        if let Some(params) = model.params {
            return Ok(ParameterStore::new(topology, params)?);
        }

        let rng = Rc::new(RefCell::new(StdRng::seed_from_u64(seed)));
        let param_gens = model
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| self.adapt_param_gen(layer.init, topology.sizes(), i + 1, &rng))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ParameterStore::generate(
            topology,
            ChainedParamGen::new(param_gens),
        )?)
    }

    fn adapt_param_gen(
        &self,
        init: ParamGenConfig,
        sizes: &[usize],
        layer: usize,
        rng: &Rc<RefCell<StdRng>>,
    ) -> Result<Box<dyn ParamGen>, OrchestratorError> {
        let limit = layout::param_block_size(sizes, layer);
        let rng = Rc::clone(rng);

        let param_gen: Box<dyn ParamGen> = match init {
            ParamGenConfig::Const { value, bias } => Box::new(ConstParamGen::for_layer(
                bias.unwrap_or(value),
                value,
                sizes,
                layer,
            )),
            ParamGenConfig::Uniform { low, high } => {
                Box::new(RandParamGen::uniform(rng, limit, low, high).map_err(bad_init(layer))?)
            }
            ParamGenConfig::UniformInclusive { low, high } => Box::new(
                RandParamGen::uniform_inclusive(rng, limit, low, high).map_err(bad_init(layer))?,
            ),
            ParamGenConfig::XavierUniform => Box::new(
                RandParamGen::xavier_uniform(rng, sizes, layer).map_err(bad_init(layer))?,
            ),
            ParamGenConfig::LecunUniform => Box::new(
                RandParamGen::lecun_uniform(rng, sizes, layer).map_err(bad_init(layer))?,
            ),
            ParamGenConfig::Normal { mean, std_dev } => Box::new(
                RandParamGen::normal(rng, limit, mean, std_dev).map_err(bad_init(layer))?,
            ),
            ParamGenConfig::Kaiming => {
                Box::new(RandParamGen::kaiming(rng, sizes, layer).map_err(bad_init(layer))?)
            }
            ParamGenConfig::Xavier => {
                Box::new(RandParamGen::xavier(rng, sizes, layer).map_err(bad_init(layer))?)
            }
            ParamGenConfig::Lecun => {
                Box::new(RandParamGen::lecun(rng, sizes, layer).map_err(bad_init(layer))?)
            }
        };

        Ok(param_gen)
    }

    fn adapt_dispatch(&self, dispatch: DispatchConfig) -> Dispatch {
        match dispatch {
            DispatchConfig::PerLayer => Dispatch::PerLayer,
            DispatchConfig::Fused => Dispatch::Fused,
        }
    }

    fn adapt_policy(&self, on_degeneracy: DegeneracyConfig) -> DegeneracyPolicy {
        match on_degeneracy {
            DegeneracyConfig::Apply => DegeneracyPolicy::Apply,
            DegeneracyConfig::Skip => DegeneracyPolicy::Skip,
            DegeneracyConfig::Backoff { factor } => DegeneracyPolicy::Backoff { factor },
        }
    }
}

fn bad_init(layer: usize) -> impl Fn(RandErr) -> OrchestratorError {
    move |e| OrchestratorError::InvalidConfig(format!("layer {layer} init: {e}"))
}
