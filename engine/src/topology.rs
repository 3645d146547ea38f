use crate::{activations::ActFn, error::ConfigErr, layout};

/// The maximum amount of layers, input layer included.
pub const MAX_LAYERS: usize = 16;

/// The maximum amount of neurons in a single layer, bounded by one lane per neuron inside an
/// execution group.
pub const MAX_NEURONS_PER_LAYER: usize = 128;

/// The maximum amount of passes in a single batch.
pub const MAX_BATCH_SIZE: usize = 256;

/// The static description of a feed-forward network: the size of every layer and the
/// activation function of every non-input layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    sizes: Vec<usize>,
    act_fns: Vec<ActFn>,
}

impl Topology {
    /// Creates a new `Topology`.
    ///
    /// # Arguments
    /// * `sizes` - The amount of neurons per layer, the first one being the input width.
    /// * `act_fns` - The activation function of every layer but the input one.
    ///
    /// # Returns
    /// A new `Topology` instance or a `ConfigErr` if any of the engine limits is violated.
    pub fn new(sizes: Vec<usize>, act_fns: Vec<ActFn>) -> Result<Self, ConfigErr> {
        let nlayers = sizes.len();

        if nlayers < 2 {
            return Err(ConfigErr::TooFewLayers { got: nlayers });
        }

        if nlayers > MAX_LAYERS {
            return Err(ConfigErr::TooManyLayers {
                got: nlayers,
                max: MAX_LAYERS,
            });
        }

        for (layer, &size) in sizes.iter().enumerate() {
            if size == 0 {
                return Err(ConfigErr::EmptyLayer { layer });
            }

            if size > MAX_NEURONS_PER_LAYER {
                return Err(ConfigErr::LayerTooWide {
                    layer,
                    got: size,
                    max: MAX_NEURONS_PER_LAYER,
                });
            }
        }

        if act_fns.len() != nlayers - 1 {
            return Err(ConfigErr::ActFnCountMismatch {
                got: act_fns.len(),
                expected: nlayers - 1,
            });
        }

        Ok(Self { sizes, act_fns })
    }

    /// Creates a `Topology` that uses the same activation function in every non-input layer.
    pub fn uniform(sizes: Vec<usize>, act_fn: ActFn) -> Result<Self, ConfigErr> {
        let act_fns = vec![act_fn; sizes.len().saturating_sub(1)];
        Self::new(sizes, act_fns)
    }

    #[inline]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    #[inline]
    pub fn nlayers(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn size(&self, layer: usize) -> usize {
        self.sizes[layer]
    }

    #[inline]
    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    #[inline]
    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// The activation function of `layer`, `None` for the input layer.
    #[inline]
    pub fn act_fn(&self, layer: usize) -> Option<ActFn> {
        layer.checked_sub(1).and_then(|i| self.act_fns.get(i)).copied()
    }

    /// The widest non-input layer, which bounds the amount of lanes of an execution group.
    pub fn max_width(&self) -> usize {
        self.sizes[1..].iter().copied().max().unwrap_or(0)
    }

    /// Returns the amount of parameters of the whole network.
    pub fn nparams(&self) -> usize {
        layout::param_buffer_size(&self.sizes)
    }
}
