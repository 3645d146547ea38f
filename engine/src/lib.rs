//! A feed-forward network trainer built from three data-parallel kernels (forward propagation,
//! backward propagation and gradient application) over flat `f32` buffers.
//!
//! Every weight, bias, activation and gradient lives at an offset computed by [`layout`]. The
//! host owns a [`ParameterStore`], hands batches of [`Sample`]s to an [`Engine`] and decides
//! whether each computed step gets applied.
pub mod activations;
pub mod buffers;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod initialization;
pub mod kernels;
pub mod layout;
pub mod loss;
pub mod numerics;
pub mod topology;

pub use activations::ActFn;
pub use buffers::ParameterStore;
pub use dispatch::Dispatch;
pub use engine::{Engine, PendingUpdate, Sample, StepReport};
pub use error::{BatchErr, ConfigErr, KernelErr, Result};
pub use numerics::Degeneracy;
pub use topology::{MAX_BATCH_SIZE, MAX_LAYERS, MAX_NEURONS_PER_LAYER, Topology};
