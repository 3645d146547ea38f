pub mod apply;
pub mod backward;
pub mod forward;

use crate::{
    buffers::{ActivationCache, GradientBuffer},
    topology::Topology,
};

/// Everything a neuron kernel reads or writes during one step.
#[derive(Debug, Clone, Copy)]
pub struct StepCtx<'a> {
    pub topology: &'a Topology,
    pub params: &'a [f32],
    pub cache: &'a ActivationCache,
    pub grads: &'a GradientBuffer,
}

impl<'a> StepCtx<'a> {
    #[inline]
    pub fn sizes(&self) -> &'a [usize] {
        self.topology.sizes()
    }

    #[inline]
    pub fn passes(&self) -> usize {
        self.cache.passes()
    }
}
