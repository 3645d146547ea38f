use std::fmt::{self, Display};

use crate::{
    buffers::{ActivationCache, GradientBuffer},
    layout,
};

/// NaN or infinite values found in the buffers of a step.
///
/// Degenerate steps are still computed to the end, the host decides whether to apply them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Degeneracy {
    pub non_finite_activations: usize,
    pub non_finite_gradients: usize,
}

impl Degeneracy {
    /// Scans the caches and the gradient replicas of a step.
    ///
    /// # Returns
    /// `None` if every value is finite.
    pub fn scan(sizes: &[usize], cache: &ActivationCache, grads: &GradientBuffer) -> Option<Self> {
        let passes = grads.passes();
        let head = layout::expected_region_size(sizes, passes);

        let act = cache.act();
        let non_finite_activations = act.count_non_finite(0..act.len())
            + cache.z().count_non_finite(0..cache.z().len());
        let non_finite_gradients = grads.buf().count_non_finite(head..grads.buf().len());

        let degeneracy = Self {
            non_finite_activations,
            non_finite_gradients,
        };

        (non_finite_activations + non_finite_gradients > 0).then_some(degeneracy)
    }
}

impl Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} non-finite activations, {} non-finite gradients",
            self.non_finite_activations, self.non_finite_gradients
        )
    }
}
