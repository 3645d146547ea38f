use crate::{buffers::SharedBuf, layout};

/// The activations and pre-activations of every neuron for every pass of a batch.
///
/// Both caches use the pass-major layout of `layout::activation_offset`; the pre-activation
/// one skips the input layer.
#[derive(Debug)]
pub struct ActivationCache {
    sizes: Vec<usize>,
    passes: usize,
    act: SharedBuf,
    z: SharedBuf,
}

impl ActivationCache {
    /// Creates a new zeroed `ActivationCache`.
    ///
    /// # Arguments
    /// * `sizes` - The layer sizes of the network.
    /// * `passes` - The amount of passes in the batch.
    pub fn new(sizes: &[usize], passes: usize) -> Self {
        Self {
            sizes: sizes.to_vec(),
            passes,
            act: SharedBuf::zeroed(layout::activation_cache_size(sizes, passes)),
            z: SharedBuf::zeroed(layout::pre_activation_cache_size(sizes, passes)),
        }
    }

    #[inline]
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Writes the input vector of `pass` into the input layer's slots.
    pub fn write_inputs(&self, pass: usize, input: &[f32]) {
        let offset = layout::activation_offset(&self.sizes, 0, pass);
        self.act.write(offset, &input[..self.sizes[0]]);
    }

    /// Returns every activation of `layer` for `pass`.
    pub fn activations(&self, layer: usize, pass: usize) -> Vec<f32> {
        let offset = layout::activation_offset(&self.sizes, layer, pass);
        self.act.read(offset..offset + self.sizes[layer])
    }

    /// Returns every pre-activation of `layer` for `pass`, `None` for the input layer.
    pub fn pre_activations(&self, layer: usize, pass: usize) -> Option<Vec<f32>> {
        let offset = layout::pre_activation_offset(&self.sizes, layer, pass)?;
        Some(self.z.read(offset..offset + self.sizes[layer]))
    }

    /// Returns the output activations of `pass`.
    pub fn outputs(&self, pass: usize) -> Vec<f32> {
        self.activations(self.sizes.len() - 1, pass)
    }

    #[inline]
    pub(crate) fn act(&self) -> &SharedBuf {
        &self.act
    }

    #[inline]
    pub(crate) fn z(&self) -> &SharedBuf {
        &self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_land_at_pass_offsets() {
        let cache = ActivationCache::new(&[2, 3, 1], 3);

        cache.write_inputs(0, &[1., 2.]);
        cache.write_inputs(2, &[5., 6.]);

        assert_eq!(cache.activations(0, 0), [1., 2.]);
        assert_eq!(cache.activations(0, 1), [0., 0.]);
        assert_eq!(cache.activations(0, 2), [5., 6.]);
        assert_eq!(cache.act().load(12), 5.);
    }

    #[test]
    fn input_layer_has_no_pre_activations() {
        let cache = ActivationCache::new(&[2, 3, 1], 1);

        assert!(cache.pre_activations(0, 0).is_none());
        assert_eq!(cache.pre_activations(1, 0), Some(vec![0.; 3]));
        assert_eq!(cache.z().len(), 4);
    }
}
