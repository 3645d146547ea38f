use log::debug;

use crate::{error::ConfigErr, initialization::ParamGen, layout, topology::Topology};

/// The flat parameter buffer of a network, owned by the host across steps.
///
/// Layer `i >= 1` owns `L[i]` rows of `L[i-1] + 1` floats, bias first.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    params: Box<[f32]>,
}

impl ParameterStore {
    /// Creates a new `ParameterStore` from already existing values.
    ///
    /// # Arguments
    /// * `topology` - The network the parameters belong to.
    /// * `params` - The flat parameters.
    ///
    /// # Returns
    /// A new `ParameterStore` or `ConfigErr::ParamsLengthMismatch` if the amount of values
    /// doesn't match the topology.
    pub fn new(topology: &Topology, params: Vec<f32>) -> Result<Self, ConfigErr> {
        let expected = topology.nparams();

        if params.len() != expected {
            return Err(ConfigErr::ParamsLengthMismatch {
                got: params.len(),
                expected,
            });
        }

        Ok(Self {
            params: params.into_boxed_slice(),
        })
    }

    /// Creates a new `ParameterStore` sampling every value from a generator.
    ///
    /// # Arguments
    /// * `topology` - The network the parameters belong to.
    /// * `param_gen` - The generator of the initial values.
    ///
    /// # Returns
    /// A new `ParameterStore` or `ConfigErr::ParamsLengthMismatch` if the generator got
    /// exhausted before filling the whole buffer.
    pub fn generate<PG: ParamGen>(topology: &Topology, mut param_gen: PG) -> Result<Self, ConfigErr> {
        let expected = topology.nparams();
        let mut params = Vec::with_capacity(expected);

        while params.len() < expected {
            match param_gen.sample(expected - params.len()) {
                Some(sample) if !sample.is_empty() => params.extend(sample),
                _ => break,
            }
        }

        debug!(nparams = params.len(); "generated initial parameters");
        Self::new(topology, params)
    }

    /// Creates a new `ParameterStore` with every parameter set to zero.
    pub fn zeroed(topology: &Topology) -> Self {
        Self {
            params: vec![0.; topology.nparams()].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.params
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.params
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.params.into_vec()
    }

    /// Returns the parameter block of `layer`, `None` for the input layer.
    pub fn layer(&self, topology: &Topology, layer: usize) -> Option<&[f32]> {
        let block = layout::param_block(topology.sizes(), layer)?;
        self.params.get(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        activations::ActFn,
        initialization::{ChainedParamGen, ConstParamGen},
    };

    fn topology() -> Topology {
        Topology::uniform(vec![2, 3, 1], ActFn::sigmoid()).unwrap()
    }

    #[test]
    fn rejects_wrong_length() {
        let err = ParameterStore::new(&topology(), vec![0.; 12]).unwrap_err();
        assert_eq!(
            err,
            ConfigErr::ParamsLengthMismatch {
                got: 12,
                expected: 13
            }
        );
    }

    #[test]
    fn generate_exact() {
        let store = ParameterStore::generate(&topology(), ConstParamGen::new(0.5, 13)).unwrap();
        assert_eq!(store.as_slice(), [0.5; 13]);
    }

    #[test]
    fn generate_exhausted() {
        let err = ParameterStore::generate(&topology(), ConstParamGen::new(0.5, 4)).unwrap_err();
        assert!(matches!(err, ConfigErr::ParamsLengthMismatch { got: 4, .. }));
    }

    #[test]
    fn generate_per_layer() {
        let topology = topology();
        let param_gen = ChainedParamGen::new(vec![
            Box::new(ConstParamGen::new(1., 9)),
            Box::new(ConstParamGen::new(2., 4)),
        ]);

        let store = ParameterStore::generate(&topology, param_gen).unwrap();

        assert_eq!(store.layer(&topology, 1), Some(&[1.; 9][..]));
        assert_eq!(store.layer(&topology, 2), Some(&[2.; 4][..]));
        assert_eq!(store.layer(&topology, 0), None);
    }
}
