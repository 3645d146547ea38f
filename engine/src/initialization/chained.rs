use super::ParamGen;

/// A parameter generator that delegates to a chain of generators, one after the other.
///
/// Chaining one generator per layer block gives every layer its own initialization scheme.
pub struct ChainedParamGen {
    param_gens: Vec<Box<dyn ParamGen>>,
    curr: usize,
}

impl ChainedParamGen {
    /// Creates a new `ChainedParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `param_gens` - The generators to drain in order.
    pub fn new(param_gens: Vec<Box<dyn ParamGen>>) -> Self {
        Self {
            param_gens,
            curr: 0,
        }
    }
}

impl ParamGen for ChainedParamGen {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        let mut sample = Vec::with_capacity(n);

        while sample.len() < n && self.curr < self.param_gens.len() {
            match self.param_gens[self.curr].sample(n - sample.len()) {
                Some(part) if !part.is_empty() => sample.extend(part),
                _ => self.curr += 1,
            }
        }

        (!sample.is_empty()).then_some(sample)
    }
}
