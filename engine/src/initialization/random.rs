use std::{cell::RefCell, rc::Rc};

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use super::{ParamGen, RandErr, Result};
use crate::layout;

/// A parameter generator that samples a probabilistic distribution.
///
/// The layer-aware constructors size the generator to exactly one parameter block and take
/// the fan-in and fan-out from the layer sizes around it.
pub struct RandParamGen<R: Rng, D: Distribution<f32>> {
    rng: Rc<RefCell<R>>,
    distribution: D,
    remaining: usize,
}

/// The amount of parameters of `layer`, its fan-in and its fan-out.
fn block_fans(sizes: &[usize], layer: usize) -> Result<(usize, usize, usize)> {
    if layout::param_block_offset(sizes, layer).is_none() {
        return Err(RandErr::NotAParamLayer { layer });
    }

    let limit = layout::param_block_size(sizes, layer);
    Ok((limit, sizes[layer - 1], sizes[layer]))
}

impl<R: Rng, D: Distribution<f32>> RandParamGen<R, D> {
    /// Creates a new `RandParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `rng` - A random number generator, shared between the generators of every layer.
    /// * `distribution` - The distribution to sample from.
    /// * `limit` - The maximum amount of numbers to generate.
    pub fn new(rng: Rc<RefCell<R>>, distribution: D, limit: usize) -> Self {
        Self {
            rng,
            distribution,
            remaining: limit,
        }
    }
}

impl<R: Rng> RandParamGen<R, Uniform<f32>> {
    /// Creates a new `RandParamGen` with a uniform distribution over `[low, high)`.
    ///
    /// # Returns
    /// An error if the range is invalid (low >= high).
    pub fn uniform(rng: Rc<RefCell<R>>, limit: usize, low: f32, high: f32) -> Result<Self> {
        Ok(Self::new(rng, Uniform::new(low, high)?, limit))
    }

    /// Creates a new `RandParamGen` with a uniform distribution over `[low, high]`.
    ///
    /// # Returns
    /// An error if the range is invalid (low > high).
    pub fn uniform_inclusive(
        rng: Rc<RefCell<R>>,
        limit: usize,
        low: f32,
        high: f32,
    ) -> Result<Self> {
        Ok(Self::new(rng, Uniform::new_inclusive(low, high)?, limit))
    }

    /// Creates a new `RandParamGen` for the block of `layer` using Xavier uniform
    /// initialization.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `sizes` - The layer sizes of the network.
    /// * `layer` - The parameter-owning layer to initialize.
    ///
    /// # Returns
    /// An error if `layer` owns no parameters.
    pub fn xavier_uniform(rng: Rc<RefCell<R>>, sizes: &[usize], layer: usize) -> Result<Self> {
        let (limit, fan_in, fan_out) = block_fans(sizes, layer)?;
        let range = (6. / (fan_in + fan_out) as f32).sqrt();
        Self::uniform(rng, limit, -range, range)
    }

    /// Creates a new `RandParamGen` for the block of `layer` using LeCun uniform
    /// initialization.
    pub fn lecun_uniform(rng: Rc<RefCell<R>>, sizes: &[usize], layer: usize) -> Result<Self> {
        let (limit, fan_in, _) = block_fans(sizes, layer)?;
        let range = (3. / fan_in as f32).sqrt();
        Self::uniform(rng, limit, -range, range)
    }
}

impl<R: Rng> RandParamGen<R, Normal<f32>> {
    /// Creates a new `RandParamGen` with a normal distribution.
    ///
    /// # Returns
    /// An error if `std_dev` is not finite (NaN or infinite).
    pub fn normal(rng: Rc<RefCell<R>>, limit: usize, mean: f32, std_dev: f32) -> Result<Self> {
        Ok(Self::new(rng, Normal::new(mean, std_dev)?, limit))
    }

    /// Creates a new `RandParamGen` for the block of `layer` using Kaiming normal
    /// initialization, suited for `Relu` layers.
    pub fn kaiming(rng: Rc<RefCell<R>>, sizes: &[usize], layer: usize) -> Result<Self> {
        let (limit, fan_in, _) = block_fans(sizes, layer)?;
        Self::normal(rng, limit, 0., (2. / fan_in as f32).sqrt())
    }

    /// Creates a new `RandParamGen` for the block of `layer` using Xavier normal
    /// initialization.
    pub fn xavier(rng: Rc<RefCell<R>>, sizes: &[usize], layer: usize) -> Result<Self> {
        let (limit, fan_in, fan_out) = block_fans(sizes, layer)?;
        Self::normal(rng, limit, 0., (2. / (fan_in + fan_out) as f32).sqrt())
    }

    /// Creates a new `RandParamGen` for the block of `layer` using LeCun normal
    /// initialization.
    pub fn lecun(rng: Rc<RefCell<R>>, sizes: &[usize], layer: usize) -> Result<Self> {
        let (limit, fan_in, _) = block_fans(sizes, layer)?;
        Self::normal(rng, limit, 0., (1. / fan_in as f32).sqrt())
    }
}

impl<R: Rng, D: Distribution<f32>> ParamGen for RandParamGen<R, D> {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        if self.remaining == 0 {
            return None;
        }

        let n = n.min(self.remaining);
        self.remaining -= n;

        let mut rng = self.rng.borrow_mut();
        let sample = (0..n).map(|_| self.distribution.sample(&mut *rng)).collect();
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn seeded_rng() -> Rc<RefCell<StdRng>> {
        Rc::new(RefCell::new(StdRng::seed_from_u64(42)))
    }

    #[test]
    fn partial() {
        let mut param_gen = RandParamGen::normal(seeded_rng(), 10, 0., 1.).unwrap();

        assert_eq!(param_gen.sample(7).unwrap().len(), 7);
        assert_eq!(param_gen.sample(7).unwrap().len(), 3);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn xavier_uniform_stays_in_range() {
        let sizes = [2, 4, 1];
        let mut param_gen = RandParamGen::xavier_uniform(seeded_rng(), &sizes, 1).unwrap();
        let range = (6f32 / 6.).sqrt();

        let sample = param_gen.sample(100).unwrap();

        assert_eq!(sample.len(), 12);
        assert!(sample.iter().all(|w| (-range..range).contains(w)));
    }

    #[test]
    fn input_layer_is_rejected() {
        let err = RandParamGen::kaiming(seeded_rng(), &[2, 4, 1], 0).err();
        assert_eq!(err, Some(RandErr::NotAParamLayer { layer: 0 }));
    }

    #[test]
    fn same_seed_same_values() {
        let sizes = [3, 5, 2];
        let mut a = RandParamGen::lecun(seeded_rng(), &sizes, 2).unwrap();
        let mut b = RandParamGen::lecun(seeded_rng(), &sizes, 2).unwrap();

        assert_eq!(a.sample(12), b.sample(12));
    }

    #[test]
    fn invalid_range() {
        assert!(RandParamGen::uniform(seeded_rng(), 1, 1., -1.).is_err());
    }
}
