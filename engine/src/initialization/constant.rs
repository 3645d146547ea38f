use super::ParamGen;
use crate::layout;

/// Fills parameter rows with fixed values: `bias` at the head of every row, `weight` everywhere
/// else.
pub struct ConstParamGen {
    bias: f32,
    weight: f32,
    row_width: usize,
    emitted: usize,
    limit: usize,
}

impl ConstParamGen {
    /// Creates a `ConstParamGen` that emits `value` `limit` times, biases included.
    pub fn new(value: f32, limit: usize) -> Self {
        Self::rows(value, value, 1, limit)
    }

    /// Creates a new `ConstParamGen` that tells biases and weights apart.
    ///
    /// # Arguments
    /// * `bias` - The value at the head of every row.
    /// * `weight` - The value of every other float of the row.
    /// * `row_width` - The amount of floats per row, bias included.
    /// * `limit` - The maximum amount of floats to generate.
    pub fn rows(bias: f32, weight: f32, row_width: usize, limit: usize) -> Self {
        Self {
            bias,
            weight,
            row_width: row_width.max(1),
            emitted: 0,
            limit,
        }
    }

    /// Creates a `ConstParamGen` that fills exactly the block of `layer`.
    pub fn for_layer(bias: f32, weight: f32, sizes: &[usize], layer: usize) -> Self {
        Self::rows(
            bias,
            weight,
            layout::row_width(sizes, layer),
            layout::param_block_size(sizes, layer),
        )
    }
}

impl ParamGen for ConstParamGen {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        if self.emitted == self.limit {
            return None;
        }

        let end = self.limit.min(self.emitted + n);
        let values = (self.emitted..end)
            .map(|i| {
                if i % self.row_width == 0 {
                    self.bias
                } else {
                    self.weight
                }
            })
            .collect();

        self.emitted = end;
        Some(values)
    }
}
