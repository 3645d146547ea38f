use crate::layout;

/// The absolute buffer offsets an execution group needs to work on one `(layer, pass)`.
///
/// A cursor can either be computed from scratch with `at` or shifted one layer at a time with
/// `advance` and `retreat`, the fused dispatch relies on both agreeing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerCursor {
    pub layer: usize,
    pub pass: usize,
    /// Activations of `layer`.
    pub act: usize,
    /// Activations of `layer - 1`.
    pub prev_act: usize,
    /// Pre-activations of `layer`.
    pub z: usize,
    /// Parameter block of `layer`.
    pub params: usize,
    /// Parameter block of `layer + 1`, only meaningful below the output layer.
    pub next_params: usize,
    /// Gradient block of `layer` for `pass`.
    pub grads: usize,
    /// Gradient block of `layer + 1` for `pass`.
    pub next_grads: usize,
    /// Expected output of `pass`.
    pub expected: usize,
}

impl LayerCursor {
    /// Computes the cursor of `layer` and `pass`.
    ///
    /// # Arguments
    /// * `sizes` - The layer sizes of the network.
    /// * `layer` - A parameter-owning layer.
    /// * `pass` - The pass of the batch.
    /// * `passes` - The amount of passes in the batch.
    ///
    /// # Returns
    /// The cursor or `None` if `layer` is the input layer or out of range.
    pub fn at(sizes: &[usize], layer: usize, pass: usize, passes: usize) -> Option<Self> {
        let params = layout::param_block_offset(sizes, layer)?;
        let block = layout::param_block_size(sizes, layer);
        let grads = layout::gradient_offset(sizes, layer, pass, passes)?;

        Some(Self {
            layer,
            pass,
            act: layout::activation_offset(sizes, layer, pass),
            prev_act: layout::activation_offset(sizes, layer - 1, pass),
            z: layout::pre_activation_offset(sizes, layer, pass)?,
            params,
            next_params: params + block,
            grads,
            next_grads: grads + block,
            expected: layout::expected_offset(sizes, pass),
        })
    }

    /// Shifts the cursor to `layer + 1`.
    ///
    /// # Returns
    /// `false` without moving if the cursor already points to the output layer.
    pub fn advance(&mut self, sizes: &[usize]) -> bool {
        if self.layer + 1 >= sizes.len() {
            return false;
        }

        let next_block = layout::param_block_size(sizes, self.layer + 1);

        self.act += sizes[self.layer];
        self.prev_act += sizes[self.layer - 1];
        self.z += sizes[self.layer];
        self.params = self.next_params;
        self.next_params += next_block;
        self.grads = self.next_grads;
        self.next_grads += next_block;
        self.layer += 1;
        true
    }

    /// Shifts the cursor to `layer - 1`.
    ///
    /// # Returns
    /// `false` without moving if the cursor already points to the first hidden layer.
    pub fn retreat(&mut self, sizes: &[usize]) -> bool {
        if self.layer <= 1 {
            return false;
        }

        let prev_block = layout::param_block_size(sizes, self.layer - 1);

        self.act -= sizes[self.layer - 1];
        self.prev_act -= sizes[self.layer - 2];
        self.z -= sizes[self.layer - 1];
        self.next_params = self.params;
        self.params -= prev_block;
        self.next_grads = self.grads;
        self.grads -= prev_block;
        self.layer -= 1;
        true
    }
}
