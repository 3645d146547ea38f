use crate::{buffers::SharedBuf, layout};

/// The per-batch gradient buffer: the expected outputs of every pass followed by one gradient
/// replica per pass laid out exactly like the parameter store.
#[derive(Debug)]
pub struct GradientBuffer {
    sizes: Vec<usize>,
    passes: usize,
    nparams: usize,
    buf: SharedBuf,
}

impl GradientBuffer {
    /// Creates a new zeroed `GradientBuffer`.
    ///
    /// # Arguments
    /// * `sizes` - The layer sizes of the network.
    /// * `passes` - The amount of passes in the batch.
    pub fn new(sizes: &[usize], passes: usize) -> Self {
        Self {
            sizes: sizes.to_vec(),
            passes,
            nparams: layout::param_buffer_size(sizes),
            buf: SharedBuf::zeroed(layout::gradient_buffer_size(sizes, passes)),
        }
    }

    #[inline]
    pub fn passes(&self) -> usize {
        self.passes
    }

    #[inline]
    pub fn nparams(&self) -> usize {
        self.nparams
    }

    /// Writes the expected output of `pass` into the head region.
    pub fn write_expected(&self, pass: usize, expected: &[f32]) {
        let offset = layout::expected_offset(&self.sizes, pass);
        let width = self.sizes[self.sizes.len() - 1];
        self.buf.write(offset, &expected[..width]);
    }

    /// Returns the expected output of `pass`.
    pub fn expected(&self, pass: usize) -> Vec<f32> {
        let offset = layout::expected_offset(&self.sizes, pass);
        self.buf.read(offset..offset + self.sizes[self.sizes.len() - 1])
    }

    /// Returns the gradient of parameter `slot` for `pass`.
    #[inline]
    pub fn gradient(&self, pass: usize, slot: usize) -> f32 {
        let offset = layout::pass_gradient_offset(&self.sizes, pass, self.passes);
        self.buf.load(offset + slot)
    }

    /// Returns the whole gradient replica of `pass`, shaped like the parameter store.
    pub fn pass_gradient(&self, pass: usize) -> Vec<f32> {
        let offset = layout::pass_gradient_offset(&self.sizes, pass, self.passes);
        self.buf.read(offset..offset + self.nparams)
    }

    /// Returns the gradients of every pass added together.
    pub fn summed(&self) -> Vec<f32> {
        let mut sum = vec![0.; self.nparams];

        for pass in 0..self.passes {
            sum.iter_mut()
                .enumerate()
                .for_each(|(slot, acc)| *acc += self.gradient(pass, slot));
        }

        sum
    }

    #[inline]
    pub(crate) fn buf(&self) -> &SharedBuf {
        &self.buf
    }
}
