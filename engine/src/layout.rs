//! Offset math shared by every kernel.
//!
//! All the functions in here are pure: given the layer sizes they compute where a value lives
//! inside one of the flat buffers. Layer `0` is the input layer, it owns activations but neither
//! pre-activations nor a parameter block.
//!
//! Parameter store, one block per layer `i >= 1`, one row per neuron:
//!
//! ```text
//! [ b w0 w1 .. w(L[i-1]-1) | b w0 .. | ... ]  <- L[i] rows of L[i-1] + 1 floats
//! ```
//!
//! Activation cache, pass-major. The offset of `(layer, pass)` sums every layer's width times
//! the amount of passes it was already produced for: `pass + 1` for earlier layers, `pass` for
//! the layer itself and the ones after it.
//!
//! Gradient buffer, the expected outputs of every pass followed by one parameter-store-shaped
//! replica per pass.
use std::ops::Range;

/// Returns the amount of parameters owned by `layer`, `0` for the input layer.
pub fn param_block_size(sizes: &[usize], layer: usize) -> usize {
    if layer == 0 || layer >= sizes.len() {
        return 0;
    }

    sizes[layer] * (sizes[layer - 1] + 1)
}

/// Returns the amount of floats a single neuron of `layer` owns: its bias plus one weight per
/// neuron of the previous layer.
pub fn row_width(sizes: &[usize], layer: usize) -> usize {
    if layer == 0 || layer >= sizes.len() {
        return 0;
    }

    sizes[layer - 1] + 1
}

/// Returns the size of the whole parameter store.
pub fn param_buffer_size(sizes: &[usize]) -> usize {
    block_start(sizes, sizes.len())
}

/// Returns where the parameter block of `layer` starts, `None` for the input layer.
pub fn param_block_offset(sizes: &[usize], layer: usize) -> Option<usize> {
    if layer == 0 || layer >= sizes.len() {
        return None;
    }

    Some(block_start(sizes, layer))
}

/// Returns the range of the parameter store owned by `layer`, `None` for the input layer.
pub fn param_block(sizes: &[usize], layer: usize) -> Option<Range<usize>> {
    let start = param_block_offset(sizes, layer)?;
    Some(start..start + param_block_size(sizes, layer))
}

/// Returns where the row (bias first, then weights) of `neuron` in `layer` starts.
pub fn neuron_row_offset(sizes: &[usize], layer: usize, neuron: usize) -> Option<usize> {
    if neuron >= *sizes.get(layer)? {
        return None;
    }

    let start = param_block_offset(sizes, layer)?;
    Some(start + neuron * row_width(sizes, layer))
}

/// Returns where the weight of the connection `source -> neuron` lives, `source` being a
/// neuron of `layer - 1`. The bias is skipped, hence the `+ 1`.
pub fn incoming_weight_offset(
    sizes: &[usize],
    layer: usize,
    neuron: usize,
    source: usize,
) -> Option<usize> {
    if source >= sizes[layer.checked_sub(1)?] {
        return None;
    }

    Some(neuron_row_offset(sizes, layer, neuron)? + 1 + source)
}

/// Returns the size of the activation cache for `passes` passes.
pub fn activation_cache_size(sizes: &[usize], passes: usize) -> usize {
    sizes.iter().sum::<usize>() * passes
}

/// Returns where the activations of `layer` for `pass` start.
pub fn activation_offset(sizes: &[usize], layer: usize, pass: usize) -> usize {
    sizes
        .iter()
        .enumerate()
        .map(|(j, &size)| size * pass_extent(j, layer, pass))
        .sum()
}

/// Returns the size of the pre-activation cache for `passes` passes.
pub fn pre_activation_cache_size(sizes: &[usize], passes: usize) -> usize {
    sizes.iter().skip(1).sum::<usize>() * passes
}

/// Returns where the pre-activations of `layer` for `pass` start, `None` for the input layer.
pub fn pre_activation_offset(sizes: &[usize], layer: usize, pass: usize) -> Option<usize> {
    if layer == 0 || layer > sizes.len() {
        return None;
    }

    let offset = sizes
        .iter()
        .enumerate()
        .skip(1)
        .map(|(j, &size)| size * pass_extent(j, layer, pass))
        .sum();

    Some(offset)
}

/// Returns the size of the region at the head of the gradient buffer holding the expected
/// outputs of the batch.
pub fn expected_region_size(sizes: &[usize], passes: usize) -> usize {
    output_size(sizes) * passes
}

/// Returns where the expected output of `pass` starts inside the gradient buffer.
pub fn expected_offset(sizes: &[usize], pass: usize) -> usize {
    output_size(sizes) * pass
}

/// Returns the size of the gradient buffer for `passes` passes.
pub fn gradient_buffer_size(sizes: &[usize], passes: usize) -> usize {
    expected_region_size(sizes, passes) + param_buffer_size(sizes) * passes
}

/// Returns where the gradient of the parameter block of `layer` for `pass` starts, `None` for
/// the input layer.
pub fn gradient_offset(sizes: &[usize], layer: usize, pass: usize, passes: usize) -> Option<usize> {
    let block = param_block_offset(sizes, layer)?;
    Some(pass_gradient_offset(sizes, pass, passes) + block)
}

/// Returns where the whole gradient replica of `pass` starts.
pub fn pass_gradient_offset(sizes: &[usize], pass: usize, passes: usize) -> usize {
    expected_region_size(sizes, passes) + pass * param_buffer_size(sizes)
}

/// Sum of the parameter blocks of every layer below `layer`.
pub(crate) fn block_start(sizes: &[usize], layer: usize) -> usize {
    (1..layer).map(|i| param_block_size(sizes, i)).sum()
}

/// The amount of passes `layer_j` has been produced for by the time `layer` of `pass` runs.
#[inline]
fn pass_extent(layer_j: usize, layer: usize, pass: usize) -> usize {
    if layer_j < layer { pass + 1 } else { pass }
}

#[inline]
fn output_size(sizes: &[usize]) -> usize {
    sizes.last().copied().unwrap_or(0)
}
