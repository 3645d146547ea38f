use log::trace;
use rayon::prelude::*;

use crate::{buffers::GradientBuffer, error::ConfigErr, layout};

/// Applies the averaged gradients of a batch: `param -= lr / P * Σ_p gradient[p][param]`.
///
/// Every parameter-owning layer is a group, every neuron row a lane reducing its own bias and
/// weights over all the passes. With `lr == 0` the parameters are left untouched.
///
/// # Arguments
/// * `params` - The parameter store to update in place.
/// * `sizes` - The layer sizes of the network.
/// * `grads` - The gradients of every pass of the batch.
/// * `lr` - The learning rate.
///
/// # Returns
/// A `ConfigErr` if the learning rate is negative or not finite, or if the parameters don't
/// match the gradient layout.
pub fn apply(
    params: &mut [f32],
    sizes: &[usize],
    grads: &GradientBuffer,
    lr: f32,
) -> Result<(), ConfigErr> {
    if !lr.is_finite() || lr < 0. {
        return Err(ConfigErr::InvalidLearningRate { got: lr });
    }

    if params.len() != grads.nparams() {
        return Err(ConfigErr::ParamsLengthMismatch {
            got: params.len(),
            expected: grads.nparams(),
        });
    }

    if lr == 0. {
        return Ok(());
    }

    let passes = grads.passes();
    let scale = lr / passes as f32;

    for layer in 1..sizes.len() {
        let Some(block) = layout::param_block(sizes, layer) else {
            continue;
        };

        trace!(layer = layer, passes = passes; "applying gradients");
        let start = block.start;
        let row_width = layout::row_width(sizes, layer);

        params[block]
            .par_chunks_mut(row_width)
            .enumerate()
            .for_each(|(neuron, row)| {
                let row_start = start + neuron * row_width;

                for (k, param) in row.iter_mut().enumerate() {
                    let sum: f32 = (0..passes).map(|p| grads.gradient(p, row_start + k)).sum();
                    *param -= scale * sum;
                }
            });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grads_with(sizes: &[usize], per_pass: &[&[f32]]) -> GradientBuffer {
        let grads = GradientBuffer::new(sizes, per_pass.len());

        for (pass, values) in per_pass.iter().enumerate() {
            let offset = layout::pass_gradient_offset(sizes, pass, per_pass.len());
            grads.buf().write(offset, values);
        }

        grads
    }

    #[test]
    fn averages_over_passes() {
        let sizes = [1, 1];
        let grads = grads_with(&sizes, &[&[1., 2.], &[3., 6.]]);
        let mut params = [1., 1.];

        apply(&mut params, &sizes, &grads, 0.5).unwrap();

        assert_eq!(params, [0., -1.]);
    }

    #[test]
    fn rejects_invalid_learning_rates() {
        let sizes = [1, 1];
        let grads = grads_with(&sizes, &[&[1., 1.]]);
        let mut params = [0., 0.];

        for lr in [-0.1, f32::NAN, f32::INFINITY] {
            let err = apply(&mut params, &sizes, &grads, lr).unwrap_err();
            assert!(matches!(err, ConfigErr::InvalidLearningRate { .. }));
        }
    }

    #[test]
    fn rejects_mismatched_params() {
        let sizes = [1, 1];
        let grads = grads_with(&sizes, &[&[1., 1.]]);
        let mut params = [0.; 3];

        let err = apply(&mut params, &sizes, &grads, 0.1).unwrap_err();
        assert_eq!(
            err,
            ConfigErr::ParamsLengthMismatch {
                got: 3,
                expected: 2
            }
        );
    }
}
