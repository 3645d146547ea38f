use crate::{
    dispatch::{self, Direction, Dispatch, LayerCursor, LayerLedger},
    kernels::StepCtx,
};

/// Computes the bias and weight gradients of one neuron for one pass.
///
/// The output layer derives its cost from the expected output, hidden layers pull it back from
/// the bias gradients of the next layer through the transposed weight column. The next layer
/// must already be done for the same pass.
///
/// # Arguments
/// * `ctx` - The buffers of the step.
/// * `cursor` - The offsets of the neuron's layer and pass.
/// * `neuron` - The neuron's index inside its layer.
pub fn backward_neuron(ctx: &StepCtx<'_>, cursor: &LayerCursor, neuron: usize) {
    let Some(act_fn) = ctx.topology.act_fn(cursor.layer) else {
        return;
    };

    let sizes = ctx.sizes();
    let act = ctx.cache.act();
    let grads = ctx.grads.buf();

    let cost = if cursor.layer == sizes.len() - 1 {
        act.load(cursor.act + neuron) - grads.load(cursor.expected + neuron)
    } else {
        // rows of the next layer are `L[layer] + 1` wide, the weight coming from this neuron
        // sits right after the bias
        let row_width = sizes[cursor.layer] + 1;

        (0..sizes[cursor.layer + 1]).fold(0., |acc, j| {
            let row = j * row_width;
            let weight = ctx.params[cursor.next_params + row + neuron + 1];
            acc + weight * grads.load(cursor.next_grads + row)
        })
    };

    let z = ctx.cache.z().load(cursor.z + neuron);
    let bias_grad = cost * act_fn.df(z);

    let fan_in = sizes[cursor.layer - 1];
    let row = cursor.grads + neuron * (fan_in + 1);

    grads.store(row, bias_grad);
    for k in 0..fan_in {
        grads.store(row + 1 + k, bias_grad * act.load(cursor.prev_act + k));
    }
}

/// Runs backward propagation from the output layer down, forward propagation and the
/// expected outputs must already be in place.
pub fn run(ctx: &StepCtx<'_>, dispatch: Dispatch, ledger: &LayerLedger) {
    dispatch::run(ctx, dispatch, Direction::Backward, ledger, backward_neuron);
}
