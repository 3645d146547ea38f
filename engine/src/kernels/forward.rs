use crate::{
    dispatch::{self, Direction, Dispatch, LayerCursor, LayerLedger},
    kernels::StepCtx,
};

/// Computes the pre-activation and the activation of one neuron.
///
/// `z = bias + Σ_k weight[k] * prev_act[k]`, reading the neuron's row of the parameter store
/// and the activations of the previous layer for the same pass.
///
/// # Arguments
/// * `ctx` - The buffers of the step.
/// * `cursor` - The offsets of the neuron's layer and pass.
/// * `neuron` - The neuron's index inside its layer.
pub fn forward_neuron(ctx: &StepCtx<'_>, cursor: &LayerCursor, neuron: usize) {
    let Some(act_fn) = ctx.topology.act_fn(cursor.layer) else {
        return;
    };

    let fan_in = ctx.sizes()[cursor.layer - 1];
    let row = cursor.params + neuron * (fan_in + 1);
    let (bias, weights) = (ctx.params[row], &ctx.params[row + 1..row + 1 + fan_in]);

    let act = ctx.cache.act();
    let z = weights
        .iter()
        .enumerate()
        .fold(bias, |acc, (k, w)| acc + w * act.load(cursor.prev_act + k));

    ctx.cache.z().store(cursor.z + neuron, z);
    act.store(cursor.act + neuron, act_fn.f(z));
}

/// Runs forward propagation over every layer and pass, the inputs must already be written.
pub fn run(ctx: &StepCtx<'_>, dispatch: Dispatch, ledger: &LayerLedger) {
    dispatch::run(ctx, dispatch, Direction::Forward, ledger, forward_neuron);
}
