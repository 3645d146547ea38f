//! Execution groups and the two ways of driving a kernel over every layer.
//!
//! A group works on one pass and owns one lane per neuron of the widest layer; lanes beyond the
//! width of the active layer do nothing for it. Groups of different passes never share state.
mod cursor;
mod fused;
mod group;
mod ledger;

pub use cursor::LayerCursor;
pub use group::GroupCtx;
pub use ledger::LayerLedger;

use log::trace;
use rayon::prelude::*;

use crate::kernels::StepCtx;

/// How a kernel is driven over the layers of the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dispatch {
    /// One data-parallel dispatch per layer, the host walks the layers.
    #[default]
    PerLayer,
    /// A single dispatch per phase, the groups advance through the layers themselves.
    Fused,
}

/// The order in which a phase visits the parameter-owning layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From the first hidden layer up to the output layer.
    Forward,
    /// From the output layer down to the first hidden layer.
    Backward,
}

impl Direction {
    /// The layers visited, in order.
    pub fn layers(self, nlayers: usize) -> Vec<usize> {
        match self {
            Direction::Forward => (1..nlayers).collect(),
            Direction::Backward => (1..nlayers).rev().collect(),
        }
    }

    fn first_cursor(self, sizes: &[usize], pass: usize, passes: usize) -> LayerCursor {
        let layer = match self {
            Direction::Forward => 1,
            Direction::Backward => sizes.len() - 1,
        };

        LayerCursor::at(sizes, layer, pass, passes).unwrap_or_default()
    }

    fn shift(self, cursor: &mut LayerCursor, sizes: &[usize]) {
        match self {
            Direction::Forward => cursor.advance(sizes),
            Direction::Backward => cursor.retreat(sizes),
        };
    }
}

/// Runs `kernel` for every neuron of every parameter-owning layer and every pass.
///
/// # Arguments
/// * `ctx` - The buffers of the step.
/// * `dispatch` - How to drive the kernel.
/// * `direction` - The order of the layers.
/// * `ledger` - Records every completed neuron.
/// * `kernel` - Computes a single neuron, given the cursor of its layer and pass.
pub fn run<K>(
    ctx: &StepCtx<'_>,
    dispatch: Dispatch,
    direction: Direction,
    ledger: &LayerLedger,
    kernel: K,
) where
    K: Fn(&StepCtx<'_>, &LayerCursor, usize) + Sync,
{
    trace!("dispatching kernel: dispatch={dispatch:?} direction={direction:?}");

    match dispatch {
        Dispatch::PerLayer => {
            for layer in direction.layers(ctx.sizes().len()) {
                run_layer(ctx, layer, ledger, &kernel);
            }
        }
        Dispatch::Fused => fused::run(ctx, direction, ledger, &kernel),
    }
}

/// One dispatch over a single layer: a group per pass, a lane per neuron.
fn run_layer<K>(ctx: &StepCtx<'_>, layer: usize, ledger: &LayerLedger, kernel: &K)
where
    K: Fn(&StepCtx<'_>, &LayerCursor, usize) + Sync,
{
    let sizes = ctx.sizes();
    let passes = ctx.passes();
    let width = ctx.topology.max_width();

    (0..passes).into_par_iter().for_each(|pass| {
        let Some(cursor) = LayerCursor::at(sizes, layer, pass, passes) else {
            return;
        };

        (0..width).into_par_iter().for_each(|lane| {
            if lane >= sizes[layer] {
                return;
            }

            kernel(ctx, &cursor, lane);
            ledger.record(layer);
        });
    });
}
