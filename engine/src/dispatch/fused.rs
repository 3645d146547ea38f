use std::thread;

use log::trace;
use rayon::prelude::*;

use super::{Direction, GroupCtx, LayerCursor, LayerLedger};
use crate::kernels::StepCtx;

/// Runs a whole phase as one dispatch: a group per pass on the rayon pool, each group made of
/// scoped lanes that walk the layers on their own.
pub(super) fn run<K>(ctx: &StepCtx<'_>, direction: Direction, ledger: &LayerLedger, kernel: &K)
where
    K: Fn(&StepCtx<'_>, &LayerCursor, usize) + Sync,
{
    let width = ctx.topology.max_width();
    let steps = ctx.sizes().len() - 1;

    (0..ctx.passes()).into_par_iter().for_each(|pass| {
        let group = GroupCtx::new(width, steps);
        trace!(pass = pass, width = width, steps = steps; "launching fused group");

        thread::scope(|s| {
            for lane in 0..width {
                let group = &group;
                s.spawn(move || run_lane(ctx, direction, ledger, kernel, group, pass, lane));
            }
        });
    });
}

fn run_lane<K>(
    ctx: &StepCtx<'_>,
    direction: Direction,
    ledger: &LayerLedger,
    kernel: &K,
    group: &GroupCtx,
    pass: usize,
    lane: usize,
) where
    K: Fn(&StepCtx<'_>, &LayerCursor, usize) + Sync,
{
    let sizes = ctx.sizes();
    group.init(lane, || direction.first_cursor(sizes, pass, ctx.passes()));

    for step in 0..group.steps() {
        group.wait_for(step);
        let cursor = group.cursor();

        if lane < sizes[cursor.layer] {
            kernel(ctx, &cursor, lane);
            ledger.record(cursor.layer);
        }

        group.complete(|cursor| direction.shift(cursor, sizes));
    }
}
