use std::{
    hint,
    sync::{
        Barrier,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use parking_lot::RwLock;

use super::LayerCursor;

const SPINS_BEFORE_YIELD: u32 = 64;

/// The state shared by the lanes of one fused execution group.
///
/// `step` counts the layers the group already finished, `completed` counts the lanes done with
/// the current one. The lane that brings `completed` to `width` resets it, shifts the cursor
/// and publishes the next step.
#[derive(Debug)]
pub struct GroupCtx {
    width: usize,
    steps: usize,
    barrier: Barrier,
    completed: AtomicUsize,
    step: AtomicUsize,
    cursor: RwLock<LayerCursor>,
}

impl GroupCtx {
    /// Creates a new `GroupCtx`.
    ///
    /// # Arguments
    /// * `width` - The amount of lanes in the group.
    /// * `steps` - The amount of layers the group goes through.
    pub fn new(width: usize, steps: usize) -> Self {
        Self {
            width,
            steps,
            barrier: Barrier::new(width),
            completed: AtomicUsize::new(0),
            step: AtomicUsize::new(0),
            cursor: RwLock::default(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Lane `0` writes the first cursor, then every lane waits for the whole group.
    pub fn init<F>(&self, lane: usize, first: F)
    where
        F: FnOnce() -> LayerCursor,
    {
        if lane == 0 {
            *self.cursor.write() = first();
        }

        self.barrier.wait();
    }

    /// Polls the step counter until `step` gets published.
    pub fn wait_for(&self, step: usize) {
        let mut spins = 0;

        while self.step.load(Ordering::Acquire) < step {
            if spins < SPINS_BEFORE_YIELD {
                hint::spin_loop();
                spins += 1;
            } else {
                thread::yield_now();
            }
        }
    }

    /// The cursor of the current step.
    #[inline]
    pub fn cursor(&self) -> LayerCursor {
        *self.cursor.read()
    }

    /// Marks the calling lane as done with the current step.
    ///
    /// # Arguments
    /// * `shift` - Moves the cursor to the next step, only run by the last lane.
    ///
    /// # Returns
    /// Whether the calling lane was the last one and published the next step.
    pub fn complete<F>(&self, shift: F) -> bool
    where
        F: FnOnce(&mut LayerCursor),
    {
        let prev = self.completed.fetch_add(1, Ordering::AcqRel);

        if prev != self.width - 1 {
            return false;
        }

        self.completed.store(0, Ordering::Relaxed);
        shift(&mut self.cursor.write());
        self.step.fetch_add(1, Ordering::Release);
        true
    }

    #[inline]
    pub fn current_step(&self) -> usize {
        self.step.load(Ordering::Acquire)
    }
}
