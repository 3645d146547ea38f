use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts how many neurons completed per layer during one dispatch.
#[derive(Debug)]
pub struct LayerLedger {
    counts: Box<[AtomicUsize]>,
}

impl LayerLedger {
    pub fn new(nlayers: usize) -> Self {
        Self {
            counts: (0..nlayers).map(|_| AtomicUsize::new(0)).collect(),
        }
    }

    #[inline]
    pub fn record(&self, layer: usize) {
        self.counts[layer].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn count(&self, layer: usize) -> usize {
        self.counts[layer].load(Ordering::Relaxed)
    }

    pub fn counts(&self) -> Vec<usize> {
        (0..self.counts.len()).map(|layer| self.count(layer)).collect()
    }
}
