use std::time::Duration;

/// Counters of a training run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrainingMetrics {
    pub compute_time: Duration,
    pub apply_time: Duration,

    pub epochs: u64,
    pub steps: u64,
    pub skipped_batches: u64,
    pub samples: u64,
}

impl TrainingMetrics {
    #[inline]
    pub fn bump_epoch(&mut self) {
        self.epochs += 1;
    }

    #[inline]
    pub fn bump_step(&mut self) {
        self.steps += 1;
    }

    #[inline]
    pub fn bump_skipped(&mut self) {
        self.skipped_batches += 1;
    }

    #[inline]
    pub fn add_samples(&mut self, n: usize) {
        self.samples += n as u64;
    }
}
