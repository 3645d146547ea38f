use std::{ops::Range, sync::atomic::Ordering};

use atomic_float::AtomicF32;
use rayon::prelude::*;

/// A flat buffer of floats that many lanes write into concurrently.
///
/// Every slot is written by exactly one lane per dispatch, so relaxed accesses are enough. The
/// happens-before edges between a writer and a later reader come from the dispatch itself
/// (rayon joins, the group barrier or the group's step counter).
#[derive(Debug)]
pub struct SharedBuf {
    data: Box<[AtomicF32]>,
}

impl SharedBuf {
    /// Creates a new zeroed `SharedBuf`.
    ///
    /// # Arguments
    /// * `len` - The amount of slots.
    pub fn zeroed(len: usize) -> Self {
        Self {
            data: (0..len).map(|_| AtomicF32::new(0.)).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn load(&self, idx: usize) -> f32 {
        self.data[idx].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn store(&self, idx: usize, value: f32) {
        self.data[idx].store(value, Ordering::Relaxed);
    }

    /// Writes `values` starting at `offset`.
    pub fn write(&self, offset: usize, values: &[f32]) {
        self.data[offset..offset + values.len()]
            .iter()
            .zip(values)
            .for_each(|(slot, &value)| slot.store(value, Ordering::Relaxed));
    }

    /// Copies the slots in `range` out of the buffer.
    pub fn read(&self, range: Range<usize>) -> Vec<f32> {
        self.data[range]
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .collect()
    }

    /// Counts the NaN or infinite values inside `range`.
    pub fn count_non_finite(&self, range: Range<usize>) -> usize {
        self.data[range]
            .par_iter()
            .filter(|slot| !slot.load(Ordering::Relaxed).is_finite())
            .count()
    }

    /// Copies the whole buffer.
    pub fn to_vec(&self) -> Vec<f32> {
        self.read(0..self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let buf = SharedBuf::zeroed(4);
        assert_eq!(buf.to_vec(), [0.; 4]);
    }

    #[test]
    fn write_then_read() {
        let buf = SharedBuf::zeroed(5);

        buf.write(1, &[1., 2., 3.]);
        buf.store(4, 9.);

        assert_eq!(buf.read(1..4), [1., 2., 3.]);
        assert_eq!(buf.load(4), 9.);
        assert_eq!(buf.load(0), 0.);
    }

    #[test]
    fn counts_non_finite() {
        let buf = SharedBuf::zeroed(6);
        buf.write(0, &[f32::NAN, 1., f32::INFINITY, 2., f32::NEG_INFINITY, 3.]);

        assert_eq!(buf.count_non_finite(0..6), 3);
        assert_eq!(buf.count_non_finite(1..4), 1);
    }

    #[test]
    fn disjoint_concurrent_writes() {
        let buf = SharedBuf::zeroed(64);

        std::thread::scope(|s| {
            for t in 0..4 {
                let buf = &buf;
                s.spawn(move || {
                    for i in (t..64).step_by(4) {
                        buf.store(i, i as f32);
                    }
                });
            }
        });

        let expected: Vec<_> = (0..64).map(|i| i as f32).collect();
        assert_eq!(buf.to_vec(), expected);
    }
}
