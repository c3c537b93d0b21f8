//! The reusable scratch buffer driven by the bulk-copy engine.

use crate::types::BufferCapacity;

/// A fixed-capacity scratch region with a current fill extent.
///
/// The buffer's usable capacity never changes after construction:
/// [`space`](Self::space) always exposes the full capacity, no matter how
/// little of it the previous read cycle filled. A source that returns
/// partial fills therefore cannot shrink the next cycle's request, which is
/// what rules out the livelock where a shrinking request size eventually
/// reaches zero and loops forever.
#[derive(Debug)]
pub struct TransferBuffer {
    data: Box<[u8]>,
    filled: usize,
}

impl TransferBuffer {
    /// Creates a buffer with the given capacity and an empty fill extent.
    pub fn new(capacity: BufferCapacity) -> Self {
        Self {
            data: vec![0; usize::from(capacity)].into_boxed_slice(),
            filled: 0,
        }
    }

    /// The fixed usable capacity, in units.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Resets the fill extent. Called at the start of every read cycle.
    pub fn clear(&mut self) {
        self.filled = 0;
    }

    /// The writable region: always the full capacity.
    pub fn space(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Records how many units the last read placed into [`space`](Self::space).
    ///
    /// # Panics
    ///
    /// Panics if `filled` exceeds the buffer's capacity, which would mean
    /// the source wrote past the region it was handed.
    pub fn set_filled(&mut self, filled: usize) {
        assert!(
            filled <= self.data.len(),
            "fill extent {filled} exceeds capacity {}",
            self.data.len()
        );
        self.filled = filled;
    }

    /// The units placed by the last read, ready to hand to the sink.
    pub fn filled(&self) -> &[u8] {
        &self.data[..self.filled]
    }
}

impl Default for TransferBuffer {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}
