//! # Sample Accumulator
//!
//! Buffers incoming samples until a full analysis window is available.
//! The buffer is allocated once at setup; pushing is O(1) and never allocates.

/// Fixed-capacity FIFO that collects one analysis window at a time.
#[derive(Debug, Clone)]
pub struct SampleAccumulator {
    window: Vec<f32>,
    fill_index: usize,
}

impl SampleAccumulator {
    /// Creates an accumulator for windows of `capacity` samples.
    ///
    /// `capacity` is validated by the session setup (a power of two, at least 2).
    pub fn new(capacity: usize) -> Self {
        Self {
            window: vec![0.0; capacity],
            fill_index: 0,
        }
    }

    /// Appends one sample.
    ///
    /// Returns the completed window when this sample fills it; the fill index
    /// is back at zero by the time the caller sees the window.
    pub fn push(&mut self, sample: f32) -> Option<&[f32]> {
        self.window[self.fill_index] = sample;
        self.fill_index += 1;

        if self.fill_index == self.window.len() {
            self.fill_index = 0;
            Some(self.window.as_slice())
        } else {
            None
        }
    }

    /// Discards a partially filled window.
    pub fn clear(&mut self) {
        self.fill_index = 0;
    }

    /// Number of samples collected toward the current window.
    pub fn fill_index(&self) -> usize {
        self.fill_index
    }

    /// Window size in samples.
    pub fn capacity(&self) -> usize {
        self.window.len()
    }
}
