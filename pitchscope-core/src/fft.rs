//! # Fast Fourier Transform (FFT) Module
//!
//! This module turns one analysis window into a magnitude spectrum for
//! real-time pitch detection and spectrogram display.
//!
//! ## Features
//! - High-performance FFT using RustFFT
//! - Hann windowing for reduced spectral leakage
//! - Plan, taper and scratch space prepared once, so analysis never allocates
//! - Half-spectrum output (bins below Nyquist only)

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Computes the coefficients of a Hann window of length `n`.
///
/// The Hann window reduces spectral leakage by tapering the signal
/// to zero at the edges, so a tone between two bins does not smear
/// across the whole spectrum.
fn hann_window(n: usize) -> Vec<f32> {
    if n < 2 {
        return vec![1.0; n];
    }
    let n_minus_1 = (n - 1) as f32;
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / n_minus_1).cos()))
        .collect()
}

/// Magnitude-only forward transform over a fixed window size.
///
/// All buffers are sized at construction. [`SpectralAnalyzer::analyze`] only
/// copies and transforms in place.
pub struct SpectralAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    taper: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectralAnalyzer {
    /// Plans a forward FFT for windows of `fft_size` samples.
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch_len = fft.get_inplace_scratch_len();

        Self {
            fft,
            taper: hann_window(fft_size),
            buffer: vec![Complex { re: 0.0, im: 0.0 }; fft_size],
            scratch: vec![Complex { re: 0.0, im: 0.0 }; scratch_len],
            magnitudes: vec![0.0; fft_size / 2],
        }
    }

    /// Window size in samples.
    pub fn fft_size(&self) -> usize {
        self.buffer.len()
    }

    /// Transforms one window and returns its half-spectrum of magnitudes.
    ///
    /// # Arguments
    /// * `window` - Exactly `fft_size` samples; a shorter window is zero-padded
    ///   and extra samples are ignored
    ///
    /// # Returns
    /// * `&[f32]` - `fft_size / 2` non-negative magnitudes, `|X[k]|` unnormalized
    pub fn analyze(&mut self, window: &[f32]) -> &[f32] {
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = window.get(i).copied().unwrap_or(0.0);
            *slot = Complex { re: sample * self.taper[i], im: 0.0 };
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        for (magnitude, bin) in self.magnitudes.iter_mut().zip(self.buffer.iter()) {
            *magnitude = bin.norm(); // .norm() is sqrt(re^2 + im^2)
        }
        &self.magnitudes
    }

    /// The spectrum produced by the most recent call to [`SpectralAnalyzer::analyze`].
    pub fn last_spectrum(&self) -> &[f32] {
        &self.magnitudes
    }
}
