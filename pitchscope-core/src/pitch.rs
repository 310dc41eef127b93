//! # Pitch Detection Module
//!
//! This module picks the dominant pitch out of a magnitude spectrum.
//! The loudest bin below Nyquist is taken as the pitch, converted to Hz,
//! then to a note number on the 12-tone equal-tempered scale (A4 = 440 Hz = 69).
//!
//! ## Features
//! - Half-spectrum peak search, first occurrence wins on ties
//! - DC guard: a peak in bin 0 means "no pitch"
//! - Note numbers clamped into the 0-127 range

/// Reference pitch for note 69.
pub const A4_FREQUENCY: f32 = 440.0;

/// Note number of the reference pitch.
pub const A4_NOTE: f32 = 69.0;

/// Highest valid note number.
pub const MAX_NOTE: u8 = 127;

/// The pitch detected in one analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantPitch {
    /// Index of the loudest bin.
    pub bin: usize,
    /// Center frequency of that bin in Hz.
    pub frequency_hz: f32,
    /// Nearest note number, clamped to 0..=127.
    pub note_number: u8,
}

/// Finds the loudest bin in a spectrum.
///
/// Ties go to the lowest index. Non-finite magnitudes are skipped.
///
/// # Returns
/// * `Some(bin)` - Index of the maximum
/// * `None` - The spectrum is empty or holds no finite value
pub fn dominant_bin(spectrum: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &magnitude) in spectrum.iter().enumerate() {
        if !magnitude.is_finite() {
            continue;
        }
        match best {
            Some((_, peak)) if magnitude <= peak => {}
            _ => best = Some((i, magnitude)),
        }
    }
    best.map(|(i, _)| i)
}

/// Center frequency of an FFT bin in Hz.
pub fn bin_to_frequency(bin: usize, fft_size: usize, sample_rate: f64) -> f32 {
    (bin as f64 * sample_rate / fft_size as f64) as f32
}

/// Maps a frequency to the nearest equal-tempered note number.
///
/// # Returns
/// * `Some(note)` - Nearest note, clamped to 0..=127
/// * `None` - The frequency is zero, negative or not finite
pub fn frequency_to_note(frequency: f32) -> Option<u8> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return None;
    }
    let note = A4_NOTE + 12.0 * (frequency / A4_FREQUENCY).log2();
    if !note.is_finite() {
        return None;
    }
    Some(note.round().clamp(0.0, MAX_NOTE as f32) as u8)
}

/// Extracts the dominant pitch from magnitude spectra of a fixed window size.
#[derive(Debug, Clone, Copy)]
pub struct PitchExtractor {
    sample_rate: f64,
    fft_size: usize,
}

impl PitchExtractor {
    pub fn new(sample_rate: f64, fft_size: usize) -> Self {
        Self { sample_rate, fft_size }
    }

    /// Detects the dominant pitch of one half-spectrum.
    ///
    /// Only the first `fft_size / 2` bins are searched.
    ///
    /// # Returns
    /// * `Some(pitch)` - The loudest bin, its frequency and note number
    /// * `None` - No pitch: empty or silent spectrum, or the peak sits at DC
    pub fn extract(&self, spectrum: &[f32]) -> Option<DominantPitch> {
        let half = spectrum.len().min(self.fft_size / 2);
        let bin = dominant_bin(&spectrum[..half])?;
        if bin == 0 {
            return None;
        }

        let frequency_hz = bin_to_frequency(bin, self.fft_size, self.sample_rate);
        let note_number = frequency_to_note(frequency_hz)?;
        Some(DominantPitch { bin, frequency_hz, note_number })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}
