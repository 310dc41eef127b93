//! # Musical Tuning Module
//!
//! Note names and equal-tempered frequencies for the full 0-127 note range,
//! used to label detected pitches for display and logging.
//!
//! ## Features
//! - Note number to name mapping (C-1 to G9, A4 = 69)
//! - Equal temperament frequency calculations (A4 = 440 Hz)
//! - Cent deviation between a measured and a target frequency

use once_cell::sync::Lazy;

use crate::pitch::{A4_FREQUENCY, MAX_NOTE};

/// Represents a single musical note with its name and frequency.
#[derive(Debug, Clone)]
pub struct Note {
    /// Note name (e.g., "A4", "C#3")
    pub name: String,
    /// Frequency in Hz
    pub frequency: f32,
}

/// Statically computed notes for every note number (C-1 to G9).
///
/// Frequencies follow equal temperament with A4 = 440 Hz.
/// The table is computed once, on first use.
static NOTES: Lazy<Vec<Note>> = Lazy::new(|| {
    const NOTE_NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    (0..=MAX_NOTE as i32)
        .map(|n| {
            // f = f0 * 2^(n/12), counting semitones away from A4 (note 69).
            let frequency = A4_FREQUENCY * 2.0_f32.powf((n - 69) as f32 / 12.0);
            // Note 0 is C-1; the octave number changes at C.
            let octave = n / 12 - 1;
            let name = format!("{}{}", NOTE_NAMES[(n % 12) as usize], octave);
            Note { name, frequency }
        })
        .collect()
});

/// Name of a note number, e.g. `"A4"` for 69. Out-of-range numbers are clamped.
pub fn note_name(note_number: u8) -> &'static str {
    NOTES[note_number.min(MAX_NOTE) as usize].name.as_str()
}

/// Equal-tempered frequency of a note number in Hz. Out-of-range numbers are clamped.
pub fn note_frequency(note_number: u8) -> f32 {
    NOTES[note_number.min(MAX_NOTE) as usize].frequency
}

/// Calculates the deviation from a target frequency in cents.
///
/// Cents are a logarithmic unit of pitch measurement where:
/// - 100 cents = 1 semitone
/// - 1200 cents = 1 octave
/// - Positive values indicate sharpness, negative values indicate flatness
pub fn calculate_cents_deviation(freq: f32, target_freq: f32) -> f32 {
    1200.0 * (freq / target_freq).log2()
}
