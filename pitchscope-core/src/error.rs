//! # Error Module
//!
//! Configuration errors raised before a session starts. Everything that can go
//! wrong with the analysis setup is caught here, so the real-time path itself
//! has no failure modes.

use thiserror::Error;

/// The largest supported FFT order (2^16 = 65536 samples per window).
pub const MAX_FFT_ORDER: u32 = 16;

/// A precondition violated by the session configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The FFT order must produce a window of at least two samples and at most
    /// 2^[`MAX_FFT_ORDER`] samples.
    #[error("FFT order {0} is out of range (expected 1..=16)")]
    FftOrder(u32),

    /// The sample rate must be a finite, strictly positive number of Hz.
    #[error("sample rate {0} Hz is not a positive finite number")]
    SampleRate(f64),

    /// The spectrogram needs at least one column and two rows (row 0 is never painted).
    #[error("spectrogram dimensions {width}x{height} are invalid (need width >= 1, height >= 2)")]
    ImageSize { width: usize, height: usize },

    /// Note events are addressed to one of the 16 MIDI channels.
    #[error("note channel {0} is out of range (expected 0..=15)")]
    NoteChannel(u8),

    /// Note-on velocity as a fraction of full scale.
    #[error("note velocity {0} is out of range (expected 0 < velocity <= 1)")]
    NoteVelocity(f32),

    /// The note event queue between the audio thread and its reader must hold something.
    #[error("note queue capacity must be at least 1")]
    NoteQueueCapacity,
}

/// Convenience alias for results carrying a [`ConfigError`].
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
