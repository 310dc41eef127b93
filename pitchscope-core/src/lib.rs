// pitchscope-core/src/lib.rs

//! The core logic for Pitchscope, a real-time pitch detector with a scrolling
//! spectrogram. This crate is responsible for windowing the incoming audio,
//! the spectral transform, dominant pitch detection, note events and the
//! spectrogram image. It is completely headless and contains no GUI code.
//!
//! A session is created with [`Processor::configure`]; the audio callback
//! feeds it with [`Processor::push_block`], and the display side polls the
//! returned [`SpectrogramView`].

pub mod accumulator;
pub mod audio;
pub mod error;
pub mod events;
pub mod fft;
pub mod handoff;
pub mod pitch;
pub mod processor;
pub mod settings;
pub mod spectrogram;
pub mod tuning;

pub use error::ConfigError;
pub use events::{NoteEvent, NoteSink};
pub use handoff::SpectrogramView;
pub use pitch::DominantPitch;
pub use processor::Processor;
pub use settings::Settings;
pub use spectrogram::{Rgb, SpectrogramImage};
