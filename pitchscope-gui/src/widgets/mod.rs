//! # Widgets Module
//!
//! Display widgets used by the Pitchscope main view.

pub mod spectrogram;
