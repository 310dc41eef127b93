//! # Settings Module
//!
//! Plain configuration values for an analysis session. The core never owns
//! tunable parameters; whoever hosts it decides these values and hands them
//! in once, at setup.
//!
//! Settings can be persisted as JSON. Every field has a default, so a
//! settings file only needs to name the values it changes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult, MAX_FFT_ORDER};

/// Environment variable naming a settings file to load.
pub const SETTINGS_ENV_VAR: &str = "PITCHSCOPE_SETTINGS";

/// Settings file picked up from the working directory when present.
pub const DEFAULT_SETTINGS_FILE: &str = "pitchscope.json";

/// Session settings for the analysis core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window size is `2^fft_order` samples.
    pub fft_order: u32,
    /// Spectrogram width in pixels (one column per analyzed window).
    pub image_width: usize,
    /// Spectrogram height in pixels.
    pub image_height: usize,
    /// Channel used for emitted note events (0-15).
    pub note_channel: u8,
    /// Note-on velocity as a fraction of full scale.
    pub note_velocity: f32,
    /// Capacity of the queue carrying note events off the audio thread.
    pub note_queue_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fft_order: 10,
            image_width: 512,
            image_height: 512,
            note_channel: 0,
            note_velocity: 0.5,
            note_queue_capacity: 256,
        }
    }
}

impl Settings {
    /// Number of samples in one analysis window.
    pub fn fft_size(&self) -> usize {
        1 << self.fft_order
    }

    /// Checks every precondition that does not depend on the sample rate.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.fft_order < 1 || self.fft_order > MAX_FFT_ORDER {
            return Err(ConfigError::FftOrder(self.fft_order));
        }
        if self.image_width < 1 || self.image_height < 2 {
            return Err(ConfigError::ImageSize {
                width: self.image_width,
                height: self.image_height,
            });
        }
        if self.note_channel > 15 {
            return Err(ConfigError::NoteChannel(self.note_channel));
        }
        if !(self.note_velocity > 0.0 && self.note_velocity <= 1.0) {
            return Err(ConfigError::NoteVelocity(self.note_velocity));
        }
        if self.note_queue_capacity == 0 {
            return Err(ConfigError::NoteQueueCapacity);
        }
        Ok(())
    }
}

/// Validates a sample rate supplied by the host.
pub fn validate_sample_rate(sample_rate: f64) -> ConfigResult<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::SampleRate(sample_rate))
    }
}

/// Saves settings to a JSON file.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(settings)?;
    let mut file = File::create(path)
        .with_context(|| format!("creating settings file {}", path.display()))?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}

/// Loads settings from a JSON file. Missing fields take their defaults.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let mut file = File::open(path)
        .with_context(|| format!("opening settings file {}", path.display()))?;
    let mut data = String::new();
    file.read_to_string(&mut data)?;
    let settings: Settings = serde_json::from_str(&data)
        .with_context(|| format!("parsing settings file {}", path.display()))?;
    Ok(settings)
}

/// Resolves the settings for this run.
///
/// Lookup order:
/// 1. The file named by `PITCHSCOPE_SETTINGS` (an error if it cannot be read)
/// 2. `pitchscope.json` in the working directory, if it exists
/// 3. [`Settings::default`]
pub fn resolve_settings() -> Result<Settings> {
    let explicit = std::env::var_os(SETTINGS_ENV_VAR).map(PathBuf::from);
    let path = match explicit {
        Some(path) => path,
        None => {
            let local = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if !local.exists() {
                log::info!("No settings file found, using defaults");
                return Ok(Settings::default());
            }
            local
        }
    };

    let settings = load_settings(&path)?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}
