//! # Audio Capture Module
//!
//! This module connects the analysis core to a live input device using CPAL
//! (Cross-Platform Audio Library). The input callback is the real-time path:
//! it feeds the [`Processor`] directly and forwards note events through a
//! bounded channel, without allocating or blocking.
//!
//! ## Features
//! - Automatic audio device selection
//! - Mono preferred, any channel count accepted (channel 0 is analyzed)
//! - Sample rate chosen as close to 48 kHz as the device allows
//! - Stream errors logged from CPAL's error callback

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SupportedStreamConfigRange;
use crossbeam_channel::Sender;

use crate::events::NoteEvent;
use crate::handoff::SpectrogramView;
use crate::processor::Processor;
use crate::settings::Settings;

/// Sample rate requested from the input device.
pub const TARGET_SAMPLE_RATE: u32 = 48_000;

/// A running capture session.
pub struct Capture {
    /// Keep alive for as long as audio should flow; dropping it stops capture.
    pub stream: cpal::Stream,
    /// Display side of the spectrogram handoff.
    pub view: SpectrogramView,
    /// Sample rate the device delivers, in Hz.
    pub sample_rate: u32,
}

/// Starts audio capture from the default input device.
///
/// This function:
/// 1. Selects the default audio input device and an `f32` configuration
/// 2. Configures an analysis session for the device's sample rate
/// 3. Builds an input stream whose callback runs the session
///
/// # Arguments
/// * `settings` - Session settings (window order, image size, note values)
/// * `notes` - Channel receiving the note events of every analyzed window
///
/// # Returns
/// * `Ok(capture)` - Playing stream, spectrogram view and sample rate
/// * `Err(e)` - No device, no usable format, invalid settings, or stream failure
pub fn start_audio_capture(settings: &Settings, mut notes: Sender<NoteEvent>) -> Result<Capture> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;

    log::info!("Using audio input device: {}", device.name()?);

    let configs = device.supported_input_configs()?.collect::<Vec<_>>();
    let supported_config = find_supported_config(configs, TARGET_SAMPLE_RATE)
        .ok_or_else(|| anyhow!("No suitable f32 input format found"))?;

    let rate = TARGET_SAMPLE_RATE.clamp(
        supported_config.min_sample_rate().0,
        supported_config.max_sample_rate().0,
    );
    let config = supported_config.with_sample_rate(cpal::SampleRate(rate));

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    let config: cpal::StreamConfig = config.into();

    log::info!("Selected sample rate: {} Hz, {} channel(s)", sample_rate, channels);

    let (mut processor, view) = Processor::configure(sample_rate as f64, settings)
        .context("Invalid analysis configuration")?;

    let err_fn = |err| log::error!("An error occurred on the audio stream: {}", err);

    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            processor.push_interleaved(data, channels, &mut notes);
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok(Capture {
        stream,
        view,
        sample_rate,
    })
}

/// Finds the best supported audio configuration for the target sample rate.
///
/// Only 32-bit float formats qualify. Among those, mono wins over
/// multi-channel, then the range closest to the target rate wins.
///
/// # Returns
/// * `Some(config)` - Best matching configuration
/// * `None` - No `f32` configuration found
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| c.sample_format() == cpal::SampleFormat::F32)
        .min_by_key(|c| {
            let (min, max) = (c.min_sample_rate().0, c.max_sample_rate().0);
            let rate_distance = if target_rate < min {
                min - target_rate
            } else {
                target_rate.saturating_sub(max)
            };
            (c.channels() != 1, rate_distance)
        })
}
