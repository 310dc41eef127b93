//! # Processor Module
//!
//! One analysis session: accumulate samples, transform each full window,
//! emit its dominant note and scroll it into the spectrogram.
//!
//! Everything is allocated in [`Processor::configure`]. The block functions
//! only copy, transform and write into those buffers; they never allocate,
//! lock, block or log, so they are safe to call from a real-time audio
//! callback.

use crate::accumulator::SampleAccumulator;
use crate::error::ConfigResult;
use crate::events::{NoteEventEmitter, NoteSink};
use crate::fft::SpectralAnalyzer;
use crate::handoff::{spectrogram_handoff, SpectrogramPublisher, SpectrogramView};
use crate::pitch::{DominantPitch, PitchExtractor};
use crate::settings::{validate_sample_rate, Settings};
use crate::spectrogram::{SpectrogramImage, SpectrogramRenderer};

/// A configured analysis session.
pub struct Processor {
    accumulator: SampleAccumulator,
    analyzer: SpectralAnalyzer,
    extractor: PitchExtractor,
    renderer: SpectrogramRenderer,
    emitter: NoteEventEmitter,
    image: SpectrogramImage,
    publisher: SpectrogramPublisher,
    last_pitch: Option<DominantPitch>,
    windows_analyzed: u64,
    dropped_events: u64,
}

impl Processor {
    /// Validates the configuration and allocates every buffer of the session.
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate of the incoming stream in Hz
    /// * `settings` - Window order, image size and note event values
    ///
    /// # Returns
    /// * `Ok((processor, view))` - The real-time processor and the view the
    ///   display side polls for spectrogram updates
    /// * `Err(ConfigError)` - A precondition was violated; no session exists
    pub fn configure(
        sample_rate: f64,
        settings: &Settings,
    ) -> ConfigResult<(Processor, SpectrogramView)> {
        validate_sample_rate(sample_rate)?;
        settings.validate()?;

        let fft_size = settings.fft_size();
        let (publisher, view) = spectrogram_handoff(settings.image_width, settings.image_height);

        let processor = Processor {
            accumulator: SampleAccumulator::new(fft_size),
            analyzer: SpectralAnalyzer::new(fft_size),
            extractor: PitchExtractor::new(sample_rate, fft_size),
            renderer: SpectrogramRenderer::new(fft_size, settings.image_height),
            emitter: NoteEventEmitter::new(settings.note_channel, settings.note_velocity),
            image: SpectrogramImage::new(settings.image_width, settings.image_height),
            publisher,
            last_pitch: None,
            windows_analyzed: 0,
            dropped_events: 0,
        };

        log::info!(
            "Analysis configured: {} Hz, window {} samples ({:.1} ms, {:.2} Hz per bin), spectrogram {}x{}",
            sample_rate,
            fft_size,
            fft_size as f64 * 1000.0 / sample_rate,
            sample_rate / fft_size as f64,
            settings.image_width,
            settings.image_height
        );

        Ok((processor, view))
    }

    /// Feeds one block of mono samples.
    ///
    /// Every window completed inside the block emits at most one note into
    /// `sink` and scrolls the spectrogram by one column.
    pub fn push_block<S: NoteSink + ?Sized>(&mut self, samples: &[f32], sink: &mut S) {
        for &sample in samples {
            self.push_sample(sample, sink);
        }
    }

    /// Feeds one block of interleaved frames, reading channel 0 only.
    pub fn push_interleaved<S: NoteSink + ?Sized>(
        &mut self,
        frames: &[f32],
        channels: usize,
        sink: &mut S,
    ) {
        if channels == 0 {
            return;
        }
        for frame in frames.chunks_exact(channels) {
            self.push_sample(frame[0], sink);
        }
    }

    fn push_sample<S: NoteSink + ?Sized>(&mut self, sample: f32, sink: &mut S) {
        let Some(window) = self.accumulator.push(sample) else {
            return;
        };

        let spectrum = self.analyzer.analyze(window);
        self.renderer.render_column(spectrum, &mut self.image);
        self.publisher.publish(&self.image);

        self.last_pitch = self.extractor.extract(spectrum);
        if let Some(pitch) = &self.last_pitch {
            if !self.emitter.emit(pitch, sink) {
                self.dropped_events += 1;
            }
        }
        self.windows_analyzed += 1;
    }

    /// Drops any partially collected window, e.g. after a stream discontinuity.
    /// The spectrogram keeps its history.
    pub fn reset(&mut self) {
        self.accumulator.clear();
        self.last_pitch = None;
    }

    /// The processor's own copy of the spectrogram, for single-threaded hosts.
    /// Other threads read through the [`SpectrogramView`].
    pub fn current_image(&self) -> &SpectrogramImage {
        &self.image
    }

    /// Pitch of the most recent window, `None` if it had none.
    pub fn last_pitch(&self) -> Option<DominantPitch> {
        self.last_pitch
    }

    /// The spectrum of the most recent window.
    pub fn last_spectrum(&self) -> &[f32] {
        self.analyzer.last_spectrum()
    }

    pub fn fft_size(&self) -> usize {
        self.accumulator.capacity()
    }

    pub fn sample_rate(&self) -> f64 {
        self.extractor.sample_rate()
    }

    /// Samples collected toward the next window.
    pub fn pending_samples(&self) -> usize {
        self.accumulator.fill_index()
    }

    /// Total windows analyzed since configuration.
    pub fn windows_analyzed(&self) -> u64 {
        self.windows_analyzed
    }

    /// Note events the sink refused since configuration.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::events::NoteEvent;

    fn small_settings() -> Settings {
        Settings {
            fft_order: 6,
            image_width: 8,
            image_height: 16,
            ..Settings::default()
        }
    }

    #[test]
    fn configure_rejects_bad_sample_rate_before_anything_else() {
        let result = Processor::configure(0.0, &small_settings());
        assert!(matches!(result, Err(ConfigError::SampleRate(_))));

        let bad_order = Settings { fft_order: 40, ..small_settings() };
        assert!(matches!(
            Processor::configure(48_000.0, &bad_order),
            Err(ConfigError::FftOrder(40))
        ));
    }

    #[test]
    fn one_event_and_one_column_per_window() {
        let (mut processor, mut view) = Processor::configure(48_000.0, &small_settings()).unwrap();
        let n = processor.fft_size();
        let tone: Vec<f32> = (0..3 * n)
            .map(|i| (2.0 * std::f32::consts::PI * 6000.0 * i as f32 / 48_000.0).sin())
            .collect();

        let mut events: Vec<NoteEvent> = Vec::with_capacity(8);
        processor.push_block(&tone[..n - 1], &mut events);
        assert!(events.is_empty());
        assert!(!view.consume_dirty());
        assert_eq!(processor.pending_samples(), n - 1);

        processor.push_block(&tone[n - 1..], &mut events);
        assert_eq!(events.len(), 3);
        assert_eq!(processor.windows_analyzed(), 3);
        assert_eq!(processor.pending_samples(), 0);
        assert!(events.iter().all(|e| e.sample_offset == 0));
        assert!(view.consume_dirty());
        assert_eq!(view.current_image(), processor.current_image());
    }

    #[test]
    fn silence_emits_nothing_but_still_scrolls() {
        let (mut processor, mut view) = Processor::configure(48_000.0, &small_settings()).unwrap();
        let mut events: Vec<NoteEvent> = Vec::new();
        processor.push_block(&vec![0.0; processor.fft_size()], &mut events);
        assert!(events.is_empty());
        assert_eq!(processor.last_pitch(), None);
        assert_eq!(processor.windows_analyzed(), 1);
        assert!(view.consume_dirty());
        assert_eq!(view.current_image(), &SpectrogramImage::new(8, 16));
    }

    #[test]
    fn interleaved_input_reads_first_channel() {
        let (mut mono, _) = Processor::configure(48_000.0, &small_settings()).unwrap();
        let (mut stereo, _) = Processor::configure(48_000.0, &small_settings()).unwrap();
        let n = mono.fft_size();

        let left: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 3000.0 * i as f32 / 48_000.0).sin())
            .collect();
        let interleaved: Vec<f32> = left.iter().flat_map(|&l| [l, 0.9]).collect();

        let mut mono_events: Vec<NoteEvent> = Vec::new();
        let mut stereo_events: Vec<NoteEvent> = Vec::new();
        mono.push_block(&left, &mut mono_events);
        stereo.push_interleaved(&interleaved, 2, &mut stereo_events);

        assert_eq!(mono_events, stereo_events);
        assert_eq!(mono.last_spectrum(), stereo.last_spectrum());
        stereo.push_interleaved(&interleaved, 0, &mut stereo_events);
        assert_eq!(stereo.windows_analyzed(), 1);
    }

    #[test]
    fn reset_discards_partial_window() {
        let (mut processor, _) = Processor::configure(48_000.0, &small_settings()).unwrap();
        let mut events: Vec<NoteEvent> = Vec::new();
        processor.push_block(&[0.5; 10], &mut events);
        processor.reset();
        assert_eq!(processor.pending_samples(), 0);
    }

    #[test]
    fn full_channel_counts_dropped_events() {
        let (mut processor, _) = Processor::configure(48_000.0, &small_settings()).unwrap();
        let n = processor.fft_size();
        let tone: Vec<f32> = (0..4 * n)
            .map(|i| (2.0 * std::f32::consts::PI * 6000.0 * i as f32 / 48_000.0).sin())
            .collect();

        let (mut tx, rx) = crossbeam_channel::bounded::<NoteEvent>(1);
        processor.push_block(&tone, &mut tx);
        assert_eq!(rx.len(), 1);
        assert_eq!(processor.dropped_events(), 3);
    }
}
