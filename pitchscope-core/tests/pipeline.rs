//! Integration tests for the full analysis pipeline.
//!
//! These drive a configured `Processor` with synthetic tones, the same way the
//! audio callback does, and check the note events and spectrogram it produces.

use std::f32::consts::PI;

use pitchscope_core::spectrogram::SpectrogramRenderer;
use pitchscope_core::{NoteEvent, Processor, Rgb, Settings, SpectrogramImage};

/// Sample rate at which every bin of a 1024-point window is exactly 44 Hz wide.
const EXACT_BIN_RATE: f64 = 45_056.0;

fn sine(frequency: f32, sample_rate: f64, amplitude: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
        .collect()
}

fn settings(fft_order: u32) -> Settings {
    Settings {
        fft_order,
        ..Settings::default()
    }
}

/// 440 Hz at 48 kHz with a 1024-point window: the peak falls in bin 9
/// (421.875 Hz), which rounds to note 68 rather than A4.
#[test]
fn a440_at_48k_quantizes_to_note_68() {
    let (mut processor, _view) = Processor::configure(48_000.0, &settings(10)).unwrap();
    let mut events: Vec<NoteEvent> = Vec::with_capacity(4);
    processor.push_block(&sine(440.0, 48_000.0, 0.8, 1024), &mut events);

    let pitch = processor.last_pitch().expect("a pure tone has a pitch");
    assert_eq!(pitch.bin, 9);
    assert_eq!(pitch.frequency_hz, 421.875);
    assert_eq!(pitch.note_number, 68);
    assert_eq!(
        events,
        vec![NoteEvent { channel: 0, note_number: 68, velocity: 0.5, sample_offset: 0 }]
    );
}

#[test]
fn exact_bin_tones_map_to_their_notes() {
    let (mut processor, _view) = Processor::configure(EXACT_BIN_RATE, &settings(10)).unwrap();
    let mut events: Vec<NoteEvent> = Vec::new();

    processor.push_block(&sine(440.0, EXACT_BIN_RATE, 0.8, 1024), &mut events);
    processor.push_block(&sine(220.0, EXACT_BIN_RATE, 0.8, 1024), &mut events);

    let notes: Vec<u8> = events.iter().map(|e| e.note_number).collect();
    assert_eq!(notes, vec![69, 57]);
}

#[test]
fn dominant_bin_tracks_tone_frequency() {
    let sample_rate = 44_100.0;
    for &(order, frequency) in &[(9u32, 1000.0f32), (10, 330.0), (11, 82.4), (12, 7040.0)] {
        let (mut processor, _view) = Processor::configure(sample_rate, &settings(order)).unwrap();
        let n = processor.fft_size();
        let mut events: Vec<NoteEvent> = Vec::new();
        processor.push_block(&sine(frequency, sample_rate, 0.5, n), &mut events);

        let expected = (frequency as f64 * n as f64 / sample_rate).round() as isize;
        let found = processor.last_pitch().unwrap().bin as isize;
        assert!(
            (found - expected).abs() <= 1,
            "{frequency} Hz with N = {n}: bin {found}, expected {expected}"
        );
    }
}

#[test]
fn several_windows_in_one_block_emit_in_completion_order() {
    let (mut processor, mut view) = Processor::configure(EXACT_BIN_RATE, &settings(10)).unwrap();
    let mut block = sine(440.0, EXACT_BIN_RATE, 0.8, 1024);
    block.extend(sine(880.0, EXACT_BIN_RATE, 0.8, 1024));
    block.extend(sine(132.0, EXACT_BIN_RATE, 0.8, 1024));
    block.extend(sine(880.0, EXACT_BIN_RATE, 0.8, 100));

    let mut events: Vec<NoteEvent> = Vec::with_capacity(8);
    processor.push_block(&block, &mut events);

    let notes: Vec<u8> = events.iter().map(|e| e.note_number).collect();
    assert_eq!(notes, vec![69, 81, 48]);
    assert!(events.iter().all(|e| e.sample_offset == 0));
    assert_eq!(processor.pending_samples(), 100);

    assert!(view.consume_dirty());
    assert_eq!(view.current_image(), processor.current_image());
}

#[test]
fn windows_do_not_leak_into_each_other() {
    let (mut processor, _view) = Processor::configure(48_000.0, &settings(10)).unwrap();
    let mut events: Vec<NoteEvent> = Vec::new();
    let quiet = sine(1500.0, 48_000.0, 0.3, 1024);

    processor.push_block(&quiet, &mut events);
    let first = processor.last_spectrum().to_vec();

    processor.push_block(&sine(200.0, 48_000.0, 1.0, 1024), &mut events);
    processor.push_block(&quiet, &mut events);
    assert_eq!(processor.last_spectrum(), first.as_slice());
}

#[test]
fn identical_input_gives_identical_spectrograms() {
    let (mut a, _) = Processor::configure(48_000.0, &settings(10)).unwrap();
    let (mut b, _) = Processor::configure(48_000.0, &settings(10)).unwrap();
    let mut sink: Vec<NoteEvent> = Vec::new();

    let mut signal = sine(440.0, 48_000.0, 0.8, 2048);
    signal.extend(sine(2500.0, 48_000.0, 0.4, 2048));
    a.push_block(&signal, &mut sink);
    // Same samples, delivered in uneven blocks.
    for chunk in signal.chunks(333) {
        b.push_block(chunk, &mut sink);
    }

    assert_eq!(a.current_image(), b.current_image());
}

#[test]
fn silence_scrolls_black_columns_and_emits_nothing() {
    let (mut processor, mut view) = Processor::configure(48_000.0, &settings(8)).unwrap();
    let mut events: Vec<NoteEvent> = Vec::new();

    processor.push_block(&sine(3000.0, 48_000.0, 0.8, 256), &mut events);
    assert_eq!(events.len(), 1);
    processor.push_block(&vec![0.0; 256], &mut events);
    assert_eq!(events.len(), 1);

    let image = processor.current_image();
    let width = image.width();
    assert!(image.column(width - 1).all(|p| p == Rgb::BLACK));
    assert!(image.column(width - 2).skip(1).any(|p| p != Rgb::BLACK));

    assert!(view.consume_dirty());
    assert_eq!(view.current_image(), image);
}

#[test]
fn spectrogram_column_shows_the_tone_row() {
    let (mut processor, _view) = Processor::configure(48_000.0, &settings(10)).unwrap();
    let mut events: Vec<NoteEvent> = Vec::new();
    processor.push_block(&sine(440.0, 48_000.0, 0.8, 1024), &mut events);

    // Bin 9 holds the peak, so every row showing it is at full level: pure red.
    let renderer = SpectrogramRenderer::new(1024, 512);
    let image: &SpectrogramImage = processor.current_image();
    let x = image.width() - 1;
    let peak_rows: Vec<usize> = (1..image.height())
        .filter(|&y| renderer.row_bin(y) == 9)
        .collect();
    assert!(!peak_rows.is_empty());
    for y in peak_rows {
        assert_eq!(image.pixel(x, y), Rgb { r: 255, g: 0, b: 0 }, "row {y}");
    }
}
