//! # Note Events
//!
//! Turns a detected pitch into a note-on event and hands it to whatever the
//! host collects events in. Sinks are borrowed per processing call and must
//! not block: the emitter runs on the real-time path.

use crossbeam_channel::{Sender, TrySendError};

use crate::pitch::DominantPitch;

/// A note-on produced for one analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// Channel 0-15.
    pub channel: u8,
    /// Note number 0-127.
    pub note_number: u8,
    /// Velocity as a fraction of full scale.
    pub velocity: f32,
    /// Position of the event within the current host block.
    pub sample_offset: usize,
}

impl NoteEvent {
    /// Encodes the event as a MIDI 1.0 note-on message.
    ///
    /// Velocity is scaled to 1..=127; 0 would read as a note-off.
    pub fn to_midi_bytes(&self) -> [u8; 3] {
        let velocity = (self.velocity * 127.0).round().clamp(1.0, 127.0) as u8;
        [0x90 | (self.channel & 0x0f), self.note_number & 0x7f, velocity]
    }
}

/// Destination for note events produced during one processing call.
pub trait NoteSink {
    /// Appends one event. Returns `false` if the sink had to drop it.
    fn push_event(&mut self, event: NoteEvent) -> bool;
}

/// Host-provided event list. Reserve capacity up front to keep the real-time
/// path free of allocations.
impl NoteSink for Vec<NoteEvent> {
    fn push_event(&mut self, event: NoteEvent) -> bool {
        self.push(event);
        true
    }
}

/// Forwards events to another thread. A full or disconnected channel drops
/// the event instead of blocking.
impl NoteSink for Sender<NoteEvent> {
    fn push_event(&mut self, event: NoteEvent) -> bool {
        match self.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Builds note-on events with a fixed channel and velocity.
#[derive(Debug, Clone, Copy)]
pub struct NoteEventEmitter {
    channel: u8,
    velocity: f32,
}

impl NoteEventEmitter {
    pub fn new(channel: u8, velocity: f32) -> Self {
        Self { channel, velocity }
    }

    /// Emits a note-on for `pitch` at the start of the current block.
    ///
    /// Several windows finishing within one block all land at offset 0,
    /// in the order they completed.
    pub fn emit<S: NoteSink + ?Sized>(&self, pitch: &DominantPitch, sink: &mut S) -> bool {
        sink.push_event(NoteEvent {
            channel: self.channel,
            note_number: pitch.note_number,
            velocity: self.velocity,
            sample_offset: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitch(note_number: u8) -> DominantPitch {
        DominantPitch { bin: 1, frequency_hz: 100.0, note_number }
    }

    #[test]
    fn emits_fixed_channel_velocity_and_offset() {
        let emitter = NoteEventEmitter::new(0, 0.5);
        let mut events = Vec::new();
        assert!(emitter.emit(&pitch(68), &mut events));
        assert_eq!(
            events,
            vec![NoteEvent { channel: 0, note_number: 68, velocity: 0.5, sample_offset: 0 }]
        );
    }

    #[test]
    fn vec_sink_keeps_emission_order() {
        let emitter = NoteEventEmitter::new(2, 0.5);
        let mut events = Vec::with_capacity(4);
        for note in [60, 64, 67] {
            emitter.emit(&pitch(note), &mut events);
        }
        let notes: Vec<u8> = events.iter().map(|e| e.note_number).collect();
        assert_eq!(notes, vec![60, 64, 67]);
        assert!(events.iter().all(|e| e.sample_offset == 0 && e.channel == 2));
    }

    #[test]
    fn channel_sink_drops_when_full() {
        let (mut tx, rx) = crossbeam_channel::bounded(2);
        let emitter = NoteEventEmitter::new(0, 0.5);
        assert!(emitter.emit(&pitch(50), &mut tx));
        assert!(emitter.emit(&pitch(51), &mut tx));
        assert!(!emitter.emit(&pitch(52), &mut tx));

        let received: Vec<u8> = rx.try_iter().map(|e| e.note_number).collect();
        assert_eq!(received, vec![50, 51]);

        drop(rx);
        assert!(!emitter.emit(&pitch(53), &mut tx));
    }

    #[test]
    fn midi_encoding() {
        let event = NoteEvent { channel: 0, note_number: 69, velocity: 0.5, sample_offset: 0 };
        assert_eq!(event.to_midi_bytes(), [0x90, 69, 64]);

        let loud = NoteEvent { channel: 9, note_number: 36, velocity: 1.0, sample_offset: 0 };
        assert_eq!(loud.to_midi_bytes(), [0x99, 36, 127]);
    }
}
