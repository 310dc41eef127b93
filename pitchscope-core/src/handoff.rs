//! # Spectrogram Handoff
//!
//! Moves finished spectrogram images from the real-time audio callback to the
//! display poller. The two sides share a triple buffer: the audio side copies
//! its working image into a spare slot and publishes it; the poller swaps the
//! newest published slot in whenever it looks. Neither side ever waits for the
//! other, and nothing is allocated after setup.

use triple_buffer::{Input, Output, TripleBuffer};

use crate::spectrogram::SpectrogramImage;

/// Creates a connected publisher/view pair for images of the given size.
pub fn spectrogram_handoff(width: usize, height: usize) -> (SpectrogramPublisher, SpectrogramView) {
    let (input, output) = TripleBuffer::new(&SpectrogramImage::new(width, height)).split();
    (SpectrogramPublisher { input }, SpectrogramView { output })
}

/// Audio-thread end of the handoff.
pub struct SpectrogramPublisher {
    input: Input<SpectrogramImage>,
}

impl SpectrogramPublisher {
    /// Publishes a copy of `image`.
    ///
    /// Returns `true` if this replaced an image the view never read.
    pub fn publish(&mut self, image: &SpectrogramImage) -> bool {
        self.input.input_buffer_mut().copy_from(image);
        self.input.publish()
    }
}

/// Poller end of the handoff.
pub struct SpectrogramView {
    output: Output<SpectrogramImage>,
}

impl SpectrogramView {
    /// Takes the newest published image, if any.
    ///
    /// Returns whether the image changed since the last call; calling it
    /// clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        self.output.update()
    }

    /// The image taken by the last [`SpectrogramView::consume_dirty`] that
    /// returned `true` (all black before the first one).
    pub fn current_image(&self) -> &SpectrogramImage {
        self.output.peek_output_buffer()
    }
}
