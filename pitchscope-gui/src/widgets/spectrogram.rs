//! # Spectrogram Widget
//!
//! Shows the scrolling spectrogram produced by the analysis core.
//! The newest column is on the right and low frequencies are at the bottom.
//!
//! ## Features
//! - Image stretched to fill the panel
//! - Black placeholder while no frame has arrived yet

use iced::widget::{container, image, text};
use iced::{Background, Color, ContentFit, Element, Length};

/// Spectrogram widget wrapping the latest image frame.
pub struct Spectrogram {
    /// RGBA frame from the analysis core, `None` before the first window
    frame: Option<image::Handle>,
}

impl Spectrogram {
    pub fn new(frame: Option<image::Handle>) -> Self {
        Self { frame }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        match self.frame {
            Some(handle) => image(handle)
                .width(Length::Fill)
                .height(Length::Fill)
                .content_fit(ContentFit::Fill)
                .into(),
            None => container(text("Waiting for audio...").size(14))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(Background::Color(Color::BLACK)),
                    text_color: Some(Color::from_rgb(0.6, 0.6, 0.6)),
                    ..container::Style::default()
                })
                .into(),
        }
    }
}
