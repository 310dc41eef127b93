//! # Main Display Module
//!
//! This module contains the main display components and layout logic
//! for the Pitchscope window.

use iced::widget::{button, column, container, horizontal_space, row, text, Space};
use iced::{Alignment, Color, Element, Length};
use pitchscope_core::tuning::{note_frequency, note_name};
use pitchscope_core::NoteEvent;

use crate::widgets::spectrogram;
use crate::{AppDisplayData, AudioStatus, Message};

/// Creates the complete main application view
pub fn create_main_view(data: &AppDisplayData) -> Element<'static, Message> {
    if data.status == AudioStatus::Stopped {
        return container(text("Shutting down...").size(40))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    }

    let title = row![
        text("Pitchscope").size(28),
        horizontal_space(),
        text(status_line(data)).size(14),
    ]
    .align_y(Alignment::Center);

    let main_content = row![
        column![
            title,
            Space::with_height(20),
            create_spectrogram_panel(data),
            Space::with_height(10),
            create_note_panel(data),
        ]
        .width(Length::Fill)
        .spacing(10),
        Space::with_width(10),
        create_sidebar(data.frozen),
    ]
    .align_y(Alignment::Start)
    .padding(20);

    container(main_content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// One-line description of the audio thread state.
fn status_line(data: &AppDisplayData) -> String {
    match &data.status {
        AudioStatus::Starting => "Opening input device...".to_string(),
        AudioStatus::Running { sample_rate } => format!(
            "{} Hz, window {} samples ({:.2} Hz per bin)",
            sample_rate,
            data.fft_size,
            *sample_rate as f32 / data.fft_size as f32
        ),
        AudioStatus::Failed(message) => format!("Audio error: {}", message),
        AudioStatus::Stopped => "Stopped".to_string(),
    }
}

/// Creates the spectrogram panel widget.
fn create_spectrogram_panel(data: &AppDisplayData) -> Element<'static, Message> {
    let heading = if data.frozen {
        "Spectrogram (frozen)"
    } else {
        "Spectrogram"
    };

    container(
        column![
            text(heading).size(18),
            Space::with_height(10),
            spectrogram::Spectrogram::new(data.spectrogram.clone()).view(),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

/// Creates the panel describing the most recent note event.
fn create_note_panel(data: &AppDisplayData) -> Element<'static, Message> {
    let (name, frequency, midi) = match &data.last_note {
        Some(event) => (
            note_name(event.note_number).to_string(),
            format!("{:.2} Hz", note_frequency(event.note_number)),
            midi_text(event),
        ),
        None => ("--".to_string(), "0.00 Hz".to_string(), "-- -- --".to_string()),
    };

    let content = column![
        row![
            text("Note").size(14),
            horizontal_space(),
            text("MIDI").size(14),
        ],
        Space::with_height(5),
        row![
            text(name).size(24),
            Space::with_width(10),
            text(frequency).size(24),
            horizontal_space(),
            container(text(midi).size(16)).padding([4, 8]),
        ]
        .align_y(Alignment::Center),
        text(format!("{} note events", data.notes_received))
            .size(12)
            .color(Color::from_rgb(0.6, 0.6, 0.6)),
    ]
    .spacing(5);

    container(
        column![text("Detected Note").size(18), Space::with_height(10), content]
            .spacing(5)
            .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fixed(150.0))
    .into()
}

/// Raw note-on bytes in hex, e.g. `90 44 40`.
fn midi_text(event: &NoteEvent) -> String {
    let [status, note, velocity] = event.to_midi_bytes();
    format!("{:02X} {:02X} {:02X}", status, note, velocity)
}

/// Creates the sidebar with the display controls.
fn create_sidebar(frozen: bool) -> Element<'static, Message> {
    let (freeze_label, freeze_color) = if frozen {
        ("Resume", Some(Color::from_rgb(0.8, 0.2, 0.2)))
    } else {
        ("Freeze", None)
    };

    let controls = column![
        text("Display").size(18),
        Space::with_height(10),
        make_button(freeze_label, Message::ToggleFreeze, freeze_color),
        Space::with_height(20),
        text("Program").size(18),
        Space::with_height(10),
        make_button("Quit", Message::Exit, None),
    ]
    .spacing(5);

    container(controls.padding(15))
        .width(Length::Fixed(200.0))
        .height(Length::Fill)
        .into()
}

/// Creates a sidebar button, optionally with a solid background color.
fn make_button(
    label: &'static str,
    message: Message,
    background: Option<Color>,
) -> Element<'static, Message> {
    let mut widget = button(text(label).size(14).width(Length::Fill))
        .padding([6, 10])
        .on_press(message);

    if let Some(color) = background {
        widget = widget.style(move |_theme, _status| button::Style {
            background: Some(iced::Background::Color(color)),
            text_color: Color::WHITE,
            ..button::Style::default()
        });
    }

    widget.into()
}
