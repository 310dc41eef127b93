//! # Pitchscope - Real-Time Pitch Detection GUI
//!
//! This module contains the GUI host for the Pitchscope analysis core.
//! It captures the default input device, shows the scrolling spectrogram and
//! the most recently detected note.
//!
//! ## Architecture
//! - **Main Thread**: Iced GUI application with dark theme
//! - **Audio Thread**: Owns the CPAL stream; its callback runs the analysis core
//! - **Communication**: Crossbeam channels for note events and setup results,
//!   a lock-free triple buffer for spectrogram images
//! - **Updates**: 60 FPS polling via subscription system

mod ui;
mod widgets;

use crossbeam_channel::{Receiver, Sender};
use cpal::traits::StreamTrait;
use iced::widget::image;
use iced::{Element, Subscription, Task, Theme};
use pitchscope_core::{audio, settings, NoteEvent, Settings, SpectrogramView};
use std::thread::{self, JoinHandle};
use ui::main_display::create_main_view;

/// Main entry point for the Pitchscope application.
///
/// Settings are resolved before the window opens, so a malformed settings
/// file stops the program instead of starting a half-configured session.
pub fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Pitchscope...");
    let settings = settings::resolve_settings()?;
    settings.validate()?;

    iced::application("Pitchscope", PitchscopeApp::update, PitchscopeApp::view)
        .subscription(PitchscopeApp::subscription)
        .theme(PitchscopeApp::theme)
        .run_with(move || (PitchscopeApp::new(settings), Task::none()))?;

    log::info!("Pitchscope finished");
    Ok(())
}

/// Application message types for the Iced GUI framework.
#[derive(Debug, Clone)]
pub enum Message {
    /// Freeze or resume the spectrogram display (analysis keeps running)
    ToggleFreeze,
    /// Application exit request
    Exit,
    /// Timer tick for real-time updates
    Tick,
}

/// State of the audio thread as seen by the GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioStatus {
    /// Waiting for the audio thread to open the device
    Starting,
    /// Capture is running at this sample rate
    Running { sample_rate: u32 },
    /// The audio thread could not start
    Failed(String),
    /// Shutdown requested
    Stopped,
}

/// UI-specific data needed for rendering the interface.
#[derive(Debug, Clone)]
pub struct AppDisplayData {
    pub status: AudioStatus,
    /// Latest spectrogram, ready for the image widget
    pub spectrogram: Option<image::Handle>,
    /// Most recent note event received from the audio thread
    pub last_note: Option<NoteEvent>,
    /// Total note events received
    pub notes_received: u64,
    /// Display frozen by the user
    pub frozen: bool,
    /// Analysis window length in samples
    pub fft_size: usize,
}

/// What the audio thread hands back once the stream is running.
struct AudioReady {
    view: SpectrogramView,
    sample_rate: u32,
}

/// Audio worker thread management structure.
struct AudioWorker {
    shutdown_tx: Sender<()>,               // Channel to send shutdown signal
    thread_handle: Option<JoinHandle<()>>, // Handle to the audio thread
}

/// Main application state.
struct PitchscopeApp {
    audio_worker: Option<AudioWorker>,
    setup_receiver: Receiver<Result<AudioReady, String>>,
    note_receiver: Receiver<NoteEvent>,
    spectrogram_view: Option<SpectrogramView>,

    // Single source of truth for all display data
    display_data: AppDisplayData,
}

impl PitchscopeApp {
    /// Creates the application and starts the audio thread.
    fn new(settings: Settings) -> Self {
        let (setup_tx, setup_rx) = crossbeam_channel::bounded(1);
        let (note_tx, note_rx) = crossbeam_channel::bounded(settings.note_queue_capacity);

        let mut app = Self {
            audio_worker: None,
            setup_receiver: setup_rx,
            note_receiver: note_rx,
            spectrogram_view: None,
            display_data: AppDisplayData {
                status: AudioStatus::Starting,
                spectrogram: None,
                last_note: None,
                notes_received: 0,
                frozen: false,
                fft_size: settings.fft_size(),
            },
        };

        app.start_audio_processing(settings, setup_tx, note_tx);
        app
    }

    /// Starts the dedicated audio thread.
    ///
    /// The CPAL stream is not `Send`, so it is created and kept on this thread
    /// until the shutdown signal arrives. The spectrogram view is sent back to
    /// the GUI once the stream is running.
    fn start_audio_processing(
        &mut self,
        settings: Settings,
        setup_tx: Sender<Result<AudioReady, String>>,
        note_tx: Sender<NoteEvent>,
    ) {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);
        let thread_handle = thread::spawn(move || {
            log::debug!("Audio thread starting");
            let capture = match audio::start_audio_capture(&settings, note_tx) {
                Ok(capture) => capture,
                Err(e) => {
                    log::error!("Fatal error starting audio: {:#}", e);
                    let _ = setup_tx.send(Err(format!("{:#}", e)));
                    return;
                }
            };

            let audio::Capture { stream, view, sample_rate } = capture;
            if setup_tx.send(Ok(AudioReady { view, sample_rate })).is_err() {
                log::warn!("GUI went away before audio was ready");
                return;
            }

            // Block until the GUI asks us to stop (or drops its end).
            let _ = shutdown_rx.recv();

            log::debug!("Stopping stream and exiting audio thread");
            if let Err(e) = stream.pause() {
                log::warn!("Error pausing stream: {}", e);
            }
            drop(stream);
        });

        self.audio_worker = Some(AudioWorker {
            shutdown_tx,
            thread_handle: Some(thread_handle),
        });
    }

    /// Handles application state updates based on incoming messages.
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Exit => {
                log::info!("Exit requested - shutting down audio");
                self.stop_audio();
                return iced::exit();
            }
            Message::ToggleFreeze => {
                self.display_data.frozen = !self.display_data.frozen;
                log::debug!("Display frozen: {}", self.display_data.frozen);
            }
            Message::Tick => self.poll_audio(),
        }
        Task::none()
    }

    /// Picks up everything the audio thread produced since the last tick.
    fn poll_audio(&mut self) {
        if self.display_data.status == AudioStatus::Starting {
            if let Ok(setup) = self.setup_receiver.try_recv() {
                match setup {
                    Ok(ready) => {
                        log::info!("Audio running at {} Hz", ready.sample_rate);
                        self.display_data.status = AudioStatus::Running { sample_rate: ready.sample_rate };
                        self.spectrogram_view = Some(ready.view);
                    }
                    Err(message) => self.display_data.status = AudioStatus::Failed(message),
                }
            }
        }

        for event in self.note_receiver.try_iter() {
            self.display_data.last_note = Some(event);
            self.display_data.notes_received += 1;
        }

        if self.display_data.frozen {
            return;
        }
        if let Some(view) = self.spectrogram_view.as_mut() {
            if view.consume_dirty() {
                let frame = view.current_image();
                let mut pixels = Vec::with_capacity(frame.width() * frame.height() * 4);
                frame.write_rgba(&mut pixels);
                self.display_data.spectrogram = Some(image::Handle::from_rgba(
                    frame.width() as u32,
                    frame.height() as u32,
                    pixels,
                ));
            }
        }
    }

    /// Signals the audio thread to stop and waits for it.
    fn stop_audio(&mut self) {
        if let Some(mut worker) = self.audio_worker.take() {
            let _ = worker.shutdown_tx.send(());
            if let Some(handle) = worker.thread_handle.take() {
                if handle.join().is_err() {
                    log::error!("Audio thread panicked");
                }
            }
        }
        self.spectrogram_view = None;
        self.display_data.status = AudioStatus::Stopped;
    }

    /// Renders the main application interface.
    fn view(&self) -> Element<'_, Message> {
        create_main_view(&self.display_data)
    }

    /// Polls the audio side every 16ms (about 60 FPS).
    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(std::time::Duration::from_millis(16)).map(|_| Message::Tick)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

impl Drop for PitchscopeApp {
    fn drop(&mut self) {
        self.stop_audio();
    }
}
