use std::path::PathBuf;
use std::sync::mpsc::TrySendError;
use std::time::Instant;

use iced::widget::{button, checkbox, column, container, row, text, text_input};
use iced::{Element, Length, Subscription, Task};
use scrub::{Command, Event, Phase, StripSnapshot, ticks_to_seconds};

use crate::bridge::{
    BridgeEvent, STRIP_HEIGHT, ScrubCommandSender, attach_command, scrub_subscription,
};
use crate::player::PreviewFrame;
use crate::widgets::preview::{self, PreviewImage};
use crate::widgets::strip::{self, StripDisplay};

const VIEWPORT_WIDTH: f32 = 960.0;
const PREVIEW_HEIGHT: f32 = 300.0;

/// UI messages handled by the iced app update loop.
#[derive(Debug, Clone)]
pub enum Message {
    AssetPathChanged(String),
    LoadPressed,
    DetachPressed,
    GuardToggled(bool),
    StripScrolled(f64),
    Bridge(BridgeEvent),
}

/// Root UI state.
pub struct AppState {
    command_tx: Option<ScrubCommandSender>,
    asset_path: String,
    phase: Phase,
    strip: Option<StripDisplay>,
    selected_time_tl: i64,
    guard_active: bool,
    preview: Option<PreviewImage>,
    status: String,
}

impl AppState {
    /// Boots the app and initializes the scrub bridge.
    pub fn boot() -> (Self, Task<Message>) {
        (
            Self {
                command_tx: None,
                asset_path: String::new(),
                phase: Phase::Idle,
                strip: None,
                selected_time_tl: 0,
                guard_active: false,
                preview: None,
                status: String::from("starting scrub bridge"),
            },
            Task::none(),
        )
    }

    /// Handles one UI message.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::AssetPathChanged(path) => {
                self.asset_path = path;
            }
            Message::LoadPressed => {
                let path = self.asset_path.trim().to_owned();
                if path.is_empty() {
                    self.status = String::from("asset path is empty");
                } else if self.send_command(attach_command(PathBuf::from(&path))) {
                    self.status = format!("loading {}", path);
                }
            }
            Message::DetachPressed => {
                if self.send_command(Command::Detach) {
                    self.status = String::from("detached");
                }
            }
            Message::GuardToggled(active) => {
                self.guard_active = active;
                let _ = self.send_command(Command::SetSelectionGuard { active });
            }
            Message::StripScrolled(x) => {
                let _ = self.send_command(Command::ScrollOffset {
                    x,
                    now: Instant::now(),
                });
            }
            Message::Bridge(BridgeEvent::Ready(sender)) => {
                self.command_tx = Some(sender);
                self.status = String::from("scrubber ready");
            }
            Message::Bridge(BridgeEvent::Event(event)) => {
                self.apply_scrub_event(event);
            }
            Message::Bridge(BridgeEvent::Preview(frame)) => {
                self.apply_preview_frame(&frame);
            }
            Message::Bridge(BridgeEvent::Disconnected) => {
                self.status = String::from("scrub event channel closed");
                self.command_tx = None;
            }
        }

        Task::none()
    }

    fn send_command(&mut self, command: Command) -> bool {
        if let Some(sender) = &self.command_tx {
            match sender.try_send(command) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    self.status = String::from("scrub command queue is full");
                    false
                }
                Err(TrySendError::Disconnected(_)) => {
                    self.status = String::from("scrub command channel closed");
                    self.command_tx = None;
                    false
                }
            }
        } else {
            self.status = String::from("scrubber is not ready");
            false
        }
    }

    fn apply_scrub_event(&mut self, event: Event) {
        match event {
            Event::LoadRequested { .. } => {}
            Event::PhaseChanged { phase } => {
                self.phase = phase;
                if phase == Phase::Idle {
                    self.strip = None;
                    self.preview = None;
                    self.selected_time_tl = 0;
                }
            }
            Event::StripChanged(snapshot) => {
                self.status = format!("{} thumbnails loaded", snapshot.thumbnails.len());
                self.strip = Some(strip_display(&snapshot));
            }
            Event::SelectedTimeChanged { t_tl } => {
                self.selected_time_tl = t_tl;
            }
            Event::ScrubBlocked => {
                self.status = String::from("scrubbing is paused while selecting media");
            }
            Event::Error(error) => {
                self.status = format!("error: {}", error.message);
            }
        }
    }

    fn apply_preview_frame(&mut self, frame: &PreviewFrame) {
        if let Some(image) = PreviewImage::from_bitmap(&frame.image) {
            self.preview = Some(image);
        }
    }

    /// Renders the UI tree.
    pub fn view(&self) -> Element<'_, Message> {
        let preview_area = container(preview::view(self.preview.as_ref()))
            .width(Length::Fixed(VIEWPORT_WIDTH))
            .height(Length::Fixed(PREVIEW_HEIGHT));

        let strip_area = strip::view(
            self.phase,
            self.strip.as_ref(),
            STRIP_HEIGHT,
            VIEWPORT_WIDTH,
            Message::StripScrolled,
        );

        let controls = row![
            text_input("media path", &self.asset_path).on_input(Message::AssetPathChanged),
            button("Load").on_press(Message::LoadPressed),
            button("Detach").on_press(Message::DetachPressed),
            checkbox("Selecting media", self.guard_active).on_toggle(Message::GuardToggled),
        ]
        .spacing(12);

        column![
            preview_area,
            strip_area,
            controls,
            text(format!(
                "Selected: {:.2}s",
                ticks_to_seconds(self.selected_time_tl)
            )),
            text(format!("Status: {}", self.status)),
        ]
        .spacing(12)
        .padding(16)
        .into()
    }

    /// Subscribes to bridge events emitted by the scrub worker thread.
    pub fn subscription(&self) -> Subscription<Message> {
        scrub_subscription().map(Message::Bridge)
    }

    #[cfg(test)]
    fn from_sender_for_test(command_tx: ScrubCommandSender) -> Self {
        Self {
            command_tx: Some(command_tx),
            asset_path: String::new(),
            phase: Phase::Idle,
            strip: None,
            selected_time_tl: 0,
            guard_active: false,
            preview: None,
            status: String::from("idle"),
        }
    }
}

fn strip_display(snapshot: &StripSnapshot) -> StripDisplay {
    StripDisplay {
        handles: snapshot
            .thumbnails
            .iter()
            .filter_map(|thumbnail| PreviewImage::from_bitmap(&thumbnail.image))
            .map(|image| image.handle)
            .collect(),
        thumb_width: snapshot.thumb_width as f32,
    }
}
