// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application state.
//!
//! [`App`] ties the pieces of a running session together: the screen
//! manager, the playback session and its media element, and the command
//! line. It is driven entirely by [`AppEvent`]s, which keeps it usable
//! without a terminal.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tokio::{runtime::Handle, sync::mpsc::UnboundedSender};

use crate::{
    actions::{
        commands::{AppCommand, dispatch_command},
        events::AppEvent,
    },
    commander::Commander,
    library::LibraryService,
    player::PlayerState,
    session::{MediaElement, Session},
    theme::Theme,
    views::{HostNotification, KeyOutcome, Route, ViewAction, ViewContext, ViewManager},
};

const FINE_VOLUME_DELTA: i32 = 1;
const VOLUME_DELTA: i32 = 5;

const FINE_SEEK_DELTA: i32 = 5;
const SEEK_DELTA: i32 = 20;

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct App {
    pub theme: Theme,

    pub views: ViewManager,
    pub session: Session,
    pub commander: Commander,

    pub player_state: PlayerState,
    pub player_duration: Option<u64>,
    pub player_time: Option<u64>,
    pub player_position: Option<f64>,
    pub volume: Option<u32>,

    /// The most recent error, shown in the status line.
    pub status: Option<String>,

    library: Arc<dyn LibraryService>,
    runtime: Handle,
    event_tx: UnboundedSender<AppEvent>,
    media: Box<dyn MediaElement>,
}

impl App {
    /// Create a new instance of application state, starting on the grid.
    pub fn new(context: ViewContext, media: Box<dyn MediaElement>) -> Self {
        let library = Arc::clone(&context.library);
        let runtime = context.runtime.clone();
        let event_tx = context.event_tx.clone();

        let mut views = ViewManager::new(context);
        views.navigate_to(Route::Grid);

        Self {
            theme: Theme::default(),
            views,
            session: Session::new(),
            commander: Commander::new(),
            player_state: PlayerState::Stopped,
            player_duration: None,
            player_time: None,
            player_position: None,
            volume: None,
            status: None,
            library,
            runtime,
            event_tx,
            media,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<Flow> {
        match event {
            AppEvent::Key(key) => return self.handle_key(key),

            AppEvent::Host(HostNotification::AddPlaylistToQueue(id)) => {
                self.run_command(AppCommand::QueuePlaylist(id));
            }
            AppEvent::Host(notification) => {
                self.views.relay(notification);
            }

            AppEvent::View(response) => {
                self.views.apply(response);
            }

            AppEvent::QueueLoaded(entries) => {
                self.session.load_collection(entries, self.media.as_mut())?;
            }

            // Player State
            AppEvent::PlayerStateChanged(state) => self.player_state = state,
            AppEvent::DurationChanged(duration) => self.player_duration = Some(duration),
            AppEvent::VolumeChanged(volume) => self.volume = Some(volume),
            AppEvent::TrackFinished => {
                self.player_time = self.player_duration;
                self.session.track_finished(self.media.as_mut())?;
            }
            AppEvent::TimeChanged(seconds) => {
                self.session.set_position(seconds);
                self.player_time = Some(seconds as u64);
                if let Some(duration) = self.player_duration {
                    self.player_position = if duration > 0 {
                        Some(seconds / duration as f64)
                    } else {
                        None
                    };
                }
            }

            AppEvent::Tick => {}

            AppEvent::ExitApplication => return Ok(Flow::Exit),

            AppEvent::Error(message) => {
                tracing::error!("{}", message);
                self.status = Some(message);
            }
            AppEvent::FatalError(message) => return Err(anyhow!(message)),
        }

        Ok(Flow::Continue)
    }

    /// Routes a key press to an open modal, the command line, the active
    /// screen and finally the global playback keys, stopping at the first
    /// that takes it.
    fn handle_key(&mut self, key: KeyEvent) -> Result<Flow> {
        if self.views.has_modal() {
            self.views.handle_key(key);
            return Ok(Flow::Continue);
        }

        if self.commander.handle_event(&Event::Key(key), &self.event_tx) {
            return Ok(Flow::Continue);
        }

        match self.views.handle_key(key) {
            KeyOutcome::Consumed => Ok(Flow::Continue),
            KeyOutcome::Action(action) => {
                self.perform(action)?;
                Ok(Flow::Continue)
            }
            KeyOutcome::Ignored => self.handle_global_key(key),
        }
    }

    fn perform(&mut self, action: ViewAction) -> Result<()> {
        match action {
            ViewAction::Enqueue(entry) => self.session.enqueue(entry, self.media.as_mut()),
            ViewAction::PlayNext(entry) => self.session.play_next(entry, self.media.as_mut()),
            ViewAction::QueuePlaylist(id) => {
                self.run_command(AppCommand::QueuePlaylist(id));
                Ok(())
            }
            ViewAction::Navigate(route) => {
                self.views.navigate_to(route);
                Ok(())
            }
        }
    }

    fn run_command(&self, command: AppCommand) {
        dispatch_command(
            &self.runtime,
            Arc::clone(&self.library),
            self.event_tx.clone(),
            command,
        );
    }

    fn handle_global_key(&mut self, key: KeyEvent) -> Result<Flow> {
        let media = self.media.as_mut();

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) => return Ok(Flow::Exit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Ok(Flow::Exit),

            // Playback controls
            (KeyCode::Char(' '), _) => media.toggle_pause()?,
            (KeyCode::Char('s'), _) => media.stop()?,
            (KeyCode::Char(','), _) => media.seek(-FINE_SEEK_DELTA)?,
            (KeyCode::Char('.'), _) => media.seek(FINE_SEEK_DELTA)?,
            (KeyCode::Char('<'), _) => media.seek(-SEEK_DELTA)?,
            (KeyCode::Char('>'), _) => media.seek(SEEK_DELTA)?,
            (KeyCode::Char('-'), _) => media.adjust_volume(-FINE_VOLUME_DELTA)?,
            (KeyCode::Char('='), _) => media.adjust_volume(FINE_VOLUME_DELTA)?,
            (KeyCode::Char('_'), _) => media.adjust_volume(-VOLUME_DELTA)?,
            (KeyCode::Char('+'), _) => media.adjust_volume(VOLUME_DELTA)?,
            (KeyCode::Char('m'), _) => media.toggle_mute()?,

            // Queue
            (KeyCode::Char('['), _) => self.session.previous(media)?,
            (KeyCode::Char(']'), _) => self.session.next(media)?,
            (KeyCode::Char('v'), _) => self.session.toggle_expanded(),

            _ => {}
        }

        Ok(Flow::Continue)
    }
}
