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

//! Application event distribution and orchestration.
//!
//! This module defines the central event type for the application, bridging
//! user input (keyboard, command line), background work (screen loads, the
//! library, the audio player) and the UI rendering pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through an
//!    unbounded channel that any thread or task may post to.
//! 2. **Process**: [`App::handle_event`] updates the application state and
//!    issues work to the screens, the session and the audio player.
//! 3. **Render**: After each event is processed, the UI is re-drawn using the
//!    `ratatui` terminal.

use std::io::Stdout;

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{Terminal, prelude::CrosstermBackend};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    app::{App, Flow},
    model::queue::QueueEntry,
    player::PlayerState,
    render::draw,
    views::{HostNotification, ViewResponse},
};

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),

    /// A notification from the host bridge.
    Host(HostNotification),

    /// The outcome of work started by a screen.
    View(ViewResponse),

    /// Songs to replace the playback queue with.
    QueueLoaded(Vec<QueueEntry>),

    PlayerStateChanged(PlayerState),
    DurationChanged(u64),
    TimeChanged(f64),
    VolumeChanged(u32),
    TrackFinished,

    Tick,

    ExitApplication,

    Error(String),
    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a quit event is received or the event channel
/// is closed.
pub fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    event_rx: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    terminal.draw(|f| draw(f, app))?;

    while let Some(event) = event_rx.blocking_recv() {
        if let Flow::Exit = app.handle_event(event)? {
            break;
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}
