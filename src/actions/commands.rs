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

//! Asynchronous application command processing.
//!
//! Library work requested by the session rather than by a screen runs here.
//! Unlike screen requests it is not tied to a navigation, so it survives
//! moving between screens. Results are broadcast back to the application
//! via [`AppEvent`]s.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{runtime::Handle, sync::mpsc::UnboundedSender};

use crate::{
    actions::events::AppEvent,
    library::LibraryService,
    model::{PlaylistId, queue::QueueEntry},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Replace the playback queue with the songs of a playlist.
    QueuePlaylist(PlaylistId),
}

/// Runs a command in the background on `runtime`.
///
/// A failed command is reported to the event loop as [`AppEvent::Error`].
pub fn dispatch_command(
    runtime: &Handle,
    library: Arc<dyn LibraryService>,
    event_tx: UnboundedSender<AppEvent>,
    command: AppCommand,
) {
    runtime.spawn(async move {
        let event = match run_command(library.as_ref(), command).await {
            Ok(event) => event,
            Err(e) => AppEvent::Error(format!("{:#}", e)),
        };
        let _ = event_tx.send(event);
    });
}

async fn run_command(library: &dyn LibraryService, command: AppCommand) -> Result<AppEvent> {
    match command {
        AppCommand::QueuePlaylist(id) => {
            let songs = if id.is_all_songs() {
                library.get_all_songs().await
            } else {
                library.get_songs_in_playlist(id).await
            }
            .with_context(|| format!("Failed to queue playlist {}", id))?;

            tracing::info!("Queueing {} songs from playlist {}", songs.len(), id);

            Ok(AppEvent::QueueLoaded(songs.iter().map(QueueEntry::from).collect()))
        }
    }
}
