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

//! Playback session.
//!
//! The session owns the playback queue for the lifetime of the application,
//! along with the little playback state the interface needs, and applies the
//! queue's requested side effects to a [`MediaElement`].

use std::time::Duration;

use anyhow::Result;

use crate::model::queue::{PlaybackQueue, QueueAction, QueueEntry};

/// The audio output the session drives.
pub trait MediaElement {
    /// Swaps in a new track, leaving it paused.
    fn load(&mut self, path: &str) -> Result<()>;

    fn resume(&mut self) -> Result<()>;

    /// Seeks the current track back to its start.
    fn restart(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    fn toggle_pause(&mut self) -> Result<()>;

    fn seek(&mut self, delta: i32) -> Result<()>;

    fn adjust_volume(&mut self, delta: i32) -> Result<()>;

    fn toggle_mute(&mut self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct Session {
    queue: PlaybackQueue,
    now_playing: Option<QueueEntry>,
    position: Duration,
    expanded: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    /// The loaded track, if any.
    pub fn now_playing(&self) -> Option<&QueueEntry> {
        self.now_playing.as_ref()
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    /// Records the playback position reported by the media element.
    pub fn set_position(&mut self, seconds: f64) {
        self.position = Duration::try_from_secs_f64(seconds).unwrap_or_default();
    }

    /// Whether the queue panel is shown.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn enqueue(&mut self, entry: QueueEntry, media: &mut dyn MediaElement) -> Result<()> {
        tracing::debug!("Enqueue song {} \"{}\"", entry.id, entry.title);
        let action = self.queue.enqueue(entry);
        self.apply(action, media)
    }

    pub fn play_next(&mut self, entry: QueueEntry, media: &mut dyn MediaElement) -> Result<()> {
        tracing::debug!("Play next song {} \"{}\"", entry.id, entry.title);
        let action = self.queue.play_next(entry);
        self.apply(action, media)
    }

    pub fn load_collection(&mut self, entries: Vec<QueueEntry>, media: &mut dyn MediaElement) -> Result<()> {
        tracing::debug!("Loading {} songs into the queue", entries.len());
        let action = self.queue.load_from_collection(entries);
        self.apply(action, media)
    }

    pub fn next(&mut self, media: &mut dyn MediaElement) -> Result<()> {
        let action = self.queue.next();
        self.apply(action, media)
    }

    pub fn previous(&mut self, media: &mut dyn MediaElement) -> Result<()> {
        let action = self.queue.previous(self.position);
        self.apply(action, media)
    }

    /// Moves on when the media element reports the end of a track.
    pub fn track_finished(&mut self, media: &mut dyn MediaElement) -> Result<()> {
        self.next(media)
    }

    fn apply(&mut self, action: QueueAction, media: &mut dyn MediaElement) -> Result<()> {
        match action {
            QueueAction::Load(entry) if entry.is_placeholder() => {
                media.stop()?;
                self.now_playing = None;
                self.position = Duration::ZERO;
            }
            QueueAction::Load(entry) => {
                media.load(&entry.path)?;
                media.resume()?;
                self.now_playing = Some(entry);
                self.position = Duration::ZERO;
            }
            QueueAction::Restart => {
                media.restart()?;
                self.position = Duration::ZERO;
            }
            QueueAction::None => {}
        }

        Ok(())
    }
}
