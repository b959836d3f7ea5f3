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

//! Audio playback control and state management.
//!
//! This module provides the high-level [`AudioPlayer`] interface, the
//! session's media element. It manages a background worker thread that
//! interfaces with the underlying audio library (MPV), ensuring that heavy
//! audio operations do not block the main application thread.

mod commands;

use std::sync::mpsc;

use anyhow::{Context, Result};
use tokio::sync::mpsc::UnboundedSender;

use crate::{actions::events::AppEvent, player::commands::AudioPlayerCommand, session::MediaElement};

/// Represents the current playback status of the audio engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerState {
    Playing,
    Paused,
    Stopped,
}

/// A handle to the audio playback engine.
///
/// This struct acts as a command proxy; it does not perform audio processing
/// itself but instead sends instructions to a background worker thread.
pub struct AudioPlayer {
    /// Channel for sending commands to the background worker thread.
    command_tx: mpsc::Sender<AudioPlayerCommand>,
}

impl AudioPlayer {
    /// Spawns the audio worker thread and returns a new player handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send application-level events (like progress
    ///   updates or errors) back to the main event loop.
    pub fn new(event_tx: UnboundedSender<AppEvent>) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<AudioPlayerCommand>();

        commands::spawn_player_worker(command_rx, event_tx);

        Self { command_tx }
    }

    // Maps internal audio backend flags to a simplified [`PlayerState`].
    fn player_state(is_paused: bool, is_idle: bool) -> PlayerState {
        if is_idle {
            PlayerState::Stopped
        } else if is_paused {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        }
    }

    fn send(&self, command: AudioPlayerCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .context("Audio player worker has stopped")
    }
}

impl MediaElement for AudioPlayer {
    /// Instructs the worker to load a specific audio file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the audio file on disk.
    fn load(&mut self, path: &str) -> Result<()> {
        self.send(AudioPlayerCommand::Load(path.to_string()))
    }

    fn resume(&mut self) -> Result<()> {
        self.send(AudioPlayerCommand::Resume)
    }

    fn restart(&mut self) -> Result<()> {
        self.send(AudioPlayerCommand::Restart)
    }

    fn stop(&mut self) -> Result<()> {
        self.send(AudioPlayerCommand::Stop)
    }

    /// Toggles the playback state between paused and playing.
    fn toggle_pause(&mut self) -> Result<()> {
        self.send(AudioPlayerCommand::TogglePause)
    }

    /// Adjusts the playback position forward or backwards relative to the
    /// current position.
    ///
    /// # Arguments
    ///
    /// * `delta` - The amount to seek in seconds (positive or negative).
    fn seek(&mut self, delta: i32) -> Result<()> {
        self.send(AudioPlayerCommand::Seek(delta))
    }

    /// Adjusts the playback volume relative to the current level.
    ///
    /// # Arguments
    ///
    /// * `delta` - The amount to change the volume (positive or negative).
    fn adjust_volume(&mut self, delta: i32) -> Result<()> {
        self.send(AudioPlayerCommand::AdjustVolume(delta))
    }

    /// Toggles the audio output between muted and unmuted.
    fn toggle_mute(&mut self) -> Result<()> {
        self.send(AudioPlayerCommand::ToggleMute)
    }
}
