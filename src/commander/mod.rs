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

//! Command-line input logic and state management.
//!
//! The command line is the host bridge: typing `:` opens it, and a submitted
//! command is turned into a host notification (or a quit request) and posted
//! to the application event loop.
//!
//! | Command                  | Effect                                   |
//! |--------------------------|------------------------------------------|
//! | `playlist`               | show the create-playlist modal           |
//! | `song`                   | show the add-song modal                  |
//! | `subtitle`               | show the add-subtitles modal             |
//! | `remove-playlist <id>`   | remove a playlist                        |
//! | `queue-playlist <id>`    | replace the queue with a playlist's songs |
//! | `q`, `quit`              | exit                                     |

use crossterm::event::{Event, KeyCode};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{actions::events::AppEvent, model::PlaylistId, views::HostNotification};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    Notify(HostNotification),
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("{0} needs a playlist id")]
    MissingId(&'static str),

    #[error("Not a playlist id: {0}")]
    InvalidId(String),
}

/// Parses a command line, without the leading `:`.
pub fn parse_command(buffer: &str) -> Result<HostRequest, CommandError> {
    let parts: Vec<&str> = buffer.split_whitespace().collect();

    let request = match parts.as_slice() {
        ["q"] | ["quit"] => HostRequest::Quit,

        ["playlist"] => HostRequest::Notify(HostNotification::ShowPlaylistModal),
        ["song"] => HostRequest::Notify(HostNotification::ShowSongModal),
        ["subtitle"] => HostRequest::Notify(HostNotification::ShowSubtitleModal),

        ["remove-playlist", id] => {
            HostRequest::Notify(HostNotification::RemovePlaylist(parse_id(id)?))
        }
        ["remove-playlist"] => return Err(CommandError::MissingId("remove-playlist")),

        ["queue-playlist", id] => {
            HostRequest::Notify(HostNotification::AddPlaylistToQueue(parse_id(id)?))
        }
        ["queue-playlist"] => return Err(CommandError::MissingId("queue-playlist")),

        _ => return Err(CommandError::Unknown(buffer.trim().to_string())),
    };

    Ok(request)
}

fn parse_id(value: &str) -> Result<PlaylistId, CommandError> {
    value
        .parse::<i64>()
        .map(PlaylistId)
        .map_err(|_| CommandError::InvalidId(value.to_string()))
}

#[derive(Debug, Default)]
pub struct Commander {
    active: bool,
    pub input: Input,
    message: Option<String>,
}

impl Commander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Feedback from the last command, shown while the command line is idle.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Handles a terminal event, returning whether the command line consumed
    /// it.
    pub fn handle_event(&mut self, event: &Event, event_tx: &UnboundedSender<AppEvent>) -> bool {
        let Event::Key(key_event) = event else {
            return false;
        };

        if !self.active {
            if key_event.code == KeyCode::Char(':') {
                self.active = true;
                self.message = None;
                return true;
            }
            return false;
        }

        match key_event.code {
            KeyCode::Esc => self.close(),

            KeyCode::Enter => {
                let buffer = self.input.value().trim().to_string();
                if !buffer.is_empty() {
                    self.run_command(&buffer, event_tx);
                }
                self.close();
            }

            _ => {
                // Delegate all other key events to the managed input component.
                self.input.handle_event(event);
            }
        }

        true
    }

    fn close(&mut self) {
        self.active = false;
        self.input.reset();
    }

    fn run_command(&mut self, buffer: &str, event_tx: &UnboundedSender<AppEvent>) {
        let event = match parse_command(buffer) {
            Ok(HostRequest::Notify(notification)) => AppEvent::Host(notification),
            Ok(HostRequest::Quit) => AppEvent::ExitApplication,
            Err(e) => {
                tracing::warn!("{}", e);
                self.message = Some(e.to_string());
                return;
            }
        };

        if event_tx.send(event).is_err() {
            tracing::error!("Event loop has stopped, dropping command \"{}\"", buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tokio::sync::mpsc::unbounded_channel;

    use super::*;

    #[test]
    fn parses_modal_commands() {
        assert_eq!(
            parse_command("playlist"),
            Ok(HostRequest::Notify(HostNotification::ShowPlaylistModal))
        );
        assert_eq!(
            parse_command(" song "),
            Ok(HostRequest::Notify(HostNotification::ShowSongModal))
        );
        assert_eq!(
            parse_command("subtitle"),
            Ok(HostRequest::Notify(HostNotification::ShowSubtitleModal))
        );
        assert_eq!(parse_command("quit"), Ok(HostRequest::Quit));
    }

    #[test]
    fn parses_playlist_ids() {
        assert_eq!(
            parse_command("remove-playlist 12"),
            Ok(HostRequest::Notify(HostNotification::RemovePlaylist(PlaylistId(12))))
        );
        assert_eq!(
            parse_command("queue-playlist 0"),
            Ok(HostRequest::Notify(HostNotification::AddPlaylistToQueue(PlaylistId(0))))
        );
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(
            parse_command("remove-playlist"),
            Err(CommandError::MissingId("remove-playlist"))
        );
        assert_eq!(
            parse_command("queue-playlist abc"),
            Err(CommandError::InvalidId("abc".to_string()))
        );
        assert_eq!(
            parse_command("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn typed_command_is_posted_to_event_loop() {
        let (event_tx, mut event_rx) = unbounded_channel();
        let mut commander = Commander::new();

        let key = |code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE));

        assert!(!commander.handle_event(&key(KeyCode::Char('x')), &event_tx));
        assert!(commander.handle_event(&key(KeyCode::Char(':')), &event_tx));
        for c in "song".chars() {
            commander.handle_event(&key(KeyCode::Char(c)), &event_tx);
        }
        commander.handle_event(&key(KeyCode::Enter), &event_tx);

        assert!(!commander.active());
        assert!(matches!(
            event_rx.try_recv(),
            Ok(AppEvent::Host(HostNotification::ShowSongModal))
        ));
    }
}
