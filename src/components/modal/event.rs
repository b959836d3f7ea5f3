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

//! Keyboard handling for form modals.

use crossterm::event::{Event, KeyCode, KeyEvent};
use tui_input::backend::crossterm::EventHandler;

use crate::components::{FormModal, ModalEvent};

impl FormModal {
    /// Handles a key press while the modal is open. Every key is consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> ModalEvent {
        match key.code {
            KeyCode::Esc => ModalEvent::Cancelled,
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields.len();
                ModalEvent::Pending
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
                ModalEvent::Pending
            }
            _ => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.input.handle_event(&Event::Key(key));
                }
                ModalEvent::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::{
        components::{ModalKind, ModalSubmission},
        model::{PlaylistId, Song, SongId},
    };

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(modal: &mut FormModal, text: &str) {
        for c in text.chars() {
            modal.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn blank_playlist_name_is_rejected() {
        let mut modal = FormModal::create_playlist();
        type_text(&mut modal, "   ");

        assert_eq!(modal.handle_key(press(KeyCode::Enter)), ModalEvent::Pending);
        assert_eq!(modal.error(), Some("Playlist name must not be empty"));
    }

    #[test]
    fn playlist_name_is_trimmed() {
        let mut modal = FormModal::create_playlist();
        type_text(&mut modal, " Road Trip ");

        assert_eq!(
            modal.handle_key(press(KeyCode::Enter)),
            ModalEvent::Submitted(ModalSubmission::CreatePlaylist {
                name: "Road Trip".to_string()
            })
        );
    }

    #[test]
    fn add_song_collects_optional_fields() {
        let mut modal = FormModal::add_song(PlaylistId(3));
        type_text(&mut modal, "/music/a.mp3");
        modal.handle_key(press(KeyCode::Tab));
        modal.handle_key(press(KeyCode::Tab));
        type_text(&mut modal, "Band");

        let ModalEvent::Submitted(ModalSubmission::AddSong { playlist, request }) =
            modal.handle_key(press(KeyCode::Enter))
        else {
            panic!("expected submission");
        };

        assert_eq!(playlist, PlaylistId(3));
        assert_eq!(request.source.to_str(), Some("/music/a.mp3"));
        assert_eq!(request.title, None);
        assert_eq!(request.artist.as_deref(), Some("Band"));
    }

    #[test]
    fn settings_start_from_current_values() {
        let song = Song {
            id: SongId(8),
            title: "X".to_string(),
            artist: "Y".to_string(),
            album: "Z".to_string(),
            length: 200,
            path: "data/songs/x.mp3".to_string(),
        };
        let mut modal = FormModal::song_settings(&song);

        assert_eq!(modal.kind(), ModalKind::SongSettings { song: SongId(8) });
        assert_eq!(
            modal.handle_key(press(KeyCode::Enter)),
            ModalEvent::Submitted(ModalSubmission::SongSettings {
                song: SongId(8),
                title: "X".to_string(),
                artist: "Y".to_string(),
                album: "Z".to_string(),
            })
        );
    }

    #[test]
    fn focus_wraps_and_escape_cancels() {
        let mut modal = FormModal::add_subtitle(SongId(1));

        modal.handle_key(press(KeyCode::Up));
        assert_eq!(modal.focus(), 1);
        modal.handle_key(press(KeyCode::Down));
        assert_eq!(modal.focus(), 0);

        assert_eq!(modal.handle_key(press(KeyCode::Esc)), ModalEvent::Cancelled);
    }
}
