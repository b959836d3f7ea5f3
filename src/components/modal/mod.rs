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

//! Form modals.
//!
//! A modal is a small stack of labelled text inputs drawn over the active
//! screen. Required fields are checked on submit, and a modal with a blank
//! required field stays open showing the problem instead of submitting.

mod event;
mod render;

use tui_input::Input;

use crate::{
    importer::ImportRequest,
    model::{PlaylistId, Song, SongId},
};

/// What a modal is collecting input for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    CreatePlaylist,
    /// Upload a song, adding it to `playlist` as well unless that is the
    /// "All Songs" playlist.
    AddSong { playlist: PlaylistId },
    SongSettings { song: SongId },
    AddSubtitle { song: SongId },
}

/// The validated contents of a submitted modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalSubmission {
    CreatePlaylist {
        name: String,
    },
    AddSong {
        playlist: PlaylistId,
        request: ImportRequest,
    },
    SongSettings {
        song: SongId,
        title: String,
        artist: String,
        album: String,
    },
    AddSubtitle {
        song: SongId,
        language: String,
        path: String,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum ModalEvent {
    Pending,
    Cancelled,
    Submitted(ModalSubmission),
}

#[derive(Debug)]
pub struct FormField {
    pub label: &'static str,
    pub input: Input,
    pub required: bool,
}

impl FormField {
    fn new(label: &'static str, required: bool) -> Self {
        Self {
            label,
            input: Input::default(),
            required,
        }
    }

    fn with_value(mut self, value: &str) -> Self {
        self.input = Input::new(value.to_string());
        self
    }

    fn value(&self) -> String {
        self.input.value().trim().to_string()
    }
}

#[derive(Debug)]
pub struct FormModal {
    kind: ModalKind,
    title: &'static str,
    fields: Vec<FormField>,
    focus: usize,
    error: Option<String>,
}

impl FormModal {
    pub fn create_playlist() -> Self {
        Self::new(
            ModalKind::CreatePlaylist,
            "Create Playlist",
            vec![FormField::new("Playlist name", true)],
        )
    }

    pub fn add_song(playlist: PlaylistId) -> Self {
        Self::new(
            ModalKind::AddSong { playlist },
            "Add Song",
            vec![
                FormField::new("File", true),
                FormField::new("Title", false),
                FormField::new("Artist", false),
                FormField::new("Album", false),
            ],
        )
    }

    pub fn song_settings(song: &Song) -> Self {
        Self::new(
            ModalKind::SongSettings { song: song.id },
            "Song Settings",
            vec![
                FormField::new("Title", true).with_value(&song.title),
                FormField::new("Artist", false).with_value(&song.artist),
                FormField::new("Album", false).with_value(&song.album),
            ],
        )
    }

    pub fn add_subtitle(song: SongId) -> Self {
        Self::new(
            ModalKind::AddSubtitle { song },
            "Add Subtitles",
            vec![FormField::new("Language", true), FormField::new("File", true)],
        )
    }

    fn new(kind: ModalKind, title: &'static str, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            title,
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn kind(&self) -> ModalKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validates the form, producing the submission or recording why it
    /// cannot be submitted.
    fn submit(&mut self) -> ModalEvent {
        if let Some(index) = self
            .fields
            .iter()
            .position(|f| f.required && f.value().is_empty())
        {
            self.error = Some(format!("{} must not be empty", self.fields[index].label));
            self.focus = index;
            return ModalEvent::Pending;
        }

        self.error = None;

        let value = |i: usize| self.fields.get(i).map(FormField::value).unwrap_or_default();
        let optional = |i: usize| Some(value(i)).filter(|v| !v.is_empty());

        let submission = match self.kind {
            ModalKind::CreatePlaylist => ModalSubmission::CreatePlaylist { name: value(0) },
            ModalKind::AddSong { playlist } => ModalSubmission::AddSong {
                playlist,
                request: ImportRequest {
                    source: value(0).into(),
                    title: optional(1),
                    artist: optional(2),
                    album: optional(3),
                },
            },
            ModalKind::SongSettings { song } => ModalSubmission::SongSettings {
                song,
                title: value(0),
                artist: value(1),
                album: value(2),
            },
            ModalKind::AddSubtitle { song } => ModalSubmission::AddSubtitle {
                song,
                language: value(0),
                path: value(1),
            },
        };

        ModalEvent::Submitted(submission)
    }
}
