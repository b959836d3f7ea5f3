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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application, songs,
//! playlists and subtitles, as they are handed out by the library service.
//! Identity is always the opaque integer assigned by the library; nothing in
//! here knows how an entity is presented on screen.

pub mod queue;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SongId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaylistId(pub i64);

impl PlaylistId {
    /// The virtual playlist that always contains every song. It is never
    /// persisted and can never be deleted.
    pub const ALL_SONGS: PlaylistId = PlaylistId(0);

    pub fn is_all_songs(self) -> bool {
        self == Self::ALL_SONGS
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const ALL_SONGS_TITLE: &str = "All Songs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Duration in whole seconds.
    pub length: i64,
    pub path: String,
}

/// The attributes required to create a [`Song`], the id is assigned by the
/// library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub length: i64,
    pub path: String,
}

impl NewSong {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        length: i64,
        path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            length,
            path: path.into(),
        }
    }

    pub(crate) fn into_song(self, id: SongId) -> Song {
        Song {
            id,
            title: self.title,
            artist: self.artist,
            album: self.album,
            length: self.length,
            path: self.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: PlaylistId,
    pub title: String,
    /// Total length of all member songs in seconds, derived by the library.
    pub length: i64,
    pub song_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtitle {
    pub song_id: SongId,
    pub sub_id: i64,
    pub language: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    pub total_songs: i64,
    pub total_playlists: i64,
    pub total_subtitles: i64,
    pub total_playlist_songs: i64,
}

/// Case-insensitive substring match against the song title or artist.
///
/// An empty query matches every song.
pub fn song_matches(song: &Song, query: &str) -> bool {
    let query = query.to_lowercase();
    song.title.to_lowercase().contains(&query) || song.artist.to_lowercase().contains(&query)
}
