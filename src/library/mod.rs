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

//! Library service client.
//!
//! The library service is the store of songs, playlists, subtitles and the
//! playlist membership relation. Everything above this module talks to it
//! exclusively through the [`LibraryService`] trait, which has two
//! implementations:
//!
//! * [`BackendLibrary`] - forwards every call as a named request to a worker
//!   thread that owns the SQLite store.
//! * [`MemoryLibrary`] - an in-memory simulation with the same surface, used
//!   to exercise the interface without a store.
//!
//! Every operation is asynchronous and may fail with a [`LibraryError`]. No
//! ordering is guaranteed between calls that are in flight at the same time.

mod backend;
mod memory;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

pub use crate::error::{LibraryError, Result};
pub use backend::BackendLibrary;
pub use memory::MemoryLibrary;

use crate::{
    config::{AppConfig, LibraryKind},
    model::{DatabaseStats, NewSong, Playlist, PlaylistId, Song, SongId, Subtitle},
};

#[async_trait]
pub trait LibraryService: Send + Sync {
    /// Prepares the service for use, returning `false` on failure. The reason
    /// for a failure is available from [`LibraryService::last_error`].
    async fn initialize(&self) -> bool;

    fn is_initialized(&self) -> bool;

    async fn shutdown(&self);

    // Songs

    async fn add_song(&self, song: NewSong) -> Result<Song>;

    /// Adds several songs, skipping any that cannot be added, and returns
    /// those that were. A skipped song leaves its reason in
    /// [`LibraryService::last_error`].
    async fn add_songs(&self, songs: Vec<NewSong>) -> Result<Vec<Song>>;

    async fn update_song(&self, id: SongId, title: &str, artist: &str, album: &str) -> Result<bool>;

    async fn delete_song(&self, id: SongId) -> Result<bool>;

    async fn get_song(&self, id: SongId) -> Result<Song>;

    async fn get_all_songs(&self) -> Result<Vec<Song>>;

    async fn search_songs(&self, query: &str) -> Result<Vec<Song>>;

    // Playlists

    async fn create_playlist(&self, title: &str) -> Result<Playlist>;

    async fn update_playlist(&self, id: PlaylistId, title: &str) -> Result<bool>;

    async fn delete_playlist(&self, id: PlaylistId) -> Result<bool>;

    async fn get_playlist(&self, id: PlaylistId) -> Result<Playlist>;

    async fn get_all_playlists(&self) -> Result<Vec<Playlist>>;

    async fn add_song_to_playlist(&self, song_id: SongId, playlist_id: PlaylistId) -> Result<bool>;

    /// Adds several songs to a playlist, carrying on past failures. Returns
    /// `false` if any song could not be added, with the reason left in
    /// [`LibraryService::last_error`].
    async fn add_songs_to_playlist(&self, song_ids: &[SongId], playlist_id: PlaylistId) -> Result<bool>;

    async fn remove_song_from_playlist(&self, song_id: SongId, playlist_id: PlaylistId) -> Result<bool>;

    async fn get_songs_in_playlist(&self, playlist_id: PlaylistId) -> Result<Vec<Song>>;

    // Subtitles

    async fn add_subtitles(&self, song_id: SongId, language: &str, path: &str) -> Result<Subtitle>;

    async fn delete_subtitles(&self, song_id: SongId, sub_id: i64) -> Result<bool>;

    async fn get_subtitles_for_song(&self, song_id: SongId) -> Result<Vec<Subtitle>>;

    async fn get_database_stats(&self) -> Result<DatabaseStats>;

    // Diagnostics

    /// Message of the most recent failed call, if the last call failed.
    fn last_error(&self) -> Option<String>;

    fn clear_last_error(&self);
}

/// Creates the library client selected by the configuration.
pub fn open(config: &AppConfig) -> Arc<dyn LibraryService> {
    match config.library {
        LibraryKind::Sqlite => Arc::new(BackendLibrary::spawn(config.database_path())),
        LibraryKind::Memory => Arc::new(MemoryLibrary::new()),
    }
}

/// Records the message of the most recent failed call.
#[derive(Debug, Default)]
pub(crate) struct LastError(Mutex<Option<String>>);

impl LastError {
    pub(crate) fn track<T>(&self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.clear(),
            Err(e) => self.set(e.to_string()),
        }
        result
    }

    /// Records the last failure of a batch that otherwise succeeded.
    pub(crate) fn settle<T>(&self, batch: Batch<T>) -> T {
        if let Some(message) = batch.failure {
            self.set(message);
        }
        batch.done
    }

    pub(crate) fn set(&self, message: String) {
        if let Ok(mut last) = self.0.lock() {
            *last = Some(message);
        }
    }

    pub(crate) fn get(&self) -> Option<String> {
        self.0.lock().ok().and_then(|last| last.clone())
    }

    pub(crate) fn clear(&self) {
        if let Ok(mut last) = self.0.lock() {
            *last = None;
        }
    }
}

/// Outcome of a best-effort batch: whatever went through, and the message of
/// the last item that did not.
#[derive(Debug)]
pub(crate) struct Batch<T> {
    pub(crate) done: T,
    pub(crate) failure: Option<String>,
}

impl<T> Batch<T> {
    pub(crate) fn new(done: T) -> Self {
        Self { done, failure: None }
    }

    pub(crate) fn fail(&mut self, message: String) {
        tracing::debug!("{}", message);
        self.failure = Some(message);
    }
}

/// Checks shared by both variants before anything reaches the store.
pub(crate) fn validate_title(kind: &str, title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(LibraryError::validation(format!("{kind} title must not be empty")));
    }
    Ok(())
}

pub(crate) fn validate_new_song(song: &NewSong) -> Result<()> {
    validate_title("Song", &song.title)?;

    if song.length < 0 {
        return Err(LibraryError::validation("Song length must not be negative"));
    }
    if song.path.trim().is_empty() {
        return Err(LibraryError::validation("Song path must not be empty"));
    }

    Ok(())
}

pub(crate) fn reject_all_songs(playlist_id: PlaylistId, action: &str) -> Result<()> {
    if playlist_id.is_all_songs() {
        return Err(LibraryError::validation(format!(
            "Cannot {action} the {} playlist",
            crate::model::ALL_SONGS_TITLE
        )));
    }
    Ok(())
}

/// The virtual playlist summarising the whole collection.
pub(crate) fn all_songs_playlist(songs: &[Song]) -> Playlist {
    Playlist {
        id: PlaylistId::ALL_SONGS,
        title: crate::model::ALL_SONGS_TITLE.to_string(),
        length: songs.iter().map(|s| s.length).sum(),
        song_count: songs.len() as i64,
    }
}
