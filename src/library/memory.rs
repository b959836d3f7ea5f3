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

//! In-memory library.
//!
//! Simulates the library service over plain ordered collections so the
//! interface can be exercised without a store. Ids are handed out from
//! counters starting at 1 and are never reused.

use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;

use crate::{
    error::{LibraryError, Result},
    library::{
        Batch, LastError, LibraryService, all_songs_playlist, reject_all_songs, validate_new_song,
        validate_title,
    },
    model::{DatabaseStats, NewSong, Playlist, PlaylistId, Song, SongId, Subtitle, song_matches},
};

#[derive(Debug)]
struct StoredPlaylist {
    id: PlaylistId,
    title: String,
}

#[derive(Debug)]
struct Membership {
    song_id: SongId,
    playlist_id: PlaylistId,
    track_number: i64,
}

#[derive(Debug)]
struct MemoryState {
    songs: Vec<Song>,
    playlists: Vec<StoredPlaylist>,
    memberships: Vec<Membership>,
    subtitles: Vec<Subtitle>,
    next_song_id: i64,
    next_playlist_id: i64,
    next_subtitle_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            songs: Vec::new(),
            playlists: Vec::new(),
            memberships: Vec::new(),
            subtitles: Vec::new(),
            next_song_id: 1,
            next_playlist_id: 1,
            next_subtitle_id: 1,
        }
    }
}

impl MemoryState {
    fn song(&self, id: SongId) -> Result<&Song> {
        self.songs
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| LibraryError::song_not_found(id.0))
    }

    fn stored_playlist(&self, id: PlaylistId) -> Result<&StoredPlaylist> {
        self.playlists
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| LibraryError::playlist_not_found(id.0))
    }

    fn songs_in(&self, playlist_id: PlaylistId) -> Vec<Song> {
        let mut members: Vec<&Membership> = self
            .memberships
            .iter()
            .filter(|m| m.playlist_id == playlist_id)
            .collect();
        members.sort_by_key(|m| m.track_number);

        members
            .into_iter()
            .filter_map(|m| self.songs.iter().find(|s| s.id == m.song_id).cloned())
            .collect()
    }

    fn insert_song(&mut self, song: NewSong) -> Result<Song> {
        validate_new_song(&song)?;

        let id = SongId(self.next_song_id);
        self.next_song_id += 1;

        let song = song.into_song(id);
        tracing::debug!("Adding song {} \"{}\" by \"{}\"", id, song.title, song.artist);
        self.songs.push(song.clone());

        Ok(song)
    }

    fn insert_membership(&mut self, song_id: SongId, playlist_id: PlaylistId) -> Result<bool> {
        self.song(song_id)?;

        if playlist_id.is_all_songs() {
            return Ok(true);
        }
        self.stored_playlist(playlist_id)?;

        let already_member = self
            .memberships
            .iter()
            .any(|m| m.song_id == song_id && m.playlist_id == playlist_id);

        if !already_member {
            let track_number = self
                .memberships
                .iter()
                .filter(|m| m.playlist_id == playlist_id)
                .map(|m| m.track_number)
                .max()
                .unwrap_or(0)
                + 1;

            self.memberships.push(Membership {
                song_id,
                playlist_id,
                track_number,
            });
        }

        Ok(true)
    }

    fn playlist(&self, stored: &StoredPlaylist) -> Playlist {
        let songs = self.songs_in(stored.id);
        Playlist {
            id: stored.id,
            title: stored.title.clone(),
            length: songs.iter().map(|s| s.length).sum(),
            song_count: songs.len() as i64,
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryLibrary {
    initialized: AtomicBool,
    state: Mutex<MemoryState>,
    last_error: LastError,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        if !self.is_initialized() {
            return Err(LibraryError::NotInitialized);
        }

        self.state
            .lock()
            .map_err(|_| LibraryError::backend("Library state lock poisoned"))
    }

    fn run<T>(&self, op: impl FnOnce(&mut MemoryState) -> Result<T>) -> Result<T> {
        let result = self.state().and_then(|mut state| op(&mut state));
        if let Err(e) = &result {
            tracing::debug!("Memory library call failed: {}", e);
        }
        self.last_error.track(result)
    }
}

#[async_trait]
impl LibraryService for MemoryLibrary {
    async fn initialize(&self) -> bool {
        tracing::info!("Initialising in-memory library");
        self.last_error.clear();
        self.initialized.store(true, Ordering::SeqCst);
        true
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    async fn shutdown(&self) {
        tracing::info!("Shutting down in-memory library");
        self.initialized.store(false, Ordering::SeqCst);
        self.last_error.clear();
    }

    async fn add_song(&self, song: NewSong) -> Result<Song> {
        self.run(|state| state.insert_song(song))
    }

    async fn add_songs(&self, songs: Vec<NewSong>) -> Result<Vec<Song>> {
        self.run(|state| {
            let mut batch = Batch::new(Vec::with_capacity(songs.len()));
            for song in songs {
                match state.insert_song(song) {
                    Ok(added) => batch.done.push(added),
                    Err(e) => batch.fail(format!("Failed to add song: {}", e)),
                }
            }
            Ok(batch)
        })
        .map(|batch| self.last_error.settle(batch))
    }

    async fn update_song(&self, id: SongId, title: &str, artist: &str, album: &str) -> Result<bool> {
        self.run(|state| {
            validate_title("Song", title)?;

            match state.songs.iter_mut().find(|s| s.id == id) {
                Some(song) => {
                    song.title = title.to_string();
                    song.artist = artist.to_string();
                    song.album = album.to_string();
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    async fn delete_song(&self, id: SongId) -> Result<bool> {
        self.run(|state| {
            let index = state
                .songs
                .iter()
                .position(|s| s.id == id)
                .ok_or_else(|| LibraryError::song_not_found(id.0))?;

            state.songs.remove(index);
            state.memberships.retain(|m| m.song_id != id);
            state.subtitles.retain(|s| s.song_id != id);

            Ok(true)
        })
    }

    async fn get_song(&self, id: SongId) -> Result<Song> {
        self.run(|state| state.song(id).cloned())
    }

    async fn get_all_songs(&self) -> Result<Vec<Song>> {
        self.run(|state| Ok(state.songs.clone()))
    }

    async fn search_songs(&self, query: &str) -> Result<Vec<Song>> {
        self.run(|state| {
            Ok(state
                .songs
                .iter()
                .filter(|s| song_matches(s, query))
                .cloned()
                .collect())
        })
    }

    async fn create_playlist(&self, title: &str) -> Result<Playlist> {
        self.run(|state| {
            validate_title("Playlist", title)?;

            let id = PlaylistId(state.next_playlist_id);
            state.next_playlist_id += 1;

            let stored = StoredPlaylist {
                id,
                title: title.to_string(),
            };
            let playlist = state.playlist(&stored);
            state.playlists.push(stored);

            Ok(playlist)
        })
    }

    async fn update_playlist(&self, id: PlaylistId, title: &str) -> Result<bool> {
        self.run(|state| {
            reject_all_songs(id, "rename")?;
            validate_title("Playlist", title)?;

            match state.playlists.iter_mut().find(|p| p.id == id) {
                Some(playlist) => {
                    playlist.title = title.to_string();
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<bool> {
        self.run(|state| {
            reject_all_songs(id, "delete")?;

            let before = state.playlists.len();
            state.playlists.retain(|p| p.id != id);
            state.memberships.retain(|m| m.playlist_id != id);

            Ok(state.playlists.len() != before)
        })
    }

    async fn get_playlist(&self, id: PlaylistId) -> Result<Playlist> {
        self.run(|state| {
            if id.is_all_songs() {
                return Ok(all_songs_playlist(&state.songs));
            }
            let stored = state.stored_playlist(id)?;
            Ok(state.playlist(stored))
        })
    }

    async fn get_all_playlists(&self) -> Result<Vec<Playlist>> {
        self.run(|state| Ok(state.playlists.iter().map(|p| state.playlist(p)).collect()))
    }

    async fn add_song_to_playlist(&self, song_id: SongId, playlist_id: PlaylistId) -> Result<bool> {
        self.run(|state| state.insert_membership(song_id, playlist_id))
    }

    async fn add_songs_to_playlist(&self, song_ids: &[SongId], playlist_id: PlaylistId) -> Result<bool> {
        self.run(|state| {
            let mut batch = Batch::new(true);
            for &song_id in song_ids {
                if let Err(e) = state.insert_membership(song_id, playlist_id) {
                    batch.done = false;
                    batch.fail(format!("Failed to add song {} to playlist: {}", song_id, e));
                }
            }
            Ok(batch)
        })
        .map(|batch| self.last_error.settle(batch))
    }

    async fn remove_song_from_playlist(&self, song_id: SongId, playlist_id: PlaylistId) -> Result<bool> {
        self.run(|state| {
            reject_all_songs(playlist_id, "remove songs from")?;

            let before = state.memberships.len();
            state
                .memberships
                .retain(|m| !(m.song_id == song_id && m.playlist_id == playlist_id));

            Ok(state.memberships.len() != before)
        })
    }

    async fn get_songs_in_playlist(&self, playlist_id: PlaylistId) -> Result<Vec<Song>> {
        self.run(|state| {
            if playlist_id.is_all_songs() {
                return Ok(state.songs.clone());
            }
            state.stored_playlist(playlist_id)?;
            Ok(state.songs_in(playlist_id))
        })
    }

    async fn add_subtitles(&self, song_id: SongId, language: &str, path: &str) -> Result<Subtitle> {
        self.run(|state| {
            if language.trim().is_empty() {
                return Err(LibraryError::validation("Subtitle language must not be empty"));
            }
            state.song(song_id)?;

            let subtitle = Subtitle {
                song_id,
                sub_id: state.next_subtitle_id,
                language: language.to_string(),
                path: path.to_string(),
            };
            state.next_subtitle_id += 1;
            state.subtitles.push(subtitle.clone());

            Ok(subtitle)
        })
    }

    async fn delete_subtitles(&self, song_id: SongId, sub_id: i64) -> Result<bool> {
        self.run(|state| {
            let before = state.subtitles.len();
            state
                .subtitles
                .retain(|s| !(s.song_id == song_id && s.sub_id == sub_id));

            Ok(state.subtitles.len() != before)
        })
    }

    async fn get_subtitles_for_song(&self, song_id: SongId) -> Result<Vec<Subtitle>> {
        self.run(|state| {
            state.song(song_id)?;
            Ok(state
                .subtitles
                .iter()
                .filter(|s| s.song_id == song_id)
                .cloned()
                .collect())
        })
    }

    async fn get_database_stats(&self) -> Result<DatabaseStats> {
        self.run(|state| {
            Ok(DatabaseStats {
                total_songs: state.songs.len() as i64,
                total_playlists: state.playlists.len() as i64,
                total_subtitles: state.subtitles.len() as i64,
                total_playlist_songs: state.memberships.len() as i64,
            })
        })
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    fn clear_last_error(&self) {
        self.last_error.clear();
    }
}
