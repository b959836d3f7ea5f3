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

//! Backend library client and request worker.
//!
//! [`BackendLibrary`] does no storage work itself. Every call is turned into a
//! named [`LibraryRequest`] and sent to a background worker thread that owns
//! the SQLite connection, the result comes back on a one-shot reply channel.
//!
//! # Architecture
//!
//! 1. **Request Channel**: Carries one request variant per service operation,
//!    plus `Open` and `Close` for the connection lifecycle.
//! 2. **Reply Channel**: Each request owns a `oneshot` sender, so callers can
//!    simply await the outcome from async code.
//!
//! The worker processes requests strictly in arrival order. It exits when the
//! client is dropped and the request channel disconnects.

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender},
    },
    thread,
};

use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::oneshot;

use crate::{
    db,
    error::{LibraryError, Result},
    library::{
        Batch, LastError, LibraryService, all_songs_playlist, reject_all_songs, validate_new_song,
        validate_title,
    },
    model::{DatabaseStats, NewSong, Playlist, PlaylistId, Song, SongId, Subtitle, song_matches},
};

type Reply<T> = oneshot::Sender<Result<T>>;

#[derive(Debug)]
enum LibraryRequest {
    Open(Reply<()>),
    Close(Reply<()>),

    AddSong(NewSong, Reply<Song>),
    AddSongs(Vec<NewSong>, Reply<Batch<Vec<Song>>>),
    UpdateSong {
        id: SongId,
        title: String,
        artist: String,
        album: String,
        reply: Reply<bool>,
    },
    DeleteSong(SongId, Reply<bool>),
    GetSong(SongId, Reply<Song>),
    GetAllSongs(Reply<Vec<Song>>),
    SearchSongs(String, Reply<Vec<Song>>),

    CreatePlaylist(String, Reply<Playlist>),
    UpdatePlaylist(PlaylistId, String, Reply<bool>),
    DeletePlaylist(PlaylistId, Reply<bool>),
    GetPlaylist(PlaylistId, Reply<Playlist>),
    GetAllPlaylists(Reply<Vec<Playlist>>),

    AddSongToPlaylist(SongId, PlaylistId, Reply<bool>),
    AddSongsToPlaylist(Vec<SongId>, PlaylistId, Reply<Batch<bool>>),
    RemoveSongFromPlaylist(SongId, PlaylistId, Reply<bool>),
    GetSongsInPlaylist(PlaylistId, Reply<Vec<Song>>),

    AddSubtitles {
        song_id: SongId,
        language: String,
        path: String,
        reply: Reply<Subtitle>,
    },
    DeleteSubtitles(SongId, i64, Reply<bool>),
    GetSubtitlesForSong(SongId, Reply<Vec<Subtitle>>),

    GetDatabaseStats(Reply<DatabaseStats>),
}

/// A handle to the library worker.
///
/// Cloning is not supported, share the handle behind an `Arc` instead.
#[derive(Debug)]
pub struct BackendLibrary {
    request_tx: Sender<LibraryRequest>,
    initialized: AtomicBool,
    last_error: LastError,
}

impl BackendLibrary {
    /// Spawns the worker thread for the database at `path`.
    ///
    /// The database is not opened until [`LibraryService::initialize`] is
    /// called.
    pub fn spawn(path: PathBuf) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<LibraryRequest>();

        thread::spawn(move || library_worker(path, request_rx));

        Self {
            request_tx,
            initialized: AtomicBool::new(false),
            last_error: LastError::default(),
        }
    }

    /// Sends a request to the worker and waits for its reply.
    async fn send<T: Send>(&self, request: impl FnOnce(Reply<T>) -> LibraryRequest) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.request_tx
            .send(request(reply_tx))
            .map_err(|_| LibraryError::backend("Library worker has stopped"))?;

        reply_rx
            .await
            .map_err(|_| LibraryError::backend("Library worker dropped the request"))?
    }

    /// Sends a request once initialised, recording the outcome for
    /// [`LibraryService::last_error`].
    async fn call<T: Send>(&self, request: impl FnOnce(Reply<T>) -> LibraryRequest) -> Result<T> {
        let result = if self.is_initialized() {
            self.send(request).await
        } else {
            Err(LibraryError::NotInitialized)
        };

        if let Err(e) = &result {
            tracing::debug!("Library call failed: {}", e);
        }

        self.last_error.track(result)
    }
}

#[async_trait]
impl LibraryService for BackendLibrary {
    async fn initialize(&self) -> bool {
        match self.send(LibraryRequest::Open).await {
            Ok(()) => {
                self.last_error.clear();
                self.initialized.store(true, Ordering::SeqCst);
                true
            }
            Err(e) => {
                tracing::error!("Failed to initialise library: {}", e);
                self.last_error.set(e.to_string());
                false
            }
        }
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    async fn shutdown(&self) {
        if !self.initialized.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Err(e) = self.send(LibraryRequest::Close).await {
            tracing::warn!("Library did not close cleanly: {}", e);
        }
        self.last_error.clear();
    }

    async fn add_song(&self, song: NewSong) -> Result<Song> {
        self.call(|reply| LibraryRequest::AddSong(song, reply)).await
    }

    async fn add_songs(&self, songs: Vec<NewSong>) -> Result<Vec<Song>> {
        let batch = self.call(|reply| LibraryRequest::AddSongs(songs, reply)).await?;
        Ok(self.last_error.settle(batch))
    }

    async fn update_song(&self, id: SongId, title: &str, artist: &str, album: &str) -> Result<bool> {
        self.call(|reply| LibraryRequest::UpdateSong {
            id,
            title: title.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            reply,
        })
        .await
    }

    async fn delete_song(&self, id: SongId) -> Result<bool> {
        self.call(|reply| LibraryRequest::DeleteSong(id, reply)).await
    }

    async fn get_song(&self, id: SongId) -> Result<Song> {
        self.call(|reply| LibraryRequest::GetSong(id, reply)).await
    }

    async fn get_all_songs(&self) -> Result<Vec<Song>> {
        self.call(LibraryRequest::GetAllSongs).await
    }

    async fn search_songs(&self, query: &str) -> Result<Vec<Song>> {
        let query = query.to_string();
        self.call(|reply| LibraryRequest::SearchSongs(query, reply)).await
    }

    async fn create_playlist(&self, title: &str) -> Result<Playlist> {
        let title = title.to_string();
        self.call(|reply| LibraryRequest::CreatePlaylist(title, reply)).await
    }

    async fn update_playlist(&self, id: PlaylistId, title: &str) -> Result<bool> {
        let title = title.to_string();
        self.call(|reply| LibraryRequest::UpdatePlaylist(id, title, reply)).await
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<bool> {
        self.call(|reply| LibraryRequest::DeletePlaylist(id, reply)).await
    }

    async fn get_playlist(&self, id: PlaylistId) -> Result<Playlist> {
        self.call(|reply| LibraryRequest::GetPlaylist(id, reply)).await
    }

    async fn get_all_playlists(&self) -> Result<Vec<Playlist>> {
        self.call(LibraryRequest::GetAllPlaylists).await
    }

    async fn add_song_to_playlist(&self, song_id: SongId, playlist_id: PlaylistId) -> Result<bool> {
        self.call(|reply| LibraryRequest::AddSongToPlaylist(song_id, playlist_id, reply))
            .await
    }

    async fn add_songs_to_playlist(&self, song_ids: &[SongId], playlist_id: PlaylistId) -> Result<bool> {
        let song_ids = song_ids.to_vec();
        let batch = self
            .call(|reply| LibraryRequest::AddSongsToPlaylist(song_ids, playlist_id, reply))
            .await?;
        Ok(self.last_error.settle(batch))
    }

    async fn remove_song_from_playlist(&self, song_id: SongId, playlist_id: PlaylistId) -> Result<bool> {
        self.call(|reply| LibraryRequest::RemoveSongFromPlaylist(song_id, playlist_id, reply))
            .await
    }

    async fn get_songs_in_playlist(&self, playlist_id: PlaylistId) -> Result<Vec<Song>> {
        self.call(|reply| LibraryRequest::GetSongsInPlaylist(playlist_id, reply))
            .await
    }

    async fn add_subtitles(&self, song_id: SongId, language: &str, path: &str) -> Result<Subtitle> {
        self.call(|reply| LibraryRequest::AddSubtitles {
            song_id,
            language: language.to_string(),
            path: path.to_string(),
            reply,
        })
        .await
    }

    async fn delete_subtitles(&self, song_id: SongId, sub_id: i64) -> Result<bool> {
        self.call(|reply| LibraryRequest::DeleteSubtitles(song_id, sub_id, reply))
            .await
    }

    async fn get_subtitles_for_song(&self, song_id: SongId) -> Result<Vec<Subtitle>> {
        self.call(|reply| LibraryRequest::GetSubtitlesForSong(song_id, reply))
            .await
    }

    async fn get_database_stats(&self) -> Result<DatabaseStats> {
        self.call(LibraryRequest::GetDatabaseStats).await
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    fn clear_last_error(&self) {
        self.last_error.clear();
    }
}

/// Sends a result back to the caller. The caller may have given up waiting,
/// in which case the result is discarded.
fn respond<T>(reply: Reply<T>, result: Result<T>) {
    let _ = reply.send(result);
}

fn with_conn<T>(
    conn: &mut Option<Connection>,
    op: impl FnOnce(&mut Connection) -> Result<T>,
) -> Result<T> {
    match conn.as_mut() {
        Some(conn) => op(conn),
        None => Err(LibraryError::NotInitialized),
    }
}

/// The execution loop for the library worker.
///
/// Owns the database connection for its whole lifetime and answers requests
/// until the request channel is closed.
fn library_worker(path: PathBuf, request_rx: Receiver<LibraryRequest>) {
    let mut conn: Option<Connection> = None;

    while let Ok(request) = request_rx.recv() {
        handle_request(&path, &mut conn, request);
    }

    tracing::debug!("Library worker exiting");
}

fn handle_request(path: &Path, conn: &mut Option<Connection>, request: LibraryRequest) {
    match request {
        LibraryRequest::Open(reply) => {
            let result = if conn.is_some() {
                Ok(())
            } else {
                tracing::info!("Opening library database at {}", path.display());
                db::init_db(path).map(|opened| *conn = Some(opened))
            };
            respond(reply, result);
        }
        LibraryRequest::Close(reply) => {
            let result = match conn.take() {
                Some(open) => open.close().map_err(|(_, e)| LibraryError::from(e)),
                None => Ok(()),
            };
            respond(reply, result);
        }

        LibraryRequest::AddSong(song, reply) => {
            let result = validate_new_song(&song).and_then(|_| with_conn(conn, |c| db::insert_song(c, song)));
            respond(reply, result);
        }
        LibraryRequest::AddSongs(songs, reply) => {
            respond(reply, with_conn(conn, |c| db::insert_songs(c, songs, validate_new_song)));
        }
        LibraryRequest::UpdateSong {
            id,
            title,
            artist,
            album,
            reply,
        } => {
            let result = validate_title("Song", &title)
                .and_then(|_| with_conn(conn, |c| db::update_song(c, id, &title, &artist, &album)));
            respond(reply, result);
        }
        LibraryRequest::DeleteSong(id, reply) => {
            respond(reply, with_conn(conn, |c| db::delete_song(c, id)));
        }
        LibraryRequest::GetSong(id, reply) => {
            respond(reply, with_conn(conn, |c| db::fetch_song(c, id)));
        }
        LibraryRequest::GetAllSongs(reply) => {
            respond(reply, with_conn(conn, |c| db::fetch_all_songs(c)));
        }
        LibraryRequest::SearchSongs(query, reply) => {
            let result = with_conn(conn, |c| {
                let songs = db::fetch_all_songs(c)?;
                Ok(songs.into_iter().filter(|s| song_matches(s, &query)).collect())
            });
            respond(reply, result);
        }

        LibraryRequest::CreatePlaylist(title, reply) => {
            let result = validate_title("Playlist", &title)
                .and_then(|_| with_conn(conn, |c| db::insert_playlist(c, &title)));
            respond(reply, result);
        }
        LibraryRequest::UpdatePlaylist(id, title, reply) => {
            let result = reject_all_songs(id, "rename")
                .and_then(|_| validate_title("Playlist", &title))
                .and_then(|_| with_conn(conn, |c| db::update_playlist(c, id, &title)));
            respond(reply, result);
        }
        LibraryRequest::DeletePlaylist(id, reply) => {
            let result = reject_all_songs(id, "delete")
                .and_then(|_| with_conn(conn, |c| db::delete_playlist(c, id)));
            respond(reply, result);
        }
        LibraryRequest::GetPlaylist(id, reply) => {
            let result = with_conn(conn, |c| {
                if id.is_all_songs() {
                    Ok(all_songs_playlist(&db::fetch_all_songs(c)?))
                } else {
                    db::fetch_playlist(c, id)
                }
            });
            respond(reply, result);
        }
        LibraryRequest::GetAllPlaylists(reply) => {
            respond(reply, with_conn(conn, |c| db::fetch_all_playlists(c)));
        }

        LibraryRequest::AddSongToPlaylist(song_id, playlist_id, reply) => {
            respond(reply, with_conn(conn, |c| db::insert_membership(c, song_id, playlist_id)));
        }
        LibraryRequest::AddSongsToPlaylist(song_ids, playlist_id, reply) => {
            respond(reply, with_conn(conn, |c| db::insert_memberships(c, &song_ids, playlist_id)));
        }
        LibraryRequest::RemoveSongFromPlaylist(song_id, playlist_id, reply) => {
            let result = reject_all_songs(playlist_id, "remove songs from")
                .and_then(|_| with_conn(conn, |c| db::delete_membership(c, song_id, playlist_id)));
            respond(reply, result);
        }
        LibraryRequest::GetSongsInPlaylist(playlist_id, reply) => {
            let result = with_conn(conn, |c| {
                if playlist_id.is_all_songs() {
                    db::fetch_all_songs(c)
                } else {
                    db::fetch_playlist_songs(c, playlist_id)
                }
            });
            respond(reply, result);
        }

        LibraryRequest::AddSubtitles {
            song_id,
            language,
            path,
            reply,
        } => {
            let result = if language.trim().is_empty() {
                Err(LibraryError::validation("Subtitle language must not be empty"))
            } else {
                with_conn(conn, |c| db::insert_subtitle(c, song_id, &language, &path))
            };
            respond(reply, result);
        }
        LibraryRequest::DeleteSubtitles(song_id, sub_id, reply) => {
            respond(reply, with_conn(conn, |c| db::delete_subtitle(c, song_id, sub_id)));
        }
        LibraryRequest::GetSubtitlesForSong(song_id, reply) => {
            respond(reply, with_conn(conn, |c| db::fetch_song_subtitles(c, song_id)));
        }

        LibraryRequest::GetDatabaseStats(reply) => {
            respond(reply, with_conn(conn, |c| db::fetch_stats(c)));
        }
    }
}
