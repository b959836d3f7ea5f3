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

//! Data access layer.
//!
//! This module handles all interactions with the SQLite database backing the
//! library, including schema creation and every query the library worker
//! issues. It uses cached statements for the frequently executed queries.
//!
//! # Tables
//!
//! * `songs` - Audio files with their metadata and storage path.
//! * `playlists` - User playlists, aggregates are always derived on read.
//! * `playlist_songs` - The membership relation, ordered by track number.
//! * `subtitles` - Subtitle files attached to a song.

mod model;

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    error::{LibraryError, Result},
    library::Batch,
    model::{DatabaseStats, NewSong, Playlist, PlaylistId, Song, SongId, Subtitle},
};

const PLAYLIST_SELECT: &str = "
    SELECT p.id, p.title, COALESCE(SUM(s.length), 0), COUNT(s.id)
    FROM playlists p
    LEFT JOIN playlist_songs ps ON ps.playlist_id = p.id
    LEFT JOIN songs s ON s.id = ps.song_id
";

/// Opens a connection to the SQLite database and configures it.
///
/// This function performs the following setup:
/// * **WAL Mode**: Enables Write-Ahead Logging.
/// * **Constraints**: Enforces foreign key integrity, membership and subtitle
///   rows are removed along with their song or playlist.
/// * **Schema**: Executes [`create_schema`] to ensure all tables and indices exist.
///
/// # Arguments
///
/// * `path` - The file system path to the SQLite database file.
///
/// # Errors
///
/// Returns an error if the database file cannot be opened, the initial
/// PRAGMA configuration fails, or the schema cannot be created.
pub(crate) fn init_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            LibraryError::backend(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    let conn = Connection::open(path)?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        return Err(LibraryError::backend(format!(
            "Failed to switch to WAL mode. Current mode: {}",
            journal_mode
        )));
    }

    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
    ",
    )?;

    conn.set_prepared_statement_cache_capacity(100);

    create_schema(&conn)?;

    Ok(conn)
}

/// Create the database schema.
///
/// `AUTOINCREMENT` keeps ids monotonic and never hands out 0, which is
/// reserved for the virtual "All Songs" playlist.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            artist TEXT NOT NULL DEFAULT '',
            album TEXT NOT NULL DEFAULT '',
            length INTEGER NOT NULL,
            path TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS playlists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            img_path TEXT
        );

        CREATE TABLE IF NOT EXISTS playlist_songs (
            song_id INTEGER NOT NULL,
            playlist_id INTEGER NOT NULL,
            track_number INTEGER NOT NULL,
            PRIMARY KEY (song_id, playlist_id),
            FOREIGN KEY (song_id) REFERENCES songs (id) ON DELETE CASCADE,
            FOREIGN KEY (playlist_id) REFERENCES playlists (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_playlist_songs_playlist_id ON playlist_songs (playlist_id);

        CREATE TABLE IF NOT EXISTS subtitles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            song_id INTEGER NOT NULL,
            language TEXT NOT NULL,
            path TEXT NOT NULL,
            FOREIGN KEY (song_id) REFERENCES songs (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_subtitles_song_id ON subtitles (song_id);

        COMMIT;",
    )?;

    Ok(())
}

pub(crate) fn insert_song(conn: &Connection, song: NewSong) -> Result<Song> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO songs (title, artist, album, length, path) VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    stmt.execute(params![song.title, song.artist, song.album, song.length, song.path])?;

    Ok(song.into_song(SongId(conn.last_insert_rowid())))
}

/// Inserts songs in a single transaction. A song that fails `check` or the
/// insert itself is skipped and the rest still go in.
pub(crate) fn insert_songs(
    conn: &mut Connection,
    songs: Vec<NewSong>,
    check: impl Fn(&NewSong) -> Result<()>,
) -> Result<Batch<Vec<Song>>> {
    let tx = conn.transaction()?;

    let mut batch = Batch::new(Vec::with_capacity(songs.len()));
    for song in songs {
        match check(&song).and_then(|_| insert_song(&tx, song)) {
            Ok(added) => batch.done.push(added),
            Err(e) => batch.fail(format!("Failed to add song: {}", e)),
        }
    }

    tx.commit()?;

    Ok(batch)
}

pub(crate) fn update_song(
    conn: &Connection,
    id: SongId,
    title: &str,
    artist: &str,
    album: &str,
) -> Result<bool> {
    let mut stmt =
        conn.prepare_cached("UPDATE songs SET title = ?2, artist = ?3, album = ?4 WHERE id = ?1")?;
    let changed = stmt.execute(params![id, title, artist, album])?;

    Ok(changed > 0)
}

pub(crate) fn delete_song(conn: &Connection, id: SongId) -> Result<bool> {
    let mut stmt = conn.prepare_cached("DELETE FROM songs WHERE id = ?1")?;
    match stmt.execute(params![id])? {
        0 => Err(LibraryError::song_not_found(id.0)),
        _ => Ok(true),
    }
}

pub(crate) fn fetch_song(conn: &Connection, id: SongId) -> Result<Song> {
    let mut stmt = conn
        .prepare_cached("SELECT id, title, artist, album, length, path FROM songs WHERE id = ?1")?;

    stmt.query_row(params![id], Song::from_row)
        .optional()?
        .ok_or_else(|| LibraryError::song_not_found(id.0))
}

pub(crate) fn fetch_all_songs(conn: &Connection) -> Result<Vec<Song>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, title, artist, album, length, path FROM songs ORDER BY id")?;
    let results = stmt
        .query_map([], Song::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(results)
}

pub(crate) fn insert_playlist(conn: &Connection, title: &str) -> Result<Playlist> {
    let mut stmt = conn.prepare_cached("INSERT INTO playlists (title) VALUES (?1)")?;
    stmt.execute(params![title])?;

    Ok(Playlist {
        id: PlaylistId(conn.last_insert_rowid()),
        title: title.to_string(),
        length: 0,
        song_count: 0,
    })
}

pub(crate) fn update_playlist(conn: &Connection, id: PlaylistId, title: &str) -> Result<bool> {
    let mut stmt = conn.prepare_cached("UPDATE playlists SET title = ?2 WHERE id = ?1")?;
    let changed = stmt.execute(params![id, title])?;

    Ok(changed > 0)
}

pub(crate) fn delete_playlist(conn: &Connection, id: PlaylistId) -> Result<bool> {
    let mut stmt = conn.prepare_cached("DELETE FROM playlists WHERE id = ?1")?;
    let changed = stmt.execute(params![id])?;

    Ok(changed > 0)
}

pub(crate) fn fetch_playlist(conn: &Connection, id: PlaylistId) -> Result<Playlist> {
    let sql = format!("{PLAYLIST_SELECT} WHERE p.id = ?1 GROUP BY p.id");

    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.query_row(params![id], Playlist::from_row)
        .optional()?
        .ok_or_else(|| LibraryError::playlist_not_found(id.0))
}

pub(crate) fn fetch_all_playlists(conn: &Connection) -> Result<Vec<Playlist>> {
    let sql = format!("{PLAYLIST_SELECT} GROUP BY p.id ORDER BY p.id");

    let mut stmt = conn.prepare_cached(&sql)?;
    let results = stmt
        .query_map([], Playlist::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(results)
}

fn song_exists(conn: &Connection, id: SongId) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM songs WHERE id = ?1")?;
    Ok(stmt.exists(params![id])?)
}

fn playlist_exists(conn: &Connection, id: PlaylistId) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM playlists WHERE id = ?1")?;
    Ok(stmt.exists(params![id])?)
}

/// Appends the song to the end of the playlist. Adding a song that is already
/// a member leaves its position unchanged.
pub(crate) fn insert_membership(conn: &Connection, song_id: SongId, playlist_id: PlaylistId) -> Result<bool> {
    if !song_exists(conn, song_id)? {
        return Err(LibraryError::song_not_found(song_id.0));
    }
    if playlist_id.is_all_songs() {
        return Ok(true);
    }
    if !playlist_exists(conn, playlist_id)? {
        return Err(LibraryError::playlist_not_found(playlist_id.0));
    }

    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO playlist_songs (song_id, playlist_id, track_number)
         SELECT ?1, ?2, COALESCE(MAX(track_number), 0) + 1
         FROM playlist_songs WHERE playlist_id = ?2",
    )?;
    stmt.execute(params![song_id, playlist_id])?;

    Ok(true)
}

/// Adds each song to the playlist in a single transaction, carrying on past
/// songs that cannot be added. The outcome is `true` only if all were.
pub(crate) fn insert_memberships(
    conn: &mut Connection,
    song_ids: &[SongId],
    playlist_id: PlaylistId,
) -> Result<Batch<bool>> {
    let tx = conn.transaction()?;

    let mut batch = Batch::new(true);
    for &song_id in song_ids {
        if let Err(e) = insert_membership(&tx, song_id, playlist_id) {
            batch.done = false;
            batch.fail(format!("Failed to add song {} to playlist: {}", song_id, e));
        }
    }

    tx.commit()?;

    Ok(batch)
}

pub(crate) fn delete_membership(conn: &Connection, song_id: SongId, playlist_id: PlaylistId) -> Result<bool> {
    let mut stmt =
        conn.prepare_cached("DELETE FROM playlist_songs WHERE song_id = ?1 AND playlist_id = ?2")?;
    let changed = stmt.execute(params![song_id, playlist_id])?;

    Ok(changed > 0)
}

pub(crate) fn fetch_playlist_songs(conn: &Connection, playlist_id: PlaylistId) -> Result<Vec<Song>> {
    if !playlist_exists(conn, playlist_id)? {
        return Err(LibraryError::playlist_not_found(playlist_id.0));
    }

    let mut stmt = conn.prepare_cached(
        "SELECT s.id, s.title, s.artist, s.album, s.length, s.path
         FROM playlist_songs ps
         JOIN songs s ON s.id = ps.song_id
         WHERE ps.playlist_id = ?1
         ORDER BY ps.track_number",
    )?;
    let results = stmt
        .query_map(params![playlist_id], Song::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(results)
}

pub(crate) fn insert_subtitle(conn: &Connection, song_id: SongId, language: &str, path: &str) -> Result<Subtitle> {
    if !song_exists(conn, song_id)? {
        return Err(LibraryError::song_not_found(song_id.0));
    }

    let mut stmt =
        conn.prepare_cached("INSERT INTO subtitles (song_id, language, path) VALUES (?1, ?2, ?3)")?;
    stmt.execute(params![song_id, language, path])?;

    Ok(Subtitle {
        song_id,
        sub_id: conn.last_insert_rowid(),
        language: language.to_string(),
        path: path.to_string(),
    })
}

pub(crate) fn delete_subtitle(conn: &Connection, song_id: SongId, sub_id: i64) -> Result<bool> {
    let mut stmt = conn.prepare_cached("DELETE FROM subtitles WHERE song_id = ?1 AND id = ?2")?;
    let changed = stmt.execute(params![song_id, sub_id])?;

    Ok(changed > 0)
}

pub(crate) fn fetch_song_subtitles(conn: &Connection, song_id: SongId) -> Result<Vec<Subtitle>> {
    if !song_exists(conn, song_id)? {
        return Err(LibraryError::song_not_found(song_id.0));
    }

    let mut stmt = conn.prepare_cached(
        "SELECT song_id, id, language, path FROM subtitles WHERE song_id = ?1 ORDER BY id",
    )?;
    let results = stmt
        .query_map(params![song_id], Subtitle::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(results)
}

pub(crate) fn fetch_stats(conn: &Connection) -> Result<DatabaseStats> {
    let count = |table: &str| -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        Ok(conn.query_row(&sql, [], |r| r.get(0))?)
    };

    Ok(DatabaseStats {
        total_songs: count("songs")?,
        total_playlists: count("playlists")?,
        total_subtitles: count("subtitles")?,
        total_playlist_songs: count("playlist_songs")?,
    })
}
