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

//! Database row mapping for domain models.
//!
//! This module provides the conversion logic between raw SQLite result rows
//! and the domain models, including the id newtypes used as query
//! parameters.

use rusqlite::{
    Result, Row, ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};

use crate::model::{Playlist, PlaylistId, Song, SongId, Subtitle};

impl Song {
    /// Maps a `(id, title, artist, album, length, path)` row to a [`Song`].
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            album: row.get(3)?,
            length: row.get(4)?,
            path: row.get(5)?,
        })
    }
}

impl Playlist {
    /// Maps a `(id, title, length, song_count)` row to a [`Playlist`].
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            length: row.get(2)?,
            song_count: row.get(3)?,
        })
    }
}

impl Subtitle {
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            song_id: row.get(0)?,
            sub_id: row.get(1)?,
            language: row.get(2)?,
            path: row.get(3)?,
        })
    }
}

impl ToSql for SongId {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for SongId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_i64().map(SongId)
    }
}

impl ToSql for PlaylistId {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for PlaylistId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_i64().map(PlaylistId)
    }
}
