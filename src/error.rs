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

//! Library service errors.
//!
//! Every call made against a [`crate::library::LibraryService`] can fail with
//! one of these. Callers above the library boundary generally wrap them in
//! [`anyhow::Error`] and log them.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LibraryError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LibraryError {
    /// The service was used before a successful `initialize`.
    #[error("API not initialized. Call initialize() first.")]
    NotInitialized,

    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid request: {0}")]
    Validation(String),

    /// Opaque failure surfaced from the backing store.
    #[error("Backend failure: {0}")]
    Backend(String),
}

impl LibraryError {
    pub fn song_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Song", id }
    }

    pub fn playlist_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Playlist", id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<rusqlite::Error> for LibraryError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Backend(err.to_string())
    }
}
