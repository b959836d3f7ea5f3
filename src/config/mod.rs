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

//! Application configuration.
//!
//! This module manages the application configuration file and the on-disk
//! layout derived from it. Everything the player writes lives beneath
//! [`AppConfig::data_dir`]:
//!
//! * `songs/` - Imported audio files.
//! * `thumbnails/` - Playlist tile images.
//! * the library database and the log file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "musicbox";

const SONGS_DIR: &str = "songs";
const THUMBNAILS_DIR: &str = "thumbnails";
const LOG_FILE: &str = "musicbox.log";

/// Which library service implementation to use.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub version: u32,
    pub data_dir: PathBuf,
    pub database_file: String,
    pub library: LibraryKind,
    /// Default log filter, `RUST_LOG` takes precedence when set.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            data_dir: PathBuf::from("data"),
            database_file: "musicPlayer.db".to_string(),
            library: LibraryKind::Sqlite,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Configuration rooted at `data_dir`, otherwise default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn songs_dir(&self) -> PathBuf {
        self.data_dir.join(SONGS_DIR)
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.data_dir.join(THUMBNAILS_DIR)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_live_under_data_dir() {
        let config = AppConfig::default();

        assert_eq!(config.database_path(), PathBuf::from("data/musicPlayer.db"));
        assert_eq!(config.songs_dir(), PathBuf::from("data/songs"));
        assert_eq!(config.thumbnails_dir(), PathBuf::from("data/thumbnails"));
    }

    #[test]
    fn with_data_dir_keeps_defaults() {
        let config = AppConfig::with_data_dir("/tmp/library");

        assert_eq!(config.library, LibraryKind::Sqlite);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/library/musicPlayer.db"));
    }
}
