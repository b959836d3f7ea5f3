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

//! # musicbox
//!
//! A terminal music library and player.
//!
//! Songs, playlists and subtitles live in a library service reached through
//! the [`library::LibraryService`] trait. On top of it sit two screens, a
//! grid of playlists and the song table of a single playlist, managed by
//! [`views::ViewManager`], and a playback [`session::Session`] that drives
//! an mpv-backed [`player::AudioPlayer`].
//!
//! ## Architecture
//!
//! * The **Main Thread** owns the [`app::App`] state and the terminal, and
//!   processes [`actions::events::AppEvent`]s one at a time.
//! * **Library Calls** run as tasks on a tokio runtime and report back to the
//!   main thread as events.
//! * The **SQLite Worker** is a dedicated thread owning the database
//!   connection, fed with requests over a channel.
//! * **Input and Tick Threads** turn terminal input and the passage of time
//!   into events.

pub mod actions;
pub mod app;
pub mod commander;
pub mod components;
pub mod config;
mod db;
pub mod error;
pub mod importer;
pub mod library;
pub mod logging;
pub mod model;
pub mod player;
pub mod render;
pub mod session;
pub mod theme;
pub mod util;
pub mod views;
