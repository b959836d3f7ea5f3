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

//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use tempfile::TempDir;
use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver},
    time::timeout,
};

use musicbox::{
    actions::events::AppEvent,
    config::AppConfig,
    library::{BackendLibrary, LibraryService, MemoryLibrary},
    model::{NewSong, Playlist, Song},
    views::{ViewContext, ViewResponse},
};

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// A library under test. The temporary directory, if any, is kept alive for
/// as long as the fixture.
pub struct Fixture {
    pub name: &'static str,
    pub library: Arc<dyn LibraryService>,
    _dir: Option<TempDir>,
}

pub async fn memory_library() -> Fixture {
    let library: Arc<dyn LibraryService> = Arc::new(MemoryLibrary::new());
    assert!(library.initialize().await);

    Fixture {
        name: "memory",
        library,
        _dir: None,
    }
}

pub async fn sqlite_library() -> Fixture {
    let dir = TempDir::new().expect("temp dir");
    let library: Arc<dyn LibraryService> =
        Arc::new(BackendLibrary::spawn(dir.path().join("data").join("musicPlayer.db")));
    assert!(library.initialize().await, "{:?}", library.last_error());

    Fixture {
        name: "sqlite",
        library,
        _dir: Some(dir),
    }
}

/// Both library variants, initialised and empty.
pub async fn libraries() -> Vec<Fixture> {
    vec![memory_library().await, sqlite_library().await]
}

pub fn new_song(title: &str, artist: &str, length: i64) -> NewSong {
    NewSong::new(title, artist, "Album", length, format!("/music/{title}.mp3"))
}

pub async fn add_song(library: &dyn LibraryService, title: &str, artist: &str) -> Song {
    library
        .add_song(new_song(title, artist, 180))
        .await
        .expect("add song")
}

pub async fn playlist_with(library: &dyn LibraryService, title: &str, songs: &[&Song]) -> Playlist {
    let playlist = library.create_playlist(title).await.expect("create playlist");
    for song in songs {
        library
            .add_song_to_playlist(song.id, playlist.id)
            .await
            .expect("add to playlist");
    }
    playlist
}

/// A view context over `library` whose events can be inspected.
pub fn view_context(
    library: Arc<dyn LibraryService>,
    data_dir: &std::path::Path,
) -> (ViewContext, UnboundedReceiver<AppEvent>) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let context = ViewContext {
        library,
        runtime: Handle::current(),
        event_tx,
        config: AppConfig::with_data_dir(data_dir),
    };
    (context, event_rx)
}

/// Waits for the next screen response, skipping any other events.
pub async fn next_view_response(event_rx: &mut UnboundedReceiver<AppEvent>) -> ViewResponse {
    timeout(RESPONSE_TIMEOUT, async {
        loop {
            match event_rx.recv().await {
                Some(AppEvent::View(response)) => return response,
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for a view response")
}
