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

//! Screen navigation and response handling over the in-memory library.

mod common;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

use musicbox::{
    actions::events::AppEvent,
    model::{ALL_SONGS_TITLE, PlaylistId},
    views::{
        ActiveView, Dispatch, HostNotification, KeyOutcome, PlaylistController, Route, ViewAction,
        ViewData, ViewManager, ViewResponse, ViewTicket,
    },
};

use common::{add_song, memory_library, next_view_response, playlist_with, view_context};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

async fn settle(views: &mut ViewManager, event_rx: &mut UnboundedReceiver<AppEvent>) {
    let response = next_view_response(event_rx).await;
    assert!(views.apply(response));
}

fn grid_titles(views: &ViewManager) -> Vec<String> {
    match views.active() {
        Some(ActiveView::Grid(grid)) => grid.tiles().iter().map(|t| t.title.clone()).collect(),
        _ => panic!("grid is not active"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn grid_lists_all_songs_first() {
    let fixture = memory_library().await;
    let library = fixture.library.as_ref();
    let a = add_song(library, "A", "One").await;
    let b = add_song(library, "B", "Two").await;
    playlist_with(library, "Road Trip", &[&a]).await;
    playlist_with(library, "Gym", &[&a, &b]).await;

    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    views.navigate_to(Route::Grid);
    assert_eq!(views.generation(), 1);
    settle(&mut views, &mut event_rx).await;

    assert_eq!(grid_titles(&views), vec![ALL_SONGS_TITLE, "Road Trip", "Gym"]);

    let Some(ActiveView::Grid(grid)) = views.active() else {
        panic!("grid is not active");
    };
    let all = &grid.tiles()[0];
    assert_eq!(all.id, PlaylistId::ALL_SONGS);
    assert_eq!(all.song_count, 2);
    assert!(all.thumbnail.ends_with("no_image.svg"));
}

#[tokio::test(flavor = "multi_thread")]
async fn enter_opens_the_selected_playlist() {
    let fixture = memory_library().await;
    let library = fixture.library.as_ref();
    let a = add_song(library, "A", "One").await;
    add_song(library, "B", "Two").await;
    let road_trip = playlist_with(library, "Road Trip", &[&a]).await;

    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    views.navigate_to(Route::Grid);
    settle(&mut views, &mut event_rx).await;

    assert_eq!(views.handle_key(key(KeyCode::Right)), KeyOutcome::Consumed);
    assert_eq!(views.handle_key(key(KeyCode::Enter)), KeyOutcome::Consumed);

    assert_eq!(
        views.route(),
        Some(Route::Playlist {
            id: road_trip.id,
            name: "Road Trip".to_string()
        })
    );
    assert_eq!(views.generation(), 2);

    settle(&mut views, &mut event_rx).await;

    let Some(ActiveView::Playlist(playlist)) = views.active() else {
        panic!("playlist is not active");
    };
    let titles: Vec<&str> = playlist.rows().iter().map(|r| r.song.title.as_str()).collect();
    assert_eq!(titles, vec!["A"]);
    assert_eq!(playlist.rows()[0].duration, "3:00");

    assert_eq!(views.handle_key(key(KeyCode::Esc)), KeyOutcome::Consumed);
    assert_eq!(views.route(), Some(Route::Grid));
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_responses_are_dropped() {
    let fixture = memory_library().await;
    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    views.navigate_to(Route::Grid);
    views.navigate_to(Route::Playlist {
        id: PlaylistId::ALL_SONGS,
        name: ALL_SONGS_TITLE.to_string(),
    });

    let stale = ViewResponse {
        ticket: ViewTicket { generation: 1 },
        result: Ok(ViewData::Notice("from the grid".to_string())),
    };
    assert!(!views.apply(stale));

    // The grid may have answered before it was cancelled
    loop {
        let response = next_view_response(&mut event_rx).await;
        let current = response.ticket.generation == views.generation();
        assert_eq!(views.apply(response), current);
        if current {
            break;
        }
    }

    let Some(ActiveView::Playlist(playlist)) = views.active() else {
        panic!("playlist is not active");
    };
    assert!(playlist.is_loaded());
    assert_eq!(playlist.notice(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn removing_a_playlist_reloads_the_grid() {
    let fixture = memory_library().await;
    let library = fixture.library.as_ref();
    let keep = library.create_playlist("Keep").await.unwrap();
    let gone = library.create_playlist("Drop").await.unwrap();

    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    views.navigate_to(Route::Grid);
    settle(&mut views, &mut event_rx).await;

    assert_eq!(views.relay(HostNotification::RemovePlaylist(gone.id)), Dispatch::Handled);
    settle(&mut views, &mut event_rx).await;

    assert_eq!(grid_titles(&views), vec![ALL_SONGS_TITLE, "Keep"]);
    assert!(fixture.library.get_playlist(keep.id).await.is_ok());

    // The virtual playlist is never removed
    assert_eq!(views.relay(HostNotification::RemovePlaylist(PlaylistId::ALL_SONGS)), Dispatch::Handled);
    assert_eq!(grid_titles(&views), vec![ALL_SONGS_TITLE, "Keep"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn notifications_reach_only_screens_that_handle_them() {
    let fixture = memory_library().await;
    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    assert_eq!(views.relay(HostNotification::ShowPlaylistModal), Dispatch::Ignored);

    views.navigate_to(Route::Grid);
    settle(&mut views, &mut event_rx).await;

    assert_eq!(views.relay(HostNotification::ShowSubtitleModal), Dispatch::Ignored);
    assert!(!views.has_modal());

    assert_eq!(views.relay(HostNotification::ShowSongModal), Dispatch::Handled);
    assert!(views.has_modal());
    assert_eq!(views.handle_key(key(KeyCode::Esc)), KeyOutcome::Consumed);
    assert!(!views.has_modal());

    views.navigate_to(Route::Playlist {
        id: PlaylistId::ALL_SONGS,
        name: ALL_SONGS_TITLE.to_string(),
    });
    settle(&mut views, &mut event_rx).await;

    assert_eq!(views.relay(HostNotification::ShowPlaylistModal), Dispatch::Ignored);
    assert_eq!(views.relay(HostNotification::RemovePlaylist(PlaylistId(1))), Dispatch::Ignored);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_playlist_modal_adds_a_tile() {
    let fixture = memory_library().await;
    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    views.navigate_to(Route::Grid);
    settle(&mut views, &mut event_rx).await;

    assert_eq!(views.handle_key(key(KeyCode::Char('n'))), KeyOutcome::Consumed);
    assert!(views.has_modal());

    // A blank name keeps the modal open
    views.handle_key(key(KeyCode::Enter));
    assert!(views.has_modal());

    for c in "Road Trip".chars() {
        views.handle_key(key(KeyCode::Char(c)));
    }
    views.handle_key(key(KeyCode::Enter));
    assert!(!views.has_modal());

    settle(&mut views, &mut event_rx).await;
    assert_eq!(grid_titles(&views), vec![ALL_SONGS_TITLE, "Road Trip"]);

    let playlists = fixture.library.get_all_playlists().await.unwrap();
    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0].title, "Road Trip");
}

#[tokio::test(flavor = "multi_thread")]
async fn playlist_rows_offer_queue_actions_and_removal() {
    let fixture = memory_library().await;
    let library = fixture.library.as_ref();
    let a = add_song(library, "A", "One").await;
    let b = add_song(library, "B", "Two").await;
    let mix = playlist_with(library, "Mix", &[&a, &b]).await;

    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    views.navigate_to(Route::Playlist {
        id: mix.id,
        name: mix.title.clone(),
    });
    settle(&mut views, &mut event_rx).await;

    match views.handle_key(key(KeyCode::Char('a'))) {
        KeyOutcome::Action(ViewAction::Enqueue(entry)) => assert_eq!(entry.id, a.id),
        other => panic!("unexpected {:?}", other),
    }

    views.handle_key(key(KeyCode::Down));
    match views.handle_key(key(KeyCode::Char('n'))) {
        KeyOutcome::Action(ViewAction::PlayNext(entry)) => assert_eq!(entry.id, b.id),
        other => panic!("unexpected {:?}", other),
    }

    // Remove B through the row menu: Play next, Add to queue, Remove
    views.handle_key(key(KeyCode::Enter));
    views.handle_key(key(KeyCode::Down));
    views.handle_key(key(KeyCode::Down));
    assert_eq!(views.handle_key(key(KeyCode::Enter)), KeyOutcome::Consumed);

    settle(&mut views, &mut event_rx).await;

    let Some(ActiveView::Playlist(playlist)) = views.active() else {
        panic!("playlist is not active");
    };
    let ids: Vec<_> = playlist.rows().iter().map(|r| r.song.id).collect();
    assert_eq!(ids, vec![a.id]);
    assert_eq!(playlist.selected_song().map(|s| s.id), Some(a.id));
}

fn playlist_view(views: &ViewManager) -> &PlaylistController {
    match views.active() {
        Some(ActiveView::Playlist(playlist)) => playlist,
        _ => panic!("playlist is not active"),
    }
}

fn type_text(views: &mut ViewManager, text: &str) {
    for c in text.chars() {
        views.handle_key(key(KeyCode::Char(c)));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn row_menu_acts_on_the_song_it_was_opened_for() {
    let fixture = memory_library().await;
    let library = fixture.library.as_ref();
    let a = add_song(library, "A", "One").await;
    let b = add_song(library, "B", "Two").await;
    let c = add_song(library, "C", "Three").await;
    let mix = playlist_with(library, "Mix", &[&a, &b, &c]).await;

    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    views.navigate_to(Route::Playlist {
        id: mix.id,
        name: mix.title.clone(),
    });
    settle(&mut views, &mut event_rx).await;

    views.handle_key(key(KeyCode::Char('x')));
    views.handle_key(key(KeyCode::Down));
    views.handle_key(key(KeyCode::Enter));
    assert_eq!(playlist_view(&views).menu().map(|m| m.song), Some(b.id));

    // The removal of A lands while the menu is open and shifts the rows up
    settle(&mut views, &mut event_rx).await;
    assert_eq!(playlist_view(&views).selected_song().map(|s| s.id), Some(c.id));

    match views.handle_key(key(KeyCode::Enter)) {
        KeyOutcome::Action(ViewAction::PlayNext(entry)) => assert_eq!(entry.id, b.id),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn song_settings_modal_updates_the_song() {
    let fixture = memory_library().await;
    let library = fixture.library.as_ref();
    let a = add_song(library, "A", "One").await;
    let mix = playlist_with(library, "Mix", &[&a]).await;

    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    views.navigate_to(Route::Playlist {
        id: mix.id,
        name: mix.title.clone(),
    });
    settle(&mut views, &mut event_rx).await;

    assert_eq!(views.handle_key(key(KeyCode::Char('e'))), KeyOutcome::Consumed);
    assert!(views.has_modal());

    type_text(&mut views, " Live");
    views.handle_key(key(KeyCode::Enter));
    assert!(!views.has_modal());

    settle(&mut views, &mut event_rx).await;

    assert_eq!(playlist_view(&views).rows()[0].song.title, "A Live");
    let stored = fixture.library.get_song(a.id).await.unwrap();
    assert_eq!(stored.title, "A Live");
    assert_eq!(stored.artist, "One");
}

#[tokio::test(flavor = "multi_thread")]
async fn upload_from_a_playlist_adds_the_song_to_it() {
    let fixture = memory_library().await;
    let library = fixture.library.as_ref();
    let a = add_song(library, "A", "One").await;
    let mix = playlist_with(library, "Mix", &[&a]).await;

    let dir = TempDir::new().unwrap();
    let source_dir = TempDir::new().unwrap();
    let source = source_dir.path().join("fresh.mp3");
    std::fs::write(&source, b"not really audio").unwrap();

    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    views.navigate_to(Route::Playlist {
        id: mix.id,
        name: mix.title.clone(),
    });
    settle(&mut views, &mut event_rx).await;

    assert_eq!(views.handle_key(key(KeyCode::Char('u'))), KeyOutcome::Consumed);
    assert!(views.has_modal());

    type_text(&mut views, &source.to_string_lossy());
    views.handle_key(key(KeyCode::Enter));
    assert!(!views.has_modal());

    settle(&mut views, &mut event_rx).await;

    let titles: Vec<&str> = playlist_view(&views).rows().iter().map(|r| r.song.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "fresh"]);

    let members = fixture.library.get_songs_in_playlist(mix.id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert!(std::path::Path::new(&members[1].path).starts_with(dir.path()));
    assert!(std::path::Path::new(&members[1].path).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn subtitle_modal_attaches_subtitles_to_the_selected_song() {
    let fixture = memory_library().await;
    let library = fixture.library.as_ref();
    let a = add_song(library, "A", "One").await;
    let mix = playlist_with(library, "Mix", &[&a]).await;

    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    views.navigate_to(Route::Playlist {
        id: mix.id,
        name: mix.title.clone(),
    });
    settle(&mut views, &mut event_rx).await;

    assert_eq!(views.handle_key(key(KeyCode::Char('t'))), KeyOutcome::Consumed);
    assert!(views.has_modal());

    type_text(&mut views, "en");
    views.handle_key(key(KeyCode::Tab));
    type_text(&mut views, "/subs/a.srt");
    views.handle_key(key(KeyCode::Enter));
    assert!(!views.has_modal());

    settle(&mut views, &mut event_rx).await;

    let expected = format!("Added en subtitles to song {}", a.id);
    assert_eq!(playlist_view(&views).notice(), Some(expected.as_str()));

    let subtitles = fixture.library.get_subtitles_for_song(a.id).await.unwrap();
    assert_eq!(subtitles.len(), 1);
    assert_eq!(subtitles[0].language, "en");
    assert_eq!(subtitles[0].path, "/subs/a.srt");
}

#[tokio::test(flavor = "multi_thread")]
async fn grid_queues_the_selected_playlist() {
    let fixture = memory_library().await;
    let library = fixture.library.as_ref();
    let a = add_song(library, "A", "One").await;
    let road_trip = playlist_with(library, "Road Trip", &[&a]).await;

    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut views = ViewManager::new(context);

    views.navigate_to(Route::Grid);
    settle(&mut views, &mut event_rx).await;

    assert_eq!(
        views.handle_key(key(KeyCode::Char('p'))),
        KeyOutcome::Action(ViewAction::QueuePlaylist(PlaylistId::ALL_SONGS))
    );

    views.handle_key(key(KeyCode::Right));
    assert_eq!(
        views.handle_key(key(KeyCode::Char('p'))),
        KeyOutcome::Action(ViewAction::QueuePlaylist(road_trip.id))
    );
}
