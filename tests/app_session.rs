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

//! Application event handling with a recording media element.

mod common;

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;
use tokio::{sync::mpsc::UnboundedReceiver, time::timeout};

use musicbox::{
    actions::events::AppEvent,
    app::{App, Flow},
    model::queue::QueueEntry,
    session::MediaElement,
    views::HostNotification,
};

use common::{add_song, memory_library, playlist_with, view_context};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    fn push(&self, call: impl Into<String>) -> Result<()> {
        self.0.lock().unwrap().push(call.into());
        Ok(())
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut self.0.lock().unwrap())
    }
}

impl MediaElement for Recorder {
    fn load(&mut self, path: &str) -> Result<()> {
        self.push(format!("load {path}"))
    }

    fn resume(&mut self) -> Result<()> {
        self.push("resume")
    }

    fn restart(&mut self) -> Result<()> {
        self.push("restart")
    }

    fn stop(&mut self) -> Result<()> {
        self.push("stop")
    }

    fn toggle_pause(&mut self) -> Result<()> {
        self.push("toggle_pause")
    }

    fn seek(&mut self, delta: i32) -> Result<()> {
        self.push(format!("seek {delta}"))
    }

    fn adjust_volume(&mut self, delta: i32) -> Result<()> {
        self.push(format!("volume {delta}"))
    }

    fn toggle_mute(&mut self) -> Result<()> {
        self.push("toggle_mute")
    }
}

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn entry(id: i64, title: &str) -> QueueEntry {
    QueueEntry {
        id: musicbox::model::SongId(id),
        title: title.to_string(),
        artist: "Artist".to_string(),
        path: format!("/music/{title}.mp3"),
    }
}

async fn next_queue_load(event_rx: &mut UnboundedReceiver<AppEvent>) -> AppEvent {
    timeout(Duration::from_secs(5), async {
        loop {
            match event_rx.recv().await {
                Some(event @ AppEvent::QueueLoaded(_)) => return event,
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for the queue")
}

#[tokio::test(flavor = "multi_thread")]
async fn queue_keys_drive_the_media_element() {
    let fixture = memory_library().await;
    let dir = TempDir::new().unwrap();
    let (context, _event_rx) = view_context(fixture.library.clone(), dir.path());
    let recorder = Recorder::default();
    let mut app = App::new(context, Box::new(recorder.clone()));

    let loaded = AppEvent::QueueLoaded(vec![entry(1, "One"), entry(2, "Two")]);
    assert_eq!(app.handle_event(loaded).unwrap(), Flow::Continue);
    assert_eq!(recorder.take(), vec!["load /music/One.mp3", "resume"]);
    assert_eq!(app.session.now_playing().map(|e| e.title.as_str()), Some("One"));

    app.handle_event(key(KeyCode::Char(']'))).unwrap();
    assert_eq!(recorder.take(), vec!["load /music/Two.mp3", "resume"]);

    // Already at the end
    app.handle_event(key(KeyCode::Char(']'))).unwrap();
    assert!(recorder.take().is_empty());

    // Early in the track, previous moves back
    app.handle_event(AppEvent::TimeChanged(2.0)).unwrap();
    app.handle_event(key(KeyCode::Char('['))).unwrap();
    assert_eq!(recorder.take(), vec!["load /music/One.mp3", "resume"]);

    // Later in the track, previous restarts it
    app.handle_event(AppEvent::TimeChanged(30.0)).unwrap();
    app.handle_event(key(KeyCode::Char('['))).unwrap();
    assert_eq!(recorder.take(), vec!["restart"]);
    assert_eq!(app.session.now_playing().map(|e| e.title.as_str()), Some("One"));

    app.handle_event(AppEvent::TrackFinished).unwrap();
    assert_eq!(recorder.take(), vec!["load /music/Two.mp3", "resume"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn playback_keys_reach_the_media_element() {
    let fixture = memory_library().await;
    let dir = TempDir::new().unwrap();
    let (context, _event_rx) = view_context(fixture.library.clone(), dir.path());
    let recorder = Recorder::default();
    let mut app = App::new(context, Box::new(recorder.clone()));

    for code in [' ', ',', '>', '=', '_', 'm', 's'] {
        app.handle_event(key(KeyCode::Char(code))).unwrap();
    }

    assert_eq!(
        recorder.take(),
        vec!["toggle_pause", "seek -5", "seek 20", "volume 1", "volume -5", "toggle_mute", "stop"]
    );

    assert!(!app.session.is_expanded());
    app.handle_event(key(KeyCode::Char('v'))).unwrap();
    assert!(app.session.is_expanded());
}

#[tokio::test(flavor = "multi_thread")]
async fn queueing_a_playlist_from_the_host() {
    let fixture = memory_library().await;
    let library = fixture.library.as_ref();
    let a = add_song(library, "A", "One").await;
    let b = add_song(library, "B", "Two").await;
    let mix = playlist_with(library, "Mix", &[&b, &a]).await;

    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let recorder = Recorder::default();
    let mut app = App::new(context, Box::new(recorder.clone()));

    app.handle_event(AppEvent::Host(HostNotification::AddPlaylistToQueue(mix.id)))
        .unwrap();

    let loaded = next_queue_load(&mut event_rx).await;
    app.handle_event(loaded).unwrap();

    let titles: Vec<&str> = app.session.queue().entries().iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["B", "A"]);
    assert_eq!(recorder.take(), vec![format!("load {}", b.path), "resume".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn exit_and_error_events() {
    let fixture = memory_library().await;
    let dir = TempDir::new().unwrap();
    let (context, _event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut app = App::new(context, Box::new(Recorder::default()));

    app.handle_event(AppEvent::Error("Failed to queue playlist 9".to_string()))
        .unwrap();
    assert_eq!(app.status.as_deref(), Some("Failed to queue playlist 9"));

    assert_eq!(app.handle_event(AppEvent::Tick).unwrap(), Flow::Continue);
    assert_eq!(app.handle_event(key(KeyCode::Char('q'))).unwrap(), Flow::Exit);
    assert_eq!(app.handle_event(AppEvent::ExitApplication).unwrap(), Flow::Exit);
    assert!(app.handle_event(AppEvent::FatalError("boom".to_string())).is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn command_line_posts_host_notifications() {
    let fixture = memory_library().await;
    let dir = TempDir::new().unwrap();
    let (context, mut event_rx) = view_context(fixture.library.clone(), dir.path());
    let mut app = App::new(context, Box::new(Recorder::default()));

    for c in ":playlist".chars() {
        app.handle_event(key(KeyCode::Char(c))).unwrap();
    }
    app.handle_event(key(KeyCode::Enter)).unwrap();

    let notification = timeout(Duration::from_secs(5), async {
        loop {
            match event_rx.recv().await {
                Some(AppEvent::Host(notification)) => return notification,
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(notification, HostNotification::ShowPlaylistModal);
    app.handle_event(AppEvent::Host(notification)).unwrap();
    assert!(app.views.has_modal());
}
