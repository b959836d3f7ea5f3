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

//! Screens and navigation.
//!
//! Exactly one screen controller is active at a time, owned by the
//! [`ViewManager`]. Controllers never mutate their state from background
//! work directly. Instead every library call runs as a task in the
//! controller's [`Scope`], and its outcome comes back to the event loop as a
//! [`ViewResponse`] stamped with the [`ViewTicket`] of the navigation that
//! issued it. Responses from a screen that is no longer active are dropped
//! before they touch anything.

mod elements;
mod grid;
mod manager;
mod notify;
mod playlist;

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::{runtime::Handle, sync::mpsc::UnboundedSender, task::JoinHandle};

pub use elements::{ElementId, ElementMap};
pub use grid::{GridController, PlaylistTile};
pub use manager::{ActiveView, ViewManager};
pub use notify::{Dispatch, HostNotification, NotificationHandler};
pub use playlist::{PlaylistController, RowAction, RowMenu, SongRow};

use crate::{
    actions::events::AppEvent,
    config::AppConfig,
    library::LibraryService,
    model::{Playlist, PlaylistId, Song, queue::QueueEntry},
};

/// A navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Grid,
    Playlist { id: PlaylistId, name: String },
}

/// Everything a controller needs from the session, passed in explicitly.
#[derive(Clone)]
pub struct ViewContext {
    pub library: Arc<dyn LibraryService>,
    pub runtime: Handle,
    pub event_tx: UnboundedSender<AppEvent>,
    pub config: AppConfig,
}

/// Identifies the navigation a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTicket {
    pub generation: u64,
}

#[derive(Debug)]
pub struct ViewResponse {
    pub ticket: ViewTicket,
    pub result: anyhow::Result<ViewData>,
}

/// Results of controller work, applied on the event loop.
#[derive(Debug)]
pub enum ViewData {
    Playlists(Vec<Playlist>),
    PlaylistCreated(Playlist),
    Songs(Vec<Song>),
    Notice(String),
}

/// Requests from a screen that reach beyond it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    Navigate(Route),
    Enqueue(QueueEntry),
    PlayNext(QueueEntry),
    QueuePlaylist(PlaylistId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Consumed,
    Action(ViewAction),
}

/// Cancellation scope for one controller instance.
///
/// Owns every task the controller started. Cancelling, or dropping the
/// scope, aborts those tasks and suppresses any response still in flight.
pub struct Scope {
    ticket: ViewTicket,
    runtime: Handle,
    event_tx: UnboundedSender<AppEvent>,
    cancelled: Arc<AtomicBool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Scope {
    pub(crate) fn new(ticket: ViewTicket, context: &ViewContext) -> Self {
        Self {
            ticket,
            runtime: context.runtime.clone(),
            event_tx: context.event_tx.clone(),
            cancelled: Arc::new(AtomicBool::new(false)),
            tasks: Vec::new(),
        }
    }

    pub fn ticket(&self) -> ViewTicket {
        self.ticket
    }

    /// Runs `work` in the background and posts its outcome to the event loop.
    pub fn request<F>(&mut self, work: F)
    where
        F: Future<Output = anyhow::Result<ViewData>> + Send + 'static,
    {
        if self.is_cancelled() {
            return;
        }

        self.tasks.retain(|task| !task.is_finished());

        let ticket = self.ticket;
        let event_tx = self.event_tx.clone();
        let cancelled = Arc::clone(&self.cancelled);

        let task = self.runtime.spawn(async move {
            let result = work.await;
            if cancelled.load(Ordering::SeqCst) {
                return;
            }
            let _ = event_tx.send(AppEvent::View(ViewResponse { ticket, result }));
        });

        self.tasks.push(task);
    }

    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.cancel();
    }
}
