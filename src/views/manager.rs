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

//! Navigation between screens.
//!
//! The [`ViewManager`] owns the single active controller slot. Every
//! navigation cancels the outgoing controller's scope before the incoming
//! controller is built, and bumps the generation counter so that responses
//! issued under an earlier navigation are recognisably stale.

use crossterm::event::KeyEvent;

use crate::{
    components::FormModal,
    views::{
        Dispatch, GridController, HostNotification, KeyOutcome, NotificationHandler,
        PlaylistController, Route, Scope, ViewAction, ViewContext, ViewData, ViewResponse,
        ViewTicket,
    },
};

pub enum ActiveView {
    Grid(GridController),
    Playlist(PlaylistController),
}

impl ActiveView {
    pub fn route(&self) -> Route {
        match self {
            ActiveView::Grid(_) => Route::Grid,
            ActiveView::Playlist(playlist) => Route::Playlist {
                id: playlist.id(),
                name: playlist.title().to_string(),
            },
        }
    }

    pub fn modal(&self) -> Option<&FormModal> {
        match self {
            ActiveView::Grid(grid) => grid.modal(),
            ActiveView::Playlist(playlist) => playlist.modal(),
        }
    }

    fn scope_mut(&mut self) -> &mut Scope {
        match self {
            ActiveView::Grid(grid) => grid.scope_mut(),
            ActiveView::Playlist(playlist) => playlist.scope_mut(),
        }
    }

    fn apply(&mut self, data: ViewData) {
        match self {
            ActiveView::Grid(grid) => grid.apply(data),
            ActiveView::Playlist(playlist) => playlist.apply(data),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match self {
            ActiveView::Grid(grid) => grid.handle_key(key),
            ActiveView::Playlist(playlist) => playlist.handle_key(key),
        }
    }

    fn handler(&mut self) -> &mut dyn NotificationHandler {
        match self {
            ActiveView::Grid(grid) => grid as &mut dyn NotificationHandler,
            ActiveView::Playlist(playlist) => playlist as &mut dyn NotificationHandler,
        }
    }
}

pub struct ViewManager {
    context: ViewContext,
    generation: u64,
    active: Option<ActiveView>,
}

impl ViewManager {
    /// Creates a manager with no active screen.
    pub fn new(context: ViewContext) -> Self {
        Self {
            context,
            generation: 0,
            active: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn route(&self) -> Option<Route> {
        self.active.as_ref().map(ActiveView::route)
    }

    pub fn active(&self) -> Option<&ActiveView> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveView> {
        self.active.as_mut()
    }

    /// Whether the active screen has a modal open, which takes every key.
    pub fn has_modal(&self) -> bool {
        self.active.as_ref().is_some_and(|view| view.modal().is_some())
    }

    /// Replaces the active screen.
    ///
    /// The outgoing controller's scope is cancelled first, so none of its
    /// pending work can reach the incoming one.
    pub fn navigate_to(&mut self, route: Route) {
        if let Some(mut outgoing) = self.active.take() {
            outgoing.scope_mut().cancel();
        }

        self.generation += 1;
        let ticket = ViewTicket {
            generation: self.generation,
        };
        let scope = Scope::new(ticket, &self.context);

        tracing::debug!("Navigating to {:?} (generation {})", route, self.generation);

        let view = match route {
            Route::Grid => ActiveView::Grid(GridController::new(self.context.clone(), scope)),
            Route::Playlist { id, name } => ActiveView::Playlist(PlaylistController::new(
                self.context.clone(),
                scope,
                id,
                name,
            )),
        };

        self.active = Some(view);
    }

    /// Applies a controller response, unless it belongs to an earlier
    /// navigation. Returns whether the response was current.
    pub fn apply(&mut self, response: ViewResponse) -> bool {
        if response.ticket.generation != self.generation {
            tracing::debug!(
                "Dropping stale response from generation {} (now {})",
                response.ticket.generation,
                self.generation
            );
            return false;
        }

        let Some(view) = self.active.as_mut() else {
            return false;
        };

        match response.result {
            Ok(data) => view.apply(data),
            Err(e) => tracing::error!("{:#}", e),
        }

        true
    }

    /// Routes a key to the active screen, following any navigation it asks
    /// for. Other actions are returned for the session to carry out.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let Some(view) = self.active.as_mut() else {
            return KeyOutcome::Ignored;
        };

        match view.handle_key(key) {
            KeyOutcome::Action(ViewAction::Navigate(route)) => {
                self.navigate_to(route);
                KeyOutcome::Consumed
            }
            outcome => outcome,
        }
    }

    /// Relays a host notification to the active screen.
    pub fn relay(&mut self, notification: HostNotification) -> Dispatch {
        let dispatch = match self.active.as_mut() {
            Some(view) => notification.dispatch(view.handler()),
            None => Dispatch::Ignored,
        };

        if dispatch == Dispatch::Ignored {
            tracing::debug!("{:?} not handled by the active screen", notification);
        }

        dispatch
    }
}
