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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called on every
//! terminal tick or state change to provide a reactive user interface.

mod commander;
mod grid;
mod icons;
mod player;
mod playlist;
mod queue;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
};

use crate::{
    app::App,
    render::{
        commander::draw_commander, grid::draw_grid, player::draw_player, playlist::draw_playlist,
        queue::draw_queue,
    },
    theme::Theme,
    views::ActiveView,
};

pub trait Render {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme);
}

/// Renders the user interface to the terminal frame.
///
/// The screen is split into the active view, an optional queue panel to the
/// right of it, the player bar and the command line. Any open modal is drawn
/// last so it sits on top of the active view.
pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Outer layout: main, player, footer
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(area);

    let queue_width = if app.session.is_expanded() { 40 } else { 0 };

    // Main layout: content, queue
    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(queue_width)])
        .split(outer[0]);

    let theme = app.theme;

    match app.views.active_mut() {
        Some(ActiveView::Grid(grid)) => {
            draw_grid(f, main[0], grid, &theme);
            if let Some(modal) = grid.modal_mut() {
                modal.draw(f, main[0], &theme);
            }
        }
        Some(ActiveView::Playlist(playlist)) => {
            draw_playlist(f, main[0], playlist, &theme);
            if let Some(modal) = playlist.modal_mut() {
                modal.draw(f, main[0], &theme);
            }
        }
        None => {}
    }

    if app.session.is_expanded() {
        draw_queue(f, main[1], &app.session, &theme);
    }

    draw_player(f, outer[1], app);

    draw_commander(f, outer[2], app);
}

/// Returns a `width` by `height` area centred within `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
