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

//! Render the command-line interface.
//!
//! This module renders the command-line. While inactive the line shows the
//! result of the last command, or the most recent error.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Paragraph,
};

use crate::app::App;

pub(crate) fn draw_commander(f: &mut Frame, area: Rect, app: &App) {
    let commander = &app.commander;

    let container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1)])
        .horizontal_margin(1)
        .split(area);

    let (text, colour) = if commander.active() {
        (commander.input.value(), app.theme.commander_colour)
    } else if let Some(message) = commander.message() {
        (message, app.theme.commander_colour)
    } else if let Some(status) = &app.status {
        (status.as_str(), app.theme.error_colour)
    } else {
        ("", app.theme.commander_colour)
    };

    f.render_widget(
        Paragraph::new(text).style(
            Style::default()
                .fg(colour)
                .bg(app.theme.gauge_track_colour),
        ),
        container[0],
    );

    if commander.active() {
        let cursor_x = container[0].x + commander.input.cursor() as u16;
        let cursor_y = container[0].y;
        f.set_cursor_position((cursor_x, cursor_y));
    }
}
