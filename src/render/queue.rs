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

//! Render the player queue interface.
//!
//! This module renders the entries of the playback queue, marking the one
//! that is currently playing.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::{session::Session, theme::Theme};

/// Renders the player queue widget including items queued to be played.
pub(crate) fn draw_queue(f: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let queue = session.queue();

    let items: Vec<ListItem> = queue
        .entries()
        .iter()
        .map(|entry| ListItem::new(format!("{} - {}", entry.title, entry.artist)))
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(format!(" Queue ({}) ", queue.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_colour))
        )
        .highlight_style(Style::default().fg(Color::Black).bg(theme.accent_colour))
        .highlight_symbol(">> ");

    let selected = (!queue.is_empty()).then(|| queue.index());
    let mut state = ListState::default().with_selected(selected);

    f.render_stateful_widget(list, area, &mut state);
}
