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

//! Render the playlist grid.
//!
//! Tiles are laid out left to right in as many columns as fit the available
//! width. The grid controller is told the column count so that vertical
//! movement lands on the tile drawn above or below.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::{
    theme::Theme,
    util::format::format_duration,
    views::{GridController, PlaylistTile},
};

const TILE_WIDTH: u16 = 28;
const TILE_HEIGHT: u16 = 6;

pub(crate) fn draw_grid(f: &mut Frame, area: Rect, grid: &mut GridController, theme: &Theme) {
    let block = Block::default()
        .title(" Playlists ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    if let Some(notice) = grid.notice() {
        f.render_widget(
            Paragraph::new(notice).style(Style::default().fg(theme.error_colour)),
            chunks[1],
        );
    }

    if !grid.is_loaded() {
        f.render_widget(
            Paragraph::new("Loading...").style(Style::default().fg(theme.tile_detail_fg)),
            chunks[0],
        );
        return;
    }

    let columns = (chunks[0].width / TILE_WIDTH).max(1) as usize;
    grid.set_columns(columns);

    let visible_rows = (chunks[0].height / TILE_HEIGHT).max(1) as usize;
    let selected_row = grid.selected_index() / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    for (index, tile) in grid.tiles().iter().enumerate() {
        let row = index / columns;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }

        let tile_area = Rect {
            x: chunks[0].x + (index % columns) as u16 * TILE_WIDTH,
            y: chunks[0].y + (row - first_row) as u16 * TILE_HEIGHT,
            width: TILE_WIDTH.min(chunks[0].width),
            height: TILE_HEIGHT,
        }
        .intersection(chunks[0]);

        draw_tile(f, tile_area, tile, index == grid.selected_index(), theme);
    }
}

fn draw_tile(f: &mut Frame, area: Rect, tile: &PlaylistTile, selected: bool, theme: &Theme) {
    let border_colour = if selected {
        theme.accent_colour
    } else {
        theme.border_colour
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_colour))
        .padding(Padding::horizontal(1));

    let thumbnail = tile
        .thumbnail
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let songs = match tile.song_count {
        1 => "1 song".to_string(),
        n => format!("{n} songs"),
    };

    let lines = vec![
        Line::styled(
            tile.title.as_str(),
            Style::default()
                .fg(if selected { theme.accent_colour } else { theme.tile_fg })
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("{} | {}", songs, format_duration(tile.length)),
            Style::default().fg(theme.tile_detail_fg),
        ),
        Line::styled(thumbnail, Style::default().fg(theme.border_colour)),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}
