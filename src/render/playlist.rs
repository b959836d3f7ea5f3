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

//! UI rendering logic for the playlist song table.
//!
//! Handles column layout, selection highlighting and the row context menu.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Padding, Paragraph, Row, Table},
};

use crate::{
    render::centered,
    theme::Theme,
    views::{PlaylistController, RowMenu},
};

const MENU_WIDTH: u16 = 32;

pub(crate) fn draw_playlist(f: &mut Frame, area: Rect, playlist: &mut PlaylistController, theme: &Theme) {
    let block = Block::default()
        .title(format!(" {} ", playlist.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    if let Some(notice) = playlist.notice() {
        f.render_widget(
            Paragraph::new(notice).style(Style::default().fg(theme.accent_colour)),
            chunks[1],
        );
    }

    if !playlist.is_loaded() {
        f.render_widget(
            Paragraph::new("Loading...").style(Style::default().fg(theme.table_time_fg)),
            chunks[0],
        );
        return;
    }

    let rows: Vec<Row> = playlist
        .rows()
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(Line::from(row.duration.clone()).style(Style::default().fg(theme.table_time_fg)).alignment(Alignment::Right)),
                Cell::from(""),
                Cell::from(Line::from(row.song.artist.clone()).style(Style::default().fg(theme.table_artist_fg))),
                Cell::from(Line::from(row.song.album.clone()).style(Style::default().fg(theme.table_album_fg))),
                Cell::from(Line::from(row.song.title.clone()).style(Style::default().fg(theme.table_title_fg))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(50),
        ],
    )
    .header(
        Row::new(vec![
            Cell::from(Line::from("Time").alignment(Alignment::Right)),
            Cell::from(""),
            Cell::from("Artist"),
            Cell::from("Album"),
            Cell::from("Title"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD).fg(theme.accent_colour))
        .bottom_margin(1),
    )
    .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
    .block(Block::default());

    f.render_stateful_widget(table, chunks[0], playlist.table_state_mut());

    if let Some(menu) = playlist.menu() {
        draw_menu(f, chunks[0], menu, theme);
    }
}

fn draw_menu(f: &mut Frame, area: Rect, menu: &RowMenu, theme: &Theme) {
    let popup = centered(area, MENU_WIDTH, menu.actions.len() as u16 + 2);

    f.render_widget(Clear, popup);

    let items: Vec<ListItem> = menu
        .actions
        .iter()
        .map(|action| ListItem::new(action.label()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent_colour))
                .style(Style::default().bg(theme.background_colour)),
        )
        .highlight_style(Style::default().fg(Color::Black).bg(theme.accent_colour))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(menu.selected));
    f.render_stateful_widget(list, popup, &mut state);
}
