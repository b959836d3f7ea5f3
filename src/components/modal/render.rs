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

//! UI rendering logic for form modals.
//!
//! The modal is drawn centred over whatever is underneath it, one bordered
//! input per field, with the cursor placed in the focused input.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Padding, Paragraph},
};

use crate::{
    components::FormModal,
    render::{Render, centered},
    theme::Theme,
};

const MODAL_WIDTH: u16 = 60;

impl Render for FormModal {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        // Three rows per field, plus the error line and the hint line
        let height = self.fields.len() as u16 * 3 + 4;
        let popup = centered(area, MODAL_WIDTH, height);

        f.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent_colour))
            .style(Style::default().bg(theme.background_colour))
            .padding(Padding::horizontal(1));

        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let mut constraints: Vec<Constraint> =
            self.fields.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let border_colour = if focused {
                theme.accent_colour
            } else {
                theme.border_colour
            };

            let label = if field.required {
                format!(" {} * ", field.label)
            } else {
                format!(" {} ", field.label)
            };

            let input_block = Block::default()
                .title(label)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_colour));

            let input_area = input_block.inner(rows[i]);
            let scroll = field.input.visual_scroll(input_area.width.saturating_sub(1) as usize);

            f.render_widget(
                Paragraph::new(field.input.value())
                    .scroll((0, scroll as u16))
                    .block(input_block),
                rows[i],
            );

            if focused {
                let cursor = field.input.visual_cursor().saturating_sub(scroll) as u16;
                f.set_cursor_position((input_area.x + cursor, input_area.y));
            }
        }

        let error_row = rows[self.fields.len()];
        if let Some(error) = &self.error {
            f.render_widget(
                Paragraph::new(Line::from(error.as_str())).style(Style::default().fg(theme.error_colour)),
                error_row,
            );
        }

        f.render_widget(
            Paragraph::new("Enter save | Tab next field | Esc cancel")
                .style(Style::default().fg(theme.border_colour)),
            rows[self.fields.len() + 1],
        );
    }
}
