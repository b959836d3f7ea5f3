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

//! Visual styling and color configuration for the TUI.
//!
//! This module defines the application's color palette and provides utilities
//! for converting colors between Ratatui's internal representation and external
//! formats (such as hexadecimal strings) used for terminal emulator styling.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background_colour: Color,
    pub accent_colour: Color,
    pub border_colour: Color,
    pub gauge_track_colour: Color,
    pub commander_colour: Color,
    pub error_colour: Color,

    pub tile_fg: Color,
    pub tile_detail_fg: Color,

    pub table_time_fg: Color,
    pub table_artist_fg: Color,
    pub table_album_fg: Color,
    pub table_title_fg: Color,
}

impl Default for Theme {
    // Returns the standard application theme.
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    // Constructs the default theme.
    pub const fn default_theme() -> Self {
        Self {
            background_colour: Color::Rgb(40, 20, 50),
            accent_colour: Color::Rgb(250, 189, 47),
            border_colour: Color::Rgb(102, 102, 102),
            gauge_track_colour: Color::Rgb(50, 30, 60),
            commander_colour: Color::Rgb(255, 255, 255),
            error_colour: Color::Rgb(239, 83, 80),

            tile_fg: Color::Rgb(255, 255, 255),
            tile_detail_fg: Color::Rgb(162, 161, 166),

            table_time_fg: Color::Rgb(162, 161, 166),
            table_artist_fg: Color::Rgb(255, 215, 0),
            table_album_fg: Color::Rgb(179, 157, 219),
            table_title_fg: Color::Rgb(255, 255, 255),
        }
    }

    /// Converts a [`ratatui::style::Color`] into a CSS-style hexadecimal
    /// string, used to set the terminal emulator's background colour via
    /// escape sequences.
    ///
    /// Returns `None` for anything other than a [`Color::Rgb`] colour.
    pub fn to_hex(colour: Color) -> Option<String> {
        match colour {
            Color::Rgb(r, g, b) => Some(format!("#{:02x}{:02x}{:02x}", r, g, b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex_formats_rgb() {
        assert_eq!(Theme::to_hex(Color::Rgb(40, 20, 50)).as_deref(), Some("#281432"));
    }

    #[test]
    fn test_to_hex_rejects_named_colours() {
        assert_eq!(Theme::to_hex(Color::Blue), None);
    }
}
