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

//! Host notifications.
//!
//! Notifications arrive from the command line (the host bridge) and are
//! relayed to whichever screen is active. Each controller declares the
//! notifications it handles by overriding the matching
//! [`NotificationHandler`] method, everything else falls through to the
//! default and is ignored.

use crate::model::PlaylistId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostNotification {
    ShowPlaylistModal,
    ShowSongModal,
    ShowSubtitleModal,
    RemovePlaylist(PlaylistId),
    /// Replace the playback queue with a playlist's songs. Handled by the
    /// session, never by a screen.
    AddPlaylistToQueue(PlaylistId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    Ignored,
}

pub trait NotificationHandler {
    fn show_playlist_modal(&mut self) -> Dispatch {
        Dispatch::Ignored
    }

    fn show_song_modal(&mut self) -> Dispatch {
        Dispatch::Ignored
    }

    fn show_subtitle_modal(&mut self) -> Dispatch {
        Dispatch::Ignored
    }

    fn remove_playlist(&mut self, _id: PlaylistId) -> Dispatch {
        Dispatch::Ignored
    }
}

impl HostNotification {
    /// Delivers the notification to `handler`.
    pub fn dispatch(self, handler: &mut dyn NotificationHandler) -> Dispatch {
        match self {
            HostNotification::ShowPlaylistModal => handler.show_playlist_modal(),
            HostNotification::ShowSongModal => handler.show_song_modal(),
            HostNotification::ShowSubtitleModal => handler.show_subtitle_modal(),
            HostNotification::RemovePlaylist(id) => handler.remove_playlist(id),
            HostNotification::AddPlaylistToQueue(_) => Dispatch::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct OnlyRemovals {
        removed: Vec<PlaylistId>,
    }

    impl NotificationHandler for OnlyRemovals {
        fn remove_playlist(&mut self, id: PlaylistId) -> Dispatch {
            self.removed.push(id);
            Dispatch::Handled
        }
    }

    #[test]
    fn unimplemented_notifications_are_ignored() {
        let mut handler = OnlyRemovals::default();

        assert_eq!(HostNotification::ShowSongModal.dispatch(&mut handler), Dispatch::Ignored);
        assert_eq!(
            HostNotification::RemovePlaylist(PlaylistId(4)).dispatch(&mut handler),
            Dispatch::Handled
        );
        assert_eq!(handler.removed, vec![PlaylistId(4)]);
    }

    #[test]
    fn queue_requests_never_reach_screens() {
        let mut handler = OnlyRemovals::default();

        assert_eq!(
            HostNotification::AddPlaylistToQueue(PlaylistId(1)).dispatch(&mut handler),
            Dispatch::Ignored
        );
    }
}
