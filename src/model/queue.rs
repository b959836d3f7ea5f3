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

//! Playback queue management.
//!
//! This module provides state for the playback queue, an ordered list of
//! tracks with a cursor. The queue never touches the audio player directly,
//! every mutating operation instead returns a [`QueueAction`] describing what
//! the media element has to do.

use std::time::Duration;

use crate::model::{Song, SongId};

/// Calling [`PlaybackQueue::previous`] later than this into a track restarts
/// it rather than moving back.
pub const RESTART_GRACE: Duration = Duration::from_secs(5);

/// A lightweight copy of a song taken at enqueue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub path: String,
}

impl QueueEntry {
    /// The placeholder shown when there is nothing to play.
    pub fn no_song() -> Self {
        Self {
            id: SongId(-1),
            title: "No Song".to_string(),
            artist: "No Artist".to_string(),
            path: String::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == SongId(-1)
    }
}

impl From<&Song> for QueueEntry {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id,
            title: song.title.clone(),
            artist: song.artist.clone(),
            path: song.path.clone(),
        }
    }
}

/// Side effect requested from the media element after a queue operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueAction {
    /// Swap in this entry and resume playback.
    Load(QueueEntry),
    /// Seek the current track back to the start.
    Restart,
    None,
}

#[derive(Debug, Default)]
pub struct PlaybackQueue {
    entries: Vec<QueueEntry>,
    index: usize,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, entry: QueueEntry) -> QueueAction {
        self.entries.push(entry);

        if self.entries.len() == 1 {
            self.index = 0;
            self.load_current()
        } else {
            QueueAction::None
        }
    }

    /// Inserts the entry directly after the cursor.
    pub fn play_next(&mut self, entry: QueueEntry) -> QueueAction {
        if self.entries.is_empty() {
            return self.enqueue(entry);
        }

        self.entries.insert(self.index + 1, entry);
        QueueAction::None
    }

    /// Replaces the whole queue and loads the first entry.
    pub fn load_from_collection(&mut self, entries: Vec<QueueEntry>) -> QueueAction {
        self.entries = entries;
        self.index = 0;
        self.load_current()
    }

    pub fn next(&mut self) -> QueueAction {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            self.load_current()
        } else {
            QueueAction::None
        }
    }

    /// Moves back one entry, or restarts the current one when playback is
    /// already past [`RESTART_GRACE`].
    ///
    /// # Arguments
    ///
    /// * `position` - How far into the current track playback is.
    pub fn previous(&mut self, position: Duration) -> QueueAction {
        if position > RESTART_GRACE {
            QueueAction::Restart
        } else if self.index > 0 {
            self.index -= 1;
            self.load_current()
        } else {
            QueueAction::None
        }
    }

    pub fn current(&self) -> QueueEntry {
        self.entries
            .get(self.index)
            .cloned()
            .unwrap_or_else(QueueEntry::no_song)
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn load_current(&self) -> QueueAction {
        QueueAction::Load(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64) -> QueueEntry {
        QueueEntry {
            id: SongId(id),
            title: format!("Song {id}"),
            artist: "Artist".to_string(),
            path: format!("data/songs/{id}.mp3"),
        }
    }

    fn queue_of(n: i64) -> PlaybackQueue {
        let mut queue = PlaybackQueue::new();
        queue.load_from_collection((1..=n).map(entry).collect());
        queue
    }

    #[test]
    fn current_on_empty_queue_is_placeholder() {
        let queue = PlaybackQueue::new();
        let current = queue.current();

        assert_eq!(current.id, SongId(-1));
        assert_eq!(current.title, "No Song");
        assert_eq!(current.artist, "No Artist");
        assert_eq!(current.path, "");
    }

    #[test]
    fn first_enqueue_loads_entry() {
        let mut queue = PlaybackQueue::new();

        assert_eq!(queue.enqueue(entry(1)), QueueAction::Load(entry(1)));
        assert_eq!(queue.enqueue(entry(2)), QueueAction::None);
        assert_eq!(queue.current(), entry(1));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn next_at_last_index_is_noop() {
        let mut queue = queue_of(2);

        assert_eq!(queue.next(), QueueAction::Load(entry(2)));
        assert_eq!(queue.next(), QueueAction::None);
        assert_eq!(queue.index(), 1);
    }

    #[test]
    fn previous_inside_grace_window_moves_back() {
        let mut queue = queue_of(3);
        queue.next();

        assert_eq!(queue.previous(Duration::from_secs(2)), QueueAction::Load(entry(1)));
        assert_eq!(queue.index(), 0);

        assert_eq!(queue.previous(Duration::from_secs(0)), QueueAction::None);
        assert_eq!(queue.index(), 0);
    }

    #[test]
    fn previous_after_grace_window_restarts() {
        let mut queue = queue_of(3);
        queue.next();

        assert_eq!(queue.previous(Duration::from_secs(12)), QueueAction::Restart);
        assert_eq!(queue.index(), 1);
    }

    #[test]
    fn previous_exactly_at_grace_boundary_moves_back() {
        let mut queue = queue_of(2);
        queue.next();

        assert_eq!(queue.previous(RESTART_GRACE), QueueAction::Load(entry(1)));
    }

    #[test]
    fn load_from_collection_resets_cursor() {
        let mut queue = queue_of(3);
        queue.next();
        queue.next();

        let action = queue.load_from_collection(vec![entry(7), entry(8)]);

        assert_eq!(action, QueueAction::Load(entry(7)));
        assert_eq!(queue.index(), 0);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn load_from_empty_collection_loads_placeholder() {
        let mut queue = queue_of(2);

        assert_eq!(queue.load_from_collection(vec![]), QueueAction::Load(QueueEntry::no_song()));
    }

    #[test]
    fn play_next_inserts_after_cursor() {
        let mut queue = queue_of(3);
        queue.next();

        assert_eq!(queue.play_next(entry(9)), QueueAction::None);

        let ids: Vec<i64> = queue.entries().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2, 9, 3]);
        assert_eq!(queue.next(), QueueAction::Load(entry(9)));
    }

    #[test]
    fn play_next_on_empty_queue_loads() {
        let mut queue = PlaybackQueue::new();

        assert_eq!(queue.play_next(entry(4)), QueueAction::Load(entry(4)));
    }
}
