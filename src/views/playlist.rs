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

//! Single playlist screen.
//!
//! Lists the songs of one playlist, or of the whole library for the virtual
//! "All Songs" playlist, and offers per-row actions through a small menu.
//! Any change to membership or song details is followed by a fresh load, so
//! the rows always show what the library holds rather than a local guess.

use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::TableState;

use crate::{
    components::{FormModal, ModalEvent, ModalSubmission},
    importer,
    library::LibraryService,
    model::{PlaylistId, Song, SongId, queue::QueueEntry},
    util::format::format_duration,
    views::{
        Dispatch, ElementId, ElementMap, KeyOutcome, NotificationHandler, Route, Scope,
        ViewAction, ViewContext, ViewData,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRow {
    pub song: Song,
    /// Length as `m:ss`.
    pub duration: String,
}

impl From<Song> for SongRow {
    fn from(song: Song) -> Self {
        let duration = format_duration(song.length);
        Self { song, duration }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    PlayNext,
    AddToQueue,
    RemoveFromPlaylist,
    OpenSettings,
}

impl RowAction {
    pub fn label(self) -> &'static str {
        match self {
            RowAction::PlayNext => "Play next",
            RowAction::AddToQueue => "Add to queue",
            RowAction::RemoveFromPlaylist => "Remove from this playlist",
            RowAction::OpenSettings => "Settings",
        }
    }
}

/// Context menu for a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMenu {
    pub song: SongId,
    pub actions: Vec<RowAction>,
    pub selected: usize,
}

pub struct PlaylistController {
    context: ViewContext,
    scope: Scope,
    id: PlaylistId,
    title: String,
    rows: Vec<SongRow>,
    elements: ElementMap<SongId>,
    table_state: TableState,
    menu: Option<RowMenu>,
    modal: Option<FormModal>,
    notice: Option<String>,
    loaded: bool,
}

async fn load_songs(library: &dyn LibraryService, id: PlaylistId) -> Result<Vec<Song>> {
    let songs = if id.is_all_songs() {
        library.get_all_songs().await
    } else {
        library.get_songs_in_playlist(id).await
    };

    songs.with_context(|| format!("Failed to load songs for playlist {}", id))
}

impl PlaylistController {
    pub(crate) fn new(context: ViewContext, scope: Scope, id: PlaylistId, name: String) -> Self {
        let mut playlist = Self {
            context,
            scope,
            id,
            title: name,
            rows: Vec::new(),
            elements: ElementMap::default(),
            table_state: TableState::default(),
            menu: None,
            modal: None,
            notice: None,
            loaded: false,
        };
        playlist.reload();
        playlist
    }

    pub fn id(&self) -> PlaylistId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &[SongRow] {
        &self.rows
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn menu(&self) -> Option<&RowMenu> {
        self.menu.as_ref()
    }

    pub fn modal(&self) -> Option<&FormModal> {
        self.modal.as_ref()
    }

    pub(crate) fn modal_mut(&mut self) -> Option<&mut FormModal> {
        self.modal.as_mut()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub(crate) fn table_state_mut(&mut self) -> &mut TableState {
        &mut self.table_state
    }

    pub(crate) fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    /// The song under the table cursor, resolved through the element map.
    pub fn selected_song(&self) -> Option<&Song> {
        let element = ElementId(self.table_state.selected()?);
        let id = self.elements.id_of(element)?;
        self.rows.iter().map(|r| &r.song).find(|s| s.id == id)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.rows.len() {
            self.table_state.select(Some(index));
        }
    }

    fn reload(&mut self) {
        let library = Arc::clone(&self.context.library);
        let id = self.id;
        self.scope.request(async move {
            Ok(ViewData::Songs(load_songs(library.as_ref(), id).await?))
        });
    }

    pub(crate) fn apply(&mut self, data: ViewData) {
        match data {
            ViewData::Songs(songs) => {
                self.elements = ElementMap::from_ids(songs.iter().map(|s| s.id));
                self.rows = songs.into_iter().map(SongRow::from).collect();

                let selected = match self.table_state.selected() {
                    _ if self.rows.is_empty() => None,
                    Some(i) => Some(i.min(self.rows.len() - 1)),
                    None => Some(0),
                };
                self.table_state.select(selected);

                self.loaded = true;
            }
            ViewData::Notice(notice) => self.notice = Some(notice),
            other => tracing::warn!("Playlist screen cannot apply {:?}", other),
        }
    }

    fn row_actions(&self) -> Vec<RowAction> {
        let mut actions = vec![RowAction::PlayNext, RowAction::AddToQueue];
        if !self.id.is_all_songs() {
            actions.push(RowAction::RemoveFromPlaylist);
        }
        actions.push(RowAction::OpenSettings);
        actions
    }

    /// Runs a row action against the selected song.
    pub fn run_row_action(&mut self, action: RowAction) -> KeyOutcome {
        match self.selected_song() {
            Some(song) => self.run_row_action_for(song.id, action),
            None => KeyOutcome::Consumed,
        }
    }

    /// Runs a row action against a specific song. Nothing happens if the song
    /// is no longer listed.
    pub fn run_row_action_for(&mut self, song_id: SongId, action: RowAction) -> KeyOutcome {
        let Some(song) = self
            .elements
            .element_of(song_id)
            .and_then(|element| self.rows.get(element.0))
            .map(|row| row.song.clone())
        else {
            return KeyOutcome::Consumed;
        };

        match action {
            RowAction::PlayNext => KeyOutcome::Action(ViewAction::PlayNext(QueueEntry::from(&song))),
            RowAction::AddToQueue => KeyOutcome::Action(ViewAction::Enqueue(QueueEntry::from(&song))),
            RowAction::RemoveFromPlaylist => {
                self.remove_song(song.id);
                KeyOutcome::Consumed
            }
            RowAction::OpenSettings => {
                self.modal = Some(FormModal::song_settings(&song));
                KeyOutcome::Consumed
            }
        }
    }

    fn remove_song(&mut self, song_id: SongId) {
        if self.id.is_all_songs() {
            tracing::warn!("Songs cannot be removed from the All Songs playlist");
            return;
        }

        let library = Arc::clone(&self.context.library);
        let id = self.id;
        self.scope.request(async move {
            library
                .remove_song_from_playlist(song_id, id)
                .await
                .with_context(|| format!("Failed to remove song {} from playlist {}", song_id, id))?;

            Ok(ViewData::Songs(load_songs(library.as_ref(), id).await?))
        });
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if let Some(modal) = self.modal.as_mut() {
            match modal.handle_key(key) {
                ModalEvent::Pending => {}
                ModalEvent::Cancelled => self.modal = None,
                ModalEvent::Submitted(submission) => {
                    self.modal = None;
                    self.submit(submission);
                }
            }
            return KeyOutcome::Consumed;
        }

        if let Some(menu) = self.menu.as_mut() {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    menu.selected = menu.selected.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    menu.selected = (menu.selected + 1).min(menu.actions.len() - 1);
                }
                KeyCode::Enter => {
                    let song_id = menu.song;
                    let action = menu.actions.get(menu.selected).copied();
                    self.menu = None;
                    if let Some(action) = action {
                        return self.run_row_action_for(song_id, action);
                    }
                }
                KeyCode::Esc => self.menu = None,
                _ => {}
            }
            return KeyOutcome::Consumed;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(i) = self.table_state.selected() {
                    self.table_state.select(Some(i.saturating_sub(1)));
                }
                KeyOutcome::Consumed
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(i) = self.table_state.selected() {
                    self.table_state.select(Some((i + 1).min(self.rows.len().saturating_sub(1))));
                }
                KeyOutcome::Consumed
            }

            KeyCode::Enter => {
                if let Some(song) = self.selected_song() {
                    self.menu = Some(RowMenu {
                        song: song.id,
                        actions: self.row_actions(),
                        selected: 0,
                    });
                }
                KeyOutcome::Consumed
            }

            KeyCode::Char('n') => self.run_row_action(RowAction::PlayNext),
            KeyCode::Char('a') => self.run_row_action(RowAction::AddToQueue),
            KeyCode::Char('x') => self.run_row_action(RowAction::RemoveFromPlaylist),
            KeyCode::Char('e') => self.run_row_action(RowAction::OpenSettings),

            KeyCode::Char('u') => {
                self.show_song_modal();
                KeyOutcome::Consumed
            }
            KeyCode::Char('t') => {
                self.show_subtitle_modal();
                KeyOutcome::Consumed
            }

            KeyCode::Esc | KeyCode::Backspace => KeyOutcome::Action(ViewAction::Navigate(Route::Grid)),

            _ => KeyOutcome::Ignored,
        }
    }

    fn submit(&mut self, submission: ModalSubmission) {
        let library = Arc::clone(&self.context.library);
        let id = self.id;

        match submission {
            ModalSubmission::AddSong { playlist, request } => {
                let songs_dir = self.context.config.songs_dir();
                self.scope.request(async move {
                    let song = importer::import_and_add(library.as_ref(), &songs_dir, request).await?;

                    if !playlist.is_all_songs() {
                        library
                            .add_song_to_playlist(song.id, playlist)
                            .await
                            .with_context(|| format!("Failed to add song to playlist {}", playlist))?;
                    }

                    Ok(ViewData::Songs(load_songs(library.as_ref(), id).await?))
                });
            }
            ModalSubmission::SongSettings {
                song,
                title,
                artist,
                album,
            } => {
                self.scope.request(async move {
                    library
                        .update_song(song, &title, &artist, &album)
                        .await
                        .with_context(|| format!("Failed to update song {}", song))?;

                    Ok(ViewData::Songs(load_songs(library.as_ref(), id).await?))
                });
            }
            ModalSubmission::AddSubtitle {
                song,
                language,
                path,
            } => {
                self.scope.request(async move {
                    let subtitle = library
                        .add_subtitles(song, &language, &path)
                        .await
                        .with_context(|| format!("Failed to add subtitles to song {}", song))?;

                    Ok(ViewData::Notice(format!(
                        "Added {} subtitles to song {}",
                        subtitle.language, subtitle.song_id
                    )))
                });
            }
            other => tracing::warn!("Playlist screen cannot handle {:?}", other),
        }
    }
}

impl NotificationHandler for PlaylistController {
    fn show_song_modal(&mut self) -> Dispatch {
        self.modal = Some(FormModal::add_song(self.id));
        Dispatch::Handled
    }

    fn show_subtitle_modal(&mut self) -> Dispatch {
        match self.selected_song().map(|s| s.id) {
            Some(song) => {
                self.modal = Some(FormModal::add_subtitle(song));
                Dispatch::Handled
            }
            None => {
                tracing::debug!("No song selected to attach subtitles to");
                Dispatch::Ignored
            }
        }
    }
}
