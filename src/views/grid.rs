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

//! Playlist grid screen.
//!
//! Shows one tile per playlist, the virtual "All Songs" playlist first.
//! Selecting a tile opens that playlist, and the screen also hosts the
//! create-playlist and add-song modals.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};

use crate::{
    components::{FormModal, ModalEvent, ModalSubmission},
    importer,
    library::LibraryService,
    model::{Playlist, PlaylistId},
    views::{
        Dispatch, ElementId, ElementMap, KeyOutcome, NotificationHandler, Route, Scope,
        ViewAction, ViewContext, ViewData,
    },
};

const NO_IMAGE: &str = "no_image.svg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistTile {
    pub id: PlaylistId,
    pub title: String,
    pub song_count: i64,
    pub length: i64,
    pub thumbnail: PathBuf,
}

pub struct GridController {
    context: ViewContext,
    scope: Scope,
    tiles: Vec<PlaylistTile>,
    elements: ElementMap<PlaylistId>,
    selected: usize,
    columns: usize,
    modal: Option<FormModal>,
    notice: Option<String>,
    loaded: bool,
}

/// The "All Songs" playlist followed by every stored playlist.
async fn load_playlists(library: &dyn LibraryService) -> Result<Vec<Playlist>> {
    let all_songs = library
        .get_playlist(PlaylistId::ALL_SONGS)
        .await
        .context("Failed to load the All Songs playlist")?;
    let playlists = library
        .get_all_playlists()
        .await
        .context("Failed to load playlists")?;

    let mut tiles = Vec::with_capacity(playlists.len() + 1);
    tiles.push(all_songs);
    tiles.extend(playlists);
    Ok(tiles)
}

impl GridController {
    pub(crate) fn new(context: ViewContext, scope: Scope) -> Self {
        let mut grid = Self {
            context,
            scope,
            tiles: Vec::new(),
            elements: ElementMap::default(),
            selected: 0,
            columns: 1,
            modal: None,
            notice: None,
            loaded: false,
        };
        grid.reload();
        grid
    }

    pub fn tiles(&self) -> &[PlaylistTile] {
        &self.tiles
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
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

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The tile under the selection, resolved through the element map.
    pub fn selected(&self) -> Option<&PlaylistTile> {
        let id = self.elements.id_of(ElementId(self.selected))?;
        self.tiles.iter().find(|t| t.id == id)
    }

    pub(crate) fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    /// Number of tiles per row, known only once the grid has been laid out.
    pub(crate) fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    fn reload(&mut self) {
        let library = Arc::clone(&self.context.library);
        self.scope.request(async move {
            Ok(ViewData::Playlists(load_playlists(library.as_ref()).await?))
        });
    }

    fn tile(&self, playlist: Playlist) -> PlaylistTile {
        let thumbnails = self.context.config.thumbnails_dir();
        let custom = thumbnails.join(format!("{}.png", playlist.id));
        let thumbnail = if custom.is_file() {
            custom
        } else {
            thumbnails.join(NO_IMAGE)
        };

        PlaylistTile {
            id: playlist.id,
            title: playlist.title,
            song_count: playlist.song_count,
            length: playlist.length,
            thumbnail,
        }
    }

    pub(crate) fn apply(&mut self, data: ViewData) {
        match data {
            ViewData::Playlists(playlists) => {
                self.tiles = playlists.into_iter().map(|p| self.tile(p)).collect();
                self.elements = ElementMap::from_ids(self.tiles.iter().map(|t| t.id));
                self.selected = self.selected.min(self.tiles.len().saturating_sub(1));
                self.loaded = true;
            }
            ViewData::PlaylistCreated(playlist) => {
                tracing::info!("Created playlist {} \"{}\"", playlist.id, playlist.title);
                let tile = self.tile(playlist);
                self.elements.push(tile.id);
                self.tiles.push(tile);
            }
            ViewData::Notice(notice) => self.notice = Some(notice),
            ViewData::Songs(_) => tracing::warn!("Grid received a song list, ignoring"),
        }
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

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_selection(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-(self.columns as isize)),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(self.columns as isize),

            KeyCode::Enter => match self.selected() {
                Some(tile) => KeyOutcome::Action(ViewAction::Navigate(Route::Playlist {
                    id: tile.id,
                    name: tile.title.clone(),
                })),
                None => KeyOutcome::Consumed,
            },

            KeyCode::Char('n') => {
                self.show_playlist_modal();
                KeyOutcome::Consumed
            }
            KeyCode::Char('a') => {
                self.show_song_modal();
                KeyOutcome::Consumed
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected().map(|t| t.id) {
                    self.remove_playlist(id);
                }
                KeyOutcome::Consumed
            }
            KeyCode::Char('p') => match self.selected() {
                Some(tile) => KeyOutcome::Action(ViewAction::QueuePlaylist(tile.id)),
                None => KeyOutcome::Consumed,
            },

            _ => KeyOutcome::Ignored,
        }
    }

    fn move_selection(&mut self, delta: isize) -> KeyOutcome {
        if !self.tiles.is_empty() {
            let last = self.tiles.len() as isize - 1;
            self.selected = (self.selected as isize + delta).clamp(0, last) as usize;
        }
        KeyOutcome::Consumed
    }

    fn submit(&mut self, submission: ModalSubmission) {
        let library = Arc::clone(&self.context.library);

        match submission {
            ModalSubmission::CreatePlaylist { name } => {
                self.scope.request(async move {
                    let playlist = library
                        .create_playlist(&name)
                        .await
                        .with_context(|| format!("Failed to create playlist \"{}\"", name))?;
                    Ok(ViewData::PlaylistCreated(playlist))
                });
            }
            ModalSubmission::AddSong { request, .. } => {
                let songs_dir = self.context.config.songs_dir();
                self.scope.request(async move {
                    importer::import_and_add(library.as_ref(), &songs_dir, request).await?;

                    Ok(ViewData::Playlists(load_playlists(library.as_ref()).await?))
                });
            }
            other => tracing::warn!("Grid cannot handle {:?}", other),
        }
    }
}

impl NotificationHandler for GridController {
    fn show_playlist_modal(&mut self) -> Dispatch {
        self.modal = Some(FormModal::create_playlist());
        Dispatch::Handled
    }

    fn show_song_modal(&mut self) -> Dispatch {
        self.modal = Some(FormModal::add_song(PlaylistId::ALL_SONGS));
        Dispatch::Handled
    }

    fn remove_playlist(&mut self, id: PlaylistId) -> Dispatch {
        if id.is_all_songs() {
            tracing::warn!("Refusing to remove the All Songs playlist");
            return Dispatch::Handled;
        }

        let library = Arc::clone(&self.context.library);
        self.scope.request(async move {
            library
                .delete_playlist(id)
                .await
                .with_context(|| format!("Failed to remove playlist {}", id))?;
            tracing::info!("Removed playlist {}", id);

            Ok(ViewData::Playlists(load_playlists(library.as_ref()).await?))
        });

        Dispatch::Handled
    }
}
