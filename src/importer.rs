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

//! Song upload.
//!
//! Copies an audio file into the library's song directory and reads what it
//! can from the file itself, producing a [`NewSong`] ready to be added to the
//! library. Tag values only fill in fields the user left blank.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use lofty::prelude::*;

use crate::{
    library::LibraryService,
    model::{NewSong, Song},
};

/// A user request to upload a song, with optional metadata overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRequest {
    pub source: PathBuf,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl ImportRequest {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
struct FileTags {
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    length: i64,
}

/// Copies the source file into `songs_dir` and builds the song to add.
///
/// If the file's tags cannot be read the song is still imported, with a length of
/// zero and only the metadata that was supplied.
///
/// # Errors
///
/// Returns an error if the source is not a readable file or the copy fails.
pub async fn import_song(songs_dir: &Path, request: ImportRequest) -> Result<NewSong> {
    let file_name = match request.source.file_name() {
        Some(name) => name.to_os_string(),
        None => bail!("Not a file: {}", request.source.display()),
    };

    let metadata = tokio::fs::metadata(&request.source)
        .await
        .with_context(|| format!("Cannot read {}", request.source.display()))?;
    if !metadata.is_file() {
        bail!("Not a file: {}", request.source.display());
    }

    tokio::fs::create_dir_all(songs_dir)
        .await
        .with_context(|| format!("Failed to create {}", songs_dir.display()))?;

    let destination = free_destination(songs_dir, Path::new(&file_name)).await;
    tokio::fs::copy(&request.source, &destination)
        .await
        .with_context(|| format!("Failed to copy {} into the library", request.source.display()))?;

    tracing::info!("Imported {} as {}", request.source.display(), destination.display());

    let tag_path = destination.clone();
    let tags = match tokio::task::spawn_blocking(move || read_tags(&tag_path)).await? {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!("Could not read tags from {}: {}", destination.display(), e);
            FileTags::default()
        }
    };

    let stem = destination
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let title = pick(request.title, tags.title).unwrap_or(stem);
    let artist = pick(request.artist, tags.artist).unwrap_or_default();
    let album = pick(request.album, tags.album).unwrap_or_default();

    Ok(NewSong::new(
        title,
        artist,
        album,
        tags.length,
        destination.to_string_lossy(),
    ))
}

/// Imports the file and adds the song to the library. The copied file is
/// removed again if the library rejects the song.
pub async fn import_and_add(library: &dyn LibraryService, songs_dir: &Path, request: ImportRequest) -> Result<Song> {
    let song = import_song(songs_dir, request).await?;
    let path = PathBuf::from(&song.path);

    match library.add_song(song).await {
        Ok(song) => {
            tracing::info!("Added song {} \"{}\"", song.id, song.title);
            Ok(song)
        }
        Err(e) => {
            if let Err(remove_error) = tokio::fs::remove_file(&path).await {
                tracing::warn!("Failed to remove {}: {}", path.display(), remove_error);
            }
            Err(anyhow::Error::new(e).context("Failed to add song"))
        }
    }
}

/// A user-supplied value wins unless it is blank.
fn pick(supplied: Option<String>, tagged: Option<String>) -> Option<String> {
    supplied
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or(tagged)
}

/// Finds a path in `dir` for `file_name` that does not overwrite an earlier
/// upload, appending `-1`, `-2`, ... to the stem as needed.
async fn free_destination(dir: &Path, file_name: &Path) -> PathBuf {
    let candidate = dir.join(file_name);
    if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
        return candidate;
    }

    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = file_name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 1;
    loop {
        let candidate = dir.join(format!("{stem}-{n}{extension}"));
        if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return candidate;
        }
        n += 1;
    }
}

fn read_tags(path: &Path) -> Result<FileTags> {
    let tagged_file = lofty::read_from_path(path)?;

    let length = i64::try_from(tagged_file.properties().duration().as_secs()).unwrap_or(0);

    let tags = match tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        Some(tag) => FileTags {
            title: tag.title().map(|s| s.to_string()),
            artist: tag.artist().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            length,
        },
        None => FileTags {
            length,
            ..FileTags::default()
        },
    };

    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::MemoryLibrary;

    #[tokio::test]
    async fn unreadable_audio_still_imports_with_zero_length() {
        let source_dir = tempfile::tempdir().unwrap();
        let library_dir = tempfile::tempdir().unwrap();

        let source = source_dir.path().join("demo.mp3");
        std::fs::write(&source, b"not really audio").unwrap();

        let mut request = ImportRequest::new(&source);
        request.artist = Some("Someone".to_string());

        let song = import_song(library_dir.path(), request).await.unwrap();

        assert_eq!(song.title, "demo");
        assert_eq!(song.artist, "Someone");
        assert_eq!(song.length, 0);
        assert!(Path::new(&song.path).starts_with(library_dir.path()));
        assert!(Path::new(&song.path).exists());
    }

    #[tokio::test]
    async fn repeated_upload_does_not_overwrite() {
        let source_dir = tempfile::tempdir().unwrap();
        let library_dir = tempfile::tempdir().unwrap();

        let source = source_dir.path().join("track.ogg");
        std::fs::write(&source, b"x").unwrap();

        let first = import_song(library_dir.path(), ImportRequest::new(&source)).await.unwrap();
        let second = import_song(library_dir.path(), ImportRequest::new(&source)).await.unwrap();

        assert_ne!(first.path, second.path);
        assert!(second.path.ends_with("track-1.ogg"));
    }

    #[tokio::test]
    async fn missing_source_is_an_error() {
        let library_dir = tempfile::tempdir().unwrap();

        let result = import_song(library_dir.path(), ImportRequest::new("/no/such/file.mp3")).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn rejected_song_leaves_no_copy_behind() {
        let source_dir = tempfile::tempdir().unwrap();
        let library_dir = tempfile::tempdir().unwrap();

        let source = source_dir.path().join("orphan.mp3");
        std::fs::write(&source, b"x").unwrap();

        let library = MemoryLibrary::new();
        let result = import_and_add(&library, library_dir.path(), ImportRequest::new(&source)).await;

        assert!(result.is_err());
        assert!(!library_dir.path().join("orphan.mp3").exists());
    }

    #[tokio::test]
    async fn accepted_song_keeps_its_copy() {
        let source_dir = tempfile::tempdir().unwrap();
        let library_dir = tempfile::tempdir().unwrap();

        let source = source_dir.path().join("kept.mp3");
        std::fs::write(&source, b"x").unwrap();

        let library = MemoryLibrary::new();
        library.initialize().await;
        let song = import_and_add(&library, library_dir.path(), ImportRequest::new(&source)).await.unwrap();

        assert_eq!(song.title, "kept");
        assert!(Path::new(&song.path).exists());
        assert_eq!(library.get_all_songs().await.unwrap().len(), 1);
    }

    #[test]
    fn blank_override_falls_back_to_tag() {
        assert_eq!(pick(Some("  ".to_string()), Some("Tag".to_string())), Some("Tag".to_string()));
        assert_eq!(pick(Some(" Mine ".to_string()), Some("Tag".to_string())), Some("Mine".to_string()));
    }
}
