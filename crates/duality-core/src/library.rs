//! The loaded song collection.
//!
//! Loaded once, never mutated; every view the UI shows is derived. Search
//! keys (lower-cased text plus pinyin) are built here, at load time, so
//! filtering stays cheap enough to rerun on every keystroke.

use std::path::Path;

use crate::filter::{self, FilterState, SearchKey};
use crate::song::{Song, SongId};
use crate::tags;

/// Errors from loading the song data file.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("failed to read song data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed song data: {0}")]
    Json(#[from] serde_json::Error),
}

/// The immutable song collection plus one [`SearchKey`] per song.
pub struct Library {
    songs: Vec<Song>,
    keys: Vec<SearchKey>,
}

impl Library {
    /// Build a library from already-parsed songs, assigning each its
    /// [`SongId`] (position at load time) and computing its search key.
    pub fn new(songs: Vec<Song>) -> Self {
        let keys = songs.iter().map(SearchKey::of).collect();
        Self { songs, keys }
    }

    /// Parse a JSON array of songs.
    pub fn from_json(json: &str) -> Result<Self, LibraryError> {
        let songs: Vec<Song> = serde_json::from_str(json)?;
        Ok(Self::new(songs))
    }

    /// Read and parse a song data file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn get(&self, id: SongId) -> Option<&Song> {
        self.songs.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Apply the filter, returning matching ids in load order.
    pub fn filter(&self, state: &FilterState) -> Vec<SongId> {
        self.songs
            .iter()
            .zip(&self.keys)
            .enumerate()
            .filter(|&(_, (song, key))| filter::matches(song, key, state))
            .map(|(i, _)| SongId(i))
            .collect()
    }

    /// The ordered tag vocabulary for the chip row.
    pub fn tag_vocabulary(&self) -> Vec<String> {
        tags::vocabulary(&self.songs)
    }
}
