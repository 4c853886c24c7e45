use serde::Deserialize;

/// Stable identity of a song within one loaded [`Library`](crate::Library).
///
/// Assigned from the song's position at load time. Titles and artists are
/// not unique (covers of the same song by the same artist do occur), so the
/// id — not the `(title, artist)` pair — is what row-level state such as the
/// copy flash is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SongId(pub usize);

/// One song-request record.
///
/// Immutable once loaded. `tags` defaults to empty when the data file omits
/// it, so a sparse record degrades to "untagged" instead of failing the
/// whole load.
#[derive(Debug, Clone, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional audio source for the player bar.
    #[serde(default)]
    pub url: Option<String>,
}

impl Song {
    /// Whether this song carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tags_deserialize_empty() {
        let song: Song =
            serde_json::from_str(r#"{"title":"大鱼","artist":"Vsinger","date":"2024-03-01"}"#)
                .unwrap();
        assert!(song.tags.is_empty());
        assert!(song.url.is_none());
    }

    #[test]
    fn has_tag_matches_exactly() {
        let song: Song = serde_json::from_str(
            r#"{"title":"大鱼","artist":"Vsinger","date":"2024-03-01","tags":["中文","古风"]}"#,
        )
        .unwrap();
        assert!(song.has_tag("中文"));
        assert!(song.has_tag("古风"));
        assert!(!song.has_tag("日文"));
    }
}
