//! Query/tag filtering over the song collection.
//!
//! Filtering never reorders: the result is always a subsequence of the
//! library in load order, with no relevance ranking. A song passes when it
//! satisfies the tag constraint *and* the text constraint.

use crate::song::Song;
use crate::translit::latinize;

/// The controller-owned filter inputs: free-text query plus at most one
/// selected tag chip. `None` means no tag constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub selected_tag: Option<String>,
}

impl FilterState {
    /// Replace the query text.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Apply chip-toggle semantics: selecting the active tag clears it,
    /// `None` (the "全部" chip) clears unconditionally, and any other tag
    /// replaces the current selection.
    pub fn toggle_tag(&mut self, tag: Option<&str>) {
        self.selected_tag = match tag {
            None => None,
            Some(t) if self.selected_tag.as_deref() == Some(t) => None,
            Some(t) => Some(t.to_string()),
        };
    }

    /// Whether any constraint is active at all.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.selected_tag.is_none()
    }
}

/// Precomputed match candidates for one song.
///
/// Transliteration runs once at load time, not per keystroke; a query then
/// only lower-cases the needle and scans these four cached strings.
#[derive(Debug, Clone)]
pub struct SearchKey {
    title: String,
    artist: String,
    title_pinyin: String,
    artist_pinyin: String,
}

impl SearchKey {
    pub fn of(song: &Song) -> Self {
        Self {
            title: song.title.to_lowercase(),
            artist: song.artist.to_lowercase(),
            title_pinyin: latinize(&song.title),
            artist_pinyin: latinize(&song.artist),
        }
    }

    /// Substring containment against any of the four candidates.
    /// `needle` must already be lower-cased.
    fn contains(&self, needle: &str) -> bool {
        self.title.contains(needle)
            || self.artist.contains(needle)
            || self.title_pinyin.contains(needle)
            || self.artist_pinyin.contains(needle)
    }
}

/// Whether one song passes the filter. Exposed for the library's
/// [`filter`](crate::Library::filter); the song and its key must belong
/// together.
pub(crate) fn matches(song: &Song, key: &SearchKey, state: &FilterState) -> bool {
    if let Some(tag) = state.selected_tag.as_deref() {
        if !song.has_tag(tag) {
            return false;
        }
    }
    if state.query.is_empty() {
        return true;
    }
    key.contains(&state.query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, artist: &str, tags: &[&str]) -> Song {
        Song {
            title: title.to_string(),
            artist: artist.to_string(),
            date: "2024-01-01".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            url: None,
        }
    }

    fn passes(s: &Song, state: &FilterState) -> bool {
        matches(s, &SearchKey::of(s), state)
    }

    #[test]
    fn empty_state_accepts_everything() {
        let s = song("大鱼", "Vsinger", &["中文"]);
        assert!(passes(&s, &FilterState::default()));
    }

    #[test]
    fn direct_title_and_artist_match() {
        let s = song("大鱼", "Vsinger", &["中文"]);
        let mut state = FilterState::default();
        state.set_query("大鱼");
        assert!(passes(&s, &state));
        state.set_query("vsinger");
        assert!(passes(&s, &state));
        state.set_query("VSINGER");
        assert!(passes(&s, &state));
    }

    #[test]
    fn pinyin_match() {
        let s = song("大鱼", "Vsinger", &["中文"]);
        let mut state = FilterState::default();
        state.set_query("dayu");
        assert!(passes(&s, &state));
        state.set_query("day");
        assert!(passes(&s, &state));
        state.set_query("yule");
        assert!(!passes(&s, &state));
    }

    #[test]
    fn tag_constraint_rejects() {
        let s = song("Bad apple", "Vsinger", &["日文"]);
        let mut state = FilterState::default();
        state.toggle_tag(Some("中文"));
        assert!(!passes(&s, &state));
        state.toggle_tag(Some("日文"));
        assert!(passes(&s, &state));
    }

    #[test]
    fn tag_and_query_are_conjunctive() {
        let s = song("大鱼", "Vsinger", &["中文"]);
        let mut state = FilterState::default();
        state.toggle_tag(Some("中文"));
        state.set_query("bad");
        assert!(!passes(&s, &state));
        state.set_query("dayu");
        assert!(passes(&s, &state));
    }

    #[test]
    fn toggle_same_tag_clears() {
        let mut state = FilterState::default();
        state.toggle_tag(Some("中文"));
        assert_eq!(state.selected_tag.as_deref(), Some("中文"));
        state.toggle_tag(Some("中文"));
        assert_eq!(state.selected_tag, None);
    }

    #[test]
    fn toggle_none_clears_unconditionally() {
        let mut state = FilterState::default();
        state.toggle_tag(Some("中文"));
        state.toggle_tag(None);
        assert_eq!(state.selected_tag, None);
        state.toggle_tag(None);
        assert_eq!(state.selected_tag, None);
    }

    #[test]
    fn toggle_other_tag_replaces() {
        let mut state = FilterState::default();
        state.toggle_tag(Some("中文"));
        state.toggle_tag(Some("日文"));
        assert_eq!(state.selected_tag.as_deref(), Some("日文"));
    }
}
