//! Tag vocabulary for the filter chip row.
//!
//! The vocabulary is derived from the collection, never stored: the union of
//! every song's tags, with the four language tags pinned to the front in a
//! fixed order and everything else sorted behind them. The full vocabulary
//! is shown regardless of the active filter.

use crate::song::Song;
use crate::translit::latinize;

/// Language tags, in the exact order they appear in the chip row.
/// Absent ones are skipped, present ones never reorder.
pub const LANGUAGE_PRIORITY: [&str; 4] = ["中文", "日文", "英文", "韩文"];

/// Compute the ordered, deduplicated tag list for a collection.
///
/// General (non-language) tags sort by their toneless pinyin rendering with
/// the raw string as tie-break, which keeps Han tags in a reading order a
/// zh-speaking visitor expects without pulling in a collation library.
pub fn vocabulary(songs: &[Song]) -> Vec<String> {
    let mut seen: Vec<&str> = Vec::new();
    for song in songs {
        for tag in &song.tags {
            if !seen.contains(&tag.as_str()) {
                seen.push(tag.as_str());
            }
        }
    }

    let mut ordered: Vec<String> = LANGUAGE_PRIORITY
        .iter()
        .filter(|lang| seen.contains(lang))
        .map(|lang| lang.to_string())
        .collect();

    let mut general: Vec<(String, &str)> = seen
        .into_iter()
        .filter(|tag| !LANGUAGE_PRIORITY.contains(tag))
        .map(|tag| (latinize(tag), tag))
        .collect();
    general.sort();

    ordered.extend(general.into_iter().map(|(_, tag)| tag.to_string()));
    ordered
}
