//! Pinyin transliteration for search matching.
//!
//! A query like `dayu` should find 大鱼. Each Han character is replaced by
//! its toneless pinyin syllable; everything else passes through lower-cased,
//! so mixed titles ("Bad apple", "青鸟 (cover)") stay searchable by their
//! latin parts too.

use pinyin::ToPinyin;

/// Render `text` as a single lower-case latin string.
///
/// Han characters become concatenated toneless syllables (大鱼 → `dayu`);
/// non-Han characters are kept as-is, lower-cased. Total: every input maps
/// to some output, so callers never need a fallback path.
pub fn latinize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch.to_pinyin() {
            Some(syllable) => out.push_str(syllable.plain()),
            None => out.extend(ch.to_lowercase()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn han_becomes_toneless_pinyin() {
        assert_eq!(latinize("大鱼"), "dayu");
        assert_eq!(latinize("中文"), "zhongwen");
    }

    #[test]
    fn latin_passes_through_lowercased() {
        assert_eq!(latinize("Bad apple"), "bad apple");
        assert_eq!(latinize("Vsinger"), "vsinger");
    }

    #[test]
    fn mixed_text_keeps_both_parts() {
        assert_eq!(latinize("青鸟 Cover"), "qingniao cover");
    }

    #[test]
    fn empty_is_empty() {
        assert_eq!(latinize(""), "");
    }
}
