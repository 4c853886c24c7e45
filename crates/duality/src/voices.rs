//! Soundboard voice clips shown on the home page.

use serde::Deserialize;

/// Which of the two personas a clip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipCategory {
    Angel,
    Demon,
}

impl ClipCategory {
    pub fn symbol(self) -> &'static str {
        match self {
            ClipCategory::Angel => "☀",
            ClipCategory::Demon => "☽",
        }
    }
}

/// One playable voice clip.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceClip {
    pub id: String,
    pub label: String,
    pub category: ClipCategory,
    pub src: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Parse the voice clip data file (a JSON array).
pub fn from_json(json: &str) -> Result<Vec<VoiceClip>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clip_data() {
        let clips = from_json(
            r#"[
                {"id":"angel-1","label":"早安","category":"angel","src":"/audio/angel/good-morning.mp3","icon":"Sun"},
                {"id":"demon-1","label":"哼哼","category":"demon","src":"/audio/demon/hehe.mp3"}
            ]"#,
        )
        .unwrap();
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0].category, ClipCategory::Angel);
        assert_eq!(clips[1].icon, None);
        assert_eq!(clips[1].category.symbol(), "☽");
    }
}
