//! duality — a fan-maintained song-request app for the terminal.
//!
//! Loads the song library, restores the persisted theme, and hands
//! everything to the runtime. Pass a path to a songs JSON file as the
//! first argument to use your own data; otherwise `data/songs.json` next
//! to the working directory is used, falling back to the embedded copy.
//!
//! Set `DUALITY_LOG=<path>` for an append-mode debug log.

mod app;
mod audio;
mod clipboard;
mod config;
mod music;
mod pages;
mod player;
mod status;
mod tabs;
mod textutil;
mod theme;
mod toast;
mod voices;

use std::path::Path;
use std::sync::Arc;

use duality_core::Library;
use duality_runtime::ProgramOptions;

use crate::app::{App, AppFlags};
use crate::audio::NullSink;
use crate::clipboard::SystemClipboard;
use crate::config::ConfigStore;

const EMBEDDED_SONGS: &str = include_str!("../data/songs.json");
const EMBEDDED_VOICES: &str = include_str!("../data/voices.json");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let library = match std::env::args().nth(1) {
        Some(path) => Library::load(path)?,
        None => {
            let local = Path::new("data/songs.json");
            if local.exists() {
                Library::load(local)?
            } else {
                Library::from_json(EMBEDDED_SONGS)?
            }
        }
    };
    let voices = voices::from_json(EMBEDDED_VOICES)?;

    let config = ConfigStore::at(ConfigStore::default_path());
    let theme_mode = config.load().theme_mode();

    let options = ProgramOptions {
        title: Some("duality".to_string()),
        mouse_capture: true,
        log_file: std::env::var_os("DUALITY_LOG").map(Into::into),
        ..ProgramOptions::default()
    };

    let flags = AppFlags {
        library: Arc::new(library),
        voices,
        config,
        theme_mode,
        clipboard: Arc::new(SystemClipboard),
        sink: Box::new(NullSink::default()),
    };

    duality_runtime::run_with::<App>(flags, options).await?;
    Ok(())
}
