//! Core data model and algorithms for **duality**, a fan-maintained
//! song-request app for the terminal.
//!
//! Everything in this crate is pure: no terminal, no async, no I/O beyond
//! loading the song library from JSON. The UI layer feeds events in and
//! renders the derived values out.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Song`] / [`SongId`] | One song-request record and its stable identity |
//! | [`Library`] | The immutable song collection plus precomputed search keys |
//! | [`FilterState`] | Current query text and selected tag chip |
//! | [`window::visible_range`] | Scroll offset → materialized row range (virtual scrolling) |
//! | [`CopyFlash`] | The single shared "copied" row indicator with stale-timer protection |
//!
//! # Data flow
//!
//! 1. [`Library::from_json`] loads the collection once and caches each
//!    song's lower-cased and pinyin-transliterated search strings.
//! 2. Each keystroke or tag click updates a [`FilterState`]; the library's
//!    [`filter`](Library::filter) derives the matching [`SongId`]s in
//!    collection order.
//! 3. The renderer maps its scroll position through
//!    [`window::visible_range`] and materializes only that slice.

pub mod filter;
pub mod flash;
pub mod library;
pub mod song;
pub mod tags;
pub mod translit;
pub mod window;

pub use filter::FilterState;
pub use flash::{CopyFlash, FLASH_DURATION};
pub use library::{Library, LibraryError};
pub use song::{Song, SongId};
pub use tags::LANGUAGE_PRIORITY;
pub use window::{visible_range, Window};
