//! Playback output as an injected capability.
//!
//! The player bar owns the transport state machine (what's loaded, playing
//! or paused, where the head is); the sink is only the output device it
//! drives. Decoding and actual audio output are outside this app — the
//! default sink accepts every command and produces silence, which keeps the
//! whole transport exercisable in tests and in environments with no audio
//! stack at all.

/// Commands the transport issues to its output device.
pub trait AudioSink: Send + 'static {
    /// Load a new source (URL or path). Implies a rewind to 0.
    fn load(&mut self, source: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn set_muted(&mut self, muted: bool);
    /// Jump the play head to an absolute position.
    fn seek(&mut self, seconds: u32);
    /// Unload the current source.
    fn stop(&mut self);
}

/// The silent default sink.
#[derive(Debug, Default)]
pub struct NullSink {
    source: Option<String>,
}

impl AudioSink for NullSink {
    fn load(&mut self, source: &str) {
        self.source = Some(source.to_string());
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn set_muted(&mut self, _muted: bool) {}

    fn seek(&mut self, _seconds: u32) {}

    fn stop(&mut self) {
        self.source = None;
    }
}
