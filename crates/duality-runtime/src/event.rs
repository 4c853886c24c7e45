use crossterm::event::{KeyEvent, MouseEvent};

/// Terminal input delivered through the
/// [`terminal_events`](crate::sources::terminal_events) subscription.
///
/// Each variant wraps the corresponding [`crossterm::event::Event`] payload,
/// so handlers can pattern-match on key codes, modifiers, and mouse buttons
/// with the full crossterm API. The application maps these into its own
/// message type and can discard what it does not care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event (wheel scrolling, row and chip clicks).
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
    /// Bracketed paste content (pasting into the search field).
    Paste(String),
}

impl From<crossterm::event::Event> for TerminalEvent {
    fn from(event: crossterm::event::Event) -> Self {
        match event {
            crossterm::event::Event::Key(k) => TerminalEvent::Key(k),
            crossterm::event::Event::Mouse(m) => TerminalEvent::Mouse(m),
            crossterm::event::Event::Resize(w, h) => TerminalEvent::Resize(w, h),
            crossterm::event::Event::FocusGained => TerminalEvent::FocusGained,
            crossterm::event::Event::FocusLost => TerminalEvent::FocusLost,
            crossterm::event::Event::Paste(s) => TerminalEvent::Paste(s),
        }
    }
}
