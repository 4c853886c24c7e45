//! The always-active search input at the top of the songs page.
//!
//! Unlike a vim-style `/` overlay there is no activation step: printable
//! keys go straight into the query, matching how the site's search box is
//! simply always there. The bar only edits text and reports changes; the
//! page owns the actual filter state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use duality_runtime::{Command, Component};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;

#[derive(Debug, Clone)]
pub enum Message {
    /// A key press routed to the input.
    KeyPress(KeyEvent),
    /// Pasted text (bracketed paste lands whole, not key by key).
    Paste(String),
    /// The query text changed (notification to the page).
    QueryChanged(String),
    /// Esc pressed: the page clears query and tag together.
    ResetRequested,
}

pub struct SearchBar {
    query: String,
    cursor_pos: usize,
    placeholder: String,
    theme: Theme,
}

impl SearchBar {
    pub fn new(theme: Theme) -> Self {
        Self {
            query: String::new(),
            cursor_pos: 0,
            placeholder: "搜索歌曲（支持拼音）...".to_string(),
            theme,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Wipe the text (used when the page resets all filters).
    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor_pos = 0;
    }

    /// Convert a char index to a byte offset in the query string.
    fn byte_offset(s: &str, char_idx: usize) -> usize {
        s.char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(s.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    fn changed(&self) -> Command<Message> {
        Command::message(Message::QueryChanged(self.query.clone()))
    }
}

impl Component for SearchBar {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => match (key.code, key.modifiers) {
                (KeyCode::Esc, _) => Command::message(Message::ResetRequested),
                (KeyCode::Backspace, _) => {
                    if self.cursor_pos > 0 {
                        self.cursor_pos -= 1;
                        let byte_pos = Self::byte_offset(&self.query, self.cursor_pos);
                        self.query.remove(byte_pos);
                        self.changed()
                    } else {
                        Command::none()
                    }
                }
                (KeyCode::Left, _) => {
                    self.cursor_pos = self.cursor_pos.saturating_sub(1);
                    Command::none()
                }
                (KeyCode::Right, _) => {
                    if self.cursor_pos < self.char_len() {
                        self.cursor_pos += 1;
                    }
                    Command::none()
                }
                (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                    if self.query.is_empty() {
                        Command::none()
                    } else {
                        self.clear();
                        self.changed()
                    }
                }
                (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                    let byte_pos = Self::byte_offset(&self.query, self.cursor_pos);
                    self.query.insert(byte_pos, c);
                    self.cursor_pos += 1;
                    self.changed()
                }
                _ => Command::none(),
            },
            Message::Paste(text) => {
                if text.is_empty() {
                    Command::none()
                } else {
                    let byte_pos = Self::byte_offset(&self.query, self.cursor_pos);
                    self.query.insert_str(byte_pos, &text);
                    self.cursor_pos += text.chars().count();
                    self.changed()
                }
            }
            Message::QueryChanged(_) | Message::ResetRequested => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
        let mut spans = vec![Span::styled("/ ", self.theme.accent_style())];

        if self.query.is_empty() {
            spans.push(Span::styled(" ", cursor_style));
            spans.push(Span::styled(
                self.placeholder.clone(),
                self.theme.dim_style(),
            ));
        } else {
            let byte_pos = Self::byte_offset(&self.query, self.cursor_pos);
            let before = &self.query[..byte_pos];
            if !before.is_empty() {
                spans.push(Span::styled(before.to_string(), self.theme.text_style()));
            }
            if self.cursor_pos < self.char_len() {
                let next_byte = Self::byte_offset(&self.query, self.cursor_pos + 1);
                spans.push(Span::styled(
                    self.query[byte_pos..next_byte].to_string(),
                    cursor_style,
                ));
                let after = &self.query[next_byte..];
                if !after.is_empty() {
                    spans.push(Span::styled(after.to_string(), self.theme.text_style()));
                }
            } else {
                spans.push(Span::styled(" ", cursor_style));
            }
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(inner.x, inner.y, inner.width, 1),
        );
    }

    fn focused(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Theme, ThemeMode};
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn bar() -> SearchBar {
        SearchBar::new(Theme::of(ThemeMode::Angel))
    }

    #[test]
    fn typing_emits_query_changed() {
        let mut bar = bar();
        let cmd = bar.update(Message::KeyPress(key(KeyCode::Char('d'))));
        assert!(matches!(
            cmd.into_message(),
            Some(Message::QueryChanged(q)) if q == "d"
        ));
        bar.update(Message::KeyPress(key(KeyCode::Char('a'))));
        assert_eq!(bar.query(), "da");
    }

    #[test]
    fn han_input_edits_at_char_boundaries() {
        let mut bar = bar();
        bar.update(Message::KeyPress(key(KeyCode::Char('大'))));
        bar.update(Message::KeyPress(key(KeyCode::Char('鱼'))));
        assert_eq!(bar.query(), "大鱼");

        bar.update(Message::KeyPress(key(KeyCode::Left)));
        bar.update(Message::KeyPress(key(KeyCode::Char('小'))));
        assert_eq!(bar.query(), "大小鱼");

        bar.update(Message::KeyPress(key(KeyCode::Backspace)));
        assert_eq!(bar.query(), "大鱼");
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut bar = bar();
        let cmd = bar.update(Message::KeyPress(key(KeyCode::Backspace)));
        assert!(cmd.is_none());
    }

    #[test]
    fn esc_requests_reset_without_touching_text() {
        let mut bar = bar();
        bar.update(Message::KeyPress(key(KeyCode::Char('x'))));
        let cmd = bar.update(Message::KeyPress(key(KeyCode::Esc)));
        assert!(matches!(cmd.into_message(), Some(Message::ResetRequested)));
        // The page decides what a reset means; text is cleared via clear().
        assert_eq!(bar.query(), "x");
    }

    #[test]
    fn ctrl_u_clears() {
        let mut bar = bar();
        bar.update(Message::KeyPress(key(KeyCode::Char('a'))));
        let cmd = bar.update(Message::KeyPress(KeyEvent {
            code: KeyCode::Char('u'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }));
        assert_eq!(bar.query(), "");
        assert!(matches!(
            cmd.into_message(),
            Some(Message::QueryChanged(q)) if q.is_empty()
        ));
    }

    #[test]
    fn paste_inserts_whole_string() {
        let mut bar = bar();
        bar.update(Message::Paste("bad apple".to_string()));
        assert_eq!(bar.query(), "bad apple");
    }
}
