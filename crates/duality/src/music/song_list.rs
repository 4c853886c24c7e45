//! The virtualized song list.
//!
//! Only the rows inside the scroll window (plus overscan) are ever built:
//! per scroll event the work is the O(1) window formula and a slice bounded
//! by the viewport, never by the collection size. Each materialized row is
//! placed at its absolute position in the full-height list minus the scroll
//! offset, so rows enter and leave the window without the rest shifting,
//! and the scrollbar reflects the true logical height.
//!
//! The component owns scroll-and-cursor state only. Row data is pushed in
//! by the page whenever the filtered view changes, and the flash marker is
//! pushed in from the page's copy-flash state.

use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use duality_core::{window, SongId};
use duality_runtime::{Command, Component};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::textutil::truncate_to_width;
use crate::theme::Theme;

/// Terminal rows per song row: title line plus artist/meta line.
pub const ROW_HEIGHT: usize = 2;

/// Extra rows materialized beyond the visible window on each side.
pub const OVERSCAN: usize = 3;

/// Lines scrolled per mouse wheel tick.
const WHEEL_DELTA: usize = 3;

/// One renderable row, denormalized from the library at filter time.
#[derive(Debug, Clone)]
pub struct Row {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub date: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Navigation and activation keys.
    KeyPress(KeyEvent),
    /// Mouse wheel over the list.
    Wheel { up: bool },
    /// Mouse press; a hit on a row activates it.
    MouseDown(MouseEvent),
    /// A row was activated (Enter or click) — the page copies it.
    Activated(SongId),
    /// Play requested for a row (Ctrl+P) — routed to the player.
    PlayRequested(SongId),
}

pub struct SongList {
    rows: Vec<Row>,
    cursor: usize,
    /// Scroll offset in terminal lines from the top of the full list.
    scroll: usize,
    flash: Option<SongId>,
    theme: Theme,
    /// Viewport geometry captured during the last render, for wheel
    /// clamping and click hit-testing.
    last_area: Cell<Rect>,
}

impl SongList {
    pub fn new(rows: Vec<Row>, theme: Theme) -> Self {
        Self {
            rows,
            cursor: 0,
            scroll: 0,
            flash: None,
            theme,
            last_area: Cell::new(Rect::new(0, 0, 80, 20)),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Replace the rows (the filtered view changed). The cursor clamps and
    /// the scroll snaps back into range rather than resetting, so refining
    /// a query does not yank the list back to the top.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        if self.rows.is_empty() {
            self.cursor = 0;
            self.scroll = 0;
        } else {
            self.cursor = self.cursor.min(self.rows.len() - 1);
            self.scroll = self.scroll.min(self.max_scroll());
        }
    }

    /// Push the page's flash marker (at most one row system-wide).
    pub fn set_flash(&mut self, flash: Option<SongId>) {
        self.flash = flash;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cursor_row(&self) -> Option<&Row> {
        self.rows.get(self.cursor)
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn viewport_lines(&self) -> usize {
        self.last_area.get().height as usize
    }

    fn total_lines(&self) -> usize {
        self.rows.len() * ROW_HEIGHT
    }

    fn max_scroll(&self) -> usize {
        self.total_lines().saturating_sub(self.viewport_lines())
    }

    fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll as isize + delta;
        self.scroll = target.clamp(0, self.max_scroll() as isize) as usize;
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
        self.ensure_cursor_visible();
    }

    fn cursor_to(&mut self, index: usize) {
        if self.rows.is_empty() {
            return;
        }
        self.cursor = index.min(self.rows.len() - 1);
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        let top = self.cursor * ROW_HEIGHT;
        let bottom = top + ROW_HEIGHT;
        let viewport = self.viewport_lines().max(ROW_HEIGHT);
        if top < self.scroll {
            self.scroll = top;
        } else if bottom > self.scroll + viewport {
            self.scroll = bottom - viewport;
        }
    }

    fn page_rows(&self) -> isize {
        (self.viewport_lines() / ROW_HEIGHT).max(1) as isize
    }

    fn activate_cursor(&self) -> Command<Message> {
        match self.cursor_row() {
            Some(row) => Command::message(Message::Activated(row.id)),
            None => Command::none(),
        }
    }
}

impl Component for SongList {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => match (key.code, key.modifiers) {
                (KeyCode::Up, _) => {
                    self.move_cursor(-1);
                    Command::none()
                }
                (KeyCode::Down, _) => {
                    self.move_cursor(1);
                    Command::none()
                }
                (KeyCode::PageUp, _) => {
                    self.move_cursor(-self.page_rows());
                    Command::none()
                }
                (KeyCode::PageDown, _) => {
                    self.move_cursor(self.page_rows());
                    Command::none()
                }
                (KeyCode::Home, _) => {
                    self.cursor_to(0);
                    Command::none()
                }
                (KeyCode::End, _) => {
                    if !self.rows.is_empty() {
                        self.cursor_to(self.rows.len() - 1);
                    }
                    Command::none()
                }
                (KeyCode::Enter, _) => self.activate_cursor(),
                (KeyCode::Char('p'), KeyModifiers::CONTROL) => match self.cursor_row() {
                    Some(row) => Command::message(Message::PlayRequested(row.id)),
                    None => Command::none(),
                },
                _ => Command::none(),
            },
            Message::Wheel { up } => {
                let delta = WHEEL_DELTA as isize;
                self.scroll_by(if up { -delta } else { delta });
                Command::none()
            }
            Message::MouseDown(ev) => {
                let MouseEventKind::Down(_) = ev.kind else {
                    return Command::none();
                };
                let area = self.last_area.get();
                let inside = ev.column >= area.x
                    && ev.column < area.x + area.width
                    && ev.row >= area.y
                    && ev.row < area.y + area.height;
                if !inside {
                    return Command::none();
                }
                let line = self.scroll + (ev.row - area.y) as usize;
                let index = line / ROW_HEIGHT;
                if index < self.rows.len() {
                    // The whole row is the copy trigger, not just the
                    // trailing button.
                    self.cursor_to(index);
                    self.activate_cursor()
                } else {
                    Command::none()
                }
            }
            Message::Activated(_) | Message::PlayRequested(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        self.last_area.set(area);
        if area.height == 0 || area.width == 0 || self.rows.is_empty() {
            return;
        }

        let viewport = area.height as usize;
        let scroll = self.scroll.min(self.total_lines().saturating_sub(viewport));

        let Some(win) = window::visible_range(
            self.rows.len(),
            ROW_HEIGHT,
            viewport,
            OVERSCAN,
            scroll as i64,
        ) else {
            return;
        };

        for index in win.start..=win.end {
            let row = &self.rows[index];
            let row_top = (index * ROW_HEIGHT) as isize - scroll as isize;

            let selected = index == self.cursor;
            let flashing = self.flash == Some(row.id);

            // Title line.
            let title_style = if flashing {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if selected {
                self.theme.accent_style()
            } else {
                self.theme.text_style()
            };
            let marker = if selected { "▸ " } else { "  " };
            let mut title_spans = vec![
                Span::styled(marker, self.theme.accent_style()),
                Span::styled(
                    truncate_to_width(&row.title, area.width.saturating_sub(14) as usize),
                    title_style,
                ),
            ];
            if flashing {
                title_spans.push(Span::styled(
                    "  已复制 ✓",
                    Style::default()
                        .fg(self.theme.success)
                        .add_modifier(Modifier::BOLD),
                ));
            }

            // Artist / meta line.
            let mut meta = format!("  {} · {}", row.artist, row.date);
            if !row.tags.is_empty() {
                meta.push_str("  ");
                meta.push_str(&row.tags.join(" "));
            }
            let meta_line = Line::from(Span::styled(
                truncate_to_width(&meta, area.width.saturating_sub(2) as usize),
                self.theme.dim_style(),
            ));

            for (line_offset, line) in [Line::from(title_spans), meta_line].into_iter().enumerate()
            {
                let y = row_top + line_offset as isize;
                // Overscan rows sit partially (or fully) outside the
                // viewport; clip line by line.
                if y < 0 || y >= viewport as isize {
                    continue;
                }
                frame.render_widget(
                    Paragraph::new(line),
                    Rect::new(area.x, area.y + y as u16, area.width, 1),
                );
            }
        }

        // Scrollbar against the full logical height, like any real list of
        // this length would show.
        if self.total_lines() > viewport {
            let mut state =
                ScrollbarState::new(self.total_lines() - viewport).position(scroll);
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
            frame.render_stateful_widget(scrollbar, area, &mut state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Theme, ThemeMode};
    use crossterm::event::{KeyEventKind, KeyEventState, MouseButton};

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row {
                id: SongId(i),
                title: format!("song {i}"),
                artist: "artist".to_string(),
                date: "2024-01-01".to_string(),
                tags: vec!["中文".to_string()],
            })
            .collect()
    }

    fn list(n: usize) -> SongList {
        // Default captured viewport: 80x20 → 10 visible rows.
        SongList::new(rows(n), Theme::of(ThemeMode::Angel))
    }

    fn key(code: KeyCode) -> Message {
        Message::KeyPress(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn enter_activates_cursor_row() {
        let mut list = list(5);
        list.update(key(KeyCode::Down));
        list.update(key(KeyCode::Down));
        let cmd = list.update(key(KeyCode::Enter));
        assert!(matches!(
            cmd.into_message(),
            Some(Message::Activated(SongId(2)))
        ));
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut list = list(3);
        list.update(key(KeyCode::Up));
        assert_eq!(list.cursor, 0);
        list.update(key(KeyCode::End));
        list.update(key(KeyCode::Down));
        assert_eq!(list.cursor, 2);
    }

    #[test]
    fn moving_past_the_viewport_scrolls() {
        let mut list = list(50);
        for _ in 0..15 {
            list.update(key(KeyCode::Down));
        }
        // Cursor row 15 must be inside [scroll, scroll + 20 lines).
        let top = list.cursor * ROW_HEIGHT;
        assert!(top >= list.scroll());
        assert!(top + ROW_HEIGHT <= list.scroll() + 20);
    }

    #[test]
    fn wheel_scrolls_without_moving_cursor() {
        let mut list = list(50);
        list.update(Message::Wheel { up: false });
        assert_eq!(list.scroll(), 3);
        assert_eq!(list.cursor, 0);
        list.update(Message::Wheel { up: true });
        list.update(Message::Wheel { up: true });
        assert_eq!(list.scroll(), 0);
    }

    #[test]
    fn wheel_clamps_to_list_end() {
        let mut list = list(11); // 22 lines, viewport 20 → max scroll 2
        for _ in 0..10 {
            list.update(Message::Wheel { up: false });
        }
        assert_eq!(list.scroll(), 2);
    }

    #[test]
    fn click_anywhere_on_a_row_activates_it() {
        let mut list = list(10);
        let ev = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 7, // line 7 → row index 3
            modifiers: KeyModifiers::NONE,
        };
        let cmd = list.update(Message::MouseDown(ev));
        assert!(matches!(
            cmd.into_message(),
            Some(Message::Activated(SongId(3)))
        ));
        assert_eq!(list.cursor, 3);
    }

    #[test]
    fn click_below_the_last_row_is_ignored() {
        let mut list = list(2); // 4 lines of content in a 20-line viewport
        let ev = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 12,
            modifiers: KeyModifiers::NONE,
        };
        assert!(list.update(Message::MouseDown(ev)).is_none());
    }

    #[test]
    fn replacing_rows_keeps_cursor_in_range() {
        let mut list = list(50);
        list.update(key(KeyCode::End));
        assert_eq!(list.cursor, 49);
        list.set_rows(rows(5));
        assert_eq!(list.cursor, 4);
        list.set_rows(vec![]);
        assert_eq!(list.cursor, 0);
        assert!(list.update(key(KeyCode::Enter)).is_none());
    }

    #[test]
    fn ctrl_p_requests_playback() {
        let mut list = list(5);
        let cmd = list.update(Message::KeyPress(KeyEvent::new(
            KeyCode::Char('p'),
            KeyModifiers::CONTROL,
        )));
        assert!(matches!(
            cmd.into_message(),
            Some(Message::PlayRequested(SongId(0)))
        ));
    }
}
