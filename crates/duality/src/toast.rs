//! Transient bottom-center notifications.
//!
//! One toast at a time: showing a new one replaces the current one and
//! restarts the clock. Dismissal reuses the generation-token idiom from the
//! copy flash, so the expiry of a replaced toast cannot take down its
//! successor.

use std::time::Duration;

use crossterm::event::{MouseEvent, MouseEventKind};
use duality_runtime::{Command, Component};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use std::cell::Cell;
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

/// How long a toast stays up before auto-dismissing.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// One notification: headline plus optional second line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub body: Option<String>,
}

impl Toast {
    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            title: title.into(),
            body: Some(body.into()),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            title: title.into(),
            body: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Expiry timer fired for the given generation.
    Dismiss(u64),
    /// A mouse event; clicking the toast dismisses it early.
    MouseDown(MouseEvent),
}

/// The single-slot toast host.
pub struct Toaster {
    current: Option<Toast>,
    generation: u64,
    theme: Theme,
    last_area: Cell<Rect>,
}

impl Toaster {
    pub fn new(theme: Theme) -> Self {
        Self {
            current: None,
            generation: 0,
            theme,
            last_area: Cell::new(Rect::default()),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Display a toast, superseding any current one, and return the expiry
    /// command to hand back to the runtime.
    pub fn show(&mut self, toast: Toast) -> Command<Message> {
        self.generation += 1;
        self.current = Some(toast);
        let generation = self.generation;
        Command::tick(TOAST_DURATION, move |_| Message::Dismiss(generation))
    }
}

impl Component for Toaster {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Dismiss(generation) => {
                if generation == self.generation {
                    self.current = None;
                }
                Command::none()
            }
            Message::MouseDown(ev) => {
                if let MouseEventKind::Down(_) = ev.kind {
                    let area = self.last_area.get();
                    let inside = ev.column >= area.x
                        && ev.column < area.x + area.width
                        && ev.row >= area.y
                        && ev.row < area.y + area.height;
                    if inside && self.current.is_some() {
                        self.generation += 1;
                        self.current = None;
                    }
                }
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let Some(ref toast) = self.current else {
            self.last_area.set(Rect::default());
            return;
        };
        if area.height < 4 || area.width < 8 {
            return;
        }

        let (symbol, color) = match toast.kind {
            ToastKind::Success => ("✓", self.theme.success),
            ToastKind::Error => ("✗", self.theme.error),
        };

        let headline = format!("{symbol} {}", toast.title);
        let content_width = headline
            .width()
            .max(toast.body.as_deref().map_or(0, |b| b.width()));
        let width = (content_width as u16 + 4).min(area.width.saturating_sub(2));
        let height = if toast.body.is_some() { 4 } else { 3 };

        // Bottom-center, one row above the lower edge.
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + area.height.saturating_sub(height + 1);
        let rect = Rect::new(x, y, width, height);
        self.last_area.set(rect);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);

        let mut lines = vec![Line::from(Span::styled(
            headline,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        if let Some(ref body) = toast.body {
            lines.push(Line::from(Span::styled(
                body.clone(),
                self.theme.dim_style(),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Theme, ThemeMode};

    fn toaster() -> Toaster {
        Toaster::new(Theme::of(ThemeMode::Angel))
    }

    #[test]
    fn show_replaces_current() {
        let mut t = toaster();
        let _ = t.show(Toast::success("已复制: 大鱼", "快去直播间点歌吧!"));
        let _ = t.show(Toast::error("复制失败，请重试"));
        assert_eq!(t.current().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn stale_dismiss_is_ignored() {
        let mut t = toaster();
        let _ = t.show(Toast::error("first"));
        let first_gen = t.generation;
        let _ = t.show(Toast::error("second"));
        t.update(Message::Dismiss(first_gen));
        assert!(t.current().is_some());
        t.update(Message::Dismiss(t.generation));
        assert!(t.current().is_none());
    }
}
