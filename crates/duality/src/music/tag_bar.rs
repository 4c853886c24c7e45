//! The tag filter chip row: 全部 followed by the full tag vocabulary.
//!
//! The bar is display-only state: it draws the chips, resolves clicks and
//! cycle keys to a pressed chip, and reports that press upward. The page
//! owns the selection (it applies the toggle semantics) and pushes the
//! result back down with [`TagBar::set_selected`], so there is exactly one
//! source of truth for the active tag.

use std::cell::RefCell;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use duality_runtime::{Command, Component};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

#[derive(Debug, Clone)]
pub enum Message {
    /// Ctrl+Left / Ctrl+Right chip cycling.
    KeyPress(KeyEvent),
    /// A mouse press, resolved against the chip spans.
    MouseDown(MouseEvent),
    /// A chip was pressed: `None` is the 全部 chip. The page applies the
    /// toggle semantics and calls [`TagBar::set_selected`] with the result.
    ChipPressed(Option<String>),
}

/// One rendered chip span: columns `start..end` on the bar's row.
#[derive(Debug, Clone)]
struct ChipSpan {
    start: u16,
    end: u16,
    /// `None` for 全部, otherwise an index into `tags`.
    tag: Option<usize>,
}

pub struct TagBar {
    tags: Vec<String>,
    selected: Option<String>,
    theme: Theme,
    /// Chip layout captured during the last render, for click hit-testing.
    spans: RefCell<Vec<ChipSpan>>,
    row: RefCell<u16>,
}

impl TagBar {
    pub fn new(tags: Vec<String>, theme: Theme) -> Self {
        Self {
            tags,
            selected: None,
            theme,
            spans: RefCell::new(Vec::new()),
            row: RefCell::new(0),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Push the page's authoritative selection back into the display.
    pub fn set_selected(&mut self, selected: Option<String>) {
        self.selected = selected;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The chip after the current selection, for Ctrl+Right cycling:
    /// 全部 → first tag → … → last tag → 全部.
    fn next_chip(&self) -> Option<String> {
        match self.selected_index() {
            None => self.tags.first().cloned(),
            Some(i) if i + 1 < self.tags.len() => Some(self.tags[i + 1].clone()),
            Some(_) => None,
        }
    }

    fn prev_chip(&self) -> Option<String> {
        match self.selected_index() {
            None => self.tags.last().cloned(),
            Some(0) => None,
            Some(i) => Some(self.tags[i - 1].clone()),
        }
    }

    fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.tags.iter().position(|t| t == selected)
    }
}

impl Component for TagBar {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => match (key.code, key.modifiers) {
                (KeyCode::Right, KeyModifiers::CONTROL) => {
                    Command::message(Message::ChipPressed(self.next_chip()))
                }
                (KeyCode::Left, KeyModifiers::CONTROL) => {
                    Command::message(Message::ChipPressed(self.prev_chip()))
                }
                _ => Command::none(),
            },
            Message::MouseDown(ev) => {
                let MouseEventKind::Down(_) = ev.kind else {
                    return Command::none();
                };
                if ev.row != *self.row.borrow() {
                    return Command::none();
                }
                let pressed = self
                    .spans
                    .borrow()
                    .iter()
                    .find(|span| ev.column >= span.start && ev.column < span.end)
                    .map(|span| span.tag.map(|i| self.tags[i].clone()));
                match pressed {
                    Some(chip) => Command::message(Message::ChipPressed(chip)),
                    None => Command::none(),
                }
            }
            Message::ChipPressed(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let selected_style = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED);
        let normal_style = self.theme.dim_style();

        let mut spans = Vec::new();
        let mut layout = Vec::new();
        let mut x = area.x;

        let mut push_chip = |label: &str, tag: Option<usize>, active: bool| {
            let text = format!(" {label} ");
            let width = text.width() as u16;
            layout.push(ChipSpan {
                start: x,
                end: x + width,
                tag,
            });
            spans.push(Span::styled(
                text,
                if active { selected_style } else { normal_style },
            ));
            spans.push(Span::raw(" "));
            x += width + 1;
        };

        push_chip("全部", None, self.selected.is_none());
        for (i, tag) in self.tags.iter().enumerate() {
            push_chip(tag, Some(i), self.selected.as_deref() == Some(tag.as_str()));
        }

        *self.spans.borrow_mut() = layout;
        *self.row.borrow_mut() = area.y;

        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(area.x, area.y, area.width, 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Theme, ThemeMode};

    fn bar() -> TagBar {
        TagBar::new(
            vec!["中文".into(), "日文".into(), "古风".into()],
            Theme::of(ThemeMode::Angel),
        )
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn pressed(cmd: Command<Message>) -> Option<String> {
        match cmd.into_message() {
            Some(Message::ChipPressed(chip)) => chip,
            other => panic!("expected ChipPressed, got {other:?}"),
        }
    }

    #[test]
    fn cycling_forward_walks_the_vocabulary() {
        let mut bar = bar();
        assert_eq!(
            pressed(bar.update(Message::KeyPress(ctrl(KeyCode::Right)))),
            Some("中文".to_string())
        );
        bar.set_selected(Some("中文".to_string()));
        assert_eq!(
            pressed(bar.update(Message::KeyPress(ctrl(KeyCode::Right)))),
            Some("日文".to_string())
        );
        bar.set_selected(Some("古风".to_string()));
        // Past the last chip wraps back to 全部.
        assert_eq!(pressed(bar.update(Message::KeyPress(ctrl(KeyCode::Right)))), None);
    }

    #[test]
    fn cycling_backward_from_all_lands_on_last() {
        let mut bar = bar();
        assert_eq!(
            pressed(bar.update(Message::KeyPress(ctrl(KeyCode::Left)))),
            Some("古风".to_string())
        );
    }

    #[test]
    fn selection_is_pushed_not_owned() {
        let mut bar = bar();
        bar.set_selected(Some("日文".to_string()));
        assert_eq!(bar.selected(), Some("日文"));
        bar.set_selected(None);
        assert_eq!(bar.selected(), None);
    }
}
