//! Page navigation tabs along the top of the app.

use std::cell::RefCell;

use crossterm::event::{MouseEvent, MouseEventKind};
use duality_runtime::{Command, Component};
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

#[derive(Debug, Clone)]
pub enum Message {
    /// A mouse press, resolved against the rendered tab labels.
    MouseDown(MouseEvent),
    /// A tab was chosen (emitted on click; also accepted from outside).
    Select(usize),
}

pub struct PageTabs {
    titles: Vec<String>,
    selected: usize,
    theme: Theme,
    /// Label columns captured at render time: (start, end, index).
    spans: RefCell<Vec<(u16, u16, usize)>>,
    row: RefCell<u16>,
}

impl PageTabs {
    pub fn new(titles: Vec<String>, theme: Theme) -> Self {
        Self {
            titles,
            selected: 0,
            theme,
            spans: RefCell::new(Vec::new()),
            row: RefCell::new(0),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        if index < self.titles.len() {
            self.selected = index;
        }
    }

    /// Advance to the next tab, wrapping.
    pub fn select_next(&mut self) {
        if !self.titles.is_empty() {
            self.selected = (self.selected + 1) % self.titles.len();
        }
    }

    /// Move to the previous tab, wrapping.
    pub fn select_prev(&mut self) {
        if !self.titles.is_empty() {
            self.selected = (self.selected + self.titles.len() - 1) % self.titles.len();
        }
    }
}

impl Component for PageTabs {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::MouseDown(ev) => {
                let MouseEventKind::Down(_) = ev.kind else {
                    return Command::none();
                };
                if ev.row != *self.row.borrow() {
                    return Command::none();
                }
                let hit = self
                    .spans
                    .borrow()
                    .iter()
                    .find(|(start, end, _)| ev.column >= *start && ev.column < *end)
                    .map(|(_, _, index)| *index);
                match hit {
                    Some(index) => {
                        self.select(index);
                        Command::message(Message::Select(index))
                    }
                    None => Command::none(),
                }
            }
            Message::Select(index) => {
                self.select(index);
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let mut spans = vec![Span::styled("♪ duality  ", self.theme.accent_style())];
        let mut layout = Vec::new();
        let mut x = area.x + "♪ duality  ".width() as u16;

        for (i, title) in self.titles.iter().enumerate() {
            let text = format!(" {title} ");
            let width = text.width() as u16;
            layout.push((x, x + width, i));
            let style = if i == self.selected {
                self.theme.accent_style().add_modifier(Modifier::REVERSED)
            } else {
                self.theme.dim_style()
            };
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
            x += width + 1;
        }

        *self.spans.borrow_mut() = layout;
        *self.row.borrow_mut() = area.y;

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(self.theme.border_style());
        frame.render_widget(
            Paragraph::new(Line::from(spans)).block(block),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeMode;

    fn tabs() -> PageTabs {
        PageTabs::new(
            vec!["首页".into(), "点歌".into(), "关于".into()],
            Theme::of(ThemeMode::Angel),
        )
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut tabs = tabs();
        tabs.select_prev();
        assert_eq!(tabs.selected(), 2);
        tabs.select_next();
        assert_eq!(tabs.selected(), 0);
    }

    #[test]
    fn out_of_range_select_is_ignored() {
        let mut tabs = tabs();
        tabs.select(9);
        assert_eq!(tabs.selected(), 0);
        tabs.select(1);
        assert_eq!(tabs.selected(), 1);
    }
}
