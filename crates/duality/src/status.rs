//! One-row status line: key hints on the left, mode and counts on the
//! right. A stateless widget, not a component — it has no state of its own.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub struct StatusBar<'a> {
    left: Option<Line<'a>>,
    right: Option<Line<'a>>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self {
            left: None,
            right: None,
        }
    }

    pub fn left(mut self, content: impl Into<Line<'a>>) -> Self {
        self.left = Some(content.into());
        self
    }

    pub fn right(mut self, content: impl Into<Line<'a>>) -> Self {
        self.right = Some(content.into());
        self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        if let Some(ref line) = self.left {
            frame.render_widget(Paragraph::new(line.clone()), chunks[0]);
        }
        if let Some(ref line) = self.right {
            frame.render_widget(
                Paragraph::new(line.clone()).alignment(ratatui::layout::Alignment::Right),
                chunks[1],
            );
        }
    }
}

impl<'a> Default for StatusBar<'a> {
    fn default() -> Self {
        Self::new()
    }
}
