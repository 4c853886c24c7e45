//! The 首页 (home) page: hero banner, official links, and the soundboard.
//!
//! The soundboard is a small list of voice clips; confirming one asks the
//! app to route it to the player — the page itself never touches audio.

use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use duality_runtime::{Command, Component};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme::Theme;
use crate::voices::VoiceClip;

#[derive(Debug, Clone)]
pub enum Message {
    KeyPress(KeyEvent),
    MouseDown(MouseEvent),
    /// Outbound: play the clip at this index. The app intercepts this.
    PlayClip(usize),
}

pub struct HomePage {
    clips: Vec<VoiceClip>,
    cursor: usize,
    theme: Theme,
    /// Soundboard rows captured at render time, for click hit-testing.
    board_area: Cell<Rect>,
}

impl HomePage {
    pub fn new(clips: Vec<VoiceClip>, theme: Theme) -> Self {
        Self {
            clips,
            cursor: 0,
            theme,
            board_area: Cell::new(Rect::default()),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn clip(&self, index: usize) -> Option<&VoiceClip> {
        self.clips.get(index)
    }

    fn confirm(&self) -> Command<Message> {
        if self.clips.is_empty() {
            Command::none()
        } else {
            Command::message(Message::PlayClip(self.cursor))
        }
    }
}

impl Component for HomePage {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => match (key.code, key.modifiers) {
                (KeyCode::Up, _) => {
                    self.cursor = self.cursor.saturating_sub(1);
                    Command::none()
                }
                (KeyCode::Down, _) => {
                    if !self.clips.is_empty() {
                        self.cursor = (self.cursor + 1).min(self.clips.len() - 1);
                    }
                    Command::none()
                }
                (KeyCode::Enter, _) => self.confirm(),
                (KeyCode::Char('p'), KeyModifiers::CONTROL) => self.confirm(),
                _ => Command::none(),
            },
            Message::MouseDown(ev) => {
                let MouseEventKind::Down(_) = ev.kind else {
                    return Command::none();
                };
                let area = self.board_area.get();
                let inside = ev.column >= area.x
                    && ev.column < area.x + area.width
                    && ev.row >= area.y
                    && ev.row < area.y + area.height;
                if !inside {
                    return Command::none();
                }
                let index = (ev.row - area.y) as usize;
                if index < self.clips.len() {
                    self.cursor = index;
                    self.confirm()
                } else {
                    Command::none()
                }
            }
            Message::PlayClip(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let [hero_area, board_area] =
            Layout::vertical([Constraint::Length(8), Constraint::Fill(1)]).areas(area);

        let hero = vec![
            Line::from(""),
            Line::styled(
                "DUALITY",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .centered(),
            Line::styled("天使与恶魔的二重奏", self.theme.text_style()).centered(),
            Line::styled("粉丝自制 · 歌单与语音台", self.theme.dim_style()).centered(),
            Line::from(""),
            Line::from(vec![
                Span::styled("直播间 ", self.theme.dim_style()),
                Span::styled("live.example.com/duality", self.theme.accent_style()),
                Span::styled("   动态 ", self.theme.dim_style()),
                Span::styled("space.example.com/duality", self.theme.accent_style()),
            ])
            .centered(),
        ];
        frame.render_widget(Paragraph::new(hero), hero_area);

        // Soundboard.
        let [label_area, list_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(board_area);
        frame.render_widget(
            Paragraph::new(Line::styled("语音台", self.theme.accent_style())),
            label_area,
        );
        self.board_area.set(list_area);

        let visible = (list_area.height as usize).min(self.clips.len());
        let lines: Vec<Line> = self.clips[..visible]
            .iter()
            .enumerate()
            .map(|(i, clip)| {
                let marker = if i == self.cursor { "▸ " } else { "  " };
                Line::from(vec![
                    Span::styled(marker, self.theme.accent_style()),
                    Span::styled(
                        format!("{} ", clip.category.symbol()),
                        self.theme.dim_style(),
                    ),
                    Span::styled(
                        clip.label.clone(),
                        if i == self.cursor {
                            self.theme.accent_style()
                        } else {
                            self.theme.text_style()
                        },
                    ),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), list_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeMode;
    use crate::voices;

    fn clips() -> Vec<VoiceClip> {
        voices::from_json(
            r#"[
                {"id":"angel-1","label":"早安","category":"angel","src":"/audio/angel/good-morning.mp3"},
                {"id":"demon-1","label":"哼哼","category":"demon","src":"/audio/demon/hehe.mp3"}
            ]"#,
        )
        .unwrap()
    }

    fn key(code: KeyCode) -> Message {
        Message::KeyPress(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn enter_plays_the_selected_clip() {
        let mut page = HomePage::new(clips(), Theme::of(ThemeMode::Angel));
        page.update(key(KeyCode::Down));
        let cmd = page.update(key(KeyCode::Enter));
        assert!(matches!(cmd.into_message(), Some(Message::PlayClip(1))));
    }

    #[test]
    fn empty_board_never_emits() {
        let mut page = HomePage::new(vec![], Theme::of(ThemeMode::Angel));
        assert!(page.update(key(KeyCode::Enter)).is_none());
        assert!(page.update(key(KeyCode::Down)).is_none());
    }
}
