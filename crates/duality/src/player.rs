//! The persistent player bar.
//!
//! Anchored to the bottom of every page while a track is loaded. The bar
//! owns the transport state machine — loaded track, play/pause, mute,
//! play-head position — and drives an injected [`AudioSink`] as its output.
//! Progress advances via a 1-second timer subscription that exists only
//! while something is actually playing; pausing or closing the bar
//! reconciles the timer away.

use std::cell::Cell;
use std::time::Duration;

use crossterm::event::{MouseEvent, MouseEventKind};
use duality_runtime::{subscribe, Command, Component, Every, Subscription};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::audio::AudioSink;
use crate::textutil::{format_clock, truncate_to_width};
use crate::theme::Theme;

/// Fallback length when the source carries no duration metadata (the sink
/// interface reports none).
pub const DEFAULT_TRACK_SECS: u32 = 225;

/// Seconds skipped by the back/forward controls.
const SKIP_SECS: u32 = 10;

/// Rows the bar occupies when visible.
pub const BAR_HEIGHT: u16 = 3;

#[derive(Debug, Clone)]
pub enum Message {
    /// Play/pause toggle.
    Toggle,
    /// Mute toggle.
    Mute,
    /// Jump back ten seconds.
    SkipBack,
    /// Jump forward ten seconds.
    SkipForward,
    /// Unload the track and hide the bar.
    Close,
    /// One second of playback elapsed.
    Tick,
    /// A mouse press; resolved against the control zones.
    MouseDown(MouseEvent),
}

/// What is currently loaded.
#[derive(Debug, Clone)]
struct NowPlaying {
    title: String,
    artist: String,
}

/// Clickable regions, captured during the last render.
#[derive(Debug, Clone, Copy, Default)]
struct Zones {
    back: Rect,
    toggle: Rect,
    forward: Rect,
    mute: Rect,
    close: Rect,
    progress: Rect,
}

fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

pub struct PlayerBar {
    sink: Box<dyn AudioSink>,
    now: Option<NowPlaying>,
    playing: bool,
    muted: bool,
    position: u32,
    duration: u32,
    theme: Theme,
    zones: Cell<Zones>,
}

impl PlayerBar {
    pub fn new(sink: Box<dyn AudioSink>, theme: Theme) -> Self {
        Self {
            sink,
            now: None,
            playing: false,
            muted: false,
            position: 0,
            duration: 0,
            theme,
            zones: Cell::new(Zones::default()),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Load a track and start playing from the top.
    pub fn start(
        &mut self,
        title: impl Into<String>,
        artist: impl Into<String>,
        source: Option<&str>,
        duration: u32,
    ) {
        if let Some(source) = source {
            self.sink.load(source);
        }
        self.now = Some(NowPlaying {
            title: title.into(),
            artist: artist.into(),
        });
        self.position = 0;
        self.duration = duration.max(1);
        self.playing = true;
        self.sink.set_muted(self.muted);
        self.sink.play();
    }

    /// Whether the bar is visible (a track is loaded).
    pub fn is_active(&self) -> bool {
        self.now.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    /// Rows the bar wants from the page layout right now.
    pub fn height(&self) -> u16 {
        if self.is_active() {
            BAR_HEIGHT
        } else {
            0
        }
    }

    fn close(&mut self) {
        self.sink.stop();
        self.now = None;
        self.playing = false;
        self.position = 0;
        self.duration = 0;
    }

    fn seek_to(&mut self, seconds: u32) {
        self.position = seconds.min(self.duration);
        self.sink.seek(self.position);
    }
}

impl Component for PlayerBar {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        if self.now.is_none() {
            // No track loaded: every transport message is a no-op.
            return Command::none();
        }
        match msg {
            Message::Toggle => {
                self.playing = !self.playing;
                if self.playing {
                    self.sink.play();
                } else {
                    self.sink.pause();
                }
                Command::none()
            }
            Message::Mute => {
                self.muted = !self.muted;
                self.sink.set_muted(self.muted);
                Command::none()
            }
            Message::SkipBack => {
                self.seek_to(self.position.saturating_sub(SKIP_SECS));
                Command::none()
            }
            Message::SkipForward => {
                self.seek_to((self.position + SKIP_SECS).min(self.duration));
                Command::none()
            }
            Message::Close => {
                self.close();
                Command::none()
            }
            Message::Tick => {
                if self.playing {
                    self.position += 1;
                    if self.position >= self.duration {
                        // Track ended: bar goes away, like the source
                        // element firing `ended`.
                        self.close();
                    }
                }
                Command::none()
            }
            Message::MouseDown(ev) => {
                let MouseEventKind::Down(_) = ev.kind else {
                    return Command::none();
                };
                let zones = self.zones.get();
                if hit(zones.back, ev.column, ev.row) {
                    return Command::message(Message::SkipBack);
                }
                if hit(zones.toggle, ev.column, ev.row) {
                    return Command::message(Message::Toggle);
                }
                if hit(zones.forward, ev.column, ev.row) {
                    return Command::message(Message::SkipForward);
                }
                if hit(zones.mute, ev.column, ev.row) {
                    return Command::message(Message::Mute);
                }
                if hit(zones.close, ev.column, ev.row) {
                    return Command::message(Message::Close);
                }
                if hit(zones.progress, ev.column, ev.row) && zones.progress.width > 0 {
                    let fraction =
                        f64::from(ev.column - zones.progress.x) / f64::from(zones.progress.width);
                    let target = (fraction * f64::from(self.duration)).round() as u32;
                    self.seek_to(target);
                }
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let Some(ref now) = self.now else {
            self.zones.set(Zones::default());
            return;
        };
        if area.height < BAR_HEIGHT || area.width < 20 {
            return;
        }

        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 2 {
            return;
        }

        // Line 1: track info and clock.
        let clock = format!(
            "{} / {}",
            format_clock(self.position),
            format_clock(self.duration)
        );
        let info_budget = inner.width.saturating_sub(clock.width() as u16 + 3) as usize;
        let info = truncate_to_width(&format!("{} — {}", now.title, now.artist), info_budget);
        let pad = inner
            .width
            .saturating_sub(info.width() as u16 + clock.width() as u16);
        let info_line = Line::from(vec![
            Span::styled(info, self.theme.accent_style()),
            Span::raw(" ".repeat(pad as usize)),
            Span::styled(clock, self.theme.dim_style()),
        ]);
        frame.render_widget(
            Paragraph::new(info_line),
            Rect::new(inner.x, inner.y, inner.width, 1),
        );

        // Line 2: controls on the left, progress filling the rest,
        // close on the right.
        let y = inner.y + 1;
        let toggle_symbol = if self.playing { "⏸" } else { "▶" };
        let mute_symbol = if self.muted { "muted" } else { "sound" };

        let back = Rect::new(inner.x, y, 4, 1);
        let toggle = Rect::new(back.x + back.width, y, 3, 1);
        let forward = Rect::new(toggle.x + toggle.width, y, 4, 1);
        let mute = Rect::new(forward.x + forward.width, y, 7, 1);
        let close_w = 3u16;
        let close = Rect::new(inner.x + inner.width - close_w, y, close_w, 1);
        let progress_x = mute.x + mute.width + 1;
        let progress = Rect::new(
            progress_x,
            y,
            close.x.saturating_sub(progress_x + 1),
            1,
        );
        self.zones.set(Zones {
            back,
            toggle,
            forward,
            mute,
            close,
            progress,
        });

        let controls = Line::from(vec![
            Span::styled("⏮10 ", self.theme.dim_style()),
            Span::styled(
                format!("{toggle_symbol}  "),
                self.theme.accent_style(),
            ),
            Span::styled("10⏭ ", self.theme.dim_style()),
            Span::styled(
                format!("[{mute_symbol}]"),
                if self.muted {
                    self.theme.accent_style()
                } else {
                    self.theme.dim_style()
                },
            ),
        ]);
        frame.render_widget(
            Paragraph::new(controls),
            Rect::new(inner.x, y, progress_x.saturating_sub(inner.x), 1),
        );

        // Progress bar: filled/empty cells, proportional to the play head.
        if progress.width > 0 {
            let filled = (f64::from(progress.width) * f64::from(self.position)
                / f64::from(self.duration))
            .round() as u16;
            let filled = filled.min(progress.width);
            let bar: String = "█".repeat(filled as usize)
                + &"─".repeat((progress.width - filled) as usize);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    bar,
                    Style::default().fg(self.theme.accent),
                ))),
                progress,
            );
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " ✕ ",
                Style::default()
                    .fg(self.theme.text_dim)
                    .add_modifier(Modifier::BOLD),
            ))),
            close,
        );
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if self.playing {
            vec![
                subscribe(Every::new(Duration::from_secs(1), "player-progress"))
                    .map(|_| Message::Tick),
            ]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullSink;
    use crate::theme::{Theme, ThemeMode};

    fn bar() -> PlayerBar {
        PlayerBar::new(Box::new(NullSink::default()), Theme::of(ThemeMode::Demon))
    }

    #[test]
    fn starts_playing_from_zero() {
        let mut bar = bar();
        assert!(!bar.is_active());
        bar.start("大鱼", "Vsinger", None, 200);
        assert!(bar.is_active());
        assert!(bar.is_playing());
        assert_eq!(bar.position(), 0);
        assert_eq!(bar.height(), BAR_HEIGHT);
    }

    #[test]
    fn ticks_advance_only_while_playing() {
        let mut bar = bar();
        bar.start("大鱼", "Vsinger", None, 200);
        bar.update(Message::Tick);
        bar.update(Message::Tick);
        assert_eq!(bar.position(), 2);

        bar.update(Message::Toggle);
        bar.update(Message::Tick);
        assert_eq!(bar.position(), 2);
        assert!(bar.subscriptions().is_empty());
    }

    #[test]
    fn skip_clamps_to_track_bounds() {
        let mut bar = bar();
        bar.start("大鱼", "Vsinger", None, 15);
        bar.update(Message::SkipBack);
        assert_eq!(bar.position(), 0);
        bar.update(Message::SkipForward);
        bar.update(Message::SkipForward);
        assert_eq!(bar.position(), 15);
    }

    #[test]
    fn track_end_closes_the_bar() {
        let mut bar = bar();
        bar.start("小幸运", "田馥甄", None, 2);
        bar.update(Message::Tick);
        bar.update(Message::Tick);
        assert!(!bar.is_active());
        assert_eq!(bar.height(), 0);
    }

    #[test]
    fn close_unloads() {
        let mut bar = bar();
        bar.start("大鱼", "Vsinger", None, 100);
        bar.update(Message::Close);
        assert!(!bar.is_active());
        // Transport messages after close are no-ops.
        bar.update(Message::Toggle);
        assert!(!bar.is_playing());
    }
}
