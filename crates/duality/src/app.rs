//! The top-level application model: page tabs, the three pages, the
//! persistent player bar, the toaster, and theming.
//!
//! Cross-component signals flow as explicit messages: the songs page asks
//! for a toast or for playback by emitting its outbound variants, and this
//! model intercepts them before delegation — nothing broadcasts through
//! globals.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use duality_core::Library;
use duality_runtime::{
    terminal_events, Command, Component, Model, Subscription, TerminalEvent,
};
use ratatui::layout::{Constraint, Layout};
use ratatui::text::Line;
use ratatui::Frame;

use crate::audio::AudioSink;
use crate::clipboard::ClipboardService;
use crate::config::{Config, ConfigStore};
use crate::music::{self, MusicPage};
use crate::pages::{about, home};
use crate::player::{self, PlayerBar, DEFAULT_TRACK_SECS};
use crate::status::StatusBar;
use crate::tabs::{self, PageTabs};
use crate::theme::{Theme, ThemeMode};
use crate::toast::{self, Toast, Toaster};
use crate::voices::VoiceClip;

/// Assumed length of a soundboard clip (the sink has no duration metadata).
const CLIP_SECS: u32 = 5;

const PAGE_HOME: usize = 0;
const PAGE_SONGS: usize = 1;
const PAGE_ABOUT: usize = 2;

/// Everything the app needs at startup, assembled in `main`.
pub struct AppFlags {
    pub library: Arc<Library>,
    pub voices: Vec<VoiceClip>,
    pub config: ConfigStore,
    pub theme_mode: ThemeMode,
    pub clipboard: Arc<dyn ClipboardService>,
    pub sink: Box<dyn AudioSink>,
}

#[derive(Debug)]
pub enum Msg {
    Tabs(tabs::Message),
    Home(home::Message),
    Music(music::Message),
    Player(player::Message),
    Toast(toast::Message),
    NextPage,
    PrevPage,
    ToggleTheme,
    MouseDown(MouseEvent),
    Wheel { up: bool },
    Paste(String),
    Quit,
    Noop,
}

pub struct App {
    library: Arc<Library>,
    theme: Theme,
    config: ConfigStore,
    tabs: PageTabs,
    home: home::HomePage,
    music: MusicPage,
    player: PlayerBar,
    toaster: Toaster,
}

impl App {
    fn apply_theme(&mut self) {
        self.tabs.set_theme(self.theme);
        self.home.set_theme(self.theme);
        self.music.set_theme(self.theme);
        self.player.set_theme(self.theme);
        self.toaster.set_theme(self.theme);
    }

    fn persist_theme(&mut self) -> Command<Msg> {
        let config = Config {
            theme: Some(self.theme.mode.as_str().to_string()),
        };
        match self.config.save(&config) {
            Ok(()) => Command::none(),
            Err(_) => self
                .toaster
                .show(Toast::error("主题保存失败"))
                .map(Msg::Toast),
        }
    }

    fn status_line(&self) -> (String, String) {
        let hints = match self.tabs.selected() {
            PAGE_SONGS => "输入搜索 · Enter 复制点歌 · Ctrl+P 播放 · Ctrl+←/→ 标签 · Tab 换页",
            PAGE_HOME => "↑/↓ 选择 · Enter 播放 · Tab 换页",
            _ => "Tab 换页 · Ctrl+Q 退出",
        };
        let right = format!(
            "{} 首歌 · {}模式",
            self.library.len(),
            self.theme.mode.label()
        );
        (hints.to_string(), right)
    }

    // Test accessors.
    #[cfg(test)]
    pub(crate) fn music(&self) -> &MusicPage {
        &self.music
    }

    #[cfg(test)]
    pub(crate) fn player(&self) -> &PlayerBar {
        &self.player
    }

    #[cfg(test)]
    pub(crate) fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    #[cfg(test)]
    pub(crate) fn theme_mode(&self) -> ThemeMode {
        self.theme.mode
    }

    #[cfg(test)]
    pub(crate) fn page(&self) -> usize {
        self.tabs.selected()
    }
}

impl Model for App {
    type Message = Msg;
    type Flags = AppFlags;

    fn init(flags: AppFlags) -> (Self, Command<Msg>) {
        let theme = Theme::of(flags.theme_mode);
        let tabs = PageTabs::new(
            vec!["首页".into(), "点歌".into(), "关于".into()],
            theme,
        );
        let home = home::HomePage::new(flags.voices, theme);
        let music = MusicPage::new(flags.library.clone(), flags.clipboard, theme);
        let player = PlayerBar::new(flags.sink, theme);
        let toaster = Toaster::new(theme);

        (
            App {
                library: flags.library,
                theme,
                config: flags.config,
                tabs,
                home,
                music,
                player,
                toaster,
            },
            Command::none(),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            // -- interception of outbound child variants ------------------
            Msg::Music(music::Message::Announce(toast)) => {
                self.toaster.show(toast).map(Msg::Toast)
            }
            Msg::Music(music::Message::Play(id)) => {
                if let Some(song) = self.library.get(id) {
                    self.player.start(
                        song.title.clone(),
                        song.artist.clone(),
                        song.url.as_deref(),
                        DEFAULT_TRACK_SECS,
                    );
                }
                Command::none()
            }
            Msg::Home(home::Message::PlayClip(index)) => {
                if let Some(clip) = self.home.clip(index) {
                    let label = clip.label.clone();
                    let persona = match clip.category {
                        crate::voices::ClipCategory::Angel => "天使语音",
                        crate::voices::ClipCategory::Demon => "恶魔语音",
                    };
                    let src = clip.src.clone();
                    self.player.start(label, persona, Some(&src), CLIP_SECS);
                }
                Command::none()
            }

            // -- plain delegation ----------------------------------------
            Msg::Tabs(m) => self.tabs.update(m).map(Msg::Tabs),
            Msg::Home(m) => self.home.update(m).map(Msg::Home),
            Msg::Music(m) => self.music.update(m).map(Msg::Music),
            Msg::Player(m) => self.player.update(m).map(Msg::Player),
            Msg::Toast(m) => self.toaster.update(m).map(Msg::Toast),

            // -- app-level actions ---------------------------------------
            Msg::NextPage => {
                self.tabs.select_next();
                Command::none()
            }
            Msg::PrevPage => {
                self.tabs.select_prev();
                Command::none()
            }
            Msg::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.apply_theme();
                self.persist_theme()
            }
            Msg::Wheel { up } => {
                if self.tabs.selected() == PAGE_SONGS {
                    self.music
                        .update(music::Message::List(music::song_list::Message::Wheel {
                            up,
                        }))
                        .map(Msg::Music)
                } else {
                    Command::none()
                }
            }
            Msg::Paste(text) => {
                if self.tabs.selected() == PAGE_SONGS {
                    self.music
                        .update(music::Message::Search(
                            music::search_bar::Message::Paste(text),
                        ))
                        .map(Msg::Music)
                } else {
                    Command::none()
                }
            }
            Msg::MouseDown(ev) => {
                // Broadcast the press; every component hit-tests against
                // the area it captured at render time.
                let mut cmds = vec![
                    self.tabs
                        .update(tabs::Message::MouseDown(ev))
                        .map(Msg::Tabs),
                    self.player
                        .update(player::Message::MouseDown(ev))
                        .map(Msg::Player),
                    self.toaster
                        .update(toast::Message::MouseDown(ev))
                        .map(Msg::Toast),
                ];
                match self.tabs.selected() {
                    PAGE_HOME => cmds.push(
                        self.home
                            .update(home::Message::MouseDown(ev))
                            .map(Msg::Home),
                    ),
                    PAGE_SONGS => {
                        cmds.push(
                            self.music
                                .update(music::Message::Tags(
                                    music::tag_bar::Message::MouseDown(ev),
                                ))
                                .map(Msg::Music),
                        );
                        cmds.push(
                            self.music
                                .update(music::Message::List(
                                    music::song_list::Message::MouseDown(ev),
                                ))
                                .map(Msg::Music),
                        );
                    }
                    _ => {}
                }
                Command::batch(cmds)
            }
            Msg::Quit => Command::quit(),
            Msg::Noop => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let [tab_area, page_area, player_area, status_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(self.player.height()),
            Constraint::Length(1),
        ])
        .areas(area);

        self.tabs.view(frame, tab_area);

        match self.tabs.selected() {
            PAGE_HOME => self.home.view(frame, page_area),
            PAGE_SONGS => self.music.view(frame, page_area),
            _ => about::render(frame, page_area, &self.theme),
        }

        self.player.view(frame, player_area);

        let (hints, right) = self.status_line();
        StatusBar::new()
            .left(Line::styled(hints, self.theme.dim_style()))
            .right(Line::styled(right, self.theme.dim_style()))
            .render(frame, status_area);

        // Toasts float above everything, bottom-center of the page area.
        self.toaster.view(frame, page_area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let page = self.tabs.selected();
        let mut subs = vec![terminal_events(move |ev| match ev {
            TerminalEvent::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return None;
                }
                match (key.code, key.modifiers) {
                    (KeyCode::Char('q'), KeyModifiers::CONTROL)
                    | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Msg::Quit),
                    (KeyCode::Tab, _) => Some(Msg::NextPage),
                    (KeyCode::BackTab, _) => Some(Msg::PrevPage),
                    (KeyCode::Char('t'), KeyModifiers::CONTROL) => Some(Msg::ToggleTheme),
                    // Transport chords work from every page.
                    (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                        Some(Msg::Player(player::Message::Toggle))
                    }
                    (KeyCode::Char('m'), KeyModifiers::CONTROL) => {
                        Some(Msg::Player(player::Message::Mute))
                    }
                    (KeyCode::Char('b'), KeyModifiers::CONTROL) => {
                        Some(Msg::Player(player::Message::SkipBack))
                    }
                    (KeyCode::Char('f'), KeyModifiers::CONTROL) => {
                        Some(Msg::Player(player::Message::SkipForward))
                    }
                    (KeyCode::Char('x'), KeyModifiers::CONTROL) => {
                        Some(Msg::Player(player::Message::Close))
                    }
                    _ => match page {
                        PAGE_SONGS => match (key.code, key.modifiers) {
                            (
                                KeyCode::Up
                                | KeyCode::Down
                                | KeyCode::PageUp
                                | KeyCode::PageDown
                                | KeyCode::Home
                                | KeyCode::End
                                | KeyCode::Enter,
                                _,
                            )
                            | (KeyCode::Char('p'), KeyModifiers::CONTROL) => Some(Msg::Music(
                                music::Message::List(music::song_list::Message::KeyPress(key)),
                            )),
                            (KeyCode::Left | KeyCode::Right, KeyModifiers::CONTROL) => {
                                Some(Msg::Music(music::Message::Tags(
                                    music::tag_bar::Message::KeyPress(key),
                                )))
                            }
                            _ => Some(Msg::Music(music::Message::Search(
                                music::search_bar::Message::KeyPress(key),
                            ))),
                        },
                        PAGE_HOME => Some(Msg::Home(home::Message::KeyPress(key))),
                        _ => Some(Msg::Noop),
                    },
                }
            }
            TerminalEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => Some(Msg::Wheel { up: true }),
                MouseEventKind::ScrollDown => Some(Msg::Wheel { up: false }),
                MouseEventKind::Down(_) => Some(Msg::MouseDown(mouse)),
                _ => None,
            },
            TerminalEvent::Paste(text) => Some(Msg::Paste(text)),
            TerminalEvent::Resize(_, _) => Some(Msg::Noop),
            _ => None,
        })];

        subs.extend(
            self.player
                .subscriptions()
                .into_iter()
                .map(|sub| sub.map(Msg::Player)),
        );
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::FakeClipboard;
    use crate::audio::NullSink;
    use crate::toast::ToastKind;
    use duality_core::SongId;
    use duality_runtime::testing::TestProgram;

    const DATA: &str = r#"[
        {"title":"大鱼","artist":"Vsinger","date":"2024-03-01","tags":["中文"],"url":"/audio/dayu.mp3"},
        {"title":"Bad apple","artist":"Vsinger","date":"2024-02-14","tags":["日文"]}
    ]"#;

    fn flags() -> AppFlags {
        let dir = std::env::temp_dir().join("duality-app-tests");
        std::fs::create_dir_all(&dir).unwrap();
        AppFlags {
            library: Arc::new(Library::from_json(DATA).unwrap()),
            voices: vec![],
            config: ConfigStore::at(dir.join("config.json")),
            theme_mode: ThemeMode::Angel,
            clipboard: Arc::new(FakeClipboard { fail: false }),
            sink: Box::new(NullSink::default()),
        }
    }

    #[test]
    fn pages_cycle_with_tab() {
        let mut prog = TestProgram::<App>::new(flags());
        assert_eq!(prog.model().page(), PAGE_HOME);
        prog.send(Msg::NextPage);
        assert_eq!(prog.model().page(), PAGE_SONGS);
        prog.send(Msg::PrevPage);
        prog.send(Msg::PrevPage);
        assert_eq!(prog.model().page(), PAGE_ABOUT);
    }

    #[test]
    fn songs_page_renders_library_rows() {
        let mut prog = TestProgram::<App>::new(flags());
        prog.send(Msg::Tabs(tabs::Message::Select(PAGE_SONGS)));
        let screen = prog.render_string(80, 24);
        assert!(screen.contains("大鱼"));
        assert!(screen.contains("Bad apple"));
    }

    #[test]
    fn search_filters_end_to_end() {
        let mut prog = TestProgram::<App>::new(flags());
        prog.send(Msg::Tabs(tabs::Message::Select(PAGE_SONGS)));
        prog.send(Msg::Music(music::Message::Search(
            music::search_bar::Message::QueryChanged("dayu".into()),
        )));
        prog.drain_messages();
        assert_eq!(prog.model().music().filtered_len(), 1);

        let screen = prog.render_string(80, 24);
        assert!(screen.contains("大鱼"));
        assert!(!screen.contains("Bad apple"));
    }

    #[test]
    fn empty_result_shows_the_empty_state() {
        let mut prog = TestProgram::<App>::new(flags());
        prog.send(Msg::Tabs(tabs::Message::Select(PAGE_SONGS)));
        prog.send(Msg::Music(music::Message::Search(
            music::search_bar::Message::QueryChanged("zzzz".into()),
        )));
        prog.drain_messages();
        let screen = prog.render_string(80, 24);
        assert!(screen.contains("没有找到匹配的歌曲"));
    }

    #[test]
    fn copy_success_raises_a_toast_via_interception() {
        let mut prog = TestProgram::<App>::new(flags());
        prog.send(Msg::Music(music::Message::CopyFinished(SongId(0), Ok(()))));
        prog.drain_messages();
        let toast = prog.model().toaster().current().unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.title, "已复制: 大鱼");
        assert_eq!(prog.model().music().flash_active(), Some(SongId(0)));
    }

    #[test]
    fn play_request_loads_the_player() {
        let mut prog = TestProgram::<App>::new(flags());
        prog.send(Msg::Music(music::Message::Play(SongId(0))));
        assert!(prog.model().player().is_active());
        assert!(prog.model().player().is_playing());
    }

    #[test]
    fn theme_toggle_flips_and_persists() {
        let mut prog = TestProgram::<App>::new(flags());
        assert_eq!(prog.model().theme_mode(), ThemeMode::Angel);
        prog.send(Msg::ToggleTheme);
        assert_eq!(prog.model().theme_mode(), ThemeMode::Demon);

        let saved = prog.model().config.load();
        assert_eq!(saved.theme_mode(), ThemeMode::Demon);
    }
}
