//! The 点歌 (song request) page: search bar, tag chips, virtualized list.
//!
//! This is the composition root of the request flow. It exclusively owns
//! the [`FilterState`] and the shared [`CopyFlash`]; the child components
//! report intents upward (query text changed, chip pressed, row activated)
//! and get derived state pushed back down. Activating a row copies the
//! request command to the clipboard; the page reports the outcome through
//! the [`Announce`](Message::Announce) channel and flashes the row on
//! success.

pub mod search_bar;
pub mod song_list;
pub mod tag_bar;

use std::sync::Arc;

use duality_core::{CopyFlash, FilterState, Library, SongId, FLASH_DURATION};
use duality_runtime::{Command, Component};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::clipboard::{ClipboardError, ClipboardService};
use crate::theme::Theme;
use crate::toast::Toast;

use search_bar::SearchBar;
use song_list::{Row, SongList};
use tag_bar::TagBar;

/// The fixed request template written to the clipboard.
fn request_text(title: &str) -> String {
    format!("点歌 {title}")
}

#[derive(Debug, Clone)]
pub enum Message {
    Search(search_bar::Message),
    Tags(tag_bar::Message),
    List(song_list::Message),
    /// The async clipboard write finished for the given song.
    CopyFinished(SongId, Result<(), ClipboardError>),
    /// The 300 ms flash window elapsed for `(song, generation)`.
    FlashExpired(SongId, u64),
    /// Outbound: show a toast. The app intercepts this variant.
    Announce(Toast),
    /// Outbound: play this song. The app intercepts this variant.
    Play(SongId),
}

pub struct MusicPage {
    library: Arc<Library>,
    filter: FilterState,
    flash: CopyFlash,
    search: SearchBar,
    tags: TagBar,
    list: SongList,
    clipboard: Arc<dyn ClipboardService>,
    theme: Theme,
}

impl MusicPage {
    pub fn new(
        library: Arc<Library>,
        clipboard: Arc<dyn ClipboardService>,
        theme: Theme,
    ) -> Self {
        let tags = TagBar::new(library.tag_vocabulary(), theme);
        let filter = FilterState::default();
        let list = SongList::new(Self::rows_for(&library, &filter), theme);
        Self {
            library,
            filter,
            flash: CopyFlash::default(),
            search: SearchBar::new(theme),
            tags,
            list,
            clipboard,
            theme,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.search.set_theme(theme);
        self.tags.set_theme(theme);
        self.list.set_theme(theme);
    }

    /// Number of songs in the current filtered view.
    pub fn filtered_len(&self) -> usize {
        self.list.len()
    }

    pub fn flash_active(&self) -> Option<SongId> {
        self.flash.active()
    }

    pub fn selected_tag(&self) -> Option<&str> {
        self.filter.selected_tag.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.filter.query
    }

    fn rows_for(library: &Library, filter: &FilterState) -> Vec<Row> {
        library
            .filter(filter)
            .into_iter()
            .filter_map(|id| {
                library.get(id).map(|song| Row {
                    id,
                    title: song.title.clone(),
                    artist: song.artist.clone(),
                    date: song.date.clone(),
                    tags: song.tags.clone(),
                })
            })
            .collect()
    }

    /// Recompute the filtered view and push it into the renderer. Cheap by
    /// construction (cached search keys), so it runs on every keystroke.
    fn refresh(&mut self) {
        self.list
            .set_rows(Self::rows_for(&self.library, &self.filter));
    }

    /// Kick off the copy side effect for a row. The write is asynchronous;
    /// only its completion touches the flash, so a failed write never
    /// flashes anything.
    fn copy(&mut self, id: SongId) -> Command<Message> {
        let Some(song) = self.library.get(id) else {
            return Command::none();
        };
        let future = self.clipboard.write_text(request_text(&song.title));
        Command::perform(future, move |outcome| Message::CopyFinished(id, outcome))
    }

    fn copy_finished(
        &mut self,
        id: SongId,
        outcome: Result<(), ClipboardError>,
    ) -> Command<Message> {
        match outcome {
            Ok(()) => {
                let Some(song) = self.library.get(id) else {
                    return Command::none();
                };
                let token = self.flash.begin(id);
                self.list.set_flash(self.flash.active());
                Command::batch([
                    Command::tick(FLASH_DURATION, move |_| Message::FlashExpired(id, token)),
                    Command::message(Message::Announce(Toast::success(
                        format!("已复制: {}", song.title),
                        "快去直播间点歌吧!",
                    ))),
                ])
            }
            Err(_) => Command::message(Message::Announce(Toast::error("复制失败，请重试"))),
        }
    }
}

impl Component for MusicPage {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Search(search_bar::Message::QueryChanged(query)) => {
                self.filter.set_query(query);
                self.refresh();
                Command::none()
            }
            Message::Search(search_bar::Message::ResetRequested) => {
                self.search.clear();
                self.filter.set_query("");
                self.filter.toggle_tag(None);
                self.tags.set_selected(None);
                self.refresh();
                Command::none()
            }
            Message::Search(m) => self.search.update(m).map(Message::Search),

            Message::Tags(tag_bar::Message::ChipPressed(chip)) => {
                self.filter.toggle_tag(chip.as_deref());
                self.tags.set_selected(self.filter.selected_tag.clone());
                self.refresh();
                Command::none()
            }
            Message::Tags(m) => self.tags.update(m).map(Message::Tags),

            Message::List(song_list::Message::Activated(id)) => self.copy(id),
            Message::List(song_list::Message::PlayRequested(id)) => {
                Command::message(Message::Play(id))
            }
            Message::List(m) => self.list.update(m).map(Message::List),

            Message::CopyFinished(id, outcome) => self.copy_finished(id, outcome),
            Message::FlashExpired(id, token) => {
                self.flash.expire(id, token);
                self.list.set_flash(self.flash.active());
                Command::none()
            }

            // Outbound variants are intercepted by the app before
            // delegation; reaching here means nobody was listening.
            Message::Announce(_) | Message::Play(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let [search_area, tag_area, list_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .areas(area);

        self.search.view(frame, search_area);
        self.tags.view(frame, tag_area);

        if self.list.is_empty() {
            // Empty state belongs to the page, not the renderer: "nothing
            // matched" versus "nothing loaded" differ only in wording.
            let message = if self.library.is_empty() {
                "歌单还没有内容"
            } else {
                "没有找到匹配的歌曲"
            };
            let lines = vec![
                Line::from(""),
                Line::styled("♪", self.theme.dim_style()).centered(),
                Line::styled(message, self.theme.dim_style()).centered(),
            ];
            frame.render_widget(Paragraph::new(lines), list_area);
        } else {
            self.list.view(frame, list_area);
        }
    }

    fn focused(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::FakeClipboard;
    use crate::theme::ThemeMode;
    use crate::toast::ToastKind;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    const DATA: &str = r#"[
        {"title":"大鱼","artist":"Vsinger","date":"2024-03-01","tags":["中文"]},
        {"title":"Bad apple","artist":"Vsinger","date":"2024-02-14","tags":["日文"]},
        {"title":"起风了","artist":"买辣椒也用券","date":"2024-05-20","tags":["中文","流行"]}
    ]"#;

    fn page() -> MusicPage {
        page_with(FakeClipboard { fail: false })
    }

    fn page_with(clipboard: FakeClipboard) -> MusicPage {
        MusicPage::new(
            Arc::new(Library::from_json(DATA).unwrap()),
            Arc::new(clipboard),
            Theme::of(ThemeMode::Angel),
        )
    }

    /// Send a message and feed any chained notification messages back in,
    /// the way the runtime would.
    fn send(page: &mut MusicPage, msg: Message) {
        let cmd = page.update(msg);
        for follow_up in cmd.into_messages() {
            send(page, follow_up);
        }
    }

    fn type_query(page: &mut MusicPage, text: &str) {
        for ch in text.chars() {
            send(
                page,
                Message::Search(search_bar::Message::KeyPress(KeyEvent::new(
                    KeyCode::Char(ch),
                    KeyModifiers::NONE,
                ))),
            );
        }
    }

    #[test]
    fn typing_filters_and_clearing_restores() {
        let mut page = page();
        assert_eq!(page.filtered_len(), 3);

        type_query(&mut page, "dayu");
        assert_eq!(page.filtered_len(), 1);

        for _ in 0..4 {
            send(
                &mut page,
                Message::Search(search_bar::Message::KeyPress(KeyEvent::new(
                    KeyCode::Backspace,
                    KeyModifiers::NONE,
                ))),
            );
        }
        assert_eq!(page.filtered_len(), 3);
    }

    #[test]
    fn tag_chip_toggles_selection() {
        let mut page = page();
        page.update(Message::Tags(tag_bar::Message::ChipPressed(Some(
            "中文".to_string(),
        ))));
        assert_eq!(page.selected_tag(), Some("中文"));
        assert_eq!(page.filtered_len(), 2);

        // Pressing the active chip clears it.
        page.update(Message::Tags(tag_bar::Message::ChipPressed(Some(
            "中文".to_string(),
        ))));
        assert_eq!(page.selected_tag(), None);
        assert_eq!(page.filtered_len(), 3);

        // And 全部 clears unconditionally.
        page.update(Message::Tags(tag_bar::Message::ChipPressed(Some(
            "日文".to_string(),
        ))));
        page.update(Message::Tags(tag_bar::Message::ChipPressed(None)));
        assert_eq!(page.selected_tag(), None);
        assert_eq!(page.filtered_len(), 3);
    }

    #[test]
    fn esc_resets_query_and_tag_together() {
        let mut page = page();
        type_query(&mut page, "vsinger");
        page.update(Message::Tags(tag_bar::Message::ChipPressed(Some(
            "中文".to_string(),
        ))));
        assert_eq!(page.filtered_len(), 1);

        page.update(Message::Search(search_bar::Message::ResetRequested));
        assert_eq!(page.query(), "");
        assert_eq!(page.selected_tag(), None);
        assert_eq!(page.filtered_len(), 3);
    }

    #[test]
    fn successful_copy_flashes_and_announces() {
        let mut page = page();
        let cmd = page.update(Message::CopyFinished(SongId(0), Ok(())));
        assert!(page.flash_active() == Some(SongId(0)));

        let msgs = cmd.into_messages();
        assert!(msgs.iter().any(|m| matches!(
            m,
            Message::Announce(toast)
                if toast.kind == ToastKind::Success && toast.title == "已复制: 大鱼"
        )));
    }

    #[test]
    fn failed_copy_announces_without_flashing() {
        let mut page = page_with(FakeClipboard { fail: true });
        let cmd = page.update(Message::CopyFinished(
            SongId(0),
            Err(ClipboardError("denied".to_string())),
        ));
        assert_eq!(page.flash_active(), None);

        let msgs = cmd.into_messages();
        assert!(msgs.iter().any(|m| matches!(
            m,
            Message::Announce(toast)
                if toast.kind == ToastKind::Error && toast.title == "复制失败，请重试"
        )));
    }

    #[test]
    fn newer_copy_supersedes_older_flash() {
        let mut page = page();
        page.update(Message::CopyFinished(SongId(0), Ok(())));
        page.update(Message::CopyFinished(SongId(1), Ok(())));
        assert_eq!(page.flash_active(), Some(SongId(1)));

        // Song 0's timer fires late: it must not clear song 1's flash.
        page.update(Message::FlashExpired(SongId(0), 1));
        assert_eq!(page.flash_active(), Some(SongId(1)));

        page.update(Message::FlashExpired(SongId(1), 2));
        assert_eq!(page.flash_active(), None);
    }

    #[test]
    fn activation_reaches_the_clipboard_flow() {
        let mut page = page();
        // Row activation produces the async copy command (a future — not
        // inspectable here), and the completion path is covered above.
        let cmd = page.update(Message::List(song_list::Message::Activated(SongId(2))));
        assert!(!cmd.is_none());
        assert!(cmd.into_message().is_none());
    }

    #[test]
    fn play_request_is_forwarded_upward() {
        let mut page = page();
        let cmd = page.update(Message::List(song_list::Message::PlayRequested(SongId(1))));
        assert!(matches!(
            cmd.into_message(),
            Some(Message::Play(SongId(1)))
        ));
    }
}
