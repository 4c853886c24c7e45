//! The 关于 (about) page. Static content, no state — a plain render
//! function rather than a component.

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::styled("关于本站", theme.accent_style()).centered(),
        Line::from(""),
        Line::styled(
            "这是一个由粉丝维护的歌单站：收录直播中唱过的歌，",
            theme.text_style(),
        )
        .centered(),
        Line::styled(
            "支持拼音搜索与标签筛选，点击任意一行即可复制点歌指令。",
            theme.text_style(),
        )
        .centered(),
        Line::from(""),
        Line::styled("与官方无关 · 歌曲版权归原作者所有", theme.dim_style()).centered(),
        Line::from(""),
        Line::styled(
            "Tab 切换页面 · Ctrl+T 切换天使/恶魔模式 · Esc 清空筛选",
            theme.dim_style(),
        )
        .centered(),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
