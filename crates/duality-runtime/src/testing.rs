use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;
use unicode_width::UnicodeWidthStr;

/// A headless harness that drives a [`Model`] without a terminal.
///
/// Lets plain `#[test]` functions exercise the whole init/update/view cycle:
/// no tokio runtime, no TTY. Synchronous commands ([`Command::message`])
/// are collected into a queue flushed by
/// [`drain_messages`](TestProgram::drain_messages); async and terminal
/// commands are ignored — tests inject their completion messages directly,
/// which is also how stale-timer scenarios are simulated.
///
/// ```rust,ignore
/// let mut prog = TestProgram::<App>::new(flags);
/// prog.send(Msg::Music(music::Message::QueryChanged("dayu".into())));
/// prog.drain_messages();
/// let screen = prog.render_string(80, 24);
/// assert!(screen.contains("大鱼"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
}

impl<M: Model> TestProgram<M> {
    /// Call [`Model::init`] with the given flags; queue any synchronous
    /// commands it produced.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
        };
        program.collect_sync_messages(init_cmd);
        program
    }

    /// Send one message through [`Model::update`], queueing any synchronous
    /// follow-up commands.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect_sync_messages(cmd);
    }

    /// Flush the pending queue until no new synchronous messages appear —
    /// the way to test `Command::message` chains across components.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect_sync_messages(cmd);
            }
        }
    }

    /// Shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable reference for arranging state outside the message cycle.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render to a ratatui [`Buffer`] of the given dimensions for
    /// cell-level inspection.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                self.model.view(frame);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    /// Render and return the visible content as a plain string, rows
    /// separated by newlines.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        let buf = self.render(width, height);
        let area = Rect::new(0, 0, width, height);
        let mut output = String::new();
        for y in area.top()..area.bottom() {
            // A wide glyph occupies several columns: ratatui stores it in the
            // first cell and leaves the continuation cells empty (their
            // `symbol()` reads back as a space). Emitting those would splice a
            // phantom space into the middle of every CJK title, so advance
            // past them by the glyph's display width.
            let mut skip = 0usize;
            for x in area.left()..area.right() {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                let symbol = buf[(x, y)].symbol();
                output.push_str(symbol);
                skip = symbol.width().saturating_sub(1);
            }
            if y < area.bottom() - 1 {
                output.push('\n');
            }
        }
        output
    }

    fn collect_sync_messages(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                self.pending_messages.push(msg);
            }
            CommandInner::Action(Action::Quit) => {}
            CommandInner::Batch(cmds) | CommandInner::Sequence(cmds) => {
                for cmd in cmds {
                    self.collect_sync_messages(cmd);
                }
            }
            // Async work cannot run synchronously in tests; inject the
            // completion message with `send` instead.
            CommandInner::Future(_) => {}
            CommandInner::Terminal(_) => {}
        }
    }
}
