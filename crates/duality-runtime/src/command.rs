use futures::future::BoxFuture;
use std::future::Future;

/// A side effect returned from [`Model::update`](crate::Model::update) or
/// [`Model::init`](crate::Model::init).
///
/// State transitions themselves are synchronous; anything that leaves the
/// update cycle — a clipboard write, a delayed timer message, quitting —
/// is described as a `Command` and executed by the runtime. The update
/// function stays a pure-ish state machine while the edges do the I/O.
///
/// ```rust,ignore
/// // Write to the clipboard off the event loop, then report back:
/// Command::perform(clipboard.write_text(text), move |outcome| {
///     Msg::CopyFinished(id, outcome)
/// })
///
/// // Clear a row flash after its display window:
/// Command::tick(FLASH_DURATION, move |_| Msg::FlashExpired(id, token))
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Action(Action<Msg>),
    Future(BoxFuture<'static, Msg>),
    Batch(Vec<Command<Msg>>),
    Sequence(Vec<Command<Msg>>),
    Terminal(TerminalCommand),
}

/// Side-effect-free actions the runtime handles inline, without spawning.
pub enum Action<Msg> {
    /// Deliver a message on the next loop iteration.
    Message(Msg),
    /// Quit the program.
    Quit,
}

/// Terminal management commands executed by the runtime.
///
/// Only the handful of operations this application actually drives; sent
/// through [`Command::terminal`] or the convenience constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Switch to the alternate screen buffer.
    EnterAltScreen,
    /// Return to the primary screen buffer.
    ExitAltScreen,
    /// Capture mouse events (wheel scrolling, row clicks).
    EnableMouseCapture,
    /// Stop capturing mouse events.
    DisableMouseCapture,
    /// Make the terminal cursor visible.
    ShowCursor,
    /// Hide the terminal cursor.
    HideCursor,
    /// Set the terminal window title.
    SetTitle(String),
    /// Clear the entire screen.
    ClearScreen,
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Run an async future and map its output to a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command {
            inner: CommandInner::Future(Box::pin(async move { map(future.await) })),
        }
    }

    /// Deliver a message immediately (no async hop).
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Action(Action::Message(msg)),
        }
    }

    /// Quit the program.
    pub fn quit() -> Self {
        Command {
            inner: CommandInner::Action(Action::Quit),
        }
    }

    /// Run several commands concurrently.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().unwrap(),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Run commands one after another; each command's messages are
    /// delivered before the next command starts.
    pub fn sequence(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().unwrap(),
            _ => Command {
                inner: CommandInner::Sequence(cmds),
            },
        }
    }

    /// One-shot timer: fires once after `duration`. This is how transient
    /// UI state (row flashes, toast dismissal) gets its expiry message;
    /// pair it with a generation token so a superseded timer is ignored.
    pub fn tick(
        duration: std::time::Duration,
        map: impl FnOnce(std::time::Instant) -> Msg + Send + 'static,
    ) -> Self {
        Command {
            inner: CommandInner::Future(Box::pin(async move {
                tokio::time::sleep(duration).await;
                map(std::time::Instant::now())
            })),
        }
    }

    /// Terminal management command.
    pub fn terminal(cmd: TerminalCommand) -> Self {
        Command {
            inner: CommandInner::Terminal(cmd),
        }
    }

    /// Lift this command into a parent message type (component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_with(std::sync::Arc::new(f))
    }

    fn map_with<NewMsg: Send + 'static>(
        self,
        f: std::sync::Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Action(Action::Message(msg)) => Command::message(f(msg)),
            CommandInner::Action(Action::Quit) => Command::quit(),
            CommandInner::Future(fut) => Command {
                inner: CommandInner::Future(Box::pin(async move { f(fut.await) })),
            },
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(
                    cmds.into_iter().map(|cmd| cmd.map_with(f.clone())).collect(),
                ),
            },
            CommandInner::Sequence(cmds) => Command {
                inner: CommandInner::Sequence(
                    cmds.into_iter().map(|cmd| cmd.map_with(f.clone())).collect(),
                ),
            },
            CommandInner::Terminal(tcmd) => Command::terminal(tcmd),
        }
    }

    // Convenience terminal command constructors.

    /// Switch to the alternate screen buffer.
    pub fn enter_alt_screen() -> Self {
        Command::terminal(TerminalCommand::EnterAltScreen)
    }

    /// Return to the primary screen buffer.
    pub fn exit_alt_screen() -> Self {
        Command::terminal(TerminalCommand::ExitAltScreen)
    }

    /// Capture mouse events.
    pub fn enable_mouse_capture() -> Self {
        Command::terminal(TerminalCommand::EnableMouseCapture)
    }

    /// Stop capturing mouse events.
    pub fn disable_mouse_capture() -> Self {
        Command::terminal(TerminalCommand::DisableMouseCapture)
    }

    /// Make the terminal cursor visible.
    pub fn show_cursor() -> Self {
        Command::terminal(TerminalCommand::ShowCursor)
    }

    /// Hide the terminal cursor.
    pub fn hide_cursor() -> Self {
        Command::terminal(TerminalCommand::HideCursor)
    }

    /// Set the terminal window title.
    pub fn set_title(title: impl Into<String>) -> Self {
        Command::terminal(TerminalCommand::SetTitle(title.into()))
    }

    /// Clear the entire screen.
    pub fn clear_screen() -> Self {
        Command::terminal(TerminalCommand::ClearScreen)
    }

    // --- Inspection methods (used heavily in tests) ---

    /// Returns `true` if this is a no-op command.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// If this command is an immediate message action, return it.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Action(Action::Message(msg)) => Some(msg),
            _ => None,
        }
    }

    /// If this command is a batch, return the inner commands.
    pub fn into_batch(self) -> Option<Vec<Command<Msg>>> {
        match self.inner {
            CommandInner::Batch(cmds) => Some(cmds),
            _ => None,
        }
    }

    /// Collect every immediate message in this command, descending into
    /// batches and sequences. Async futures are skipped.
    pub fn into_messages(self) -> Vec<Msg> {
        let mut out = Vec::new();
        self.collect_messages(&mut out);
        out
    }

    fn collect_messages(self, out: &mut Vec<Msg>) {
        match self.inner {
            CommandInner::Action(Action::Message(msg)) => out.push(msg),
            CommandInner::Batch(cmds) | CommandInner::Sequence(cmds) => {
                for cmd in cmds {
                    cmd.collect_messages(out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_none() {
        let cmd: Command<()> = Command::none();
        assert!(cmd.is_none());
    }

    #[test]
    fn message_round_trips() {
        let cmd: Command<i32> = Command::message(42);
        assert_eq!(cmd.into_message(), Some(42));
    }

    #[test]
    fn quit_is_not_a_message() {
        let cmd: Command<i32> = Command::quit();
        assert!(matches!(cmd.inner, CommandInner::Action(Action::Quit)));
    }

    #[test]
    fn empty_batch_collapses_to_none() {
        let cmd: Command<()> = Command::batch(vec![]);
        assert!(cmd.is_none());
    }

    #[test]
    fn single_element_batch_unwraps() {
        let cmd: Command<i32> = Command::batch(vec![Command::message(7)]);
        assert_eq!(cmd.into_message(), Some(7));
    }

    #[test]
    fn batch_keeps_all_commands() {
        let cmd: Command<i32> = Command::batch(vec![Command::message(1), Command::message(2)]);
        assert_eq!(cmd.into_batch().map(|b| b.len()), Some(2));
    }

    #[test]
    fn map_rewrites_messages_and_preserves_the_rest() {
        let cmd: Command<i32> = Command::message(42);
        assert_eq!(cmd.map(|n| n.to_string()).into_message(), Some("42".into()));

        let cmd: Command<i32> = Command::quit();
        assert!(matches!(
            cmd.map(|n| n.to_string()).inner,
            CommandInner::Action(Action::Quit)
        ));

        let cmd: Command<i32> = Command::set_title("duality");
        match cmd.map(|n| n.to_string()).inner {
            CommandInner::Terminal(TerminalCommand::SetTitle(t)) => assert_eq!(t, "duality"),
            _ => panic!("terminal command lost in map"),
        }
    }

    #[test]
    fn into_messages_descends_into_nesting() {
        let cmd: Command<i32> = Command::batch(vec![
            Command::message(1),
            Command::sequence(vec![Command::message(2), Command::message(3)]),
            Command::hide_cursor(),
        ]);
        assert_eq!(cmd.into_messages(), vec![1, 2, 3]);
    }
}
