use crate::command::{Action, Command, CommandInner, TerminalCommand};
use crate::model::Model;
use crate::subscription::SubscriptionManager;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stderr, stdout, Stderr, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Output target for the terminal UI.
///
/// Rendering goes to **stdout** by default; switch to
/// [`Stderr`](OutputTarget::Stderr) when stdout is piped so the UI still
/// reaches the terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout (default).
    #[default]
    Stdout,
    /// Write to stderr (useful when stdout is piped).
    Stderr,
}

/// Writer wrapping either stdout or stderr.
enum Output {
    Stdout(Stdout),
    Stderr(Stderr),
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(w) => w.write(buf),
            Output::Stderr(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(w) => w.flush(),
            Output::Stderr(w) => w.flush(),
        }
    }
}

impl Output {
    fn new(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stdout => Output::Stdout(stdout()),
            OutputTarget::Stderr => Output::Stderr(stderr()),
        }
    }
}

/// Errors from initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for a [`Program`]. Every field has a sensible default;
/// override with struct-update syntax:
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     title: Some("duality".into()),
///     mouse_capture: true,
///     log_file: std::env::var_os("DUALITY_LOG").map(Into::into),
///     ..ProgramOptions::default()
/// };
/// ```
pub struct ProgramOptions {
    /// Target frames per second (default: 60, clamped to 1..=120).
    pub fps: u32,
    /// Start in the alternate screen (default: true).
    pub alt_screen: bool,
    /// Capture mouse events — wheel scrolling and clicks (default: false).
    pub mouse_capture: bool,
    /// Set the terminal title at startup.
    pub title: Option<String>,
    /// Catch panics and restore the terminal first (default: true).
    pub catch_panics: bool,
    /// Exit gracefully on ctrl-c (default: true).
    pub handle_signals: bool,
    /// Append-mode debug log file. The only sane way to log from a TUI —
    /// writing to the screen would fight the renderer.
    pub log_file: Option<std::path::PathBuf>,
    /// Output target: stdout (default) or stderr.
    pub output: OutputTarget,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse_capture: false,
            title: None,
            catch_panics: true,
            handle_signals: true,
            log_file: None,
            output: OutputTarget::default(),
        }
    }
}

/// Cloneable handle to a running [`Program`]: inject messages from outside
/// the event loop, or force an exit.
#[derive(Clone)]
pub struct ProgramHandle<Msg: Send + 'static> {
    msg_tx: mpsc::UnboundedSender<Msg>,
    killed: Arc<AtomicBool>,
}

impl<Msg: Send + 'static> ProgramHandle<Msg> {
    /// Enqueue a message for the next loop iteration. Silently does nothing
    /// once the program has exited.
    pub fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    /// Force the program to exit at the next opportunity, skipping any
    /// remaining queued messages.
    pub fn kill(&self) {
        self.killed.store(true, Ordering::SeqCst);
    }
}

/// The program runtime: terminal setup, the event loop, and the full
/// [`Model`] lifecycle. Runs until the model returns [`Command::quit()`]
/// or the process receives ctrl-c.
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let final_model = Program::<App>::new(flags)?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Output>>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    subscription_manager: SubscriptionManager<M::Message>,
    options: ProgramOptions,
    needs_redraw: bool,
    should_quit: bool,
    killed: Arc<AtomicBool>,
    log_file: Option<std::fs::File>,
}

impl<M: Model> Program<M> {
    /// Create a program with default options. Fails if terminal
    /// initialization fails.
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a program with custom options.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let log_file = match options.log_file {
            Some(ref path) => Some(log_to_file(path)?),
            None => None,
        };

        let (model, init_cmd) = M::init(flags);

        let terminal = init_terminal(&options)?;
        let subscription_manager = SubscriptionManager::new(msg_tx.clone());
        let killed = Arc::new(AtomicBool::new(false));

        let mut program = Self {
            model,
            terminal,
            msg_tx,
            msg_rx,
            subscription_manager,
            options,
            needs_redraw: true,
            should_quit: false,
            killed,
            log_file,
        };

        program.debug_log("program initialized");
        program.execute_command(init_cmd);

        let subs = program.model.subscriptions();
        program.subscription_manager.reconcile(subs);

        Ok(program)
    }

    /// Get a sender for external message injection.
    pub fn sender(&self) -> mpsc::UnboundedSender<M::Message> {
        self.msg_tx.clone()
    }

    /// Get a handle for external control (send messages, force-kill).
    pub fn handle(&self) -> ProgramHandle<M::Message> {
        ProgramHandle {
            msg_tx: self.msg_tx.clone(),
            killed: self.killed.clone(),
        }
    }

    /// Run the program. Blocks until quit; returns the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        self.event_loop().await?;

        self.debug_log("shutting down");
        self.subscription_manager.shutdown();
        restore_terminal(&self.options)?;

        Ok(self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        // Initial render
        self.render()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let handle_signals = self.options.handle_signals;

        loop {
            if self.killed.load(Ordering::SeqCst) {
                return Ok(());
            }

            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    self.debug_log("received ctrl+c signal");
                    self.should_quit = true;
                    return Ok(());
                }

                Some(msg) = self.msg_rx.recv() => {
                    self.process_message(msg);

                    // Micro-batch: drain briefly so a burst of scroll events
                    // becomes one redraw, not a redraw per event.
                    let deadline = Instant::now() + Duration::from_micros(100);
                    let mut batch_count = 0u32;
                    while Instant::now() < deadline && batch_count < 100 {
                        match self.msg_rx.try_recv() {
                            Ok(msg) => {
                                self.process_message(msg);
                                batch_count += 1;
                            }
                            Err(_) => break,
                        }
                    }

                    if self.should_quit || self.killed.load(Ordering::SeqCst) {
                        return Ok(());
                    }
                }

                _ = frame_interval.tick() => {
                    if self.needs_redraw {
                        self.render()?;
                        self.needs_redraw = false;
                    }
                }
            }
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_command(cmd);

        let subs = self.model.subscriptions();
        self.subscription_manager.reconcile(subs);

        self.needs_redraw = true;
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => {
                self.should_quit = true;
            }
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let msg = fut.await;
                    let _ = tx.send(msg);
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
            CommandInner::Sequence(cmds) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    for cmd in cmds {
                        execute_command_sequential(cmd, &tx).await;
                    }
                });
            }
            CommandInner::Terminal(tcmd) => {
                self.execute_terminal_command(tcmd);
            }
        }
    }

    fn execute_terminal_command(&mut self, cmd: TerminalCommand) {
        let mut writer = Output::new(self.options.output);
        match cmd {
            TerminalCommand::EnterAltScreen => {
                execute!(writer, EnterAlternateScreen).ok();
            }
            TerminalCommand::ExitAltScreen => {
                execute!(writer, LeaveAlternateScreen).ok();
            }
            TerminalCommand::EnableMouseCapture => {
                execute!(writer, EnableMouseCapture).ok();
            }
            TerminalCommand::DisableMouseCapture => {
                execute!(writer, DisableMouseCapture).ok();
            }
            TerminalCommand::ShowCursor => {
                execute!(writer, cursor::Show).ok();
            }
            TerminalCommand::HideCursor => {
                execute!(writer, cursor::Hide).ok();
            }
            TerminalCommand::SetTitle(title) => {
                execute!(writer, SetTitle(title)).ok();
            }
            TerminalCommand::ClearScreen => {
                execute!(
                    writer,
                    crossterm::terminal::Clear(crossterm::terminal::ClearType::All)
                )
                .ok();
            }
        }
    }

    /// Write a debug message to the log file, if configured.
    fn debug_log(&mut self, msg: &str) {
        if let Some(ref mut f) = self.log_file {
            let _ = writeln!(f, "{msg}");
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| {
            self.model.view(frame);
        })?;
        Ok(())
    }
}

/// Execute one command of a `Command::sequence`, awaiting async work so the
/// next command starts only after this one's messages are delivered.
fn execute_command_sequential<Msg: Send + 'static>(
    cmd: Command<Msg>,
    tx: &mpsc::UnboundedSender<Msg>,
) -> futures::future::BoxFuture<'_, ()> {
    Box::pin(async move {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                let _ = tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => {
                // Quit from inside a sequence would need a control channel;
                // models quit from update() instead.
            }
            CommandInner::Future(fut) => {
                let msg = fut.await;
                let _ = tx.send(msg);
            }
            CommandInner::Batch(cmds) => {
                // A batch nested in a sequence still runs concurrently
                // within itself.
                let handles: Vec<_> = cmds
                    .into_iter()
                    .map(|cmd| {
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            execute_command_sequential(cmd, &tx).await;
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.await.ok();
                }
            }
            CommandInner::Sequence(cmds) => {
                for cmd in cmds {
                    execute_command_sequential(cmd, tx).await;
                }
            }
            CommandInner::Terminal(_) => {
                // Terminal commands need the program's writer; not
                // supported from a sequential context.
            }
        }
    })
}

fn init_terminal(
    options: &ProgramOptions,
) -> Result<Terminal<CrosstermBackend<Output>>, ProgramError> {
    // Panic hook that restores the terminal first (installed once).
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let alt_screen = options.alt_screen;
        let output_target = options.output;
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal_minimal(alt_screen, output_target);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = Output::new(options.output);

    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if options.mouse_capture {
        execute!(writer, EnableMouseCapture)?;
    }
    if let Some(ref title) = options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;

    let backend = CrosstermBackend::new(writer);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(options: &ProgramOptions) -> Result<(), ProgramError> {
    restore_terminal_minimal(options.alt_screen, options.output)?;
    Ok(())
}

fn restore_terminal_minimal(
    alt_screen: bool,
    output_target: OutputTarget,
) -> Result<(), std::io::Error> {
    // Best-effort cleanup: keep going even if individual steps fail, so as
    // much terminal state as possible is restored.
    let r1 = disable_raw_mode();
    let mut writer = Output::new(output_target);
    execute!(writer, DisableMouseCapture).ok();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    r1
}

/// Open an append-mode log file for debugging the TUI.
///
/// ```no_run
/// use duality_runtime::runtime::log_to_file;
/// use std::io::Write;
///
/// let mut f = log_to_file("debug.log").unwrap();
/// writeln!(f, "debug message").unwrap();
/// ```
pub fn log_to_file(path: impl AsRef<std::path::Path>) -> Result<std::fs::File, std::io::Error> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}
