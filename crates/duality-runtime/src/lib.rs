//! Event-driven runtime for the **duality** terminal app.
//!
//! The application is expressed as an [Elm Architecture] cycle — a pure
//! **init → update → view** loop with side effects pushed to the edges as
//! [`Command`]s and long-lived event sources as [`Subscription`]s. The
//! runtime owns the terminal, delivers input, timers, and async results as
//! messages, and repaints after each update.
//!
//! Nothing in here knows about songs; the application crates sit on top.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view) |
//! | [`Component`] | Reusable sub-model rendering into a [`ratatui::layout::Rect`] |
//! | [`Command`] | A side effect for the runtime to execute (async work, timers, quit) |
//! | [`Subscription`] | Long-lived event source (terminal input, repeating timers) |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for unit tests |
//!
//! # Concurrency model
//!
//! Messages are processed one at a time; `update` never blocks. An async
//! command suspends only its own continuation — scrolling and typing stay
//! live while, say, a clipboard write is in flight — and its completion
//! re-enters the loop as an ordinary message.
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod sources;
pub mod subscription;
pub mod testing;

pub use command::{Command, TerminalCommand};
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{log_to_file, OutputTarget, Program, ProgramError, ProgramHandle, ProgramOptions};
pub use sources::{terminal_events, After, Every};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};

/// Run an application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
