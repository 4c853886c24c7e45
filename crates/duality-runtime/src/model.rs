use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application trait: an **init → update → view** cycle in
/// the style of the Elm architecture.
///
/// 1. [`init`](Model::init) builds the initial state from [`Flags`](Model::Flags)
///    and may return a [`Command`] for startup work.
/// 2. [`view`](Model::view) renders the current state into a ratatui frame.
/// 3. Events arrive as messages through [`Subscription`]s (terminal input,
///    timers) or as the results of earlier commands.
/// 4. [`update`](Model::update) consumes one message at a time, mutates
///    state, and returns the next [`Command`].
///
/// Messages are processed strictly one at a time on the event loop, so an
/// `update` implementation never races with itself; anything slow must be
/// pushed out through a command instead of blocking.
///
/// ```rust,ignore
/// struct Player { playing: bool }
///
/// enum Msg { Toggle }
///
/// impl Model for Player {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<Msg>) {
///         (Player { playing: false }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Toggle => self.playing = !self.playing,
///         }
///         Command::none()
///     }
///
///     fn view(&self, frame: &mut Frame) {
///         // draw the transport bar…
///     }
/// }
/// ```
pub trait Model: Sized + Send + 'static {
    /// The application's message type. Every event that can change state is
    /// a variant of this type.
    type Message: Send + 'static;

    /// Startup data passed to [`Model::init`] — loaded configuration, the
    /// song library, injected services. Use `()` when nothing is needed.
    type Flags: Send + 'static;

    /// Create the initial model and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Process one message, mutate state, return a command for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the current state. Should be a pure function of `&self`.
    fn view(&self, frame: &mut Frame);

    /// Declare the event sources that should be live given the current
    /// state. Called after every update; the runtime diffs the returned set
    /// against the active one, starting new sources and cancelling removed
    /// ones. Defaults to none.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
