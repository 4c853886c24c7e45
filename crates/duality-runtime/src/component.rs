use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a caller-supplied [`Rect`].
///
/// Identical in spirit to [`Model`](crate::Model), except the parent decides
/// *where* the component draws by handing [`view`](Component::view) an area.
/// The page-level models in the application are built from components: the
/// song list, the search bar, the tag chip row, the player bar, the toaster.
///
/// # Composition
///
/// Wrap the child's message type in a parent variant and lift commands with
/// [`Command::map`]:
///
/// ```rust,ignore
/// enum Msg { List(song_list::Message), /* … */ }
///
/// fn update(&mut self, msg: Msg) -> Command<Msg> {
///     match msg {
///         // Intercept the variants that concern the parent…
///         Msg::List(song_list::Message::Activated(id)) => self.copy(id),
///         // …delegate the rest.
///         Msg::List(m) => self.list.update(m).map(Msg::List),
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type; parents wrap it in one of
    /// their own variants to route events.
    type Message: Send + 'static;

    /// Process a message exactly like [`Model::update`](crate::Model::update).
    /// The parent lifts the returned command with [`Command::map`].
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations confine themselves to the given
    /// rectangle.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Subscriptions this component needs; the parent collects and maps
    /// them into its own [`Model::subscriptions`](crate::Model::subscriptions).
    /// Defaults to none.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Input-routing hint: whether this component currently has focus.
    fn focused(&self) -> bool {
        false
    }
}
