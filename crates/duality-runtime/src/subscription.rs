use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A long-lived event source managed by the runtime.
///
/// Declared in [`Model::subscriptions`](crate::Model::subscriptions) and
/// started/stopped by diffing: after every update the runtime compares the
/// declared set against the running set, spawns the new ones, and aborts
/// the removed ones. This is how the player's progress timer runs only
/// while a track is actually playing.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) spawn: Box<dyn FnOnce(mpsc::UnboundedSender<Msg>) -> AbortHandle + Send>,
}

/// Identity for diffing subscriptions between update cycles: a Rust
/// [`TypeId`] plus a numeric discriminant so multiple sources of the same
/// type can coexist.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    discriminant: u64,
}

impl SubscriptionId {
    /// Create an ID from a type and a numeric discriminant.
    pub fn new<T: 'static>(discriminant: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant,
        }
    }

    /// Create an ID from a type alone (for singletons).
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant: 0,
        }
    }

    /// Create an ID from a type and a string discriminant.
    pub fn with_str<T: 'static>(s: &str) -> Self {
        let mut hasher = std::hash::DefaultHasher::new();
        s.hash(&mut hasher);
        Self {
            type_id: TypeId::of::<T>(),
            discriminant: hasher.finish(),
        }
    }
}

/// A type that produces a stream of values. The runtime calls
/// [`stream`](SubscriptionSource::stream) once when the subscription first
/// appears and drops the stream when it disappears from the declared set.
pub trait SubscriptionSource: Send + 'static {
    /// The value type this source emits.
    type Output: Send + 'static;

    /// Unique ID for this subscription instance.
    fn id(&self) -> SubscriptionId;

    /// Create the stream of values.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Turn a [`SubscriptionSource`] into a [`Subscription`] by spawning a task
/// that forwards each emitted value to the runtime's message channel.
pub fn subscribe<S>(source: S) -> Subscription<S::Output>
where
    S: SubscriptionSource,
    S::Output: Send + 'static,
{
    let id = source.id();
    Subscription {
        id,
        spawn: Box::new(move |tx| {
            let handle = tokio::spawn(async move {
                let mut stream = source.stream();
                while let Some(msg) = stream.next().await {
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            });
            handle.abort_handle()
        }),
    }
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Create from a raw stream and id.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Subscription {
            id,
            spawn: Box::new(move |tx| {
                let handle = tokio::spawn(async move {
                    let mut stream = stream;
                    while let Some(msg) = stream.next().await {
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                });
                handle.abort_handle()
            }),
        }
    }

    /// Lift the message type into a parent's (component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        let f = std::sync::Arc::new(f);
        Subscription {
            id: self.id,
            spawn: Box::new(move |new_tx: mpsc::UnboundedSender<NewMsg>| {
                let (inner_tx, mut inner_rx) = mpsc::unbounded_channel::<Msg>();
                let abort = (self.spawn)(inner_tx);

                tokio::spawn(async move {
                    while let Some(msg) = inner_rx.recv().await {
                        if new_tx.send(f(msg)).is_err() {
                            break;
                        }
                    }
                });

                // Aborting the source drops inner_tx; the mapper task then
                // drains and ends on its own.
                abort
            }),
        }
    }
}

/// Tracks the running subscriptions and reconciles them against each newly
/// declared set.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    active: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            active: HashMap::new(),
            msg_tx,
        }
    }

    /// Start new subscriptions, stop removed ones, keep unchanged ones.
    pub fn reconcile(&mut self, new_subs: Vec<Subscription<Msg>>) {
        let mut declared: HashMap<SubscriptionId, Subscription<Msg>> = HashMap::new();
        for sub in new_subs {
            declared.insert(sub.id.clone(), sub);
        }

        let to_remove: Vec<SubscriptionId> = self
            .active
            .keys()
            .filter(|id| !declared.contains_key(id))
            .cloned()
            .collect();
        for id in to_remove {
            if let Some(handle) = self.active.remove(&id) {
                handle.abort();
            }
        }

        for (id, sub) in declared {
            if !self.active.contains_key(&id) {
                let handle = (sub.spawn)(self.msg_tx.clone());
                self.active.insert(id, handle);
            }
        }
    }

    /// Abort everything (program shutdown).
    pub fn shutdown(&mut self) {
        for (_, handle) in self.active.drain() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_compare_by_type_and_discriminant() {
        assert_eq!(SubscriptionId::of::<String>(), SubscriptionId::of::<String>());
        assert_ne!(SubscriptionId::of::<String>(), SubscriptionId::of::<i32>());
        assert_ne!(
            SubscriptionId::new::<String>(1),
            SubscriptionId::new::<String>(2)
        );
        assert_eq!(
            SubscriptionId::with_str::<String>("player-progress"),
            SubscriptionId::with_str::<String>("player-progress")
        );
        assert_ne!(
            SubscriptionId::with_str::<String>("player-progress"),
            SubscriptionId::with_str::<String>("toast-expiry")
        );
    }

    fn pending_sub(id: SubscriptionId) -> Subscription<i32> {
        let stream: BoxStream<'static, i32> = Box::pin(futures::stream::pending());
        Subscription::from_stream(id, stream)
    }

    #[tokio::test]
    async fn reconcile_starts_and_stops() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![pending_sub(SubscriptionId::of::<String>())]);
        assert_eq!(manager.active_count(), 1);

        // Same id declared again: kept, not restarted.
        manager.reconcile(vec![pending_sub(SubscriptionId::of::<String>())]);
        assert_eq!(manager.active_count(), 1);

        // Declared empty: stopped.
        manager.reconcile(vec![]);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn shutdown_aborts_everything() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![
            pending_sub(SubscriptionId::new::<String>(1)),
            pending_sub(SubscriptionId::new::<String>(2)),
        ]);
        assert_eq!(manager.active_count(), 2);

        manager.shutdown();
        assert_eq!(manager.active_count(), 0);
    }
}
