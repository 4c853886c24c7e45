//! Built-in subscription sources: terminal input and timers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::EventStream;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId, SubscriptionSource};

/// Marker type identifying the (singleton) terminal input subscription.
pub struct TerminalEvents;

/// Subscribe to terminal input, mapping each event through `map`.
///
/// Return `Some(msg)` to forward an event into the update cycle, `None` to
/// drop it. The `EventStream` is created lazily inside the spawned task;
/// creating it eagerly would touch crossterm's global event reader on every
/// `subscriptions()` call and interfere with the stream already polling it.
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let id = SubscriptionId::of::<TerminalEvents>();
    let map = Arc::new(map);

    Subscription {
        id,
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| -> AbortHandle {
            let handle = tokio::spawn(async move {
                let stream = EventStream::new().filter_map(move |result| {
                    let map = map.clone();
                    async move {
                        match result {
                            Ok(event) => map(TerminalEvent::from(event)),
                            Err(_) => None,
                        }
                    }
                });
                futures::pin_mut!(stream);
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

/// A repeating timer emitting the current [`Instant`] at a fixed interval.
///
/// The string id keeps distinct timers apart in the reconciler — e.g. the
/// player's 1-second progress timer versus a spinner's frame timer.
///
/// ```rust,ignore
/// subscribe(Every::new(Duration::from_secs(1), "player-progress"))
///     .map(|_| Msg::ProgressTick)
/// ```
pub struct Every {
    pub interval: Duration,
    pub id: &'static str,
}

impl Every {
    pub fn new(interval: Duration, id: &'static str) -> Self {
        Self { interval, id }
    }
}

impl SubscriptionSource for Every {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::with_str::<Self>(self.id)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let stream =
            tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(self.interval))
                .map(|tick| tick.into_std());
        Box::pin(stream)
    }
}

/// A one-shot delay: emits a single [`Instant`] after `duration`, then the
/// stream completes. Prefer [`Command::tick`](crate::Command::tick) for
/// fire-and-forget expiries; `After` is for delays that must be cancellable
/// by dropping out of the declared subscription set.
pub struct After {
    pub duration: Duration,
}

impl After {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl SubscriptionSource for After {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::new::<Self>(self.duration.as_nanos() as u64)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let stream = futures::stream::once(async move {
            tokio::time::sleep(self.duration).await;
            Instant::now()
        });
        Box::pin(stream)
    }
}
