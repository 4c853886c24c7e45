//! Clipboard access behind a service trait.
//!
//! The copy side effect is the one fallible, asynchronous operation in the
//! whole request flow, so it gets a seam: the real implementation talks to
//! the system clipboard on the blocking pool; tests substitute a canned
//! outcome. Failures are recovered at the call site and surfaced only as a
//! toast — never propagated, never fatal.

use futures::future::BoxFuture;

/// Why a clipboard write failed (wayland without a compositor, no display
/// server, denied access…). Carried into the failure toast.
#[derive(Debug, Clone, thiserror::Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

/// Asynchronous text-to-clipboard capability.
pub trait ClipboardService: Send + Sync + 'static {
    fn write_text(&self, text: String) -> BoxFuture<'static, Result<(), ClipboardError>>;
}

/// The real system clipboard via `arboard`, run on the blocking pool so the
/// event loop never waits on a display-server round trip.
pub struct SystemClipboard;

impl ClipboardService for SystemClipboard {
    fn write_text(&self, text: String) -> BoxFuture<'static, Result<(), ClipboardError>> {
        Box::pin(async move {
            let result = tokio::task::spawn_blocking(move || {
                arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text))
            })
            .await;
            match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(err)) => Err(ClipboardError(err.to_string())),
                Err(join_err) => Err(ClipboardError(join_err.to_string())),
            }
        })
    }
}

/// Test double with a fixed outcome.
#[cfg(test)]
pub struct FakeClipboard {
    pub fail: bool,
}

#[cfg(test)]
impl ClipboardService for FakeClipboard {
    fn write_text(&self, _text: String) -> BoxFuture<'static, Result<(), ClipboardError>> {
        let outcome = if self.fail {
            Err(ClipboardError("denied".to_string()))
        } else {
            Ok(())
        };
        Box::pin(std::future::ready(outcome))
    }
}
