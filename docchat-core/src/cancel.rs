//! Cooperative cancellation for streaming answers.

use std::sync::Arc;

use tokio::sync::watch;

/// A clone-able cancellation token.
///
/// One token (and its clones) represents a single logical request. The
/// caller keeps a clone and calls [`cancel`](CancelToken::cancel); the
/// answer orchestrator polls [`is_cancelled`](CancelToken::is_cancelled)
/// between tokens, and providers can race [`cancelled`](CancelToken::cancelled)
/// against their next network read. Cancellation is cooperative and
/// irreversible: once fired, every clone observes it.
///
/// # Example
///
/// ```rust,ignore
/// let cancel = CancelToken::new();
/// let stream = pipeline.stream_answer(doc_id, question, &history, cancel.clone()).await?;
/// // later, from another task:
/// cancel.cancel();
/// ```
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    /// Create a new, un-cancelled token.
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self { sender: Arc::new(sender), receiver }
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.sender.send(true);
    }

    /// Synchronously check whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Wait until cancellation is signalled.
    ///
    /// Resolves immediately if the token is already cancelled. Intended for
    /// `tokio::select!` races against slow I/O.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        // The sender lives inside this token, so wait_for cannot observe a
        // closed channel while we borrow self.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_is_visible_to_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        token.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_resolves_for_waiter_registered_before_cancel() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        // Give the waiter a chance to register.
        tokio::task::yield_now().await;
        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        token.cancelled().await;
    }
}
