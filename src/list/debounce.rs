//! Search-as-you-type debouncing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Delays free-text input until typing pauses for `window`.
///
/// Every call to [`Debouncer::input`] replaces the pending single-shot timer.
/// The committed value is published on a `watch` channel; dropping the
/// debouncer aborts the timer so nothing is committed after disposal.
pub struct Debouncer {
    window: Duration,
    sender: Arc<watch::Sender<String>>,
    receiver: watch::Receiver<String>,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration, initial: impl Into<String>) -> Self {
        let (sender, receiver) = watch::channel(initial.into());
        Self {
            window,
            sender: Arc::new(sender),
            receiver,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records a keystroke. Must be called from within a tokio runtime.
    pub fn input(&mut self, text: impl Into<String>) {
        self.cancel();

        let text = text.into();
        let sender = Arc::clone(&self.sender);
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            sender.send_if_modified(|committed| {
                if *committed == text {
                    false
                } else {
                    *committed = text;
                    true
                }
            });
        }));
    }

    /// Aborts the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Last committed value.
    pub fn committed(&self) -> String {
        self.receiver.borrow().clone()
    }

    /// Returns a newly committed value without waiting.
    pub fn take_committed(&mut self) -> Option<String> {
        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    /// Waits for the next committed value.
    pub async fn changed(&mut self) -> Option<String> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::{Instant, sleep};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_the_final_keystroke_is_committed() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300), "");

        for text in ["a", "ad", "ada"] {
            debouncer.input(text);
            sleep(Duration::from_millis(100)).await;
            assert_eq!(debouncer.take_committed(), None);
        }
        let last_input = Instant::now();

        assert_eq!(debouncer.changed().await.as_deref(), Some("ada"));
        assert!(last_input.elapsed() >= Duration::from_millis(200));
        assert_eq!(debouncer.take_committed(), None);
        assert_eq!(debouncer.committed(), "ada");
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_the_field_commits_an_empty_value() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE, "ada");

        debouncer.input("");
        assert_eq!(debouncer.changed().await.as_deref(), Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn retyping_the_committed_value_does_not_notify() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE, "ada");

        debouncer.input("ada");
        sleep(DEFAULT_DEBOUNCE * 2).await;
        assert_eq!(debouncer.take_committed(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_commits() {
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE, "");

        debouncer.input("ada");
        assert!(debouncer.is_pending());
        debouncer.cancel();
        sleep(DEFAULT_DEBOUNCE * 2).await;

        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.take_committed(), None);
        assert_eq!(debouncer.committed(), "");
    }
}
