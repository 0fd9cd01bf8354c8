//! Trailing-edge debouncing on tokio timers.

use crate::OrCancelExt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio::time::sleep_until;
use tokio_util::sync::CancellationToken;

/// Emits a value once it has stayed unchanged for the quiet interval.
///
/// Every [`observe`](Self::observe) with a new value restarts the timer and
/// drops the previously pending value. Nothing is emitted on the leading
/// edge. Dropping the debouncer cancels the pending timer.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer<T> {
    quiet: Duration,
    tx: mpsc::UnboundedSender<T>,
    shared: Arc<Mutex<Shared>>,
    pending: Option<Pending<T>>,
}

struct Pending<T> {
    value: T,
    token: CancellationToken,
}

#[derive(Default)]
struct Shared {
    generation: u64,
    armed: bool,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            quiet,
            tx,
            shared: Arc::new(Mutex::new(Shared::default())),
            pending: None,
        };
        (debouncer, rx)
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet
    }

    pub fn observe(&mut self, value: T) {
        let generation = {
            let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
            if shared.armed
                && self
                    .pending
                    .as_ref()
                    .is_some_and(|pending| pending.value == value)
            {
                return;
            }
            shared.generation += 1;
            shared.armed = true;
            shared.generation
        };
        if let Some(previous) = self.pending.take() {
            previous.token.cancel();
        }

        let token = CancellationToken::new();
        let deadline = Instant::now() + self.quiet;
        let tx = self.tx.clone();
        let shared = Arc::clone(&self.shared);
        let child = token.clone();
        let emitted = value.clone();
        tokio::spawn(async move {
            if sleep_until(deadline).or_cancel(&child).await.is_err() {
                return;
            }
            // Generation check and send happen under the lock so a
            // concurrent `observe` can never let a superseded value through.
            let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if shared.generation != generation || child.is_cancelled() {
                return;
            }
            shared.armed = false;
            let _ = tx.send(emitted);
        });
        self.pending = Some(Pending { value, token });
    }

    /// Drops the pending value, if any, without emitting it.
    pub fn cancel(&mut self) {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        shared.generation += 1;
        shared.armed = false;
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .armed
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
        }
    }
}
