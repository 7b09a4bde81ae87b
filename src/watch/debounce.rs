use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Trailing debounce over a single timer
///
/// Every [`call`](Debouncer::call) cancels and reschedules the one pending
/// deadline, so a rapid-fire burst collapses to a single downstream send
/// carrying the value of the last call. At most one send happens per quiet
/// period. Live caption lines mutate on every character, so without this
/// every keystroke-level change would become its own translation request.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer that forwards the surviving value of each burst
    /// into `output` after `quiet` with no further calls
    pub fn new(quiet: Duration, output: mpsc::Sender<T>) -> Self {
        let (input, mut calls) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            let mut deadline = Instant::now();

            loop {
                tokio::select! {
                    call = calls.recv() => match call {
                        Some(value) => {
                            pending = Some(value);
                            deadline = Instant::now() + quiet;
                        }
                        // Input side dropped; anything still pending is
                        // discarded with it.
                        None => break,
                    },
                    _ = sleep_until(deadline), if pending.is_some() => {
                        let value = pending.take();
                        if let Some(value) = value {
                            if output.send(value).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { input, task }
    }

    /// Record a call; never blocks the caller
    pub fn call(&self, value: T) {
        let _ = self.input.send(value);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
