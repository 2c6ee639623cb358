//! Timed polling with tri-state results.
//!
//! A poller owns a fixed refresh schedule for one fetch operation and
//! retains the latest outcome. Consumers observe the state through a watch
//! channel and never see a half-updated cycle: success and failure each
//! replace the whole state.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

/// Outcome of the most recent poll cycle.
///
/// `loading` is true only before the first cycle completes. After that,
/// exactly one of `data` or `error` is set at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct PollState<T> {
    data: Option<T>,
    error: Option<String>,
    loading: bool,
}

impl<T> PollState<T> {
    /// The state before the first cycle has completed.
    pub fn loading() -> Self {
        Self { data: None, error: None, loading: true }
    }

    /// A completed cycle that produced data.
    pub fn success(data: T) -> Self {
        Self { data: Some(data), error: None, loading: false }
    }

    /// A completed cycle that failed.
    pub fn failure(message: impl Into<String>) -> Self {
        Self { data: None, error: Some(message.into()), loading: false }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last successful result, if the most recent cycle succeeded.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// The error message, if the most recent cycle failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Handle for a running poller.
///
/// Dropping the handle stops the schedule, same as calling [`stop`].
///
/// [`stop`]: PollHandle::stop
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use labwatch_client::PollHandle;
///
/// # tokio_test::block_on(async {
/// let handle = PollHandle::spawn(
///     || async { Ok::<_, std::io::Error>(42u32) },
///     Duration::from_secs(30),
/// );
///
/// let state = handle.state();
/// if let Some(value) = state.data() {
///     println!("latest: {value}");
/// }
/// handle.stop();
/// # });
/// ```
#[derive(Debug)]
pub struct PollHandle<T> {
    state: watch::Receiver<PollState<T>>,
    stop: watch::Sender<bool>,
}

impl<T: Clone + Send + Sync + 'static> PollHandle<T> {
    /// Start polling `fetch` now and then every `interval`.
    ///
    /// The first invocation happens immediately. Ticks follow a fixed
    /// schedule regardless of how long each fetch takes; a fetch slower
    /// than the interval overlaps with the next one, and the state reflects
    /// whichever completion lands last. Every tick is attempted - there is
    /// no backoff and no retry cutoff, the next tick is the retry.
    pub fn spawn<F, Fut, E>(fetch: F, interval: Duration) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (state_tx, state_rx) = watch::channel(PollState::loading());
        let (stop_tx, stop_rx) = watch::channel(false);

        let state_tx = Arc::new(state_tx);
        let fetch = Arc::new(fetch);
        let mut driver_stop = stop_rx.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let fetch = fetch.clone();
                        let state_tx = state_tx.clone();
                        let stop = stop_rx.clone();

                        // Each tick runs independently so a slow fetch
                        // never delays the schedule.
                        tokio::spawn(async move {
                            let result = fetch().await;

                            // A result that lands after stop() is discarded,
                            // never written back.
                            if *stop.borrow() {
                                debug!("discarding poll result after stop");
                                return;
                            }

                            let next = match result {
                                Ok(data) => PollState::success(data),
                                Err(e) => PollState::failure(e.to_string()),
                            };
                            let _ = state_tx.send(next);
                        });
                    }
                    changed = driver_stop.changed() => {
                        if changed.is_err() || *driver_stop.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        Self { state: state_rx, stop: stop_tx }
    }

    /// Snapshot of the latest state.
    pub fn state(&self) -> PollState<T> {
        self.state.borrow().clone()
    }

    /// A receiver for awaiting state changes.
    pub fn subscribe(&self) -> watch::Receiver<PollState<T>> {
        self.state.clone()
    }

    /// Cancel the schedule. In-flight fetches are discarded on completion.
    pub fn stop(self) {
        let _ = self.stop.send(true);
    }
}

impl<T> Drop for PollHandle<T> {
    // Dropping must set the stop flag, not just close the channel, so
    // that in-flight fetches see it and discard their results.
    fn drop(&mut self) {
        let _ = self.stop.send(true);
    }
}
