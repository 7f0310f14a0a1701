//! Periodic auto-refresh.
//!
//! A [`RefreshTimer`] is a guard: while it is alive a background task calls
//! the refresh handler once per interval. Dropping the guard cancels the
//! task, so a timer can never outlive the table that owns it.

use std::fmt;
use std::time::Duration;

use log::{debug, trace, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::events::RefreshHandler;

/// Guard for a running auto-refresh task.
pub struct RefreshTimer {
    interval: Duration,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    /// Start calling `on_refresh` every `interval`.
    ///
    /// The first call happens one full interval after starting. Returns
    /// `None` when the interval is zero or when no tokio runtime is running
    /// on this thread.
    pub fn start(interval: Duration, on_refresh: RefreshHandler) -> Option<Self> {
        if interval.is_zero() {
            warn!("Refusing to start refresh timer with a zero interval");
            return None;
        }
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Auto-refresh unavailable outside a tokio runtime: {}", e);
                return None;
            }
        };

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        trace!("Auto-refresh tick");
                        on_refresh();
                    }
                }
            }
            debug!("Refresh timer stopped");
        });

        debug!("Refresh timer started ({:?})", interval);
        Some(Self {
            interval,
            cancel,
            handle,
        })
    }

    /// The interval between refresh calls.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the background task is still running.
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }

    /// Stop the timer. Same as dropping it.
    pub fn stop(self) {}
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

impl fmt::Debug for RefreshTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTimer")
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, RefreshHandler) {
        let count = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&count);
        let handler: RefreshHandler = Arc::new(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        (count, handler)
    }

    #[test]
    fn test_start_outside_runtime_is_none() {
        let (_, handler) = counter();
        assert!(RefreshTimer::start(Duration::from_secs(1), handler).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_none() {
        let (_, handler) = counter();
        assert!(RefreshTimer::start(Duration::ZERO, handler).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_every_interval() {
        let (count, handler) = counter();
        let timer = RefreshTimer::start(Duration::from_secs(10), handler).unwrap();

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (count, handler) = counter();
        let timer = RefreshTimer::start(Duration::from_secs(10), handler).unwrap();

        tokio::time::sleep(Duration::from_secs(15)).await;
        timer.stop();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
