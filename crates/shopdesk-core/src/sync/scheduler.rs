// ── Periodic background refresh ──
//
// One Tokio task per scheduler. The task refreshes immediately, then
// sleeps `interval` after each completed refresh, so a slow refresh
// pushes the next one back instead of stacking up behind it.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;

#[derive(Default)]
struct Shared {
    trigger: Notify,
    in_flight: AtomicBool,
    completed: AtomicU64,
}

/// Runs a refresh on a fixed period until stopped.
///
/// At most one refresh is in flight at any time. Failures are handed to
/// the result sink and never end the schedule. Dropping the scheduler
/// stops it.
pub struct PollingScheduler {
    cancel: CancellationToken,
    shared: Arc<Shared>,
    handle: JoinHandle<()>,
}

impl PollingScheduler {
    /// Start polling. Must be called from within a Tokio runtime.
    ///
    /// `on_result` receives each refresh result; errors arrive wrapped in
    /// [`CoreError::RefreshFailed`].
    pub fn start<R, Fut, F, S>(interval: Duration, refresh: F, on_result: S) -> Self
    where
        R: Send + 'static,
        Fut: Future<Output = Result<R, CoreError>> + Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        S: FnMut(Result<R, CoreError>) + Send + 'static,
    {
        Self::start_with_token(CancellationToken::new(), interval, refresh, on_result)
    }

    /// Like [`start`](Self::start), driven by a caller-owned token.
    /// `stop()` cancels `cancel`, so a refresh future holding a clone can
    /// check liveness before applying its own side effects.
    pub fn start_with_token<R, Fut, F, S>(
        cancel: CancellationToken,
        interval: Duration,
        refresh: F,
        on_result: S,
    ) -> Self
    where
        R: Send + 'static,
        Fut: Future<Output = Result<R, CoreError>> + Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        S: FnMut(Result<R, CoreError>) + Send + 'static,
    {
        let shared = Arc::new(Shared::default());
        let handle = tokio::spawn(poll_loop(
            Arc::clone(&shared),
            cancel.clone(),
            interval,
            refresh,
            on_result,
        ));
        tracing::debug!(interval = ?interval, "polling started");

        Self {
            cancel,
            shared,
            handle,
        }
    }

    /// Ask for a refresh now instead of waiting for the next tick.
    ///
    /// Returns `false` (and does nothing) when a refresh is already in
    /// flight or the scheduler is stopped.
    pub fn refresh_now(&self) -> bool {
        if !self.is_running() || self.shared.in_flight.load(Ordering::Acquire) {
            return false;
        }
        self.shared.trigger.notify_one();
        true
    }

    /// Stop polling. A refresh in flight runs to completion, but its
    /// result never reaches the sink.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!("polling stopped");
        }
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }

    pub fn is_refreshing(&self) -> bool {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Number of refreshes whose result reached the sink.
    pub fn refresh_count(&self) -> u64 {
        self.shared.completed.load(Ordering::Acquire)
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop<R, Fut, F, S>(
    shared: Arc<Shared>,
    cancel: CancellationToken,
    interval: Duration,
    mut refresh: F,
    mut on_result: S,
) where
    Fut: Future<Output = Result<R, CoreError>>,
    F: FnMut() -> Fut,
    S: FnMut(Result<R, CoreError>),
{
    loop {
        shared.in_flight.store(true, Ordering::Release);
        let result = refresh().await;
        shared.in_flight.store(false, Ordering::Release);

        // Liveness check: a result that lands after stop() is dropped.
        if cancel.is_cancelled() {
            tracing::debug!("refresh finished after stop; result dropped");
            break;
        }

        shared.completed.fetch_add(1, Ordering::AcqRel);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "refresh failed; polling continues");
        }
        on_result(result.map_err(CoreError::refresh_failed));

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = shared.trigger.notified() => {}
            () = tokio::time::sleep(interval) => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use tokio::time::Instant;

    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_immediately_then_every_interval() {
        let count = Arc::new(AtomicUsize::new(0));
        let scheduler = PollingScheduler::start(
            secs(30),
            {
                let count = Arc::clone(&count);
                move || {
                    count.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<_, CoreError>(()) }
                }
            },
            |_| {},
        );

        tokio::time::sleep(secs(95)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert_eq!(scheduler.refresh_count(), 4);
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_refresh_never_overlaps() {
        let origin = Instant::now();
        let starts = Arc::new(Mutex::new(Vec::new()));
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let _scheduler = PollingScheduler::start(
            secs(10),
            {
                let starts = Arc::clone(&starts);
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                move || {
                    starts.lock().unwrap().push(origin.elapsed().as_secs());
                    let active = Arc::clone(&active);
                    let peak = Arc::clone(&peak);
                    async move {
                        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(secs(50)).await;
                        active.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, CoreError>(())
                    }
                }
            },
            |_| {},
        );

        tokio::time::sleep(secs(125)).await;
        assert_eq!(*starts.lock().unwrap(), vec![0, 60, 120]);
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_polling() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let scheduler = PollingScheduler::start(
            secs(1),
            || async { Err::<(), _>(CoreError::Timeout) },
            {
                let errors = Arc::clone(&errors);
                move |result: Result<(), CoreError>| {
                    if let Err(e) = result {
                        errors.lock().unwrap().push(e);
                    }
                }
            },
        );

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| matches!(
            e,
            CoreError::RefreshFailed { source } if matches!(**source, CoreError::Timeout)
        )));
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_lets_in_flight_refresh_finish_but_drops_result() {
        let delivered = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));
        let scheduler = PollingScheduler::start(
            secs(1),
            {
                let finished = Arc::clone(&finished);
                move || {
                    let finished = Arc::clone(&finished);
                    async move {
                        tokio::time::sleep(secs(10)).await;
                        finished.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, CoreError>(())
                    }
                }
            },
            {
                let delivered = Arc::clone(&delivered);
                move |_| {
                    delivered.fetch_add(1, Ordering::SeqCst);
                }
            },
        );

        tokio::time::sleep(secs(5)).await;
        assert!(scheduler.is_refreshing());
        scheduler.stop();

        tokio::time::sleep(secs(20)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert_eq!(delivered.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.refresh_count(), 0);
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_now_skips_while_in_flight() {
        let count = Arc::new(AtomicUsize::new(0));
        let scheduler = PollingScheduler::start(
            secs(3600),
            {
                let count = Arc::clone(&count);
                move || {
                    count.fetch_add(1, Ordering::SeqCst);
                    async {
                        tokio::time::sleep(secs(2)).await;
                        Ok::<_, CoreError>(())
                    }
                }
            },
            |_| {},
        );

        tokio::time::sleep(secs(1)).await;
        assert!(!scheduler.refresh_now());

        tokio::time::sleep(secs(2)).await;
        assert!(scheduler.refresh_now());
        tokio::time::sleep(secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn parent_cancellation_stops_scheduler() {
        let parent = CancellationToken::new();
        let scheduler = PollingScheduler::start_with_token(
            parent.child_token(),
            secs(1),
            || async { Ok::<_, CoreError>(()) },
            |_| {},
        );
        assert!(scheduler.is_running());

        parent.cancel();
        assert!(!scheduler.is_running());
    }
}
