//! Throttled execution: run immediately, then drop calls for a cool-down.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::timer::{Scheduler, TimerHandle, TokioScheduler};

/// Cool-down state for a throttler.
struct CoolDown {
    active: bool,
    timer: Option<TimerHandle>,
}

/// Executes an action at most once per cool-down window.
///
/// The first call to [`invoke`](Throttler::invoke) runs the action
/// synchronously in the caller's stack and starts the cool-down; calls
/// arriving while the cool-down is active are dropped entirely, arguments
/// included. Once the window elapses the next call executes immediately
/// and restarts the cycle.
///
/// A zero window disables throttling: every call executes.
pub struct Throttler<T> {
    limit: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    scheduler: Arc<dyn Scheduler>,
    cool_down: Arc<Mutex<CoolDown>>,
}

impl<T: Send + 'static> Throttler<T> {
    /// Create a throttler running on the tokio scheduler.
    pub fn new(limit: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self::with_scheduler(limit, action, Arc::new(TokioScheduler))
    }

    /// Create a throttler with an explicit scheduler.
    pub fn with_scheduler(
        limit: Duration,
        action: impl Fn(T) + Send + Sync + 'static,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            limit,
            action: Arc::new(action),
            scheduler,
            cool_down: Arc::new(Mutex::new(CoolDown {
                active: false,
                timer: None,
            })),
        }
    }

    /// Execute the action with `args` unless the cool-down is active.
    ///
    /// Dropped calls do not run the action and their arguments are lost;
    /// they are never queued.
    pub fn invoke(&self, args: T) {
        if self.limit.is_zero() {
            (self.action)(args);
            return;
        }

        {
            let mut cool_down = self.cool_down.lock();
            if cool_down.active {
                return;
            }
            cool_down.active = true;

            let shared = Arc::clone(&self.cool_down);
            cool_down.timer = Some(self.scheduler.schedule_after(
                self.limit,
                Box::new(move || {
                    let mut cool_down = shared.lock();
                    cool_down.active = false;
                    cool_down.timer = None;
                }),
            ));
        }

        // Executed outside the lock so the action sees the same direct-call
        // semantics as an unthrottled invocation.
        (self.action)(args);
    }

    /// Whether the cool-down is currently active.
    pub fn is_cooling(&self) -> bool {
        self.cool_down.lock().active
    }

    /// The configured cool-down window.
    pub fn limit(&self) -> Duration {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_throttler(limit: Duration) -> (Throttler<u32>, Arc<Mutex<Vec<u32>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let throttler = Throttler::new(limit, move |args: u32| sink.lock().push(args));
        (throttler, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_call_executes_synchronously() {
        let (throttler, calls) = recording_throttler(Duration::from_millis(100));

        throttler.invoke(1);
        // No yielding has happened: the call ran in this stack.
        assert_eq!(*calls.lock(), vec![1]);
        assert!(throttler.is_cooling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_yields_exactly_one_execution() {
        let (throttler, calls) = recording_throttler(Duration::from_millis(100));

        for value in [1, 2, 3, 4, 5] {
            throttler.invoke(value);
        }

        // Only the first call of the burst ran, with its own arguments.
        assert_eq!(*calls.lock(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_after_window_executes_again() {
        let (throttler, calls) = recording_throttler(Duration::from_millis(100));

        throttler.invoke(1);
        tokio::time::sleep(Duration::from_millis(101)).await;
        throttler.invoke(2);

        assert_eq!(*calls.lock(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_calls_are_not_queued() {
        let (throttler, calls) = recording_throttler(Duration::from_millis(100));

        throttler.invoke(1);
        throttler.invoke(2);

        // After the window, nothing fires on its own; the dropped call is gone.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*calls.lock(), vec![1]);
        assert!(!throttler.is_cooling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_restarts_after_each_window() {
        let (throttler, calls) = recording_throttler(Duration::from_millis(50));

        throttler.invoke(1);
        throttler.invoke(2);
        tokio::time::sleep(Duration::from_millis(51)).await;
        throttler.invoke(3);
        throttler.invoke(4);
        tokio::time::sleep(Duration::from_millis(51)).await;
        throttler.invoke(5);

        assert_eq!(*calls.lock(), vec![1, 3, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_limit_is_unthrottled() {
        let (throttler, calls) = recording_throttler(Duration::ZERO);

        for value in [1, 2, 3] {
            throttler.invoke(value);
        }

        assert_eq!(*calls.lock(), vec![1, 2, 3]);
        assert!(!throttler.is_cooling());
    }
}
