//! Cancellable timer scheduling.
//!
//! The rate-limiting utilities and overlay lifecycles only need two
//! primitives from the host: run a callback after a delay, and cancel a
//! callback that has not fired yet. This module defines that seam and a
//! tokio-backed implementation of it.

use std::time::Duration;

use tokio::task::AbortHandle;

/// Handle to a scheduled callback.
///
/// Cancelling after the callback has run is a no-op. Dropping the handle
/// does NOT cancel the timer; an armed callback still fires.
pub struct TimerHandle {
    abort: AbortHandle,
}

impl TimerHandle {
    /// Cancel the scheduled callback if it has not fired yet.
    pub fn cancel(&self) {
        self.abort.abort();
    }
}

/// Scheduling seam for deferred callbacks.
///
/// Implementations must never run the callback within the caller's
/// synchronous stack, even for a zero delay.
pub trait Scheduler: Send + Sync {
    /// Schedule `callback` to run once after `delay`.
    fn schedule_after(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> TimerHandle;
}

/// Scheduler backed by the tokio runtime.
///
/// Each scheduled callback is a spawned task that sleeps for the delay and
/// then runs. Spawning guarantees the callback resumes on a later turn of
/// the event loop regardless of the delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> TimerHandle {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });

        TimerHandle {
            abort: task.abort_handle(),
        }
    }
}
