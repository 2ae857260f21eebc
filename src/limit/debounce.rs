//! Debounced execution: defer an action until a quiet window elapses.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::timer::{Scheduler, TimerHandle, TokioScheduler};

/// Pending-invocation state for a debouncer.
///
/// The generation counter ties each armed timer to the call that armed it:
/// a timer that lost the race to a newer call must not clear the slot or
/// run the action.
struct PendingSlot {
    generation: u64,
    handle: Option<TimerHandle>,
}

/// Defers an action until no new calls have arrived for the quiet window.
///
/// Each call to [`invoke`](Debouncer::invoke) cancels any previously
/// scheduled execution and schedules a new one; when the action finally
/// runs, it sees only the arguments of the last call. At most one pending
/// execution exists at any time.
///
/// There is no cancel operation beyond dropping the debouncer, and dropping
/// it leaves an already-armed timer to fire. Callers needing hard
/// cancellation must track a [`TimerHandle`] through the [`Scheduler`]
/// themselves.
pub struct Debouncer<T> {
    wait: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    scheduler: Arc<dyn Scheduler>,
    pending: Arc<Mutex<PendingSlot>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer running on the tokio scheduler.
    pub fn new(wait: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self::with_scheduler(wait, action, Arc::new(TokioScheduler))
    }

    /// Create a debouncer with an explicit scheduler.
    pub fn with_scheduler(
        wait: Duration,
        action: impl Fn(T) + Send + Sync + 'static,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            wait,
            action: Arc::new(action),
            scheduler,
            pending: Arc::new(Mutex::new(PendingSlot {
                generation: 0,
                handle: None,
            })),
        }
    }

    /// Record a call: supersede any pending execution and start a new quiet
    /// window holding this call's arguments.
    ///
    /// The action never runs within this call's stack, even with a zero
    /// quiet window.
    pub fn invoke(&self, args: T) {
        let mut pending = self.pending.lock();

        if let Some(handle) = pending.handle.take() {
            handle.cancel();
        }
        pending.generation += 1;

        let generation = pending.generation;
        let action = Arc::clone(&self.action);
        let slot = Arc::clone(&self.pending);

        pending.handle = Some(self.scheduler.schedule_after(
            self.wait,
            Box::new(move || {
                {
                    let mut slot = slot.lock();
                    if slot.generation != generation {
                        // Superseded between firing and acquiring the slot.
                        return;
                    }
                    slot.handle = None;
                }
                action(args);
            }),
        ));
    }

    /// Whether an execution is currently pending.
    pub fn has_pending(&self) -> bool {
        self.pending.lock().handle.is_some()
    }

    /// The configured quiet window.
    pub fn wait(&self) -> Duration {
        self.wait
    }
}
