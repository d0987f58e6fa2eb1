/// Completion join: counts outstanding walk units and lets one waiter
/// block until every unit (including units spawned by units) has finished.
///
/// A unit registers *before* it is spawned and deregisters by dropping its
/// [`UnitGuard`]. Because a parent registers each child while still holding
/// its own guard, the count reaches zero exactly once, after the last unit.
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct CompletionJoin {
    outstanding: AtomicUsize,
    lock: Mutex<()>,
    drained: Condvar,
}

impl CompletionJoin {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register one unit of work. Dropping the guard marks it finished.
    pub fn register(self: &Arc<Self>) -> UnitGuard {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        UnitGuard {
            join: Arc::clone(self),
        }
    }

    /// Number of units registered but not yet finished.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Block until the outstanding count is zero.
    pub fn wait(&self) {
        let mut guard = self.lock.lock();
        while self.outstanding.load(Ordering::Acquire) != 0 {
            self.drained.wait(&mut guard);
        }
    }

    fn finish_one(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "completion join underflow");
        if previous == 1 {
            // Take the lock so the notification cannot slip in between the
            // waiter's check and its wait.
            let _guard = self.lock.lock();
            self.drained.notify_all();
        }
    }
}

/// Proof of one registered unit. Finishes the unit on drop, including
/// during unwinding.
#[derive(Debug)]
#[must_use = "dropping the guard immediately marks the unit finished"]
pub struct UnitGuard {
    join: Arc<CompletionJoin>,
}

impl Drop for UnitGuard {
    fn drop(&mut self) {
        self.join.finish_one();
    }
}
