//! Per-thread mutual exclusion
//!
//! One async mutex per thread ID, created on first use and dropped again
//! once nobody holds or waits on it. `tokio::sync::Mutex` queues waiters in
//! FIFO order, so events for a thread are applied in arrival order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

#[derive(Default)]
pub struct ThreadLocks {
    locks: Arc<Mutex<LockMap>>,
}

/// A claim on one thread's mutex, held while waiting and while locked.
///
/// Dropping the last claim removes the map entry, whether or not the
/// mutex was ever acquired.
struct LockSlot {
    lock: Arc<AsyncMutex<()>>,
    thread_id: String,
    locks: Arc<Mutex<LockMap>>,
}

/// Exclusive access to one thread until dropped
pub struct ThreadGuard {
    // Declared first so the mutex is released before the slot prunes
    _guard: OwnedMutexGuard<()>,
    _slot: LockSlot,
}

impl ThreadLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `thread_id`
    pub async fn acquire(&self, thread_id: &str) -> ThreadGuard {
        let slot = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            LockSlot {
                lock: Arc::clone(locks.entry(thread_id.to_string()).or_default()),
                thread_id: thread_id.to_string(),
                locks: Arc::clone(&self.locks),
            }
        };
        let guard = Arc::clone(&slot.lock).lock_owned().await;
        ThreadGuard {
            _guard: guard,
            _slot: slot,
        }
    }

    /// Number of thread locks currently tracked
    #[allow(dead_code)] // Used in tests
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for LockSlot {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only taken under this map lock, so the map's copy plus
        // ours means no other task holds or is queued on the mutex.
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.thread_id);
        }
    }
}
