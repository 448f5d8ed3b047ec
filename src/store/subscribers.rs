use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Entry<T> {
    id: usize,
    // Cleared on removal so a round already in flight skips the callback
    live: Arc<AtomicBool>,
    callback: Callback<T>,
}

/// Registered callbacks of one reactive container, plus the queue of
/// values still waiting to be delivered to them.
pub(crate) struct Subscribers<T> {
    next_id: AtomicUsize,
    entries: RwLock<Vec<Entry<T>>>,
    pending: Mutex<VecDeque<T>>,
    draining: AtomicBool,
}

impl<T> Subscribers<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(0),
            entries: RwLock::new(Vec::new()),
            pending: Mutex::new(VecDeque::new()),
            draining: AtomicBool::new(false),
        }
    }

    /// Register a callback and return its id.
    pub(crate) fn add(&self, callback: Callback<T>) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        write(&self.entries).push(Entry {
            id,
            live: Arc::new(AtomicBool::new(true)),
            callback,
        });
        id
    }

    /// Remove a callback. Returns false if it was already gone.
    pub(crate) fn remove(&self, id: usize) -> bool {
        let removed = {
            let mut entries = write(&self.entries);
            entries
                .iter()
                .position(|entry| entry.id == id)
                .map(|index| entries.remove(index))
        };
        // Dropped outside the lock: a callback's captures may touch the store
        match removed {
            Some(entry) => {
                entry.live.store(false, Ordering::Release);
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        read(&self.entries).len()
    }

    /// Deliver `value` to every registered callback.
    ///
    /// If a delivery round is already running (a callback called `set`
    /// on the same container), the value is queued and the running round
    /// delivers it once the current value has reached every callback.
    pub(crate) fn notify(&self, value: T) {
        lock(&self.pending).push_back(value);

        loop {
            if self.draining.swap(true, Ordering::AcqRel) {
                return;
            }

            {
                let _draining = DrainGuard(&self.draining);
                while let Some(value) = self.pop() {
                    // Snapshot so callbacks may subscribe or unsubscribe freely
                    let callbacks: Vec<(Arc<AtomicBool>, Callback<T>)> = read(&self.entries)
                        .iter()
                        .map(|entry| (Arc::clone(&entry.live), Arc::clone(&entry.callback)))
                        .collect();
                    for (live, callback) in callbacks {
                        if live.load(Ordering::Acquire) {
                            callback(&value);
                        }
                    }
                }
            }

            // Another thread may have queued a value after our last pop
            if lock(&self.pending).is_empty() {
                return;
            }
        }
    }

    fn pop(&self) -> Option<T> {
        lock(&self.pending).pop_front()
    }
}

/// Clears the draining flag even if a callback panics.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// A panicking callback must not wedge the store for everyone else, so
// poisoned locks hand back their data.

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let subscribers: Subscribers<i32> = Subscribers::new();
        let a = subscribers.add(Arc::new(|_: &i32| {}));
        let b = subscribers.add(Arc::new(|_: &i32| {}));
        assert_ne!(a, b);
        assert_eq!(subscribers.len(), 2);

        assert!(subscribers.remove(a));
        assert!(!subscribers.remove(a));
        assert_eq!(subscribers.len(), 1);
    }

    #[test]
    fn notify_reaches_every_callback() {
        let subscribers: Subscribers<i32> = Subscribers::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in 0..3 {
            let seen = Arc::clone(&seen);
            subscribers.add(Arc::new(move |value: &i32| {
                seen.lock().unwrap().push((tag, *value));
            }));
        }

        subscribers.notify(7);

        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn removed_mid_round_is_skipped() {
        let subscribers: Arc<Subscribers<i32>> = Arc::new(Subscribers::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let victim = Arc::new(AtomicUsize::new(usize::MAX));

        subscribers.add(Arc::new({
            let subscribers = Arc::downgrade(&subscribers);
            let victim = victim.clone();
            move |_: &i32| {
                if let Some(subscribers) = subscribers.upgrade() {
                    subscribers.remove(victim.load(Ordering::SeqCst));
                }
            }
        }));
        let id = subscribers.add(Arc::new({
            let calls = calls.clone();
            move |_: &i32| {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        }));
        victim.store(id, Ordering::SeqCst);

        subscribers.notify(1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(subscribers.len(), 1);
    }
}
