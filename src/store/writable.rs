use std::fmt;
use std::sync::{Arc, RwLock};

use super::readable::Readable;
use super::subscribers::{read, write, Subscribers};
use super::subscription::Subscription;

/// A settable reactive container.
///
/// Every [`set`](Self::set) or [`update`](Self::update) replaces the
/// value and synchronously notifies all subscribers before returning.
/// Clones share the same state.
///
/// # Examples
///
/// ```
/// use post_store::{Readable, Writable};
/// use std::sync::{Arc, Mutex};
///
/// let count = Writable::new(0);
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sub = count.subscribe({
///     let seen = seen.clone();
///     move |value: &i32| seen.lock().unwrap().push(*value)
/// });
///
/// count.set(1);
/// sub.unsubscribe();
/// count.set(2);
///
/// assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
/// assert_eq!(count.get(), 2);
/// ```
pub struct Writable<T> {
    value: Arc<RwLock<T>>,
    subscribers: Arc<Subscribers<T>>,
}

impl<T: Clone + Send + Sync + 'static> Writable<T> {
    /// Create a new container with the given initial value.
    pub fn new(initial: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(initial)),
            subscribers: Arc::new(Subscribers::new()),
        }
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, new_value: T) {
        let snapshot = {
            let mut value = write(&self.value);
            *value = new_value;
            value.clone()
        };
        self.subscribers.notify(snapshot);
    }

    /// Mutate the value in place and notify subscribers.
    ///
    /// `f` runs under the write lock; it must not touch this container.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let snapshot = {
            let mut value = write(&self.value);
            f(&mut *value);
            value.clone()
        };
        self.subscribers.notify(snapshot);
    }

    /// Number of callbacks currently registered.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Writable<T> {
    /// Replace the value only if it differs from the current one.
    ///
    /// Returns whether subscribers were notified.
    pub fn set_if_changed(&self, new_value: T) -> bool {
        {
            let mut value = write(&self.value);
            if *value == new_value {
                return false;
            }
            *value = new_value.clone();
        }
        self.subscribers.notify(new_value);
        true
    }
}

impl<T: Clone + Send + Sync + 'static> Readable<T> for Writable<T> {
    fn get(&self) -> T {
        read(&self.value).clone()
    }

    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = read(&self.value);
        f(&*value)
    }

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        let id = self.subscribers.add(callback.clone());
        tracing::trace!(subscriber = id, "subscribed");

        // Release the read lock before running user code
        let current = self.get();
        callback(&current);

        Subscription::new(&self.subscribers, id)
    }
}

impl<T> Clone for Writable<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Default for Writable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Writable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writable")
            .field("value", &*read(&self.value))
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
