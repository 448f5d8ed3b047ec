use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::readable::Readable;
use super::subscribers::{read, write, Subscribers};
use super::subscription::Subscription;

struct Shared<T> {
    value: RwLock<T>,
    subscribers: Arc<Subscribers<T>>,
}

/// A read-only container whose value is a pure function of another one.
///
/// The value is recomputed synchronously whenever the source notifies,
/// and the derived container's own subscribers are notified after the
/// recomputation completes. Dropping the last clone releases the
/// upstream subscription.
///
/// # Examples
///
/// ```
/// use post_store::{derived, Readable, Writable};
///
/// let count = Writable::new(5);
/// let doubled = derived(&count, |n: &i32| n * 2);
/// assert_eq!(doubled.get(), 10);
///
/// count.set(10);
/// assert_eq!(doubled.get(), 20);
/// ```
pub struct Derived<T> {
    shared: Arc<Shared<T>>,
    _upstream: Arc<Subscription>,
}

impl<T: Clone + Send + Sync + 'static> Derived<T> {
    pub(crate) fn new<S, R, F>(source: &R, f: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        R: Readable<S>,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        // Computed from a clone so the transform never runs under the source's lock
        let initial = f(&source.get());
        let shared = Arc::new(Shared {
            value: RwLock::new(initial),
            subscribers: Arc::new(Subscribers::new()),
        });

        // The initial call repeats the computation above; skip it
        let primed = AtomicBool::new(false);
        let target = Arc::clone(&shared);
        let upstream = source.subscribe(move |value: &S| {
            if !primed.swap(true, Ordering::AcqRel) {
                return;
            }
            let next = f(value);
            *write(&target.value) = next.clone();
            target.subscribers.notify(next);
        });

        Self {
            shared,
            _upstream: Arc::new(upstream),
        }
    }

    /// Number of callbacks currently registered.
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.len()
    }
}

/// Create a [`Derived`] container from `source` and a transform.
pub fn derived<S, T, R, F>(source: &R, f: F) -> Derived<T>
where
    S: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    R: Readable<S>,
    F: Fn(&S) -> T + Send + Sync + 'static,
{
    Derived::new(source, f)
}

impl<T: Clone + Send + Sync + 'static> Readable<T> for Derived<T> {
    fn get(&self) -> T {
        read(&self.shared.value).clone()
    }

    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = read(&self.shared.value);
        f(&*value)
    }

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        let id = self.shared.subscribers.add(callback.clone());
        tracing::trace!(subscriber = id, "subscribed to derived");

        let current = self.get();
        callback(&current);

        Subscription::new(&self.shared.subscribers, id)
    }
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            _upstream: Arc::clone(&self._upstream),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derived")
            .field("value", &*read(&self.shared.value))
            .field("subscribers", &self.shared.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Writable;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[test]
    fn derived_tracks_source() {
        let count = Writable::new(5);
        let doubled = count.map(|n: &i32| n * 2);

        assert_eq!(doubled.get(), 10);

        count.set(10);
        assert_eq!(doubled.get(), 20);
    }

    #[test]
    fn derived_of_derived() {
        let input = Writable::new(1);
        let doubled = derived(&input, |n: &i32| n * 2);
        let quadrupled = derived(&doubled, |n: &i32| n * 2);

        assert_eq!(quadrupled.get(), 4);

        input.set(5);
        assert_eq!(quadrupled.get(), 20);
    }

    #[test]
    fn transform_runs_once_per_change() {
        let source = Writable::new(1);
        let runs = Arc::new(AtomicUsize::new(0));

        let runs_clone = runs.clone();
        let _view = derived(&source, move |n: &i32| {
            runs_clone.fetch_add(1, Ordering::SeqCst);
            *n
        });
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        source.set(2);
        source.set(3);
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn subscribers_see_recomputed_value() {
        let source = Writable::new(vec![1, 2, 3]);
        let total = derived(&source, |items: &Vec<i32>| items.iter().sum::<i32>());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _sub = total.subscribe({
            let seen = seen.clone();
            let total = total.clone();
            move |value: &i32| {
                // The stored value is already updated when we are called
                assert_eq!(total.get(), *value);
                seen.lock().unwrap().push(*value);
            }
        });

        source.set(vec![10]);
        source.update(|items| items.push(5));

        assert_eq!(*seen.lock().unwrap(), vec![6, 10, 15]);
    }

    #[test]
    fn transform_may_write_back_to_source() {
        let source = Writable::new(50);
        let clamped = derived(&source, {
            let source = source.clone();
            move |n: &i32| {
                if *n > 10 {
                    source.set(10);
                }
                (*n).min(10)
            }
        });

        assert_eq!(clamped.get(), 10);
        assert_eq!(source.get(), 10);

        source.set(70);
        assert_eq!(clamped.get(), 10);
        assert_eq!(source.get(), 10);

        source.set(3);
        assert_eq!(clamped.get(), 3);
    }

    #[test]
    fn dropping_derived_releases_upstream() {
        let source = Writable::new(0);
        let view = derived(&source, |n: &i32| n + 1);
        assert_eq!(source.subscriber_count(), 1);

        let clone = view.clone();
        drop(view);
        assert_eq!(source.subscriber_count(), 1);

        drop(clone);
        assert_eq!(source.subscriber_count(), 0);
    }
}
