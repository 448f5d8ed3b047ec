use super::derived::Derived;
use super::subscription::Subscription;

/// A reactive container whose value can be read and observed.
///
/// Implemented by [`Writable`](super::Writable) and [`Derived`].
pub trait Readable<T: Clone + Send + Sync + 'static> {
    /// Get a clone of the current value.
    fn get(&self) -> T;

    /// Read the current value with a function without cloning.
    ///
    /// The container's read lock is held while `f` runs, so `f` must not
    /// `set` or `update` the same container. Use [`get`](Self::get) for
    /// code that may write back.
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R;

    /// Register `callback`.
    ///
    /// The callback is invoked once immediately with the current value
    /// and again after every change, until the returned handle is released.
    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static;

    /// Create a read-only container holding `f` applied to this one's value.
    fn map<U, F>(&self, f: F) -> Derived<U>
    where
        Self: Sized,
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        Derived::new(self, f)
    }
}
