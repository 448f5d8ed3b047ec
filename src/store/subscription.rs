use std::fmt;
use std::sync::{Arc, Weak};

use super::subscribers::Subscribers;

/// Handle to a registered subscriber callback.
///
/// Releasing the handle, either with [`unsubscribe`](Self::unsubscribe)
/// or by dropping it, guarantees the callback is never invoked again.
/// Use [`detach`](Self::detach) to keep the callback registered for as
/// long as the source lives.
#[must_use = "dropping a Subscription immediately unsubscribes its callback"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
    alive: Box<dyn Fn() -> bool + Send + Sync>,
}

impl Subscription {
    pub(crate) fn new<T: Send + Sync + 'static>(subscribers: &Arc<Subscribers<T>>, id: usize) -> Self {
        let weak: Weak<Subscribers<T>> = Arc::downgrade(subscribers);
        let probe = weak.clone();

        Self {
            release: Some(Box::new(move || {
                if let Some(subscribers) = weak.upgrade() {
                    if subscribers.remove(id) {
                        tracing::trace!(subscriber = id, "unsubscribed");
                    }
                }
            })),
            alive: Box::new(move || probe.upgrade().is_some()),
        }
    }

    /// Stop receiving notifications.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Leave the callback registered until the source itself is dropped.
    pub fn detach(mut self) {
        self.release = None;
    }

    /// Whether the source this subscription points at still exists.
    pub fn is_active(&self) -> bool {
        self.release.is_some() && (self.alive)()
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
