//! Reactive containers.
//!
//! - [`Writable`]: a value with `set`/`update` that notifies subscribers
//! - [`Derived`]: a read-only value recomputed from an upstream container
//! - [`Readable`]: the read/subscribe interface both implement
//! - [`Subscription`]: the handle returned by `subscribe`

mod derived;
mod readable;
mod subscribers;
mod subscription;
mod writable;

pub use derived::{derived, Derived};
pub use readable::Readable;
pub use subscription::Subscription;
pub use writable::Writable;
