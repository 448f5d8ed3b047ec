//! # post-store
//!
//! A reactive store for a list of posts and a derived view of their content.
//!
//! ## Store primitives
//!
//! - `Writable<T>` - A value that notifies subscribers when replaced
//! - `Derived<T>` - A read-only value recomputed from an upstream container
//! - `Subscription` - Handle that stops notifications when released
//!
//! ## Posts
//!
//! - `PostStore` - The post collection (`post_data`) wired to its content
//!   view (`posts`), with JSON loading and id-based edits
//! - `post_data()` / `posts()` - Handles on the process-wide store
//!
//! ```
//! use post_store::{Post, PostStore, Readable};
//! use serde_json::json;
//! use std::sync::{Arc, Mutex};
//!
//! let store = PostStore::new();
//! let latest = Arc::new(Mutex::new(Vec::new()));
//!
//! let sub = store.subscribe_posts({
//!     let latest = latest.clone();
//!     move |view| *latest.lock().unwrap() = view.clone()
//! });
//!
//! store.set(vec![Post::new("a"), Post::new("b")]);
//! assert_eq!(*latest.lock().unwrap(), vec![Some(json!("a")), Some(json!("b"))]);
//!
//! sub.unsubscribe();
//! ```

pub mod config;
pub mod error;
pub mod post;
pub mod post_store;
pub mod store;

// Re-export main types for convenience
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use post::Post;
pub use post_store::{content_of, post_data, posts, ContentView, PostStore};
pub use store::{derived, Derived, Readable, Subscription, Writable};
