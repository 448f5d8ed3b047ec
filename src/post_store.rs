//! The post collection store and its content view.

use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::post::Post;
use crate::store::{derived, Derived, Readable, Subscription, Writable};

/// The content of each post, positionally aligned with the collection.
pub type ContentView = Vec<Option<Value>>;

/// Project a collection onto its `content` fields.
pub fn content_of(posts: &[Post]) -> ContentView {
    posts.iter().map(|post| post.content.clone()).collect()
}

/// An ordered collection of posts plus a derived content-only view.
///
/// `post_data` is the settable collection and `posts` follows it: every
/// replacement of the collection recomputes the view before the view's
/// subscribers run.
///
/// # Examples
///
/// ```
/// use post_store::{Post, PostStore, Readable};
/// use serde_json::json;
///
/// let store = PostStore::new();
/// store.set(vec![Post::new("a"), Post::new("b")]);
///
/// assert_eq!(store.posts().get(), vec![Some(json!("a")), Some(json!("b"))]);
/// ```
#[derive(Clone, Debug)]
pub struct PostStore {
    config: Arc<StoreConfig>,
    post_data: Writable<Vec<Post>>,
    posts: Derived<ContentView>,
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PostStore {
    /// An empty store with the default config.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let post_data = Writable::new(Vec::new());
        let posts = derived(&post_data, |posts: &Vec<Post>| content_of(posts));
        Self {
            config: Arc::new(config),
            post_data,
            posts,
        }
    }

    /// The process-wide store, created empty on first use.
    pub fn global() -> &'static PostStore {
        static STORE: OnceLock<PostStore> = OnceLock::new();
        STORE.get_or_init(PostStore::new)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Handle on the settable collection.
    pub fn post_data(&self) -> Writable<Vec<Post>> {
        self.post_data.clone()
    }

    /// Handle on the read-only content view.
    pub fn posts(&self) -> Derived<ContentView> {
        self.posts.clone()
    }

    /// Current collection.
    pub fn get(&self) -> Vec<Post> {
        self.post_data.get()
    }

    pub fn len(&self) -> usize {
        self.post_data.with(|posts| posts.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the whole collection.
    ///
    /// With `skip_unchanged` set, an equal collection is ignored.
    pub fn set(&self, posts: Vec<Post>) {
        let count = posts.len();
        if self.config.skip_unchanged {
            if !self.post_data.set_if_changed(posts) {
                debug!(store = %self.config.name, count, "collection unchanged");
                return;
            }
        } else {
            self.post_data.set(posts);
        }
        debug!(store = %self.config.name, count, "collection replaced");
    }

    /// Subscribe to the collection.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Vec<Post>) + Send + Sync + 'static,
    {
        self.post_data.subscribe(callback)
    }

    /// Subscribe to the content view.
    pub fn subscribe_posts<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ContentView) + Send + Sync + 'static,
    {
        self.posts.subscribe(callback)
    }

    /// Replace the collection with a JSON array of posts.
    ///
    /// Elements that are not objects load as empty posts, so their
    /// position in the view is `None`. Returns the number of posts
    /// loaded. On a decode error the collection is left as it was.
    pub fn load_json(&self, input: &str) -> Result<usize> {
        let posts = decode_posts(input).map_err(|e| {
            debug!(store = %self.config.name, error = %e, "rejected posts payload");
            StoreError::from(e)
        })?;
        let count = posts.len();
        self.set(posts);
        Ok(count)
    }

    /// Serialize the collection as a JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(self.post_data.with(|posts| serde_json::to_string(posts))?)
    }

    /// Append a post with the next free id and return that id.
    pub fn create_post(&self, content: impl Into<Value>) -> u64 {
        let mut posts = self.get();
        let id = next_post_id(&posts);
        posts.push(Post::with_id(id, content));
        self.set(posts);
        debug!(store = %self.config.name, post_id = id, "post created");
        id
    }

    pub fn get_post(&self, id: u64) -> Option<Post> {
        self.post_data
            .with(|posts| posts.iter().find(|post| post.post_id == Some(id)).cloned())
    }

    /// Replace the content of the post with `id`.
    pub fn update_post(&self, id: u64, content: impl Into<Value>) -> Result<u64> {
        let mut posts = self.get();
        let post = posts
            .iter_mut()
            .find(|post| post.post_id == Some(id))
            .ok_or(StoreError::PostNotFound(id))?;
        post.content = Some(content.into());
        self.set(posts);
        debug!(store = %self.config.name, post_id = id, "post updated");
        Ok(id)
    }

    /// Remove the post with `id`.
    pub fn delete_post(&self, id: u64) -> Result<u64> {
        let mut posts = self.get();
        let index = posts
            .iter()
            .position(|post| post.post_id == Some(id))
            .ok_or(StoreError::PostNotFound(id))?;
        posts.remove(index);
        self.set(posts);
        debug!(store = %self.config.name, post_id = id, "post deleted");
        Ok(id)
    }
}

fn decode_posts(input: &str) -> serde_json::Result<Vec<Post>> {
    let items: Vec<Value> = serde_json::from_str(input)?;
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value(item),
            _ => Ok(Post::default()),
        })
        .collect()
}

/// Ids start at `len + 1` and move up past any id already taken.
fn next_post_id(posts: &[Post]) -> u64 {
    let mut id = posts.len() as u64 + 1;
    while posts.iter().any(|post| post.post_id == Some(id)) {
        id += 1;
    }
    id
}

/// Handle on the global store's collection.
pub fn post_data() -> Writable<Vec<Post>> {
    PostStore::global().post_data()
}

/// Handle on the global store's content view.
pub fn posts() -> Derived<ContentView> {
    PostStore::global().posts()
}
