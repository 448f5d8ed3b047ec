//! The post record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One item of content.
///
/// Only `content` matters to the derived view. Records are duck-typed:
/// any JSON object deserializes, a missing `content` becomes `None`, and
/// fields other than `post_id` and `content` are kept in `extra`.
///
/// ```
/// use post_store::Post;
///
/// let post: Post = serde_json::from_str(r#"{ "post_id": 3, "content": "hi", "pinned": true }"#).unwrap();
/// assert_eq!(post.post_id, Some(3));
/// assert_eq!(post.content_str(), Some("hi"));
/// assert_eq!(post.extra["pinned"], true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,

    /// `Some(Value::Null)` for an explicit `null`, `None` when absent.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    /// A post without an id.
    pub fn new(content: impl Into<Value>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn with_id(post_id: u64, content: impl Into<Value>) -> Self {
        Self {
            post_id: Some(post_id),
            ..Self::new(content)
        }
    }

    /// The content field, if the record has one.
    pub fn content(&self) -> Option<&Value> {
        self.content.as_ref()
    }

    /// The content field if it is a string.
    pub fn content_str(&self) -> Option<&str> {
        self.content.as_ref().and_then(Value::as_str)
    }
}

// A field that is present always deserializes to `Some`, even when null.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
