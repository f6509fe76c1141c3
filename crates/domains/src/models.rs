//! # Domain Models
//!
//! These structs represent the board as the client sees it: a flat user
//! roster plus a forest of posts, each carrying a recursive comment tree.
//! Identifiers are server-assigned and opaque, so they are newtype strings
//! rather than parsed values.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::reactions::ReactionAggregate;
use crate::style::Style;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a post.
    PostId
);
id_type!(
    /// Identifier of a comment at any nesting depth.
    CommentId
);
id_type!(
    /// Identifier of a roster user.
    UserId
);
id_type!(
    /// Server-issued identifier of a single placed reaction.
    ReactionId
);

/// The node a reaction or reply attaches to: a post, or a comment at any
/// depth. Identifiers are globally unique across both kinds, but carrying the
/// kind lets lookups skip whole subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentRef {
    Post(PostId),
    Comment(CommentId),
}

impl ParentRef {
    /// Human-readable kind label, used in error reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            ParentRef::Post(_) => "post",
            ParentRef::Comment(_) => "comment",
        }
    }

    pub fn id_str(&self) -> &str {
        match self {
            ParentRef::Post(id) => id.as_str(),
            ParentRef::Comment(id) => id.as_str(),
        }
    }
}

/// A roster user. Immutable from the tree's perspective; owned by the flat
/// roster fetched once per board load.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub style: Style,
}

/// One block of post content: styled text or a styled image reference.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSection {
    Text { body: String, style: Option<String> },
    Image { url: String, style: Option<String> },
}

/// A comment node. Replies are the same shape, recursively; depth is
/// unbounded. `Arc` links give updates structural sharing: nodes off the
/// update path keep pointer identity across snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    /// None for deleted or orphaned authorship.
    pub author: Option<UserId>,
    /// None once the comment has been deleted.
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub deleted: bool,
    /// Derived from the session after fetch, never sent on the wire.
    pub is_mine: bool,
    pub reactions: ReactionAggregate,
    pub replies: Vec<Arc<Comment>>,
}

/// A post: ordered content sections plus the root of its comment tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub sections: Vec<ContentSection>,
    pub created_at: DateTime<Utc>,
    pub reactions: ReactionAggregate,
    pub comments: Vec<Arc<Comment>>,
}

/// The whole board as fetched in one request. Held by the owning service and
/// replaced wholesale by the pure tree updaters; never mutated in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardSnapshot {
    pub posts: Vec<Arc<Post>>,
    pub users: Vec<User>,
    pub total_posts: u64,
}

impl BoardSnapshot {
    /// Posts arrive unordered from the server; the client re-sorts by
    /// creation time, newest first, on every render.
    pub fn posts_newest_first(&self) -> Vec<Arc<Post>> {
        let mut posts = self.posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    /// Roster lookup by user id.
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    /// Roster lookup by display name, used to resolve the session's own
    /// user id when deriving comment ownership.
    pub fn user_by_name(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.name == name)
    }
}

/// The claims the client reflects out of a bearer token for UI purposes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub is_admin: bool,
}

/// Account data served by the profile endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountInfo {
    pub username: String,
    pub is_admin: bool,
}

/// A bearer token. Wrapped so it never leaks through `Debug` output or logs;
/// adapters reveal it explicitly at the wire boundary.
pub struct Token(SecretString);

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::from(raw.into()))
    }

    /// The raw token, for the `Authorization` header and the client store.
    pub fn reveal(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for Token {
    fn clone(&self) -> Self {
        Self::new(self.reveal().to_string())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token([REDACTED])")
    }
}

/// Severity tag on a telemetry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    Info,
    Error,
}
