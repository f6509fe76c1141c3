//! # Core Traits (Ports)
//!
//! The seams between the engine and the outside world. Every adapter
//! implements one of these; services only ever see the trait objects.
//! With the `testing` feature enabled, mockall generates `MockXxx` types
//! for external test crates.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AccountInfo, Comment, CommentId, LogType, ParentRef, ReactionId, SessionUser, Token,
};
use crate::reactions::ReactionKind;
use crate::style::StyleDto;
use crate::BoardSnapshot;

/// The board API, consumed as a black box returning mapped domain values.
/// Mutations are issued first and applied to the local tree only after the
/// server confirms.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Fetches the whole board. The bearer is optional: anonymous readers
    /// get the same snapshot without the "mine" annotations.
    async fn fetch_board(&self, bearer: Option<Token>) -> Result<BoardSnapshot>;

    /// Creates a reply under a post or a comment; returns the created
    /// comment with its server-assigned id.
    async fn create_comment(
        &self,
        bearer: &Token,
        parent: &ParentRef,
        text: &str,
    ) -> Result<Comment>;

    /// Rewrites a comment's text; returns the updated comment.
    async fn edit_comment(&self, bearer: &Token, id: &CommentId, text: &str) -> Result<Comment>;

    async fn delete_comment(&self, bearer: &Token, id: &CommentId) -> Result<()>;

    /// Places a reaction; returns the server-issued reaction id the tree
    /// records as "mine".
    async fn add_reaction(
        &self,
        bearer: &Token,
        parent: &ParentRef,
        kind: ReactionKind,
    ) -> Result<ReactionId>;

    async fn remove_reaction(&self, bearer: &Token, id: &ReactionId) -> Result<()>;
}

/// Credential exchange and profile resources.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<Token>;

    async fn register(&self, username: &str, password: &str) -> Result<()>;

    async fn fetch_info(&self, bearer: &Token) -> Result<AccountInfo>;

    /// The server-side avatar/style resource keyed by the bearer.
    async fn fetch_avatar(&self, bearer: &Token) -> Result<StyleDto>;

    async fn save_style(&self, bearer: &Token, style: &StyleDto) -> Result<()>;
}

/// Extracts the UI-facing claims out of a bearer token. Implementations do
/// not verify signatures (the server's job); the client merely reflects
/// claims. Any malformed shape is `None` (fail closed).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenDecoder: Send + Sync {
    fn decode(&self, token: &Token) -> Option<SessionUser>;
}

/// Persisted client state: the bearer token and the cached style survive
/// restarts; the intro flag is session-scoped (process lifetime).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load_token(&self) -> Result<Option<Token>>;

    async fn store_token(&self, token: &Token) -> Result<()>;

    async fn clear_token(&self) -> Result<()>;

    async fn load_style(&self) -> Result<Option<StyleDto>>;

    async fn store_style(&self, style: &StyleDto) -> Result<()>;

    fn intro_seen(&self) -> bool;

    fn mark_intro_seen(&self);
}

/// Fire-and-forget client telemetry. Implementations must never surface a
/// failure to the caller.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TelemetrySink: Send + Sync {
    fn record(&self, log_type: LogType, message: &str);
}
