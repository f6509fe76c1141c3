//! Wire shapes and their mapping onto the domain models. The API speaks
//! camelCase except for the reaction body, which keeps its PascalCase
//! `Type`/`PostId`/`CommentId` keys. Unknown reaction kinds are dropped
//! with a log line rather than failing a whole snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domains::models::{
    Comment, CommentId, ContentSection, LogType, Post, PostId, ReactionId, User, UserId,
};
use domains::reactions::{ReactionAggregate, ReactionKind};
use domains::style::{self, StyleDto};
use domains::{AccountInfo, BoardSnapshot};

// ── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDto {
    #[serde(default)]
    pub posts: Vec<PostDto>,
    #[serde(default)]
    pub users: Vec<UserDto>,
    #[serde(default)]
    pub total_posts: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub style: Option<StyleDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: String,
    #[serde(default)]
    pub sections: Vec<SectionDto>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reactions: BTreeMap<String, u32>,
    #[serde(default)]
    pub my_reactions: BTreeMap<String, String>,
    #[serde(default)]
    pub comments: Vec<CommentDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SectionDto {
    Text {
        body: String,
        #[serde(default)]
        style: Option<String>,
    },
    Image {
        url: String,
        #[serde(default)]
        style: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub reactions: BTreeMap<String, u32>,
    #[serde(default)]
    pub my_reactions: BTreeMap<String, String>,
    #[serde(default)]
    pub replies: Vec<CommentDto>,
}

#[derive(Debug, Deserialize)]
pub struct ReactionCreated {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfoDto {
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// The error envelope most endpoints use on failure.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

// ── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentBody<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct NewReactionBody<'a> {
    #[serde(rename = "Type")]
    pub kind: ReactionKind,
    #[serde(rename = "PostId", skip_serializing_if = "Option::is_none")]
    pub post_id: Option<&'a str>,
    #[serde(rename = "CommentId", skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct EditCommentBody<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CredentialsBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub user_agent: String,
    pub language: String,
    pub platform: String,
    pub timezone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBody {
    pub client_info: ClientInfo,
    pub message: String,
    pub log_type: LogType,
}

// ── Mapping ─────────────────────────────────────────────────────────────────

fn aggregate_from_wire(
    counts: BTreeMap<String, u32>,
    mine: BTreeMap<String, String>,
) -> ReactionAggregate {
    let counts = counts
        .into_iter()
        .filter_map(|(key, count)| match ReactionKind::from_wire(&key) {
            Some(kind) => Some((kind, count)),
            None => {
                tracing::debug!(kind = %key, "dropping unknown reaction kind");
                None
            }
        })
        .collect();
    let mine = mine
        .into_iter()
        .filter_map(|(key, id)| {
            ReactionKind::from_wire(&key).map(|kind| (kind, ReactionId::new(id)))
        })
        .collect();
    ReactionAggregate::from_parts(counts, mine)
}

impl SectionDto {
    fn into_domain(self) -> ContentSection {
        match self {
            SectionDto::Text { body, style } => ContentSection::Text { body, style },
            SectionDto::Image { url, style } => ContentSection::Image { url, style },
        }
    }
}

impl CommentDto {
    pub fn into_domain(self) -> Comment {
        Comment {
            id: CommentId::new(self.id),
            author: self.user_id.map(UserId::new),
            text: self.text,
            created_at: self.created_at,
            edited_at: self.edited_at,
            deleted: self.deleted,
            is_mine: false,
            reactions: aggregate_from_wire(self.reactions, self.my_reactions),
            replies: self
                .replies
                .into_iter()
                .map(|reply| Arc::new(reply.into_domain()))
                .collect(),
        }
    }
}

impl PostDto {
    pub fn into_domain(self) -> Post {
        Post {
            id: PostId::new(self.id),
            sections: self
                .sections
                .into_iter()
                .map(SectionDto::into_domain)
                .collect(),
            created_at: self.created_at,
            reactions: aggregate_from_wire(self.reactions, self.my_reactions),
            comments: self
                .comments
                .into_iter()
                .map(|comment| Arc::new(comment.into_domain()))
                .collect(),
        }
    }
}

impl UserDto {
    pub fn into_domain(self) -> User {
        User {
            id: UserId::new(self.id),
            name: self.username,
            style: style::decode(&self.style.unwrap_or_default()),
        }
    }
}

impl BoardDto {
    pub fn into_domain(self) -> BoardSnapshot {
        BoardSnapshot {
            posts: self
                .posts
                .into_iter()
                .map(|post| Arc::new(post.into_domain()))
                .collect(),
            users: self.users.into_iter().map(UserDto::into_domain).collect(),
            total_posts: self.total_posts,
        }
    }
}

impl AccountInfoDto {
    pub fn into_domain(self) -> AccountInfo {
        AccountInfo {
            username: self.username,
            is_admin: self.is_admin,
        }
    }
}
