//! Shared builders for the integration suite. Each test target includes
//! this file as a module, so everything here stays free of mocks and
//! network concerns.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use domains::models::{Comment, CommentId, ContentSection, Post, PostId, User, UserId};
use domains::reactions::{ReactionAggregate, ReactionKind};
use domains::style::Style;
use domains::BoardSnapshot;

pub fn comment(id: &str, author: &str, replies: Vec<Arc<Comment>>) -> Arc<Comment> {
    Arc::new(Comment {
        id: CommentId::new(id),
        author: Some(UserId::new(author)),
        text: Some(format!("comment {id}")),
        created_at: Utc::now(),
        edited_at: None,
        deleted: false,
        is_mine: false,
        reactions: ReactionAggregate::default(),
        replies,
    })
}

pub fn post(id: &str, reactions: ReactionAggregate, comments: Vec<Arc<Comment>>) -> Arc<Post> {
    Arc::new(Post {
        id: PostId::new(id),
        sections: vec![ContentSection::Text {
            body: format!("post {id}"),
            style: None,
        }],
        created_at: Utc::now(),
        reactions,
        comments,
    })
}

pub fn user(id: &str, name: &str) -> User {
    User {
        id: UserId::new(id),
        name: name.to_string(),
        style: Style::default(),
    }
}

pub fn snapshot(posts: Vec<Arc<Post>>, users: Vec<User>) -> BoardSnapshot {
    let total_posts = posts.len() as u64;
    BoardSnapshot {
        posts,
        users,
        total_posts,
    }
}

/// An aggregate where other people have left `n` laughs and the current
/// user has none.
pub fn laugh_counts(n: u32) -> ReactionAggregate {
    ReactionAggregate::from_parts(
        BTreeMap::from([(ReactionKind::Laugh, n)]),
        BTreeMap::new(),
    )
}

#[test]
fn builders_are_wired_consistently() {
    let tree = post(
        "p1",
        laugh_counts(2),
        vec![comment("c1", "u1", vec![comment("c2", "u2", vec![])])],
    );
    assert_eq!(tree.reactions.count_of(ReactionKind::Laugh), 2);
    assert!(tree.reactions.my_reaction(ReactionKind::Laugh).is_none());
    assert_eq!(tree.comments[0].replies[0].id, CommentId::new("c2"));
}
