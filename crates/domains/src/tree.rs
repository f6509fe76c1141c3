//! # Comment Tree Updater
//!
//! The single pure update module behind every board mutation. Each function
//! takes the current post sequence and returns a new one; inputs are never
//! mutated, and every node off the update path is carried over by `Arc`, so
//! it keeps pointer identity in the new tree.
//!
//! A target id that cannot be located returns [`AppError::NotFound`] rather
//! than silently discarding the update: against a stale snapshot the caller
//! should know the board has moved on.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{Comment, CommentId, ParentRef, Post, PostId, UserId};
use crate::reactions::{ReactionAggregate, ReactionChange, ReactionKind};

/// Applies a confirmed reaction change to the parent's aggregate.
pub fn update_reaction(
    posts: &[Arc<Post>],
    target: &ParentRef,
    kind: ReactionKind,
    change: &ReactionChange,
) -> Result<Vec<Arc<Post>>> {
    match target {
        ParentRef::Post(id) => rewrite_post(posts, id, |post| Post {
            reactions: post.reactions.apply(kind, change),
            ..post.clone()
        }),
        ParentRef::Comment(id) => rewrite_comment_in_posts(posts, id, &|comment| Comment {
            reactions: comment.reactions.apply(kind, change),
            ..comment.clone()
        }),
    }
    .ok_or_else(|| not_found(target))
}

/// Appends a confirmed reply under its parent. Post targets gain a new
/// top-level comment; comment targets gain a reply at whatever depth the
/// parent sits. Replies append at the end in arrival order, never re-sorted.
pub fn insert_reply(
    posts: &[Arc<Post>],
    target: &ParentRef,
    reply: Comment,
) -> Result<Vec<Arc<Post>>> {
    let reply = Arc::new(reply);
    match target {
        ParentRef::Post(id) => rewrite_post(posts, id, |post| {
            let mut next = post.clone();
            next.comments.push(Arc::clone(&reply));
            next
        }),
        ParentRef::Comment(id) => rewrite_comment_in_posts(posts, id, &|comment| {
            let mut next = comment.clone();
            next.replies.push(Arc::clone(&reply));
            next
        }),
    }
    .ok_or_else(|| not_found(target))
}

/// Replaces a comment's text and stamps its edit time.
pub fn edit_comment(
    posts: &[Arc<Post>],
    id: &CommentId,
    text: String,
    edited_at: DateTime<Utc>,
) -> Result<Vec<Arc<Post>>> {
    rewrite_comment_in_posts(posts, id, &|comment| Comment {
        text: Some(text.clone()),
        edited_at: Some(edited_at),
        ..comment.clone()
    })
    .ok_or_else(|| not_found(&ParentRef::Comment(id.clone())))
}

/// Tombstones a comment: text and authorship are cleared, but replies are
/// kept so the thread below it stays readable.
pub fn remove_comment(posts: &[Arc<Post>], id: &CommentId) -> Result<Vec<Arc<Post>>> {
    rewrite_comment_in_posts(posts, id, &|comment| Comment {
        text: None,
        author: None,
        deleted: true,
        ..comment.clone()
    })
    .ok_or_else(|| not_found(&ParentRef::Comment(id.clone())))
}

/// Read-side lookup of a parent's aggregate, used to find the caller's own
/// reaction id before a retract.
pub fn find_reactions<'a>(
    posts: &'a [Arc<Post>],
    target: &ParentRef,
) -> Option<&'a ReactionAggregate> {
    match target {
        ParentRef::Post(id) => posts.iter().find(|p| &p.id == id).map(|p| &p.reactions),
        ParentRef::Comment(id) => posts
            .iter()
            .find_map(|p| find_comment(&p.comments, id))
            .map(|c| &c.reactions),
    }
}

/// Derives `is_mine` on every comment from the session's user id. Applied
/// once per fetch, so it rebuilds the tree instead of sharing.
pub fn mark_ownership(posts: &[Arc<Post>], me: Option<&UserId>) -> Vec<Arc<Post>> {
    posts
        .iter()
        .map(|post| {
            Arc::new(Post {
                comments: mark_comments(&post.comments, me),
                ..(**post).clone()
            })
        })
        .collect()
}

fn mark_comments(comments: &[Arc<Comment>], me: Option<&UserId>) -> Vec<Arc<Comment>> {
    comments
        .iter()
        .map(|comment| {
            Arc::new(Comment {
                is_mine: me.is_some() && comment.author.as_ref() == me,
                replies: mark_comments(&comment.replies, me),
                ..(**comment).clone()
            })
        })
        .collect()
}

fn not_found(target: &ParentRef) -> AppError {
    AppError::NotFound(target.kind().to_string(), target.id_str().to_string())
}

/// Rebuilds the one post with a matching id; every other post is carried
/// over by `Arc`. `None` when no post matches.
fn rewrite_post(
    posts: &[Arc<Post>],
    id: &PostId,
    rewrite: impl FnOnce(&Post) -> Post,
) -> Option<Vec<Arc<Post>>> {
    let index = posts.iter().position(|p| &p.id == id)?;
    let mut next = posts.to_vec();
    next[index] = Arc::new(rewrite(&posts[index]));
    Some(next)
}

/// Descends into every post looking for the comment; the first post whose
/// subtree contains it is rebuilt along the path, the rest are shared.
fn rewrite_comment_in_posts(
    posts: &[Arc<Post>],
    id: &CommentId,
    rewrite: &dyn Fn(&Comment) -> Comment,
) -> Option<Vec<Arc<Post>>> {
    for (index, post) in posts.iter().enumerate() {
        if let Some(comments) = rewrite_comment(&post.comments, id, rewrite) {
            let mut next = posts.to_vec();
            next[index] = Arc::new(Post {
                comments,
                ..(**post).clone()
            });
            return Some(next);
        }
    }
    None
}

/// Locates `id` within a sibling list (recursively through replies) and
/// applies `rewrite` to it. On the path back up, each ancestor is
/// shallow-rebuilt with its new child list; siblings keep their `Arc`s.
fn rewrite_comment(
    comments: &[Arc<Comment>],
    id: &CommentId,
    rewrite: &dyn Fn(&Comment) -> Comment,
) -> Option<Vec<Arc<Comment>>> {
    for (index, comment) in comments.iter().enumerate() {
        if &comment.id == id {
            let mut next = comments.to_vec();
            next[index] = Arc::new(rewrite(comment));
            return Some(next);
        }
        if let Some(replies) = rewrite_comment(&comment.replies, id, rewrite) {
            let mut next = comments.to_vec();
            next[index] = Arc::new(Comment {
                replies,
                ..(**comment).clone()
            });
            return Some(next);
        }
    }
    None
}

fn find_comment<'a>(comments: &'a [Arc<Comment>], id: &CommentId) -> Option<&'a Comment> {
    for comment in comments {
        if &comment.id == id {
            return Some(comment);
        }
        if let Some(found) = find_comment(&comment.replies, id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentSection, PostId, ReactionId};

    fn comment(id: &str, replies: Vec<Arc<Comment>>) -> Arc<Comment> {
        Arc::new(Comment {
            id: CommentId::new(id),
            author: Some(UserId::new("u1")),
            text: Some(format!("comment {id}")),
            created_at: Utc::now(),
            edited_at: None,
            deleted: false,
            is_mine: false,
            reactions: ReactionAggregate::default(),
            replies,
        })
    }

    fn post(id: &str, comments: Vec<Arc<Comment>>) -> Arc<Post> {
        Arc::new(Post {
            id: PostId::new(id),
            sections: vec![ContentSection::Text {
                body: "body".into(),
                style: None,
            }],
            created_at: Utc::now(),
            reactions: ReactionAggregate::default(),
            comments,
        })
    }

    /// A → [B, C], B childless; plus a second post as an off-path sibling.
    fn two_post_tree() -> Vec<Arc<Post>> {
        let a = comment("A", vec![comment("B", vec![]), comment("C", vec![])]);
        vec![post("p1", vec![a]), post("p2", vec![comment("D", vec![])])]
    }

    #[test]
    fn reply_lands_under_the_one_matching_node() {
        let posts = two_post_tree();
        let reply = (*comment("E", vec![])).clone();

        let next = insert_reply(
            &posts,
            &ParentRef::Comment(CommentId::new("B")),
            reply,
        )
        .unwrap();

        let a = &next[0].comments[0];
        let b = &a.replies[0];
        assert_eq!(b.replies.len(), 1);
        assert_eq!(b.replies[0].id.as_str(), "E");

        // C and the unrelated post keep pointer identity.
        let c_before = &posts[0].comments[0].replies[1];
        let c_after = &a.replies[1];
        assert!(Arc::ptr_eq(c_before, c_after));
        assert!(Arc::ptr_eq(&posts[1], &next[1]));

        // The input tree is untouched.
        assert!(posts[0].comments[0].replies[0].replies.is_empty());
    }

    #[test]
    fn reply_to_post_appends_top_level() {
        let posts = two_post_tree();
        let reply = (*comment("E", vec![])).clone();

        let next =
            insert_reply(&posts, &ParentRef::Post(PostId::new("p2")), reply).unwrap();

        assert_eq!(next[1].comments.len(), 2);
        assert_eq!(next[1].comments[1].id.as_str(), "E");
        assert!(Arc::ptr_eq(&posts[0], &next[0]));
    }

    #[test]
    fn replies_append_in_arrival_order() {
        let posts = two_post_tree();
        let target = ParentRef::Comment(CommentId::new("B"));

        let next = insert_reply(&posts, &target, (*comment("z", vec![])).clone()).unwrap();
        let next = insert_reply(&next, &target, (*comment("a", vec![])).clone()).unwrap();

        let b = &next[0].comments[0].replies[0];
        let ids: Vec<_> = b.replies.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn reaction_add_reaches_nested_comment() {
        let posts = two_post_tree();
        let target = ParentRef::Comment(CommentId::new("C"));

        let next = update_reaction(
            &posts,
            &target,
            ReactionKind::Wow,
            &ReactionChange::Added(ReactionId::new("r1")),
        )
        .unwrap();

        let agg = find_reactions(&next, &target).unwrap();
        assert_eq!(agg.count_of(ReactionKind::Wow), 1);
        assert_eq!(agg.my_reaction(ReactionKind::Wow), Some(&ReactionId::new("r1")));

        // Sibling B is shared.
        assert!(Arc::ptr_eq(
            &posts[0].comments[0].replies[0],
            &next[0].comments[0].replies[0],
        ));
    }

    #[test]
    fn missing_target_is_reported_not_swallowed() {
        let posts = two_post_tree();
        let err = update_reaction(
            &posts,
            &ParentRef::Comment(CommentId::new("nope")),
            ReactionKind::Like,
            &ReactionChange::Removed,
        )
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_, _)));
    }

    #[test]
    fn edit_sets_text_and_timestamp() {
        let posts = two_post_tree();
        let when = Utc::now();

        let next = edit_comment(&posts, &CommentId::new("C"), "revised".into(), when).unwrap();

        let c = &next[0].comments[0].replies[1];
        assert_eq!(c.text.as_deref(), Some("revised"));
        assert_eq!(c.edited_at, Some(when));
    }

    #[test]
    fn delete_tombstones_but_keeps_replies() {
        let b = comment("B", vec![comment("B1", vec![])]);
        let posts = vec![post("p1", vec![b])];

        let next = remove_comment(&posts, &CommentId::new("B")).unwrap();

        let b = &next[0].comments[0];
        assert!(b.deleted);
        assert!(b.text.is_none());
        assert!(b.author.is_none());
        assert_eq!(b.replies.len(), 1);
    }

    #[test]
    fn ownership_follows_the_session_user() {
        let posts = two_post_tree();
        let me = UserId::new("u1");

        let marked = mark_ownership(&posts, Some(&me));
        assert!(marked[0].comments[0].is_mine);
        assert!(marked[0].comments[0].replies[0].is_mine);

        let cleared = mark_ownership(&marked, None);
        assert!(!cleared[0].comments[0].is_mine);
    }
}
