//! # Board Service
//!
//! The one mutation path for the board page, shared by every presentation
//! surface. Each action runs the same sequence: session gate, client-side
//! validation, the REST call, then the pure tree update that reconciles the
//! server-assigned identifiers into the snapshot.
//!
//! Mutations are applied strictly after a successful response; there is no
//! optimistic apply and therefore no rollback. Transport failures for
//! reactions and replies are logged and abandoned without a toast;
//! validation and staleness ARE surfaced, because the user can act on them.

use std::sync::Arc;

use chrono::Utc;

use domains::models::{CommentId, ParentRef, Post};
use domains::reactions::{ReactionChange, ReactionKind};
use domains::tree;
use domains::{AppError, BoardApi, BoardSnapshot, LogType, Result, TelemetrySink};
use views::node::available_reactions;
use views::{BoardViewState, ToastKind, SIGN_IN_MESSAGE};

use crate::session::SessionService;
use crate::validate;

/// Raised when a confirmed mutation no longer finds its target locally.
pub const STALE_BOARD_MESSAGE: &str = "The board has moved on, refresh to catch up";

pub struct BoardService {
    api: Arc<dyn BoardApi>,
    telemetry: Arc<dyn TelemetrySink>,
    session: Arc<SessionService>,
    snapshot: Option<BoardSnapshot>,
    view: BoardViewState,
}

impl BoardService {
    pub fn new(
        api: Arc<dyn BoardApi>,
        telemetry: Arc<dyn TelemetrySink>,
        session: Arc<SessionService>,
    ) -> Self {
        Self {
            api,
            telemetry,
            session,
            snapshot: None,
            view: BoardViewState::default(),
        }
    }

    pub fn snapshot(&self) -> Option<&BoardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn view(&self) -> &BoardViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut BoardViewState {
        &mut self.view
    }

    /// Fetches the board and derives comment ownership from the session via
    /// the roster. Replaces whatever snapshot was held before.
    pub async fn load(&mut self) -> Result<()> {
        let bearer = self.session.bearer().await;
        let mut snapshot = self.api.fetch_board(bearer).await?;

        let me = match self.session.current_user().await {
            Some(user) => snapshot.user_by_name(&user.username).map(|u| u.id.clone()),
            None => None,
        };
        snapshot.posts = tree::mark_ownership(&snapshot.posts, me.as_ref());

        tracing::debug!(posts = snapshot.posts.len(), "board snapshot loaded");
        self.telemetry.record(LogType::Info, "board loaded");
        self.snapshot = Some(snapshot);
        Ok(())
    }

    // ── View passthroughs ───────────────────────────────────────────────

    pub fn toggle_replies(&mut self, node: &ParentRef) {
        self.view.toggle_replies(node);
    }

    pub fn toggle_picker(&mut self, node: &ParentRef) {
        self.view.toggle_picker(node);
    }

    pub fn pointer_outside(&mut self, node: &ParentRef) {
        self.view.pointer_outside(node);
    }

    pub async fn begin_reply(&mut self, node: &ParentRef) {
        let authenticated = self.session.is_authenticated().await;
        self.view.begin_reply(node, authenticated);
    }

    pub fn cancel_reply(&mut self, node: &ParentRef) {
        self.view.cancel_reply(node);
    }

    pub async fn begin_edit(&mut self, node: &ParentRef) {
        let authenticated = self.session.is_authenticated().await;
        self.view.begin_edit(node, authenticated);
    }

    pub fn cancel_edit(&mut self, node: &ParentRef) {
        self.view.cancel_edit(node);
    }

    /// Kinds the picker offers for a node: only those nobody has used yet.
    pub fn picker_kinds(&self, node: &ParentRef) -> Vec<ReactionKind> {
        self.snapshot
            .as_ref()
            .and_then(|s| tree::find_reactions(&s.posts, node))
            .map(available_reactions)
            .unwrap_or_else(|| ReactionKind::ALL.to_vec())
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Posts a reply and, on confirmation, appends it under its parent and
    /// expands the node so it is visible.
    pub async fn submit_reply(&mut self, parent: &ParentRef, text: &str) {
        let Some(token) = self.session.auth_token().await else {
            self.view.toasts_mut().raise(ToastKind::Error, SIGN_IN_MESSAGE);
            return;
        };
        if let Err(err) = validate::reply_text(text) {
            self.view.toasts_mut().raise(ToastKind::Error, err.to_string());
            return;
        }

        let created = self.api.create_comment(&token, parent, text.trim()).await;
        match created {
            Ok(comment) => {
                let inserted =
                    self.apply_tree_update(|posts| tree::insert_reply(posts, parent, comment));
                if inserted {
                    self.view.on_reply_submitted(parent);
                }
            }
            Err(err) => self.abandon("posting a reply failed", err),
        }
    }

    /// Rewrites a comment's text and, on confirmation, stamps the server's
    /// edit time into the tree.
    pub async fn submit_edit(&mut self, id: &CommentId, text: &str) {
        let Some(token) = self.session.auth_token().await else {
            self.view.toasts_mut().raise(ToastKind::Error, SIGN_IN_MESSAGE);
            return;
        };
        if let Err(err) = validate::reply_text(text) {
            self.view.toasts_mut().raise(ToastKind::Error, err.to_string());
            return;
        }

        let confirmed = self.api.edit_comment(&token, id, text.trim()).await;
        match confirmed {
            Ok(updated) => {
                let edited_at = updated.edited_at.unwrap_or_else(Utc::now);
                let text = updated
                    .text
                    .unwrap_or_else(|| text.trim().to_string());
                let edited = self.apply_tree_update(|posts| {
                    tree::edit_comment(posts, id, text, edited_at)
                });
                if edited {
                    self.view.on_edit_submitted(&ParentRef::Comment(id.clone()));
                }
            }
            Err(err) => self.abandon("editing a comment failed", err),
        }
    }

    /// Deletes a comment; the confirmed tree update tombstones the node but
    /// keeps its replies readable.
    pub async fn delete_comment(&mut self, id: &CommentId) {
        let Some(token) = self.session.auth_token().await else {
            self.view.toasts_mut().raise(ToastKind::Error, SIGN_IN_MESSAGE);
            return;
        };

        let confirmed = self.api.delete_comment(&token, id).await;
        match confirmed {
            Ok(()) => {
                self.apply_tree_update(|posts| tree::remove_comment(posts, id));
            }
            Err(err) => self.abandon("deleting a comment failed", err),
        }
    }

    /// Places a reaction from the picker. The count and "mine" entry are
    /// recorded only once the server returns the reaction id.
    pub async fn choose_reaction(&mut self, parent: &ParentRef, kind: ReactionKind) {
        self.view.close_picker(parent);
        let Some(token) = self.session.auth_token().await else {
            self.view.toasts_mut().raise(ToastKind::Error, SIGN_IN_MESSAGE);
            return;
        };

        let placed = self.api.add_reaction(&token, parent, kind).await;
        match placed {
            Ok(id) => {
                self.apply_tree_update(|posts| {
                    tree::update_reaction(posts, parent, kind, &ReactionChange::Added(id))
                });
            }
            Err(err) => self.abandon("adding a reaction failed", err),
        }
    }

    /// Retracts the caller's own reaction of a kind, looked up in the
    /// snapshot's aggregate for that node.
    pub async fn retract_reaction(&mut self, parent: &ParentRef, kind: ReactionKind) {
        let Some(token) = self.session.auth_token().await else {
            self.view.toasts_mut().raise(ToastKind::Error, SIGN_IN_MESSAGE);
            return;
        };
        let Some(reaction_id) = self
            .snapshot
            .as_ref()
            .and_then(|s| tree::find_reactions(&s.posts, parent))
            .and_then(|agg| agg.my_reaction(kind))
            .cloned()
        else {
            tracing::debug!(kind = kind.as_wire(), "no own reaction to retract");
            return;
        };

        let confirmed = self.api.remove_reaction(&token, &reaction_id).await;
        match confirmed {
            Ok(()) => {
                self.apply_tree_update(|posts| {
                    tree::update_reaction(posts, parent, kind, &ReactionChange::Removed)
                });
            }
            Err(err) => self.abandon("removing a reaction failed", err),
        }
    }

    /// Runs a pure tree update against the held snapshot. A missing target
    /// means the snapshot went stale under us: surfaced as a warning plus a
    /// toast, never silently dropped.
    fn apply_tree_update(
        &mut self,
        update: impl FnOnce(&[Arc<Post>]) -> Result<Vec<Arc<Post>>>,
    ) -> bool {
        let result = match self.snapshot.as_ref() {
            Some(snapshot) => update(&snapshot.posts),
            None => return false,
        };
        match result {
            Ok(posts) => {
                if let Some(snapshot) = self.snapshot.as_mut() {
                    snapshot.posts = posts;
                }
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "confirmed update lost its target; snapshot is stale");
                self.view
                    .toasts_mut()
                    .raise(ToastKind::Error, STALE_BOARD_MESSAGE);
                false
            }
        }
    }

    /// Reaction/reply transport failures: logged, counted, and otherwise
    /// silently abandoned: no retry, no user-visible message.
    fn abandon(&self, what: &str, err: AppError) {
        tracing::error!(error = %err, "{what}");
        self.telemetry.record(LogType::Error, what);
    }
}
