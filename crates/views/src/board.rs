//! The board page's view state: one [`NodeUiState`] per post or comment,
//! keyed by [`ParentRef`], plus the toast stack. Transition methods encode
//! the page's rules; anything needing the network goes through a service
//! first and lands here only after confirmation.

use std::collections::HashMap;

use domains::models::ParentRef;

use crate::node::NodeUiState;
use crate::toast::{ToastKind, ToastQueue};

/// Shown when an unauthenticated visitor tries to compose or edit.
pub const SIGN_IN_MESSAGE: &str = "Sign in to join the conversation";

#[derive(Debug, Default)]
pub struct BoardViewState {
    nodes: HashMap<ParentRef, NodeUiState>,
    toasts: ToastQueue,
}

impl BoardViewState {
    /// The node's current flags; absent nodes read as default (collapsed,
    /// idle, picker closed).
    pub fn node(&self, key: &ParentRef) -> NodeUiState {
        self.nodes.get(key).copied().unwrap_or_default()
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    pub fn toggle_replies(&mut self, key: &ParentRef) {
        let state = self.entry(key);
        state.expanded = !state.expanded;
    }

    /// Opens the reply composer. Refused while unauthenticated: state is
    /// untouched and exactly one ephemeral message is raised instead.
    pub fn begin_reply(&mut self, key: &ParentRef, authenticated: bool) {
        if !authenticated {
            self.toasts.raise(ToastKind::Error, SIGN_IN_MESSAGE);
            return;
        }
        self.entry(key).composing_reply = true;
    }

    pub fn cancel_reply(&mut self, key: &ParentRef) {
        self.entry(key).composing_reply = false;
    }

    /// A reply was confirmed: the node expands so the new reply is visible
    /// and the composer closes.
    pub fn on_reply_submitted(&mut self, key: &ParentRef) {
        let state = self.entry(key);
        state.expanded = true;
        state.composing_reply = false;
    }

    /// Opens the edit field. Comments only; refused while unauthenticated,
    /// same as [`begin_reply`](Self::begin_reply).
    pub fn begin_edit(&mut self, key: &ParentRef, authenticated: bool) {
        if !matches!(key, ParentRef::Comment(_)) {
            return;
        }
        if !authenticated {
            self.toasts.raise(ToastKind::Error, SIGN_IN_MESSAGE);
            return;
        }
        self.entry(key).editing = true;
    }

    pub fn cancel_edit(&mut self, key: &ParentRef) {
        self.entry(key).editing = false;
    }

    pub fn on_edit_submitted(&mut self, key: &ParentRef) {
        self.entry(key).editing = false;
    }

    /// The picker's own toggle control: clicking it again closes.
    pub fn toggle_picker(&mut self, key: &ParentRef) {
        let state = self.entry(key);
        state.picker_open = !state.picker_open;
    }

    /// A reaction was chosen from the picker.
    pub fn close_picker(&mut self, key: &ParentRef) {
        self.entry(key).picker_open = false;
    }

    /// Pointer-down outside the picker's bounding element.
    pub fn pointer_outside(&mut self, key: &ParentRef) {
        self.entry(key).picker_open = false;
    }

    fn entry(&mut self, key: &ParentRef) -> &mut NodeUiState {
        self.nodes.entry(key.clone()).or_default()
    }
}
