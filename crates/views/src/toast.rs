//! Ephemeral user-visible messages. Toasts self-dismiss after a fixed
//! display window plus a fade; expiry is computed against a caller-supplied
//! clock, since the page is single-threaded and event-driven.

use chrono::{DateTime, Duration, Utc};

/// How long a toast stays fully visible.
pub const DISPLAY_MS: i64 = 4_000;
/// The fade transition tacked onto the display window.
pub const FADE_MS: i64 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Toast {
    /// Whether the toast is past display + fade at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.raised_at > Duration::milliseconds(DISPLAY_MS + FADE_MS)
    }
}

/// The page's toast stack, newest last.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn raise(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toasts.push(Toast {
            kind,
            message: message.into(),
            raised_at: Utc::now(),
        });
    }

    /// Drops toasts past their display + fade window.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.toasts.retain(|toast| !toast.is_expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
