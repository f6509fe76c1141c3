//! # views
//!
//! Presentation state for the board page: per-node UI flags, their
//! transition rules, and the ephemeral toast queue. Everything here is
//! synchronous and free of IO; services drive it after the network has
//! confirmed a mutation.

pub mod node;
pub mod toast;

mod board;

pub use board::{BoardViewState, SIGN_IN_MESSAGE};
pub use node::NodeUiState;
pub use toast::{Toast, ToastKind, ToastQueue};
