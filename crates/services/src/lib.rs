//! # services
//!
//! Orchestration over the domain ports: the board page controller, the
//! observable session, and client-side validation. This is the single
//! mutation path for the snapshot: user action, session gate, validation,
//! network call, then the pure tree update that reconciles the
//! server-assigned identifiers.

pub mod board;
pub mod session;
pub mod validate;

pub use board::BoardService;
pub use session::{SessionEvent, SessionService};
