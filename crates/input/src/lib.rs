//! Input for the viewer: a per-frame snapshot of held keys and mouse state,
//! plus the one-shot actions bound to key releases and the mouse wheel.
//!
//! # Invariants
//! - The camera reads only [`InputState`], never raw window events.
//! - Relative mouse motion accumulates between frames and is cleared by
//!   [`InputState::end_frame`].

pub mod action;
pub mod state;

pub use action::Action;
pub use state::{InputState, Key, MouseButton, MouseButtons};
