//! Shared math conventions for the viewer.
//!
//! # Invariants
//! - Matrices are composed in row-vector, left-handed form.
//! - Only [`math`] translates between that form and glam's column-vector storage.

pub mod math;
pub mod types;

pub use math::{
    compose, forward_from_yaw_pitch, onb_matrix, perspective_lh, rotation_about_pivot,
    world_view_projection, yaw_pitch_from_forward,
};
pub use types::ClearColor;
