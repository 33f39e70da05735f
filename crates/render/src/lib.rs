//! Renderer-agnostic viewer core.
//!
//! # Invariants
//! - The camera basis stays orthonormal; pitch stays within the configured limit.
//! - Field of view stays within its limits; the projection is rebuilt only
//!   when it changes.
//! - World-view-projection is `world × inverse-view × projection`.
//! - Renderers read draws and never mutate the scene.

pub mod camera;
pub mod frame;
pub mod renderer;
pub mod scene;

pub use camera::{Camera, CameraSettings, CameraUpdate, SettingsError};
pub use frame::{DrawCall, FrameDriver, ViewerToggles};
pub use renderer::{DebugTextRenderer, FrameView, Renderer};
pub use scene::{
    Material, MaterialKind, PartialCoverageMaterial, SamplerMode, SceneObject, ShadedMaterial,
    Spin,
};
