//! wgpu render backend for the viewer.
//!
//! Draws [`flyview_render::DrawCall`]s with one pipeline per material kind:
//! an opaque lit effect and an alpha-blended partial-coverage effect.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - Every GPU handle is owned by a Rust value and released on drop.
//! - Opaque draws are recorded before partial-coverage draws.

mod context;
mod gpu;
mod mesh;
mod shaders;
mod texture;

pub use context::GpuContext;
pub use gpu::{WgpuFrame, WgpuRenderer};

/// Failures while bringing up or presenting to the GPU.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),
}
