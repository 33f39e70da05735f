//! Asset loading for the viewer.
//!
//! Meshes come from Wavefront OBJ files and are expanded into one vertex per
//! unique face corner with tangents for normal mapping. Images are decoded to
//! tightly packed RGBA8. The renderer consumes [`MeshData`] and
//! [`ImageData`], never file handles.

mod image_data;
mod obj;

pub use image_data::{ImageData, load_image};
pub use obj::{MeshData, Vertex, load_obj, parse_obj};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OBJ parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("OBJ index {index} on line {line} is out of range")]
    IndexOutOfRange { line: usize, index: i64 },
    #[error("OBJ face on line {line} has {corners} corners, only triangles are supported")]
    UnsupportedFace { line: usize, corners: usize },
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("image buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA8")]
    ImageSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
