use crate::camera::Camera;
use crate::frame::DrawCall;
use crate::scene::{SamplerMode, SceneObject};

/// One frame's worth of submissions.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Ordered draws; `DrawCall::object` indexes `objects`.
    pub draws: &'a [DrawCall],
    pub objects: &'a [SceneObject],
    pub sampler: SamplerMode,
    pub camera: &'a Camera,
}

/// Renderer-agnostic interface. All backends implement this trait.
///
/// A renderer consumes precomputed draws and never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Submit one frame.
    fn render(&mut self, frame: &FrameView<'_>) -> Self::Output;
}

/// Text renderer that describes a frame instead of drawing it.
///
/// Used when no GPU is available and for testing the frame driver.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &FrameView<'_>) -> String {
        let mut out = String::new();
        let cam = frame.camera;
        let o = cam.origin();
        let f = cam.forward();

        out.push_str(&format!(
            "=== Frame (draws={}, sampler={}) ===\n",
            frame.draws.len(),
            frame.sampler
        ));
        out.push_str(&format!(
            "Camera: origin=({:.2}, {:.2}, {:.2}) forward=({:.2}, {:.2}, {:.2}) fov={:.1}\n",
            o.x,
            o.y,
            o.z,
            f.x,
            f.y,
            f.z,
            cam.fov_degrees()
        ));

        for draw in frame.draws {
            let Some(object) = frame.objects.get(draw.object) else {
                continue;
            };
            let p = draw.world.w_axis;
            out.push_str(&format!(
                "  [{}] {} {:?} tris={} pos=({:.2}, {:.2}, {:.2}) normal_map={}\n",
                draw.object,
                object.name(),
                draw.kind,
                object.mesh().triangle_count(),
                p.x,
                p.y,
                p.z,
                draw.use_normal_map
            ));
        }

        out
    }
}
