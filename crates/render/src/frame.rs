use crate::camera::{Camera, CameraUpdate};
use crate::renderer::{FrameView, Renderer};
use crate::scene::{MaterialKind, SamplerMode, SceneObject};
use flyview_common::math::world_view_projection;
use flyview_input::{Action, InputState};
use glam::{Mat4, Vec3};

/// Viewer state changed by one-shot actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerToggles {
    pub rotation: bool,
    pub normal_map: bool,
    pub fire_fx: bool,
    pub sampler: SamplerMode,
}

impl Default for ViewerToggles {
    fn default() -> Self {
        Self {
            rotation: false,
            normal_map: true,
            fire_fx: true,
            sampler: SamplerMode::Point,
        }
    }
}

/// Everything a backend needs to draw one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// Index into [`FrameDriver::objects`].
    pub object: usize,
    pub kind: MaterialKind,
    pub world: Mat4,
    pub world_view_projection: Mat4,
    pub camera_position: Vec3,
    pub use_normal_map: bool,
}

/// Per-tick driver: camera, animated transforms, then one draw per object.
#[derive(Debug)]
pub struct FrameDriver {
    camera: Camera,
    objects: Vec<SceneObject>,
    toggles: ViewerToggles,
}

impl FrameDriver {
    pub fn new(camera: Camera, objects: Vec<SceneObject>) -> Self {
        Self {
            camera,
            objects,
            toggles: ViewerToggles::default(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn toggles(&self) -> ViewerToggles {
        self.toggles
    }

    /// Update the camera from input, then spin animated objects if rotation is on.
    pub fn update(&mut self, input: &InputState, elapsed: f32) -> CameraUpdate {
        let changed = self.camera.update(input, elapsed);
        if self.toggles.rotation {
            for object in &mut self.objects {
                object.advance_spin(elapsed);
            }
        }
        changed
    }

    /// Draws for the visible objects, opaque before partial coverage, each
    /// group in scene order.
    pub fn draw_list(&self) -> Vec<DrawCall> {
        let inverse_view = self.camera.inverse_view_matrix();
        let projection = self.camera.projection_matrix();
        let camera_position = self.camera.origin();

        let mut draws: Vec<DrawCall> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, object)| self.is_drawn(object))
            .map(|(index, object)| DrawCall {
                object: index,
                kind: object.material().kind(),
                world: object.world(),
                world_view_projection: world_view_projection(object.world(), inverse_view, projection),
                camera_position,
                use_normal_map: self.toggles.normal_map,
            })
            .collect();
        draws.sort_by_key(|draw| draw.kind);
        draws
    }

    /// Build this tick's draw list and hand it to `renderer`.
    pub fn frame<R: Renderer>(&self, renderer: &mut R) -> R::Output {
        let draws = self.draw_list();
        renderer.render(&FrameView {
            draws: &draws,
            objects: &self.objects,
            sampler: self.toggles.sampler,
            camera: &self.camera,
        })
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::CycleSampler => {
                self.toggles.sampler = self.toggles.sampler.next();
                tracing::info!("sampler state set: {}", self.toggles.sampler);
            }
            Action::ToggleRotation => {
                self.toggles.rotation = !self.toggles.rotation;
                tracing::info!("rotation {}", self.toggles.rotation);
            }
            Action::ToggleNormalMap => {
                self.toggles.normal_map = !self.toggles.normal_map;
                tracing::info!("normal map {}", self.toggles.normal_map);
            }
            Action::ToggleFireFx => {
                self.toggles.fire_fx = !self.toggles.fire_fx;
                tracing::info!("fire fx {}", self.toggles.fire_fx);
            }
            Action::ZoomIn => {
                let step = self.camera.settings().wheel_fov_step;
                self.camera.update_fov(-step);
            }
            Action::ZoomOut => {
                let step = self.camera.settings().wheel_fov_step;
                self.camera.update_fov(step);
            }
            // Bindings are printed by the app, which owns them.
            Action::PrintControls => {}
        }
    }

    fn is_drawn(&self, object: &SceneObject) -> bool {
        object.is_visible()
            && (self.toggles.fire_fx || object.material().kind() != MaterialKind::PartialCoverage)
    }
}
