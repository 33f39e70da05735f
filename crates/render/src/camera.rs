use flyview_common::math::{forward_from_yaw_pitch, onb_matrix, perspective_lh, yaw_pitch_from_forward};
use flyview_input::{InputState, Key};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Below this distance a refocus always completes, even when the stop
/// distance is zero.
const MIN_STOP_DISTANCE: f32 = 0.01;

/// Tunables for [`Camera`]. Angles are in degrees, speeds per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub move_speed: f32,
    /// Applied to `move_speed` while left shift is held.
    pub boost_multiplier: f32,
    /// Radians per pixel of mouse motion.
    pub look_sensitivity: f32,
    /// World units per pixel of mouse motion.
    pub move_sensitivity: f32,
    pub fov_speed: f32,
    pub wheel_fov_step: f32,
    pub min_fov: f32,
    pub max_fov: f32,
    pub max_pitch: f32,
    pub refocus_translation_speed: f32,
    pub refocus_rotation_speed: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_speed: 30.0,
            boost_multiplier: 3.0,
            look_sensitivity: 0.007,
            move_sensitivity: 0.08,
            fov_speed: 20.0,
            wheel_fov_step: 3.0,
            min_fov: 10.0,
            max_fov: 160.0,
            max_pitch: 85.0,
            refocus_translation_speed: 2.0,
            refocus_rotation_speed: 5.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// A [`CameraSettings`] value the camera cannot work with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("field of view range {min}..{max} must satisfy 0 < min <= max < 180 degrees")]
    FovRange { min: f32, max: f32 },
    #[error("max pitch {0} must be within (0, 90] degrees")]
    MaxPitch(f32),
    #[error("clip planes near={near} far={far} must satisfy 0 < near < far")]
    ClipPlanes { near: f32, far: f32 },
}

impl CameraSettings {
    /// Check the limits the camera clamps against.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let (min, max) = (self.min_fov, self.max_fov);
        if !(min > 0.0 && min <= max && max < 180.0) {
            return Err(SettingsError::FovRange { min, max });
        }
        if !(self.max_pitch > 0.0 && self.max_pitch <= 90.0) {
            return Err(SettingsError::MaxPitch(self.max_pitch));
        }
        let (near, far) = (self.near, self.far);
        if !(near > 0.0 && near < far && far.is_finite()) {
            return Err(SettingsError::ClipPlanes { near, far });
        }
        Ok(())
    }
}

/// What a call to [`Camera::update`] rebuilt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraUpdate {
    pub view_changed: bool,
    pub projection_changed: bool,
}

/// Free-fly camera with mouse look, orbit, dolly and a smoothed refocus.
///
/// [`view_matrix`](Self::view_matrix) is the camera-to-world basis matrix
/// (rows right, up, forward, origin); [`inverse_view_matrix`](Self::inverse_view_matrix)
/// is world-to-camera and is what gets composed into the world-view-projection.
#[derive(Debug, Clone)]
pub struct Camera {
    settings: CameraSettings,

    origin: Vec3,
    target: Vec3,
    home_target: Vec3,
    stop_distance: f32,
    refocusing: bool,

    forward: Vec3,
    up: Vec3,
    right: Vec3,
    yaw: f32,
    pitch: f32,

    fov_degrees: f32,
    aspect: f32,

    view: Mat4,
    inverse_view: Mat4,
    projection: Mat4,
}

impl Camera {
    pub fn new(origin: Vec3, fov_degrees: f32, aspect: f32, target: Vec3) -> Self {
        Self::with_settings(origin, fov_degrees, aspect, target, CameraSettings::default())
    }

    /// `settings` must pass [`CameraSettings::validate`].
    pub fn with_settings(
        origin: Vec3,
        fov_degrees: f32,
        aspect: f32,
        target: Vec3,
        settings: CameraSettings,
    ) -> Self {
        let fov_degrees = fov_degrees.clamp(settings.min_fov, settings.max_fov);
        let mut camera = Self {
            origin,
            target,
            home_target: target,
            stop_distance: origin.distance(target),
            refocusing: false,
            forward: Vec3::Z,
            up: Vec3::Y,
            right: Vec3::X,
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees,
            aspect,
            view: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            settings,
        };
        camera.rebuild_view();
        camera.rebuild_projection();
        camera
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn inverse_view_matrix(&self) -> Mat4 {
        self.inverse_view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn stop_distance(&self) -> f32 {
        self.stop_distance
    }

    pub fn is_refocusing(&self) -> bool {
        self.refocusing
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Advance the camera by one frame of input.
    ///
    /// Order: keyboard translation, refocus, field of view, mouse. The view is
    /// rebuilt if the pose changed, the projection iff the field of view changed.
    pub fn update(&mut self, input: &InputState, elapsed: f32) -> CameraUpdate {
        let mut result = CameraUpdate::default();

        let mut moved = self.translate(input, elapsed);

        if input.is_held(Key::F) {
            self.target = self.home_target;
            self.refocusing = true;
        }
        if self.refocusing {
            self.step_refocus(elapsed);
            result.view_changed = true;
        }

        result.projection_changed = self.fov_from_keys(input, elapsed);

        moved |= self.apply_mouse(input);

        if moved {
            let distance = self.target.distance(self.origin);
            self.target = self.origin + self.forward * distance;
            self.rebuild_view();
            result.view_changed = true;
        }

        result
    }

    /// Change the field of view by `increment` degrees (mouse wheel).
    /// Returns whether the projection was rebuilt.
    pub fn update_fov(&mut self, increment: f32) -> bool {
        self.set_fov(self.fov_degrees + increment)
    }

    /// Returns whether the projection was rebuilt.
    pub fn set_aspect(&mut self, aspect: f32) -> bool {
        if !(aspect.is_finite() && aspect > 0.0) || aspect == self.aspect {
            return false;
        }
        self.aspect = aspect;
        self.rebuild_projection();
        true
    }

    fn set_fov(&mut self, fov_degrees: f32) -> bool {
        let clamped = fov_degrees.clamp(self.settings.min_fov, self.settings.max_fov);
        if clamped == self.fov_degrees {
            return false;
        }
        self.fov_degrees = clamped;
        self.rebuild_projection();
        true
    }

    fn translate(&mut self, input: &InputState, elapsed: f32) -> bool {
        let mut step = self.settings.move_speed * elapsed;
        if input.is_held(Key::LeftShift) {
            step *= self.settings.boost_multiplier;
        }

        let mut moved = false;
        let mut nudge = |held: bool, delta: Vec3| {
            if held {
                self.origin += delta;
                moved = true;
            }
        };
        nudge(input.is_held(Key::W), self.forward * step);
        nudge(input.is_held(Key::S), -self.forward * step);
        nudge(input.is_held(Key::D), self.right * step);
        nudge(input.is_held(Key::A), -self.right * step);
        // Vertical moves stay on the world Y axis.
        nudge(input.is_held(Key::E), Vec3::Y * self.up.y * step);
        nudge(input.is_held(Key::Q), -Vec3::Y * self.up.y * step);
        moved
    }

    fn step_refocus(&mut self, elapsed: f32) {
        let t = (self.settings.refocus_translation_speed * elapsed).clamp(0.0, 1.0);
        self.origin = self.origin.lerp(self.target, t);

        if let Some(to_target) = (self.target - self.origin).try_normalize() {
            let r = (self.settings.refocus_rotation_speed * elapsed).clamp(0.0, 1.0);
            self.forward = self
                .forward
                .lerp(to_target, r)
                .try_normalize()
                .unwrap_or(to_target);
        }
        self.rebuild_view();

        let distance = self.origin.distance(self.target);
        if distance < self.stop_distance.max(MIN_STOP_DISTANCE) {
            if let Some(to_target) = (self.target - self.origin).try_normalize() {
                self.forward = to_target;
            }

            let (yaw, pitch) = yaw_pitch_from_forward(self.forward);
            self.yaw = yaw;
            self.pitch = self.clamp_pitch(pitch);
            if self.pitch != pitch {
                // Forward must match the clamped angles the next look starts from.
                self.forward = forward_from_yaw_pitch(self.yaw, self.pitch);
            }
            self.target = self.origin + self.forward * distance;

            self.refocusing = false;
            self.rebuild_view();
            tracing::debug!("refocus complete at distance {distance:.2}");
        }
    }

    fn fov_from_keys(&mut self, input: &InputState, elapsed: f32) -> bool {
        let step = self.settings.fov_speed * elapsed;
        let mut fov = self.fov_degrees;
        if input.is_held(Key::Down) && fov < self.settings.max_fov {
            fov += step;
        }
        if input.is_held(Key::Up) && fov > self.settings.min_fov {
            fov -= step;
        }
        self.set_fov(fov)
    }

    fn apply_mouse(&mut self, input: &InputState) -> bool {
        let buttons = input.buttons();
        let alt = input.is_held(Key::LeftAlt);
        let delta = input.mouse_delta();
        let look = self.settings.look_sensitivity;
        let travel = self.settings.move_sensitivity;

        if buttons.right && alt {
            // Dolly.
            self.origin += self.forward * (delta.x * travel);
        } else if buttons.left && buttons.right {
            // Pan vertically.
            self.origin -= self.up * (delta.y * travel);
        } else if buttons.right {
            self.look(delta.x * look, -delta.y * look);
        } else if buttons.left && !alt {
            self.look(delta.x * look, 0.0);
            let travel = delta.y * travel;
            self.origin.x -= self.forward.x * travel;
            self.origin.z -= self.forward.z * travel;
        }

        if alt && buttons.left {
            self.orbit(delta.x * look, -delta.y * look);
        }

        buttons.any()
    }

    fn look(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = self.clamp_pitch(self.pitch + pitch_delta);
        self.forward = forward_from_yaw_pitch(self.yaw, self.pitch);
    }

    /// Rotate about the current target, keeping the distance to it.
    fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) {
        let distance = self.target.distance(self.origin);
        self.look(yaw_delta, pitch_delta);
        self.origin = self.target - self.forward * distance;
    }

    fn clamp_pitch(&self, pitch: f32) -> f32 {
        let limit = self.settings.max_pitch.to_radians();
        pitch.clamp(-limit, limit)
    }

    fn rebuild_view(&mut self) {
        // A vertical forward keeps the previous right vector.
        if let Some(right) = Vec3::Y.cross(self.forward).try_normalize() {
            self.right = right;
        }
        self.up = self.forward.cross(self.right).normalize();

        self.view = onb_matrix(self.right, self.up, self.forward, self.origin);
        self.inverse_view = self.view.inverse();
    }

    fn rebuild_projection(&mut self) {
        self.projection = perspective_lh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.settings.near,
            self.settings.far,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use flyview_input::MouseButton;

    const ASPECT: f32 = 640.0 / 480.0;

    fn demo_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, -50.0), 45.0, ASPECT, Vec3::ZERO)
    }

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-4);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-4);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-4);
    }

    fn assert_identity(m: Mat4) {
        for (x, y) in m.to_cols_array().iter().zip(Mat4::IDENTITY.to_cols_array().iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-4);
        }
    }

    #[test]
    fn construction_faces_positive_z() {
        let cam = demo_camera();
        assert_eq!(cam.forward(), Vec3::Z);
        assert_eq!(cam.right(), Vec3::X);
        assert_eq!(cam.up(), Vec3::Y);
        assert_relative_eq!(cam.stop_distance(), 50.0);
        assert!(!cam.is_refocusing());
    }

    #[test]
    fn idle_update_keeps_matrices() {
        let mut cam = demo_camera();
        let (view, inv, proj) = (cam.view_matrix(), cam.inverse_view_matrix(), cam.projection_matrix());

        let changed = cam.update(&InputState::new(), 0.016);

        assert_eq!(changed, CameraUpdate::default());
        assert_eq!(cam.view_matrix(), view);
        assert_eq!(cam.inverse_view_matrix(), inv);
        assert_eq!(cam.projection_matrix(), proj);
    }

    #[test]
    fn translation_is_linear_and_keeps_basis() {
        let mut cam = demo_camera();
        let start = cam.origin();
        let basis = (cam.forward(), cam.right(), cam.up());

        let forward = InputState::new().with_key(Key::W);
        for _ in 0..10 {
            cam.update(&forward, 0.1);
        }
        assert_vec_eq(cam.origin(), start + Vec3::Z * 30.0);

        let strafe = InputState::new().with_key(Key::D);
        cam.update(&strafe, 0.5);
        assert_vec_eq(cam.origin(), start + Vec3::new(15.0, 0.0, 30.0));

        let rise = InputState::new().with_key(Key::E);
        cam.update(&rise, 0.2);
        assert_relative_eq!(cam.origin().y, 6.0, epsilon = 1e-4);

        assert_eq!((cam.forward(), cam.right(), cam.up()), basis);
    }

    #[test]
    fn shift_boosts_translation() {
        let mut cam = demo_camera();
        let input = InputState::new().with_key(Key::S).with_key(Key::LeftShift);
        cam.update(&input, 0.1);
        assert_relative_eq!(cam.origin().z, -50.0 - 9.0, epsilon = 1e-4);
    }

    #[test]
    fn translation_rebuilds_view_but_not_projection() {
        let mut cam = demo_camera();
        let changed = cam.update(&InputState::new().with_key(Key::A), 0.016);
        assert!(changed.view_changed);
        assert!(!changed.projection_changed);
    }

    #[test]
    fn pitch_is_clamped_for_any_mouse_input() {
        let mut cam = demo_camera();
        let limit = 85.0_f32.to_radians();

        let up = InputState::new().with_button(MouseButton::Right).with_mouse_delta(0.0, -10_000.0);
        for _ in 0..5 {
            cam.update(&up, 0.016);
            assert!(cam.pitch() <= limit + 1e-6);
        }
        assert_relative_eq!(cam.pitch(), limit, epsilon = 1e-6);
        assert!(cam.forward().y > 0.99);

        let down = InputState::new().with_button(MouseButton::Right).with_mouse_delta(0.0, 50_000.0);
        cam.update(&down, 0.016);
        assert_relative_eq!(cam.pitch(), -limit, epsilon = 1e-6);
    }

    #[test]
    fn orbit_pitch_is_clamped() {
        let mut cam = demo_camera();
        let input = InputState::new()
            .with_key(Key::LeftAlt)
            .with_button(MouseButton::Left)
            .with_mouse_delta(0.0, 90_000.0);
        cam.update(&input, 0.016);
        assert!(cam.pitch().abs() <= 85.0_f32.to_radians() + 1e-6);
    }

    #[test]
    fn fov_is_clamped_and_projection_tracks_changes() {
        let mut cam = demo_camera();
        let widen = InputState::new().with_key(Key::Down);

        let changed = cam.update(&widen, 1.0);
        assert!(changed.projection_changed);
        assert_relative_eq!(cam.fov_degrees(), 65.0);

        for _ in 0..20 {
            cam.update(&widen, 1.0);
        }
        assert_relative_eq!(cam.fov_degrees(), 160.0);

        let proj = cam.projection_matrix();
        let changed = cam.update(&widen, 1.0);
        assert!(!changed.projection_changed);
        assert_eq!(cam.projection_matrix(), proj);

        let narrow = InputState::new().with_key(Key::Up);
        for _ in 0..40 {
            cam.update(&narrow, 1.0);
            assert!(cam.fov_degrees() >= 10.0);
        }
        assert_relative_eq!(cam.fov_degrees(), 10.0);
    }

    #[test]
    fn wheel_fov_is_clamped() {
        let mut cam = demo_camera();
        assert!(cam.update_fov(-3.0));
        assert_relative_eq!(cam.fov_degrees(), 42.0);

        for _ in 0..100 {
            cam.update_fov(3.0);
        }
        assert_relative_eq!(cam.fov_degrees(), 160.0);
        assert!(!cam.update_fov(3.0));
    }

    #[test]
    fn view_times_inverse_is_identity_for_reachable_poses() {
        let mut cam = demo_camera();
        let inputs = [
            InputState::new().with_button(MouseButton::Right).with_mouse_delta(120.0, -40.0),
            InputState::new().with_key(Key::W).with_key(Key::D),
            InputState::new().with_button(MouseButton::Left).with_mouse_delta(-35.0, 12.0),
            InputState::new()
                .with_key(Key::LeftAlt)
                .with_button(MouseButton::Left)
                .with_mouse_delta(60.0, 25.0),
            InputState::new()
                .with_button(MouseButton::Left)
                .with_button(MouseButton::Right)
                .with_mouse_delta(0.0, 30.0),
            InputState::new().with_key(Key::F),
        ];
        for input in inputs.iter().cycle().take(30) {
            cam.update(input, 0.05);
            assert_identity(cam.view_matrix() * cam.inverse_view_matrix());
            assert_relative_eq!(cam.right().dot(cam.forward()), 0.0, epsilon = 1e-4);
            assert_relative_eq!(cam.up().dot(cam.forward()), 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn inverse_view_maps_origin_to_camera_space_zero() {
        let mut cam = demo_camera();
        cam.update(&InputState::new().with_button(MouseButton::Right).with_mouse_delta(40.0, 10.0), 0.016);
        let local = cam.inverse_view_matrix().transform_point3(cam.origin());
        assert_vec_eq(local, Vec3::ZERO);
    }

    #[test]
    fn right_mouse_looks_around() {
        let mut cam = demo_camera();
        let input = InputState::new().with_button(MouseButton::Right).with_mouse_delta(100.0, 0.0);
        let changed = cam.update(&input, 0.016);
        assert!(changed.view_changed);
        assert_relative_eq!(cam.yaw(), 0.7, epsilon = 1e-6);
        assert_vec_eq(cam.forward(), forward_from_yaw_pitch(0.7, 0.0));
        assert_vec_eq(cam.origin(), Vec3::new(0.0, 0.0, -50.0));
    }

    #[test]
    fn alt_right_mouse_dollies_along_forward() {
        let mut cam = demo_camera();
        let input = InputState::new()
            .with_key(Key::LeftAlt)
            .with_button(MouseButton::Right)
            .with_mouse_delta(100.0, 0.0);
        cam.update(&input, 0.016);
        assert_vec_eq(cam.origin(), Vec3::new(0.0, 0.0, -42.0));
        assert_eq!(cam.forward(), Vec3::Z);
    }

    #[test]
    fn both_buttons_pan_vertically() {
        let mut cam = demo_camera();
        let input = InputState::new()
            .with_button(MouseButton::Left)
            .with_button(MouseButton::Right)
            .with_mouse_delta(0.0, 50.0);
        cam.update(&input, 0.016);
        assert_vec_eq(cam.origin(), Vec3::new(0.0, -4.0, -50.0));
    }

    #[test]
    fn left_mouse_moves_on_ground_plane() {
        let mut cam = demo_camera();
        let input = InputState::new().with_button(MouseButton::Left).with_mouse_delta(0.0, -100.0);
        cam.update(&input, 0.016);
        assert_vec_eq(cam.origin(), Vec3::new(0.0, 0.0, -42.0));
    }

    #[test]
    fn orbit_keeps_distance_to_target() {
        let mut cam = demo_camera();
        let input = InputState::new()
            .with_key(Key::LeftAlt)
            .with_button(MouseButton::Left)
            .with_mouse_delta(150.0, 30.0);
        cam.update(&input, 0.016);

        assert_relative_eq!(cam.origin().distance(Vec3::ZERO), 50.0, epsilon = 1e-3);
        assert_vec_eq(cam.target(), Vec3::ZERO);
        // Still looking at the target.
        assert_vec_eq(cam.forward(), (Vec3::ZERO - cam.origin()).normalize());
    }

    #[test]
    fn refocus_converges_and_releases_latch() {
        let mut cam = demo_camera();

        // Wander away from the target.
        let look = InputState::new().with_button(MouseButton::Right).with_mouse_delta(80.0, -30.0);
        cam.update(&look, 0.016);
        let back = InputState::new().with_key(Key::S);
        for _ in 0..20 {
            cam.update(&back, 0.05);
        }
        let start = cam.origin().distance(Vec3::ZERO);
        assert!(start > cam.stop_distance());

        cam.update(&InputState::new().with_key(Key::F), 0.016);
        assert!(cam.is_refocusing());

        let idle = InputState::new();
        let mut previous = cam.origin().distance(Vec3::ZERO);
        let mut steps = 0;
        while cam.is_refocusing() {
            cam.update(&idle, 0.016);
            let distance = cam.origin().distance(Vec3::ZERO);
            assert!(distance < previous);
            previous = distance;
            steps += 1;
            assert!(steps < 1000, "refocus never completed");
        }

        assert!(previous < cam.stop_distance());
        let (yaw, pitch) = yaw_pitch_from_forward(cam.forward());
        assert_relative_eq!(cam.yaw(), yaw, epsilon = 1e-6);
        assert_relative_eq!(cam.pitch(), pitch, epsilon = 1e-6);
        assert_vec_eq(cam.forward(), (Vec3::ZERO - cam.origin()).normalize());

        // Free look works again afterwards.
        let yaw_before = cam.yaw();
        cam.update(&look, 0.016);
        assert!(!cam.is_refocusing());
        assert!(cam.yaw() > yaw_before);
    }

    #[test]
    fn refocus_completes_with_zero_stop_distance() {
        let mut cam = Camera::new(Vec3::ZERO, 45.0, ASPECT, Vec3::ZERO);
        cam.update(&InputState::new().with_key(Key::W), 1.0);
        cam.update(&InputState::new().with_key(Key::F), 0.5);

        let idle = InputState::new();
        for _ in 0..2000 {
            if !cam.is_refocusing() {
                break;
            }
            cam.update(&idle, 0.016);
        }
        assert!(!cam.is_refocusing());
        assert!(cam.forward().is_finite());
    }

    #[test]
    fn refocus_from_straight_above_stays_finite() {
        let mut cam = Camera::new(Vec3::new(0.0, 50.0, 0.0), 45.0, ASPECT, Vec3::ZERO);
        cam.update(&InputState::new().with_key(Key::E), 1.0);
        assert!(cam.origin().y > 50.0);

        cam.update(&InputState::new().with_key(Key::F), 0.016);
        let idle = InputState::new();
        let mut steps = 0;
        while cam.is_refocusing() {
            cam.update(&idle, 0.016);
            steps += 1;
            assert!(steps < 1000, "refocus never completed");
        }

        // Straight down is past the pitch limit.
        let limit = cam.settings().max_pitch.to_radians();
        assert_relative_eq!(cam.pitch(), -limit, epsilon = 1e-5);
        assert_relative_eq!(cam.forward().y, cam.pitch().sin(), epsilon = 1e-5);
        assert!(cam.forward().y < -0.99);

        for v in [cam.forward(), cam.right(), cam.up()] {
            assert!(v.is_finite());
            assert_relative_eq!(v.length(), 1.0, epsilon = 1e-4);
        }
        assert_relative_eq!(cam.right().dot(cam.up()), 0.0, epsilon = 1e-4);
        assert_relative_eq!(cam.right().dot(cam.forward()), 0.0, epsilon = 1e-4);
        assert_relative_eq!(cam.up().dot(cam.forward()), 0.0, epsilon = 1e-4);
        assert_identity(cam.view_matrix() * cam.inverse_view_matrix());

        // A still mouse look starts from the same forward.
        let forward = cam.forward();
        cam.update(&InputState::new().with_button(MouseButton::Right), 0.016);
        assert_vec_eq(cam.forward(), forward);
    }

    #[test]
    fn vertical_forward_keeps_previous_right() {
        let mut cam = demo_camera();
        cam.forward = Vec3::NEG_Y;
        cam.rebuild_view();

        assert_eq!(cam.right(), Vec3::X);
        assert_vec_eq(cam.up(), Vec3::Z);
        assert!(cam.view_matrix().is_finite());
        assert_identity(cam.view_matrix() * cam.inverse_view_matrix());
    }

    #[test]
    fn set_aspect_rebuilds_projection() {
        let mut cam = demo_camera();
        let before = cam.projection_matrix();
        assert!(cam.set_aspect(16.0 / 9.0));
        assert_ne!(cam.projection_matrix(), before);
        assert!(!cam.set_aspect(0.0));
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: CameraSettings = serde_yaml::from_str("move_speed: 12.5").unwrap();
        assert_eq!(settings.move_speed, 12.5);
        assert_eq!(settings.max_pitch, 85.0);
        assert_eq!(settings.min_fov, 10.0);
    }

    #[test]
    fn default_settings_are_valid() {
        assert_eq!(CameraSettings::default().validate(), Ok(()));
    }

    #[test]
    fn inverted_fov_range_is_rejected() {
        let settings = CameraSettings {
            min_fov: 120.0,
            max_fov: 60.0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::FovRange { .. })));

        let settings = CameraSettings {
            max_fov: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::FovRange { .. })));
    }

    #[test]
    fn bad_max_pitch_is_rejected() {
        for max_pitch in [0.0, -10.0, 95.0, f32::NAN, f32::INFINITY] {
            let settings = CameraSettings {
                max_pitch,
                ..Default::default()
            };
            assert!(
                matches!(settings.validate(), Err(SettingsError::MaxPitch(_))),
                "max_pitch {max_pitch} accepted"
            );
        }
    }

    #[test]
    fn bad_clip_planes_are_rejected() {
        for (near, far) in [(0.0, 100.0), (-1.0, 100.0), (10.0, 10.0), (50.0, 1.0), (0.1, f32::INFINITY)] {
            let settings = CameraSettings {
                near,
                far,
                ..Default::default()
            };
            assert!(
                matches!(settings.validate(), Err(SettingsError::ClipPlanes { .. })),
                "near={near} far={far} accepted"
            );
        }
    }
}
