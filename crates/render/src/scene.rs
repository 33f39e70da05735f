use flyview_assets::MeshData;
use flyview_common::math::{compose, rotation_about_pivot};
use glam::{Mat4, Vec3};
use std::fmt;
use std::path::PathBuf;

/// Texture filtering applied to every material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SamplerMode {
    #[default]
    Point,
    Linear,
    /// 16x anisotropic.
    Anisotropic,
}

impl SamplerMode {
    pub const ALL: [SamplerMode; 3] = [Self::Point, Self::Linear, Self::Anisotropic];

    /// The next mode in the cycle, wrapping.
    pub fn next(self) -> Self {
        match self {
            Self::Point => Self::Linear,
            Self::Linear => Self::Anisotropic,
            Self::Anisotropic => Self::Point,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SamplerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Point => "POINT",
            Self::Linear => "LINEAR",
            Self::Anisotropic => "ANISOTROPIC",
        })
    }
}

/// Opaque surface lit with diffuse, specular and glossiness maps, plus an
/// optional tangent-space normal map.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadedMaterial {
    pub diffuse: PathBuf,
    pub normal: PathBuf,
    pub specular: PathBuf,
    pub gloss: PathBuf,
}

/// Alpha-blended, double-sided surface that tests depth but never writes it.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialCoverageMaterial {
    pub diffuse: PathBuf,
}

/// Shader parameter set of a scene object, picked when the object is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Shaded(ShadedMaterial),
    PartialCoverage(PartialCoverageMaterial),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaterialKind {
    Shaded,
    PartialCoverage,
}

impl Material {
    pub fn kind(&self) -> MaterialKind {
        match self {
            Self::Shaded(_) => MaterialKind::Shaded,
            Self::PartialCoverage(_) => MaterialKind::PartialCoverage,
        }
    }
}

/// Constant-rate rotation about the vertical axis through `pivot`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub pivot: Vec3,
    /// Radians per second.
    pub speed: f32,
}

/// Immutable geometry with a mutable world transform and its own material.
#[derive(Debug, Clone)]
pub struct SceneObject {
    name: String,
    mesh: MeshData,
    material: Material,
    world: Mat4,
    spin: Option<Spin>,
    visible: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: MeshData, material: Material) -> Self {
        Self {
            name: name.into(),
            mesh,
            material,
            world: Mat4::IDENTITY,
            spin: None,
            visible: true,
        }
    }

    /// Place the object at `position` with an identity basis.
    pub fn at(mut self, position: Vec3) -> Self {
        self.world = compose(self.world, Mat4::from_translation(position));
        self
    }

    /// Spin about the object's position at `speed` radians per second.
    pub fn spinning(mut self, speed: f32) -> Self {
        self.spin = Some(Spin {
            pivot: self.position(),
            speed,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }

    /// Translation row of the world matrix.
    pub fn position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    pub fn spin(&self) -> Option<Spin> {
        self.spin
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Advance the spin by `elapsed` seconds. No-op without a spin.
    pub fn advance_spin(&mut self, elapsed: f32) {
        if let Some(spin) = self.spin {
            let step = rotation_about_pivot(spin.pivot, spin.speed * elapsed);
            self.world = compose(self.world, step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use flyview_assets::Vertex;
    use glam::Vec2;

    fn triangle() -> MeshData {
        let vertex = |x: f32, y: f32| Vertex {
            position: Vec3::new(x, y, 0.0),
            uv: Vec2::ZERO,
            normal: Vec3::NEG_Z,
            tangent: Vec3::X,
        };
        MeshData {
            vertices: vec![vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(0.0, 1.0)],
            indices: vec![0, 1, 2],
        }
    }

    fn fire() -> Material {
        Material::PartialCoverage(PartialCoverageMaterial {
            diffuse: "fireFX_diffuse.png".into(),
        })
    }

    #[test]
    fn sampler_cycle_wraps() {
        let mut mode = SamplerMode::Point;
        let mut seen = Vec::new();
        for _ in 0..4 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                SamplerMode::Linear,
                SamplerMode::Anisotropic,
                SamplerMode::Point,
                SamplerMode::Linear
            ]
        );
        assert_eq!(SamplerMode::Anisotropic.to_string(), "ANISOTROPIC");
    }

    #[test]
    fn material_kind_follows_variant() {
        let shaded = Material::Shaded(ShadedMaterial {
            diffuse: "d.png".into(),
            normal: "n.png".into(),
            specular: "s.png".into(),
            gloss: "g.png".into(),
        });
        assert_eq!(shaded.kind(), MaterialKind::Shaded);
        assert_eq!(fire().kind(), MaterialKind::PartialCoverage);
    }

    #[test]
    fn placed_object_reports_position() {
        let obj = SceneObject::new("fire", triangle(), fire()).at(Vec3::new(2.0, 0.0, 5.0));
        assert_eq!(obj.position(), Vec3::new(2.0, 0.0, 5.0));
        assert!(obj.is_visible());
    }

    #[test]
    fn spin_rotates_about_own_position() {
        let pivot = Vec3::new(10.0, 0.0, 0.0);
        let mut obj = SceneObject::new("vehicle", triangle(), fire()).at(pivot).spinning(1.0);

        obj.advance_spin(std::f32::consts::FRAC_PI_2);

        // The origin stays put, the local +X axis turns about Y.
        let p = obj.world().transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.distance(pivot), 0.0, epsilon = 1e-4);
        let x_axis = obj.world().transform_vector3(Vec3::X);
        assert_relative_eq!(x_axis.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(x_axis.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(x_axis.z.abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn spin_accumulates_linearly() {
        let mut a = SceneObject::new("a", triangle(), fire()).spinning(2.0);
        let mut b = a.clone();
        for _ in 0..10 {
            a.advance_spin(0.05);
        }
        b.advance_spin(0.5);
        for (x, y) in a.world().to_cols_array().iter().zip(b.world().to_cols_array().iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-5);
        }
    }

    #[test]
    fn no_spin_is_noop() {
        let mut obj = SceneObject::new("static", triangle(), fire());
        obj.advance_spin(1.0);
        assert_eq!(obj.world(), Mat4::IDENTITY);
    }
}
