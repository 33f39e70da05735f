use flyview_assets::load_obj;
use flyview_render::{Material, PartialCoverageMaterial, SceneObject, ShadedMaterial};
use glam::Vec3;
use std::path::Path;

/// Where the demo vehicle sits and spins.
const VEHICLE_POSITION: Vec3 = Vec3::ZERO;

/// Load the vehicle and its fire effect from `resources`.
///
/// A mesh that cannot be loaded is logged and left out; the rest of the
/// scene is still returned.
pub fn demo_scene(resources: &Path, spin_speed: f32) -> Vec<SceneObject> {
    let vehicle = Material::Shaded(ShadedMaterial {
        diffuse: resources.join("vehicle_diffuse.png"),
        normal: resources.join("vehicle_normal.png"),
        specular: resources.join("vehicle_specular.png"),
        gloss: resources.join("vehicle_gloss.png"),
    });
    let fire = Material::PartialCoverage(PartialCoverageMaterial {
        diffuse: resources.join("fireFX_diffuse.png"),
    });

    [
        ("vehicle", "vehicle.obj", vehicle),
        ("fire", "fireFX.obj", fire),
    ]
    .into_iter()
    .filter_map(|(name, file, material)| {
        let path = resources.join(file);
        match load_obj(&path, true) {
            Ok(mesh) => {
                tracing::info!(
                    "loaded {} ({} vertices, {} triangles)",
                    path.display(),
                    mesh.vertices.len(),
                    mesh.triangle_count()
                );
                Some(
                    SceneObject::new(name, mesh, material)
                        .at(VEHICLE_POSITION)
                        .spinning(spin_speed),
                )
            }
            Err(e) => {
                tracing::error!("skipping {name}: failed to load {}: {e}", path.display());
                None
            }
        }
    })
    .collect()
}
