use crate::AssetError;
use glam::{Vec2, Vec3};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One expanded mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

/// Triangle-list geometry ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// `(position, uv, normal)` indices of a face corner, zero-based.
type Corner = (usize, Option<usize>, Option<usize>);

/// Load and parse an OBJ file. See [`parse_obj`].
pub fn load_obj(path: impl AsRef<Path>, flip_axis_and_winding: bool) -> Result<MeshData, AssetError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mesh = parse_obj(BufReader::new(file), flip_axis_and_winding)?;
    tracing::debug!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse triangulated OBJ geometry.
///
/// Only `v`, `vt`, `vn` and `f` records are read. Identical face corners share
/// one output vertex. Texture `v` is flipped to `1 - v`. With
/// `flip_axis_and_winding`, z of positions and normals is negated and every
/// triangle's winding is reversed, converting right-handed data to the
/// viewer's left-handed space. Corners without a normal get the area-weighted
/// face normal. Tangents are derived from the uv layout.
pub fn parse_obj<R: BufRead>(reader: R, flip_axis_and_winding: bool) -> Result<MeshData, AssetError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    let mut mesh = MeshData::default();
    let mut has_normal: Vec<bool> = Vec::new();
    let mut corner_lookup: HashMap<Corner, u32> = HashMap::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else {
            continue;
        };

        match tag {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no)?;
                positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&mut tokens, line_no)?;
                uvs.push(Vec2::new(u, 1.0 - v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no)?;
                normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let corners: Vec<&str> = tokens.collect();
                if corners.len() != 3 {
                    return Err(AssetError::UnsupportedFace {
                        line: line_no,
                        corners: corners.len(),
                    });
                }

                let mut triangle = [0u32; 3];
                for (slot, corner) in triangle.iter_mut().zip(&corners) {
                    let key = parse_corner(corner, line_no, positions.len(), uvs.len(), normals.len())?;
                    *slot = match corner_lookup.get(&key) {
                        Some(&index) => index,
                        None => {
                            let index = mesh.vertices.len() as u32;
                            let (p, t, n) = key;
                            let mut position = positions[p];
                            let mut normal = n.map(|n| normals[n]).unwrap_or(Vec3::ZERO);
                            if flip_axis_and_winding {
                                position.z = -position.z;
                                normal.z = -normal.z;
                            }
                            mesh.vertices.push(Vertex {
                                position,
                                uv: t.map(|t| uvs[t]).unwrap_or(Vec2::ZERO),
                                normal,
                                tangent: Vec3::ZERO,
                            });
                            has_normal.push(n.is_some());
                            corner_lookup.insert(key, index);
                            index
                        }
                    };
                }

                if flip_axis_and_winding {
                    triangle.swap(1, 2);
                }
                mesh.indices.extend_from_slice(&triangle);
            }
            // Groups, objects, smoothing and material records carry no geometry.
            _ => {}
        }
    }

    fill_missing_normals(&mut mesh, &has_normal);
    compute_tangents(&mut mesh);
    Ok(mesh)
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; N], AssetError> {
    let mut out = [0.0; N];
    for value in out.iter_mut() {
        let token = tokens.next().ok_or_else(|| AssetError::Parse {
            line,
            message: format!("expected {N} components"),
        })?;
        *value = token.parse().map_err(|_| AssetError::Parse {
            line,
            message: format!("invalid number '{token}'"),
        })?;
    }
    Ok(out)
}

fn parse_corner(
    corner: &str,
    line: usize,
    position_count: usize,
    uv_count: usize,
    normal_count: usize,
) -> Result<Corner, AssetError> {
    let mut parts = corner.split('/');
    let position = match parts.next() {
        Some(p) if !p.is_empty() => resolve_index(p, line, position_count)?,
        _ => {
            return Err(AssetError::Parse {
                line,
                message: format!("face corner '{corner}' has no position"),
            });
        }
    };
    let uv = match parts.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, line, uv_count)?),
        _ => None,
    };
    let normal = match parts.next() {
        Some(n) if !n.is_empty() => Some(resolve_index(n, line, normal_count)?),
        _ => None,
    };
    Ok((position, uv, normal))
}

/// OBJ indices are 1-based; negative values count back from the end.
fn resolve_index(token: &str, line: usize, count: usize) -> Result<usize, AssetError> {
    let raw: i64 = token.parse().map_err(|_| AssetError::Parse {
        line,
        message: format!("invalid index '{token}'"),
    })?;
    let resolved = if raw > 0 {
        raw - 1
    } else {
        count as i64 + raw
    };
    if raw == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(AssetError::IndexOutOfRange { line, index: raw });
    }
    Ok(resolved as usize)
}

fn fill_missing_normals(mesh: &mut MeshData, has_normal: &[bool]) {
    if has_normal.iter().all(|&h| h) {
        return;
    }
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let p0 = mesh.vertices[a].position;
        let face = (mesh.vertices[b].position - p0).cross(mesh.vertices[c].position - p0);
        for &v in &[a, b, c] {
            if !has_normal[v] {
                mesh.vertices[v].normal += face;
            }
        }
    }
    for (vertex, _) in mesh
        .vertices
        .iter_mut()
        .zip(has_normal)
        .filter(|(_, h)| !**h)
    {
        vertex.normal = vertex.normal.normalize_or_zero();
    }
}

fn compute_tangents(mesh: &mut MeshData) {
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (v0, v1, v2) = (mesh.vertices[a], mesh.vertices[b], mesh.vertices[c]);

        let edge0 = v1.position - v0.position;
        let edge1 = v2.position - v0.position;
        let diff_x = Vec2::new(v1.uv.x - v0.uv.x, v2.uv.x - v0.uv.x);
        let diff_y = Vec2::new(v1.uv.y - v0.uv.y, v2.uv.y - v0.uv.y);

        let det = diff_x.x * diff_y.y - diff_x.y * diff_y.x;
        if det.abs() <= f32::EPSILON {
            continue;
        }
        let tangent = (edge0 * diff_y.y - edge1 * diff_y.x) / det;
        for &v in &[a, b, c] {
            mesh.vertices[v].tangent += tangent;
        }
    }

    for vertex in &mut mesh.vertices {
        let n = vertex.normal;
        let t = (vertex.tangent - n * vertex.tangent.dot(n)).normalize_or_zero();
        vertex.tangent = if t == Vec3::ZERO && n != Vec3::ZERO {
            n.any_orthonormal_vector()
        } else {
            t
        };
    }
}
