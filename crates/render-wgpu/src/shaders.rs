/// WGSL effect for opaque, lit, optionally normal-mapped surfaces.
///
/// Lambert diffuse and Phong specular from a single directional light, plus a
/// small ambient term. Specular strength comes from the specular map, the
/// exponent from the glossiness map.
pub const SHADED_SHADER: &str = r#"
struct ObjectUniforms {
    world_view_proj: mat4x4<f32>,
    world: mat4x4<f32>,
    camera_position: vec4<f32>,
    flags: vec4<u32>,
};

@group(0) @binding(0)
var<uniform> object: ObjectUniforms;

@group(1) @binding(0) var diffuse_map: texture_2d<f32>;
@group(1) @binding(1) var normal_map: texture_2d<f32>;
@group(1) @binding(2) var specular_map: texture_2d<f32>;
@group(1) @binding(3) var gloss_map: texture_2d<f32>;

@group(2) @binding(0) var sampler_state: sampler;

const LIGHT_DIRECTION: vec3<f32> = vec3<f32>(0.577, -0.577, 0.577);
const LIGHT_INTENSITY: f32 = 7.0;
const SHININESS: f32 = 25.0;
const PI: f32 = 3.14159265;
const AMBIENT: vec3<f32> = vec3<f32>(0.03, 0.03, 0.03);

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) normal: vec3<f32>,
    @location(3) tangent: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) normal: vec3<f32>,
    @location(3) tangent: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = object.world_view_proj * vec4<f32>(vertex.position, 1.0);
    out.world_position = (object.world * vec4<f32>(vertex.position, 1.0)).xyz;
    out.uv = vertex.uv;
    out.normal = normalize((object.world * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.tangent = normalize((object.world * vec4<f32>(vertex.tangent, 0.0)).xyz);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let diffuse_sample = textureSample(diffuse_map, sampler_state, in.uv).rgb;
    let normal_sample = textureSample(normal_map, sampler_state, in.uv).rgb;
    let specular_sample = textureSample(specular_map, sampler_state, in.uv).r;
    let gloss_sample = textureSample(gloss_map, sampler_state, in.uv).r;

    var normal = normalize(in.normal);
    if object.flags.x != 0u {
        let tangent = normalize(in.tangent);
        let binormal = cross(normal, tangent);
        let tangent_space = mat3x3<f32>(tangent, binormal, normal);
        normal = normalize(tangent_space * (normal_sample * 2.0 - 1.0));
    }

    let observed_area = max(dot(normal, -LIGHT_DIRECTION), 0.0);
    let lambert = diffuse_sample * LIGHT_INTENSITY / PI;

    let view_direction = normalize(in.world_position - object.camera_position.xyz);
    let reflected = reflect(LIGHT_DIRECTION, normal);
    let cos_alpha = max(dot(reflected, -view_direction), 0.0);
    let exponent = max(gloss_sample * SHININESS, 1.0);
    let phong = vec3<f32>(specular_sample * pow(cos_alpha, exponent));

    return vec4<f32>((lambert + phong) * observed_area + AMBIENT, 1.0);
}
"#;

/// WGSL effect for alpha-blended partial-coverage surfaces (fire, foliage).
pub const PARTIAL_COVERAGE_SHADER: &str = r#"
struct ObjectUniforms {
    world_view_proj: mat4x4<f32>,
    world: mat4x4<f32>,
    camera_position: vec4<f32>,
    flags: vec4<u32>,
};

@group(0) @binding(0)
var<uniform> object: ObjectUniforms;

@group(1) @binding(0) var diffuse_map: texture_2d<f32>;

@group(2) @binding(0) var sampler_state: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = object.world_view_proj * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(diffuse_map, sampler_state, in.uv);
}
"#;
