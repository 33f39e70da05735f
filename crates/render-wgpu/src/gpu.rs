use crate::mesh::{GpuMesh, GpuVertex};
use crate::shaders;
use crate::texture::{GpuTexture, TextureRole, sampler_descriptor};
use bytemuck::{Pod, Zeroable};
use flyview_common::ClearColor;
use flyview_render::{DrawCall, FrameView, Material, MaterialKind, Renderer, SamplerMode, SceneObject};
use std::path::Path;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct ObjectUniforms {
    world_view_proj: [[f32; 4]; 4],
    world: [[f32; 4]; 4],
    camera_position: [f32; 4],
    /// x: use normal map.
    flags: [u32; 4],
}

impl ObjectUniforms {
    fn from_draw(draw: &DrawCall) -> Self {
        Self {
            world_view_proj: draw.world_view_projection.to_cols_array_2d(),
            world: draw.world.to_cols_array_2d(),
            camera_position: draw.camera_position.extend(1.0).to_array(),
            flags: [u32::from(draw.use_normal_map), 0, 0, 0],
        }
    }
}

/// Texture files of a material with the role each binding plays.
fn texture_slots(material: &Material) -> Vec<(&Path, TextureRole)> {
    match material {
        Material::Shaded(m) => vec![
            (m.diffuse.as_path(), TextureRole::Color),
            (m.normal.as_path(), TextureRole::Normal),
            (m.specular.as_path(), TextureRole::Specular),
            (m.gloss.as_path(), TextureRole::Gloss),
        ],
        Material::PartialCoverage(m) => vec![(m.diffuse.as_path(), TextureRole::Color)],
    }
}

/// Device-side state of one scene object.
struct GpuObject {
    kind: MaterialKind,
    mesh: GpuMesh,
    uniform_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    material_bind_group: wgpu::BindGroup,
    _textures: Vec<GpuTexture>,
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    shaded_pipeline: wgpu::RenderPipeline,
    partial_coverage_pipeline: wgpu::RenderPipeline,
    /// Indexed by [`SamplerMode::index`].
    sampler_bind_groups: Vec<wgpu::BindGroup>,
    objects: Vec<GpuObject>,
    depth_texture: wgpu::TextureView,
    clear_color: wgpu::Color,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    /// Build pipelines, samplers and per-object resources for `scene`.
    ///
    /// Objects keep their scene order so `DrawCall::object` indexes them directly.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: &[SceneObject],
        clear_color: ClearColor,
    ) -> Self {
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let shaded_layout = texture_layout(device, "shaded_material_layout", 4);
        let partial_coverage_layout = texture_layout(device, "partial_coverage_material_layout", 1);
        let sampler_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sampler_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            }],
        });

        let sampler_bind_groups = SamplerMode::ALL
            .iter()
            .map(|mode| {
                let sampler = device.create_sampler(&sampler_descriptor(*mode));
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("sampler_bind_group"),
                    layout: &sampler_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    }],
                })
            })
            .collect();

        let shaded_pipeline = create_pipeline(
            device,
            &PipelineDesc {
                label: "shaded_pipeline",
                source: shaders::SHADED_SHADER,
                bind_group_layouts: &[&object_layout, &shaded_layout, &sampler_layout],
                attributes: &GpuVertex::SHADED_ATTRIBUTES,
                format: surface_format,
                blend: wgpu::BlendState::REPLACE,
                cull_mode: Some(wgpu::Face::Back),
                depth_write: true,
            },
        );
        let partial_coverage_pipeline = create_pipeline(
            device,
            &PipelineDesc {
                label: "partial_coverage_pipeline",
                source: shaders::PARTIAL_COVERAGE_SHADER,
                bind_group_layouts: &[&object_layout, &partial_coverage_layout, &sampler_layout],
                attributes: &GpuVertex::PARTIAL_COVERAGE_ATTRIBUTES,
                format: surface_format,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                cull_mode: None,
                depth_write: false,
            },
        );

        let objects = scene
            .iter()
            .map(|object| {
                let textures: Vec<GpuTexture> = texture_slots(object.material())
                    .into_iter()
                    .map(|(path, role)| GpuTexture::load(device, queue, path, role))
                    .collect();
                let material_layout = match object.material().kind() {
                    MaterialKind::Shaded => &shaded_layout,
                    MaterialKind::PartialCoverage => &partial_coverage_layout,
                };
                let entries: Vec<wgpu::BindGroupEntry> = textures
                    .iter()
                    .enumerate()
                    .map(|(binding, texture)| wgpu::BindGroupEntry {
                        binding: binding as u32,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    })
                    .collect();
                let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{}_material_bind_group", object.name())),
                    layout: material_layout,
                    entries: &entries,
                });

                let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_uniform_buffer", object.name())),
                    contents: bytemuck::bytes_of(&ObjectUniforms::zeroed()),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{}_object_bind_group", object.name())),
                    layout: &object_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });

                tracing::info!(
                    "uploaded {} ({} triangles, {:?})",
                    object.name(),
                    object.mesh().triangle_count(),
                    object.material().kind()
                );

                GpuObject {
                    kind: object.material().kind(),
                    mesh: GpuMesh::upload(device, object.name(), object.mesh()),
                    uniform_buffer,
                    object_bind_group,
                    material_bind_group,
                    _textures: textures,
                }
            })
            .collect();

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            shaded_pipeline,
            partial_coverage_pipeline,
            sampler_bind_groups,
            objects,
            depth_texture,
            clear_color: wgpu::Color {
                r: f64::from(clear_color.r),
                g: f64::from(clear_color.g),
                b: f64::from(clear_color.b),
                a: f64::from(clear_color.a),
            },
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Bind this renderer to one acquired frame.
    pub fn target<'a>(
        &'a self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        view: &'a wgpu::TextureView,
    ) -> WgpuFrame<'a> {
        WgpuFrame {
            renderer: self,
            device,
            queue,
            view,
        }
    }

    /// Render one frame: opaque draws, then partial-coverage draws.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &FrameView<'_>,
    ) {
        let draws: Vec<(&DrawCall, &GpuObject)> = frame
            .draws
            .iter()
            .filter_map(|draw| match self.objects.get(draw.object) {
                Some(object) => Some((draw, object)),
                None => {
                    tracing::trace!("draw for unknown object {} skipped", draw.object);
                    None
                }
            })
            .collect();

        for (draw, object) in &draws {
            queue.write_buffer(
                &object.uniform_buffer,
                0,
                bytemuck::bytes_of(&ObjectUniforms::from_draw(draw)),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let sampler = &self.sampler_bind_groups[frame.sampler.index()];
            for kind in [MaterialKind::Shaded, MaterialKind::PartialCoverage] {
                let pipeline = match kind {
                    MaterialKind::Shaded => &self.shaded_pipeline,
                    MaterialKind::PartialCoverage => &self.partial_coverage_pipeline,
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(2, sampler, &[]);

                for (_, object) in draws.iter().filter(|(_, object)| object.kind == kind) {
                    pass.set_bind_group(0, &object.object_bind_group, &[]);
                    pass.set_bind_group(1, &object.material_bind_group, &[]);
                    pass.set_vertex_buffer(0, object.mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(object.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..object.mesh.index_count, 0, 0..1);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// A [`WgpuRenderer`] bound to one surface frame.
pub struct WgpuFrame<'a> {
    renderer: &'a WgpuRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    view: &'a wgpu::TextureView,
}

impl Renderer for WgpuFrame<'_> {
    type Output = ();

    fn render(&mut self, frame: &FrameView<'_>) {
        self.renderer.render(self.device, self.queue, self.view, frame);
    }
}

struct PipelineDesc<'a> {
    label: &'a str,
    source: &'a str,
    bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    attributes: &'a [wgpu::VertexAttribute],
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    cull_mode: Option<wgpu::Face>,
    depth_write: bool,
}

fn create_pipeline(device: &wgpu::Device, desc: &PipelineDesc<'_>) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(desc.label),
        source: wgpu::ShaderSource::Wgsl(desc.source.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: desc.bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[GpuVertex::layout(desc.attributes)],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            // Meshes are loaded into a left-handed frame, front faces wind clockwise.
            front_face: wgpu::FrontFace::Cw,
            cull_mode: desc.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn texture_layout(device: &wgpu::Device, label: &str, count: u32) -> wgpu::BindGroupLayout {
    let entries: Vec<wgpu::BindGroupLayoutEntry> = (0..count)
        .map(|binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        })
        .collect();
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}
