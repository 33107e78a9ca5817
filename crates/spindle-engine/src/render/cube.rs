use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use crate::device::{GpuContext, WgpuPlatform};

use super::ctx::RenderCtx;
use super::drawable::{Drawable, FrameParams};

/// Reference payload: a vertex-colored unit cube spinning in front of the camera.
///
/// GPU resources are created lazily on the first frame. All of them are
/// dropped when the device changes (every bind creates a new one); the
/// pipeline is also rebuilt when the surface format or culling state changes.
/// The cube is convex and back faces
/// are culled, so it is drawn without a depth attachment.
#[derive(Default)]
pub struct SpinningCube {
    device: Option<wgpu::Device>,

    pipeline_key: Option<(wgpu::TextureFormat, bool)>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,
    ibo: Option<wgpu::Buffer>,
}

impl SpinningCube {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything created on a previous device.
    fn ensure_device(&mut self, ctx: &RenderCtx<'_>) {
        if self.device.as_ref() == Some(ctx.device) {
            return;
        }

        if self.device.is_some() {
            log::debug!("device changed; rebuilding cube resources");
        }
        *self = Self {
            device: Some(ctx.device.clone()),
            ..Self::default()
        };
    }

    fn prepare(&mut self, ctx: &RenderCtx<'_>, frame: &FrameParams) {
        self.ensure_device(ctx);
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.ensure_geometry(ctx);
        self.write_uniform(ctx, frame);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        let key = (ctx.surface_format, ctx.state.cull_back_faces);
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spindle cube shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/cube.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("spindle cube bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<CubeUniform>() as u64,
                            ),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("spindle cube pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("spindle cube pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[CubeVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: ctx.state.cull_back_faces.then_some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_key = Some(key);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.uniform = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.uniform.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let uniform = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("spindle cube mvp ubo"),
            size: std::mem::size_of::<CubeUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("spindle cube bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        self.uniform = Some(uniform);
        self.bind_group = Some(bind_group);
    }

    fn ensure_geometry(&mut self, ctx: &RenderCtx<'_>) {
        if self.vbo.is_some() && self.ibo.is_some() {
            return;
        }

        self.vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spindle cube vbo"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spindle cube ibo"),
            contents: bytemuck::cast_slice(&CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_uniform(&self, ctx: &RenderCtx<'_>, frame: &FrameParams) {
        let Some(ubo) = self.uniform.as_ref() else { return };
        let mvp = clip_space_transform(ctx.state.frustum.projection(), frame.model_matrix());
        let u = CubeUniform {
            mvp: mvp.to_cols_array_2d(),
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

impl Drawable<WgpuPlatform> for SpinningCube {
    fn draw(&mut self, context: &mut GpuContext, frame: &FrameParams) {
        let Some((ctx, target)) = context.target() else {
            return;
        };

        self.prepare(&ctx, frame);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };

        let [r, g, b, a] = ctx.state.clear_color;
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("spindle cube pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..CUBE_INDICES.len() as u32, 0, 0..1);
    }
}

/// Projection * model, remapped from [-1, 1] clip depth to wgpu's [0, 1].
fn clip_space_transform(projection: Mat4, model: Mat4) -> Mat4 {
    let depth_remap = Mat4::from_cols(
        Vec4::X,
        Vec4::Y,
        Vec4::new(0.0, 0.0, 0.5, 0.0),
        Vec4::new(0.0, 0.0, 0.5, 1.0),
    );
    depth_remap * projection * model
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CubeUniform {
    mvp: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CubeVertex {
    position: [f32; 3],
    color: [f32; 4],
}

impl CubeVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CubeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const fn v(x: f32, y: f32, z: f32, r: f32, g: f32, b: f32) -> CubeVertex {
    CubeVertex {
        position: [x, y, z],
        color: [r, g, b, 1.0],
    }
}

// Each corner's color matches its position on the RGB cube.
const CUBE_VERTICES: [CubeVertex; 8] = [
    v(-1.0, -1.0, -1.0, 0.0, 0.0, 0.0),
    v(1.0, -1.0, -1.0, 1.0, 0.0, 0.0),
    v(1.0, 1.0, -1.0, 1.0, 1.0, 0.0),
    v(-1.0, 1.0, -1.0, 0.0, 1.0, 0.0),
    v(-1.0, -1.0, 1.0, 0.0, 0.0, 1.0),
    v(1.0, -1.0, 1.0, 1.0, 0.0, 1.0),
    v(1.0, 1.0, 1.0, 1.0, 1.0, 1.0),
    v(-1.0, 1.0, 1.0, 0.0, 1.0, 1.0),
];

// Clockwise when viewed from outside the cube.
const CUBE_INDICES: [u16; 36] = [
    0, 4, 5, 0, 5, 1, //
    1, 5, 6, 1, 6, 2, //
    2, 6, 7, 2, 7, 3, //
    3, 7, 4, 3, 4, 0, //
    4, 7, 6, 4, 6, 5, //
    3, 0, 1, 3, 1, 2, //
];
