use std::borrow::Cow;

use wgpu::util::DeviceExt;

use crate::device::{DepthTarget, DEPTH_FORMAT};

use super::mesh::{CubeVertex, CUBE_INDICES, CUBE_VERTICES};
use super::scene::{MatricesUniform, SceneConfig, SceneUniforms};
use super::shader::{build_program, LinkedProgram, FRAGMENT_SOURCE, VERTEX_SOURCE};
use super::texture::{texture_bind_group_layout, MipmapGenerator, TextureLoader, TextureSlot};
use super::{InitError, RenderCtx, RenderTarget};

/// Frames between two debug reports of the model state.
const REPORT_EVERY: u64 = 600;

/// Spinning, lit, textured cube.
///
/// Everything GPU-side is created in [`CubeRenderer::new`]; [`CubeRenderer::render`]
/// only advances the model matrix, uploads the uniform block and records one
/// indexed draw.
pub struct CubeRenderer {
    pipeline: wgpu::RenderPipeline,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,

    matrices_ubo: wgpu::Buffer,
    matrices_bind_group: wgpu::BindGroup,

    texture_layout: wgpu::BindGroupLayout,
    texture: TextureSlot,
    loader: TextureLoader,
    mipmaps: MipmapGenerator,

    depth: DepthTarget,
    scene: SceneUniforms,
    clear_color: wgpu::Color,
}

impl CubeRenderer {
    /// Builds the shader program from the bundled sources and sets up the
    /// renderer.
    pub fn new(ctx: &RenderCtx<'_>, config: &SceneConfig) -> Result<Self, InitError> {
        let program = build_program(VERTEX_SOURCE, FRAGMENT_SOURCE)?;
        Ok(Self::with_program(ctx, config, &program))
    }

    /// Sets up the renderer around an already linked program.
    ///
    /// Starts the background texture load; the placeholder texel is bound
    /// until it completes.
    pub fn with_program(
        ctx: &RenderCtx<'_>,
        config: &SceneConfig,
        program: &LinkedProgram,
    ) -> Self {
        let bindings = program.bindings();

        let vertex_shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("prism cube vertex shader"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(program.vertex_module().clone())),
        });
        let fragment_shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("prism cube fragment shader"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(program.fragment_module().clone())),
        });

        let matrices_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("prism matrices bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: bindings.matrices.binding,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<MatricesUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let texture_layout = texture_bind_group_layout(
            ctx.device,
            bindings.texture.binding,
            bindings.sampler.binding,
        );

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("prism cube pipeline layout"),
                bind_group_layouts: &[&matrices_layout, &texture_layout],
                immediate_size: 0,
            });

        let attributes = CubeVertex::attributes(bindings.attributes);

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("prism cube pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex_shader,
                entry_point: Some(program.vertex_entry()),
                compilation_options: Default::default(),
                buffers: &[CubeVertex::layout(&attributes)],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_shader,
                entry_point: Some(program.fragment_entry()),
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
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prism cube vbo"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prism cube ibo"),
            contents: bytemuck::cast_slice(&CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let scene = SceneUniforms::new(config, ctx.aspect_ratio());

        let matrices_ubo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prism matrices ubo"),
            contents: bytemuck::bytes_of(&scene.to_gpu()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let matrices_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("prism matrices bind group"),
            layout: &matrices_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: bindings.matrices.binding,
                resource: matrices_ubo.as_entire_binding(),
            }],
        });

        let texture = TextureSlot::placeholder(
            ctx.device,
            ctx.queue,
            &texture_layout,
            bindings.texture.binding,
            bindings.sampler.binding,
        );
        let mipmaps = MipmapGenerator::new(ctx.device);
        let loader = TextureLoader::spawn(config.texture_path.clone());

        let depth = DepthTarget::new(ctx.device, ctx.size);

        log::info!(
            "cube renderer ready ({} vertices, {} indices, texture {})",
            CUBE_VERTICES.len(),
            CUBE_INDICES.len(),
            config.texture_path.display()
        );

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: CUBE_INDICES.len() as u32,
            matrices_ubo,
            matrices_bind_group,
            texture_layout,
            texture,
            loader,
            mipmaps,
            depth,
            scene,
            clear_color: config.clear_color,
        }
    }

    /// Draws one frame into `target`.
    ///
    /// Picks up the decoded image if it arrived since the last frame, rotates
    /// the model by one step, uploads P/M/N, then clears and draws.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.poll_texture(ctx);

        self.scene.advance();
        ctx.queue
            .write_buffer(&self.matrices_ubo, 0, bytemuck::bytes_of(&self.scene.to_gpu()));

        self.depth.ensure_size(ctx.device, ctx.size);

        let steps = self.scene.steps();
        if steps % REPORT_EVERY == 0 {
            log::debug!("frame {steps}: model = {:?}", self.scene.model());
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("prism cube pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.depth.view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.matrices_bind_group, &[]);
        rpass.set_bind_group(1, self.texture.bind_group(), &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    fn poll_texture(&mut self, ctx: &RenderCtx<'_>) {
        let Some(result) = self.loader.poll() else {
            return;
        };

        let applied = result.and_then(|image| {
            self.texture.replace(
                ctx.device,
                ctx.queue,
                &self.texture_layout,
                &self.mipmaps,
                &image,
            )
        });
        if let Err(e) = applied {
            log::warn!("keeping placeholder texture: {e}");
        }
    }
}
