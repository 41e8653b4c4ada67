//! Render pipelines for the Sierpinski scene
//!
//! Vertices are recorded on the CPU in world space by
//! [`FrameRecorder`](crate::recorder::FrameRecorder) and uploaded once per
//! frame. Draw order is ground, wireframe lines, then translucent triangles.

use wgpu::util::DeviceExt;

use super::types::{SceneUniforms, Vertex3D};
use crate::ground::GroundTexture;
use crate::recorder::FrameRecorder;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const SHADER_SOURCE: &str = include_str!("../shaders/scene.wgsl");

/// A vertex buffer that grows to fit the largest frame seen so far
pub struct VertexBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

impl VertexBuffer {
    const INITIAL_CAPACITY: usize = 1024;

    /// Create an empty buffer
    pub fn new(device: &wgpu::Device, label: &'static str) -> Self {
        Self {
            label,
            buffer: Self::allocate(device, label, Self::INITIAL_CAPACITY),
            capacity: Self::INITIAL_CAPACITY,
            count: 0,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<Vertex3D>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replace the contents, reallocating when they do not fit
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[Vertex3D]) {
        if vertices.len() > self.capacity {
            let capacity = vertices.len().next_power_of_two();
            log::debug!("Growing {} to {} vertices", self.label, capacity);
            self.buffer = Self::allocate(device, self.label, capacity);
            self.capacity = capacity;
        }
        if !vertices.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(vertices));
        }
        self.count = vertices.len() as u32;
    }

    /// Vertices uploaded by the last call to [`upload`](Self::upload)
    pub fn count(&self) -> u32 {
        self.count
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.count > 0 {
            pass.set_vertex_buffer(0, self.buffer.slice(..));
            pass.draw(0..self.count, 0..1);
        }
    }
}

/// The scene's render pipelines and the GPU resources they share
pub struct RenderPipeline {
    line_pipeline: wgpu::RenderPipeline,
    triangle_pipeline: wgpu::RenderPipeline,
    ground_pipeline: wgpu::RenderPipeline,
    /// Uniform buffer
    uniform_buffer: wgpu::Buffer,
    /// Bind group for uniforms (group 0)
    scene_bind_group: wgpu::BindGroup,
    /// Ground texture and sampler (group 1)
    ground_bind_group: wgpu::BindGroup,
    lines: VertexBuffer,
    triangles: VertexBuffer,
    ground: VertexBuffer,
    /// Depth texture
    depth_texture: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
}

impl RenderPipeline {
    /// Create the pipelines and upload the ground texture
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        ground_texture: &GroundTexture,
    ) -> Self {
        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let ground_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Ground Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let scene_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&scene_layout],
            push_constant_ranges: &[],
        });

        let ground_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Ground Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &ground_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let line_pipeline = create_pipeline(
            device,
            PipelineSpec {
                label: "Line Pipeline",
                layout: &scene_pipeline_layout,
                shader: &shader,
                fragment_entry: "fs_unlit",
                topology: wgpu::PrimitiveTopology::LineList,
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
            },
        );

        let triangle_pipeline = create_pipeline(
            device,
            PipelineSpec {
                label: "Triangle Pipeline",
                layout: &scene_pipeline_layout,
                shader: &shader,
                fragment_entry: "fs_lit",
                topology: wgpu::PrimitiveTopology::TriangleList,
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            },
        );

        let ground_pipeline = create_pipeline(
            device,
            PipelineSpec {
                label: "Ground Pipeline",
                layout: &ground_pipeline_layout,
                shader: &shader,
                fragment_entry: "fs_ground",
                topology: wgpu::PrimitiveTopology::TriangleList,
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
            },
        );

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let ground_bind_group = create_ground_bind_group(device, queue, &ground_layout, ground_texture);

        Self {
            line_pipeline,
            triangle_pipeline,
            ground_pipeline,
            uniform_buffer,
            scene_bind_group,
            ground_bind_group,
            lines: VertexBuffer::new(device, "Line Vertex Buffer"),
            triangles: VertexBuffer::new(device, "Triangle Vertex Buffer"),
            ground: VertexBuffer::new(device, "Ground Vertex Buffer"),
            depth_texture: None,
            depth_size: (0, 0),
        }
    }

    /// Get the vertex buffer layout for Vertex3D
    fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                // normal: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                // color: vec4<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 24,
                    shader_location: 2,
                },
                // uv: vec2<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 40,
                    shader_location: 3,
                },
            ],
        }
    }

    /// Update uniforms
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &SceneUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Upload the recorded frame's vertices
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &FrameRecorder) {
        self.ground.upload(device, queue, &frame.ground);
        self.lines.upload(device, queue, &frame.lines);
        self.triangles.upload(device, queue, &frame.triangles);
    }

    /// Vertex counts of the last upload (ground, lines, triangles)
    pub fn vertex_counts(&self) -> (u32, u32, u32) {
        (self.ground.count(), self.lines.count(), self.triangles.count())
    }

    /// Ensure depth texture exists and is the right size
    pub fn ensure_depth_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.depth_texture.is_none() || self.depth_size != (width, height) {
            let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
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

            self.depth_texture = Some(depth_texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.depth_size = (width, height);
        }
    }

    /// Record the render pass for the uploaded frame
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear_color: wgpu::Color,
    ) {
        let Some(depth_view) = self.depth_texture.as_ref() else {
            log::warn!("Depth texture not created; skipping frame");
            return;
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

        render_pass.set_pipeline(&self.ground_pipeline);
        render_pass.set_bind_group(1, &self.ground_bind_group, &[]);
        self.ground.draw(&mut render_pass);

        render_pass.set_pipeline(&self.line_pipeline);
        self.lines.draw(&mut render_pass);

        render_pass.set_pipeline(&self.triangle_pipeline);
        self.triangles.draw(&mut render_pass);
    }
}

struct PipelineSpec<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    fragment_entry: &'a str,
    topology: wgpu::PrimitiveTopology,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
}

fn create_pipeline(device: &wgpu::Device, spec: PipelineSpec<'_>) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(spec.layout),
        vertex: wgpu::VertexState {
            module: spec.shader,
            entry_point: Some("vs_main"),
            buffers: &[RenderPipeline::vertex_buffer_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.shader,
            entry_point: Some(spec.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: spec.format,
                blend: spec.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // subdivided faces have mixed winding
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

fn create_ground_bind_group(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    texture: &GroundTexture,
) -> wgpu::BindGroup {
    let size = wgpu::Extent3d {
        width: texture.width,
        height: texture.height,
        depth_or_array_layers: 1,
    };

    let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Ground Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &gpu_texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &texture.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(texture.bytes_per_row()),
            rows_per_image: Some(texture.height),
        },
        size,
    );

    let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Ground Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Ground Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_guards_zero_light_vectors() {
        // normalize() of a zero vector is undefined in WGSL
        assert!(!SHADER_SOURCE.contains("normalize(light.position"));
        assert!(SHADER_SOURCE.contains("max(length(light.position.xyz), 0.0001)"));
    }

    #[test]
    fn test_vertex_buffer_layout_stride() {
        let layout = RenderPipeline::vertex_buffer_layout();
        assert_eq!(layout.array_stride, std::mem::size_of::<Vertex3D>() as u64);
    }

    #[test]
    fn test_vertex_attributes_fit_stride() {
        let layout = RenderPipeline::vertex_buffer_layout();
        assert_eq!(layout.attributes.len(), 4);
        let last = layout.attributes[3];
        assert_eq!(last.offset + last.format.size(), layout.array_stride);
        for (i, attr) in layout.attributes.iter().enumerate() {
            assert_eq!(attr.shader_location, i as u32);
        }
    }
}
