//! Depth-tested rendering of vertex-coloured meshes.
//!
//! One camera uniform is written per frame. Model matrices for every draw in
//! the frame are written into a single buffer at [`MODEL_STRIDE`]-aligned
//! slots and selected with a dynamic offset, so all draws can be recorded
//! into one render pass.

use glam::Mat4;

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Dynamic offsets must be multiples of the device's
/// `min_uniform_buffer_offset_alignment`, which is at most 256.
pub const MODEL_STRIDE: u64 = 256;
/// Draws beyond this in one frame are dropped.
pub const MAX_DRAWS: usize = 16;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
}

pub struct DrawCall<'a> {
    pub mesh: &'a Mesh,
    pub model: Mat4,
}

/// Uniform slot and byte offset for each draw that will be recorded.
///
/// Calls with no indices are skipped without using a slot, and at most
/// [`MAX_DRAWS`] slots are handed out. Returns `(call index, offset)` pairs.
fn draw_slots(index_counts: &[u32]) -> Vec<(usize, u64)> {
    index_counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .take(MAX_DRAWS)
        .enumerate()
        .map(|(slot, (call, _))| (call, slot as u64 * MODEL_STRIDE))
        .collect()
}

pub struct MeshPass {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    pub(crate) depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl MeshPass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        // Camera uniform buffer (group 0)
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Model uniform slots (group 1, dynamic offset)
        let model_size = std::mem::size_of::<ModelUniforms>() as u64;
        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: MODEL_STRIDE * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(model_size),
                    },
                    count: None,
                }],
            });

        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout: &model_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &model_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(model_size),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_view = Self::create_depth_view(gpu);

        // The ship's fin is a single triangle, so both faces are drawn.
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            model_buffer,
            model_bind_group,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreate the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    pub fn render(
        &self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        camera: &Camera,
        draw_calls: &[DrawCall],
    ) {
        let index_counts: Vec<u32> = draw_calls.iter().map(|call| call.mesh.index_count).collect();
        let slots = draw_slots(&index_counts);
        if slots.is_empty() {
            return;
        }
        let drawable = index_counts.iter().filter(|&&count| count > 0).count();
        if drawable > MAX_DRAWS {
            log::warn!("{drawable} draws submitted, only the first {MAX_DRAWS} are rendered");
        }

        let view_proj = camera.projection_matrix(gpu.aspect()) * camera.view_matrix();
        let camera_uniforms = CameraUniforms {
            view_proj: view_proj.to_cols_array_2d(),
        };
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniforms]),
        );

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for (index, offset) in slots {
            let call = &draw_calls[index];
            let model_uniforms = ModelUniforms {
                model: call.model.to_cols_array_2d(),
            };
            gpu.queue.write_buffer(
                &self.model_buffer,
                offset,
                bytemuck::cast_slice(&[model_uniforms]),
            );

            render_pass.set_bind_group(1, &self.model_bind_group, &[offset as u32]);
            render_pass.set_vertex_buffer(0, call.mesh.vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(call.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..call.mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_slots_fit_their_stride() {
        assert!(std::mem::size_of::<ModelUniforms>() as u64 <= MODEL_STRIDE);
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 64);
        assert!(MODEL_STRIDE * MAX_DRAWS as u64 <= u32::MAX as u64);
    }

    #[test]
    fn empty_meshes_are_skipped_without_a_slot() {
        assert_eq!(draw_slots(&[0, 36, 0, 3]), vec![(1, 0), (3, MODEL_STRIDE)]);
        assert!(draw_slots(&[0, 0]).is_empty());
        assert!(draw_slots(&[]).is_empty());
    }

    #[test]
    fn slots_are_capped() {
        let mut counts = vec![3; MAX_DRAWS + 4];
        counts[0] = 0;
        let slots = draw_slots(&counts);
        assert_eq!(slots.len(), MAX_DRAWS);
        assert_eq!(slots[0], (1, 0));
        assert_eq!(
            slots[MAX_DRAWS - 1],
            (MAX_DRAWS, (MAX_DRAWS as u64 - 1) * MODEL_STRIDE)
        );
    }
}
