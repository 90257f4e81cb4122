//! Vertex-coloured triangle meshes.
//!
//! Geometry is built on the CPU as [`MeshData`] so it can be inspected and
//! tested without a GPU, then uploaded once with [`Mesh::new`].
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | color     | Float32x3 | 12     | 1               |

use glam::Vec3;

use crate::gpu::GpuContext;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    /// Linear RGB.
    pub color: [f32; 3],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// Triangle list geometry held on the CPU.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Append a flat-coloured triangle with its own three vertices.
    pub fn push_triangle(&mut self, corners: [Vec3; 3], color: [f32; 3]) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend(corners.map(|corner| Vertex::new(corner.to_array(), color)));
        self.indices.extend([base, base + 1, base + 2]);
    }

    /// Append a flat-coloured quad, corners in winding order.
    pub fn push_quad(&mut self, corners: [Vec3; 4], color: [f32; 3]) {
        let [a, b, c, d] = corners;
        let base = self.vertices.len() as u32;
        self.vertices
            .extend([a, b, c, d].map(|corner| Vertex::new(corner.to_array(), color)));
        self.indices
            .extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for empty geometry.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// A small arrow-shaped ship in model space.
    ///
    /// The nose points down -Z, the wings lie along X and the tail fin
    /// sticks up +Y, so every axis of an orientation is visible on screen.
    /// It fits inside a unit cube around the origin.
    pub fn ship() -> Self {
        const HULL_TOP: [f32; 3] = [0.55, 0.6, 0.7];
        const HULL_BOTTOM: [f32; 3] = [0.3, 0.32, 0.38];
        const NOSE: [f32; 3] = [0.95, 0.75, 0.2];
        const FIN: [f32; 3] = [0.85, 0.2, 0.2];

        let nose = Vec3::new(0.0, 0.0, -1.0);
        let tail = Vec3::new(0.0, 0.0, 0.6);
        let left = Vec3::new(-0.9, 0.0, 0.4);
        let right = Vec3::new(0.9, 0.0, 0.4);
        let ridge = Vec3::new(0.0, 0.15, 0.2);
        let keel = Vec3::new(0.0, -0.1, 0.2);
        let fin_tip = Vec3::new(0.0, 0.5, 0.7);
        // Splits the nose cone off from the hull so it can be coloured.
        let cone = Vec3::new(0.0, 0.0, -0.6);

        let mut data = Self::default();
        // Nose cone
        data.push_triangle([nose, left.lerp(cone, 0.9), ridge.lerp(cone, 0.9)], NOSE);
        data.push_triangle([nose, ridge.lerp(cone, 0.9), right.lerp(cone, 0.9)], NOSE);
        // Upper hull
        data.push_triangle([nose, left, ridge], HULL_TOP);
        data.push_triangle([nose, ridge, right], HULL_TOP);
        data.push_triangle([ridge, left, tail], HULL_TOP);
        data.push_triangle([ridge, tail, right], HULL_TOP);
        // Lower hull
        data.push_triangle([nose, keel, left], HULL_BOTTOM);
        data.push_triangle([nose, right, keel], HULL_BOTTOM);
        data.push_triangle([keel, tail, left], HULL_BOTTOM);
        data.push_triangle([keel, right, tail], HULL_BOTTOM);
        // Tail fin
        data.push_triangle([ridge, tail, fin_tip], FIN);
        data
    }

    /// A unit cube centred at the origin, one colour per axis pair.
    pub fn cube() -> Self {
        const X: [f32; 3] = [0.8, 0.25, 0.25];
        const Y: [f32; 3] = [0.25, 0.8, 0.25];
        const Z: [f32; 3] = [0.25, 0.25, 0.8];

        let v = |x: f32, y: f32, z: f32| Vec3::new(x, y, z) * 0.5;
        #[rustfmt::skip]
        let faces = [
            ([v(-1.0, -1.0,  1.0), v( 1.0, -1.0,  1.0), v( 1.0,  1.0,  1.0), v(-1.0,  1.0,  1.0)], Z),
            ([v( 1.0, -1.0, -1.0), v(-1.0, -1.0, -1.0), v(-1.0,  1.0, -1.0), v( 1.0,  1.0, -1.0)], Z),
            ([v(-1.0,  1.0,  1.0), v( 1.0,  1.0,  1.0), v( 1.0,  1.0, -1.0), v(-1.0,  1.0, -1.0)], Y),
            ([v(-1.0, -1.0, -1.0), v( 1.0, -1.0, -1.0), v( 1.0, -1.0,  1.0), v(-1.0, -1.0,  1.0)], Y),
            ([v( 1.0, -1.0,  1.0), v( 1.0, -1.0, -1.0), v( 1.0,  1.0, -1.0), v( 1.0,  1.0,  1.0)], X),
            ([v(-1.0, -1.0, -1.0), v(-1.0, -1.0,  1.0), v(-1.0,  1.0,  1.0), v(-1.0,  1.0, -1.0)], X),
        ];

        let mut data = Self::default();
        for (corners, color) in faces {
            data.push_quad(corners, color);
        }
        data
    }

    /// [`MeshData::cube`] in a single colour.
    pub fn solid_cube(color: [f32; 3]) -> Self {
        let mut data = Self::cube();
        for vertex in &mut data.vertices {
            vertex.color = color;
        }
        data
    }

    /// A checkerboard on the XZ plane, `size` units across, 10x10 tiles.
    pub fn ground(size: f32) -> Self {
        const TILES: u32 = 10;
        const LIGHT: [f32; 3] = [0.3, 0.45, 0.3];
        const DARK: [f32; 3] = [0.2, 0.32, 0.2];

        let tile = size / TILES as f32;
        let origin = -size / 2.0;
        let mut data = Self::default();
        for row in 0..TILES {
            for col in 0..TILES {
                let x0 = origin + col as f32 * tile;
                let z0 = origin + row as f32 * tile;
                let (x1, z1) = (x0 + tile, z0 + tile);
                let color = if (row + col) % 2 == 0 { LIGHT } else { DARK };
                data.push_quad(
                    [
                        Vec3::new(x0, 0.0, z1),
                        Vec3::new(x1, 0.0, z1),
                        Vec3::new(x1, 0.0, z0),
                        Vec3::new(x0, 0.0, z0),
                    ],
                    color,
                );
            }
        }
        data
    }
}

/// GPU-resident geometry with vertex and index buffers.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Upload `data` to the GPU.
    ///
    /// Empty data makes zero-sized buffers. [`MeshPass::render`] skips such
    /// meshes instead of binding them.
    ///
    /// [`MeshPass::render`]: crate::mesh_pass::MeshPass::render
    pub fn new(gpu: &GpuContext, data: &MeshData) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}
