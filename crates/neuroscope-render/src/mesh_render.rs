//! GPU buffers for triangle meshes.

use glam::Vec3;
use neuroscope_core::MeshGeometry;

use crate::buffer::{create_index_buffer, create_vertex_buffer};
use crate::materials::MaterialKind;

/// Interleaved vertex layout consumed by `mesh.wgsl`.
/// Note: Layout must match the WGSL vertex inputs at locations 0 and 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Vertex normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Per-vertex buffer layout (slot 0).
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-instance translation, used to draw every particle marker from one mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshInstance {
    /// World-space offset added to every vertex.
    pub offset: [f32; 3],
}

impl MeshInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

    /// Per-instance buffer layout (slot 1).
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleaves positions and normals of a mesh.
#[must_use]
pub fn mesh_vertices(geometry: &MeshGeometry) -> Vec<MeshVertex> {
    geometry
        .positions
        .iter()
        .zip(&geometry.normals)
        .map(|(p, n)| MeshVertex {
            position: p.to_array(),
            normal: n.to_array(),
        })
        .collect()
}

/// Instance data for the given offsets. An empty list yields a single
/// instance at the origin, so the mesh is drawn where it was built.
#[must_use]
pub fn mesh_instances(offsets: &[Vec3]) -> Vec<MeshInstance> {
    if offsets.is_empty() {
        return vec![MeshInstance {
            offset: [0.0; 3],
        }];
    }
    offsets
        .iter()
        .map(|o| MeshInstance {
            offset: o.to_array(),
        })
        .collect()
}

/// World-space center of a mesh drawn at `offsets`: the middle of its
/// bounding box moved by the mean offset.
#[must_use]
pub fn mesh_center(geometry: &MeshGeometry, offsets: &[Vec3]) -> Vec3 {
    let local = geometry
        .bounding_box()
        .map_or(Vec3::ZERO, |(min, max)| (min + max) * 0.5);
    if offsets.is_empty() {
        return local;
    }
    let mean = offsets.iter().copied().sum::<Vec3>() / offsets.len() as f32;
    local + mean
}

/// Draw order for blended meshes: indices of `centers`, farthest from `eye`
/// first. Equal distances keep their upload order.
#[must_use]
pub fn back_to_front(centers: &[Vec3], eye: Vec3) -> Vec<usize> {
    let mut order: Vec<usize> = (0..centers.len()).collect();
    order.sort_by(|&a, &b| {
        let da = eye.distance_squared(centers[a]);
        let db = eye.distance_squared(centers[b]);
        db.total_cmp(&da)
    });
    order
}

/// GPU resources for one uploaded mesh.
pub struct MeshRenderData {
    /// Interleaved vertex buffer.
    pub vertex_buffer: wgpu::Buffer,
    /// Triangle index buffer.
    pub index_buffer: wgpu::Buffer,
    /// Instance offset buffer.
    pub instance_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub num_indices: u32,
    /// Number of instances to draw.
    pub num_instances: u32,
    /// Material the mesh is drawn with.
    pub material: MaterialKind,
    /// World-space center, used to order blended draws.
    pub center: Vec3,
}

impl MeshRenderData {
    /// Uploads `geometry` and its instance offsets.
    pub fn new(
        device: &wgpu::Device,
        geometry: &MeshGeometry,
        material: MaterialKind,
        offsets: &[Vec3],
    ) -> Self {
        let vertices = mesh_vertices(geometry);
        let indices = geometry.flat_indices();
        let instances = mesh_instances(offsets);

        Self {
            vertex_buffer: create_vertex_buffer(device, &vertices, Some("mesh vertices")),
            index_buffer: create_index_buffer(device, &indices, Some("mesh indices")),
            instance_buffer: create_vertex_buffer(device, &instances, Some("mesh instances")),
            num_indices: indices.len() as u32,
            num_instances: instances.len() as u32,
            material,
            center: mesh_center(geometry, offsets),
        }
    }

    /// Records the draw call into `render_pass`.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.num_indices, 0, 0..self.num_instances);
    }
}
