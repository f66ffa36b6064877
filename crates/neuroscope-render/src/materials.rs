//! Phong-style materials.

use glam::Vec3;
use neuroscope_core::MaterialConfig;

use crate::buffer::{create_uniform_buffer, update_uniform_buffer};
use crate::color::srgb_to_linear;

/// Which material a mesh is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Translucent, lit, double-sided neuron surface.
    Neuron,
    /// Unlit particle markers.
    Particle,
}

/// A material definition for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color (sRGB).
    pub color: Vec3,
    /// Opacity.
    pub opacity: f32,
    /// Specular exponent.
    pub shininess: f32,
    /// Emissive color (sRGB).
    pub emissive: Vec3,
    /// Emissive intensity, animated by the viewer.
    pub emissive_intensity: f32,
    /// Whether back faces are drawn.
    pub double_sided: bool,
    /// Whether lights affect the surface.
    pub lit: bool,
}

impl From<&MaterialConfig> for Material {
    fn from(config: &MaterialConfig) -> Self {
        Self {
            color: config.color,
            opacity: config.opacity,
            shininess: config.shininess,
            emissive: config.emissive,
            emissive_intensity: config.emissive_intensity,
            double_sided: config.double_sided,
            lit: config.lit,
        }
    }
}

impl Material {
    /// Returns the GPU representation of this material.
    #[must_use]
    pub fn uniforms(&self) -> MaterialUniforms {
        let color = srgb_to_linear(self.color);
        let emissive = srgb_to_linear(self.emissive);
        MaterialUniforms {
            color: [color.x, color.y, color.z, self.opacity],
            emissive: [emissive.x, emissive.y, emissive.z, self.emissive_intensity],
            shininess: self.shininess.max(1.0),
            lit: u32::from(self.lit),
            double_sided: u32::from(self.double_sided),
            _padding: 0,
        }
    }
}

/// GPU-compatible material uniforms.
/// Note: Layout must match WGSL `Material` exactly (48 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct MaterialUniforms {
    /// Linear base color, alpha = opacity.
    pub color: [f32; 4],
    /// Linear emissive color, w = emissive intensity.
    pub emissive: [f32; 4],
    /// Specular exponent.
    pub shininess: f32,
    /// 1 = lit, 0 = unlit.
    pub lit: u32,
    /// 1 = flip normals on back faces.
    pub double_sided: u32,
    pub _padding: u32,
}

/// GPU resources of one material.
pub struct MaterialRenderData {
    /// CPU-side material; edit then call [`MaterialRenderData::sync`].
    pub material: Material,
    /// Uniform buffer.
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group (group 1 in the mesh shader).
    pub bind_group: wgpu::BindGroup,
}

impl MaterialRenderData {
    /// Uploads `material` and creates its bind group.
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, material: Material) -> Self {
        let uniform_buffer =
            create_uniform_buffer(device, &material.uniforms(), Some("material uniforms"));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        Self {
            material,
            uniform_buffer,
            bind_group,
        }
    }

    /// Writes the current material values to the GPU.
    pub fn sync(&self, queue: &wgpu::Queue) {
        update_uniform_buffer(queue, &self.uniform_buffer, &self.material.uniforms());
    }
}
