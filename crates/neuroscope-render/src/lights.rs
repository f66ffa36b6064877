//! Scene lighting and fog uniforms.

use glam::Vec3;
use neuroscope_core::{DirectionalLightConfig, FogConfig, LightingConfig};

use crate::color::srgb_to_linear;

/// GPU-compatible lighting uniforms: one ambient light, two directional
/// lights and linear fog.
/// Note: Layout must match WGSL `Lights` exactly (112 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniforms {
    /// Linear ambient color premultiplied by intensity.
    pub ambient: [f32; 4],
    /// Direction the key light travels (toward the scene).
    pub key_direction: [f32; 4],
    /// Linear key color premultiplied by intensity.
    pub key_color: [f32; 4],
    /// Direction the back light travels.
    pub back_direction: [f32; 4],
    /// Linear back color premultiplied by intensity.
    pub back_color: [f32; 4],
    /// Linear fog color.
    pub fog_color: [f32; 4],
    /// Fog start (x) and end (y) distance.
    pub fog_range: [f32; 4],
}

impl LightUniforms {
    /// Builds uniforms from configuration.
    #[must_use]
    pub fn new(lights: &LightingConfig, fog: &FogConfig) -> Self {
        let ambient = srgb_to_linear(lights.ambient_color) * lights.ambient_intensity;
        let (key_direction, key_color) = directional(&lights.key);
        let (back_direction, back_color) = directional(&lights.back);
        let fog_color = srgb_to_linear(fog.color);

        Self {
            ambient: ambient.extend(1.0).to_array(),
            key_direction,
            key_color,
            back_direction,
            back_color,
            fog_color: fog_color.extend(1.0).to_array(),
            fog_range: [fog.near, fog.far, 0.0, 0.0],
        }
    }
}

/// A directional light shines from its position toward the origin.
fn directional(light: &DirectionalLightConfig) -> ([f32; 4], [f32; 4]) {
    let direction = (Vec3::ZERO - light.position).normalize_or_zero();
    let color = srgb_to_linear(light.color) * light.intensity;
    (
        direction.extend(0.0).to_array(),
        color.extend(1.0).to_array(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniforms_size() {
        assert_eq!(std::mem::size_of::<LightUniforms>(), 112);
    }

    #[test]
    fn test_default_lights() {
        let u = LightUniforms::new(&LightingConfig::default(), &FogConfig::default());
        let key = Vec3::from_slice(&u.key_direction[..3]);
        assert!(key.distance(Vec3::splat(-1.0).normalize()) < 1e-6);
        assert_eq!(u.fog_range[0], 10.0);
        assert_eq!(u.fog_range[1], 100.0);
        // Key light is brighter than the back light.
        assert!(u.key_color[0] + u.key_color[1] + u.key_color[2]
            > u.back_color[0] + u.back_color[1] + u.back_color[2]);
    }
}
