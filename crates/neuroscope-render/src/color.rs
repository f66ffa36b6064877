//! Color space helpers.

use glam::Vec3;

/// Converts one sRGB channel to linear light.
#[must_use]
pub fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Converts an sRGB color to linear light. Shaders work in linear space and
/// the sRGB render targets encode on write.
#[must_use]
pub fn srgb_to_linear(color: Vec3) -> Vec3 {
    Vec3::new(
        srgb_channel_to_linear(color.x),
        srgb_channel_to_linear(color.y),
        srgb_channel_to_linear(color.z),
    )
}

/// Builds a wgpu clear color from an sRGB color.
#[must_use]
pub fn clear_color(color: Vec3) -> wgpu::Color {
    let linear = srgb_to_linear(color);
    wgpu::Color {
        r: f64::from(linear.x),
        g: f64::from(linear.y),
        b: f64::from(linear.z),
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(srgb_to_linear(Vec3::ZERO), Vec3::ZERO);
        assert!((srgb_to_linear(Vec3::ONE) - Vec3::ONE).length() < 1e-6);
    }

    #[test]
    fn test_midpoint_is_darker() {
        let mid = srgb_channel_to_linear(0.5);
        assert!((mid - 0.214).abs() < 1e-3);
    }

    proptest::proptest! {
        #[test]
        fn prop_conversion_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (lo, hi) = (srgb_channel_to_linear(lo), srgb_channel_to_linear(hi));
            proptest::prop_assert!(lo <= hi);
            proptest::prop_assert!((0.0f32..=1.0 + 1e-6).contains(&hi));
        }
    }
}
