//! Irregular cell body.

use glam::Vec3;
use neuroscope_core::{MeshGeometry, RandomSource, SomaConfig};

/// A sphere-derived blob whose vertices are pushed in or out along their
/// radial direction.
#[derive(Debug, Clone)]
pub struct SomaMesh {
    /// Displaced surface with recomputed normals.
    pub geometry: MeshGeometry,
    /// Nominal (undisplaced) radius.
    pub radius: f32,
    /// Center of the cell body.
    pub center: Vec3,
}

impl SomaMesh {
    /// Returns the largest relative deviation of any vertex from the nominal
    /// radius, e.g. `0.05` for ±5%.
    #[must_use]
    pub fn max_radial_deviation(&self) -> f32 {
        self.geometry
            .positions
            .iter()
            .map(|p| ((*p - self.center).length() / self.radius - 1.0).abs())
            .fold(0.0, f32::max)
    }
}

/// Builds the soma centered at the origin.
///
/// Each vertex distance is scaled by `1 + (rand - 0.5) * noise_amplitude`,
/// keeping its direction; normals are then recomputed from the displaced
/// surface.
pub fn generate_soma(config: &SomaConfig, rng: &mut dyn RandomSource) -> SomaMesh {
    let mut geometry =
        MeshGeometry::uv_sphere(config.radius, config.width_segments, config.height_segments);

    for position in &mut geometry.positions {
        let noise = rng.next_centered() * config.noise_amplitude;
        let distance = position.length();
        *position = position.normalize_or_zero() * (distance * (1.0 + noise));
    }
    geometry.compute_vertex_normals();

    SomaMesh {
        geometry,
        radius: config.radius,
        center: Vec3::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuroscope_core::{ConstantRandom, StdRandom};
    use proptest::prelude::*;

    #[test]
    fn test_soma_vertex_count() {
        let soma = generate_soma(&SomaConfig::default(), &mut StdRandom::seeded(1));
        assert_eq!(soma.geometry.vertex_count(), 33 * 33);
        assert_eq!(soma.geometry.normals.len(), 33 * 33);
    }

    #[test]
    fn test_extreme_noise_hits_bounds() {
        let config = SomaConfig::default();
        let low = generate_soma(&config, &mut ConstantRandom(0.0));
        for p in &low.geometry.positions {
            assert!((p.length() - 3.0 * 0.95).abs() < 1e-4);
        }
        let high = generate_soma(&config, &mut ConstantRandom(0.999_999));
        assert!(high.max_radial_deviation() <= 0.05 + 1e-5);
    }

    #[test]
    fn test_normals_recomputed_from_displaced_surface() {
        let config = SomaConfig::default();
        let soma = generate_soma(&config, &mut StdRandom::seeded(3));
        let ideal = MeshGeometry::uv_sphere(config.radius, 32, 32);

        // At least some normals must differ from the ideal sphere's.
        let differing = soma
            .geometry
            .normals
            .iter()
            .zip(&ideal.normals)
            .filter(|(a, b)| a.distance(**b) > 1e-3)
            .count();
        assert!(differing > 0);

        // And the recomputed normal matches a fresh recomputation.
        let mut copy = soma.geometry.clone();
        copy.compute_vertex_normals();
        assert_eq!(copy.normals, soma.geometry.normals);
    }

    #[test]
    fn test_direction_preserved() {
        let config = SomaConfig::default();
        let ideal = MeshGeometry::uv_sphere(config.radius, 32, 32);
        let soma = generate_soma(&config, &mut StdRandom::seeded(9));
        for (a, b) in ideal.positions.iter().zip(&soma.geometry.positions) {
            assert!(a.normalize().dot(b.normalize()) > 0.9999);
        }
    }

    proptest! {
        #[test]
        fn prop_radial_noise_within_five_percent(seed in any::<u64>(), radius in 0.5f32..10.0) {
            let config = SomaConfig { radius, ..SomaConfig::default() };
            let soma = generate_soma(&config, &mut StdRandom::seeded(seed));
            prop_assert!(soma.max_radial_deviation() <= 0.05 + 1e-4);
        }
    }
}
