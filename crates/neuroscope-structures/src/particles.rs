//! Decorative particles floating around the neuron.

use glam::Vec3;
use neuroscope_core::{MeshGeometry, ParticleConfig, RandomSource};

/// Point-like markers scattered in a cube around the soma.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    /// Marker centers.
    pub positions: Vec<Vec3>,
    /// Radius of each marker sphere.
    pub marker_radius: f32,
    /// Segments of each marker sphere.
    pub marker_segments: u32,
}

impl ParticleField {
    /// Returns the number of particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if there are no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the sphere mesh shared by every marker, centered at the origin.
    #[must_use]
    pub fn marker_geometry(&self) -> MeshGeometry {
        MeshGeometry::uv_sphere(self.marker_radius, self.marker_segments, self.marker_segments)
    }
}

/// Scatters `config.count` markers uniformly in a cube of edge
/// `config.extent` centered on `center`.
pub fn scatter_particles(
    config: &ParticleConfig,
    center: Vec3,
    rng: &mut dyn RandomSource,
) -> ParticleField {
    let positions = (0..config.count)
        .map(|_| {
            let x = rng.next_centered() * config.extent;
            let y = rng.next_centered() * config.extent;
            let z = rng.next_centered() * config.extent;
            center + Vec3::new(x, y, z)
        })
        .collect();

    ParticleField {
        positions,
        marker_radius: config.marker_radius,
        marker_segments: config.marker_segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuroscope_core::{ConstantRandom, StdRandom};

    #[test]
    fn test_count_and_bounds() {
        let config = ParticleConfig::default();
        let field = scatter_particles(&config, Vec3::ZERO, &mut StdRandom::seeded(5));
        assert_eq!(field.len(), 50);
        for p in &field.positions {
            assert!(p.abs().max_element() <= 20.0);
        }
    }

    #[test]
    fn test_centered_on_soma() {
        let config = ParticleConfig::default();
        let center = Vec3::new(1.0, 2.0, 3.0);
        let field = scatter_particles(&config, center, &mut ConstantRandom(0.5));
        assert!(field.positions.iter().all(|p| *p == center));
    }

    #[test]
    fn test_empty_field() {
        let config = ParticleConfig {
            count: 0,
            ..ParticleConfig::default()
        };
        let field = scatter_particles(&config, Vec3::ZERO, &mut StdRandom::seeded(0));
        assert!(field.is_empty());
    }

    #[test]
    fn test_marker_geometry() {
        let field = scatter_particles(&ParticleConfig::default(), Vec3::ZERO, &mut ConstantRandom(0.1));
        let marker = field.marker_geometry();
        assert_eq!(marker.vertex_count(), 9 * 9);
        let (min, max) = marker.bounding_box().unwrap();
        assert!(max.x <= 0.05 + 1e-6 && min.x >= -0.05 - 1e-6);
    }
}
