//! Placement of dendrites and the axon around the soma.

use std::f32::consts::TAU;

use glam::Vec3;
use neuroscope_core::{NeuronConfig, RandomSource};

use crate::branch::{grow_branch, BranchParams, BranchSeed};
use crate::tube::TubeMesh;

/// Unit direction from an azimuth angle and an elevation, both in radians.
#[must_use]
pub fn limb_direction(angle: f32, elevation: f32) -> Vec3 {
    Vec3::new(
        angle.cos() * elevation.cos(),
        angle.sin() * elevation.cos(),
        elevation.sin(),
    )
}

/// Grows the main dendrites and their branches.
///
/// Dendrite `i` of `K` points at azimuth `2π i / K` with a random elevation
/// in `±elevation_spread / 2`, starts `attach_offset` from `center`, and
/// draws its length and thickness from the configured ranges. The result
/// holds each dendrite followed by its branches, dendrite by dendrite.
pub fn place_dendrites(
    config: &NeuronConfig,
    center: Vec3,
    rng: &mut dyn RandomSource,
) -> Vec<TubeMesh> {
    let d = &config.dendrites;
    let params = BranchParams::dendrite(config);
    let mut tubes = Vec::new();

    for i in 0..d.count {
        let angle = i as f32 / d.count as f32 * TAU;
        let elevation = rng.next_centered() * d.elevation_spread;
        let direction = limb_direction(angle, elevation);

        let seed = BranchSeed {
            start: center + direction * config.attach_offset,
            direction,
            length: rng.next_range(d.length_range[0], d.length_range[1]),
            thickness: rng.next_range(d.thickness_range[0], d.thickness_range[1]),
            depth: d.branch_depth,
        };
        tubes.extend(grow_branch(seed, &params));
    }

    tubes
}

/// Builds the single, unbranched axon along the configured direction.
#[must_use]
pub fn build_axon(config: &NeuronConfig, center: Vec3) -> TubeMesh {
    let a = &config.axon;
    let direction = a.direction.normalize_or_zero();
    let seed = BranchSeed {
        start: center + direction * config.attach_offset,
        direction,
        length: a.length,
        thickness: a.thickness,
        depth: 0,
    };

    let mut tubes = grow_branch(seed, &BranchParams::axon(config));
    // Depth zero never branches, so exactly one tube comes back.
    tubes.swap_remove(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::max_tube_count;
    use neuroscope_core::{ConstantRandom, StdRandom};

    #[test]
    fn test_limb_direction_is_unit() {
        for i in 0..12 {
            let d = limb_direction(i as f32 * 0.5, (i as f32 - 6.0) * 0.1);
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
        assert!(limb_direction(0.0, 0.0).distance(Vec3::X) < 1e-6);
    }

    #[test]
    fn test_dendrite_count_with_default_config() {
        let config = NeuronConfig::default();
        for seed in 0..8 {
            let tubes = place_dendrites(&config, Vec3::ZERO, &mut StdRandom::seeded(seed));
            assert_eq!(tubes.len(), 6 * max_tube_count(2));
        }
    }

    #[test]
    fn test_roots_start_on_soma_offset() {
        let config = NeuronConfig::default();
        let tubes = place_dendrites(&config, Vec3::ZERO, &mut StdRandom::seeded(11));
        let roots: Vec<_> = tubes.iter().filter(|t| t.depth == 2).collect();
        assert_eq!(roots.len(), 6);
        for root in roots {
            assert!((root.start().length() - 3.2).abs() < 1e-5);
            assert!(root.start().distance(root.direction * 3.2) < 1e-5);
            assert!((8.5..14.5).contains(&root.length));
            assert!((0.3..0.5).contains(&root.thickness));
        }
    }

    #[test]
    fn test_roots_spread_evenly_in_azimuth() {
        let config = NeuronConfig::default();
        // Centered noise of zero keeps every root in the XY plane.
        let tubes = place_dendrites(&config, Vec3::ZERO, &mut ConstantRandom(0.5));
        let roots: Vec<_> = tubes.iter().filter(|t| t.depth == 2).collect();
        for (i, root) in roots.iter().enumerate() {
            let angle = i as f32 / 6.0 * TAU;
            assert!(root.direction.distance(Vec3::new(angle.cos(), angle.sin(), 0.0)) < 1e-5);
        }
    }

    #[test]
    fn test_axon() {
        let config = NeuronConfig::default();
        let axon = build_axon(&config, Vec3::ZERO);
        let direction = Vec3::new(1.0, -0.3, 0.2).normalize();
        assert!(axon.direction.distance(direction) < 1e-6);
        assert!(axon.start().distance(direction * 3.2) < 1e-5);
        assert_eq!(axon.path.len(), 31);
        assert_eq!(axon.depth, 0);
        assert!((axon.thickness - 0.2).abs() < 1e-6);
        assert!((axon.radius_at(1.0) - 0.2 * 0.3).abs() < 1e-6);
    }
}
