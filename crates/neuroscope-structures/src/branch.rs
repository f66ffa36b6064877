//! Recursive branching limbs.
//!
//! A limb is a tube grown from a seed (start, direction, length, thickness,
//! remaining depth). While depth remains and the limb is long enough, two
//! children sprout at the branch point, rotated either side of the parent
//! direction about a fixed axis. Each call owns and returns its subtree.

use std::f32::consts::PI;

use glam::{Quat, Vec3};
use neuroscope_core::NeuronConfig;

use crate::tube::TubeMesh;

/// Deterministic wobble added to a limb path, growing from zero at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganicOffset {
    /// Dendrite wobble: `(sin 2πt · 2, cos 1.5πt · 1.5, sin 3πt) · t/2`.
    Dendrite,
    /// Gentler axon flow: `(sin πt, cos 0.5πt / 2, sin 0.3πt · 0.3) · t`.
    Axon,
}

impl OrganicOffset {
    /// Returns the offset at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn at(self, t: f32) -> Vec3 {
        match self {
            Self::Dendrite => {
                Vec3::new(
                    (t * PI * 2.0).sin() * 2.0,
                    (t * PI * 1.5).cos() * 1.5,
                    (t * PI * 3.0).sin(),
                ) * (t * 0.5)
            }
            Self::Axon => {
                Vec3::new(
                    (t * PI).sin(),
                    (t * PI * 0.5).cos() * 0.5,
                    (t * PI * 0.3).sin() * 0.3,
                ) * t
            }
        }
    }
}

/// Where and how a single limb starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchSeed {
    /// Root position.
    pub start: Vec3,
    /// Unit growth direction.
    pub direction: Vec3,
    /// Length along the direction.
    pub length: f32,
    /// Root radius.
    pub thickness: f32,
    /// Branch levels allowed below this limb.
    pub depth: u32,
}

/// Shape and recursion rules shared by every limb of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchParams {
    /// Path segments per limb.
    pub segments: u32,
    /// Sides of the tube cross-section.
    pub radial_segments: u32,
    /// Radius shrink toward the tip.
    pub taper: f32,
    /// Limbs at or below this length do not branch.
    pub min_branch_length: f32,
    /// Fraction of the path where children start.
    pub branch_fraction: f32,
    /// Rotation of each child away from the parent direction.
    pub branch_angle: f32,
    /// Fixed rotation axis for child directions.
    pub branch_axis: Vec3,
    /// Child length relative to the parent.
    pub length_scale: f32,
    /// Child thickness relative to the parent.
    pub thickness_scale: f32,
    /// Path wobble.
    pub offset: OrganicOffset,
}

impl BranchParams {
    /// Rules for dendrites.
    #[must_use]
    pub fn dendrite(config: &NeuronConfig) -> Self {
        let d = &config.dendrites;
        Self {
            segments: d.segments,
            radial_segments: d.radial_segments,
            taper: config.taper,
            min_branch_length: d.min_branch_length,
            branch_fraction: d.branch_fraction,
            branch_angle: d.branch_angle,
            branch_axis: d.branch_axis.normalize_or_zero(),
            length_scale: d.length_scale,
            thickness_scale: d.thickness_scale,
            offset: OrganicOffset::Dendrite,
        }
    }

    /// Rules for the axon. Recursion settings are inherited from the
    /// dendrites but never used because the axon is seeded with depth zero.
    #[must_use]
    pub fn axon(config: &NeuronConfig) -> Self {
        Self {
            segments: config.axon.segments,
            radial_segments: config.axon.radial_segments,
            offset: OrganicOffset::Axon,
            ..Self::dendrite(config)
        }
    }
}

/// Upper bound on the tubes grown from one seed of the given depth.
#[must_use]
pub fn max_tube_count(depth: u32) -> usize {
    (1usize << (depth + 1)) - 1
}

/// Samples the limb path: `start + direction * length * t + offset(t)`.
#[must_use]
pub fn sample_path(seed: &BranchSeed, params: &BranchParams) -> Vec<Vec3> {
    let segments = params.segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            seed.start + seed.direction * (seed.length * t) + params.offset.at(t)
        })
        .collect()
}

/// Index of the path sample children start from.
#[must_use]
pub fn branch_index(sample_count: usize, fraction: f32) -> usize {
    let index = (sample_count as f32 * fraction).floor() as usize;
    index.min(sample_count.saturating_sub(1))
}

/// Grows a limb and, recursively, its branches.
///
/// The returned list starts with the limb itself, followed depth-first by
/// the subtree of the first child and then that of the second.
#[must_use]
pub fn grow_branch(seed: BranchSeed, params: &BranchParams) -> Vec<TubeMesh> {
    let path = sample_path(&seed, params);
    let branch_point = path[branch_index(path.len(), params.branch_fraction)];

    let tube = TubeMesh::sweep(
        path,
        seed.thickness,
        params.taper,
        params.radial_segments,
        seed.direction,
        seed.length,
        seed.depth,
    );

    let mut tubes = vec![tube];
    if seed.depth > 0 && seed.length > params.min_branch_length {
        for angle in [params.branch_angle, -params.branch_angle] {
            let rotation = Quat::from_axis_angle(params.branch_axis, angle);
            let child = BranchSeed {
                start: branch_point,
                direction: rotation * seed.direction,
                length: seed.length * params.length_scale,
                thickness: seed.thickness * params.thickness_scale,
                depth: seed.depth - 1,
            };
            tubes.extend(grow_branch(child, params));
        }
    }
    tubes
}
