//! Tapered tubes swept along a curve.

use std::f32::consts::TAU;

use glam::Vec3;
use neuroscope_core::{CatmullRomCurve, MeshGeometry};

/// Radius at fraction `f` along a tube: `thickness * (1 - taper * f)`.
#[must_use]
pub fn tapered_radius(thickness: f32, taper: f32, fraction: f32) -> f32 {
    thickness * (1.0 - taper * fraction)
}

/// A triangulated tube around a smooth path.
#[derive(Debug, Clone)]
pub struct TubeMesh {
    /// Surface geometry.
    pub geometry: MeshGeometry,
    /// Curve interpolating `path`.
    pub curve: CatmullRomCurve,
    /// Sampled path the curve was built from.
    pub path: Vec<Vec3>,
    /// Ring radii, one per ring from root to tip.
    pub radii: Vec<f32>,
    /// Base thickness (radius at the root).
    pub thickness: f32,
    /// Nominal length along the growth direction.
    pub length: f32,
    /// Unit growth direction.
    pub direction: Vec3,
    /// Branch levels remaining below this tube when it was generated.
    pub depth: u32,
}

impl TubeMesh {
    /// Sweeps a tube along `path`.
    ///
    /// The tube has one ring per path segment boundary (`path.len()` rings),
    /// placed uniformly in arc length along the interpolating curve. Ring
    /// `j` has radius `tapered_radius(thickness, taper, j / segments)`.
    #[must_use]
    pub fn sweep(
        path: Vec<Vec3>,
        thickness: f32,
        taper: f32,
        radial_segments: u32,
        direction: Vec3,
        length: f32,
        depth: u32,
    ) -> Self {
        let curve = CatmullRomCurve::new(path.clone());
        let segments = path.len().saturating_sub(1).max(1);
        let radii: Vec<f32> = (0..=segments)
            .map(|j| tapered_radius(thickness, taper, j as f32 / segments as f32))
            .collect();
        let geometry = sweep_geometry(&curve, &radii, radial_segments.max(3));

        Self {
            geometry,
            curve,
            path,
            radii,
            thickness,
            length,
            direction,
            depth,
        }
    }

    /// Returns the first path sample.
    #[must_use]
    pub fn start(&self) -> Vec3 {
        self.path.first().copied().unwrap_or(Vec3::ZERO)
    }

    /// Returns the last path sample.
    #[must_use]
    pub fn tip(&self) -> Vec3 {
        self.path.last().copied().unwrap_or(Vec3::ZERO)
    }

    /// Returns the tube radius at fraction `f` along the tube, interpolating
    /// between rings.
    #[must_use]
    pub fn radius_at(&self, fraction: f32) -> f32 {
        let Some(&last) = self.radii.last() else {
            return 0.0;
        };
        let segments = self.radii.len() - 1;
        if segments == 0 {
            return last;
        }
        let p = fraction.clamp(0.0, 1.0) * segments as f32;
        let i = (p.floor() as usize).min(segments - 1);
        let w = p - i as f32;
        self.radii[i] * (1.0 - w) + self.radii[i + 1] * w
    }
}

/// A point along the swept curve with its local frame.
#[derive(Debug, Clone, Copy)]
struct Frame {
    pos: Vec3,
    tangent: Vec3,
    normal: Vec3,
    binormal: Vec3,
}

/// Builds ring vertices and quads around `curve`.
///
/// Each ring has `radial_segments + 1` vertices (the seam is duplicated) so
/// grid indexing stays regular.
fn sweep_geometry(curve: &CatmullRomCurve, radii: &[f32], radial_segments: u32) -> MeshGeometry {
    let rings = radii.len();
    if rings < 2 {
        return MeshGeometry::default();
    }

    let mut frames: Vec<Frame> = (0..rings)
        .map(|j| {
            let u = j as f32 / (rings - 1) as f32;
            Frame {
                pos: curve.point_at(u),
                tangent: curve.tangent_at(u),
                normal: Vec3::ZERO,
                binormal: Vec3::ZERO,
            }
        })
        .collect();
    propagate_frames(&mut frames);

    let row = radial_segments + 1;
    let mut positions = Vec::with_capacity(rings * row as usize);
    let mut normals = Vec::with_capacity(positions.capacity());

    for (frame, &radius) in frames.iter().zip(radii) {
        for k in 0..=radial_segments {
            let angle = k as f32 / radial_segments as f32 * TAU;
            // Winding below is counter-clockwise seen from outside for this sweep direction.
            let offset = -frame.normal * angle.cos() + frame.binormal * angle.sin();
            positions.push(frame.pos + offset * radius);
            normals.push(offset.normalize_or_zero());
        }
    }

    let mut indices = Vec::with_capacity((rings - 1) * radial_segments as usize * 2);
    for j in 1..rings as u32 {
        for k in 1..=radial_segments {
            let a = row * (j - 1) + (k - 1);
            let b = row * j + (k - 1);
            let c = row * j + k;
            let d = row * (j - 1) + k;
            indices.push([a, b, d]);
            indices.push([b, c, d]);
        }
    }

    MeshGeometry {
        positions,
        normals,
        indices,
    }
}

/// Fills in rotation-minimizing frames using the double reflection method.
fn propagate_frames(frames: &mut [Frame]) {
    let Some(first) = frames.first_mut() else {
        return;
    };

    let t0 = first.tangent;
    let arbitrary = if t0.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    first.normal = t0.cross(arbitrary).normalize();
    first.binormal = t0.cross(first.normal).normalize();

    for i in 0..frames.len() - 1 {
        let Frame {
            pos: x_i,
            tangent: t_i,
            normal: r_i,
            binormal: s_i,
        } = frames[i];
        let x_next = frames[i + 1].pos;
        let t_next = frames[i + 1].tangent;

        let v1 = x_next - x_i;
        let c1 = v1.dot(v1);
        if c1 < 1e-10 {
            frames[i + 1].normal = r_i;
            frames[i + 1].binormal = s_i;
            continue;
        }

        let r_l = r_i - (2.0 / c1) * v1.dot(r_i) * v1;
        let t_l = t_i - (2.0 / c1) * v1.dot(t_i) * v1;

        let v2 = t_next - t_l;
        let c2 = v2.dot(v2);
        let r_next = if c2 < 1e-10 {
            r_l
        } else {
            r_l - (2.0 / c2) * v2.dot(r_l) * v2
        };

        let r_next = (r_next - t_next * t_next.dot(r_next)).normalize();
        frames[i + 1].normal = r_next;
        frames[i + 1].binormal = t_next.cross(r_next).normalize();
    }
}
