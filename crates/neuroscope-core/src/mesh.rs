//! Indexed triangle mesh container.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// An indexed triangle mesh with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals (same length as `positions`).
    pub normals: Vec<Vec3>,
    /// Triangle indices.
    pub indices: Vec<[u32; 3]>,
}

impl MeshGeometry {
    /// Creates a mesh from positions and triangles, computing normals.
    #[must_use]
    pub fn new(positions: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        let mut mesh = Self {
            normals: vec![Vec3::ZERO; positions.len()],
            positions,
            indices,
        };
        mesh.compute_vertex_normals();
        mesh
    }

    /// Builds a UV sphere centered at the origin.
    ///
    /// The grid has `(width_segments + 1) * (height_segments + 1)` vertices;
    /// the seam column and the pole rows are duplicated so every grid cell
    /// owns its own corners. Pole cells emit a single triangle, which leaves
    /// one pole vertex at each end unreferenced.
    #[must_use]
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut positions = Vec::with_capacity(
            ((width_segments + 1) * (height_segments + 1)) as usize,
        );
        let mut normals = Vec::with_capacity(positions.capacity());

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let dir = Vec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );
                positions.push(dir * radius);
                normals.push(dir.normalize_or_zero());
            }
        }

        let row = width_segments + 1;
        let mut indices = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.push([a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.push([b, c, d]);
                }
            }
        }

        Self {
            positions,
            normals,
            indices,
        }
    }

    /// Recomputes vertex normals as the area-weighted average of the
    /// incident face normals.
    pub fn compute_vertex_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        for tri in &self.indices {
            let v0 = self.positions[tri[0] as usize];
            let v1 = self.positions[tri[1] as usize];
            let v2 = self.positions[tri[2] as usize];

            // Unnormalized cross product already carries twice the area.
            let weighted = (v1 - v0).cross(v2 - v0);
            for &vi in tri {
                self.normals[vi as usize] += weighted;
            }
        }

        for normal in &mut self.normals {
            *normal = normal.normalize_or_zero();
        }
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the axis-aligned bounding box, or `None` for an empty mesh.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        if self.positions.is_empty() {
            return None;
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for &p in &self.positions {
            min = min.min(p);
            max = max.max(p);
        }
        Some((min, max))
    }

    /// Returns the indices as a flat list, as GPU index buffers expect.
    #[must_use]
    pub fn flat_indices(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_sphere_counts() {
        let sphere = MeshGeometry::uv_sphere(3.0, 32, 32);
        assert_eq!(sphere.vertex_count(), 33 * 33);
        // Two triangles per cell minus one per cell on each pole row.
        assert_eq!(sphere.triangle_count(), 32 * 32 * 2 - 2 * 32);
    }

    #[test]
    fn test_uv_sphere_radius() {
        let sphere = MeshGeometry::uv_sphere(2.5, 16, 12);
        for p in &sphere.positions {
            assert!((p.length() - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_recomputed_normals_point_outward() {
        let mut sphere = MeshGeometry::uv_sphere(1.0, 24, 16);
        sphere.compute_vertex_normals();

        let mut unreferenced = 0;
        for (p, n) in sphere.positions.iter().zip(&sphere.normals) {
            if *n == Vec3::ZERO {
                unreferenced += 1;
                continue;
            }
            assert!((n.length() - 1.0).abs() < 1e-3);
            assert!(p.normalize().dot(*n) > 0.8, "normal at {p} points inward: {n}");
        }
        assert_eq!(unreferenced, 2);
    }

    #[test]
    fn test_single_triangle_normal() {
        let mesh = MeshGeometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![[0, 1, 2]],
        );
        for n in &mesh.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_bounding_box() {
        let mesh = MeshGeometry::new(
            vec![Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, -4.0, 5.0), Vec3::ZERO],
            vec![[0, 1, 2]],
        );
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(max, Vec3::new(3.0, 2.0, 5.0));
        assert!(MeshGeometry::default().bounding_box().is_none());
    }

    #[test]
    fn test_flat_indices() {
        let mesh = MeshGeometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            vec![[0, 1, 2], [0, 2, 3]],
        );
        assert_eq!(mesh.flat_indices(), vec![0, 1, 2, 0, 2, 3]);
    }
}
