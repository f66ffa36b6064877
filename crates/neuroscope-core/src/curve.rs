//! Centripetal Catmull-Rom curves with arc-length parameterization.

use glam::Vec3;

/// Number of divisions used to build the cumulative arc-length table.
pub const ARC_LENGTH_DIVISIONS: usize = 200;

/// A smooth open curve interpolating a sequence of control points.
///
/// The curve passes through every control point. Missing neighbors at the
/// two ends are extrapolated by reflecting the adjacent control point. Knot
/// spacing follows the centripetal parameterization (`|Δp|^0.5`).
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    /// Cumulative length at `t = i / ARC_LENGTH_DIVISIONS`.
    arc_lengths: Vec<f32>,
}

impl CatmullRomCurve {
    /// Builds a curve through `points`.
    ///
    /// A single point yields a degenerate curve that evaluates to that point
    /// everywhere; an empty slice evaluates to the origin.
    #[must_use]
    pub fn new(points: Vec<Vec3>) -> Self {
        let mut curve = Self {
            points,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.compute_arc_lengths();
        curve
    }

    /// Returns the control points.
    #[must_use]
    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Returns the total (approximate) arc length.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Evaluates the curve at parameter `t` in `[0, 1]`, where control point
    /// `i` sits at `t = i / (n - 1)`.
    #[must_use]
    pub fn point(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        match n {
            0 => return Vec3::ZERO,
            1 => return self.points[0],
            _ => {}
        }

        let p = (n - 1) as f32 * t.clamp(0.0, 1.0);
        let mut segment = p.floor() as usize;
        let mut weight = p - segment as f32;
        if segment >= n - 1 {
            segment = n - 2;
            weight = 1.0;
        }

        let p1 = self.points[segment];
        let p2 = self.points[segment + 1];
        let p0 = if segment > 0 {
            self.points[segment - 1]
        } else {
            2.0 * p1 - p2
        };
        let p3 = if segment + 2 < n {
            self.points[segment + 2]
        } else {
            2.0 * p2 - p1
        };

        centripetal_segment(p0, p1, p2, p3, weight)
    }

    /// Evaluates the curve at arc-length fraction `u` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.u_to_t(u))
    }

    /// Returns the unit tangent at arc-length fraction `u`.
    #[must_use]
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        const DELTA: f32 = 1e-4;
        let t = self.u_to_t(u);
        let t1 = (t - DELTA).max(0.0);
        let t2 = (t + DELTA).min(1.0);
        let tangent = (self.point(t2) - self.point(t1)).normalize_or_zero();
        if tangent == Vec3::ZERO {
            self.fallback_tangent()
        } else {
            tangent
        }
    }

    /// Maps an arc-length fraction to the curve parameter.
    fn u_to_t(&self, u: f32) -> f32 {
        let total = self.length();
        if total <= f32::EPSILON {
            return u.clamp(0.0, 1.0);
        }

        let target = u.clamp(0.0, 1.0) * total;
        let lengths = &self.arc_lengths;
        // Index of the last entry not exceeding the target length.
        let i = lengths
            .partition_point(|&l| l <= target)
            .saturating_sub(1)
            .min(lengths.len() - 2);

        let before = lengths[i];
        let segment = lengths[i + 1] - before;
        let fraction = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };
        (i as f32 + fraction) / (lengths.len() - 1) as f32
    }

    fn compute_arc_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);
        for i in 1..=ARC_LENGTH_DIVISIONS {
            let current = self.point(i as f32 / ARC_LENGTH_DIVISIONS as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        lengths
    }

    fn fallback_tangent(&self) -> Vec3 {
        match (self.points.first(), self.points.last()) {
            (Some(&a), Some(&b)) if a != b => (b - a).normalize(),
            _ => Vec3::Z,
        }
    }
}

/// Evaluates one centripetal Catmull-Rom span between `p1` and `p2`.
fn centripetal_segment(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, w: f32) -> Vec3 {
    let mut dt0 = p0.distance_squared(p1).powf(0.25);
    let mut dt1 = p1.distance_squared(p2).powf(0.25);
    let mut dt2 = p2.distance_squared(p3).powf(0.25);

    // Guard against repeated points.
    if dt1 < 1e-4 {
        dt1 = 1.0;
    }
    if dt0 < 1e-4 {
        dt0 = dt1;
    }
    if dt2 < 1e-4 {
        dt2 = dt1;
    }

    // Tangents at p1 and p2 for a non-uniform spline, scaled to [0, 1].
    let m1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let m2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

    // Cubic Hermite basis.
    let c0 = p1;
    let c1 = m1;
    let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * m1 - m2;
    let c3 = 2.0 * p1 - 2.0 * p2 + m1 + m2;
    c0 + w * (c1 + w * (c2 + w * c3))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.5),
            Vec3::new(3.0, 1.0, 0.0),
            Vec3::new(4.0, 0.0, -0.5),
        ]
    }

    #[test]
    fn test_passes_through_control_points() {
        let points = zigzag();
        let curve = CatmullRomCurve::new(points.clone());
        let last = (points.len() - 1) as f32;
        for (i, p) in points.iter().enumerate() {
            let q = curve.point(i as f32 / last);
            assert!(q.distance(*p) < 1e-4, "point {i}: expected {p}, got {q}");
        }
    }

    #[test]
    fn test_straight_line_stays_straight() {
        let points: Vec<Vec3> = (0..=10).map(|i| Vec3::X * i as f32).collect();
        let curve = CatmullRomCurve::new(points);
        assert!((curve.length() - 10.0).abs() < 1e-3);
        for i in 0..=20 {
            let p = curve.point_at(i as f32 / 20.0);
            assert!(p.y.abs() < 1e-5 && p.z.abs() < 1e-5);
            assert!((p.x - i as f32 * 0.5).abs() < 1e-2);
        }
    }

    #[test]
    fn test_arc_length_endpoints() {
        let points = zigzag();
        let curve = CatmullRomCurve::new(points.clone());
        assert!(curve.point_at(0.0).distance(points[0]) < 1e-4);
        assert!(curve.point_at(1.0).distance(points[4]) < 1e-4);
    }

    #[test]
    fn test_length_exceeds_chord() {
        let curve = CatmullRomCurve::new(zigzag());
        let chord = Vec3::ZERO.distance(Vec3::new(4.0, 0.0, -0.5));
        assert!(curve.length() > chord);
    }

    #[test]
    fn test_tangent_is_unit() {
        let curve = CatmullRomCurve::new(zigzag());
        for i in 0..=10 {
            let t = curve.tangent_at(i as f32 / 10.0);
            assert!((t.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_degenerate_curves() {
        assert_eq!(CatmullRomCurve::new(vec![]).point(0.5), Vec3::ZERO);
        let single = CatmullRomCurve::new(vec![Vec3::ONE]);
        assert_eq!(single.point_at(0.3), Vec3::ONE);
        assert_eq!(single.length(), 0.0);
        assert_eq!(single.tangent_at(0.5), Vec3::Z);
    }

    proptest::proptest! {
        #[test]
        fn prop_interpolates_random_paths(
            steps in proptest::collection::vec((-2.0f32..2.0, -2.0f32..2.0, -2.0f32..2.0), 1..8)
        ) {
            let mut points = vec![Vec3::ZERO];
            for (x, y, z) in steps {
                let last = points[points.len() - 1];
                points.push(last + Vec3::new(x, y, z));
            }
            let curve = CatmullRomCurve::new(points.clone());
            let last = (points.len() - 1) as f32;
            for (i, p) in points.iter().enumerate() {
                proptest::prop_assert!(curve.point(i as f32 / last).distance(*p) < 1e-3);
            }
            proptest::prop_assert!(curve.point_at(1.0).distance(points[points.len() - 1]) < 1e-3);
        }
    }
}
