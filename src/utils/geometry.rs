/// Geometry utilities for perspective transformations
use crate::models::Point;

/// Perspective transformation matrix (3x3, a33 fixed to 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveTransform {
    a11: f64,
    a12: f64,
    a13: f64,
    a21: f64,
    a22: f64,
    a23: f64,
    a31: f64,
    a32: f64,
}

impl PerspectiveTransform {
    /// Create transform mapping 4 source points onto 4 destination points
    pub fn from_points(src: &[Point; 4], dst: &[Point; 4]) -> Option<Self> {
        // Direct linear transform: two equations per correspondence
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (sx, sy) = (src[i].x as f64, src[i].y as f64);
            let (dx, dy) = (dst[i].x as f64, dst[i].y as f64);

            let row = i * 2;
            a[row] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
            b[row] = dx;
            a[row + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
            b[row + 1] = dy;
        }

        let s = solve_linear_system(&a, &b)?;
        let transform = Self {
            a11: s[0],
            a12: s[1],
            a13: s[2],
            a21: s[3],
            a22: s[4],
            a23: s[5],
            a31: s[6],
            a32: s[7],
        };
        s.iter().all(|v| v.is_finite()).then_some(transform)
    }

    /// Transform a point using this perspective matrix
    ///
    /// Points on the line at infinity map to `None`.
    pub fn transform(&self, p: &Point) -> Option<Point> {
        let x = p.x as f64;
        let y = p.y as f64;

        let denominator = self.a31 * x + self.a32 * y + 1.0;
        if denominator.abs() < 1e-10 {
            return None;
        }

        let x_new = (self.a11 * x + self.a12 * y + self.a13) / denominator;
        let y_new = (self.a21 * x + self.a22 * y + self.a23) / denominator;

        Some(Point::new(x_new as f32, y_new as f32))
    }
}

/// Solve 8x8 linear system using Gaussian elimination with partial pivoting
#[allow(clippy::needless_range_loop)]
fn solve_linear_system(a: &[[f64; 8]; 8], b: &[f64; 8]) -> Option<[f64; 8]> {
    let mut a = *a;
    let mut b = *b;
    let n = 8;

    for i in 0..n {
        let mut max_val = a[i][i].abs();
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > max_val {
                max_val = a[k][i].abs();
                max_row = k;
            }
        }

        if max_val < 1e-12 {
            return None;
        }

        if max_row != i {
            a.swap(i, max_row);
            b.swap(i, max_row);
        }

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Some(x)
}

/// Cosine of the angle at `vertex` between the rays to `p1` and `p2`
pub fn angle_cos(vertex: &Point, p1: &Point, p2: &Point) -> Option<f32> {
    let v1 = p1.sub(vertex);
    let v2 = p2.sub(vertex);
    let denom = (v1.x * v1.x + v1.y * v1.y).sqrt() * (v2.x * v2.x + v2.y * v2.y).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some((v1.x * v2.x + v1.y * v2.y) / denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_transform_scale() {
        let src = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let dst = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(0.0, 50.0),
        ];

        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        let p = t.transform(&Point::new(50.0, 50.0)).unwrap();
        assert!((p.x - 25.0).abs() < 1e-3);
        assert!((p.y - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_perspective_transform_maps_corners() {
        let src = [
            Point::new(3.5, 3.5),
            Point::new(17.5, 3.5),
            Point::new(3.5, 17.5),
            Point::new(17.5, 17.5),
        ];
        let dst = [
            Point::new(40.0, 30.0),
            Point::new(120.0, 38.0),
            Point::new(35.0, 112.0),
            Point::new(118.0, 125.0),
        ];
        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        for (s, d) in src.iter().zip(dst.iter()) {
            let p = t.transform(s).unwrap();
            assert!(p.distance(d) < 1e-2, "{p:?} vs {d:?}");
        }
    }

    #[test]
    fn test_degenerate_points() {
        let p = Point::new(1.0, 1.0);
        assert!(PerspectiveTransform::from_points(&[p; 4], &[p; 4]).is_none());
    }

    #[test]
    fn test_angle_cos() {
        let vertex = Point::new(1.0, 0.0);
        let cos = angle_cos(&vertex, &Point::new(0.0, 0.0), &Point::new(1.0, 1.0)).unwrap();
        assert!(cos.abs() < 1e-6);
        assert!(angle_cos(&vertex, &vertex, &Point::new(2.0, 2.0)).is_none());
    }
}
