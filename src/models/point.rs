/// 2D point with floating point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Calculate squared distance (faster, no sqrt)
    pub fn distance_squared(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Translate point by (dx, dy)
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Vector from `other` to `self`
    pub fn sub(&self, other: &Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Multiply both coordinates by `k`
    pub fn scale(&self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k)
    }

    /// Z component of the cross product of two vectors
    pub fn cross(&self, other: &Point) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 1e-6);
        assert!((p1.distance_squared(&p2) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_vector_ops() {
        let a = Point::new(4.0, 1.0);
        let b = Point::new(1.0, 1.0);
        assert_eq!(a.sub(&b), Point::new(3.0, 0.0));
        assert_eq!(a.sub(&b).scale(2.0), Point::new(6.0, 0.0));
        // x axis cross y axis points into +z
        assert!(Point::new(1.0, 0.0).cross(&Point::new(0.0, 1.0)) > 0.0);
        assert_eq!(b.translate(1.0, -1.0), Point::new(2.0, 0.0));
    }
}
