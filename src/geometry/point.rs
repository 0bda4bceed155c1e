use crate::*;

/// 2D point / vector with f64 coordinates.
///
/// Equality is tolerance-based: two points compare equal when both
/// coordinates differ by less than [`TOLERANCE`]. The `Hash` impl rounds
/// each coordinate onto the tolerance grid so points that compare equal
/// hash to the same bucket.
#[derive(Debug, Default, Clone, Copy)]
pub struct Point {
    pub x: float,
    pub y: float,
}

impl Point {
    pub const fn new(x: float, y: float) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> float {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: Point) -> float {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance to the segment `a -> b`: the point is projected onto the
    /// supporting line, the parameter clamped into [0, 1], and the distance
    /// to the clamped point returned.
    pub fn distance_to_segment(&self, a: Point, b: Point) -> float {
        self.distance_to(self.project_onto_segment(a, b))
    }

    /// Closest point to `self` on the segment `a -> b`.
    pub fn project_onto_segment(&self, a: Point, b: Point) -> Point {
        let seg = b - a;
        let length_sq = seg.magnitude_squared();
        if length_sq < TOLERANCE {
            // Degenerate segment
            return a;
        }
        let t = ((*self - a).dot(seg) / length_sq).clamp(0.0, 1.0);
        a + seg * t
    }

    pub fn dot(&self, other: Point) -> float {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (z component of the 3D cross product).
    pub fn cross(&self, other: Point) -> float {
        self.x * other.y - self.y * other.x
    }

    pub fn magnitude(&self) -> float {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(&self) -> float {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the direction of `self`, or the zero vector when the
    /// magnitude is below tolerance.
    pub fn normalize(&self) -> Point {
        let mag = self.magnitude();
        if mag < TOLERANCE {
            return Point::new(0.0, 0.0);
        }
        Point::new(self.x / mag, self.y / mag)
    }

    /// Rotate about the origin by `angle` radians, counter-clockwise.
    pub fn rotate(&self, angle: float) -> Point {
        let (sin_a, cos_a) = angle.sin_cos();
        Point::new(
            self.x * cos_a - self.y * sin_a,
            self.x * sin_a + self.y * cos_a,
        )
    }

    pub fn rotate_around(&self, center: Point, angle: float) -> Point {
        (*self - center).rotate(angle) + center
    }

    /// Angle of the vector from `self` to `other`, in radians.
    pub fn angle_to(&self, other: Point) -> float {
        let vec = other - *self;
        vec.y.atan2(vec.x)
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude() < TOLERANCE
    }

    /// Scalar division, failing when the divisor magnitude is below
    /// tolerance.
    pub fn divide(&self, scalar: float) -> Result<Point> {
        if scalar.abs() < TOLERANCE {
            return Err(LayoutError::DivideByZero);
        }
        Ok(Point::new(self.x / scalar, self.y / scalar))
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < TOLERANCE && (self.y - other.y).abs() < TOLERANCE
    }
}

// Tolerance equality is not transitive; `Eq` is declared so points can key
// dedup sets, with the same caveat the grid hash carries.
impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        grid_coordinate(self.x).hash(state);
        grid_coordinate(self.y).hash(state);
    }
}

/// Round a coordinate onto the tolerance grid. Adding 0.0 collapses -0.0
/// into +0.0 so both hash identically.
pub(crate) fn grid_coordinate(value: float) -> u64 {
    ((value / TOLERANCE).round() + 0.0).to_bits()
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::Mul<float> for Point {
    type Output = Point;
    fn mul(self, scalar: float) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }
}

impl std::ops::AddAssign for Point {
    fn add_assign(&mut self, other: Point) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl std::ops::SubAssign for Point {
    fn sub_assign(&mut self, other: Point) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Point({:.6}, {:.6})", self.x, self.y)
    }
}

pub fn distance(p1: Point, p2: Point) -> float {
    p1.distance_to(p2)
}

pub fn midpoint(p1: Point, p2: Point) -> Point {
    Point::new((p1.x + p2.x) * 0.5, (p1.y + p2.y) * 0.5)
}

/// Angle at `p2` formed by the rays to `p1` and `p3`, in radians.
/// Degenerate rays (below tolerance) yield 0.
pub fn angle_between_points(p1: Point, p2: Point, p3: Point) -> float {
    let v1 = p1 - p2;
    let v2 = p3 - p2;
    let mag1 = v1.magnitude();
    let mag2 = v2.magnitude();
    if mag1 < TOLERANCE || mag2 < TOLERANCE {
        return 0.0;
    }
    clamp_cosine(v1.dot(v2) / (mag1 * mag2)).acos()
}

pub fn are_collinear(p1: Point, p2: Point, p3: Point) -> bool {
    (p2 - p1).cross(p3 - p1).abs() < TOLERANCE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// Turn direction of the path `p1 -> p2 -> p3`.
pub fn orientation(p1: Point, p2: Point, p3: Point) -> Orientation {
    let cross = (p2 - p1).cross(p3 - p2);
    if cross.abs() < TOLERANCE {
        Orientation::Collinear
    } else if cross > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{DefaultHasher, Hash, Hasher};

    fn hash_of(p: Point) -> u64 {
        let mut h = DefaultHasher::new();
        p.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_tolerance_equality_and_hash() {
        let p = Point::new(1.0, 2.0);
        let q = Point::new(1.0 + 1e-12, 2.0 - 1e-12);
        assert_eq!(p, q);
        assert_eq!(hash_of(p), hash_of(q));

        let r = Point::new(1.0 + 1e-6, 2.0);
        assert_ne!(p, r);
    }

    #[test]
    fn test_negative_zero_hashes_like_zero() {
        assert_eq!(hash_of(Point::new(0.0, 0.0)), hash_of(Point::new(-0.0, -0.0)));
    }

    #[test]
    fn test_arithmetic() {
        let p = Point::new(3.0, 4.0);
        let q = Point::new(1.0, 2.0);
        assert_eq!(p + q, Point::new(4.0, 6.0));
        assert_eq!(p - q, Point::new(2.0, 2.0));
        assert_eq!(p * 2.0, Point::new(6.0, 8.0));
        assert_eq!(p.divide(2.0).unwrap(), Point::new(1.5, 2.0));
        assert_eq!(p.divide(1e-12), Err(LayoutError::DivideByZero));
    }

    #[test]
    fn test_magnitude_and_normalize() {
        let p = Point::new(3.0, 4.0);
        assert!((p.magnitude() - 5.0).abs() < TOLERANCE);
        assert!((p.normalize().magnitude() - 1.0).abs() < TOLERANCE);
        assert!(Point::new(0.0, 0.0).normalize().is_zero());
    }

    #[test]
    fn test_dot_and_cross() {
        let p = Point::new(1.0, 0.0);
        let q = Point::new(0.0, 1.0);
        assert!((p.dot(q)).abs() < TOLERANCE);
        assert!((p.cross(q) - 1.0).abs() < TOLERANCE);
        assert!((q.cross(p) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_rotation() {
        let p = Point::new(1.0, 0.0);
        let rotated = p.rotate(std::f64::consts::FRAC_PI_2);
        assert!(rotated.distance_to(Point::new(0.0, 1.0)) < 1e-9);

        let around = Point::new(2.0, 0.0).rotate_around(Point::new(1.0, 0.0), std::f64::consts::PI);
        assert!(around.distance_to(Point::new(0.0, 0.0)) < 1e-9);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        // Projection inside the segment
        assert!((Point::new(5.0, 3.0).distance_to_segment(a, b) - 3.0).abs() < TOLERANCE);
        // Clamped to an endpoint
        assert!((Point::new(-4.0, 3.0).distance_to_segment(a, b) - 5.0).abs() < TOLERANCE);
        // Degenerate segment behaves as a point
        assert!((Point::new(3.0, 4.0).distance_to_segment(a, a) - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_distance_symmetry() {
        let p = Point::new(1.5, -2.5);
        let q = Point::new(-3.0, 4.0);
        assert!((p.distance_to(q) - q.distance_to(p)).abs() < 1e-8);
    }

    #[test]
    fn test_orientation() {
        let o = Point::new(0.0, 0.0);
        assert_eq!(
            orientation(o, Point::new(1.0, 0.0), Point::new(2.0, 1.0)),
            Orientation::CounterClockwise
        );
        assert_eq!(
            orientation(o, Point::new(1.0, 0.0), Point::new(2.0, -1.0)),
            Orientation::Clockwise
        );
        assert_eq!(
            orientation(o, Point::new(1.0, 0.0), Point::new(2.0, 0.0)),
            Orientation::Collinear
        );
        assert!(are_collinear(o, Point::new(1.0, 1.0), Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_angle_between_points() {
        let angle = angle_between_points(
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
        );
        assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }
}
