use super::point::grid_coordinate;
use crate::*;

/// Axis-aligned rectangle stored as minimum corner plus extents.
///
/// Zero width or height is legal (a point is a zero-area rectangle);
/// negative extents are not. Containment tests are inclusive of the
/// boundary while [`Rectangle::intersects`] is strict — touching edges do
/// not intersect. That asymmetry is a library-wide convention the spatial
/// indexes rely on.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rectangle {
    pub x: float,
    pub y: float,
    pub width: float,
    pub height: float,
}

impl Rectangle {
    /// Panics when either extent is negative.
    pub fn new(x: float, y: float, width: float, height: float) -> Self {
        assert!(
            width >= 0.0 && height >= 0.0,
            "rectangle dimensions must be non-negative"
        );
        Self { x, y, width, height }
    }

    /// Build from two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn from_center(center: Point, width: float, height: float) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn bounding_box_of_points(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Rectangle::default();
        };
        let (mut min_x, mut max_x) = (first.x, first.x);
        let (mut min_y, mut max_y) = (first.y, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        Rectangle::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn bounding_box_of_rectangles(rectangles: &[Rectangle]) -> Self {
        let Some(first) = rectangles.first() else {
            return Rectangle::default();
        };
        rectangles[1..]
            .iter()
            .fold(*first, |acc, r| acc.union_with(r))
    }

    pub fn left(&self) -> float {
        self.x
    }

    pub fn right(&self) -> float {
        self.x + self.width
    }

    pub fn bottom(&self) -> float {
        self.y
    }

    pub fn top(&self) -> float {
        self.y + self.height
    }

    pub fn area(&self) -> float {
        self.width * self.height
    }

    pub fn perimeter(&self) -> float {
        2.0 * (self.width + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners in counter-clockwise order starting at the minimum corner.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.top()),
            Point::new(self.x, self.top()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.width < TOLERANCE || self.height < TOLERANCE
    }

    pub fn is_valid(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    /// Inclusive of the boundary.
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.top()
    }

    /// Inclusive of the boundary.
    pub fn contains_rectangle(&self, other: &Rectangle) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.top() <= self.top()
    }

    /// Strict overlap test: rectangles that merely touch do not intersect.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(other.x >= self.right()
            || other.right() <= self.x
            || other.y >= self.top()
            || other.top() <= self.y)
    }

    /// Overlap region, or a degenerate rectangle at the origin when the
    /// rectangles are disjoint.
    pub fn intersection(&self, other: &Rectangle) -> Rectangle {
        if !self.intersects(other) {
            return Rectangle::default();
        }
        let left = self.x.max(other.x);
        let right = self.right().min(other.right());
        let bottom = self.y.max(other.y);
        let top = self.top().min(other.top());
        Rectangle::new(left, bottom, right - left, top - bottom)
    }

    pub fn union_with(&self, other: &Rectangle) -> Rectangle {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.x.min(other.x);
        let right = self.right().max(other.right());
        let bottom = self.y.min(other.y);
        let top = self.top().max(other.top());
        Rectangle::new(left, bottom, right - left, top - bottom)
    }

    /// Grow (or shrink, for negative margins) by the same amount on every
    /// side. Panics if a negative margin would invert the rectangle.
    pub fn expand(&self, margin: float) -> Rectangle {
        Rectangle::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Anisotropic expansion.
    pub fn expand_each(&self, left: float, right: float, bottom: float, top: float) -> Rectangle {
        Rectangle::new(
            self.x - left,
            self.y - bottom,
            self.width + left + right,
            self.height + bottom + top,
        )
    }

    pub fn translate(&self, offset: Point) -> Rectangle {
        Rectangle::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Uniform scale about the center.
    pub fn scale(&self, factor: float) -> Rectangle {
        self.scale_xy(factor, factor)
    }

    /// Anisotropic scale about the center.
    pub fn scale_xy(&self, x_factor: float, y_factor: float) -> Rectangle {
        let center = self.center();
        let new_width = self.width * x_factor;
        let new_height = self.height * y_factor;
        Rectangle::new(
            center.x - new_width / 2.0,
            center.y - new_height / 2.0,
            new_width,
            new_height,
        )
    }

    /// Zero when the point lies inside, otherwise the Euclidean distance
    /// to the nearest edge.
    pub fn distance_to_point(&self, point: Point) -> float {
        if self.contains_point(point) {
            return 0.0;
        }
        let dx = (self.x - point.x).max(point.x - self.right()).max(0.0);
        let dy = (self.y - point.y).max(point.y - self.top()).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    /// Zero when intersecting, otherwise the L2 distance between the
    /// per-axis gaps.
    pub fn distance_to(&self, other: &Rectangle) -> float {
        if self.intersects(other) {
            return 0.0;
        }
        let mut dx = 0.0;
        let mut dy = 0.0;
        if other.right() < self.x {
            dx = self.x - other.right();
        } else if other.x > self.right() {
            dx = other.x - self.right();
        }
        if other.top() < self.y {
            dy = self.y - other.top();
        } else if other.y > self.top() {
            dy = other.y - self.top();
        }
        (dx * dx + dy * dy).sqrt()
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon {
            vertices: self.corners().to_vec(),
        }
    }
}

impl PartialEq for Rectangle {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < TOLERANCE
            && (self.y - other.y).abs() < TOLERANCE
            && (self.width - other.width).abs() < TOLERANCE
            && (self.height - other.height).abs() < TOLERANCE
    }
}

impl Eq for Rectangle {}

impl Hash for Rectangle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        grid_coordinate(self.x).hash(state);
        grid_coordinate(self.y).hash(state);
        grid_coordinate(self.width).hash(state);
        grid_coordinate(self.height).hash(state);
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Rectangle(x={}, y={}, width={}, height={})",
            self.x, self.y, self.width, self.height
        )
    }
}
