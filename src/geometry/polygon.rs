use crate::*;

/// Closed polygon over an ordered vertex ring. Edges run between
/// consecutive vertices and from the last vertex back to the first.
///
/// Construction through [`Polygon::new`] rejects rings with fewer than 3
/// vertices. Simplicity is never assumed; operations that need it say so.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(LayoutError::InvalidPolygon(vertices.len()));
        }
        Ok(Self { vertices })
    }

    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }

    pub fn edges(&self) -> Vec<(Point, Point)> {
        let n = self.vertices.len();
        if n < 2 {
            return Vec::new();
        }
        (0..n)
            .map(|i| (self.vertices[i], self.vertices[(i + 1) % n]))
            .collect()
    }

    /// Shoelace sum divided by two; positive for counter-clockwise rings.
    pub fn signed_area(&self) -> float {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            area += a.x * b.y - b.x * a.y;
        }
        area / 2.0
    }

    pub fn area(&self) -> float {
        self.signed_area().abs()
    }

    pub fn perimeter(&self) -> float {
        self.edges().iter().map(|(a, b)| a.distance_to(*b)).sum()
    }

    /// Area-weighted centroid; falls back to the vertex mean for
    /// degenerate (near-zero-area) rings.
    pub fn centroid(&self) -> Point {
        if self.vertices.is_empty() {
            return Point::default();
        }
        let signed = self.signed_area();
        if signed.abs() > TOLERANCE {
            let n = self.vertices.len();
            let mut cx = 0.0;
            let mut cy = 0.0;
            for i in 0..n {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                let w = a.x * b.y - b.x * a.y;
                cx += (a.x + b.x) * w;
                cy += (a.y + b.y) * w;
            }
            return Point::new(cx / (6.0 * signed), cy / (6.0 * signed));
        }
        let sum = self
            .vertices
            .iter()
            .fold(Point::default(), |acc, v| acc + *v);
        Point::new(sum.x / self.vertices.len() as float, sum.y / self.vertices.len() as float)
    }

    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::bounding_box_of_points(&self.vertices)
    }

    /// True when all consecutive cross products share a sign within
    /// tolerance.
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut sign_positive = false;
        let mut sign_negative = false;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            let cross = (b - a).cross(c - b);
            if cross > TOLERANCE {
                sign_positive = true;
            } else if cross < -TOLERANCE {
                sign_negative = true;
            }
            if sign_positive && sign_negative {
                return false;
            }
        }
        true
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Pairwise edge test over non-adjacent edges, O(n^2).
    pub fn has_self_intersections(&self) -> bool {
        let edge_list = self.edges();
        let n = edge_list.len();
        for i in 0..n {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    // Adjacent through the ring closure
                    continue;
                }
                let (a1, a2) = edge_list[i];
                let (b1, b2) = edge_list[j];
                if segments_intersect(a1, a2, b1, b2) {
                    return true;
                }
            }
        }
        false
    }

    pub fn is_simple(&self) -> bool {
        !self.has_self_intersections()
    }

    /// Ray-cast parity along +x. Boundary points have undefined parity;
    /// test them with [`Polygon::point_on_boundary`].
    pub fn contains_point(&self, point: Point) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if ((vi.y > point.y) != (vj.y > point.y))
                && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    pub fn point_on_boundary(&self, point: Point, tolerance: float) -> bool {
        self.edges()
            .iter()
            .any(|(a, b)| point.distance_to_segment(*a, *b) < tolerance)
    }

    /// Interior angle at `vertex_index` in degrees, reflex-aware: a vertex
    /// turning against the ring orientation reports the explement of the
    /// vector angle (e.g. 257 instead of 103 degrees). Degenerate adjacent
    /// edges yield 0.
    pub fn vertex_angle(&self, vertex_index: usize) -> float {
        let n = self.vertices.len();
        if n < 3 || vertex_index >= n {
            return 0.0;
        }
        let prev = self.vertices[(vertex_index + n - 1) % n];
        let vertex = self.vertices[vertex_index];
        let next = self.vertices[(vertex_index + 1) % n];

        let v1 = prev - vertex;
        let v2 = next - vertex;
        let mag1 = v1.magnitude();
        let mag2 = v2.magnitude();
        if mag1 < TOLERANCE || mag2 < TOLERANCE {
            return 0.0;
        }
        let base = clamp_cosine(v1.dot(v2) / (mag1 * mag2)).acos().to_degrees();

        let turn = (vertex - prev).cross(next - vertex);
        let reflex = if self.signed_area() >= 0.0 {
            turn < -TOLERANCE
        } else {
            turn > TOLERANCE
        };
        if reflex { 360.0 - base } else { base }
    }

    pub fn all_vertex_angles(&self) -> Vec<float> {
        (0..self.vertices.len())
            .map(|i| self.vertex_angle(i))
            .collect()
    }

    /// Indices of vertices whose interior angle falls below
    /// `threshold_degrees` or above `180 - threshold_degrees`; the upper
    /// band catches reflex near-straight cusps. Vertices with a degenerate
    /// adjacent edge are skipped.
    pub fn get_sharp_angles(&self, threshold_degrees: float) -> Vec<usize> {
        let n = self.vertices.len();
        if n < 3 {
            return Vec::new();
        }
        let mut sharp = Vec::new();
        for i in 0..n {
            let prev = self.vertices[(i + n - 1) % n];
            let vertex = self.vertices[i];
            let next = self.vertices[(i + 1) % n];
            if (prev - vertex).magnitude() < TOLERANCE || (next - vertex).magnitude() < TOLERANCE {
                continue;
            }
            let angle = self.vertex_angle(i);
            if angle < threshold_degrees || angle > 180.0 - threshold_degrees {
                sharp.push(i);
            }
        }
        sharp
    }

    /// Minimum over all edge pairs of segment-to-segment distance;
    /// touching polygons are at distance zero.
    pub fn distance_to(&self, other: &Polygon) -> float {
        let this_edges = self.edges();
        let other_edges = other.edges();
        let mut min_distance = float::MAX;
        for &(a1, a2) in &this_edges {
            for &(b1, b2) in &other_edges {
                let d = segment_to_segment_distance(a1, a2, b1, b2);
                min_distance = min_distance.min(d);
            }
        }
        min_distance
    }

    /// Zero for contained points, otherwise the minimum edge distance.
    pub fn distance_to_point(&self, point: Point) -> float {
        if self.vertices.is_empty() {
            return 0.0;
        }
        if self.contains_point(point) {
            return 0.0;
        }
        self.edges()
            .iter()
            .map(|(a, b)| OrderedFloat(point.distance_to_segment(*a, *b)))
            .min()
            .map(|d| d.0)
            .unwrap_or(0.0)
    }

    /// Minimum vertex distance to the segment `a -> b`.
    pub fn distance_to_segment(&self, a: Point, b: Point) -> float {
        self.vertices
            .iter()
            .map(|v| OrderedFloat(v.distance_to_segment(a, b)))
            .min()
            .map(|d| d.0)
            .unwrap_or(0.0)
    }

    /// Vertex closest to `point`.
    pub fn closest_point_to(&self, point: Point) -> Point {
        self.vertices
            .iter()
            .copied()
            .min_by_key(|v| OrderedFloat(v.distance_to(point)))
            .unwrap_or_default()
    }

    /// Edge pairs closer than `threshold_distance`, as
    /// `(point_on_self, point_on_other, distance)` triples where the two
    /// points are the actual closest pair on their edges.
    pub fn find_narrow_regions(
        &self,
        other: &Polygon,
        threshold_distance: float,
    ) -> Vec<(Point, Point, float)> {
        let this_edges = self.edges();
        let other_edges = other.edges();
        let mut narrow_regions = Vec::new();
        for &(a1, a2) in &this_edges {
            for &(b1, b2) in &other_edges {
                let (p1, p2, d) = closest_points_between_segments(a1, a2, b1, b2);
                if d < threshold_distance {
                    narrow_regions.push((p1, p2, d));
                }
            }
        }
        narrow_regions
    }

    /// True when any edge pair intersects or a vertex of either polygon
    /// lies inside the other. The vertex test catches full containment
    /// with no edge crossings, and collinear-overlapping edges that the
    /// parametric test treats as parallel.
    pub fn intersects(&self, other: &Polygon) -> bool {
        let this_edges = self.edges();
        let other_edges = other.edges();
        for &(a1, a2) in &this_edges {
            for &(b1, b2) in &other_edges {
                if segments_intersect(a1, a2, b1, b2) {
                    return true;
                }
            }
        }
        self.vertices.iter().any(|v| other.contains_point(*v))
            || other.vertices.iter().any(|v| self.contains_point(*v))
    }

    /// Edge-pair intersection points, deduplicated by tolerance equality.
    /// Order is unspecified.
    pub fn intersection_points(&self, other: &Polygon) -> Vec<Point> {
        let this_edges = self.edges();
        let other_edges = other.edges();
        let mut intersections: Vec<Point> = Vec::new();
        for &(a1, a2) in &this_edges {
            for &(b1, b2) in &other_edges {
                if let Some(p) = line_segment_intersection(a1, a2, b1, b2) {
                    if !intersections.contains(&p) {
                        intersections.push(p);
                    }
                }
            }
        }
        intersections
    }

    pub fn add_vertex(&mut self, vertex: Point) {
        self.vertices.push(vertex);
    }

    /// Panics if `index > len`, as slice insertion does.
    pub fn insert_vertex(&mut self, index: usize, vertex: Point) {
        self.vertices.insert(index, vertex);
    }

    /// Fails when removal would leave fewer than 3 vertices.
    pub fn remove_vertex(&mut self, index: usize) -> Result<()> {
        if self.vertices.len() <= 3 {
            return Err(LayoutError::InvalidPolygon(self.vertices.len() - 1));
        }
        self.vertices.remove(index);
        Ok(())
    }
}

impl Eq for Polygon {}

impl Hash for Polygon {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for v in &self.vertices {
            v.hash(state);
        }
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Polygon[")?;
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

/// Parametric intersection of two segments. Segments with a near-zero
/// denominator are treated as parallel and never intersect, even when
/// collinear-overlapping; containment-style tests compensate through
/// [`Polygon::intersects`]. Parameters are accepted within
/// `[-SEGMENT_TOLERANCE, 1 + SEGMENT_TOLERANCE]` to absorb round-off at
/// shared endpoints.
pub fn line_segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let denom = (a1.x - a2.x) * (b1.y - b2.y) - (a1.y - a2.y) * (b1.x - b2.x);
    if denom.abs() < TOLERANCE {
        return None;
    }
    let t = ((a1.x - b1.x) * (b1.y - b2.y) - (a1.y - b1.y) * (b1.x - b2.x)) / denom;
    let u = -((a1.x - a2.x) * (a1.y - b1.y) - (a1.y - a2.y) * (a1.x - b1.x)) / denom;

    let lo = -SEGMENT_TOLERANCE;
    let hi = 1.0 + SEGMENT_TOLERANCE;
    if t >= lo && t <= hi && u >= lo && u <= hi {
        Some(Point::new(a1.x + t * (a2.x - a1.x), a1.y + t * (a2.y - a1.y)))
    } else {
        None
    }
}

pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    line_segment_intersection(a1, a2, b1, b2).is_some()
}

/// Closest pair between two segments as `(on_a, on_b, distance)`. For
/// crossing segments both points are the crossing itself and the distance
/// is zero; otherwise the minimum is attained at an endpoint projection.
pub fn closest_points_between_segments(
    a1: Point,
    a2: Point,
    b1: Point,
    b2: Point,
) -> (Point, Point, float) {
    if let Some(p) = line_segment_intersection(a1, a2, b1, b2) {
        return (p, p, 0.0);
    }
    let candidates = [
        (a1, a1.project_onto_segment(b1, b2)),
        (a2, a2.project_onto_segment(b1, b2)),
        (b1.project_onto_segment(a1, a2), b1),
        (b2.project_onto_segment(a1, a2), b2),
    ];
    let mut best = candidates[0];
    let mut best_distance = best.0.distance_to(best.1);
    for &(p, q) in &candidates[1..] {
        let d = p.distance_to(q);
        if d < best_distance {
            best = (p, q);
            best_distance = d;
        }
    }
    (best.0, best.1, best_distance)
}

pub fn segment_to_segment_distance(a1: Point, a2: Point, b1: Point, b2: Point) -> float {
    closest_points_between_segments(a1, a2, b1, b2).2
}
