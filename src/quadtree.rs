use crate::*;

/// Extracts the bounding box from a stored object. Shared across nodes and
/// across worker threads during parallel queries.
pub type BoundingBoxFn<T> = Arc<dyn Fn(&T) -> Rectangle + Send + Sync>;

pub const DEFAULT_CAPACITY: usize = 10;
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// One node of the quadtree. Children are ordered NW, NE, SW, SE.
#[derive(Clone)]
pub struct QuadTreeNode<T> {
    pub boundary: Rectangle,
    pub objects: Vec<T>,
    children: Option<Box<[QuadTreeNode<T>; 4]>>,
    capacity: usize,
    max_depth: usize,
    depth: usize,
}

impl<T: Clone> QuadTreeNode<T> {
    fn new(boundary: Rectangle, capacity: usize, max_depth: usize, depth: usize) -> Self {
        Self {
            boundary,
            objects: Vec::with_capacity(capacity),
            children: None,
            capacity,
            max_depth,
            depth,
        }
    }

    pub fn is_divided(&self) -> bool {
        self.children.is_some()
    }

    /// The boundary gate (bbox intersects the tree boundary) is applied by
    /// the caller; past it, insertion always succeeds somewhere in the
    /// subtree.
    ///
    /// A child only accepts an object whose bounding box it fully
    /// contains, so an object straddling the split lines stays anchored
    /// at the ancestor that first saw it. Query correctness depends on
    /// that anchoring: every stored bbox lies inside its node's boundary
    /// (or at the root), so any intersecting range query reaches it.
    fn insert(&mut self, object: T, bbox: &Rectangle) {
        if self.children.is_none() && self.objects.len() < self.capacity {
            self.objects.push(object);
            return;
        }

        if self.children.is_none() && self.depth < self.max_depth {
            self.subdivide();
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.boundary.contains_rectangle(bbox) {
                    child.insert(object, bbox);
                    return;
                }
            }
            // No child contains the bbox: it straddles the split lines
            self.objects.push(object);
        } else {
            // Depth limit reached
            self.objects.push(object);
        }
    }

    fn subdivide(&mut self) {
        let x = self.boundary.x;
        let y = self.boundary.y;
        let w = self.boundary.width / 2.0;
        let h = self.boundary.height / 2.0;
        let child = |bx, by| {
            QuadTreeNode::new(
                Rectangle::new(bx, by, w, h),
                self.capacity,
                self.max_depth,
                self.depth + 1,
            )
        };
        self.children = Some(Box::new([
            child(x, y + h),     // NW
            child(x + w, y + h), // NE
            child(x, y),         // SW
            child(x + w, y),     // SE
        ]));
    }

    fn query_range_into(&self, range: &Rectangle, get_bbox: &BoundingBoxFn<T>, out: &mut Vec<T>) {
        if !self.boundary.intersects(range) {
            return;
        }
        for object in &self.objects {
            if get_bbox(object).intersects(range) {
                out.push(object.clone());
            }
        }
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.query_range_into(range, get_bbox, out);
            }
        }
    }

    fn remove(&mut self, object: &T, bbox: &Rectangle) -> bool
    where
        T: PartialEq,
    {
        if !self.boundary.intersects(bbox) {
            return false;
        }
        if let Some(pos) = self.objects.iter().position(|o| o == object) {
            self.objects.remove(pos);
            return true;
        }
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.remove(object, bbox) {
                    return true;
                }
            }
        }
        false
    }

    pub fn size(&self) -> usize {
        let mut count = self.objects.len();
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                count += child.size();
            }
        }
        count
    }

    fn collect_all_into(&self, out: &mut Vec<T>) {
        out.extend(self.objects.iter().cloned());
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect_all_into(out);
            }
        }
    }
}

/// Statistics from a full recursive walk of the tree.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct QuadTreeStatistics {
    pub total_nodes: usize,
    pub leaf_nodes: usize,
    pub max_depth_reached: usize,
    pub total_objects: usize,
    pub average_objects_per_leaf: float,
    pub tree_efficiency: float,
}

/// Quadtree over objects with rectangular bounding boxes.
///
/// A node holds up to `capacity` objects before subdividing into four
/// equal quadrants; subdivision stops at `max_depth`. Objects whose
/// bounding boxes span multiple quadrants stay anchored at the ancestor
/// that first saw them.
#[derive(Clone)]
pub struct QuadTree<T> {
    root: QuadTreeNode<T>,
    get_bounding_box: BoundingBoxFn<T>,
    object_count: usize,
    capacity: usize,
    max_depth: usize,
}

impl<T: Clone> QuadTree<T> {
    pub fn new(
        boundary: Rectangle,
        get_bounding_box: BoundingBoxFn<T>,
        capacity: usize,
        max_depth: usize,
    ) -> Self {
        Self {
            root: QuadTreeNode::new(boundary, capacity, max_depth, 0),
            get_bounding_box,
            object_count: 0,
            capacity,
            max_depth,
        }
    }

    pub fn with_defaults(boundary: Rectangle, get_bounding_box: BoundingBoxFn<T>) -> Self {
        Self::new(boundary, get_bounding_box, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH)
    }

    /// Fails (returns false) only when the object's bounding box misses
    /// the tree boundary entirely.
    pub fn insert(&mut self, object: T) -> bool {
        let bbox = (self.get_bounding_box)(&object);
        if !self.root.boundary.intersects(&bbox) {
            return false;
        }
        self.root.insert(object, &bbox);
        self.object_count += 1;
        true
    }

    /// All objects whose bounding box intersects `range`, in unspecified
    /// order.
    pub fn query_range(&self, range: &Rectangle) -> Vec<T> {
        let mut result = Vec::new();
        self.query_range_into(range, &mut result);
        result
    }

    /// Allocation-free variant of [`QuadTree::query_range`] for callers
    /// recycling buffers.
    pub fn query_range_into(&self, range: &Rectangle, out: &mut Vec<T>) {
        self.root
            .query_range_into(range, &self.get_bounding_box, out);
    }

    /// Range query with a zero-area rectangle at `point`.
    pub fn query_point(&self, point: Point) -> Vec<T> {
        self.query_range(&Rectangle::new(point.x, point.y, 0.0, 0.0))
    }

    /// Objects whose bounding box lies within `distance` of the target's.
    pub fn query_nearby(&self, target: &T, distance: float) -> Vec<T> {
        let target_bbox = (self.get_bounding_box)(target);
        let search_area = target_bbox.expand(distance);
        self.query_range(&search_area)
            .into_iter()
            .filter(|candidate| {
                target_bbox.distance_to(&(self.get_bounding_box)(candidate)) <= distance
            })
            .collect()
    }

    /// Objects whose bounding-box center is within `radius` of `center`.
    pub fn query_circle(&self, center: Point, radius: float) -> Vec<T> {
        let search_area = Rectangle::from_center(center, radius * 2.0, radius * 2.0);
        self.query_range(&search_area)
            .into_iter()
            .filter(|candidate| {
                (self.get_bounding_box)(candidate).center().distance_to(center) <= radius
            })
            .collect()
    }

    /// The `k` objects nearest to `point` by bounding-box distance,
    /// closest first. Ties resolve by insertion encounter order, so the
    /// result is deterministic for a fixed tree.
    pub fn query_knn(&self, point: Point, k: usize) -> Vec<T> {
        enum Entry<'a, T> {
            Node(&'a QuadTreeNode<T>),
            Object(&'a T),
        }
        impl<T> Clone for Entry<'_, T> {
            fn clone(&self) -> Self {
                *self
            }
        }
        impl<T> Copy for Entry<'_, T> {}

        if k == 0 {
            return Vec::new();
        }

        // Best-first traversal: the frontier orders node and object
        // entries by distance, then by discovery order for ties.
        let mut entries: Vec<Entry<'_, T>> = vec![Entry::Node(&self.root)];
        let mut frontier: BinaryHeap<Reverse<(OrderedFloat<float>, usize)>> = BinaryHeap::new();
        frontier.push(Reverse((
            OrderedFloat(self.root.boundary.distance_to_point(point)),
            0,
        )));

        let mut result = Vec::with_capacity(k);
        while let Some(Reverse((_, idx))) = frontier.pop() {
            let entry = entries[idx];
            match entry {
                Entry::Node(node) => {
                    for object in &node.objects {
                        let d = (self.get_bounding_box)(object).distance_to_point(point);
                        entries.push(Entry::Object(object));
                        frontier.push(Reverse((OrderedFloat(d), entries.len() - 1)));
                    }
                    if let Some(children) = node.children.as_ref() {
                        for child in children.iter() {
                            let d = child.boundary.distance_to_point(point);
                            entries.push(Entry::Node(child));
                            frontier.push(Reverse((OrderedFloat(d), entries.len() - 1)));
                        }
                    }
                }
                Entry::Object(object) => {
                    result.push(object.clone());
                    if result.len() == k {
                        break;
                    }
                }
            }
        }
        result
    }

    /// All same-node pairs plus cross-subtree pairs with overlapping
    /// bounding boxes. Every pair whose boxes intersect appears at most
    /// once.
    pub fn find_potential_intersections(&self) -> Vec<(T, T)> {
        let mut pairs = Vec::new();
        self.collect_intersection_pairs(&self.root, &mut pairs);
        pairs
    }

    /// Potential pairs filtered through an exact collision predicate.
    pub fn find_intersections(&self, collision_fn: impl Fn(&T, &T) -> bool) -> Vec<(T, T)> {
        self.find_potential_intersections()
            .into_iter()
            .filter(|(a, b)| collision_fn(a, b))
            .collect()
    }

    fn collect_intersection_pairs(&self, node: &QuadTreeNode<T>, pairs: &mut Vec<(T, T)>) {
        // Pairs anchored at this node
        for i in 0..node.objects.len() {
            for j in (i + 1)..node.objects.len() {
                pairs.push((node.objects[i].clone(), node.objects[j].clone()));
            }
        }

        let Some(children) = node.children.as_ref() else {
            return;
        };
        for child in children.iter() {
            self.collect_intersection_pairs(child, pairs);
        }

        let subtree_objects: Vec<Vec<T>> = children
            .iter()
            .map(|child| {
                let mut objs = Vec::new();
                child.collect_all_into(&mut objs);
                objs
            })
            .collect();

        // This node's straddling objects against every descendant
        for obj in &node.objects {
            let bbox = (self.get_bounding_box)(obj);
            for subtree in &subtree_objects {
                for other in subtree {
                    if bbox.intersects(&(self.get_bounding_box)(other)) {
                        pairs.push((obj.clone(), other.clone()));
                    }
                }
            }
        }

        // Pairs spanning two different child subtrees
        for i in 0..4 {
            for j in (i + 1)..4 {
                for a in &subtree_objects[i] {
                    let bbox_a = (self.get_bounding_box)(a);
                    for b in &subtree_objects[j] {
                        if bbox_a.intersects(&(self.get_bounding_box)(b)) {
                            pairs.push((a.clone(), b.clone()));
                        }
                    }
                }
            }
        }
    }

    /// Linear removal under every node whose boundary intersects the
    /// object's bounding box. The tree is not rebalanced.
    pub fn remove(&mut self, object: &T) -> bool
    where
        T: PartialEq,
    {
        let bbox = (self.get_bounding_box)(object);
        if self.root.remove(object, &bbox) {
            self.object_count -= 1;
            true
        } else {
            false
        }
    }

    pub fn update(&mut self, old: &T, new: T) -> bool
    where
        T: PartialEq,
    {
        if self.remove(old) { self.insert(new) } else { false }
    }

    pub fn size(&self) -> usize {
        self.object_count
    }

    pub fn is_empty(&self) -> bool {
        self.object_count == 0
    }

    pub fn clear(&mut self) {
        self.root = QuadTreeNode::new(self.root.boundary, self.capacity, self.max_depth, 0);
        self.object_count = 0;
    }

    pub fn get_all_objects(&self) -> Vec<T> {
        let mut result = Vec::with_capacity(self.object_count);
        self.root.collect_all_into(&mut result);
        result
    }

    /// Rebuild with new parameters, re-inserting every object.
    pub fn rebuild(&mut self, new_capacity: usize, new_max_depth: usize) {
        let all_objects = self.get_all_objects();
        self.capacity = new_capacity;
        self.max_depth = new_max_depth;
        self.root = QuadTreeNode::new(self.root.boundary, new_capacity, new_max_depth, 0);
        self.object_count = 0;
        for object in all_objects {
            self.insert(object);
        }
    }

    pub fn boundary(&self) -> Rectangle {
        self.root.boundary
    }

    pub fn root(&self) -> &QuadTreeNode<T> {
        &self.root
    }

    pub fn get_statistics(&self) -> QuadTreeStatistics {
        let mut stats = QuadTreeStatistics::default();
        Self::statistics_recursive(&self.root, &mut stats);
        if stats.leaf_nodes > 0 {
            stats.average_objects_per_leaf = stats.total_objects as float / stats.leaf_nodes as float;
        }
        if stats.total_nodes > 0 {
            stats.tree_efficiency = stats.total_objects as float / stats.total_nodes as float;
        }
        stats
    }

    fn statistics_recursive(node: &QuadTreeNode<T>, stats: &mut QuadTreeStatistics) {
        stats.total_nodes += 1;
        stats.total_objects += node.objects.len();
        stats.max_depth_reached = stats.max_depth_reached.max(node.depth);
        match node.children.as_ref() {
            None => stats.leaf_nodes += 1,
            Some(children) => {
                for child in children.iter() {
                    Self::statistics_recursive(child, stats);
                }
            }
        }
    }
}

/// Quadtree over rectangles, each its own bounding box.
pub fn create_rectangle_quadtree(
    boundary: Rectangle,
    capacity: usize,
    max_depth: usize,
) -> QuadTree<Rectangle> {
    QuadTree::new(boundary, Arc::new(|r: &Rectangle| *r), capacity, max_depth)
}

/// Quadtree over points, stored as zero-area rectangles.
pub fn create_point_quadtree(
    boundary: Rectangle,
    capacity: usize,
    max_depth: usize,
) -> QuadTree<Point> {
    QuadTree::new(
        boundary,
        Arc::new(|p: &Point| Rectangle::new(p.x, p.y, 0.0, 0.0)),
        capacity,
        max_depth,
    )
}
