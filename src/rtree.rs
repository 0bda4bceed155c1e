use crate::*;

pub const MAX_ENTRIES: usize = 16;
pub const MIN_ENTRIES: usize = 4;

/// R-tree node: a leaf holds `(object, bbox)` entries, an internal node
/// holds children, and both carry the minimum bounding rectangle of their
/// contents.
#[derive(Clone)]
struct RTreeNode<T> {
    mbr: Rectangle,
    entries: SmallVec<[(T, Rectangle); MAX_ENTRIES]>,
    children: Vec<Box<RTreeNode<T>>>,
    is_leaf: bool,
}

impl<T: Clone> RTreeNode<T> {
    fn new(is_leaf: bool) -> Self {
        Self {
            mbr: Rectangle::default(),
            entries: SmallVec::new(),
            children: Vec::new(),
            is_leaf,
        }
    }

    fn is_full(&self) -> bool {
        if self.is_leaf {
            self.entries.len() >= MAX_ENTRIES
        } else {
            self.children.len() >= MAX_ENTRIES
        }
    }

    fn update_mbr(&mut self) {
        self.mbr = if self.is_leaf {
            let boxes: Vec<Rectangle> = self.entries.iter().map(|(_, b)| *b).collect();
            Rectangle::bounding_box_of_rectangles(&boxes)
        } else {
            let boxes: Vec<Rectangle> = self.children.iter().map(|c| c.mbr).collect();
            Rectangle::bounding_box_of_rectangles(&boxes)
        };
    }

    /// Midpoint split: the second half of the entries (by insertion
    /// order) moves into a fresh sibling. Deliberately naive; query
    /// performance degrades under adversarial insertion order, which the
    /// bulk-load path avoids by Z-order presorting.
    fn split(&mut self) -> Box<RTreeNode<T>> {
        let mut sibling = RTreeNode::new(self.is_leaf);
        if self.is_leaf {
            let mid = self.entries.len() / 2;
            sibling.entries = self.entries.drain(mid..).collect();
        } else {
            let mid = self.children.len() / 2;
            sibling.children = self.children.drain(mid..).collect();
        }
        self.update_mbr();
        sibling.update_mbr();
        Box::new(sibling)
    }

    fn area_increase(&self, bbox: &Rectangle) -> float {
        self.mbr.union_with(bbox).area() - self.mbr.area()
    }

    /// Child index with the least MBR-area increase, ties broken by the
    /// smaller current area.
    fn best_child(&self, bbox: &Rectangle) -> usize {
        let mut best = 0;
        let mut best_key = (float::MAX, float::MAX);
        for (i, child) in self.children.iter().enumerate() {
            let key = (child.area_increase(bbox), child.mbr.area());
            if key < best_key {
                best_key = key;
                best = i;
            }
        }
        best
    }

    fn insert_recursive(&mut self, object: T, bbox: Rectangle) {
        if self.is_leaf {
            self.entries.push((object, bbox));
            self.update_mbr();
            return;
        }

        let mut best = self.best_child(&bbox);
        if self.children[best].is_full() {
            let sibling = self.children[best].split();
            self.children.push(sibling);
            best = self.best_child(&bbox);
        }
        self.children[best].insert_recursive(object, bbox);
        self.update_mbr();
    }

    fn query_recursive(&self, range: &Rectangle, result: &mut Vec<T>) {
        if !self.mbr.intersects(range) {
            return;
        }
        if self.is_leaf {
            for (object, bbox) in &self.entries {
                if bbox.intersects(range) {
                    result.push(object.clone());
                }
            }
        } else {
            for child in &self.children {
                child.query_recursive(range, result);
            }
        }
    }

    fn collect_entries(&self, out: &mut Vec<(T, Rectangle)>) {
        if self.is_leaf {
            out.extend(self.entries.iter().cloned());
        } else {
            for child in &self.children {
                child.collect_entries(out);
            }
        }
    }
}

/// R-tree over `(object, bounding box)` entries with M = 16 / m = 4 node
/// fan-out. Insertion descends by least MBR-area increase; full nodes use
/// the midpoint split. Removal is not implemented — callers shrink by
/// re-bulk-loading.
#[derive(Clone)]
pub struct RTree<T> {
    root: RTreeNode<T>,
    object_count: usize,
}

impl<T: Clone> Default for RTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> RTree<T> {
    pub fn new() -> Self {
        Self {
            root: RTreeNode::new(true),
            object_count: 0,
        }
    }

    pub fn insert(&mut self, object: T, bbox: Rectangle) {
        if self.root.is_full() {
            // Grow the tree: the old root becomes a child of a fresh
            // internal root and splits into two siblings.
            let old_root = std::mem::replace(&mut self.root, RTreeNode::new(false));
            self.root.children.push(Box::new(old_root));
            let sibling = self.root.children[0].split();
            self.root.children.push(sibling);
            self.root.update_mbr();
        }
        self.root.insert_recursive(object, bbox);
        self.object_count += 1;
    }

    /// MBR-pruned range query; objects whose stored bbox strictly
    /// intersects `range`, in unspecified order.
    pub fn query_range(&self, range: &Rectangle) -> Vec<T> {
        let mut result = Vec::new();
        self.root.query_recursive(range, &mut result);
        result
    }

    /// Allocation-free variant of [`RTree::query_range`].
    pub fn query_range_into(&self, range: &Rectangle, out: &mut Vec<T>) {
        self.root.query_recursive(range, out);
    }

    /// Range query with a zero-area rectangle at `point`.
    pub fn query_point(&self, point: Point) -> Vec<T> {
        self.query_range(&Rectangle::new(point.x, point.y, 0.0, 0.0))
    }

    /// Not implemented: always returns false. The index shrinks by
    /// re-bulk-loading instead.
    pub fn remove(&mut self, _object: &T, _bbox: &Rectangle) -> bool {
        false
    }

    pub fn size(&self) -> usize {
        self.object_count
    }

    pub fn is_empty(&self) -> bool {
        self.object_count == 0
    }

    pub fn clear(&mut self) {
        self.root = RTreeNode::new(true);
        self.object_count = 0;
    }

    /// Every stored entry, in unspecified order.
    pub fn all_entries(&self) -> Vec<(T, Rectangle)> {
        let mut out = Vec::with_capacity(self.object_count);
        self.root.collect_entries(&mut out);
        out
    }

    pub fn mbr(&self) -> Rectangle {
        self.root.mbr
    }
}
