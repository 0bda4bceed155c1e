use crate::*;

/// Default leaf-block threshold before [`HierarchicalSpatialIndex::optimize_hierarchy`]
/// starts splitting quadrants.
pub const DEFAULT_MAX_OBJECTS_PER_BLOCK: usize = 1_000_000;
pub const DEFAULT_MAX_HIERARCHY_LEVELS: usize = 8;

/// Per-block leaf quadtree parameters.
const BLOCK_INDEX_CAPACITY: usize = 100;
const BLOCK_INDEX_MAX_DEPTH: usize = 8;

/// Anything storable in the hierarchical index: cloneable across worker
/// threads and hashable by identity so parallel query results can be
/// deduplicated.
pub trait SpatialObject: Clone + PartialEq + Eq + Hash + Send + Sync {
    fn bounding_box(&self) -> Rectangle;
}

impl SpatialObject for Rectangle {
    fn bounding_box(&self) -> Rectangle {
        *self
    }
}

impl SpatialObject for Point {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(self.x, self.y, 0.0, 0.0)
    }
}

impl SpatialObject for Polygon {
    fn bounding_box(&self) -> Rectangle {
        Polygon::bounding_box(self)
    }
}

pub type BlockId = usize;

/// The arena index of the root block; it exists from construction.
pub const ROOT_BLOCK: BlockId = 0;

/// Named rectangular design block. Blocks form a tree held in an arena,
/// linked by indices rather than owning parent pointers; they are never
/// re-parented.
#[derive(Debug, Clone)]
pub struct IPBlock {
    pub name: String,
    pub boundary: Rectangle,
    pub level: usize,
    pub parent: Option<BlockId>,
    pub sub_blocks: Vec<BlockId>,
}

impl IPBlock {
    pub fn contains_rectangle(&self, rect: &Rectangle) -> bool {
        self.boundary.contains_rectangle(rect)
    }

    pub fn intersects(&self, rect: &Rectangle) -> bool {
        self.boundary.intersects(rect)
    }
}

/// Which leaf index a block builds when it first receives objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafIndexKind {
    #[default]
    QuadTree,
    RTree,
}

enum LeafIndex<T> {
    Quad(QuadTree<T>),
    Rtree(RTree<T>),
}

impl<T: SpatialObject> LeafIndex<T> {
    fn new(kind: LeafIndexKind, boundary: Rectangle) -> Self {
        match kind {
            LeafIndexKind::QuadTree => LeafIndex::Quad(QuadTree::new(
                boundary,
                Arc::new(|object: &T| object.bounding_box()),
                BLOCK_INDEX_CAPACITY,
                BLOCK_INDEX_MAX_DEPTH,
            )),
            LeafIndexKind::RTree => LeafIndex::Rtree(RTree::new()),
        }
    }

    fn insert(&mut self, object: T) -> bool {
        match self {
            LeafIndex::Quad(tree) => tree.insert(object),
            LeafIndex::Rtree(tree) => {
                let bbox = object.bounding_box();
                tree.insert(object, bbox);
                true
            }
        }
    }

    fn query_range_into(&self, range: &Rectangle, out: &mut Vec<T>) {
        match self {
            LeafIndex::Quad(tree) => tree.query_range_into(range, out),
            LeafIndex::Rtree(tree) => tree.query_range_into(range, out),
        }
    }

    fn find_potential_intersections(&self) -> Vec<(T, T)> {
        match self {
            LeafIndex::Quad(tree) => tree.find_potential_intersections(),
            LeafIndex::Rtree(tree) => {
                // No tree-assisted enumeration for the R-tree leaf:
                // filter all entry pairs by bounding-box overlap.
                let entries = tree.all_entries();
                let mut pairs = Vec::new();
                for i in 0..entries.len() {
                    for j in (i + 1)..entries.len() {
                        if entries[i].1.intersects(&entries[j].1) {
                            pairs.push((entries[i].0.clone(), entries[j].0.clone()));
                        }
                    }
                }
                pairs
            }
        }
    }
}

/// Mutable per-block state: the leaf index plus the ids of the objects
/// this block owns. Each store sits behind its own mutex, so concurrent
/// inserts into different blocks never contend.
struct BlockStore<T> {
    index: LeafIndex<T>,
    object_ids: Vec<usize>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct HierarchyStatistics {
    pub total_objects: usize,
    pub total_blocks: usize,
    pub max_depth: usize,
    pub avg_objects_per_block: float,
    pub memory_usage_mb: float,
}

/// Hierarchical spatial index: a tree of named rectangular blocks, each
/// owning one leaf index over the objects whose bounding boxes it
/// contains. Bulk loading presorts by Z-order for locality; queries fan
/// out across blocks on the rayon pool and deduplicate by object
/// identity.
///
/// The block tree itself is immutable while queries run —
/// [`HierarchicalSpatialIndex::create_ip_block`] takes `&mut self` — and
/// every leaf index is guarded by its own lock, so parallel bulk inserts
/// only contend when two chunks hit the same block.
pub struct HierarchicalSpatialIndex<T: SpatialObject> {
    world_bounds: Rectangle,
    max_objects_per_block: usize,
    max_hierarchy_levels: usize,
    leaf_kind: LeafIndexKind,
    blocks: Vec<IPBlock>,
    block_names: Dict<String, BlockId>,
    stores: RwLock<Dict<BlockId, Arc<Mutex<BlockStore<T>>>>>,
    next_object_id: AtomicUsize,
    query_buffers: MemoryPool<Vec<T>>,
}

impl<T: SpatialObject> HierarchicalSpatialIndex<T> {
    pub fn new(
        world_bounds: Rectangle,
        max_objects_per_block: usize,
        max_hierarchy_levels: usize,
    ) -> Self {
        let root = IPBlock {
            name: "root".to_string(),
            boundary: world_bounds,
            level: 0,
            parent: None,
            sub_blocks: Vec::new(),
        };
        let mut block_names = Dict::new();
        block_names.insert("root".to_string(), ROOT_BLOCK);
        Self {
            world_bounds,
            max_objects_per_block,
            max_hierarchy_levels,
            leaf_kind: LeafIndexKind::default(),
            blocks: vec![root],
            block_names,
            stores: RwLock::new(Dict::new()),
            next_object_id: AtomicUsize::new(0),
            query_buffers: MemoryPool::new(rayon::current_num_threads() * 2),
        }
    }

    /// Same as [`HierarchicalSpatialIndex::new`] but with R-tree leaves.
    pub fn with_leaf_kind(
        world_bounds: Rectangle,
        max_objects_per_block: usize,
        max_hierarchy_levels: usize,
        leaf_kind: LeafIndexKind,
    ) -> Self {
        let mut index = Self::new(world_bounds, max_objects_per_block, max_hierarchy_levels);
        index.leaf_kind = leaf_kind;
        index
    }

    pub fn world_bounds(&self) -> Rectangle {
        self.world_bounds
    }

    pub fn max_objects_per_block(&self) -> usize {
        self.max_objects_per_block
    }

    pub fn max_hierarchy_levels(&self) -> usize {
        self.max_hierarchy_levels
    }

    /// Attach a new block under `parent_name`. A boundary reaching
    /// outside the parent is accepted with a logged warning.
    pub fn create_ip_block(
        &mut self,
        name: &str,
        boundary: Rectangle,
        parent_name: &str,
    ) -> Result<BlockId> {
        let parent_id = *self
            .block_names
            .get(parent_name)
            .ok_or_else(|| LayoutError::BlockNotFound(parent_name.to_string()))?;
        if self.block_names.contains_key(name) {
            return Err(LayoutError::DuplicateBlockName(name.to_string()));
        }
        if !self.blocks[parent_id].boundary.contains_rectangle(&boundary) {
            warn!(
                "block '{name}' boundary {boundary} extends outside parent '{parent_name}'"
            );
        }
        Ok(self.add_block(name, boundary, parent_id))
    }

    fn add_block(&mut self, name: &str, boundary: Rectangle, parent_id: BlockId) -> BlockId {
        let id = self.blocks.len();
        self.blocks.push(IPBlock {
            name: name.to_string(),
            boundary,
            level: self.blocks[parent_id].level + 1,
            parent: Some(parent_id),
            sub_blocks: Vec::new(),
        });
        self.blocks[parent_id].sub_blocks.push(id);
        self.block_names.insert(name.to_string(), id);
        id
    }

    pub fn find_block(&self, name: &str) -> Option<&IPBlock> {
        self.block_names.get(name).map(|&id| &self.blocks[id])
    }

    pub fn block(&self, id: BlockId) -> &IPBlock {
        &self.blocks[id]
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Ids of the objects owned by the named block.
    pub fn block_object_ids(&self, name: &str) -> Result<Vec<usize>> {
        let id = *self
            .block_names
            .get(name)
            .ok_or_else(|| LayoutError::BlockNotFound(name.to_string()))?;
        let stores = self.stores.read().expect("store map lock poisoned");
        Ok(stores
            .get(&id)
            .map(|store| store.lock().expect("block store lock poisoned").object_ids.clone())
            .unwrap_or_default())
    }

    /// Smallest block (by area) whose boundary contains `bbox`; ties go
    /// to the deeper block, then lexicographically by name so placement
    /// is deterministic. Falls back to the root.
    fn target_block(&self, bbox: &Rectangle) -> BlockId {
        (0..self.blocks.len())
            .filter(|&id| self.blocks[id].boundary.contains_rectangle(bbox))
            .min_by_key(|&id| {
                let block = &self.blocks[id];
                (
                    OrderedFloat(block.boundary.area()),
                    Reverse(block.level),
                    block.name.as_str(),
                )
            })
            .unwrap_or(ROOT_BLOCK)
    }

    /// Leaf store for a block, lazily created on first use.
    fn store(&self, block_id: BlockId) -> Arc<Mutex<BlockStore<T>>> {
        if let Some(store) = self
            .stores
            .read()
            .expect("store map lock poisoned")
            .get(&block_id)
        {
            return Arc::clone(store);
        }
        let mut stores = self.stores.write().expect("store map lock poisoned");
        Arc::clone(stores.entry(block_id).or_insert_with(|| {
            Arc::new(Mutex::new(BlockStore {
                index: LeafIndex::new(self.leaf_kind, self.blocks[block_id].boundary),
                object_ids: Vec::new(),
            }))
        }))
    }

    /// Z-order-sorted insertion. Objects land in the smallest block
    /// containing their bounding box; objects contained by no block (or
    /// outside the world entirely) fall back to the root, where an
    /// out-of-world bounding box is rejected.
    pub fn bulk_insert(&self, objects: Vec<T>) {
        let _tmr = timer!(logging_timer::Level::Debug; "bulk_insert");
        let mut objects = objects;
        objects.sort_by_key(|object| {
            zorder::encode_point(object.bounding_box().center(), &self.world_bounds)
        });
        for object in objects {
            let bbox = object.bounding_box();
            let block_id = self.target_block(&bbox);
            let store = self.store(block_id);
            let mut store = store.lock().expect("block store lock poisoned");
            if store.index.insert(object) {
                let id = self.next_object_id.fetch_add(1, Ordering::Relaxed);
                store.object_ids.push(id);
            }
        }
    }

    /// Chunked [`HierarchicalSpatialIndex::bulk_insert`] across the rayon
    /// pool, one chunk per worker. The stored set is the union of the
    /// chunks; sibling order inside the trees is not deterministic.
    pub fn parallel_bulk_insert(&self, objects: Vec<T>) {
        let _tmr = timer!(logging_timer::Level::Debug; "parallel_bulk_insert");
        if objects.is_empty() {
            return;
        }
        let chunk_size = objects.len().div_ceil(rayon::current_num_threads().max(1));
        let chunks: Vec<Vec<T>> = objects
            .into_iter()
            .chunks(chunk_size)
            .into_iter()
            .map(Iterator::collect)
            .collect();
        chunks
            .into_par_iter()
            .for_each(|chunk| self.bulk_insert(chunk));
    }

    /// Fan out the range query to every block whose boundary intersects
    /// `range`, join the per-block results, and deduplicate by object
    /// identity (an object anchored in an ancestor block would otherwise
    /// surface once per overlapping descendant query).
    pub fn parallel_query_range(&self, range: &Rectangle) -> Vec<T> {
        let stores: Vec<Arc<Mutex<BlockStore<T>>>> = {
            let map = self.stores.read().expect("store map lock poisoned");
            map.iter()
                .filter(|&(id, _)| self.blocks[*id].boundary.intersects(range))
                .map(|(_, store)| Arc::clone(store))
                .collect()
        };

        let buffers: Vec<Vec<T>> = stores
            .par_iter()
            .map(|store| {
                let mut buffer = self.query_buffers.acquire();
                store
                    .lock()
                    .expect("block store lock poisoned")
                    .index
                    .query_range_into(range, &mut buffer);
                buffer
            })
            .collect();

        let mut seen: Set<T> = Set::new();
        let mut result = Vec::new();
        for mut buffer in buffers {
            for object in buffer.drain(..) {
                if seen.insert(object.clone()) {
                    result.push(object);
                }
            }
            self.query_buffers.release(buffer);
        }
        result
    }

    /// Per-block potential-intersection enumeration, in parallel.
    /// Cross-block pairs are the caller's responsibility: block
    /// boundaries normally follow the design hierarchy, which disallows
    /// cross-hierarchy geometry.
    pub fn parallel_find_intersections(&self) -> Vec<(T, T)> {
        let stores: Vec<Arc<Mutex<BlockStore<T>>>> = self
            .stores
            .read()
            .expect("store map lock poisoned")
            .values()
            .cloned()
            .collect();
        stores
            .par_iter()
            .map(|store| {
                store
                    .lock()
                    .expect("block store lock poisoned")
                    .index
                    .find_potential_intersections()
            })
            .reduce(Vec::new, |mut acc, mut pairs| {
                acc.append(&mut pairs);
                acc
            })
    }

    /// Recursively split overfull blocks into four equal quadrants
    /// (`<name>_q0` through `<name>_q3`, NW, NE, SW, SE), stopping at the
    /// hierarchy level cap. Already-stored objects stay where they are;
    /// later inserts land in the new, smaller blocks.
    pub fn optimize_hierarchy(&mut self) {
        let mut i = 0;
        while i < self.blocks.len() {
            let overfull = {
                let stores = self.stores.read().expect("store map lock poisoned");
                stores.get(&i).is_some_and(|store| {
                    store.lock().expect("block store lock poisoned").object_ids.len()
                        > self.max_objects_per_block
                })
            };
            if overfull && self.blocks[i].level < self.max_hierarchy_levels {
                let boundary = self.blocks[i].boundary;
                let name = self.blocks[i].name.clone();
                let w = boundary.width / 2.0;
                let h = boundary.height / 2.0;
                let quadrants = [
                    Rectangle::new(boundary.x, boundary.y + h, w, h),
                    Rectangle::new(boundary.x + w, boundary.y + h, w, h),
                    Rectangle::new(boundary.x, boundary.y, w, h),
                    Rectangle::new(boundary.x + w, boundary.y, w, h),
                ];
                for (q, quadrant) in quadrants.into_iter().enumerate() {
                    let sub_name = format!("{name}_q{q}");
                    if self.block_names.contains_key(&sub_name) {
                        debug!("quadrant block '{sub_name}' already exists, skipping");
                        continue;
                    }
                    self.add_block(&sub_name, quadrant, i);
                }
            }
            i += 1;
        }
    }

    pub fn get_statistics(&self) -> HierarchyStatistics {
        let mut stats = HierarchyStatistics {
            total_blocks: self.blocks.len(),
            ..Default::default()
        };
        for block in &self.blocks {
            stats.max_depth = stats.max_depth.max(block.level);
        }
        {
            let stores = self.stores.read().expect("store map lock poisoned");
            for store in stores.values() {
                stats.total_objects += store
                    .lock()
                    .expect("block store lock poisoned")
                    .object_ids
                    .len();
            }
        }
        if stats.total_blocks > 0 {
            stats.avg_objects_per_block = stats.total_objects as float / stats.total_blocks as float;
        }
        stats.memory_usage_mb = (stats.total_objects * size_of::<T>()
            + stats.total_blocks * size_of::<IPBlock>()) as float
            / (1024.0 * 1024.0);
        stats
    }
}

/// Chooses hierarchy parameters from the expected population scale.
pub struct SpatialIndexFactory;

impl SpatialIndexFactory {
    pub fn create_optimized_index<T: SpatialObject>(
        world_bounds: Rectangle,
        expected_object_count: usize,
    ) -> HierarchicalSpatialIndex<T> {
        let (max_objects_per_block, max_hierarchy_levels) = if expected_object_count > 100_000_000
        {
            (10_000_000, 12)
        } else if expected_object_count > 10_000_000 {
            (1_000_000, 10)
        } else {
            (DEFAULT_MAX_OBJECTS_PER_BLOCK, DEFAULT_MAX_HIERARCHY_LEVELS)
        };
        HierarchicalSpatialIndex::new(world_bounds, max_objects_per_block, max_hierarchy_levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Rectangle {
        Rectangle::new(0.0, 0.0, 100.0, 100.0)
    }

    fn index() -> HierarchicalSpatialIndex<Rectangle> {
        HierarchicalSpatialIndex::new(world(), 10, 4)
    }

    #[test]
    fn test_block_creation_and_errors() {
        let mut idx = index();
        assert_eq!(idx.block(ROOT_BLOCK).name, "root");
        assert_eq!(idx.block(ROOT_BLOCK).level, 0);
        assert_eq!(idx.block(ROOT_BLOCK).boundary, world());

        let cpu = idx
            .create_ip_block("cpu", Rectangle::new(0.0, 0.0, 50.0, 50.0), "root")
            .unwrap();
        assert_eq!(idx.block(cpu).level, 1);
        assert_eq!(idx.block(cpu).parent, Some(ROOT_BLOCK));
        assert!(idx.block(ROOT_BLOCK).sub_blocks.contains(&cpu));

        idx.create_ip_block("alu", Rectangle::new(5.0, 5.0, 10.0, 10.0), "cpu")
            .unwrap();
        assert_eq!(idx.find_block("alu").unwrap().level, 2);

        assert_eq!(
            idx.create_ip_block("x", world(), "nonexistent"),
            Err(LayoutError::BlockNotFound("nonexistent".to_string()))
        );
        assert_eq!(
            idx.create_ip_block("cpu", Rectangle::new(0.0, 0.0, 1.0, 1.0), "root"),
            Err(LayoutError::DuplicateBlockName("cpu".to_string()))
        );

        // Out-of-parent boundary is accepted with a warning
        assert!(idx
            .create_ip_block("spill", Rectangle::new(90.0, 90.0, 20.0, 20.0), "root")
            .is_ok());
    }

    #[test]
    fn test_bulk_insert_targets_smallest_containing_block() {
        let mut idx = index();
        idx.create_ip_block("left", Rectangle::new(0.0, 0.0, 50.0, 100.0), "root")
            .unwrap();
        idx.create_ip_block("left_inner", Rectangle::new(10.0, 10.0, 20.0, 20.0), "left")
            .unwrap();

        idx.bulk_insert(vec![
            Rectangle::new(12.0, 12.0, 4.0, 4.0),  // fits left_inner
            Rectangle::new(5.0, 60.0, 10.0, 10.0), // fits left only
            Rectangle::new(45.0, 45.0, 20.0, 20.0), // straddles: root
        ]);

        assert_eq!(idx.block_object_ids("left_inner").unwrap().len(), 1);
        assert_eq!(idx.block_object_ids("left").unwrap().len(), 1);
        assert_eq!(idx.block_object_ids("root").unwrap().len(), 1);
        assert_eq!(
            idx.block_object_ids("missing"),
            Err(LayoutError::BlockNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_parallel_query_deduplicates() {
        let mut idx = index();
        idx.create_ip_block("left", Rectangle::new(0.0, 0.0, 50.0, 100.0), "root")
            .unwrap();
        idx.create_ip_block("right", Rectangle::new(50.0, 0.0, 50.0, 100.0), "root")
            .unwrap();

        let straddler = Rectangle::new(40.0, 40.0, 20.0, 20.0);
        let in_left = Rectangle::new(10.0, 45.0, 5.0, 5.0);
        let in_right = Rectangle::new(80.0, 45.0, 5.0, 5.0);
        idx.bulk_insert(vec![straddler, in_left, in_right]);

        // The query range touches all three blocks
        let result = idx.parallel_query_range(&Rectangle::new(0.0, 42.0, 100.0, 10.0));
        assert_eq!(result.len(), 3);
        assert_eq!(result.iter().filter(|r| **r == straddler).count(), 1);
    }

    #[test]
    fn test_parallel_insert_no_loss_no_duplicates() {
        let idx = HierarchicalSpatialIndex::new(world(), 1_000_000, 8);
        let objects: Vec<Rectangle> = (0..50)
            .flat_map(|i| {
                (0..50).map(move |j| {
                    Rectangle::new(i as float * 2.0, j as float * 2.0, 0.5, 0.5)
                })
            })
            .collect();
        idx.parallel_bulk_insert(objects.clone());

        let result = idx.parallel_query_range(&world());
        assert_eq!(result.len(), objects.len());
        let unique: Set<Rectangle> = result.iter().copied().collect();
        assert_eq!(unique.len(), objects.len());
    }

    #[test]
    fn test_rtree_leaf_kind() {
        let idx: HierarchicalSpatialIndex<Rectangle> =
            HierarchicalSpatialIndex::with_leaf_kind(world(), 10, 4, LeafIndexKind::RTree);
        idx.bulk_insert(vec![
            Rectangle::new(10.0, 10.0, 5.0, 5.0),
            Rectangle::new(12.0, 12.0, 5.0, 5.0),
            Rectangle::new(80.0, 80.0, 5.0, 5.0),
        ]);
        assert_eq!(idx.parallel_query_range(&world()).len(), 3);

        let pairs = idx.parallel_find_intersections();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_find_intersections_within_blocks() {
        let idx = index();
        let a = Rectangle::new(10.0, 10.0, 10.0, 10.0);
        let b = Rectangle::new(15.0, 15.0, 10.0, 10.0);
        let c = Rectangle::new(70.0, 70.0, 4.0, 4.0);
        idx.bulk_insert(vec![a, b, c]);

        let pairs = idx.parallel_find_intersections();
        assert!(pairs
            .iter()
            .any(|(p, q)| (*p == a && *q == b) || (*p == b && *q == a)));
    }

    #[test]
    fn test_optimize_hierarchy_splits_overfull_blocks() {
        let mut idx = HierarchicalSpatialIndex::new(world(), 5, 4);
        let objects: Vec<Rectangle> = (0..12)
            .map(|i| Rectangle::new(2.0 * i as float, 2.0 * i as float, 1.0, 1.0))
            .collect();
        idx.bulk_insert(objects);

        assert_eq!(idx.block_count(), 1);
        idx.optimize_hierarchy();
        assert_eq!(idx.block_count(), 5);
        assert!(idx.find_block("root_q0").is_some());
        assert!(idx.find_block("root_q3").is_some());
        assert_eq!(idx.find_block("root_q2").unwrap().boundary, Rectangle::new(0.0, 0.0, 50.0, 50.0));

        // Idempotent for the already-split root; quadrants are not overfull
        idx.optimize_hierarchy();
        assert_eq!(idx.block_count(), 5);
    }

    #[test]
    fn test_statistics() {
        let mut idx = index();
        idx.create_ip_block("left", Rectangle::new(0.0, 0.0, 50.0, 100.0), "root")
            .unwrap();
        idx.bulk_insert(vec![
            Rectangle::new(10.0, 10.0, 5.0, 5.0),
            Rectangle::new(60.0, 10.0, 5.0, 5.0),
        ]);

        let stats = idx.get_statistics();
        assert_eq!(stats.total_objects, 2);
        assert_eq!(stats.total_blocks, 2);
        assert_eq!(stats.max_depth, 1);
        assert!((stats.avg_objects_per_block - 1.0).abs() < TOLERANCE);
        assert!(stats.memory_usage_mb > 0.0);
    }

    #[test]
    fn test_factory_scale_thresholds() {
        let small: HierarchicalSpatialIndex<Rectangle> =
            SpatialIndexFactory::create_optimized_index(world(), 1_000);
        assert_eq!(small.max_objects_per_block(), DEFAULT_MAX_OBJECTS_PER_BLOCK);
        assert_eq!(small.max_hierarchy_levels(), DEFAULT_MAX_HIERARCHY_LEVELS);

        let medium: HierarchicalSpatialIndex<Rectangle> =
            SpatialIndexFactory::create_optimized_index(world(), 20_000_000);
        assert_eq!(medium.max_objects_per_block(), 1_000_000);
        assert_eq!(medium.max_hierarchy_levels(), 10);

        let huge: HierarchicalSpatialIndex<Rectangle> =
            SpatialIndexFactory::create_optimized_index(world(), 200_000_000);
        assert_eq!(huge.max_objects_per_block(), 10_000_000);
        assert_eq!(huge.max_hierarchy_levels(), 12);
    }

    #[test]
    fn test_out_of_world_objects_are_dropped() {
        let idx = index();
        idx.bulk_insert(vec![
            Rectangle::new(10.0, 10.0, 5.0, 5.0),
            Rectangle::new(500.0, 500.0, 5.0, 5.0),
        ]);
        assert_eq!(idx.get_statistics().total_objects, 1);
        assert_eq!(idx.parallel_query_range(&world()).len(), 1);
    }
}
