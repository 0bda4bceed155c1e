//! zlayout: computational-geometry and spatial-indexing core for EDA
//! layout processing.
//!
//! Three pillars: a polygon-geometry kernel (sharp-angle and narrow-gap
//! detection, intersection and distance predicates), hierarchical spatial
//! indexing (quadtree and R-tree leaves under a tree of named IP blocks,
//! bulk-loaded in Z-order and queried in parallel), and placement
//! optimization (a simulated-annealing optimizer and a force-directed
//! placer over a shared cost model).

#![allow(clippy::wildcard_imports)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::similar_names)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

mod error;

pub mod util;
pub use util::*;

mod geometry;
pub use geometry::*;

mod quadtree;
pub use quadtree::*;

mod rtree;
pub use rtree::*;

pub mod zorder;

mod pool;
pub use pool::*;

mod hierarchy;
pub use hierarchy::*;

mod class;
pub use class::*;

mod cost;
pub use cost::*;

mod annealing;
pub use annealing::*;

mod placer;
pub use placer::*;

/// Live-handle counter backing the re-initialization warning. Behavior
/// never depends on it.
static LIVE_LIBRARIES: AtomicUsize = AtomicUsize::new(0);

/// Library version string, from the crate manifest.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Caller-owned library lifecycle handle. Construction logs the enabled
/// feature set and flips the parallel-execution flag; dropping the handle
/// (or calling [`Library::cleanup`]) logs the teardown. Holding several
/// handles at once is harmless but warned about, matching the
/// initialize-twice semantics of the original lifecycle API.
#[derive(Debug)]
pub struct Library {
    parallel_enabled: bool,
}

impl Library {
    pub fn initialize(enable_parallel: bool) -> Library {
        if LIVE_LIBRARIES.fetch_add(1, Ordering::SeqCst) > 0 {
            warn!("zlayout already initialized");
        }
        info!("zlayout v{} initialized", version());
        debug!("geometry tolerance: {TOLERANCE}");
        debug!("parallel execution: {enable_parallel}");
        if enable_parallel {
            debug!("worker threads: {}", rayon::current_num_threads());
        }
        Library {
            parallel_enabled: enable_parallel,
        }
    }

    pub fn is_parallel_enabled(&self) -> bool {
        self.parallel_enabled
    }

    /// Explicit teardown; equivalent to dropping the handle.
    pub fn cleanup(self) {
        drop(self);
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        LIVE_LIBRARIES.fetch_sub(1, Ordering::SeqCst);
        debug!("zlayout cleanup completed");
    }
}
