pub use crate::error::{LayoutError, Result};
pub use bon::Builder;
pub use derive_new::new;
pub use foldhash::{HashMapExt, HashSetExt};
pub use itertools::Itertools;
pub use log::{debug, info, warn};
pub use logging_timer::timer;
pub use ordered_float::OrderedFloat;
pub use rand::rngs::StdRng;
pub use rand::{Rng, SeedableRng};
pub use rayon::prelude::*;
pub use smallvec::SmallVec;
pub use std::cmp::Reverse;
pub use std::collections::BinaryHeap;
pub use std::fmt;
pub use std::hash::{Hash, Hasher};
pub use std::sync::atomic::{AtomicUsize, Ordering};
pub use std::sync::{Arc, Mutex, RwLock};

#[allow(non_camel_case_types)]
pub type float = f64;

pub type Set<T> = foldhash::HashSet<T>;
pub type Dict<K, V> = foldhash::HashMap<K, V>;
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, foldhash::fast::RandomState>;

/// Manhattan distance between two coordinate pairs.
pub fn norm1(p1: (float, float), p2: (float, float)) -> float {
    (p1.0 - p2.0).abs() + (p1.1 - p2.1).abs()
}

/// Clamp a cosine into [-1, 1] before `acos` so round-off never produces NaN.
pub fn clamp_cosine(value: float) -> float {
    value.clamp(-1.0, 1.0)
}

pub fn format_with_separator(n: usize, sep: char) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut formatted = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            formatted.push(sep);
        }
        formatted.push(c);
    }
    formatted
}
