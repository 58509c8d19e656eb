use serde::{Deserialize, Serialize};

use crate::domain::errors::{ChartError, ChartResult};

/// Range aggregate of one channel: smallest and largest finite value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// Absorbing element: combining it with `x` yields `x`.
    pub const IDENTITY: MinMax = MinMax { min: f64::INFINITY, max: f64::NEG_INFINITY };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Leaf for one sample. NaN and ±Infinity contribute nothing.
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() { Self { min: value, max: value } } else { Self::IDENTITY }
    }

    pub fn combine(fst: &MinMax, snd: &MinMax) -> MinMax {
        MinMax { min: fst.min.min(snd.min), max: fst.max.max(snd.max) }
    }

    pub fn is_identity(&self) -> bool {
        !(self.min <= self.max)
    }
}

/// Array-backed segment tree answering associative range queries.
///
/// Leaves live at `nodes[len..2*len]`, node `i` holds the combine of nodes
/// `2i` and `2i+1`. Any `len >= 1` works, no padding to a power of two.
#[derive(Clone)]
pub struct SegmentTree<T> {
    len: usize,
    nodes: Vec<T>,
    combine: fn(&T, &T) -> T,
    identity: T,
}

impl<T: Copy> SegmentTree<T> {
    pub fn build(values: &[T], combine: fn(&T, &T) -> T, identity: T) -> ChartResult<Self> {
        if values.is_empty() {
            return Err(ChartError::Construction(
                "segment tree requires a non-empty array".to_string(),
            ));
        }
        let len = values.len();
        let mut nodes = vec![identity; 2 * len];
        nodes[len..].copy_from_slice(values);
        for i in (1..len).rev() {
            nodes[i] = combine(&nodes[2 * i], &nodes[2 * i + 1]);
        }
        Ok(Self { len, nodes, combine, identity })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn identity(&self) -> T {
        self.identity
    }

    /// Combine over the closed range `[lo, hi]`. Bounds are clamped and
    /// swapped when reversed.
    pub fn query(&self, lo: usize, hi: usize) -> T {
        let last = self.len - 1;
        let (mut lo, mut hi) = (lo.min(last), hi.min(last));
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }

        let mut left = self.identity;
        let mut right = self.identity;
        let mut l = lo + self.len;
        let mut r = hi + self.len + 1;
        while l < r {
            if l & 1 == 1 {
                left = (self.combine)(&left, &self.nodes[l]);
                l += 1;
            }
            if r & 1 == 1 {
                r -= 1;
                right = (self.combine)(&self.nodes[r], &right);
            }
            l >>= 1;
            r >>= 1;
        }
        (self.combine)(&left, &right)
    }

    /// Replaces one leaf and recombines its ancestors.
    pub fn update(&mut self, idx: usize, value: T) {
        if idx >= self.len {
            return;
        }
        let mut i = idx + self.len;
        self.nodes[i] = value;
        while i > 1 {
            i >>= 1;
            self.nodes[i] = (self.combine)(&self.nodes[2 * i], &self.nodes[2 * i + 1]);
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SegmentTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentTree").field("len", &self.len).field("leaves", &&self.nodes[self.len..]).finish()
    }
}

/// Min/max tree over raw channel values.
pub fn build_min_max_tree(values: &[f64]) -> ChartResult<SegmentTree<MinMax>> {
    let leaves: Vec<MinMax> = values.iter().copied().map(MinMax::from_value).collect();
    SegmentTree::build(&leaves, MinMax::combine, MinMax::IDENTITY)
}
