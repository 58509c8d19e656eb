use std::collections::VecDeque;

use derive_more::{Deref, From};
use serde::Serialize;

use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::domain::math::{build_min_max_tree, Basis, MinMax, SegmentTree, AR1};
use crate::domain::series::DataSource;
use crate::log_warn;

/// Widest sample the window accepts
pub const MAX_CHANNELS: usize = 8;

/// Index `i` of the slid window reads the time index `i - 1` had before.
const INDEX_SHIFT: AR1 = AR1 { a: 1.0, b: -1.0 };

/// One fixed-arity tuple of channel values
#[derive(Debug, Clone, PartialEq, Deref, From, Serialize)]
pub struct Sample(Vec<f64>);

impl Sample {
    pub fn value(&self, channel: usize) -> f64 {
        self.0.get(channel).copied().unwrap_or(f64::NAN)
    }
}

/// Sample resolved at a concrete index, as handed to legends and axes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub index: usize,
    pub timestamp: f64,
    pub values: Vec<f64>,
}

/// Fixed-capacity FIFO of samples with per-channel min/max indexes.
///
/// The window length never changes after construction: each append evicts
/// the head. Timestamps are not stored per sample; they come from an
/// index→time map that is re-composed with a unit shift on every append:
/// afterwards `t_new(i) == t_old(i - 1)`, so the time axis moves one step
/// back while the samples move one slot towards the head.
#[derive(Debug, Clone)]
pub struct SlidingWindowDataset {
    samples: VecDeque<Sample>,
    channel_count: usize,
    idx_to_time: AR1,
    trees: Vec<SegmentTree<MinMax>>,
}

impl SlidingWindowDataset {
    pub fn new(source: &dyn DataSource) -> ChartResult<Self> {
        let len = source.len();
        let channel_count = source.channel_count();
        if len == 0 {
            return Err(ChartError::Construction("initial window is empty".to_string()));
        }
        if channel_count == 0 || channel_count > MAX_CHANNELS {
            return Err(ChartError::Construction(format!(
                "unsupported channel count {} (expected 1..={})",
                channel_count, MAX_CHANNELS
            )));
        }
        let (start, step) = (source.start_time(), source.time_step());
        if !start.is_finite() || !step.is_finite() || step == 0.0 {
            return Err(ChartError::Construction(format!(
                "unusable time axis: start {} step {}",
                start, step
            )));
        }
        let idx_to_time = AR1::between_bases(&Basis::UNIT, &Basis::new(start, start + step))
            .map_err(|e| ChartError::Construction(e.to_string()))?;

        let mut samples = VecDeque::with_capacity(len);
        for index in 0..len {
            let values: Vec<f64> = (0..channel_count).map(|c| source.sample(index, c)).collect();
            if let Some(bad) = values.iter().find(|v| v.is_infinite()) {
                return Err(ChartError::Value(format!("sample {} holds {}", index, bad)));
            }
            samples.push_back(Sample::from(values));
        }

        let mut dataset = Self { samples, channel_count, idx_to_time, trees: Vec::new() };
        dataset.rebuild_trees()?;
        Ok(dataset)
    }

    /// Pushes one sample at the tail and evicts the head.
    ///
    /// Fewer values than channels pads with NaN. More values, no values, or
    /// any ±Infinity is rejected before the window is touched.
    pub fn append(&mut self, values: &[f64]) -> ChartResult<()> {
        if values.is_empty() || values.len() > self.channel_count {
            return Err(ChartError::Value(format!(
                "expected {} channel values, got {}",
                self.channel_count,
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| v.is_infinite()) {
            return Err(ChartError::Value(format!("appended value {} is not finite", bad)));
        }

        let mut row = values.to_vec();
        if row.len() < self.channel_count {
            log_warn!(
                LogComponent::Domain("SlidingWindow"),
                "append supplied {} of {} channels, padding with NaN",
                row.len(),
                self.channel_count
            );
            row.resize(self.channel_count, f64::NAN);
        }

        self.samples.pop_front();
        self.samples.push_back(Sample::from(row));
        self.idx_to_time = self.idx_to_time.compose_with(&INDEX_SHIFT);
        self.rebuild_trees()
    }

    fn rebuild_trees(&mut self) -> ChartResult<()> {
        self.trees = (0..self.channel_count)
            .map(|c| build_min_max_tree(&self.channel_values(c)))
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn channel_values(&self, channel: usize) -> Vec<f64> {
        self.samples.iter().map(|s| s.value(channel)).collect()
    }

    pub fn tree(&self, channel: usize) -> Option<&SegmentTree<MinMax>> {
        self.trees.get(channel)
    }

    pub fn idx_to_time(&self) -> AR1 {
        self.idx_to_time
    }

    pub fn index_to_time(&self, index: f64) -> f64 {
        self.idx_to_time.apply(index)
    }

    pub fn time_to_index(&self, time: f64) -> ChartResult<f64> {
        Ok(self.idx_to_time.inverse()?.apply(time))
    }

    /// Index basis covering the whole window
    pub fn b_index_full(&self) -> Basis {
        Basis::new(0.0, (self.len() - 1) as f64)
    }

    /// Clamps a fractional index into `[0, len-1]`. NaN clamps to 0.
    pub fn clamp_index(&self, index: f64) -> f64 {
        if index.is_nan() {
            return 0.0;
        }
        index.clamp(0.0, (self.len() - 1) as f64)
    }

    /// Nearest sample to a fractional index. Never fails: out-of-range and
    /// NaN indexes are clamped.
    pub fn get_point(&self, index: f64) -> Point {
        let index = self.clamp_index(index.round()) as usize;
        let values = self.samples.get(index).map(|s| s.to_vec()).unwrap_or_default();
        Point { index, timestamp: self.index_to_time(index as f64), values }
    }

    fn index_bounds(&self, index_basis: &Basis) -> (usize, usize) {
        let [p1, p2] = index_basis.to_arr();
        let lo = self.clamp_index(p1.min(p2).floor()) as usize;
        let hi = self.clamp_index(p1.max(p2).ceil()) as usize;
        if lo > hi { (hi, lo) } else { (lo, hi) }
    }

    /// Min/max of one tree over the samples touched by `index_basis`.
    /// Partially visible samples count. An all-missing range yields `[0, 1]`.
    pub fn visible_extent(&self, index_basis: &Basis, tree: &SegmentTree<MinMax>) -> Basis {
        let (lo, hi) = self.index_bounds(index_basis);
        extent_to_basis(tree.query(lo, hi))
    }

    pub fn channel_extent(&self, index_basis: &Basis, channel: usize) -> Basis {
        match self.tree(channel) {
            Some(tree) => self.visible_extent(index_basis, tree),
            None => Basis::PLACEHOLDER,
        }
    }

    /// Combined extent of several channels sharing one axis
    pub fn axis_extent(&self, index_basis: &Basis, channels: &[usize]) -> Basis {
        let (lo, hi) = self.index_bounds(index_basis);
        let combined = channels
            .iter()
            .filter_map(|&c| self.tree(c))
            .map(|tree| tree.query(lo, hi))
            .fold(MinMax::IDENTITY, |acc, mm| MinMax::combine(&acc, &mm));
        extent_to_basis(combined)
    }
}

fn extent_to_basis(extent: MinMax) -> Basis {
    if extent.is_identity() { Basis::PLACEHOLDER } else { Basis::new(extent.min, extent.max) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::ArrayDataSource;

    fn dataset(rows: Vec<Vec<f64>>) -> SlidingWindowDataset {
        SlidingWindowDataset::new(&ArrayDataSource::new(1000.0, 60.0, rows)).unwrap()
    }

    #[test]
    fn single_sample_window() {
        let mut ds = dataset(vec![vec![7.0]]);
        assert_eq!(ds.b_index_full(), Basis::new(0.0, 0.0));
        ds.append(&[9.0]).unwrap();
        assert_eq!(ds.get_point(0.0).values, vec![9.0]);
        assert_eq!(ds.get_point(0.0).timestamp, 940.0);
    }

    #[test]
    fn append_moves_time_axis_back_one_step() {
        let mut ds = SlidingWindowDataset::new(&ArrayDataSource::new(0.0, 1.0, vec![vec![0.0], vec![1.0]])).unwrap();
        ds.append(&[2.0]).unwrap();
        assert_eq!(ds.index_to_time(0.0), -1.0);
        assert_eq!(ds.index_to_time(1.0), 0.0);
    }

    #[test]
    fn padding_keeps_arity() {
        let mut ds = dataset(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        ds.append(&[5.0]).unwrap();
        let point = ds.get_point(1.0);
        assert_eq!(point.values[0], 5.0);
        assert!(point.values[1].is_nan());
    }

    #[test]
    fn reversed_basis_is_swapped() {
        let ds = dataset(vec![vec![1.0], vec![5.0], vec![3.0]]);
        let fwd = ds.channel_extent(&Basis::new(0.2, 1.4), 0);
        let rev = ds.channel_extent(&Basis::new(1.4, 0.2), 0);
        assert_eq!(fwd, rev);
        assert_eq!(fwd, Basis::new(1.0, 3.0));
    }

    #[test]
    fn missing_channel_is_placeholder() {
        let ds = dataset(vec![vec![1.0], vec![2.0]]);
        assert_eq!(ds.channel_extent(&ds.b_index_full(), 3), Basis::PLACEHOLDER);
    }
}
