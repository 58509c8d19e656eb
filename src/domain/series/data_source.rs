use serde::{Deserialize, Serialize};

/// Read-only view over the initial window contents.
///
/// Loading, polling or generating the data is the host's business; the
/// dataset only ever pulls values through this trait.
pub trait DataSource {
    /// Timestamp of the sample at index 0
    fn start_time(&self) -> f64;
    /// Time elapsed between consecutive samples
    fn time_step(&self) -> f64;
    fn len(&self) -> usize;
    fn channel_count(&self) -> usize;
    /// Value of `channel` at `index`. NaN marks a missing value.
    fn sample(&self, index: usize, channel: usize) -> f64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Row-major source: one `Vec` per sample.
///
/// Rows shorter than the widest row read as NaN in the missing channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayDataSource {
    pub start_time: f64,
    pub time_step: f64,
    pub rows: Vec<Vec<f64>>,
}

impl ArrayDataSource {
    pub fn new(start_time: f64, time_step: f64, rows: Vec<Vec<f64>>) -> Self {
        Self { start_time, time_step, rows }
    }
}

impl DataSource for ArrayDataSource {
    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn time_step(&self) -> f64 {
        self.time_step
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn channel_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn sample(&self, index: usize, channel: usize) -> f64 {
        self.rows.get(index).and_then(|row| row.get(channel)).copied().unwrap_or(f64::NAN)
    }
}

/// Channel-major source over one flat buffer: `values[channel * len + index]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnarDataSource {
    pub start_time: f64,
    pub time_step: f64,
    pub channel_count: usize,
    pub values: Vec<f64>,
}

impl ColumnarDataSource {
    pub fn new(start_time: f64, time_step: f64, channel_count: usize, values: Vec<f64>) -> Self {
        Self { start_time, time_step, channel_count, values }
    }

    pub fn from_columns(start_time: f64, time_step: f64, columns: &[Vec<f64>]) -> Self {
        let len = columns.iter().map(Vec::len).min().unwrap_or(0);
        let values = columns.iter().flat_map(|column| column[..len].iter().copied()).collect();
        Self::new(start_time, time_step, columns.len(), values)
    }
}

impl DataSource for ColumnarDataSource {
    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn time_step(&self) -> f64 {
        self.time_step
    }

    fn len(&self) -> usize {
        if self.channel_count == 0 { 0 } else { self.values.len() / self.channel_count }
    }

    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn sample(&self, index: usize, channel: usize) -> f64 {
        let len = self.len();
        if index >= len || channel >= self.channel_count {
            return f64::NAN;
        }
        self.values[channel * len + index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_read_as_nan() {
        let source = ArrayDataSource::new(0.0, 1.0, vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(source.channel_count(), 2);
        assert_eq!(source.sample(1, 0), 3.0);
        assert!(source.sample(1, 1).is_nan());
        assert!(source.sample(5, 0).is_nan());
    }

    #[test]
    fn columnar_layout() {
        let source = ColumnarDataSource::from_columns(10.0, 2.0, &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(source.len(), 3);
        assert_eq!(source.channel_count(), 2);
        assert_eq!(source.sample(2, 1), 6.0);
        assert_eq!(source.sample(0, 0), 1.0);
        assert!(source.sample(0, 2).is_nan());
    }
}
