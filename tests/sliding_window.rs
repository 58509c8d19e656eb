use quickcheck_macros::quickcheck;
use sliding_chart_wasm::domain::errors::ChartError;
use sliding_chart_wasm::domain::math::Basis;
use sliding_chart_wasm::domain::series::{
    ArrayDataSource, ColumnarDataSource, SlidingWindowDataset, MAX_CHANNELS,
};

fn dataset(rows: Vec<Vec<f64>>) -> SlidingWindowDataset {
    SlidingWindowDataset::new(&ArrayDataSource::new(1000.0, 60.0, rows)).unwrap()
}

#[test]
fn append_slides_window_and_shifts_time_back() {
    let mut ds = dataset(vec![vec![10.0], vec![30.0]]);
    let before = ds.get_point(0.0).timestamp;
    ds.append(&[50.0]).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.get_point(0.0).values, vec![30.0]);
    assert_eq!(ds.get_point(1.0).values, vec![50.0]);
    assert_eq!(ds.get_point(1.0).timestamp, before);
    assert_eq!(ds.get_point(0.0).timestamp, 940.0);
}

#[quickcheck]
fn next_index_inherits_previous_time(appends: Vec<i16>, len: u8) -> bool {
    let len = usize::from(len % 20) + 2;
    let rows = (0..len).map(|i| vec![i as f64]).collect();
    let mut ds = dataset(rows);
    for v in appends {
        let t_head = ds.get_point(0.0).timestamp;
        if ds.append(&[f64::from(v)]).is_err() {
            return false;
        }
        if ds.len() != len || ds.get_point(1.0).timestamp != t_head {
            return false;
        }
    }
    true
}

#[test]
fn all_missing_visible_range_falls_back_to_unit() {
    let ds = dataset(vec![vec![f64::NAN], vec![f64::NAN], vec![4.0]]);
    let tree = ds.tree(0).unwrap();
    assert_eq!(ds.visible_extent(&Basis::new(0.0, 1.0), tree), Basis::new(0.0, 1.0));
    assert_eq!(ds.visible_extent(&Basis::new(0.0, 2.0), tree), Basis::new(4.0, 4.0));
}

#[test]
fn partially_visible_samples_count() {
    let ds = dataset(vec![vec![1.0], vec![9.0], vec![3.0], vec![-2.0]]);
    let tree = ds.tree(0).unwrap();
    // 0.5..1.2 touches samples 0, 1 and 2
    assert_eq!(ds.visible_extent(&Basis::new(0.5, 1.2), tree), Basis::new(1.0, 9.0));
    assert_eq!(ds.visible_extent(&Basis::new(-10.0, 100.0), tree), Basis::new(-2.0, 9.0));
}

#[test]
fn get_point_clamps_and_rounds() {
    let ds = dataset(vec![vec![1.0], vec![2.0], vec![3.0]]);
    assert_eq!(ds.get_point(-4.2).index, 0);
    assert_eq!(ds.get_point(1.4).index, 1);
    assert_eq!(ds.get_point(1.6).index, 2);
    assert_eq!(ds.get_point(99.0).index, 2);
    assert_eq!(ds.get_point(f64::NAN).index, 0);
    assert_eq!(ds.clamp_index(7.5), 2.0);
    assert_eq!(ds.clamp_index(0.25), 0.25);
}

#[test]
fn append_rejects_bad_input_atomically() {
    let mut ds = dataset(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    let times: Vec<f64> = (0..2).map(|i| ds.index_to_time(i as f64)).collect();

    assert!(matches!(ds.append(&[1.0, 2.0, 3.0]), Err(ChartError::Value(_))));
    assert!(matches!(ds.append(&[]), Err(ChartError::Value(_))));
    assert!(matches!(ds.append(&[1.0, f64::INFINITY]), Err(ChartError::Value(_))));
    assert!(matches!(ds.append(&[f64::NEG_INFINITY]), Err(ChartError::Value(_))));

    assert_eq!(ds.get_point(0.0).values, vec![1.0, 2.0]);
    assert_eq!(ds.get_point(1.0).values, vec![3.0, 4.0]);
    let after: Vec<f64> = (0..2).map(|i| ds.index_to_time(i as f64)).collect();
    assert_eq!(times, after);
}

#[test]
fn nan_is_accepted_as_missing() {
    let mut ds = dataset(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    ds.append(&[f64::NAN, 8.0]).unwrap();
    assert_eq!(ds.channel_extent(&ds.b_index_full(), 0), Basis::new(3.0, 3.0));
    assert_eq!(ds.channel_extent(&ds.b_index_full(), 1), Basis::new(4.0, 8.0));
}

#[test]
fn construction_errors() {
    let empty = ArrayDataSource::new(0.0, 1.0, vec![]);
    assert!(matches!(SlidingWindowDataset::new(&empty), Err(ChartError::Construction(_))));

    let too_wide = ArrayDataSource::new(0.0, 1.0, vec![vec![0.0; MAX_CHANNELS + 1]]);
    assert!(matches!(SlidingWindowDataset::new(&too_wide), Err(ChartError::Construction(_))));

    let no_channels = ColumnarDataSource::new(0.0, 1.0, 0, vec![]);
    assert!(matches!(SlidingWindowDataset::new(&no_channels), Err(ChartError::Construction(_))));

    let frozen_time = ArrayDataSource::new(0.0, 0.0, vec![vec![1.0]]);
    assert!(matches!(SlidingWindowDataset::new(&frozen_time), Err(ChartError::Construction(_))));
}

#[test]
fn axis_extent_combines_channels() {
    let ds = dataset(vec![vec![1.0, 50.0, -7.0], vec![2.0, 60.0, f64::NAN]]);
    let full = ds.b_index_full();
    assert_eq!(ds.axis_extent(&full, &[0, 1]), Basis::new(1.0, 60.0));
    assert_eq!(ds.axis_extent(&full, &[0, 2]), Basis::new(-7.0, 2.0));
    assert_eq!(ds.axis_extent(&full, &[]), Basis::new(0.0, 1.0));
}

#[test]
fn time_index_round_trip() {
    let mut ds = dataset(vec![vec![1.0], vec![2.0], vec![3.0]]);
    ds.append(&[4.0]).unwrap();
    assert_eq!(ds.index_to_time(0.0), 940.0);
    assert!((ds.time_to_index(1000.0).unwrap() - 1.0).abs() < 1e-9);
}
