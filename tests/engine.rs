use chrono::{Duration, TimeZone, Utc};
use ordered_float::OrderedFloat;
use tseries::transform::{CumSum, Ema, FillValue};
use tseries::window::reducers::{Count, Max, Sum};
use tseries::{
    Backend, Buffer, EngineConfig, FloatIndex, Hourly, Multiply, Ownership, PosixSeconds,
    SeriesError, TimeSeries,
};

fn hourly_index(hours: i64) -> Vec<i64> {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
    (0..hours)
        .map(|h| (base + Duration::minutes(30 * h)).timestamp())
        .collect()
}

#[test]
fn intraday_series_aggregates_by_hour() {
    let index = hourly_index(6);
    let values: Vec<f64> = (1..=6).map(|v| v as f64).collect();
    let ts = TimeSeries::from_vecs(values, index.clone(), 1).unwrap();

    // 09:30 | 10:00 10:30 | 11:00 11:30 | 12:00
    let hourly = ts.time_window(1, &Hourly::<PosixSeconds>::new(), Max);
    assert_eq!(hourly.index(), &[index[0], index[2], index[4], index[5]]);
    assert_eq!(hourly.data(), &[1.0, 3.0, 5.0, 6.0]);

    let counts = ts.time_window(2, &Hourly::<PosixSeconds>::new(), Count);
    // 2-hour buckets start at 08:00, 10:00 and 12:00
    assert_eq!(counts.data(), &[1, 4, 1]);
}

#[test]
fn float_index_aligns_like_integers() {
    let x: TimeSeries<FloatIndex, f64> = TimeSeries::from_vecs(
        vec![1.0, 2.0, 3.0],
        vec![OrderedFloat(0.5), OrderedFloat(1.5), OrderedFloat(2.5)],
        1,
    )
    .unwrap();
    let y: TimeSeries<FloatIndex, f64> =
        TimeSeries::from_vecs(vec![10.0, 20.0], vec![OrderedFloat(1.5), OrderedFloat(3.0)], 1).unwrap();

    let product = x.binary_op(&y, Multiply).unwrap();
    assert_eq!(product.index(), &[OrderedFloat(1.5)]);
    assert_eq!(product.data(), &[20.0]);
}

#[test]
fn borrowed_buffers_are_updated_in_place() {
    let mut data = vec![1.0, 2.0, 3.0, 4.0];
    let mut index = vec![1, 2];
    {
        let mut ts = TimeSeries::borrowed(&mut data, &mut index, 2).unwrap();
        assert_eq!(ts.ownership(), Ownership::Borrowed);
        ts *= 10.0;
        let summed = ts.transform(&CumSum);
        assert_eq!(summed.ownership(), Ownership::Owned);
        assert_eq!(summed.data(), &[10.0, 30.0, 30.0, 70.0]);
    }
    assert_eq!(data, vec![10.0, 20.0, 30.0, 40.0]);
}

#[test]
fn mixed_ownership_backend() {
    let mut index = vec![0, 1, 2];
    let backend = Backend::wrap(Buffer::from(vec![1i64, 2, 3]), Buffer::from(index.as_mut_slice()), 1).unwrap();
    assert_eq!(backend.ownership(), Ownership::Borrowed);

    let ts = TimeSeries::from_backend(backend);
    let owned = ts.into_owned();
    assert_eq!(owned.ownership(), Ownership::Owned);
    assert_eq!(owned.window(2, Sum).unwrap().data(), &[3, 5]);
}

#[test]
fn shape_is_validated_on_construction() {
    let err = TimeSeries::<i32, f64>::from_vecs(vec![1.0; 5], vec![0, 1, 2], 2).unwrap_err();
    assert_eq!(err, SeriesError::ShapeMismatch { expected: 6, actual: 5 });
}

#[test]
fn transforms_with_arguments() {
    let ts: TimeSeries<i32, f64> = TimeSeries::from_vecs(vec![f64::NAN, 2.0, 4.0], vec![0, 1, 2], 1).unwrap();
    let filled = ts.transform_1arg(&FillValue, 0.0);
    assert_eq!(filled.data(), &[0.0, 2.0, 4.0]);

    let smoothed = filled.transform_1arg(&Ema, 1usize);
    assert_eq!(smoothed.data(), filled.data());
}

#[test]
fn config_from_json_drives_parallel_windows() {
    let config = EngineConfig::from_json_str(r#"{"parallel_columns": true, "parallel_min_rows": 1}"#).unwrap();
    let nrow = 100;
    let data: Vec<f64> = (0..nrow * 3).map(|v| v as f64).collect();
    let index: Vec<i32> = (0..nrow as i32).collect();
    let ts = TimeSeries::from_vecs(data, index, 3).unwrap();

    let sequential = ts.window(10, Sum).unwrap();
    let parallel = ts.clone().with_config(config).window(10, Sum).unwrap();
    assert_eq!(sequential.data(), parallel.data());
    assert_eq!(parallel.nrow(), nrow - 9);
}
