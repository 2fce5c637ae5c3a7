//! Unit tests for pier-data modules
//!
//! Retrieval behavior is exercised against an in-memory dataset source so the
//! filtering and merge rules can be checked without a network.

use chrono::NaiveDate;
use ndarray::{aview1, Array1};
use pier_data::{
    config::{PierConfig, DEFAULT_SINGLE_YEAR, DEFAULT_URL_TEMPLATE},
    datenum::{
        datenum_from_date, datenum_from_datetime, datenum_to_datetime, ordinal, parse_datenum,
        parse_time_units, seconds_to_datenum, EPOCH_ORDINAL, SECONDS_PER_DAY,
    },
    errors::{PierDataError, RemoteAccessCause, Result},
    filter::{data_bounds, select_indices, BoundsPolicy, DateWindow},
    record::PierRecord,
    retriever::PierDataRetriever,
    source::{DatasetSource, ObservationArrays},
};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory dataset source that records every location it is asked for
#[derive(Default)]
struct MockSource {
    datasets: HashMap<String, ObservationArrays>,
    calls: RefCell<Vec<String>>,
}

impl MockSource {
    /// Register a dataset whose observations sit at the given date numbers.
    /// Temperature is `10 + i` and pressure `100 + i` for the i-th observation.
    fn with_year(mut self, url: &str, dnum: &[f64]) -> Self {
        let time = dnum.iter().map(|d| (d - EPOCH_ORDINAL) * SECONDS_PER_DAY).collect();
        let temperature = (0..dnum.len()).map(|i| 10.0 + i as f64).collect();
        let pressure = (0..dnum.len()).map(|i| 100.0 + i as f64).collect();
        let arrays = ObservationArrays::new(url, time, temperature, pressure)
            .expect("aligned fixture");
        self.datasets.insert(url.to_string(), arrays);
        self
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl DatasetSource for MockSource {
    fn open_dataset(&self, url: &str) -> Result<ObservationArrays> {
        self.calls.borrow_mut().push(url.to_string());
        self.datasets.get(url).cloned().ok_or_else(|| PierDataError::RemoteAccess {
            url: url.to_string(),
            cause: RemoteAccessCause::Open(netcdf::Error::NotFound(url.to_string())),
        })
    }
}

const TEMPLATE: &str = "mock://scripps_pier-{year}.nc";

fn url(year: i32) -> String {
    PierConfig::new(TEMPLATE).url_for_year(year)
}

fn day(offset: f64) -> f64 {
    // 2015-01-01
    735_599.0 + offset
}

fn assert_aligned(record: &PierRecord) {
    assert_eq!(record.dnum.len(), record.temperature.len());
    assert_eq!(record.dnum.len(), record.pressure.len());
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_error_types() {
    let range_err = PierDataError::InvalidRange {
        year_start: 2016,
        year_end: 2015,
    };
    assert!(format!("{}", range_err).contains("Invalid year range 2016..2015"));
    assert!(!range_err.is_remote_access());

    let missing = PierDataError::RemoteAccess {
        url: "http://example/pier.nc".to_string(),
        cause: RemoteAccessCause::MissingVariable("pressure".to_string()),
    };
    let text = format!("{}", missing);
    assert!(text.contains("http://example/pier.nc"));
    assert!(text.contains("variable 'pressure' not found"));
    assert!(missing.is_remote_access());

    let mismatch = RemoteAccessCause::LengthMismatch {
        time: 3,
        temperature: 2,
        pressure: 3,
    };
    assert_eq!(
        format!("{}", mismatch),
        "misaligned variables: time=3, temperature=2, pressure=3"
    );

    let open = PierDataError::RemoteAccess {
        url: "x".to_string(),
        cause: RemoteAccessCause::Open(netcdf::Error::NotFound("x".to_string())),
    };
    assert!(std::error::Error::source(&open).is_some());
}

// ---------------------------------------------------------------------------
// Date numbers
// ---------------------------------------------------------------------------

#[test]
fn test_epoch_ordinal_matches_calendar() {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    assert_eq!(ordinal(epoch) as f64, EPOCH_ORDINAL);
    assert_eq!(ordinal(NaiveDate::from_ymd_opt(1, 1, 1).unwrap()), 1);
}

#[test]
fn test_seconds_to_datenum() {
    assert_eq!(seconds_to_datenum(0.0), EPOCH_ORDINAL);
    assert_eq!(seconds_to_datenum(43_200.0), EPOCH_ORDINAL + 0.5);
    // 2015-01-01T00:00:00Z
    assert_eq!(seconds_to_datenum(1_420_070_400.0), day(0.0));
}

#[test]
fn test_datetime_conversions() {
    let date = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
    let dt = date.and_hms_opt(18, 0, 0).unwrap();
    let dnum = datenum_from_datetime(dt);
    assert_eq!(dnum, datenum_from_date(date) + 0.75);
    assert_eq!(datenum_to_datetime(dnum), Some(dt));
    assert_eq!(datenum_to_datetime(f64::NAN), None);
}

#[test]
fn test_parse_datenum() {
    let date = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
    assert_eq!(parse_datenum("2015-06-01").unwrap(), datenum_from_date(date));
    assert_eq!(
        parse_datenum("2015-06-01T12:00:00").unwrap(),
        datenum_from_date(date) + 0.5
    );
    assert_eq!(parse_datenum("735600.25").unwrap(), 735_600.25);

    match parse_datenum("June first") {
        Err(PierDataError::InvalidDate(msg)) => assert!(msg.contains("June first")),
        other => panic!("Expected InvalidDate error, got {:?}", other),
    }
}

#[test]
fn test_parse_time_units() {
    let unix = parse_time_units("seconds since 1970-01-01 00:00:00 UTC").unwrap();
    assert_eq!(unix.to_epoch_seconds(86_400.0), 86_400.0);

    let hours = parse_time_units("hours since 2015-01-01").unwrap();
    assert_eq!(hours.to_epoch_seconds(0.0), 1_420_070_400.0);
    assert_eq!(hours.to_epoch_seconds(24.0), 1_420_070_400.0 + 86_400.0);

    let iso = parse_time_units("days since 1970-01-02T00:00:00Z").unwrap();
    assert_eq!(iso.to_epoch_seconds(1.0), 2.0 * 86_400.0);

    // Reference given in local time: midnight at UTC-8 is 08:00 UTC
    let pacific = parse_time_units("seconds since 1970-01-01 00:00:00 -08:00").unwrap();
    assert_eq!(pacific.to_epoch_seconds(0.0), 8.0 * 3_600.0);
    let compact = parse_time_units("hours since 1970-01-01 00:00 +0530").unwrap();
    assert_eq!(compact.to_epoch_seconds(0.0), -5.5 * 3_600.0);
    let utc = parse_time_units("seconds since 1970-01-01 00:00:00 +00:00").unwrap();
    assert_eq!(utc.to_epoch_seconds(0.0), 0.0);

    assert!(parse_time_units("seconds since 1970-01-01 00:00:00 PST").is_none());
    assert!(parse_time_units("seconds since 1970-01-01 00:00:00 +00:00 extra").is_none());
    assert!(parse_time_units("fortnights since 1970-01-01").is_none());
    assert!(parse_time_units("seconds").is_none());
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn test_select_indices_is_strict() {
    let dnum: Vec<f64> = (1..=10).map(f64::from).collect();
    let idx = select_indices(aview1(&dnum), 3.0, 7.0);
    assert_eq!(idx, vec![3, 4, 5]);

    // Equal bounds select nothing
    assert!(select_indices(aview1(&dnum), 3.0, 3.0).is_empty());
    // Inverted bounds select nothing
    assert!(select_indices(aview1(&dnum), 7.0, 3.0).is_empty());
}

#[test]
fn test_select_indices_skips_nan() {
    let dnum = [1.0, f64::NAN, 3.0, 4.0];
    assert_eq!(select_indices(aview1(&dnum), 0.0, 5.0), vec![0, 2, 3]);
}

#[test]
fn test_date_window_resolution() {
    let dnum = [5.0, f64::NAN, 2.0, 9.0];
    assert_eq!(data_bounds(aview1(&dnum)), Some((2.0, 9.0)));

    assert_eq!(DateWindow::unbounded().resolve(aview1(&dnum)), Some((2.0, 9.0)));
    assert_eq!(
        DateWindow::new(Some(4.0), None).resolve(aview1(&dnum)),
        Some((4.0, 9.0))
    );
    assert_eq!(
        DateWindow::between(0.0, 1.0).resolve(aview1(&[] as &[f64])),
        Some((0.0, 1.0))
    );
    assert_eq!(DateWindow::unbounded().resolve(aview1(&[f64::NAN])), None);
    assert!(DateWindow::between(0.0, 1.0).is_closed());
    assert!(!DateWindow::unbounded().is_closed());
}

// ---------------------------------------------------------------------------
// Configuration and records
// ---------------------------------------------------------------------------

#[test]
fn test_config_defaults() {
    let config = PierConfig::default();
    assert_eq!(config.url_template, DEFAULT_URL_TEMPLATE);
    assert_eq!(config.single_year, DEFAULT_SINGLE_YEAR);
    assert_eq!(config.bounds_policy, BoundsPolicy::CarryFirstYear);
    assert_eq!(
        config.single_year_url(),
        "http://sccoos.org/thredds/dodsC/autoss/scripps_pier-2021.nc"
    );
    assert_eq!(
        config.url_for_year(2015),
        "http://sccoos.org/thredds/dodsC/autoss/scripps_pier-2015.nc"
    );

    let custom = PierConfig::new("/data/pier-{year}.nc")
        .with_single_year(2016)
        .with_bounds_policy(BoundsPolicy::PerYear);
    assert_eq!(custom.single_year_url(), "/data/pier-2016.nc");
    assert_eq!(custom.bounds_policy, BoundsPolicy::PerYear);
}

#[test]
fn test_record_summary_and_json() {
    let record = PierRecord::new(
        Array1::from_vec(vec![1.0, 2.0, 3.0]),
        Array1::from_vec(vec![10.0, f64::NAN, 14.0]),
        Array1::from_vec(vec![100.0, 101.0, 102.0]),
        "test record",
    )
    .expect("aligned record");

    let summary = record.summary();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.first_dnum, Some(1.0));
    assert_eq!(summary.last_dnum, Some(3.0));

    let temperature = summary.temperature.expect("temperature stats");
    assert_eq!(temperature.valid, 2);
    assert_eq!(temperature.min, 10.0);
    assert_eq!(temperature.max, 14.0);
    assert_eq!(temperature.mean, 12.0);
    assert_eq!(temperature.std_dev, 2.0);

    let json = record.to_json();
    assert_eq!(json["readme"], "test record");
    assert_eq!(json["dnum"].as_array().map(Vec::len), Some(3));
    assert!(json["temperature"][1].is_null());

    let empty = PierRecord::empty("nothing");
    assert!(empty.is_empty());
    assert!(empty.summary().temperature.is_none());
}

#[test]
fn test_record_rejects_misaligned() {
    let result = PierRecord::new(
        Array1::from_vec(vec![1.0, 2.0]),
        Array1::from_vec(vec![10.0, 11.0]),
        Array1::from_vec(vec![100.0]),
        "short pressure",
    );
    match result {
        Err(PierDataError::MisalignedRecord {
            dnum,
            temperature,
            pressure,
        }) => assert_eq!((dnum, temperature, pressure), (2, 2, 1)),
        other => panic!("Expected MisalignedRecord error, got {:?}", other),
    }
}

#[test]
fn test_observation_arrays_reject_misaligned() {
    let result = ObservationArrays::new("mock://bad", vec![1.0, 2.0], vec![1.0], vec![1.0, 2.0]);
    match result {
        Err(PierDataError::RemoteAccess {
            cause: RemoteAccessCause::LengthMismatch { time, temperature, pressure },
            ..
        }) => {
            assert_eq!((time, temperature, pressure), (2, 1, 2));
        }
        other => panic!("Expected LengthMismatch, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Retrieval
// ---------------------------------------------------------------------------

#[test]
fn test_single_year_defaults_exclude_extremes() -> Result<()> {
    let days: Vec<f64> = (0..5).map(|i| day(f64::from(i))).collect();
    let source = MockSource::default().with_year(&url(2021), &days);
    let retriever = PierDataRetriever::new(&source, PierConfig::new(TEMPLATE));

    let record = retriever.fetch_single_year(None, None)?;
    assert_aligned(&record);
    assert_eq!(record.dnum.to_vec(), days[1..4].to_vec());
    assert_eq!(record.temperature.to_vec(), vec![11.0, 12.0, 13.0]);
    assert_eq!(record.pressure.to_vec(), vec![101.0, 102.0, 103.0]);
    assert_eq!(
        record.readme,
        "2021 Pier data, SIO221a, function fetch_single_year"
    );
    assert_eq!(*source.calls.borrow(), vec![url(2021)]);
    Ok(())
}

#[test]
fn test_equal_bounds_yield_empty_record() -> Result<()> {
    let dnum: Vec<f64> = (1..=10).map(f64::from).collect();
    let source = MockSource::default().with_year(&url(2021), &dnum);
    let retriever = PierDataRetriever::new(&source, PierConfig::new(TEMPLATE));

    let record = retriever.fetch_single_year(Some(3.0), Some(3.0))?;
    assert!(record.is_empty());
    assert_aligned(&record);
    Ok(())
}

#[test]
fn test_bounds_are_exclusive() -> Result<()> {
    let dnum: Vec<f64> = (1..=10).map(f64::from).collect();
    let source = MockSource::default().with_year(&url(2021), &dnum);
    let retriever = PierDataRetriever::new(&source, PierConfig::new(TEMPLATE));

    let record = retriever.fetch_single_year(Some(3.0), Some(7.0))?;
    assert_eq!(record.dnum.to_vec(), vec![4.0, 5.0, 6.0]);
    assert!(record.dnum.iter().all(|&d| d > 3.0 && d < 7.0));
    Ok(())
}

#[test]
fn test_invalid_range_makes_no_calls() {
    let source = MockSource::default();
    let retriever = PierDataRetriever::new(&source, PierConfig::new(TEMPLATE));

    match retriever.fetch_year_range(2016, 2015, None, None) {
        Err(PierDataError::InvalidRange {
            year_start,
            year_end,
        }) => {
            assert_eq!(year_start, 2016);
            assert_eq!(year_end, 2015);
        }
        other => panic!("Expected InvalidRange error, got {:?}", other),
    }
    assert_eq!(source.call_count(), 0);
}

#[test]
fn test_default_bounds_carry_over_from_first_year() -> Result<()> {
    // 2015 spans days 0..=4, 2016 lies entirely after it
    let first: Vec<f64> = (0..5).map(|i| day(f64::from(i))).collect();
    let second: Vec<f64> = (5..9).map(|i| day(f64::from(i))).collect();
    let source = MockSource::default()
        .with_year(&url(2015), &first)
        .with_year(&url(2016), &second);
    let retriever = PierDataRetriever::new(&source, PierConfig::new(TEMPLATE));

    let record = retriever.fetch_year_range(2015, 2016, None, None)?;
    assert_aligned(&record);
    // 2015 within its own (min, max): 3 observations;
    // 2016 within 2015's carried (min, max): none
    assert_eq!(record.len(), 3);
    assert_eq!(record.dnum.to_vec(), first[1..4].to_vec());
    assert_eq!(
        record.readme,
        "Pier data for years 2015 to 2016, function fetch_year_range"
    );
    assert_eq!(*source.calls.borrow(), vec![url(2015), url(2016)]);
    Ok(())
}

#[test]
fn test_carried_bounds_keep_caller_bound() -> Result<()> {
    let first: Vec<f64> = (0..5).map(|i| day(f64::from(i))).collect();
    let second: Vec<f64> = (5..9).map(|i| day(f64::from(i))).collect();
    let source = MockSource::default()
        .with_year(&url(2015), &first)
        .with_year(&url(2016), &second);
    let retriever = PierDataRetriever::new(&source, PierConfig::new(TEMPLATE));

    // Caller fixes the end; the start defaults to 2015's minimum for both years
    let record = retriever.fetch_year_range(2015, 2016, None, Some(day(7.0)))?;
    assert_eq!(
        record.dnum.to_vec(),
        vec![day(1.0), day(2.0), day(3.0), day(4.0), day(5.0), day(6.0)]
    );
    Ok(())
}

#[test]
fn test_carried_bounds_keep_caller_start() -> Result<()> {
    let first: Vec<f64> = (0..5).map(|i| day(f64::from(i))).collect();
    let second: Vec<f64> = (5..9).map(|i| day(f64::from(i))).collect();
    let source = MockSource::default()
        .with_year(&url(2015), &first)
        .with_year(&url(2016), &second);
    let retriever = PierDataRetriever::new(&source, PierConfig::new(TEMPLATE));

    // Caller fixes the start; the end defaults to 2015's maximum for both years
    let record = retriever.fetch_year_range(2015, 2016, Some(day(1.5)), None)?;
    assert_eq!(record.dnum.to_vec(), vec![day(2.0), day(3.0)]);
    Ok(())
}

#[test]
fn test_widest_year_range_does_not_overflow() {
    let source = MockSource::default();
    let retriever = PierDataRetriever::new(&source, PierConfig::new(TEMPLATE));

    match retriever.fetch_year_range(i32::MIN, i32::MAX, None, None) {
        Err(PierDataError::RemoteAccess { url: failed, .. }) => {
            assert_eq!(failed, url(i32::MIN))
        }
        other => panic!("Expected RemoteAccess error, got {:?}", other),
    }
    assert_eq!(source.call_count(), 1);
}

#[test]
fn test_per_year_bounds_policy() -> Result<()> {
    let first: Vec<f64> = (0..5).map(|i| day(f64::from(i))).collect();
    let second: Vec<f64> = (5..9).map(|i| day(f64::from(i))).collect();
    let source = MockSource::default()
        .with_year(&url(2015), &first)
        .with_year(&url(2016), &second);
    let config = PierConfig::new(TEMPLATE).with_bounds_policy(BoundsPolicy::PerYear);
    let retriever = PierDataRetriever::new(&source, config);

    let record = retriever.fetch_year_range(2015, 2016, None, None)?;
    assert_aligned(&record);
    assert_eq!(
        record.dnum.to_vec(),
        vec![day(1.0), day(2.0), day(3.0), day(6.0), day(7.0)]
    );
    assert!(record.dnum.windows(2).into_iter().all(|w| w[0] <= w[1]));
    Ok(())
}

#[test]
fn test_explicit_bounds_merge_in_year_order() -> Result<()> {
    let first: Vec<f64> = (0..5).map(|i| day(f64::from(i) * 0.5)).collect();
    let second: Vec<f64> = (5..10).map(|i| day(f64::from(i) * 0.5)).collect();
    let source = MockSource::default()
        .with_year(&url(2015), &first)
        .with_year(&url(2016), &second);
    let retriever = PierDataRetriever::new(&source, PierConfig::new(TEMPLATE));

    let record = retriever.fetch_year_range(2015, 2016, Some(day(0.0)), Some(day(5.0)))?;
    assert_aligned(&record);
    assert_eq!(record.len(), 9);
    assert!(record.dnum.windows(2).into_iter().all(|w| w[0] <= w[1]));
    assert_eq!(record.temperature[3], 14.0);
    assert_eq!(record.temperature[4], 10.0);
    Ok(())
}

#[test]
fn test_single_year_range_matches_single_year_fetch() -> Result<()> {
    let days = [day(0.0), day(0.25), day(0.5), day(1.0), day(2.0), day(2.5)];
    let source = MockSource::default().with_year(&url(2015), &days);
    let config = PierConfig::new(TEMPLATE).with_single_year(2015);
    let retriever = PierDataRetriever::new(&source, config);

    let single = retriever.fetch_single_year(None, None)?;
    let ranged = retriever.fetch_year_range(2015, 2015, None, None)?;
    assert_eq!(single.dnum, ranged.dnum);
    assert_eq!(single.temperature, ranged.temperature);
    assert_eq!(single.pressure, ranged.pressure);
    Ok(())
}

#[test]
fn test_failure_on_any_year_aborts() {
    let first: Vec<f64> = (0..5).map(|i| day(f64::from(i))).collect();
    let third: Vec<f64> = (10..15).map(|i| day(f64::from(i))).collect();
    let source = MockSource::default()
        .with_year(&url(2015), &first)
        .with_year(&url(2017), &third);
    let retriever = PierDataRetriever::new(&source, PierConfig::new(TEMPLATE));

    let err = retriever
        .fetch_year_range(2015, 2017, None, None)
        .expect_err("2016 is missing");
    match err {
        PierDataError::RemoteAccess { url: failed, .. } => assert_eq!(failed, url(2016)),
        other => panic!("Expected RemoteAccess error, got {:?}", other),
    }
    // Nothing after the failing year is fetched
    assert_eq!(*source.calls.borrow(), vec![url(2015), url(2016)]);
}

#[test]
fn test_empty_first_year_does_not_fix_bounds() -> Result<()> {
    let second: Vec<f64> = (5..9).map(|i| day(f64::from(i))).collect();
    let source = MockSource::default()
        .with_year(&url(2015), &[])
        .with_year(&url(2016), &second);
    let retriever = PierDataRetriever::new(&source, PierConfig::new(TEMPLATE));

    let record = retriever.fetch_year_range(2015, 2016, None, None)?;
    assert_eq!(record.dnum.to_vec(), vec![day(6.0), day(7.0)]);
    Ok(())
}
