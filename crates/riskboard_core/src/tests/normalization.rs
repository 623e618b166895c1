//! Tests for base-100 normalization and provider table validation
//!
//! These tests verify that:
//! - Every normalized column starts at exactly 100.0
//! - Ordering within a column is preserved and NaNs pass through untouched
//! - Zero, negative and missing first prices are rejected as data errors
//! - Malformed provider tables are turned into fetch errors

use jiff::ToSpan;

use super::{dates, demo_closes};
use crate::config::FetchConfig;
use crate::error::{DataError, FetchError};
use crate::model::PriceTable;
use crate::normalize::{DataSource, PriceNormalizer, fetch, normalize, validate};
use crate::provider::{FetchResult, PriceRequest, StaticProvider};

fn request(tickers: &[&str]) -> PriceRequest {
    PriceRequest::new(
        tickers.iter().map(|t| t.to_string()).collect(),
        1.year(),
        1.day(),
    )
}

#[test]
fn test_normalize_simple_series() {
    let table = PriceTable::new(dates(3)).with_column("X", vec![50.0, 100.0, 150.0]);
    let normalized = normalize(&table).unwrap();

    assert_eq!(
        normalized.column("X").unwrap().values,
        vec![100.0, 200.0, 300.0]
    );
}

#[test]
fn test_every_column_starts_at_100() {
    let normalized = normalize(&demo_closes()).unwrap();

    assert_eq!(normalized.columns().len(), 4);
    for column in normalized.columns() {
        assert_eq!(column.values[0], 100.0, "{} base", column.ticker);
    }
}

#[test]
fn test_normalize_preserves_order() {
    let prices = vec![3.7, 1.2, 9.9, 4.4, 0.5, 7.1];
    let table = PriceTable::new(dates(prices.len())).with_column("X", prices.clone());
    let normalized = normalize(&table).unwrap();
    let values = &normalized.column("X").unwrap().values;

    for i in 0..prices.len() {
        for j in 0..prices.len() {
            if prices[i] < prices[j] {
                assert!(values[i] < values[j], "order broken at ({i}, {j})");
            }
        }
    }
}

#[test]
fn test_normalize_keeps_nan_as_nan() {
    let normalized = normalize(&demo_closes()).unwrap();
    let san = normalized.column("SAN.PA").unwrap();

    assert_eq!(san.values[0], 100.0);
    assert!(san.values[1].is_nan());
    assert!((san.values[2] - 99.0).abs() < 1e-9);
}

#[test]
fn test_zero_first_price_is_data_error() {
    let table = PriceTable::new(dates(2))
        .with_column("OK", vec![10.0, 11.0])
        .with_column("ZERO", vec![0.0, 5.0]);

    assert_eq!(
        normalize(&table),
        Err(DataError::ZeroBasePrice {
            ticker: "ZERO".into()
        })
    );
}

#[test]
fn test_invalid_first_price_is_data_error() {
    let negative = PriceTable::new(dates(2)).with_column("NEG", vec![-2.0, 5.0]);
    assert!(matches!(
        normalize(&negative),
        Err(DataError::InvalidBasePrice { ref ticker, value }) if ticker == "NEG" && value == -2.0
    ));

    let missing = PriceTable::new(dates(2)).with_column("LATE", vec![f64::NAN, 5.0]);
    assert!(matches!(
        normalize(&missing),
        Err(DataError::InvalidBasePrice { ref ticker, .. }) if ticker == "LATE"
    ));
}

#[test]
fn test_normalize_keeps_dates_and_column_order() {
    let table = demo_closes();
    let normalized = normalize(&table).unwrap();

    assert_eq!(normalized.dates(), table.dates());
    assert_eq!(
        normalized.tickers().collect::<Vec<_>>(),
        vec!["TTE.PA", "UBI.PA", "MC.PA", "SAN.PA"]
    );
}

#[test]
fn test_validate_rejects_malformed_tables() {
    let req = request(&["A", "B"]);

    assert_eq!(
        validate(&req, PriceTable::default()),
        Err(FetchError::Empty)
    );

    let mut unsorted_dates = dates(3);
    unsorted_dates.swap(0, 2);
    let unsorted = PriceTable::new(unsorted_dates)
        .with_column("A", vec![1.0, 2.0, 3.0])
        .with_column("B", vec![1.0, 2.0, 3.0]);
    assert_eq!(validate(&req, unsorted), Err(FetchError::UnsortedDates));

    let missing = PriceTable::new(dates(3)).with_column("A", vec![1.0, 2.0, 3.0]);
    assert_eq!(
        validate(&req, missing),
        Err(FetchError::MissingColumn("B".into()))
    );

    let short = PriceTable::new(dates(3))
        .with_column("A", vec![1.0, 2.0, 3.0])
        .with_column("B", vec![1.0]);
    assert_eq!(
        validate(&req, short),
        Err(FetchError::LengthMismatch {
            ticker: "B".into(),
            expected: 3,
            actual: 1
        })
    );

    let blank = PriceTable::new(dates(3))
        .with_column("A", vec![1.0, 2.0, 3.0])
        .with_column("B", vec![f64::NAN; 3]);
    assert_eq!(
        validate(&req, blank),
        Err(FetchError::AllMissing("B".into()))
    );

    let late_start = PriceTable::new(dates(3))
        .with_column("A", vec![1.0, 2.0, 3.0])
        .with_column("B", vec![f64::NAN, 2.0, 3.0]);
    assert_eq!(
        validate(&req, late_start),
        Err(FetchError::MissingBasePrice("B".into()))
    );
}

#[test]
fn test_validate_drops_unrequested_columns() {
    let table = PriceTable::new(dates(2))
        .with_column("B", vec![1.0, 2.0])
        .with_column("EXTRA", vec![1.0])
        .with_column("A", vec![3.0, 4.0]);

    let validated = validate(&request(&["A", "B"]), table).unwrap();
    assert_eq!(validated.tickers().collect::<Vec<_>>(), vec!["B", "A"]);
}

#[test]
fn test_fetch_classifies_provider_answer() {
    let provider = StaticProvider::new(demo_closes());

    let ok = fetch(&provider, &request(&["UBI.PA", "TTE.PA"]));
    assert!(matches!(ok, FetchResult::Ok(ref t) if t.columns().len() == 2));

    let failed = fetch(&provider, &request(&["UBI.PA", "AIR.PA"]));
    assert_eq!(
        failed,
        FetchResult::Failed(FetchError::MissingColumn("AIR.PA".into()))
    );
}

#[test]
fn test_fetch_and_normalize_uses_market_data() {
    let normalizer = PriceNormalizer::new(FetchConfig::default());
    let tickers: Vec<String> = ["UBI.PA", "MC.PA", "SAN.PA", "TTE.PA"]
        .iter()
        .map(|t| t.to_string())
        .collect();

    let prices = normalizer
        .fetch_and_normalize(&StaticProvider::new(demo_closes()), &tickers)
        .unwrap();

    assert_eq!(
        prices.source,
        DataSource::Market {
            provider: "static".into()
        }
    );
    assert_eq!(prices.series.len(), 3);
    let ubi = prices.series.column("UBI.PA").unwrap();
    assert_eq!(ubi.values, vec![100.0, 75.0, 50.0]);
}

#[test]
fn test_fetch_and_normalize_surfaces_zero_base() {
    let table = PriceTable::new(dates(2)).with_column("X", vec![0.0, 1.0]);
    let result = PriceNormalizer::default()
        .fetch_and_normalize(&StaticProvider::new(table), &["X".to_string()]);

    assert_eq!(
        result,
        Err(DataError::ZeroBasePrice { ticker: "X".into() })
    );
}
