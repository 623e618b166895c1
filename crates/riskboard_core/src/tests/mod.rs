//! Tests for the dashboard pipeline
//!
//! Tests are organized by topic:
//! - `normalization` - Base-100 rebasing and provider table validation
//! - `fallback` - Synthetic price table used when fetching fails
//! - `encoding` - Categories, colors, marker sizes and z-orders
//! - `layout` - Grid, scatter, line chart and sidebar content of the plan
//! - `sidebar` - Sidebar cursor placement and overflow detection
//! - `renderer` - End-to-end orchestration against recording surfaces

mod encoding;
mod normalization;
mod renderer;

use jiff::ToSpan;
use jiff::civil::{Date, date};

use crate::model::PriceTable;

pub(crate) fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub(crate) fn dates(n: usize) -> Vec<Date> {
    date(2024, 6, 3).series(1.day()).take(n).collect()
}

/// Three-day close table for the demo tickers, in a non-alphabetical order
pub(crate) fn demo_closes() -> PriceTable {
    PriceTable::new(dates(3))
        .with_column("TTE.PA", vec![60.0, 61.2, 62.0])
        .with_column("UBI.PA", vec![20.0, 15.0, 10.0])
        .with_column("MC.PA", vec![700.0, 680.0, 623.4])
        .with_column("SAN.PA", vec![90.0, f64::NAN, 89.1])
}
