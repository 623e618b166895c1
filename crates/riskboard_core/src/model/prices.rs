//! Date-indexed price tables
//!
//! A `PriceTable` is the raw close-price table as delivered by a provider (or
//! the synthetic fallback). A `NormalizedSeries` has the same shape with every
//! column rebased to 100 on the first date. Missing observations are `NaN`.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// One ticker's values, aligned with the owning table's date index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceColumn {
    pub ticker: String,
    pub values: Vec<f64>,
}

impl PriceColumn {
    pub fn new(ticker: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            ticker: ticker.into(),
            values,
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Number of non-NaN observations
    #[must_use]
    pub fn observed(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }
}

/// Close prices, outer-joined on a shared ascending date index.
///
/// Columns keep the order they were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    dates: Vec<Date>,
    columns: Vec<PriceColumn>,
}

impl PriceTable {
    #[must_use]
    pub fn new(dates: Vec<Date>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    /// Add a column (builder style)
    #[must_use]
    pub fn with_column(mut self, ticker: impl Into<String>, values: Vec<f64>) -> Self {
        self.push_column(ticker, values);
        self
    }

    /// Add a column, replacing any existing column for the same ticker in place
    pub fn push_column(&mut self, ticker: impl Into<String>, values: Vec<f64>) {
        let column = PriceColumn::new(ticker, values);
        match self.columns.iter_mut().find(|c| c.ticker == column.ticker) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn columns(&self) -> &[PriceColumn] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, ticker: &str) -> Option<&PriceColumn> {
        self.columns.iter().find(|c| c.ticker == ticker)
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.ticker.as_str())
    }

    /// Number of rows (dates)
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Keep only the given tickers, in this table's column order
    #[must_use]
    pub(crate) fn retain_tickers(mut self, tickers: &[String]) -> Self {
        self.columns.retain(|c| tickers.contains(&c.ticker));
        self
    }
}

/// Price table rebased so that every column starts at exactly 100.0
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    dates: Vec<Date>,
    columns: Vec<PriceColumn>,
}

impl NormalizedSeries {
    pub(crate) fn new(dates: Vec<Date>, columns: Vec<PriceColumn>) -> Self {
        Self { dates, columns }
    }

    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    #[must_use]
    pub fn columns(&self) -> &[PriceColumn] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, ticker: &str) -> Option<&PriceColumn> {
        self.columns.iter().find(|c| c.ticker == ticker)
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.ticker.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
