//! Market-data provider seam
//!
//! The dashboard never talks to a data vendor directly. It hands a
//! `PriceRequest` to a `MarketDataProvider` and gets back either a close-price
//! table or a `FetchError`. Every failure is treated the same way downstream.

use std::time::Duration;

use jiff::Span;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::model::PriceTable;

/// One history request: which tickers, how far back, how often
#[derive(Debug, Clone)]
pub struct PriceRequest {
    pub tickers: Vec<String>,
    pub period: Span,
    pub interval: Span,
    /// Providers report `FetchError::Timeout` past this limit
    pub timeout: Option<Duration>,
}

impl PriceRequest {
    pub fn new(tickers: Vec<String>, period: Span, interval: Span) -> Self {
        Self {
            tickers,
            period,
            interval,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl FetchConfig {
    /// Build the request for `tickers` from this config
    #[must_use]
    pub fn request(&self, tickers: Vec<String>) -> PriceRequest {
        PriceRequest::new(tickers, self.period, self.interval).with_timeout(self.timeout)
    }
}

/// Source of date-indexed close prices
pub trait MarketDataProvider {
    /// Fetch one close-price column per requested ticker.
    ///
    /// Implementations may return extra columns or columns in any order; the
    /// normalizer validates and trims the table.
    fn fetch_closes(&self, request: &PriceRequest) -> Result<PriceTable, FetchError>;

    /// Short human-readable name, used in logs and the plan's data source
    fn name(&self) -> &str;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for &P {
    fn fetch_closes(&self, request: &PriceRequest) -> Result<PriceTable, FetchError> {
        (**self).fetch_closes(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Box<P> {
    fn fetch_closes(&self, request: &PriceRequest) -> Result<PriceTable, FetchError> {
        (**self).fetch_closes(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Outcome of one fetch attempt, after schema validation
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Ok(PriceTable),
    Failed(FetchError),
}

impl From<Result<PriceTable, FetchError>> for FetchResult {
    fn from(result: Result<PriceTable, FetchError>) -> Self {
        match result {
            Ok(table) => FetchResult::Ok(table),
            Err(reason) => FetchResult::Failed(reason),
        }
    }
}

/// Provider with no data source at all; every request fails
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl MarketDataProvider for OfflineProvider {
    fn fetch_closes(&self, _request: &PriceRequest) -> Result<PriceTable, FetchError> {
        Err(FetchError::Unavailable("no market data source configured".into()))
    }

    fn name(&self) -> &str {
        "offline"
    }
}

/// Provider that answers every request with the same in-memory table
#[derive(Debug, Clone)]
pub struct StaticProvider {
    table: PriceTable,
}

impl StaticProvider {
    pub fn new(table: PriceTable) -> Self {
        Self { table }
    }
}

impl MarketDataProvider for StaticProvider {
    fn fetch_closes(&self, _request: &PriceRequest) -> Result<PriceTable, FetchError> {
        Ok(self.table.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
