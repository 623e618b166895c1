//! Price fetching, fallback and base-100 normalization
//!
//! `PriceNormalizer::fetch_and_normalize` is the only entry point the renderer
//! uses. It asks the provider once, validates the answer, swaps in the
//! synthetic table if anything is wrong, and rebases every column to 100.
//!
//! The table handed to `normalize` is always either entirely real or entirely
//! synthetic.

use std::fmt;

use jiff::ToSpan;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::config::{FallbackConfig, FetchConfig};
use crate::error::{DataError, FetchError, Result};
use crate::model::{NormalizedSeries, PriceColumn, PriceTable};
use crate::provider::{FetchResult, MarketDataProvider, PriceRequest};

/// Where the normalized prices came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Market { provider: String },
    Synthetic { reason: FetchError },
}

impl DataSource {
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        matches!(self, DataSource::Synthetic { .. })
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Market { provider } => write!(f, "market data ({provider})"),
            DataSource::Synthetic { reason } => write!(f, "synthetic data ({reason})"),
        }
    }
}

/// Normalized prices plus the record of which source produced them
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPrices {
    pub series: NormalizedSeries,
    pub source: DataSource,
}

#[derive(Debug, Clone, Default)]
pub struct PriceNormalizer {
    config: FetchConfig,
}

impl PriceNormalizer {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch closes for `tickers`, falling back to synthetic prices on any
    /// fetch failure, then rebase to 100.
    ///
    /// Only bad input reaches the caller (`DataError`); provider failures
    /// never do.
    pub fn fetch_and_normalize<P>(
        &self,
        provider: &P,
        tickers: &[String],
    ) -> Result<NormalizedPrices>
    where
        P: MarketDataProvider + ?Sized,
    {
        let request = self.config.request(tickers.to_vec());

        let (table, source) = match fetch(provider, &request) {
            FetchResult::Ok(table) => (
                table,
                DataSource::Market {
                    provider: provider.name().to_string(),
                },
            ),
            FetchResult::Failed(reason) => {
                tracing::debug!(
                    provider = provider.name(),
                    %reason,
                    "fetch failed, using synthetic prices"
                );
                (
                    synthetic_table(tickers, &self.config.fallback),
                    DataSource::Synthetic { reason },
                )
            }
        };

        let series = normalize(&table)?;
        Ok(NormalizedPrices { series, source })
    }
}

/// Ask the provider once and validate whatever comes back
pub fn fetch<P>(provider: &P, request: &PriceRequest) -> FetchResult
where
    P: MarketDataProvider + ?Sized,
{
    provider
        .fetch_closes(request)
        .and_then(|table| validate(request, table))
        .into()
}

/// Check a provider table against the request.
///
/// Columns that were not requested are dropped; the provider's column order is
/// kept for the requested ones.
pub fn validate(
    request: &PriceRequest,
    table: PriceTable,
) -> std::result::Result<PriceTable, FetchError> {
    if table.is_empty() {
        return Err(FetchError::Empty);
    }
    if !table.dates().windows(2).all(|pair| pair[0] < pair[1]) {
        return Err(FetchError::UnsortedDates);
    }

    let expected = table.len();
    for ticker in &request.tickers {
        let column = table
            .column(ticker)
            .ok_or_else(|| FetchError::MissingColumn(ticker.clone()))?;
        if column.values.len() != expected {
            return Err(FetchError::LengthMismatch {
                ticker: ticker.clone(),
                expected,
                actual: column.values.len(),
            });
        }
        if column.observed() == 0 {
            return Err(FetchError::AllMissing(ticker.clone()));
        }
        if column.first().is_some_and(f64::is_nan) {
            return Err(FetchError::MissingBasePrice(ticker.clone()));
        }
    }

    Ok(table.retain_tickers(&request.tickers))
}

/// Deterministic stand-in table used when the provider fails.
///
/// Depends only on the ticker list and `config`. Each column is a geometric
/// random walk starting at `start_price`; column `i` draws from its own
/// `SmallRng` seeded with `seed + i`, so adding a ticker never changes the
/// others' paths.
#[must_use]
pub fn synthetic_table(tickers: &[String], config: &FallbackConfig) -> PriceTable {
    const DEFAULT_START_PRICE: f64 = 100.0;

    let dates: Vec<_> = config
        .start_date
        .series(1.day())
        .take(config.days.max(1))
        .collect();

    let start_price = if config.start_price.is_finite() && config.start_price > 0.0 {
        config.start_price
    } else {
        DEFAULT_START_PRICE
    };
    let returns = Normal::new(config.daily_drift, config.daily_volatility).ok();

    let mut table = PriceTable::new(dates);
    let rows = table.len();
    for (idx, ticker) in tickers.iter().enumerate() {
        let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(idx as u64));
        let mut price = start_price;
        let mut values = Vec::with_capacity(rows);
        values.push(price);
        for _ in 1..rows {
            if let Some(dist) = &returns {
                price *= dist.sample(&mut rng).exp();
            }
            values.push(price);
        }
        table.push_column(ticker.clone(), values);
    }
    table
}

/// Rebase every column so its first value is exactly 100.0.
///
/// Input NaNs stay NaN. A zero first value is `ZeroBasePrice`; a NaN, infinite
/// or negative one is `InvalidBasePrice`.
pub fn normalize(table: &PriceTable) -> Result<NormalizedSeries> {
    let columns = table
        .columns()
        .iter()
        .map(normalize_column)
        .collect::<Result<Vec<_>>>()?;
    Ok(NormalizedSeries::new(table.dates().to_vec(), columns))
}

fn normalize_column(column: &PriceColumn) -> Result<PriceColumn> {
    let Some(base) = column.first() else {
        return Ok(column.clone());
    };
    if base == 0.0 {
        return Err(DataError::ZeroBasePrice {
            ticker: column.ticker.clone(),
        });
    }
    if !base.is_finite() || base < 0.0 {
        return Err(DataError::InvalidBasePrice {
            ticker: column.ticker.clone(),
            value: base,
        });
    }

    let values = column.values.iter().map(|v| v / base * 100.0).collect();
    Ok(PriceColumn::new(column.ticker.clone(), values))
}
