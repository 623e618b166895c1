use std::path::{Path, PathBuf};
use std::time::Instant;

use jiff::civil::Date;
use riskboard_core::{FetchError, MarketDataProvider, PriceRequest, PriceTable};
use serde::{Deserialize, Serialize};

use super::{LoadError, read_yaml};

/// Close-price history file.
///
/// ```yaml
/// dates: [2025-01-02, 2025-01-03]
/// columns:
///   - ticker: UBI.PA
///     closes: [21.4, null]
/// ```
///
/// `null` marks a missing observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFile {
    pub dates: Vec<Date>,
    pub columns: Vec<PriceFileColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFileColumn {
    pub ticker: String,
    pub closes: Vec<Option<f64>>,
}

impl PriceFile {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        read_yaml(path)
    }

    pub fn into_table(self) -> PriceTable {
        let mut table = PriceTable::new(self.dates);
        for column in self.columns {
            let values = column
                .closes
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            table.push_column(column.ticker, values);
        }
        table
    }
}

/// Market-data provider backed by a local price file.
///
/// The file is re-read on every request; rows older than the requested period
/// (counted back from the file's last date) are dropped, and rows closer
/// together than the requested interval are thinned out.
#[derive(Debug, Clone)]
pub struct FilePriceProvider {
    path: PathBuf,
}

impl FilePriceProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MarketDataProvider for FilePriceProvider {
    fn fetch_closes(&self, request: &PriceRequest) -> Result<PriceTable, FetchError> {
        let started = Instant::now();

        let file =
            PriceFile::load(&self.path).map_err(|e| FetchError::Unavailable(e.to_string()))?;
        let table = select_rows(file.into_table(), request);

        if let Some(limit) = request.timeout.filter(|limit| started.elapsed() > *limit) {
            return Err(FetchError::Timeout(limit));
        }

        tracing::debug!(
            path = %self.path.display(),
            rows = table.len(),
            "loaded price file"
        );
        Ok(table)
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Keep the rows inside the requested period, at least one interval apart.
///
/// Tables with an out-of-order date index, and columns whose length does not
/// match the date index, are left as they are so validation can report them.
fn select_rows(table: PriceTable, request: &PriceRequest) -> PriceTable {
    if !table.dates().windows(2).all(|pair| pair[0] < pair[1]) {
        return table;
    }
    let Some(&last) = table.dates().last() else {
        return table;
    };
    let cutoff = last.checked_sub(request.period).ok();

    let mut keep = Vec::new();
    let mut next_allowed: Option<Date> = None;
    for (idx, &date) in table.dates().iter().enumerate() {
        if cutoff.is_some_and(|c| date < c) {
            continue;
        }
        if next_allowed.is_some_and(|n| date < n) {
            continue;
        }
        keep.push(idx);
        next_allowed = date.checked_add(request.interval).ok();
    }

    let rows = table.len();
    let mut selected = PriceTable::new(keep.iter().map(|&i| table.dates()[i]).collect());
    for column in table.columns() {
        let values = if column.values.len() == rows {
            keep.iter().map(|&i| column.values[i]).collect()
        } else {
            column.values.clone()
        };
        selected.push_column(column.ticker.clone(), values);
    }
    selected
}
