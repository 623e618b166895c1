use rustc_hash::FxHashSet;

use crate::error::{DataError, Result};
use crate::model::{AssetRecord, PortfolioMetrics};

/// Read-only holder of the precomputed per-asset and portfolio statistics.
///
/// Assets keep their input order; it drives scatter, sidebar and request order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsStore {
    assets: Vec<AssetRecord>,
    portfolio: PortfolioMetrics,
}

impl MetricsStore {
    /// Rejects an empty asset list and duplicate tickers
    pub fn new(assets: Vec<AssetRecord>, portfolio: PortfolioMetrics) -> Result<Self> {
        if assets.is_empty() {
            return Err(DataError::NoAssets);
        }
        let mut seen = FxHashSet::default();
        for asset in &assets {
            if !seen.insert(asset.ticker.as_str()) {
                return Err(DataError::DuplicateTicker(asset.ticker.clone()));
            }
        }
        Ok(Self { assets, portfolio })
    }

    /// Four-stock Paris portfolio the report was first built around
    #[must_use]
    pub fn demo() -> Self {
        Self {
            assets: vec![
                AssetRecord::new("UBI.PA", "Ubisoft", -0.545027, 0.633064),
                AssetRecord::new("MC.PA", "LVMH", -0.110825, 0.299895),
                AssetRecord::new("SAN.PA", "Sanofi", -0.009974, 0.223055),
                AssetRecord::new("TTE.PA", "TotalEnergies", 0.081493, 0.200090),
            ],
            portfolio: PortfolioMetrics::new(-0.1461, 0.2212, -0.80),
        }
    }

    #[must_use]
    pub fn assets(&self) -> &[AssetRecord] {
        &self.assets
    }

    #[must_use]
    pub fn portfolio(&self) -> &PortfolioMetrics {
        &self.portfolio
    }

    #[must_use]
    pub fn asset(&self, ticker: &str) -> Option<&AssetRecord> {
        self.assets.iter().find(|a| a.ticker == ticker)
    }

    /// Like `asset`, but a missing ticker is `MissingMetrics`
    pub fn require(&self, ticker: &str) -> Result<&AssetRecord> {
        self.asset(ticker)
            .ok_or_else(|| DataError::MissingMetrics(ticker.to_string()))
    }

    #[must_use]
    pub fn tickers(&self) -> Vec<String> {
        self.assets.iter().map(|a| a.ticker.clone()).collect()
    }
}
