use serde::{Deserialize, Serialize};

/// Precomputed statistics for one security over the reporting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub ticker: String,
    pub display_name: String,
    /// Period return as a fraction (-0.25 = -25%)
    pub period_return: f64,
    /// Period volatility as a fraction
    pub period_volatility: f64,
}

impl AssetRecord {
    pub fn new(
        ticker: impl Into<String>,
        display_name: impl Into<String>,
        period_return: f64,
        period_volatility: f64,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            display_name: display_name.into(),
            period_return,
            period_volatility,
        }
    }

    /// Ticker without its exchange suffix ("MC.PA" -> "MC")
    #[must_use]
    pub fn base_ticker(&self) -> &str {
        self.ticker
            .split_once('.')
            .map_or(self.ticker.as_str(), |(base, _)| base)
    }

    #[must_use]
    pub fn is_gainer(&self) -> bool {
        self.period_return >= 0.0
    }
}
