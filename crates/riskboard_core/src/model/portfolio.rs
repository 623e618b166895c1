use serde::{Deserialize, Serialize};

use crate::format::{format_percentage, format_ratio};

/// Portfolio-level statistics, supplied precomputed and used for display only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
}

impl PortfolioMetrics {
    #[must_use]
    pub fn new(annualized_return: f64, annualized_volatility: f64, sharpe_ratio: f64) -> Self {
        Self {
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
        }
    }

    /// Label/value pairs in sidebar order
    #[must_use]
    pub fn display_rows(&self) -> [(&'static str, String); 3] {
        [
            ("Annualized Return", format_percentage(self.annualized_return, 2)),
            (
                "Annualized Volatility",
                format_percentage(self.annualized_volatility, 2),
            ),
            ("Sharpe Ratio", format_ratio(self.sharpe_ratio)),
        ]
    }
}
