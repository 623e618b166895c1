use std::path::Path;

use riskboard_core::{
    AssetRecord, CategoryRules, DashboardRenderer, DataError, MetricsStore, PortfolioMetrics,
    Theme,
};
use serde::{Deserialize, Serialize};

use super::{LoadError, read_yaml};

/// Portfolio definition file.
///
/// ```yaml
/// portfolio:
///   annualized_return: -0.1461
///   annualized_volatility: 0.2212
///   sharpe_ratio: -0.8
/// assets:
///   - ticker: UBI.PA
///     display_name: Ubisoft
///     period_return: -0.545027
///     period_volatility: 0.633064
/// categories:            # optional, defaults to the built-in rules
///   - pattern: UBI
///     category: Focus
/// theme:                 # optional, any subset of colors
///   alert_color: "#FF5252"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioFile {
    pub portfolio: PortfolioMetrics,
    pub assets: Vec<AssetRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl PortfolioFile {
    /// Built-in demo portfolio
    pub fn demo() -> Self {
        let store = MetricsStore::demo();
        Self {
            portfolio: *store.portfolio(),
            assets: store.assets().to_vec(),
            categories: None,
            theme: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        read_yaml(path)
    }

    pub fn from_yaml(content: &str) -> Result<Self, LoadError> {
        serde_saphyr::from_str(content)
            .map_err(|e| LoadError::Parse(format!("Failed to parse portfolio: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, LoadError> {
        serde_saphyr::to_string(self)
            .map_err(|e| LoadError::Serialize(format!("Failed to serialize portfolio: {}", e)))
    }

    /// Validate the asset list into a store
    pub fn to_store(&self) -> Result<MetricsStore, DataError> {
        MetricsStore::new(self.assets.clone(), self.portfolio)
    }

    /// Apply the file's category rules and theme overrides to `renderer`
    pub fn configure(&self, mut renderer: DashboardRenderer) -> DashboardRenderer {
        if let Some(rules) = &self.categories {
            renderer = renderer.with_rules(rules.clone());
        }
        if let Some(theme) = self.theme {
            renderer = renderer.with_theme(theme);
        }
        renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskboard_core::{AssetCategory, Color, DataError};

    const SAMPLE: &str = r##"
portfolio:
  annualized_return: 0.05
  annualized_volatility: 0.18
  sharpe_ratio: 0.28
assets:
  - ticker: AIR.PA
    display_name: Airbus
    period_return: 0.12
    period_volatility: 0.25
  - ticker: BNP.PA
    display_name: BNP Paribas
    period_return: -0.04
    period_volatility: 0.3
categories:
  - pattern: BNP
    category: Focus
theme:
  alert_color: "#AA0000"
"##;

    #[test]
    fn test_parse_portfolio_file() {
        let file = PortfolioFile::from_yaml(SAMPLE).unwrap();

        assert_eq!(file.assets.len(), 2);
        assert_eq!(file.assets[1].display_name, "BNP Paribas");
        assert_eq!(file.portfolio.sharpe_ratio, 0.28);

        let rules = file.categories.as_ref().unwrap();
        assert_eq!(rules.classify("BNP.PA"), AssetCategory::Focus);

        // Unlisted theme fields keep their defaults
        let theme = file.theme.unwrap();
        assert_eq!(theme.alert_color, Color::rgb(0xAA, 0x00, 0x00));
        assert_eq!(theme.positive_color, Theme::default().positive_color);
    }

    #[test]
    fn test_demo_round_trip() {
        let demo = PortfolioFile::demo();
        let yaml = demo.to_yaml().unwrap();
        let parsed = PortfolioFile::from_yaml(&yaml).unwrap();

        assert_eq!(parsed, demo);
        assert_eq!(parsed.to_store().unwrap(), MetricsStore::demo());
    }

    #[test]
    fn test_duplicate_tickers_rejected() {
        let mut file = PortfolioFile::demo();
        file.assets.push(file.assets[0].clone());

        assert_eq!(
            file.to_store(),
            Err(DataError::DuplicateTicker("UBI.PA".into()))
        );
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let result = PortfolioFile::from_yaml("assets: [unterminated");
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PortfolioFile::load(&dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
