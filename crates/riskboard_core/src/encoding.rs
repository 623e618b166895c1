//! Visual encoding rules
//!
//! Maps tickers and statistics to draw attributes. Every function here is pure:
//! the same ticker and return always produce the same attributes.
//!
//! Category matching happens once, in `CategoryMap::build`; color, size,
//! z-order and sidebar coloring all read the resulting map.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::Theme;
use crate::error::{DataError, Result};
use crate::model::{AssetRecord, Color};

/// Visual role of an asset in the report.
///
/// Variant order is match priority: a ticker matching both a `Focus` and a
/// `Hedge` pattern is `Focus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetCategory {
    Focus,
    Hedge,
    Neutral1,
    Neutral2,
    Other,
}

impl AssetCategory {
    /// Color name used in commentary
    #[must_use]
    pub fn color_name(self) -> &'static str {
        match self {
            AssetCategory::Focus => "Red",
            AssetCategory::Hedge => "Green",
            AssetCategory::Neutral1 => "Gold",
            AssetCategory::Neutral2 => "Blue",
            AssetCategory::Other => "Grey",
        }
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        matches!(self, AssetCategory::Neutral1 | AssetCategory::Neutral2)
    }
}

/// Substring pattern assigning a category to matching tickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: AssetCategory,
}

impl CategoryRule {
    pub fn new(pattern: impl Into<String>, category: AssetCategory) -> Self {
        Self {
            pattern: pattern.into(),
            category,
        }
    }

    #[must_use]
    pub fn matches(&self, ticker: &str) -> bool {
        !self.pattern.is_empty() && ticker.contains(&self.pattern)
    }
}

/// Ordered rule list, always kept sorted by category priority.
///
/// Rules of the same category keep their relative order. Serialized as a plain
/// list of rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CategoryRule>", into = "Vec<CategoryRule>")]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    pub fn new(mut rules: Vec<CategoryRule>) -> Self {
        rules.sort_by_key(|rule| rule.category);
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// First matching rule in priority order, `Other` if none
    #[must_use]
    pub fn classify(&self, ticker: &str) -> AssetCategory {
        self.rules
            .iter()
            .find(|rule| rule.matches(ticker))
            .map_or(AssetCategory::Other, |rule| rule.category)
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new(vec![
            CategoryRule::new("UBI", AssetCategory::Focus),
            CategoryRule::new("TTE", AssetCategory::Hedge),
            CategoryRule::new("MC", AssetCategory::Neutral1),
            CategoryRule::new("SAN", AssetCategory::Neutral2),
        ])
    }
}

impl From<Vec<CategoryRule>> for CategoryRules {
    fn from(rules: Vec<CategoryRule>) -> Self {
        Self::new(rules)
    }
}

impl From<CategoryRules> for Vec<CategoryRule> {
    fn from(rules: CategoryRules) -> Self {
        rules.rules
    }
}

/// Ticker -> category, resolved once for a known asset list.
///
/// Tickers outside the list are classified on demand with the same rules.
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    rules: CategoryRules,
    resolved: FxHashMap<String, AssetCategory>,
}

impl CategoryMap {
    pub fn build<'a>(rules: CategoryRules, tickers: impl IntoIterator<Item = &'a str>) -> Self {
        let resolved = tickers
            .into_iter()
            .map(|ticker| (ticker.to_string(), rules.classify(ticker)))
            .collect();
        Self { rules, resolved }
    }

    #[must_use]
    pub fn get(&self, ticker: &str) -> AssetCategory {
        self.resolved
            .get(ticker)
            .copied()
            .unwrap_or_else(|| self.rules.classify(ticker))
    }

    #[must_use]
    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }
}

/// Draw attributes for one asset, recomputed for every render
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualAttributes {
    pub category: AssetCategory,
    /// Line and sidebar color
    pub color: Color,
    /// Scatter fill, by sign of return
    pub marker_color: Color,
    pub marker_size: f64,
    pub z_order: i32,
    pub line_width: f64,
}

pub const FOCUS_MARKER_SIZE: f64 = 200.0;
pub const MARKER_SIZE: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct VisualEncoder {
    theme: Theme,
    categories: CategoryMap,
}

impl VisualEncoder {
    pub fn new(theme: Theme, categories: CategoryMap) -> Self {
        Self { theme, categories }
    }

    /// Encoder for `assets` with the given theme and rules
    pub fn for_assets(theme: Theme, rules: CategoryRules, assets: &[AssetRecord]) -> Self {
        let categories = CategoryMap::build(rules, assets.iter().map(|a| a.ticker.as_str()));
        Self::new(theme, categories)
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn category_for(&self, ticker: &str) -> AssetCategory {
        self.categories.get(ticker)
    }

    fn palette(&self, category: AssetCategory) -> Option<Color> {
        match category {
            AssetCategory::Focus => Some(self.theme.alert_color),
            AssetCategory::Hedge => Some(self.theme.positive_color),
            AssetCategory::Neutral1 => Some(self.theme.accent_gold),
            AssetCategory::Neutral2 => Some(self.theme.accent_blue),
            AssetCategory::Other => None,
        }
    }

    /// Category color; uncategorized tickers are colored by the sign of
    /// `period_return`, which must then be present.
    pub fn color_for(&self, ticker: &str, period_return: Option<f64>) -> Result<Color> {
        match self.palette(self.category_for(ticker)) {
            Some(color) => Ok(color),
            None => period_return
                .map(|value| self.sign_color(value))
                .ok_or_else(|| DataError::MissingReturn(ticker.to_string())),
        }
    }

    /// Gainers positive, losers alert
    #[must_use]
    pub fn sign_color(&self, value: f64) -> Color {
        self.theme.sign_color(value)
    }

    #[must_use]
    pub fn marker_size_for(&self, ticker: &str) -> f64 {
        match self.category_for(ticker) {
            AssetCategory::Focus => FOCUS_MARKER_SIZE,
            _ => MARKER_SIZE,
        }
    }

    /// Focus on top and thickest, uncategorized at the bottom and thinnest
    #[must_use]
    pub fn z_order_and_width_for(&self, ticker: &str) -> (i32, f64) {
        match self.category_for(ticker) {
            AssetCategory::Focus => (10, 2.0),
            AssetCategory::Hedge => (5, 1.2),
            AssetCategory::Neutral1 | AssetCategory::Neutral2 => (4, 1.2),
            AssetCategory::Other => (1, 1.0),
        }
    }

    /// Line color; uncategorized lines are muted regardless of return
    #[must_use]
    pub fn line_color_for(&self, ticker: &str) -> Color {
        self.palette(self.category_for(ticker))
            .unwrap_or(self.theme.muted_color)
    }

    pub fn attributes_for(&self, asset: &AssetRecord) -> Result<VisualAttributes> {
        let (z_order, line_width) = self.z_order_and_width_for(&asset.ticker);
        Ok(VisualAttributes {
            category: self.category_for(&asset.ticker),
            color: self.color_for(&asset.ticker, Some(asset.period_return))?,
            marker_color: self.sign_color(asset.period_return),
            marker_size: self.marker_size_for(&asset.ticker),
            z_order,
            line_width,
        })
    }
}
