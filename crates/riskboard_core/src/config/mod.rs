//! Dashboard configuration
//!
//! Every stage of the pipeline is driven by a plain, immutable config value:
//!
//! - `FetchConfig` - what to ask the market-data provider for, and how to
//!   build the synthetic table when it cannot answer (`FallbackConfig`)
//! - `LayoutConfig` - figure geometry and sidebar spacing
//! - `Theme` - colors shared by the encoder and the layout engine
//!
//! All of them implement `Default` with the stock dashboard values, and
//! deserialize with `#[serde(default)]` so a YAML file only needs to name what
//! it overrides.
//!
//! ```ignore
//! use riskboard_core::config::{FetchConfig, FallbackConfig};
//!
//! let fetch = FetchConfig::default()
//!     .with_period(6.months())
//!     .with_fallback(FallbackConfig::default().with_seed(7));
//! ```

use std::time::Duration;

use jiff::{Span, ToSpan, civil::Date};
use serde::{Deserialize, Serialize};

mod theme;

pub use theme::Theme;

/// What to request from the market-data provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// History length, counted back from the provider's latest date
    pub period: Span,
    /// Sampling interval between rows
    pub interval: Span,
    /// Providers report `FetchError::Timeout` past this limit
    pub timeout: Option<Duration>,
    pub fallback: FallbackConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            period: 1.year(),
            interval: 1.day(),
            timeout: None,
            fallback: FallbackConfig::default(),
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub fn with_period(mut self, period: Span) -> Self {
        self.period = period;
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Span) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackConfig) -> Self {
        self.fallback = fallback;
        self
    }
}

fn default_fallback_start() -> Date {
    jiff::civil::date(2025, 1, 1)
}

/// Shape and randomness of the synthetic table used when fetching fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// First date of the synthetic index
    pub start_date: Date,
    /// Number of consecutive calendar days (at least one row is always produced)
    pub days: usize,
    /// RNG seed; column `i` uses `seed + i`
    pub seed: u64,
    /// Price of every synthetic series on the first date
    pub start_price: f64,
    /// Mean of the daily log-return
    pub daily_drift: f64,
    /// Standard deviation of the daily log-return
    pub daily_volatility: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            start_date: default_fallback_start(),
            days: 100,
            seed: 42,
            start_price: 100.0,
            daily_drift: 0.0,
            daily_volatility: 0.02,
        }
    }
}

impl FallbackConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    #[must_use]
    pub fn with_start_date(mut self, start_date: Date) -> Self {
        self.start_date = start_date;
        self
    }
}

/// Figure geometry and sidebar spacing, all in normalized figure coordinates
/// (0..1, origin bottom-left) unless noted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Figure size in inches
    pub figure_width: f64,
    pub figure_height: f64,
    /// Relative widths of the three grid columns
    pub width_ratios: [f64; 3],
    /// Right edge of the region the grid is fitted into
    pub content_right: f64,

    // === Scatter ===
    /// Horizontal offset of a point's label from the point, in data units
    pub annotation_dx: f64,
    pub scatter_x_limits: Option<(f64, f64)>,
    pub marker_alpha: f64,
    pub marker_edge_width: f64,
    pub grid_alpha: f64,

    // === Sidebar ===
    pub sidebar_x: f64,
    pub sidebar_top: f64,
    /// Lowest y a sidebar block may reach before overflow is reported
    pub sidebar_floor: f64,
    /// Offset of a metric's value from its label
    pub value_column_offset: f64,
    pub header_advance: f64,
    pub section_gap: f64,
    pub row_advance: f64,
    pub column_header_advance: f64,
    pub heading_advance: f64,
    /// Width of separators and table cells, in characters
    pub separator_chars: usize,
    pub cell_chars: usize,
    /// Commentary wrap width, in characters
    pub commentary_wrap: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            figure_width: 16.0,
            figure_height: 9.0,
            width_ratios: [1.0, 1.0, 0.8],
            content_right: 0.65,
            annotation_dx: 0.01,
            scatter_x_limits: Some((0.0, 0.7)),
            marker_alpha: 0.9,
            marker_edge_width: 0.8,
            grid_alpha: 0.6,
            sidebar_x: 0.68,
            sidebar_top: 0.85,
            sidebar_floor: 0.02,
            value_column_offset: 0.15,
            header_advance: 0.02,
            section_gap: 0.05,
            row_advance: 0.04,
            column_header_advance: 0.02,
            heading_advance: 0.04,
            separator_chars: 28,
            cell_chars: 8,
            commentary_wrap: 30,
        }
    }
}

impl LayoutConfig {
    /// Height of one text line of `font_size` points, in figure units
    #[must_use]
    pub fn line_height(&self, font_size: f64) -> f64 {
        const LINE_SPACING: f64 = 1.2;
        const POINTS_PER_INCH: f64 = 72.0;
        font_size * LINE_SPACING / POINTS_PER_INCH / self.figure_height
    }

    #[must_use]
    pub fn with_figure_size(mut self, width: f64, height: f64) -> Self {
        self.figure_width = width;
        self.figure_height = height;
        self
    }

    #[must_use]
    pub fn with_sidebar_floor(mut self, floor: f64) -> Self {
        self.sidebar_floor = floor;
        self
    }
}
