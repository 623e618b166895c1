//! Portfolio dashboard pipeline
//!
//! This crate turns precomputed portfolio statistics and a price history into
//! a single-page report plan. It covers:
//! - Base-100 normalization of close prices, with a seeded synthetic fallback
//!   when the market-data provider fails
//! - Deterministic visual encoding (category, color, marker size, z-order)
//! - Layout of a risk/reward scatter, a performance chart and a text sidebar
//! - Orchestration through pluggable provider and surface traits
//!
//! # Usage
//!
//! ```ignore
//! use riskboard_core::{DashboardRenderer, MetricsStore, OfflineProvider};
//!
//! let store = MetricsStore::demo();
//! let plan = DashboardRenderer::new().plan(&store, &OfflineProvider)?;
//! assert!(plan.data_source.is_synthetic());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod encoding;
pub mod error;
pub mod format;
pub mod layout;
pub mod normalize;
pub mod provider;
pub mod render;
pub mod store;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{FallbackConfig, FetchConfig, LayoutConfig, Theme};
pub use encoding::{AssetCategory, CategoryRule, CategoryRules, VisualAttributes, VisualEncoder};
pub use error::{DataError, FetchError, RenderError, SurfaceError};
pub use layout::{LayoutOverflowWarning, RenderPlan, ReportLayoutEngine};
pub use model::{AssetRecord, Color, NormalizedSeries, PortfolioMetrics, PriceTable};
pub use normalize::{DataSource, NormalizedPrices, PriceNormalizer};
pub use provider::{MarketDataProvider, OfflineProvider, PriceRequest, StaticProvider};
pub use render::{DashboardRenderer, RenderSurface, RenderedArtifact};
pub use store::MetricsStore;
