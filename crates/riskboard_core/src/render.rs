//! Dashboard orchestration
//!
//! `DashboardRenderer` runs the whole pipeline once: fetch and normalize
//! prices, encode every asset, lay out the report, and hand the plan to a
//! `RenderSurface`. The surface is called exactly once per successful render
//! and never when the input is invalid.

use crate::config::{FetchConfig, LayoutConfig, Theme};
use crate::encoding::{CategoryRules, VisualEncoder};
use crate::error::{RenderError, Result, SurfaceError};
use crate::layout::{LayoutOverflowWarning, RenderPlan, ReportLayoutEngine};
use crate::normalize::{DataSource, PriceNormalizer};
use crate::provider::MarketDataProvider;
use crate::store::MetricsStore;

/// Consumer of a finished plan (terminal, image file, test recorder...)
pub trait RenderSurface {
    type Output;

    fn draw(&mut self, plan: &RenderPlan) -> std::result::Result<Self::Output, SurfaceError>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    type Output = S::Output;

    fn draw(&mut self, plan: &RenderPlan) -> std::result::Result<Self::Output, SurfaceError> {
        (**self).draw(plan)
    }
}

/// What a render produced, plus how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact<O> {
    pub output: O,
    pub data_source: DataSource,
    pub overflow: Option<LayoutOverflowWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardRenderer {
    theme: Theme,
    rules: CategoryRules,
    fetch: FetchConfig,
    layout: LayoutConfig,
}

impl DashboardRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: CategoryRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    #[must_use]
    pub fn with_layout_config(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn fetch_config(&self) -> &FetchConfig {
        &self.fetch
    }

    /// Run every stage up to, but not including, drawing
    pub fn plan<P>(&self, store: &MetricsStore, provider: &P) -> Result<RenderPlan>
    where
        P: MarketDataProvider + ?Sized,
    {
        let tickers = store.tickers();
        tracing::info!("Downloading data for: {tickers:?}");

        let prices =
            PriceNormalizer::new(self.fetch.clone()).fetch_and_normalize(provider, &tickers)?;
        match &prices.source {
            DataSource::Market { provider } => {
                tracing::info!(
                    provider = provider.as_str(),
                    rows = prices.series.len(),
                    "using market data"
                );
            }
            DataSource::Synthetic { reason } => {
                tracing::warn!(%reason, "Error downloading data, using synthetic prices");
            }
        }

        let encoder = VisualEncoder::for_assets(self.theme, self.rules.clone(), store.assets());

        ReportLayoutEngine::new(self.layout.clone(), encoder).layout(
            store.assets(),
            &prices,
            store.portfolio(),
        )
    }

    /// Build the plan and draw it once on `surface`
    pub fn render<P, S>(
        &self,
        store: &MetricsStore,
        provider: &P,
        surface: &mut S,
    ) -> std::result::Result<RenderedArtifact<S::Output>, RenderError>
    where
        P: MarketDataProvider + ?Sized,
        S: RenderSurface + ?Sized,
    {
        let plan = self.plan(store, provider)?;
        let output = surface.draw(&plan)?;
        Ok(RenderedArtifact {
            output,
            data_source: plan.data_source,
            overflow: plan.overflow,
        })
    }
}
