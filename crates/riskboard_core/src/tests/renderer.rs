//! End-to-end tests for the dashboard renderer
//!
//! These tests verify:
//! - The surface is drawn exactly once per successful render
//! - Invalid data aborts before the surface is touched
//! - The artifact reports whether fallback prices were used
//! - Surface failures propagate as render errors
//! - Per-asset visual attributes in the plan come from the encoder

use super::{dates, demo_closes};
use crate::config::{FallbackConfig, FetchConfig, LayoutConfig, Theme};
use crate::encoding::{AssetCategory, CategoryRule, CategoryRules, VisualEncoder};
use crate::error::{DataError, FetchError, RenderError, SurfaceError};
use crate::layout::RenderPlan;
use crate::model::{AssetRecord, Color, PortfolioMetrics, PriceTable};
use crate::normalize::DataSource;
use crate::provider::{OfflineProvider, StaticProvider};
use crate::render::{DashboardRenderer, RenderSurface};
use crate::store::MetricsStore;

/// Surface that keeps every plan it is asked to draw
#[derive(Default)]
struct RecordingSurface {
    plans: Vec<RenderPlan>,
}

impl RenderSurface for RecordingSurface {
    type Output = usize;

    fn draw(&mut self, plan: &RenderPlan) -> Result<usize, SurfaceError> {
        self.plans.push(plan.clone());
        Ok(plan.sidebar.len())
    }
}

struct BrokenSurface;

impl RenderSurface for BrokenSurface {
    type Output = ();

    fn draw(&mut self, _plan: &RenderPlan) -> Result<(), SurfaceError> {
        Err(SurfaceError::Backend("display lost".into()))
    }
}

#[test]
fn test_render_draws_once_with_market_data() {
    let store = MetricsStore::demo();
    let mut surface = RecordingSurface::default();

    let artifact = DashboardRenderer::new()
        .render(&store, &StaticProvider::new(demo_closes()), &mut surface)
        .unwrap();

    assert_eq!(surface.plans.len(), 1);
    assert_eq!(artifact.output, 17);
    assert_eq!(
        artifact.data_source,
        DataSource::Market {
            provider: "static".into()
        }
    );
    assert!(artifact.overflow.is_none());
}

#[test]
fn test_render_falls_back_when_offline() {
    let store = MetricsStore::demo();
    let mut surface = RecordingSurface::default();

    let artifact = DashboardRenderer::new()
        .render(&store, &OfflineProvider, &mut surface)
        .unwrap();

    assert_eq!(surface.plans.len(), 1);
    assert!(matches!(
        artifact.data_source,
        DataSource::Synthetic {
            reason: FetchError::Unavailable(_)
        }
    ));

    let plan = &surface.plans[0];
    assert_eq!(plan.lines.dates.len(), 100);
    assert_eq!(plan.lines.series.len(), 4);
    assert!(plan.lines.series.iter().all(|s| s.values[0] == 100.0));
    assert!(plan.data_source.is_synthetic());
}

#[test]
fn test_render_is_reproducible_offline() {
    let store = MetricsStore::demo();
    let renderer = DashboardRenderer::new().with_fetch_config(
        FetchConfig::default().with_fallback(FallbackConfig::default().with_seed(99)),
    );

    let first = renderer.plan(&store, &OfflineProvider).unwrap();
    let second = renderer.plan(&store, &OfflineProvider).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_data_error_never_touches_surface() {
    let store = MetricsStore::demo();
    let zero_base = demo_closes().with_column("MC.PA", vec![0.0, 680.0, 623.4]);
    let mut surface = RecordingSurface::default();

    let result =
        DashboardRenderer::new().render(&store, &StaticProvider::new(zero_base), &mut surface);

    assert_eq!(
        result,
        Err(RenderError::Data(DataError::ZeroBasePrice {
            ticker: "MC.PA".into()
        }))
    );
    assert!(surface.plans.is_empty());
}

#[test]
fn test_surface_error_propagates() {
    let result = DashboardRenderer::new().render(
        &MetricsStore::demo(),
        &OfflineProvider,
        &mut BrokenSurface,
    );

    assert_eq!(
        result,
        Err(RenderError::Surface(SurfaceError::Backend(
            "display lost".into()
        )))
    );
}

#[test]
fn test_custom_rules_and_theme_flow_into_plan() {
    let assets = vec![
        AssetRecord::new("AIR.PA", "Airbus", 0.12, 0.25),
        AssetRecord::new("BNP.PA", "BNP Paribas", -0.04, 0.3),
    ];
    let store = MetricsStore::new(assets, PortfolioMetrics::new(0.04, 0.2, 0.2)).unwrap();
    let table = PriceTable::new(dates(2))
        .with_column("AIR.PA", vec![150.0, 160.0])
        .with_column("BNP.PA", vec![60.0, 58.0]);

    let theme = Theme {
        alert_color: Color::rgb(0xAA, 0x00, 0x00),
        ..Theme::default()
    };
    let renderer = DashboardRenderer::new()
        .with_theme(theme)
        .with_rules(CategoryRules::new(vec![CategoryRule::new(
            "BNP",
            AssetCategory::Focus,
        )]))
        .with_layout_config(LayoutConfig::default().with_figure_size(12.0, 6.75));

    let plan = renderer
        .plan(&store, &StaticProvider::new(table))
        .unwrap();

    assert_eq!(plan.figure.width_in, 12.0);
    let bnp = plan.lines.series("BNP.PA").unwrap();
    assert_eq!(bnp.color, Color::rgb(0xAA, 0x00, 0x00));
    assert_eq!(bnp.z_order, 10);
    let air = plan.lines.series("AIR.PA").unwrap();
    assert_eq!(air.color, theme.muted_color);
    assert_eq!(plan.scatter.points[1].size, 200.0);
}

#[test]
fn test_plan_carries_encoder_attributes() {
    let store = MetricsStore::demo();
    let plan = DashboardRenderer::new()
        .plan(&store, &StaticProvider::new(demo_closes()))
        .unwrap();
    let encoder =
        VisualEncoder::for_assets(Theme::default(), CategoryRules::default(), store.assets());

    assert_eq!(plan.scatter.points.len(), store.assets().len());
    for (asset, point) in store.assets().iter().zip(&plan.scatter.points) {
        let attrs = encoder.attributes_for(asset).unwrap();
        assert_eq!(point.ticker, asset.ticker);
        assert_eq!(point.fill, attrs.marker_color);
        assert_eq!(point.size, attrs.marker_size);

        let series = plan.lines.series(&asset.ticker).unwrap();
        assert_eq!(series.color, encoder.line_color_for(&asset.ticker));
        assert_eq!(series.z_order, attrs.z_order);
        assert_eq!(series.width, attrs.line_width);
    }
}

#[test]
fn test_duplicate_and_empty_assets_rejected() {
    let portfolio = PortfolioMetrics::new(0.0, 0.1, 0.0);

    assert_eq!(
        MetricsStore::new(vec![], portfolio),
        Err(DataError::NoAssets)
    );
    assert_eq!(
        MetricsStore::new(
            vec![
                AssetRecord::new("MC.PA", "LVMH", 0.1, 0.2),
                AssetRecord::new("MC.PA", "LVMH again", 0.1, 0.2),
            ],
            portfolio
        ),
        Err(DataError::DuplicateTicker("MC.PA".into()))
    );

    let store = MetricsStore::demo();
    assert_eq!(
        store.require("AIR.PA"),
        Err(DataError::MissingMetrics("AIR.PA".into()))
    );
    assert_eq!(store.require("TTE.PA").unwrap().display_name, "TotalEnergies");
}
