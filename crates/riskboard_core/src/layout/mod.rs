//! Report layout
//!
//! `ReportLayoutEngine::layout` turns the statistics and the normalized prices
//! into a `RenderPlan` on a fixed 2x3 grid:
//!
//! ```text
//! +-------------------------+-----------+
//! | Risk vs. Reward scatter |           |
//! +-------------------------+  sidebar  |
//! | Base-100 performance    |           |
//! +-------------------------+-----------+
//! ```
//!
//! The sidebar is not a grid cell: it is placed in figure coordinates by a
//! `SidebarCursor`.

mod commentary;
mod plan;
mod sidebar;

pub use commentary::{BULLET, commentary_notes, format_commentary};
pub use plan::{
    Annotation, AxesStyle, AxisLabels, FigureSpec, FontFamily, FontSpec, FontWeight, GridCell,
    GridSpec, LayoutOverflowWarning, Legend, LegendPosition, LinePlot, LineSeries, Rect,
    ReferenceLine, RenderPlan, ScatterPlot, ScatterPoint, TextFragment, VerticalAlign,
};
pub use sidebar::{Placement, SidebarBlock, SidebarCursor};

use crate::config::{LayoutConfig, Theme};
use crate::encoding::VisualEncoder;
use crate::error::{DataError, Result};
use crate::format::{format_percentage, format_row};
use crate::model::{AssetRecord, Color, PortfolioMetrics};
use crate::normalize::NormalizedPrices;

const TITLE_FONT: FontSpec = FontSpec::new(14.0).bold();
const AXIS_LABEL_FONT: FontSpec = FontSpec::new(11.0);
const ANNOTATION_FONT: FontSpec = FontSpec::new(10.0).bold();
const LEGEND_FONT: FontSpec = FontSpec::new(9.0);

const HEADER_FONT: FontSpec = FontSpec::new(18.0).bold().mono();
const SEPARATOR_FONT: FontSpec = FontSpec::new(12.0).mono();
const BODY_FONT: FontSpec = FontSpec::new(11.0).mono();
const SECTION_FONT: FontSpec = FontSpec::new(13.0).bold().mono();
const ANALYSIS_FONT: FontSpec = FontSpec::new(12.0).bold().mono();

const SCATTER_CELL: GridCell = GridCell {
    row: 0,
    col_start: 0,
    col_end: 2,
};
const LINES_CELL: GridCell = GridCell {
    row: 1,
    col_start: 0,
    col_end: 2,
};

/// Alert color if the formatted value contains a '-' anywhere, positive
/// otherwise.
#[must_use]
pub fn metric_color(formatted: &str, theme: &Theme) -> Color {
    if formatted.contains('-') {
        theme.alert_color
    } else {
        theme.positive_color
    }
}

#[derive(Debug, Clone)]
pub struct ReportLayoutEngine {
    config: LayoutConfig,
    encoder: VisualEncoder,
}

impl ReportLayoutEngine {
    pub fn new(config: LayoutConfig, encoder: VisualEncoder) -> Self {
        Self { config, encoder }
    }

    #[must_use]
    pub fn encoder(&self) -> &VisualEncoder {
        &self.encoder
    }

    fn theme(&self) -> &Theme {
        self.encoder.theme()
    }

    /// Build the full plan.
    ///
    /// Fails if an asset cannot be colored or a price column has no matching
    /// asset. Never partially succeeds.
    pub fn layout(
        &self,
        assets: &[AssetRecord],
        prices: &NormalizedPrices,
        portfolio: &PortfolioMetrics,
    ) -> Result<RenderPlan> {
        if assets.is_empty() {
            return Err(DataError::NoAssets);
        }

        let scatter = self.scatter(assets)?;
        let lines = self.lines(assets, prices)?;
        let (sidebar, overflow) = self.sidebar(assets, portfolio)?;

        if let Some(warning) = &overflow {
            tracing::warn!(%warning, assets = assets.len(), "sidebar overflows its column");
        }

        let theme = self.theme();
        Ok(RenderPlan {
            figure: FigureSpec {
                width_in: self.config.figure_width,
                height_in: self.config.figure_height,
                background: theme.background,
                content_rect: Rect::new(0.0, 0.0, self.config.content_right, 1.0),
            },
            grid: GridSpec {
                rows: 2,
                cols: 3,
                width_ratios: self.config.width_ratios.to_vec(),
            },
            scatter,
            lines,
            sidebar,
            data_source: prices.source.clone(),
            overflow,
        })
    }

    fn axes_style(&self) -> AxesStyle {
        let theme = self.theme();
        AxesStyle {
            face_color: theme.panel_background,
            grid_color: theme.grid_color,
            grid_alpha: self.config.grid_alpha,
            spine_color: theme.text_color,
            tick_color: theme.text_color,
        }
    }

    fn axis_labels(&self, title: &str, x_label: Option<&str>, y_label: &str) -> AxisLabels {
        AxisLabels {
            title: title.to_string(),
            x_label: x_label.map(str::to_string),
            y_label: Some(y_label.to_string()),
            title_font: TITLE_FONT,
            label_font: AXIS_LABEL_FONT,
            color: self.theme().text_color,
        }
    }

    fn reference_line(&self, value: f64) -> ReferenceLine {
        ReferenceLine {
            value,
            color: self.theme().text_color,
            width: 1.0,
            dashed: true,
        }
    }

    /// One point per asset at (volatility, return), labelled just to its right
    fn scatter(&self, assets: &[AssetRecord]) -> Result<ScatterPlot> {
        let theme = self.theme();
        let mut points = Vec::with_capacity(assets.len());
        let mut annotations = Vec::with_capacity(assets.len());

        for asset in assets {
            let attrs = self.encoder.attributes_for(asset)?;
            tracing::debug!(
                ticker = %asset.ticker,
                category = ?attrs.category,
                z_order = attrs.z_order,
                "encoded asset"
            );
            points.push(ScatterPoint {
                ticker: asset.ticker.clone(),
                x: asset.period_volatility,
                y: asset.period_return,
                fill: attrs.marker_color,
                edge: theme.marker_edge_color,
                size: attrs.marker_size,
                alpha: self.config.marker_alpha,
                edge_width: self.config.marker_edge_width,
            });
            annotations.push(Annotation {
                text: format!(
                    "{}\n{}",
                    asset.ticker,
                    format_percentage(asset.period_return, 1)
                ),
                x: asset.period_volatility + self.config.annotation_dx,
                y: asset.period_return,
                font: ANNOTATION_FONT,
                color: theme.text_color,
            });
        }

        Ok(ScatterPlot {
            cell: SCATTER_CELL,
            style: self.axes_style(),
            labels: self.axis_labels(
                "Risk vs. Reward Map",
                Some("Annualized Volatility (Risk)"),
                "Annualized Return",
            ),
            points,
            annotations,
            reference: self.reference_line(0.0),
            x_limits: self.config.scatter_x_limits,
        })
    }

    /// One line per normalized column, in column order
    fn lines(&self, assets: &[AssetRecord], prices: &NormalizedPrices) -> Result<LinePlot> {
        let theme = self.theme();
        let series = prices
            .series
            .columns()
            .iter()
            .map(|column| {
                if !assets.iter().any(|a| a.ticker == column.ticker) {
                    return Err(DataError::MissingMetrics(column.ticker.clone()));
                }
                let (z_order, width) = self.encoder.z_order_and_width_for(&column.ticker);
                Ok(LineSeries {
                    label: column.ticker.clone(),
                    values: column.values.clone(),
                    color: self.encoder.line_color_for(&column.ticker),
                    width,
                    z_order,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let legend = Legend {
            entries: series.iter().map(|s| s.label.clone()).collect(),
            position: LegendPosition::UpperLeft,
            font: LEGEND_FONT,
            face_color: theme.panel_background,
            edge_color: theme.grid_color,
            text_color: theme.text_color,
        };

        Ok(LinePlot {
            cell: LINES_CELL,
            style: self.axes_style(),
            labels: self.axis_labels("Historical Performance (Base 100)", None, "Value (Base 100)"),
            dates: prices.series.dates().to_vec(),
            series,
            reference: self.reference_line(100.0),
            legend,
        })
    }

    fn sidebar(
        &self,
        assets: &[AssetRecord],
        portfolio: &PortfolioMetrics,
    ) -> Result<(Vec<TextFragment>, Option<LayoutOverflowWarning>)> {
        let theme = self.theme();
        let cfg = &self.config;
        let separator = "-".repeat(cfg.separator_chars);
        let mut cursor = SidebarCursor::new(cfg);

        cursor.emit(
            SidebarBlock::new("PORTFOLIO REPORT", HEADER_FONT, theme.text_color)
                .advance(cfg.header_advance),
        );
        cursor.emit(
            SidebarBlock::new(separator.clone(), SEPARATOR_FONT, theme.grid_color)
                .advance(cfg.section_gap),
        );

        for (label, value) in portfolio.display_rows() {
            cursor.emit(SidebarBlock::new(
                format!("{label}:"),
                BODY_FONT,
                theme.text_color,
            ));
            let color = metric_color(&value, theme);
            cursor.emit(
                SidebarBlock::new(value, BODY_FONT.bold(), color)
                    .offset(cfg.value_column_offset)
                    .advance(cfg.row_advance),
            );
        }

        cursor.emit(
            SidebarBlock::new(separator, SEPARATOR_FONT, theme.grid_color)
                .advance(cfg.section_gap),
        );
        cursor.emit(
            SidebarBlock::new("INDIVIDUAL METRICS:", SECTION_FONT, theme.text_color)
                .advance(cfg.heading_advance),
        );
        cursor.emit(
            SidebarBlock::new(
                format_row(&["Ticker", "Return", "Vol."], cfg.cell_chars),
                BODY_FONT.bold(),
                theme.text_color,
            )
            .advance(cfg.column_header_advance),
        );

        for asset in assets {
            let ret = format_percentage(asset.period_return, 1);
            let vol = format_percentage(asset.period_volatility, 1);
            let color = self
                .encoder
                .color_for(&asset.ticker, Some(asset.period_return))?;
            cursor.emit(
                SidebarBlock::new(
                    format_row(
                        &[asset.ticker.as_str(), ret.as_str(), vol.as_str()],
                        cfg.cell_chars,
                    ),
                    BODY_FONT,
                    color,
                )
                .advance(cfg.row_advance),
            );
        }

        cursor.skip(cfg.section_gap);
        cursor.emit(
            SidebarBlock::new("> SYSTEM ANALYSIS:", ANALYSIS_FONT, theme.accent_blue)
                .advance(cfg.heading_advance),
        );

        let notes = commentary_notes(assets, &self.encoder);
        cursor.emit(
            SidebarBlock::new(
                format_commentary(&notes, cfg.commentary_wrap),
                BODY_FONT,
                theme.commentary_color,
            )
            .top_aligned(),
        );

        Ok(cursor.finish())
    }
}
