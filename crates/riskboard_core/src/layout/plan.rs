//! Render plan: everything a surface needs to draw the report
//!
//! Coordinates of text fragments and grid rectangles are normalized figure
//! coordinates (0..1, origin bottom-left). Plot data is in data units.

use std::fmt;

use jiff::civil::Date;
use serde::Serialize;

use crate::model::Color;
use crate::normalize::DataSource;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureSpec {
    /// Size in inches
    pub width_in: f64,
    pub height_in: f64,
    pub background: Color,
    /// Region the grid is fitted into; the rest belongs to the sidebar
    pub content_rect: Rect,
}

/// Cell spanning `col_start..col_end` of one grid row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub row: usize,
    pub col_start: usize,
    pub col_end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub width_ratios: Vec<f64>,
}

impl GridSpec {
    /// Rectangle of `cell` inside `content`. Row 0 is the top row.
    #[must_use]
    pub fn cell_rect(&self, cell: GridCell, content: Rect) -> Rect {
        let total: f64 = self.width_ratios.iter().sum();
        let span = |range: std::ops::Range<usize>| -> f64 {
            self.width_ratios[range.start.min(self.cols)..range.end.min(self.cols)]
                .iter()
                .sum::<f64>()
                / total
        };
        let row_height = content.height / self.rows as f64;

        Rect::new(
            content.x + content.width * span(0..cell.col_start),
            content.top() - row_height * (cell.row + 1) as f64,
            content.width * span(cell.col_start..cell.col_end),
            row_height,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontFamily {
    Default,
    Monospace,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontSpec {
    /// Points
    pub size: f64,
    pub weight: FontWeight,
    pub family: FontFamily,
}

impl FontSpec {
    #[must_use]
    pub const fn new(size: f64) -> Self {
        Self {
            size,
            weight: FontWeight::Normal,
            family: FontFamily::Default,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    #[must_use]
    pub const fn mono(mut self) -> Self {
        self.family = FontFamily::Monospace;
        self
    }

    #[must_use]
    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerticalAlign {
    /// `y` is the baseline of the first line
    Baseline,
    /// `y` is the top of the block, lines run downwards
    Top,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font: FontSpec,
    pub color: Color,
    pub valign: VerticalAlign,
}

impl TextFragment {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// Sidebar content reached below its floor; the plan is still drawable
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutOverflowWarning {
    /// Vertical extent the sidebar needed
    pub required: f64,
    /// Extent between the anchor and the floor
    pub available: f64,
}

impl fmt::Display for LayoutOverflowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sidebar needs {:.3} of figure height but only {:.3} is available",
            self.required, self.available
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxesStyle {
    pub face_color: Color,
    pub grid_color: Color,
    pub grid_alpha: f64,
    /// Bottom and left spines; top and right are hidden
    pub spine_color: Color,
    pub tick_color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabels {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub title_font: FontSpec,
    pub label_font: FontSpec,
    pub color: Color,
}

/// Horizontal line across the whole axis at `value`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub color: Color,
    pub width: f64,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub ticker: String,
    /// Volatility
    pub x: f64,
    /// Return
    pub y: f64,
    pub fill: Color,
    pub edge: Color,
    /// Marker area in points squared
    pub size: f64,
    pub alpha: f64,
    pub edge_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font: FontSpec,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub cell: GridCell,
    pub style: AxesStyle,
    pub labels: AxisLabels,
    pub points: Vec<ScatterPoint>,
    pub annotations: Vec<Annotation>,
    pub reference: ReferenceLine,
    pub x_limits: Option<(f64, f64)>,
}

impl ScatterPlot {
    /// Data extent covering points, annotations and the reference line
    #[must_use]
    pub fn y_extent(&self) -> (f64, f64) {
        extent(
            self.points
                .iter()
                .map(|p| p.y)
                .chain(std::iter::once(self.reference.value)),
        )
    }

    #[must_use]
    pub fn x_extent(&self) -> (f64, f64) {
        self.x_limits.unwrap_or_else(|| {
            extent(
                self.points
                    .iter()
                    .map(|p| p.x)
                    .chain(self.annotations.iter().map(|a| a.x)),
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    /// One value per plan date; NaN is a gap
    pub values: Vec<f64>,
    pub color: Color,
    pub width: f64,
    pub z_order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LegendPosition {
    UpperLeft,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    /// Labels in input column order
    pub entries: Vec<String>,
    pub position: LegendPosition,
    pub font: FontSpec,
    pub face_color: Color,
    pub edge_color: Color,
    pub text_color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePlot {
    pub cell: GridCell,
    pub style: AxesStyle,
    pub labels: AxisLabels,
    pub dates: Vec<Date>,
    /// Input column order
    pub series: Vec<LineSeries>,
    pub reference: ReferenceLine,
    pub legend: Legend,
}

impl LinePlot {
    /// Series from bottom to top; equal z-orders keep column order
    #[must_use]
    pub fn draw_order(&self) -> Vec<&LineSeries> {
        let mut ordered: Vec<&LineSeries> = self.series.iter().collect();
        ordered.sort_by_key(|s| s.z_order);
        ordered
    }

    /// Finite value range across all series and the reference line
    #[must_use]
    pub fn y_extent(&self) -> (f64, f64) {
        extent(
            self.series
                .iter()
                .flat_map(|s| s.values.iter().copied())
                .chain(std::iter::once(self.reference.value)),
        )
    }

    #[must_use]
    pub fn series(&self, label: &str) -> Option<&LineSeries> {
        self.series.iter().find(|s| s.label == label)
    }
}

/// Min/max of the finite values, widened when degenerate
fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    (min, max)
}

/// Complete draw description of one dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub figure: FigureSpec,
    pub grid: GridSpec,
    pub scatter: ScatterPlot,
    pub lines: LinePlot,
    /// Positioned sidebar text, top to bottom
    pub sidebar: Vec<TextFragment>,
    pub data_source: DataSource,
    pub overflow: Option<LayoutOverflowWarning>,
}

impl RenderPlan {
    #[must_use]
    pub fn scatter_rect(&self) -> Rect {
        self.grid
            .cell_rect(self.scatter.cell, self.figure.content_rect)
    }

    #[must_use]
    pub fn lines_rect(&self) -> Rect {
        self.grid.cell_rect(self.lines.cell, self.figure.content_rect)
    }
}
