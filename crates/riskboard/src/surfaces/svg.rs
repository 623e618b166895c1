//! Standalone SVG export of a render plan
//!
//! One figure inch is 72 user units, so font sizes in points map directly.

use std::fmt::{self, Write};
use std::path::PathBuf;

use riskboard_core::layout::{
    AxesStyle, AxisLabels, FontFamily, FontSpec, LinePlot, Rect, ReferenceLine, ScatterPlot,
    TextFragment, VerticalAlign,
};
use riskboard_core::{Color, RenderPlan, RenderSurface, SurfaceError};

use crate::util::io::atomic_write;

const DPI: f64 = 72.0;
const GRID_LINES: usize = 5;
const LINE_HEIGHT: f64 = 1.2;

/// Writes the plan as an SVG file; the output is the written path
#[derive(Debug, Clone)]
pub struct SvgSurface {
    path: PathBuf,
}

impl SvgSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RenderSurface for SvgSurface {
    type Output = PathBuf;

    fn draw(&mut self, plan: &RenderPlan) -> Result<PathBuf, SurfaceError> {
        let svg = render_svg(plan)
            .map_err(|e| SurfaceError::Backend(format!("Failed to format SVG: {}", e)))?;
        atomic_write(&self.path, &svg)?;
        tracing::info!(path = %self.path.display(), "wrote SVG dashboard");
        Ok(self.path.clone())
    }
}

/// Figure-to-pixel transform (figure origin is bottom-left, SVG is top-left)
#[derive(Debug, Clone, Copy)]
struct Canvas {
    width: f64,
    height: f64,
}

impl Canvas {
    fn x(&self, fx: f64) -> f64 {
        fx * self.width
    }

    fn y(&self, fy: f64) -> f64 {
        (1.0 - fy) * self.height
    }

    fn rect(&self, r: Rect) -> (f64, f64, f64, f64) {
        (self.x(r.x), self.y(r.top()), r.width * self.width, r.height * self.height)
    }
}

/// Data-to-pixel transform inside one axes rectangle
#[derive(Debug, Clone, Copy)]
struct DataTransform {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl DataTransform {
    fn new(pixels: (f64, f64, f64, f64), x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        let (left, top, width, height) = pixels;
        Self {
            left,
            top,
            width,
            height,
            x_range,
            y_range,
        }
    }

    fn x(&self, value: f64) -> f64 {
        let span = (self.x_range.1 - self.x_range.0).max(f64::EPSILON);
        self.left + (value - self.x_range.0) / span * self.width
    }

    fn y(&self, value: f64) -> f64 {
        let span = (self.y_range.1 - self.y_range.0).max(f64::EPSILON);
        self.top + self.height - (value - self.y_range.0) / span * self.height
    }
}

/// Serialize the plan as a complete SVG document
pub fn render_svg(plan: &RenderPlan) -> Result<String, fmt::Error> {
    let canvas = Canvas {
        width: plan.figure.width_in * DPI,
        height: plan.figure.height_in * DPI,
    };
    let mut out = String::new();

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
        w = canvas.width,
        h = canvas.height
    )?;
    writeln!(
        out,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        plan.figure.background.to_hex()
    )?;

    write_scatter(&mut out, canvas.rect(plan.scatter_rect()), &plan.scatter)?;
    write_lines(&mut out, canvas.rect(plan.lines_rect()), &plan.lines)?;

    for fragment in &plan.sidebar {
        write_fragment(&mut out, canvas, fragment)?;
    }

    writeln!(out, "</svg>")?;
    Ok(out)
}

fn write_scatter(
    out: &mut String,
    pixels: (f64, f64, f64, f64),
    plot: &ScatterPlot,
) -> fmt::Result {
    let (y_min, y_max) = plot.y_extent();
    let pad = (y_max - y_min) * 0.1;
    let t = DataTransform::new(pixels, plot.x_extent(), (y_min - pad, y_max + pad));

    writeln!(out, "<g class=\"scatter\">")?;
    write_axes(out, &t, &plot.style)?;
    write_reference(out, &t, &plot.reference)?;

    for point in &plot.points {
        // Marker size is an area in points squared
        writeln!(
            out,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{}"/>"#,
            t.x(point.x),
            t.y(point.y),
            point.size.sqrt() / 2.0,
            point.fill.to_hex(),
            point.alpha,
            point.edge.to_hex(),
            point.edge_width
        )?;
    }
    for note in &plot.annotations {
        write_text_block(
            out,
            t.x(note.x),
            t.y(note.y),
            &note.text,
            &note.font,
            note.color,
            VerticalAlign::Baseline,
        )?;
    }

    write_labels(out, &t, &plot.labels)?;
    writeln!(out, "</g>")
}

fn write_lines(out: &mut String, pixels: (f64, f64, f64, f64), plot: &LinePlot) -> fmt::Result {
    let x_max = plot.dates.len().saturating_sub(1).max(1) as f64;
    let t = DataTransform::new(pixels, (0.0, x_max), plot.y_extent());

    writeln!(out, "<g class=\"lines\">")?;
    write_axes(out, &t, &plot.style)?;
    write_reference(out, &t, &plot.reference)?;

    for series in plot.draw_order() {
        for segment in finite_segments(&series.values) {
            let points: Vec<String> = segment
                .iter()
                .map(|&(i, v)| format!("{:.2},{:.2}", t.x(i as f64), t.y(v)))
                .collect();
            writeln!(
                out,
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                points.join(" "),
                series.color.to_hex(),
                series.width
            )?;
        }
    }

    write_legend(out, &t, plot)?;
    write_labels(out, &t, &plot.labels)?;
    writeln!(out, "</g>")
}

/// Runs of consecutive finite values; NaN breaks a line
fn finite_segments(values: &[f64]) -> Vec<Vec<(usize, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        if v.is_finite() {
            current.push((i, v));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn write_axes(out: &mut String, t: &DataTransform, style: &AxesStyle) -> fmt::Result {
    writeln!(
        out,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
        t.left,
        t.top,
        t.width,
        t.height,
        style.face_color.to_hex()
    )?;

    for i in 0..=GRID_LINES {
        let frac = i as f64 / GRID_LINES as f64;
        let y = t.top + t.height * frac;
        let x = t.left + t.width * frac;
        writeln!(
            out,
            r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-opacity="{}" stroke-dasharray="4 2"/>"#,
            t.left,
            t.left + t.width,
            style.grid_color.to_hex(),
            style.grid_alpha
        )?;
        writeln!(
            out,
            r#"<line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="{}" stroke-opacity="{}" stroke-dasharray="4 2"/>"#,
            t.top,
            t.top + t.height,
            style.grid_color.to_hex(),
            style.grid_alpha
        )?;
    }

    // Bottom and left spines only
    let bottom = t.top + t.height;
    writeln!(
        out,
        r#"<polyline points="{:.2},{:.2} {:.2},{bottom:.2} {:.2},{bottom:.2}" fill="none" stroke="{}"/>"#,
        t.left,
        t.top,
        t.left,
        t.left + t.width,
        style.spine_color.to_hex()
    )?;

    let tick = style.tick_color.to_hex();
    for i in 0..=GRID_LINES {
        let frac = i as f64 / GRID_LINES as f64;
        let value = t.y_range.1 - (t.y_range.1 - t.y_range.0) * frac;
        writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" font-size="9" fill="{tick}" text-anchor="end">{}</text>"#,
            t.left - 4.0,
            t.top + t.height * frac + 3.0,
            tick_label(value)
        )?;
    }
    Ok(())
}

fn tick_label(value: f64) -> String {
    if value.abs() >= 10.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn write_reference(out: &mut String, t: &DataTransform, line: &ReferenceLine) -> fmt::Result {
    let y = t.y(line.value);
    let dash = if line.dashed {
        r#" stroke-dasharray="6 4""#
    } else {
        ""
    };
    writeln!(
        out,
        r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="{}"{dash}/>"#,
        t.left,
        t.left + t.width,
        line.color.to_hex(),
        line.width
    )
}

fn write_labels(out: &mut String, t: &DataTransform, labels: &AxisLabels) -> fmt::Result {
    write_text_block(
        out,
        t.left,
        t.top - 6.0,
        &labels.title,
        &labels.title_font,
        labels.color,
        VerticalAlign::Baseline,
    )?;
    if let Some(x_label) = &labels.x_label {
        write_text_block(
            out,
            t.left + t.width / 2.0,
            t.top + t.height + labels.label_font.size * 1.5,
            x_label,
            &labels.label_font,
            labels.color,
            VerticalAlign::Baseline,
        )?;
    }
    if let Some(y_label) = &labels.y_label {
        let x = t.left - 40.0;
        let y = t.top + t.height / 2.0;
        writeln!(
            out,
            r#"<text x="{x:.2}" y="{y:.2}" transform="rotate(-90 {x:.2} {y:.2})" text-anchor="middle" {}>{}</text>"#,
            font_attrs(&labels.label_font, labels.color),
            escape(y_label)
        )?;
    }
    Ok(())
}

fn write_legend(out: &mut String, t: &DataTransform, plot: &LinePlot) -> fmt::Result {
    let legend = &plot.legend;
    let row = legend.font.size * LINE_HEIGHT;
    let longest = legend
        .entries
        .iter()
        .map(|e| e.chars().count())
        .max()
        .unwrap_or(0) as f64;
    let (x, y) = (t.left + 8.0, t.top + 8.0);

    writeln!(
        out,
        r#"<rect x="{x:.2}" y="{y:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="{}"/>"#,
        30.0 + longest * legend.font.size * 0.6,
        row * legend.entries.len() as f64 + 8.0,
        legend.face_color.to_hex(),
        legend.edge_color.to_hex()
    )?;
    for (idx, label) in legend.entries.iter().enumerate() {
        let color = plot.series(label).map_or(legend.text_color, |s| s.color);
        let baseline = y + 4.0 + row * (idx as f64 + 1.0) - legend.font.size * 0.2;
        let mid = baseline - legend.font.size * 0.35;
        writeln!(
            out,
            r#"<line x1="{:.2}" y1="{mid:.2}" x2="{:.2}" y2="{mid:.2}" stroke="{}" stroke-width="2"/>"#,
            x + 4.0,
            x + 22.0,
            color.to_hex()
        )?;
        write_text_block(
            out,
            x + 26.0,
            baseline,
            label,
            &legend.font,
            legend.text_color,
            VerticalAlign::Baseline,
        )?;
    }
    Ok(())
}

fn write_fragment(out: &mut String, canvas: Canvas, fragment: &TextFragment) -> fmt::Result {
    write_text_block(
        out,
        canvas.x(fragment.x),
        canvas.y(fragment.y),
        &fragment.text,
        &fragment.font,
        fragment.color,
        fragment.valign,
    )
}

/// Multi-line text at pixel position; `Top` blocks hang below `y`
fn write_text_block(
    out: &mut String,
    x: f64,
    y: f64,
    text: &str,
    font: &FontSpec,
    color: Color,
    valign: VerticalAlign,
) -> fmt::Result {
    let first_baseline = match valign {
        VerticalAlign::Baseline => y,
        VerticalAlign::Top => y + font.size,
    };
    write!(
        out,
        r#"<text x="{x:.2}" y="{first_baseline:.2}" {}>"#,
        font_attrs(font, color)
    )?;
    for (idx, line) in text.lines().enumerate() {
        let dy = if idx == 0 { 0.0 } else { font.size * LINE_HEIGHT };
        write!(
            out,
            r#"<tspan x="{x:.2}" dy="{dy:.2}" xml:space="preserve">{}</tspan>"#,
            escape(line)
        )?;
    }
    writeln!(out, "</text>")
}

fn font_attrs(font: &FontSpec, color: Color) -> String {
    let family = match font.family {
        FontFamily::Default => "sans-serif",
        FontFamily::Monospace => "monospace",
    };
    let weight = if font.is_bold() { "bold" } else { "normal" };
    format!(
        r#"font-family="{family}" font-size="{}" font-weight="{weight}" fill="{}""#,
        font.size,
        color.to_hex()
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskboard_core::{DashboardRenderer, MetricsStore, OfflineProvider};
    use tempfile::tempdir;

    fn demo_plan() -> RenderPlan {
        DashboardRenderer::new()
            .plan(&MetricsStore::demo(), &OfflineProvider)
            .unwrap()
    }

    #[test]
    fn test_svg_document_size() {
        let svg = render_svg(&demo_plan()).unwrap();

        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg""#));
        assert!(svg.contains(r#"width="1152" height="648""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_contains_every_asset() {
        let svg = render_svg(&demo_plan()).unwrap();

        assert_eq!(svg.matches("<circle").count(), 4);
        for ticker in ["UBI.PA", "MC.PA", "SAN.PA", "TTE.PA"] {
            assert!(svg.contains(ticker), "missing {ticker}");
        }
        assert!(svg.contains("PORTFOLIO REPORT"));
        assert!(svg.contains("&gt; SYSTEM ANALYSIS:"));
    }

    #[test]
    fn test_svg_one_polyline_per_series_without_gaps() {
        let svg = render_svg(&demo_plan()).unwrap();
        // 4 series plus the two spine polylines
        assert_eq!(svg.matches("<polyline").count(), 6);
    }

    #[test]
    fn test_finite_segments_split_on_nan() {
        let segments = finite_segments(&[1.0, f64::NAN, 2.0, 3.0, f64::NAN]);
        assert_eq!(segments, vec![vec![(0, 1.0)], vec![(2, 2.0), (3, 3.0)]]);
        assert!(finite_segments(&[f64::NAN]).is_empty());
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("A & B <C> \"D\""), "A &amp; B &lt;C&gt; &quot;D&quot;");
    }

    #[test]
    fn test_transform_flips_y() {
        let canvas = Canvas {
            width: 1152.0,
            height: 648.0,
        };
        assert_eq!(canvas.y(1.0), 0.0);
        assert_eq!(canvas.y(0.0), 648.0);
        assert_eq!(canvas.x(0.5), 576.0);
    }

    #[test]
    fn test_svg_surface_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.svg");
        let mut surface = SvgSurface::new(&path);

        let written = surface.draw(&demo_plan()).unwrap();

        assert_eq!(written, path);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Risk vs. Reward Map"));
    }
}
