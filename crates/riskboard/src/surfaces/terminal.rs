//! Interactive terminal view of a render plan

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Chart, Dataset, GraphType, Paragraph,
        canvas::{Canvas, Line as CanvasLine, Points},
    },
};
use riskboard_core::layout::{LinePlot, ScatterPlot, TextFragment, VerticalAlign};
use riskboard_core::{RenderPlan, RenderSurface, SurfaceError};

use crate::util::styles::{HELP_COLOR, panel_block, text_style, tui_color};

/// Vertical gap (figure units) rendered as a blank sidebar line
const SECTION_BREAK: f64 = 0.045;

/// Full-screen ratatui view; `draw` blocks until the user quits
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl RenderSurface for TerminalSurface {
    type Output = ();

    fn draw(&mut self, plan: &RenderPlan) -> Result<(), SurfaceError> {
        let mut view = DashboardView::new(plan);
        ratatui::run(|terminal| view.run(terminal))
            .map_err(|e| SurfaceError::Backend(format!("terminal view failed: {}", e)))
    }
}

struct DashboardView<'a> {
    plan: &'a RenderPlan,
    exit: bool,
}

impl<'a> DashboardView<'a> {
    fn new(plan: &'a RenderPlan) -> Self {
        Self { plan, exit: false }
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        while !self.exit {
            terminal.draw(|frame| draw_plan(frame, self.plan))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn handle_events(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event)
            }
            _ => {}
        };
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit = true,
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.exit = true
            }
            _ => {}
        }
    }
}

/// Draw the whole dashboard into `frame`
pub fn draw_plan(frame: &mut Frame, plan: &RenderPlan) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(tui_color(plan.figure.background))),
        area,
    );

    let [body, footer] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let content_pct = (plan.figure.content_rect.right() * 100.0)
        .round()
        .clamp(10.0, 90.0) as u16;
    let [charts, sidebar] = Layout::horizontal([
        Constraint::Percentage(content_pct),
        Constraint::Min(0),
    ])
    .areas(body);

    let rows = plan.grid.rows.max(1);
    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(charts);
    let row_area = |row: usize| row_areas[row.min(rows - 1)];

    render_scatter(frame, row_area(plan.scatter.cell.row), &plan.scatter);
    render_lines(frame, row_area(plan.lines.cell.row), plan);

    frame.render_widget(
        Paragraph::new(sidebar_lines(&plan.sidebar, sidebar.width)),
        sidebar,
    );

    render_footer(frame, footer, plan);
}

fn render_scatter(frame: &mut Frame, area: Rect, scatter: &ScatterPlot) {
    let (x_min, x_max) = scatter.x_extent();
    let (y_min, y_max) = scatter.y_extent();
    let y_pad = (y_max - y_min) * 0.1;
    let y_bounds = [y_min - y_pad, y_max + y_pad];

    let block = panel_block(
        &scatter.labels.title,
        scatter.labels.color,
        scatter.style.face_color,
        scatter.style.spine_color,
    );

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .background_color(tui_color(scatter.style.face_color))
        .x_bounds([x_min, x_max])
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            ctx.draw(&CanvasLine {
                x1: x_min,
                y1: scatter.reference.value,
                x2: x_max,
                y2: scatter.reference.value,
                color: tui_color(scatter.reference.color),
            });
            ctx.layer();

            for point in &scatter.points {
                ctx.draw(&Points {
                    coords: &[(point.x, point.y)],
                    color: tui_color(point.fill),
                });
            }

            for note in &scatter.annotations {
                let style = text_style(&note.font, note.color);
                for (idx, line) in note.text.lines().enumerate() {
                    // Each label line sits one terminal row lower
                    let row_step = (y_bounds[1] - y_bounds[0]) / f64::from(area.height.max(1));
                    ctx.print(
                        note.x,
                        note.y - row_step * idx as f64,
                        Span::styled(line.to_string(), style),
                    );
                }
            }
        });

    frame.render_widget(canvas, area);
}

fn render_lines(frame: &mut Frame, area: Rect, plan: &RenderPlan) {
    let lines: &LinePlot = &plan.lines;
    let (y_min, y_max) = lines.y_extent();
    let x_max = lines.dates.len().saturating_sub(1).max(1) as f64;

    let ordered = lines.draw_order();
    let data: Vec<Vec<(f64, f64)>> = ordered
        .iter()
        .map(|series| {
            series
                .values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, &v)| (i as f64, v))
                .collect()
        })
        .collect();
    let reference = [(0.0, lines.reference.value), (x_max, lines.reference.value)];

    let mut datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(tui_color(lines.reference.color)))
            .data(&reference),
    ];
    for (series, points) in ordered.iter().zip(&data) {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(tui_color(series.color)))
                .data(points),
        );
    }

    let x_labels = match (lines.dates.first(), lines.dates.last()) {
        (Some(first), Some(last)) => vec![
            Span::raw(first.to_string()),
            Span::raw(lines.dates[lines.dates.len() / 2].to_string()),
            Span::raw(last.to_string()),
        ],
        _ => Vec::new(),
    };
    let y_labels = vec![
        Span::raw(format!("{:.0}", y_min)),
        Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
        Span::raw(format!("{:.0}", y_max)),
    ];

    let axis_color = tui_color(lines.style.tick_color);
    let mut y_axis = Axis::default()
        .style(Style::default().fg(axis_color))
        .bounds([y_min, y_max])
        .labels(y_labels);
    if let Some(label) = &lines.labels.y_label {
        y_axis = y_axis.title(label.clone());
    }

    let chart = Chart::new(datasets)
        .block(panel_block(
            &lines.labels.title,
            lines.labels.color,
            lines.style.face_color,
            lines.style.spine_color,
        ))
        .legend_position(None)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(axis_color))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(y_axis);

    frame.render_widget(chart, area);
    render_legend(frame, area, lines);
}

/// Legend in the upper-left corner, entries in column order
fn render_legend(frame: &mut Frame, area: Rect, lines: &LinePlot) {
    let legend = &lines.legend;
    let entries: Vec<Line> = legend
        .entries
        .iter()
        .map(|label| {
            let color = lines
                .series(label)
                .map_or(legend.text_color, |series| series.color);
            Line::from(vec![
                Span::styled("━ ", Style::default().fg(tui_color(color))),
                Span::styled(label.clone(), Style::default().fg(tui_color(legend.text_color))),
            ])
        })
        .collect();

    let width = legend
        .entries
        .iter()
        .map(|label| label.chars().count() as u16 + 2)
        .max()
        .unwrap_or(0);
    // Inside the border, right of the y-axis labels
    let legend_area = Rect {
        x: area.x + 8,
        y: area.y + 1,
        width: width.min(area.width.saturating_sub(9)),
        height: (entries.len() as u16).min(area.height.saturating_sub(2)),
    }
    .intersection(area);
    if legend_area.is_empty() {
        return;
    }

    frame.render_widget(
        Paragraph::new(entries).style(Style::default().bg(tui_color(legend.face_color))),
        legend_area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, plan: &RenderPlan) {
    let mut spans = vec![Span::styled(
        format!(" data: {} ", plan.data_source),
        Style::default().fg(HELP_COLOR),
    )];
    if let Some(overflow) = &plan.overflow {
        spans.push(Span::styled(
            format!(" {} ", overflow),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(" q quit ", Style::default().fg(HELP_COLOR)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Sidebar fragments as terminal lines.
///
/// Fragments sharing a baseline share a line, placed at a column proportional
/// to their figure x offset. Larger vertical gaps become blank lines.
pub fn sidebar_lines(fragments: &[TextFragment], width: u16) -> Vec<Line<'static>> {
    let left = fragments
        .iter()
        .map(|f| f.x)
        .fold(f64::INFINITY, f64::min);
    let span_units = (1.0 - left).max(f64::EPSILON);
    let column = |x: f64| (((x - left) / span_units) * f64::from(width)).round() as usize;

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_len = 0usize;
    let mut current_y: Option<f64> = None;

    for fragment in fragments {
        let same_row = current_y.is_some_and(|y| (y - fragment.y).abs() < 1e-9)
            && fragment.valign == VerticalAlign::Baseline;

        if !same_row {
            if let Some(y) = current_y {
                lines.push(Line::from(std::mem::take(&mut current)));
                current_len = 0;
                if y - fragment.y > SECTION_BREAK {
                    lines.push(Line::default());
                }
            }
            current_y = Some(fragment.y);
        }

        let style = text_style(&fragment.font, fragment.color);
        match fragment.valign {
            VerticalAlign::Baseline => {
                let col = column(fragment.x);
                let pad = if col > current_len {
                    col - current_len
                } else {
                    usize::from(current_len > 0)
                };
                if pad > 0 {
                    current.push(Span::raw(" ".repeat(pad)));
                }
                current_len += pad + fragment.text.chars().count();
                current.push(Span::styled(fragment.text.clone(), style));
            }
            VerticalAlign::Top => {
                let mut text_lines = fragment.lines().peekable();
                while let Some(text) = text_lines.next() {
                    current.push(Span::styled(text.to_string(), style));
                    if text_lines.peek().is_some() {
                        lines.push(Line::from(std::mem::take(&mut current)));
                    }
                }
                current_len = 0;
            }
        }
    }

    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::Modifier;
    use riskboard_core::{DashboardRenderer, MetricsStore, OfflineProvider};

    fn demo_plan() -> RenderPlan {
        DashboardRenderer::new()
            .plan(&MetricsStore::demo(), &OfflineProvider)
            .unwrap()
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_sidebar_lines_merge_label_and_value() {
        let plan = demo_plan();
        let lines: Vec<String> = sidebar_lines(&plan.sidebar, 40).iter().map(line_text).collect();

        assert_eq!(lines[0], "PORTFOLIO REPORT");
        let ret = lines
            .iter()
            .find(|l| l.starts_with("Annualized Return:"))
            .unwrap();
        assert!(ret.ends_with("-14.61%"));
        assert!(lines.iter().any(|l| l == "INDIVIDUAL METRICS:"));
        assert!(lines.iter().any(|l| l.starts_with("UBI.PA")));
    }

    #[test]
    fn test_sidebar_lines_section_breaks() {
        let plan = demo_plan();
        let lines: Vec<String> = sidebar_lines(&plan.sidebar, 40).iter().map(line_text).collect();

        let analysis = lines.iter().position(|l| l == "> SYSTEM ANALYSIS:").unwrap();
        // Before the portfolio rows, the asset table and the analysis
        assert_eq!(lines[..analysis].iter().filter(|l| l.is_empty()).count(), 3);
        assert!(lines[analysis - 1].is_empty());
        assert!(lines[analysis + 1].starts_with("• "));
    }

    #[test]
    fn test_sidebar_lines_value_column() {
        let plan = demo_plan();
        let lines = sidebar_lines(&plan.sidebar, 40);
        let sharpe = lines
            .iter()
            .find(|l| line_text(l).starts_with("Sharpe Ratio:"))
            .unwrap();

        // label, padding, bold value
        assert_eq!(sharpe.spans.len(), 3);
        assert!(sharpe.spans[2].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_sidebar_lines_empty() {
        assert!(sidebar_lines(&[], 40).is_empty());
    }

    #[test]
    fn test_draw_plan_renders_titles_and_sidebar() {
        let plan = demo_plan();
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();

        terminal.draw(|frame| draw_plan(frame, &plan)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Risk vs. Reward Map"));
        assert!(text.contains("Historical Performance (Base 100)"));
        assert!(text.contains("PORTFOLIO REPORT"));
        assert!(text.contains("synthetic"));
    }

    #[test]
    fn test_draw_plan_survives_tiny_terminal() {
        let plan = demo_plan();
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();

        terminal.draw(|frame| draw_plan(frame, &plan)).unwrap();
    }

    #[test]
    fn test_quit_keys() {
        let plan = demo_plan();
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut view = DashboardView::new(&plan);
            view.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
            assert!(view.exit);
        }

        let mut view = DashboardView::new(&plan);
        view.handle_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(!view.exit);
    }
}
