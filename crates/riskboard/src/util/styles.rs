//! Mapping from plan colors and fonts to ratatui styles

use ratatui::{
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders},
};
use riskboard_core::layout::FontSpec;

/// Color of the key hint in the footer
pub const HELP_COLOR: Color = Color::DarkGray;

/// Convert a plan color into a 24-bit terminal color
pub fn tui_color(color: riskboard_core::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Foreground style for text drawn with `font` in `color`.
///
/// Terminals have a single font size, so only the weight carries over.
pub fn text_style(font: &FontSpec, color: riskboard_core::Color) -> Style {
    let style = Style::default().fg(tui_color(color));
    if font.is_bold() {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

/// Bordered panel with a bold title, as used for both chart panes
pub fn panel_block(
    title: &str,
    title_color: riskboard_core::Color,
    face: riskboard_core::Color,
    border: riskboard_core::Color,
) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tui_color(border)))
        .style(Style::default().bg(tui_color(face)))
        .title(Line::from(format!(" {} ", title)).style(
            Style::default()
                .fg(tui_color(title_color))
                .add_modifier(Modifier::BOLD),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_color() {
        let color = riskboard_core::Color::rgb(0x1F, 0x26, 0x30);
        assert_eq!(tui_color(color), Color::Rgb(0x1F, 0x26, 0x30));
    }

    #[test]
    fn test_text_style_weight() {
        let white = riskboard_core::Color::WHITE;

        let bold = text_style(&FontSpec::new(11.0).bold(), white);
        assert!(bold.add_modifier.contains(Modifier::BOLD));

        let plain = text_style(&FontSpec::new(11.0), white);
        assert!(!plain.add_modifier.contains(Modifier::BOLD));
        assert_eq!(plain.fg, Some(Color::Rgb(0xFF, 0xFF, 0xFF)));
    }

    #[test]
    fn test_panel_block_title() {
        let c = riskboard_core::Color::WHITE;
        let block = panel_block("Risk vs. Reward Map", c, c, c);
        assert!(format!("{:?}", block).contains("Risk vs. Reward Map"));
    }
}
