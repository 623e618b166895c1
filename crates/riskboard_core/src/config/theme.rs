use serde::{Deserialize, Serialize};

use crate::model::Color;

/// Immutable color theme passed to the encoder and the layout engine.
///
/// Partial YAML overrides are allowed; omitted fields keep the dark defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Figure background
    pub background: Color,
    /// Subplot face color
    pub panel_background: Color,
    pub text_color: Color,
    pub grid_color: Color,
    /// Losers, negative metrics, and the focus asset
    pub alert_color: Color,
    /// Gainers, non-negative metrics, and the hedge asset
    pub positive_color: Color,
    pub accent_gold: Color,
    pub accent_blue: Color,
    /// Lines of assets that match no category
    pub muted_color: Color,
    /// Commentary body text
    pub commentary_color: Color,
    /// Scatter marker outline
    pub marker_edge_color: Color,
}

impl Theme {
    /// Dark slate theme used by default
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            background: Color::rgb(0x1F, 0x26, 0x30),
            panel_background: Color::rgb(0x25, 0x2E, 0x3B),
            text_color: Color::rgb(0xE0, 0xE0, 0xE0),
            grid_color: Color::rgb(0x37, 0x41, 0x51),
            alert_color: Color::rgb(0xFF, 0x52, 0x52),
            positive_color: Color::rgb(0x69, 0xF0, 0xAE),
            accent_gold: Color::rgb(0xFF, 0xB7, 0x4D),
            accent_blue: Color::rgb(0x4F, 0xC3, 0xF7),
            muted_color: Color::rgb(0x88, 0x88, 0x88),
            commentary_color: Color::rgb(0xB0, 0xBE, 0xC5),
            marker_edge_color: Color::WHITE,
        }
    }

    /// Color for a value by sign (negative -> alert, otherwise positive)
    #[must_use]
    pub fn sign_color(&self, value: f64) -> Color {
        if value < 0.0 {
            self.alert_color
        } else {
            self.positive_color
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
