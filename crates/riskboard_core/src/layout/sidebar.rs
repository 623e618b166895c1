//! Vertical layout accumulator for the sidebar
//!
//! Blocks are placed top-down from a fixed anchor. Each block is drawn at the
//! cursor's current y and then moves the cursor down by its own advance. Any
//! block reaching below the floor is still placed, but the overflow is
//! recorded and reported by `finish`.

use crate::config::LayoutConfig;
use crate::model::Color;

use super::plan::{FontSpec, LayoutOverflowWarning, TextFragment, VerticalAlign};

/// One piece of text waiting to be placed
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarBlock {
    pub text: String,
    /// Horizontal offset from the sidebar anchor
    pub dx: f64,
    pub font: FontSpec,
    pub color: Color,
    pub valign: VerticalAlign,
    /// Distance the cursor moves down after placing this block
    pub advance: f64,
}

impl SidebarBlock {
    pub fn new(text: impl Into<String>, font: FontSpec, color: Color) -> Self {
        Self {
            text: text.into(),
            dx: 0.0,
            font,
            color,
            valign: VerticalAlign::Baseline,
            advance: 0.0,
        }
    }

    #[must_use]
    pub fn offset(mut self, dx: f64) -> Self {
        self.dx = dx;
        self
    }

    #[must_use]
    pub fn advance(mut self, advance: f64) -> Self {
        self.advance = advance;
        self
    }

    #[must_use]
    pub fn top_aligned(mut self) -> Self {
        self.valign = VerticalAlign::Top;
        self
    }
}

/// Where a block landed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    /// Lowest y the block's text reaches
    pub bottom: f64,
}

#[derive(Debug, Clone)]
pub struct SidebarCursor {
    x: f64,
    top: f64,
    y: f64,
    floor: f64,
    /// Normalized height of one text line per point of font size
    line_height_per_pt: f64,
    placed: Vec<TextFragment>,
    lowest: f64,
}

impl SidebarCursor {
    #[must_use]
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            x: config.sidebar_x,
            top: config.sidebar_top,
            y: config.sidebar_top,
            floor: config.sidebar_floor,
            line_height_per_pt: config.line_height(1.0),
            placed: Vec::new(),
            lowest: config.sidebar_top,
        }
    }

    /// Current y
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Move down without placing anything
    pub fn skip(&mut self, dy: f64) {
        self.y -= dy;
    }

    /// Vertical extent of a block below its anchor
    fn extent(&self, block: &SidebarBlock) -> f64 {
        match block.valign {
            VerticalAlign::Baseline => 0.0,
            VerticalAlign::Top => {
                let lines = block.text.lines().count().max(1) as f64;
                lines * block.font.size * self.line_height_per_pt
            }
        }
    }

    pub fn emit(&mut self, block: SidebarBlock) -> Placement {
        let placement = Placement {
            x: self.x + block.dx,
            y: self.y,
            bottom: self.y - self.extent(&block),
        };
        if placement.bottom < self.floor {
            tracing::debug!(
                text = block.text.lines().next().unwrap_or_default(),
                bottom = placement.bottom,
                "sidebar block below floor"
            );
        }
        self.lowest = self.lowest.min(placement.bottom);

        self.placed.push(TextFragment {
            text: block.text,
            x: placement.x,
            y: placement.y,
            font: block.font,
            color: block.color,
            valign: block.valign,
        });
        self.y -= block.advance;
        placement
    }

    /// Placed fragments and the overflow, if any block went below the floor
    #[must_use]
    pub fn finish(self) -> (Vec<TextFragment>, Option<LayoutOverflowWarning>) {
        let overflow = (self.lowest < self.floor).then(|| LayoutOverflowWarning {
            required: self.top - self.lowest,
            available: self.top - self.floor,
        });
        (self.placed, overflow)
    }
}
