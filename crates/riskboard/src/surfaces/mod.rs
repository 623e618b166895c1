//! Rendering surfaces for a finished `RenderPlan`

pub mod json;
pub mod svg;
pub mod terminal;

pub use json::JsonSurface;
pub use svg::{SvgSurface, render_svg};
pub use terminal::{TerminalSurface, draw_plan};
