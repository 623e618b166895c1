//! Portfolio risk dashboard front end
//!
//! Loads a portfolio definition and an optional price history from YAML,
//! runs the `riskboard_core` pipeline, and draws the resulting plan on one of
//! the surfaces:
//! - `TerminalSurface`: interactive ratatui view (quit with `q` or `Esc`)
//! - `SvgSurface`: standalone SVG file
//! - `JsonSurface`: the raw plan as JSON

// ============================================================================
// Input and output modules
// ============================================================================

pub mod data;
pub mod surfaces;

// ============================================================================
// Support modules
// ============================================================================

pub mod logging;
pub mod util;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use data::{FilePriceProvider, LoadError, PortfolioFile, PriceFile};
pub use logging::init_logging;
pub use surfaces::{JsonSurface, SvgSurface, TerminalSurface};
