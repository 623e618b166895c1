mod asset;
mod color;
mod portfolio;
mod prices;

pub use asset::AssetRecord;
pub use color::Color;
pub use portfolio::PortfolioMetrics;
pub use prices::{NormalizedSeries, PriceColumn, PriceTable};
