//! YAML inputs: the portfolio definition and the price history file

pub mod portfolio_file;
pub mod price_file;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

pub use portfolio_file::PortfolioFile;
pub use price_file::{FilePriceProvider, PriceFile};

/// Error loading or saving an input file
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(msg) => write!(f, "IO error: {}", msg),
            LoadError::Parse(msg) => write!(f, "Parse error: {}", msg),
            LoadError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

/// Read and parse a YAML file
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path)
        .map_err(|e| LoadError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_saphyr::from_str(&content)
        .map_err(|e| LoadError::Parse(format!("Failed to parse {}: {}", path.display(), e)))
}
