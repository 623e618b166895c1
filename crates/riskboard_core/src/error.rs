use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Reasons the market-data provider could not supply a usable price table.
///
/// These never reach the caller of the dashboard: every variant is recovered
/// by substituting the synthetic fallback table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FetchError {
    /// Provider unreachable, I/O failure, or any provider-side exception
    Unavailable(String),
    /// Provider answered with no rows
    Empty,
    /// A requested ticker has no column in the response
    MissingColumn(String),
    /// A column does not have one value per date
    LengthMismatch {
        ticker: String,
        expected: usize,
        actual: usize,
    },
    /// Date index is not strictly ascending
    UnsortedDates,
    /// A column exists but contains no observation at all
    AllMissing(String),
    /// A column has no observation on the first date, so it cannot be rebased
    MissingBasePrice(String),
    /// Provider did not answer within the caller-supplied timeout
    Timeout(Duration),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Unavailable(msg) => write!(f, "market data unavailable: {msg}"),
            FetchError::Empty => write!(f, "market data response is empty"),
            FetchError::MissingColumn(ticker) => write!(f, "no price column for {ticker}"),
            FetchError::LengthMismatch {
                ticker,
                expected,
                actual,
            } => write!(
                f,
                "price column {ticker} has {actual} values, expected {expected}"
            ),
            FetchError::UnsortedDates => write!(f, "date index is not strictly ascending"),
            FetchError::AllMissing(ticker) => write!(f, "price column {ticker} has no values"),
            FetchError::MissingBasePrice(ticker) => {
                write!(f, "price column {ticker} has no value on the first date")
            }
            FetchError::Timeout(limit) => {
                write!(f, "market data request exceeded {:.1}s", limit.as_secs_f64())
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Invalid input that must stop the render before anything is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    NoAssets,
    DuplicateTicker(String),
    /// First price of a series is exactly zero, normalization would divide by zero
    ZeroBasePrice { ticker: String },
    /// First price of a series is NaN, infinite or negative
    InvalidBasePrice { ticker: String, value: f64 },
    /// A ticker is referenced but has no `AssetRecord`
    MissingMetrics(String),
    /// An uncategorized ticker needs a return to pick its color but has none
    MissingReturn(String),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::NoAssets => write!(f, "no assets to report on"),
            DataError::DuplicateTicker(ticker) => write!(f, "ticker {ticker} is listed twice"),
            DataError::ZeroBasePrice { ticker } => {
                write!(f, "first price of {ticker} is zero, cannot normalize")
            }
            DataError::InvalidBasePrice { ticker, value } => {
                write!(f, "first price of {ticker} is {value}, cannot normalize")
            }
            DataError::MissingMetrics(ticker) => write!(f, "no metrics record for {ticker}"),
            DataError::MissingReturn(ticker) => {
                write!(f, "ticker {ticker} has no category and no return to color by")
            }
        }
    }
}

impl std::error::Error for DataError {}

/// Failure reported by a rendering surface
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    Io(String),
    Backend(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Io(msg) => write!(f, "surface I/O error: {msg}"),
            SurfaceError::Backend(msg) => write!(f, "surface error: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

impl From<std::io::Error> for SurfaceError {
    fn from(err: std::io::Error) -> Self {
        SurfaceError::Io(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    Data(DataError),
    Surface(SurfaceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Data(e) => write!(f, "{e}"),
            RenderError::Surface(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Data(e) => Some(e),
            RenderError::Surface(e) => Some(e),
        }
    }
}

impl From<DataError> for RenderError {
    fn from(err: DataError) -> Self {
        RenderError::Data(err)
    }
}

impl From<SurfaceError> for RenderError {
    fn from(err: SurfaceError) -> Self {
        RenderError::Surface(err)
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
