//! Error types for the three failure levels of a scan.
//!
//! - [`DataUnavailable`]: a single metric could not be produced.
//! - [`RetrievalError`]: one ticker's data could not be fetched. The screener
//!   turns it into a skip.
//! - [`UniverseError`]: the ticker universe itself could not be obtained.

use std::time::Duration;
use thiserror::Error;

/// Why a metric has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DataUnavailable {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("zero denominator `{0}`")]
    ZeroDenominator(&'static str),
    #[error("no reporting period at offset {0}")]
    MissingPeriod(usize),
    #[error("non-finite value for `{0}`")]
    NonFinite(&'static str),
}

/// Result type returned by every metric function.
pub type MetricResult<T> = Result<T, DataUnavailable>;

/// Failure to obtain statement data for a single ticker.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} from {endpoint}")]
    Http { status: u16, endpoint: &'static str },
    #[error("unknown symbol {0}")]
    UnknownSymbol(String),
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("no financial statements reported for {0}")]
    NoStatements(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure to produce the ticker universe. Fatal to a universe scan.
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to fetch universe: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("universe source returned HTTP {0}")]
    Http(u16),
    #[error("failed to read constituents csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to parse universe: {0}")]
    Parse(String),
}
