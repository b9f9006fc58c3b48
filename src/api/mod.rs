use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

use crate::error::{RetrievalError, UniverseError};
use crate::models::FinancialHistory;

pub mod universe;
pub mod yahoo_client;
pub use universe::{CsvSp500, StaticUniverse, WikipediaSp500};
pub use yahoo_client::YahooClient;

/// Spaces outbound API requests evenly across a minute
pub struct ApiRateLimiter {
    limiter: DefaultDirectRateLimiter,
}

impl ApiRateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct(
                Quota::per_minute(per_minute).allow_burst(NonZeroU32::MIN),
            ),
        }
    }

    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

/// Source of per-ticker statement data.
#[async_trait]
pub trait FinancialDataProvider: Send + Sync {
    /// Statement snapshots for `ticker`, newest period first.
    async fn fetch_history(&self, ticker: &str) -> Result<FinancialHistory, RetrievalError>;
}

/// Source of the ticker universe to screen.
#[async_trait]
pub trait UniverseProvider: Send + Sync {
    /// Tickers in source order. An explicit list may be empty. The scraped
    /// S&P 500 sources treat an empty listing as a parse error, since the
    /// index never has zero members.
    async fn tickers(&self) -> Result<Vec<String>, UniverseError>;
}
