//! Stand-in data providers for screener tests.

use async_trait::async_trait;
use health_screener::api::FinancialDataProvider;
use health_screener::error::RetrievalError;
use health_screener::models::FinancialHistory;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

mockall::mock! {
    pub DataProvider {}

    #[async_trait]
    impl FinancialDataProvider for DataProvider {
        async fn fetch_history(&self, ticker: &str) -> Result<FinancialHistory, RetrievalError>;
    }
}

/// Serves canned histories; unknown tickers fail like an unlisted symbol.
#[derive(Default)]
pub struct FixtureProvider {
    histories: HashMap<String, FinancialHistory>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FixtureProvider {
    pub fn new(histories: Vec<FinancialHistory>) -> Self {
        Self {
            histories: histories.into_iter().map(|h| (h.ticker.clone(), h)).collect(),
            requests: Arc::default(),
        }
    }

    /// Shared log of requested tickers, in request order. Stays readable
    /// after the provider is moved into a screener.
    pub fn request_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl FinancialDataProvider for FixtureProvider {
    async fn fetch_history(&self, ticker: &str) -> Result<FinancialHistory, RetrievalError> {
        self.requests.lock().unwrap().push(ticker.to_string());
        self.histories
            .get(ticker)
            .cloned()
            .ok_or_else(|| RetrievalError::UnknownSymbol(ticker.to_string()))
    }
}

/// Answers only after `delay`.
pub struct SlowProvider {
    pub delay: Duration,
    pub history: FinancialHistory,
}

#[async_trait]
impl FinancialDataProvider for SlowProvider {
    async fn fetch_history(&self, _ticker: &str) -> Result<FinancialHistory, RetrievalError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.history.clone())
    }
}
