//! Sequential screening pipeline.
//!
//! Tickers are evaluated one at a time, in input order. A ticker whose data
//! cannot be fetched, or whose metrics cannot all be computed, is skipped and
//! recorded in the [`ScanReport`]; it never aborts the scan.

use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::metrics::MetricSet;
use crate::api::{FinancialDataProvider, UniverseProvider};
use crate::error::{DataUnavailable, RetrievalError, UniverseError};
use crate::models::{FinancialHistory, ScreenResult, ScreeningCriteria};
use crate::ui::ResultTable;

/// A screening criterion, used to report why a ticker was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    AltmanZScore,
    InterestCoverage,
    ReturnOnEquity,
    EbitdaGrowth,
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AltmanZScore => write!(f, "Altman Z-Score"),
            Self::InterestCoverage => write!(f, "Interest Coverage Ratio"),
            Self::ReturnOnEquity => write!(f, "ROE"),
            Self::EbitdaGrowth => write!(f, "EBITDA Growth"),
        }
    }
}

/// Fully computed metric values for one ticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricValues {
    pub altman_z_score: f64,
    pub interest_coverage_ratio: f64,
    pub roe: f64,
    /// `None` only when growth is not required and could not be computed.
    pub ebitda_growth: Option<bool>,
}

impl MetricValues {
    /// Unwraps every metric the criteria need, or names the first unavailable one.
    pub fn from_set(metrics: &MetricSet, criteria: &ScreeningCriteria) -> Result<Self, SkipReason> {
        let unavailable =
            |metric: Criterion| move |cause: DataUnavailable| SkipReason::Unavailable { metric, cause };
        let altman_z_score = metrics
            .altman_z_score
            .map_err(unavailable(Criterion::AltmanZScore))?;
        let interest_coverage_ratio = metrics
            .interest_coverage_ratio
            .map_err(unavailable(Criterion::InterestCoverage))?;
        let roe = metrics.roe.map_err(unavailable(Criterion::ReturnOnEquity))?;
        let ebitda_growth = if criteria.require_ebitda_growth {
            Some(
                metrics
                    .ebitda_growth
                    .map_err(unavailable(Criterion::EbitdaGrowth))?,
            )
        } else {
            metrics.ebitda_growth.ok()
        };

        Ok(Self {
            altman_z_score,
            interest_coverage_ratio,
            roe,
            ebitda_growth,
        })
    }
}

impl ScreeningCriteria {
    /// Criteria the values do not satisfy. Empty means the ticker qualifies.
    pub fn failed_criteria(&self, values: &MetricValues) -> Vec<Criterion> {
        // Negated comparisons so that NaN never passes.
        let mut failed = Vec::new();
        if !(values.altman_z_score > self.min_altman_z_score) {
            failed.push(Criterion::AltmanZScore);
        }
        if !(values.interest_coverage_ratio > self.min_interest_coverage) {
            failed.push(Criterion::InterestCoverage);
        }
        if !(values.roe > self.min_roe) {
            failed.push(Criterion::ReturnOnEquity);
        }
        if self.require_ebitda_growth && values.ebitda_growth != Some(true) {
            failed.push(Criterion::EbitdaGrowth);
        }
        failed
    }
}

/// Why a ticker was left out of the evaluation.
#[derive(Debug)]
pub enum SkipReason {
    Retrieval(RetrievalError),
    Unavailable {
        metric: Criterion,
        cause: DataUnavailable,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retrieval(e) => write!(f, "{}", e),
            Self::Unavailable { metric, cause } => write!(f, "{} unavailable: {}", metric, cause),
        }
    }
}

/// Outcome of evaluating a single ticker.
#[derive(Debug)]
pub enum TickerOutcome {
    Qualified(ScreenResult),
    Rejected {
        ticker: String,
        failed: Vec<Criterion>,
    },
    Skipped {
        ticker: String,
        reason: SkipReason,
    },
}

/// A ticker that could not be evaluated.
#[derive(Debug)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

/// A ticker that was evaluated but missed at least one threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedTicker {
    pub ticker: String,
    pub failed: Vec<Criterion>,
}

/// Aggregated outcome of a scan, in input order.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub results: Vec<ScreenResult>,
    pub rejected: Vec<RejectedTicker>,
    pub skipped: Vec<SkippedTicker>,
}

impl ScanReport {
    pub fn evaluated(&self) -> usize {
        self.results.len() + self.rejected.len() + self.skipped.len()
    }

    pub fn table(&self) -> ResultTable {
        ResultTable::new(self.results.clone())
    }

    fn record(&mut self, outcome: TickerOutcome) {
        match outcome {
            TickerOutcome::Qualified(result) => self.results.push(result),
            TickerOutcome::Rejected { ticker, failed } => {
                self.rejected.push(RejectedTicker { ticker, failed })
            }
            TickerOutcome::Skipped { ticker, reason } => {
                self.skipped.push(SkippedTicker { ticker, reason })
            }
        }
    }
}

/// Screens tickers against [`ScreeningCriteria`] using data from a provider.
pub struct Screener<P> {
    provider: P,
    criteria: ScreeningCriteria,
    fetch_timeout: Option<Duration>,
}

impl<P: FinancialDataProvider> Screener<P> {
    pub fn new(provider: P, criteria: ScreeningCriteria) -> Self {
        Self {
            provider,
            criteria,
            fetch_timeout: None,
        }
    }

    /// Bound each per-ticker fetch. A timeout counts as a retrieval failure.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn criteria(&self) -> &ScreeningCriteria {
        &self.criteria
    }

    /// Evaluate one ticker. Never fails; problems become [`TickerOutcome::Skipped`].
    pub async fn evaluate(&self, ticker: &str) -> TickerOutcome {
        let history = match self.fetch(ticker).await {
            Ok(history) => history,
            Err(e) => {
                return TickerOutcome::Skipped {
                    ticker: ticker.to_string(),
                    reason: SkipReason::Retrieval(e),
                }
            }
        };

        let metrics = MetricSet::compute(&history);
        let values = match MetricValues::from_set(&metrics, &self.criteria) {
            Ok(values) => values,
            Err(reason) => {
                return TickerOutcome::Skipped {
                    ticker: ticker.to_string(),
                    reason,
                }
            }
        };

        let failed = self.criteria.failed_criteria(&values);
        if !failed.is_empty() {
            return TickerOutcome::Rejected {
                ticker: ticker.to_string(),
                failed,
            };
        }

        TickerOutcome::Qualified(ScreenResult {
            ticker: ticker.to_string(),
            altman_z_score: values.altman_z_score,
            interest_coverage_ratio: values.interest_coverage_ratio,
            roe: values.roe,
            ebitda_growth: values.ebitda_growth,
        })
    }

    /// Screen every ticker in order.
    pub async fn run(&self, tickers: &[String]) -> ScanReport {
        info!("🔍 Screening {} tickers", tickers.len());
        let mut report = ScanReport::default();

        for ticker in tickers {
            let outcome = self.evaluate(ticker).await;
            match &outcome {
                TickerOutcome::Qualified(result) => info!(
                    "✅ {} qualifies: Z={:.2} ICR={:.2} ROE={:.2}%",
                    result.ticker,
                    result.altman_z_score,
                    result.interest_coverage_ratio,
                    result.roe
                ),
                TickerOutcome::Rejected { ticker, failed } => {
                    let failed: Vec<String> = failed.iter().map(|c| c.to_string()).collect();
                    debug!("{} rejected on {}", ticker, failed.join(", "));
                }
                TickerOutcome::Skipped { ticker, reason } => {
                    warn!("Could not get data for {}: {}", ticker, reason)
                }
            }
            report.record(outcome);
        }

        info!(
            "🎯 {} of {} tickers passed ({} rejected, {} skipped)",
            report.results.len(),
            report.evaluated(),
            report.rejected.len(),
            report.skipped.len()
        );
        report
    }

    /// Fetch the universe and screen it. Failing to get the universe fails the scan.
    pub async fn run_universe<U>(&self, universe: &U) -> Result<ScanReport, UniverseError>
    where
        U: UniverseProvider + ?Sized,
    {
        let tickers = universe.tickers().await?;
        Ok(self.run(&tickers).await)
    }

    async fn fetch(&self, ticker: &str) -> Result<FinancialHistory, RetrievalError> {
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, self.provider.fetch_history(ticker))
                .await
                .map_err(|_| RetrievalError::Timeout(limit))?,
            None => self.provider.fetch_history(ticker).await,
        }
    }
}
