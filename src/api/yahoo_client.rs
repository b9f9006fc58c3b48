use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use url::Url;

use super::{ApiRateLimiter, FinancialDataProvider};
use crate::error::RetrievalError;
use crate::models::{Config, FinancialHistory, StatementSnapshot};
use crate::utils::{normalize_symbol, statement_window};

const CURRENT_ASSETS: &str = "annualCurrentAssets";
const CURRENT_LIABILITIES: &str = "annualCurrentLiabilities";
const TOTAL_ASSETS: &str = "annualTotalAssets";
const TOTAL_LIABILITIES: &str = "annualTotalLiabilitiesNetMinorityInterest";
const RETAINED_EARNINGS: &str = "annualRetainedEarnings";
const GROSS_PROFIT: &str = "annualGrossProfit";
const OPERATING_EXPENSE: &str = "annualOperatingExpense";
const INTEREST_EXPENSE: &str = "annualInterestExpense";
const TOTAL_REVENUE: &str = "annualTotalRevenue";
const NET_INCOME: &str = "annualNetIncome";
const TAX_PROVISION: &str = "annualTaxProvision";
const RECONCILED_DEPRECIATION: &str = "annualReconciledDepreciation";
const SHARES: &str = "annualOrdinarySharesNumber";

/// Timeseries requested for every ticker.
pub const STATEMENT_SERIES: [&str; 13] = [
    CURRENT_ASSETS,
    CURRENT_LIABILITIES,
    TOTAL_ASSETS,
    TOTAL_LIABILITIES,
    RETAINED_EARNINGS,
    GROSS_PROFIT,
    OPERATING_EXPENSE,
    INTEREST_EXPENSE,
    TOTAL_REVENUE,
    NET_INCOME,
    TAX_PROVISION,
    RECONCILED_DEPRECIATION,
    SHARES,
];

fn slot<'a>(snapshot: &'a mut StatementSnapshot, series: &str) -> Option<&'a mut Option<f64>> {
    let slot = match series {
        CURRENT_ASSETS => &mut snapshot.current_assets,
        CURRENT_LIABILITIES => &mut snapshot.current_liabilities,
        TOTAL_ASSETS => &mut snapshot.total_assets,
        TOTAL_LIABILITIES => &mut snapshot.total_liabilities_net_minority_interest,
        RETAINED_EARNINGS => &mut snapshot.retained_earnings,
        GROSS_PROFIT => &mut snapshot.gross_profit,
        OPERATING_EXPENSE => &mut snapshot.operating_expense,
        INTEREST_EXPENSE => &mut snapshot.interest_expense,
        TOTAL_REVENUE => &mut snapshot.total_revenue,
        NET_INCOME => &mut snapshot.net_income,
        TAX_PROVISION => &mut snapshot.tax_provision,
        RECONCILED_DEPRECIATION => &mut snapshot.reconciled_depreciation,
        SHARES => &mut snapshot.shares_outstanding,
        _ => return None,
    };
    Some(slot)
}

/// fundamentals-timeseries response
#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesBody,
}

#[derive(Debug, Deserialize)]
struct TimeseriesBody {
    result: Option<Vec<TimeseriesSeries>>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesSeries {
    meta: SeriesMeta,
    #[serde(flatten)]
    data: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct SeriesMeta {
    #[serde(rename = "type", default)]
    series_type: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesPoint {
    as_of_date: NaiveDate,
    reported_value: Option<ReportedValue>,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    raw: Option<f64>,
}

/// chart response, only the parts needed for the latest close
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    indicators: Option<ChartIndicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Yahoo Finance client for annual statements and the latest close price
pub struct YahooClient {
    client: Client,
    base_url: Url,
    rate_limiter: ApiRateLimiter,
}

impl YahooClient {
    /// Create a new Yahoo Finance client
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent("Mozilla/5.0 (compatible; health-screener/0.1)")
            .build()?;

        let base_url = Url::parse(&config.yahoo_base_url)
            .map_err(|e| anyhow!("Invalid YAHOO_BASE_URL {}: {}", config.yahoo_base_url, e))?;

        Ok(Self {
            client,
            base_url,
            rate_limiter: ApiRateLimiter::new(config.rate_limit_per_minute),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RetrievalError> {
        self.base_url
            .join(path)
            .map_err(|e| RetrievalError::Malformed(format!("invalid request url {}: {}", path, e)))
    }

    /// Annual statement snapshots, newest first, without market data.
    pub async fn get_statements(&self, symbol: &str) -> Result<Vec<StatementSnapshot>, RetrievalError> {
        let (period1, period2) = statement_window(Utc::now());
        let mut url = self.endpoint(&format!(
            "/ws/fundamentals-timeseries/v1/finance/timeseries/{}",
            symbol
        ))?;
        url.query_pairs_mut()
            .append_pair("symbol", symbol)
            .append_pair("type", &STATEMENT_SERIES.join(","))
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &period2.to_string());

        debug!("Requesting statements: {}", url);
        self.rate_limiter.wait().await;
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(RetrievalError::UnknownSymbol(symbol.to_string())),
            status if !status.is_success() => {
                return Err(RetrievalError::Http {
                    status: status.as_u16(),
                    endpoint: "timeseries",
                })
            }
            _ => {}
        }

        let body: TimeseriesResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Malformed(e.to_string()))?;
        parse_statements(symbol, body)
    }

    /// Most recent close price, `None` when the chart carries no price.
    pub async fn get_close_price(&self, symbol: &str) -> Result<Option<f64>, RetrievalError> {
        let mut url = self.endpoint(&format!("/v8/finance/chart/{}", symbol))?;
        url.query_pairs_mut()
            .append_pair("range", "5d")
            .append_pair("interval", "1d");

        debug!("Requesting chart: {}", url);
        self.rate_limiter.wait().await;
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(RetrievalError::UnknownSymbol(symbol.to_string())),
            status if !status.is_success() => {
                return Err(RetrievalError::Http {
                    status: status.as_u16(),
                    endpoint: "chart",
                })
            }
            _ => {}
        }

        let body: ChartResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Malformed(e.to_string()))?;
        parse_close_price(symbol, body)
    }
}

#[async_trait]
impl FinancialDataProvider for YahooClient {
    async fn fetch_history(&self, ticker: &str) -> Result<FinancialHistory, RetrievalError> {
        let symbol = normalize_symbol(ticker);
        let mut periods = self.get_statements(&symbol).await?;
        let close_price = self.get_close_price(&symbol).await?;

        if let Some(latest) = periods.first_mut() {
            latest.close_price = close_price;
        }

        debug!("{}: {} annual periods, close {:?}", symbol, periods.len(), close_price);
        Ok(FinancialHistory::new(ticker, periods))
    }
}

fn parse_statements(
    symbol: &str,
    body: TimeseriesResponse,
) -> Result<Vec<StatementSnapshot>, RetrievalError> {
    if let Some(error) = body.timeseries.error.filter(|e| !e.is_null()) {
        return Err(RetrievalError::Malformed(format!("timeseries error: {}", error)));
    }

    let mut by_period: BTreeMap<NaiveDate, StatementSnapshot> = BTreeMap::new();

    for mut series in body.timeseries.result.unwrap_or_default() {
        let Some(series_type) = series.meta.series_type.first().cloned() else {
            continue;
        };
        // Series without data omit the key entirely
        let Some(raw_points) = series.data.remove(&series_type) else {
            continue;
        };
        let points: Vec<Option<SeriesPoint>> = serde_json::from_value(raw_points)
            .map_err(|e| RetrievalError::Malformed(format!("{}: {}", series_type, e)))?;

        for point in points.into_iter().flatten() {
            let value = point.reported_value.and_then(|v| v.raw);
            let snapshot = by_period
                .entry(point.as_of_date)
                .or_insert_with(|| StatementSnapshot {
                    period_end: Some(point.as_of_date),
                    ..Default::default()
                });
            if let Some(slot) = slot(snapshot, &series_type) {
                *slot = value;
            }
        }
    }

    if by_period.is_empty() {
        return Err(RetrievalError::NoStatements(symbol.to_string()));
    }

    Ok(by_period.into_values().rev().collect())
}

fn parse_close_price(symbol: &str, body: ChartResponse) -> Result<Option<f64>, RetrievalError> {
    if let Some(error) = body.chart.error {
        if error.code == "Not Found" {
            return Err(RetrievalError::UnknownSymbol(symbol.to_string()));
        }
        return Err(RetrievalError::Malformed(format!(
            "chart error {}: {}",
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    let Some(result) = body.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(RetrievalError::UnknownSymbol(symbol.to_string()));
    };

    if let Some(price) = result.meta.regular_market_price {
        return Ok(Some(price));
    }

    let last_close = result
        .indicators
        .and_then(|i| i.quote.into_iter().next())
        .and_then(|q| q.close.into_iter().rev().flatten().next());
    Ok(last_close)
}
