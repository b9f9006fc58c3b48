use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Balance sheet, income statement and market values for one reporting period.
///
/// Every line item is optional: a company may not report it for a period.
/// Missing values must surface as an unavailable metric, never as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementSnapshot {
    pub period_end: Option<NaiveDate>,

    // Balance sheet
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities_net_minority_interest: Option<f64>,
    pub retained_earnings: Option<f64>,

    // Income statement
    pub gross_profit: Option<f64>,
    pub operating_expense: Option<f64>,
    pub interest_expense: Option<f64>,
    pub total_revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub tax_provision: Option<f64>,
    pub reconciled_depreciation: Option<f64>,

    // Market data
    pub close_price: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

/// Reporting periods for one ticker, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialHistory {
    pub ticker: String,
    pub periods: Vec<StatementSnapshot>,
}

impl FinancialHistory {
    pub fn new(ticker: impl Into<String>, periods: Vec<StatementSnapshot>) -> Self {
        Self {
            ticker: ticker.into(),
            periods,
        }
    }

    /// Snapshot `offset` periods back from the most recent one.
    pub fn period(&self, offset: usize) -> Option<&StatementSnapshot> {
        self.periods.get(offset)
    }

    pub fn latest(&self) -> Option<&StatementSnapshot> {
        self.period(0)
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// One row of the screen output. Only built for tickers passing every criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenResult {
    pub ticker: String,
    pub altman_z_score: f64,
    pub interest_coverage_ratio: f64,
    pub roe: f64,
    /// `None` when growth could not be computed and was not required.
    pub ebitda_growth: Option<bool>,
}

/// Pass thresholds. Every comparison is strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningCriteria {
    pub min_altman_z_score: f64,
    pub min_interest_coverage: f64,
    /// Percent, e.g. `20.0` for 20%.
    pub min_roe: f64,
    pub require_ebitda_growth: bool,
}

impl Default for ScreeningCriteria {
    fn default() -> Self {
        Self {
            min_altman_z_score: 4.0,
            min_interest_coverage: 0.0,
            min_roe: 20.0,
            require_ebitda_growth: true,
        }
    }
}

/// Where the S&P 500 ticker list comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum UniverseSource {
    #[default]
    Wikipedia,
    Csv,
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub yahoo_base_url: String,
    pub sp500_wikipedia_url: String,
    pub sp500_csv_url: String,
    pub request_timeout: Duration,
    /// Upper bound on fetching one ticker's data, rate limiting included.
    pub ticker_timeout: Duration,
    pub rate_limit_per_minute: u32,
    pub criteria: ScreeningCriteria,
}

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_SP500_WIKIPEDIA_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";
pub const DEFAULT_SP500_CSV_URL: &str =
    "https://raw.githubusercontent.com/datasets/s-and-p-500-companies/main/data/constituents.csv";

impl Default for Config {
    fn default() -> Self {
        Self {
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            sp500_wikipedia_url: DEFAULT_SP500_WIKIPEDIA_URL.to_string(),
            sp500_csv_url: DEFAULT_SP500_CSV_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            ticker_timeout: Duration::from_secs(90),
            rate_limit_per_minute: 120,
            criteria: ScreeningCriteria::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Build a config from any key lookup. Unset or unparseable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());

        let criteria = ScreeningCriteria {
            min_altman_z_score: parsed("SCREEN_MIN_ALTMAN_Z")
                .unwrap_or(defaults.criteria.min_altman_z_score),
            min_interest_coverage: parsed("SCREEN_MIN_INTEREST_COVERAGE")
                .unwrap_or(defaults.criteria.min_interest_coverage),
            min_roe: parsed("SCREEN_MIN_ROE").unwrap_or(defaults.criteria.min_roe),
            require_ebitda_growth: lookup("SCREEN_REQUIRE_EBITDA_GROWTH")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.criteria.require_ebitda_growth),
        };

        Config {
            yahoo_base_url: lookup("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            sp500_wikipedia_url: lookup("SP500_WIKIPEDIA_URL")
                .unwrap_or(defaults.sp500_wikipedia_url),
            sp500_csv_url: lookup("SP500_CSV_URL").unwrap_or(defaults.sp500_csv_url),
            request_timeout: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            ticker_timeout: lookup("TICKER_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.ticker_timeout),
            rate_limit_per_minute: lookup("RATE_LIMIT_PER_MINUTE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.rate_limit_per_minute),
            criteria,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
