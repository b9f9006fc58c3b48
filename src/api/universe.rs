//! Ticker universe providers.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::info;

use super::UniverseProvider;
use crate::error::UniverseError;
use crate::models::Config;

/// A fixed list of tickers, e.g. from the command line.
#[derive(Debug, Clone, Default)]
pub struct StaticUniverse {
    tickers: Vec<String>,
}

impl StaticUniverse {
    pub fn new<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tickers: tickers.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl UniverseProvider for StaticUniverse {
    async fn tickers(&self) -> Result<Vec<String>, UniverseError> {
        Ok(self.tickers.clone())
    }
}

async fn fetch_text(client: &Client, url: &str) -> Result<String, UniverseError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(UniverseError::Http(response.status().as_u16()));
    }
    Ok(response.text().await?)
}

fn http_client(config: &Config) -> Result<Client, UniverseError> {
    Ok(Client::builder()
        .timeout(config.request_timeout)
        .user_agent("health-screener/0.1")
        .build()?)
}

/// S&P 500 constituents scraped from the Wikipedia listing page.
pub struct WikipediaSp500 {
    client: Client,
    url: String,
}

impl WikipediaSp500 {
    pub fn new(config: &Config) -> Result<Self, UniverseError> {
        Ok(Self {
            client: http_client(config)?,
            url: config.sp500_wikipedia_url.clone(),
        })
    }
}

#[async_trait]
impl UniverseProvider for WikipediaSp500 {
    async fn tickers(&self) -> Result<Vec<String>, UniverseError> {
        info!("🌐 Fetching S&P 500 list from {}", self.url);
        let html = fetch_text(&self.client, &self.url).await?;
        let tickers = parse_constituents_table(&html)?;
        info!("✅ Parsed {} S&P 500 companies", tickers.len());
        Ok(tickers)
    }
}

/// First-column text of every data row in the constituents table.
pub fn parse_constituents_table(html: &str) -> Result<Vec<String>, UniverseError> {
    let document = Html::parse_document(html);
    let selector = |css: &str| {
        Selector::parse(css).map_err(|e| UniverseError::Parse(format!("selector {}: {:?}", css, e)))
    };

    let table = document
        .select(&selector("table#constituents")?)
        .next()
        .or_else(|| {
            selector("table.wikitable.sortable")
                .ok()
                .and_then(|s| document.select(&s).next())
        })
        .ok_or_else(|| UniverseError::Parse("constituents table not found".to_string()))?;

    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let tickers: Vec<String> = table
        .select(&row_selector)
        .filter_map(|row| row.select(&cell_selector).next())
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .filter(|ticker| !ticker.is_empty())
        .collect();

    if tickers.is_empty() {
        return Err(UniverseError::Parse("constituents table has no rows".to_string()));
    }
    Ok(tickers)
}

/// S&P 500 constituents from the public `constituents.csv` dataset.
pub struct CsvSp500 {
    client: Client,
    url: String,
}

impl CsvSp500 {
    pub fn new(config: &Config) -> Result<Self, UniverseError> {
        Ok(Self {
            client: http_client(config)?,
            url: config.sp500_csv_url.clone(),
        })
    }
}

#[async_trait]
impl UniverseProvider for CsvSp500 {
    async fn tickers(&self) -> Result<Vec<String>, UniverseError> {
        info!("🌐 Fetching S&P 500 list from {}", self.url);
        let csv_text = fetch_text(&self.client, &self.url).await?;
        let tickers = parse_constituents_csv(&csv_text)?;
        info!("✅ Parsed {} S&P 500 companies", tickers.len());
        Ok(tickers)
    }
}

/// Symbols from the first column of a constituents CSV with a header row.
pub fn parse_constituents_csv(csv_text: &str) -> Result<Vec<String>, UniverseError> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let mut tickers = Vec::new();

    for result in reader.records() {
        let record = result?;
        if let Some(symbol) = record.get(0).map(str::trim).filter(|s| !s.is_empty()) {
            tickers.push(symbol.to_string());
        }
    }

    if tickers.is_empty() {
        return Err(UniverseError::Parse("constituents csv has no rows".to_string()));
    }
    Ok(tickers)
}
