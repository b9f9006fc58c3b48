//! S&P 500 universe providers against a local mock server

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use health_screener::api::{CsvSp500, StaticUniverse, UniverseProvider, WikipediaSp500};
use health_screener::error::UniverseError;
use health_screener::models::Config;

const WIKI_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>List of S&amp;P 500 companies</title></head>
<body>
<table class="wikitable sortable sticky-header" id="constituents">
<tbody>
<tr><th>Symbol</th><th>Security</th><th>GICS Sector</th><th>CIK</th></tr>
<tr><td><a rel="nofollow" class="external text" href="https://www.nyse.com/quote/XNYS:MMM">MMM</a></td><td><a href="/wiki/3M">3M</a></td><td>Industrials</td><td>0000066740</td></tr>
<tr><td><a rel="nofollow" class="external text" href="https://www.nasdaq.com/market-activity/stocks/aapl">AAPL</a></td><td><a href="/wiki/Apple_Inc.">Apple Inc.</a></td><td>Information Technology</td><td>0000320193</td></tr>
<tr><td><a rel="nofollow" class="external text" href="https://www.nyse.com/quote/XNYS:BRK.B">BRK.B</a></td><td>Berkshire Hathaway</td><td>Financials</td><td>0001067983</td></tr>
</tbody>
</table>
</body></html>
"#;

const CONSTITUENTS_CSV: &str = "Symbol,Security,GICS Sector,GICS Sub-Industry\n\
MMM,3M,Industrials,Industrial Conglomerates\n\
AAPL,Apple Inc.,Information Technology,\"Technology Hardware, Storage & Peripherals\"\n\
BRK.B,Berkshire Hathaway,Financials,Multi-Sector Holdings\n";

fn config_for(server: &MockServer) -> Config {
    Config {
        sp500_wikipedia_url: format!("{}/wiki/sp500", server.uri()),
        sp500_csv_url: format!("{}/data/constituents.csv", server.uri()),
        ..Config::default()
    }
}

#[test_log::test(tokio::test)]
async fn test_wikipedia_listing_in_page_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/sp500"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WIKI_PAGE))
        .mount(&server)
        .await;

    let universe = assert_ok!(WikipediaSp500::new(&config_for(&server)));
    let tickers = assert_ok!(universe.tickers().await);

    assert_eq!(tickers, vec!["MMM", "AAPL", "BRK.B"]);
}

#[test_log::test(tokio::test)]
async fn test_wikipedia_page_without_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/sp500"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Redirect</body></html>"))
        .mount(&server)
        .await;

    let universe = WikipediaSp500::new(&config_for(&server)).unwrap();
    let err = universe.tickers().await.unwrap_err();
    assert_matches!(err, UniverseError::Parse(_));
}

#[test_log::test(tokio::test)]
async fn test_wikipedia_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let universe = WikipediaSp500::new(&config_for(&server)).unwrap();
    let err = universe.tickers().await.unwrap_err();
    assert_matches!(err, UniverseError::Http(503));
}

#[test_log::test(tokio::test)]
async fn test_csv_constituents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/constituents.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CONSTITUENTS_CSV))
        .mount(&server)
        .await;

    let universe = assert_ok!(CsvSp500::new(&config_for(&server)));
    let tickers = assert_ok!(universe.tickers().await);

    assert_eq!(tickers, vec!["MMM", "AAPL", "BRK.B"]);
}

#[test_log::test(tokio::test)]
async fn test_csv_missing_dataset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/constituents.csv"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let universe = CsvSp500::new(&config_for(&server)).unwrap();
    let err = universe.tickers().await.unwrap_err();
    assert_matches!(err, UniverseError::Http(404));
}

#[test_log::test(tokio::test)]
async fn test_csv_with_header_only_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/constituents.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Symbol,Security,GICS Sector\n"))
        .mount(&server)
        .await;

    let universe = assert_ok!(CsvSp500::new(&config_for(&server)));
    let err = universe.tickers().await.unwrap_err();
    assert_matches!(err, UniverseError::Parse(_));
}

#[test_log::test(tokio::test)]
async fn test_explicit_empty_list_is_not_an_error() {
    let universe = StaticUniverse::new(Vec::<String>::new());
    let tickers = assert_ok!(universe.tickers().await);
    assert!(tickers.is_empty());
}
