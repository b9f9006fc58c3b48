pub mod analysis;
pub mod api;
pub mod error;
pub mod models;
pub mod ui;
pub mod utils;

use analysis::Screener;
use api::FinancialDataProvider;
use ui::ResultTable;

/// Screen `tickers` in order and return the rows that passed.
///
/// Tickers that fail to load are logged and left out; this never fails.
pub async fn run_scan<P: FinancialDataProvider>(screener: &Screener<P>, tickers: &[String]) -> ResultTable {
    screener.run(tickers).await.table()
}
