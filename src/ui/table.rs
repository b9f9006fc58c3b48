use serde::Serialize;
use std::fmt;
use std::io::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::ScreenResult;

/// Column headers, in display order.
pub const COLUMNS: [&str; 5] = [
    "Ticker",
    "Altman Z-Score",
    "Interest Coverage Ratio",
    "ROE",
    "EBITDA Growth",
];

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Altman Z-Score")]
    altman_z_score: String,
    #[tabled(rename = "Interest Coverage Ratio")]
    interest_coverage_ratio: String,
    #[tabled(rename = "ROE")]
    roe: String,
    #[tabled(rename = "EBITDA Growth")]
    ebitda_growth: String,
}

impl From<&ScreenResult> for TableRow {
    fn from(result: &ScreenResult) -> Self {
        Self {
            ticker: result.ticker.clone(),
            altman_z_score: format!("{:.2}", result.altman_z_score),
            interest_coverage_ratio: format!("{:.2}", result.interest_coverage_ratio),
            roe: format!("{:.2}", result.roe),
            ebitda_growth: result
                .ebitda_growth
                .map_or_else(|| "n/a".to_string(), |g| g.to_string()),
        }
    }
}

/// Passing screen rows, materialized for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ScreenResult>,
}

impl ResultTable {
    pub fn new(rows: Vec<ScreenResult>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ScreenResult] {
        &self.rows
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.ticker.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the rows as CSV with a header line.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(COLUMNS)?;
        for row in &self.rows {
            wtr.write_record([
                row.ticker.clone(),
                row.altman_z_score.to_string(),
                row.interest_coverage_ratio.to_string(),
                row.roe.to_string(),
                row.ebitda_growth.map(|g| g.to_string()).unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<TableRow> = self.rows.iter().map(TableRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::modern());
        write!(f, "{}", table)
    }
}
