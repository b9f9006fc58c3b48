//! Synthetic statement data with known metric values.
//!
//! `qualifying_history` scores Z = 5.0, ICR = 10, ROE = 25% and grows EBITDA
//! from 150 to 185.

use health_screener::models::{FinancialHistory, StatementSnapshot};

pub fn latest_snapshot() -> StatementSnapshot {
    StatementSnapshot {
        period_end: chrono::NaiveDate::from_ymd_opt(2023, 12, 31),
        current_assets: Some(550.0),
        current_liabilities: Some(300.0),
        total_assets: Some(1000.0),
        total_liabilities_net_minority_interest: Some(500.0),
        retained_earnings: Some(100.0),
        gross_profit: Some(400.0),
        operating_expense: Some(300.0),
        interest_expense: Some(10.0),
        total_revenue: Some(1230.0),
        net_income: Some(125.0),
        tax_provision: Some(30.0),
        reconciled_depreciation: Some(20.0),
        close_price: Some(25.0),
        shares_outstanding: Some(100.0),
    }
}

pub fn prior_snapshot() -> StatementSnapshot {
    StatementSnapshot {
        period_end: chrono::NaiveDate::from_ymd_opt(2022, 12, 31),
        net_income: Some(100.0),
        interest_expense: Some(10.0),
        tax_provision: Some(25.0),
        reconciled_depreciation: Some(15.0),
        close_price: None,
        ..latest_snapshot()
    }
}

/// Passes every default criterion.
pub fn qualifying_history(ticker: &str) -> FinancialHistory {
    FinancialHistory::new(ticker, vec![latest_snapshot(), prior_snapshot()])
}

/// Z-Score of 3.0, everything else as in `qualifying_history`.
pub fn low_z_history(ticker: &str) -> FinancialHistory {
    let latest = StatementSnapshot {
        close_price: Some(25.0 / 3.0),
        ..latest_snapshot()
    };
    FinancialHistory::new(ticker, vec![latest, prior_snapshot()])
}

/// No interest expense reported for the latest period.
pub fn missing_interest_history(ticker: &str) -> FinancialHistory {
    let latest = StatementSnapshot {
        interest_expense: None,
        ..latest_snapshot()
    };
    FinancialHistory::new(ticker, vec![latest, prior_snapshot()])
}

/// EBITDA shrinks from 200 to 185.
pub fn shrinking_history(ticker: &str) -> FinancialHistory {
    let prior = StatementSnapshot {
        net_income: Some(150.0),
        ..prior_snapshot()
    };
    FinancialHistory::new(ticker, vec![latest_snapshot(), prior])
}
