//! Financial health metrics computed from statement snapshots.
//!
//! Every function is pure and returns a [`MetricResult`]. A missing line item,
//! a zero denominator or a non-finite result yields [`DataUnavailable`] rather
//! than a zero or an infinity.

use crate::error::{DataUnavailable, MetricResult};
use crate::models::{FinancialHistory, StatementSnapshot};

fn field(value: Option<f64>, name: &'static str) -> MetricResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(DataUnavailable::NonFinite(name)),
        None => Err(DataUnavailable::MissingField(name)),
    }
}

fn ratio(numerator: f64, denominator: f64, name: &'static str) -> MetricResult<f64> {
    if denominator == 0.0 {
        return Err(DataUnavailable::ZeroDenominator(name));
    }
    finite(numerator / denominator, name)
}

fn finite(value: f64, name: &'static str) -> MetricResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DataUnavailable::NonFinite(name))
    }
}

/// Earnings before interest and taxes: gross profit less operating expense.
pub fn ebit(snapshot: &StatementSnapshot) -> MetricResult<f64> {
    let gross_profit = field(snapshot.gross_profit, "gross_profit")?;
    let operating_expense = field(snapshot.operating_expense, "operating_expense")?;
    finite(gross_profit - operating_expense, "ebit")
}

/// Altman Z-Score.
///
/// `Z = 1.2·x1 + 1.4·x2 + 3.3·x3 + 0.6·x4 + 1.0·x5` where
/// - x1 = working capital / total assets
/// - x2 = retained earnings / total assets
/// - x3 = EBIT / total assets
/// - x4 = market value of equity / total liabilities
/// - x5 = revenue / total assets
pub fn altman_z_score(snapshot: &StatementSnapshot) -> MetricResult<f64> {
    let total_assets = field(snapshot.total_assets, "total_assets")?;
    let total_liabilities = field(
        snapshot.total_liabilities_net_minority_interest,
        "total_liabilities_net_minority_interest",
    )?;
    if total_assets == 0.0 {
        return Err(DataUnavailable::ZeroDenominator("total_assets"));
    }
    if total_liabilities == 0.0 {
        return Err(DataUnavailable::ZeroDenominator(
            "total_liabilities_net_minority_interest",
        ));
    }

    let working_capital = field(snapshot.current_assets, "current_assets")?
        - field(snapshot.current_liabilities, "current_liabilities")?;
    let market_value_equity = field(snapshot.close_price, "close_price")?
        * field(snapshot.shares_outstanding, "shares_outstanding")?;

    let x1 = ratio(working_capital, total_assets, "total_assets")?;
    let x2 = ratio(
        field(snapshot.retained_earnings, "retained_earnings")?,
        total_assets,
        "total_assets",
    )?;
    let x3 = ratio(ebit(snapshot)?, total_assets, "total_assets")?;
    let x4 = ratio(
        market_value_equity,
        total_liabilities,
        "total_liabilities_net_minority_interest",
    )?;
    let x5 = ratio(
        field(snapshot.total_revenue, "total_revenue")?,
        total_assets,
        "total_assets",
    )?;

    finite(
        1.2 * x1 + 1.4 * x2 + 3.3 * x3 + 0.6 * x4 + 1.0 * x5,
        "altman_z_score",
    )
}

/// EBIT divided by interest expense. No interest expense means no meaningful
/// ratio, which is reported as unavailable.
pub fn interest_coverage_ratio(snapshot: &StatementSnapshot) -> MetricResult<f64> {
    let interest_expense = field(snapshot.interest_expense, "interest_expense")?;
    ratio(ebit(snapshot)?, interest_expense, "interest_expense")
}

/// Return on equity, in percent.
pub fn return_on_equity(snapshot: &StatementSnapshot) -> MetricResult<f64> {
    let net_income = field(snapshot.net_income, "net_income")?;
    let equity = field(snapshot.total_assets, "total_assets")?
        - field(
            snapshot.total_liabilities_net_minority_interest,
            "total_liabilities_net_minority_interest",
        )?;
    Ok(ratio(net_income, equity, "shareholders_equity")? * 100.0)
}

/// EBITDA for the period `offset` back from the latest (0 = latest).
///
/// All four addends must be present; a partial sum is never returned.
pub fn ebitda(history: &FinancialHistory, offset: usize) -> MetricResult<f64> {
    let period = history
        .period(offset)
        .ok_or(DataUnavailable::MissingPeriod(offset))?;

    let net_income = field(period.net_income, "net_income")?;
    let interest = field(period.interest_expense, "interest_expense")?;
    let taxes = field(period.tax_provision, "tax_provision")?;
    let depreciation = field(period.reconciled_depreciation, "reconciled_depreciation")?;

    finite(net_income + interest + taxes + depreciation, "ebitda")
}

/// Whether EBITDA grew from the prior period to the latest one.
/// Equal values are not growth.
pub fn ebitda_growth(history: &FinancialHistory) -> MetricResult<bool> {
    let latest = ebitda(history, 0)?;
    let prior = ebitda(history, 1)?;
    Ok(latest > prior)
}

/// All screening metrics for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSet {
    pub altman_z_score: MetricResult<f64>,
    pub interest_coverage_ratio: MetricResult<f64>,
    pub roe: MetricResult<f64>,
    pub ebitda_growth: MetricResult<bool>,
}

impl MetricSet {
    pub fn compute(history: &FinancialHistory) -> Self {
        let ebitda_growth = ebitda_growth(history);
        match history.latest() {
            Some(latest) => Self {
                altman_z_score: altman_z_score(latest),
                interest_coverage_ratio: interest_coverage_ratio(latest),
                roe: return_on_equity(latest),
                ebitda_growth,
            },
            None => {
                let missing = Err(DataUnavailable::MissingPeriod(0));
                Self {
                    altman_z_score: missing,
                    interest_coverage_ratio: missing,
                    roe: missing,
                    ebitda_growth,
                }
            }
        }
    }
}
