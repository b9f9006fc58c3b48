use chrono::{DateTime, Duration, Utc};

/// Years of annual statements requested per ticker.
pub const STATEMENT_LOOKBACK_YEARS: i64 = 5;

/// Convert a listing symbol into the form Yahoo Finance expects.
///
/// Share classes are written with a dot on exchange listings (`BRK.B`) and
/// with a dash on Yahoo (`BRK-B`).
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase().replace('.', "-")
}

/// Unix-second bounds `(period1, period2)` for a statement timeseries request.
pub fn statement_window(now: DateTime<Utc>) -> (i64, i64) {
    let start = now - Duration::days(366 * STATEMENT_LOOKBACK_YEARS);
    (start.timestamp(), now.timestamp())
}
