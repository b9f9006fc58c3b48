pub mod metrics;
pub mod screener;

pub use metrics::MetricSet;
pub use screener::{
    Criterion, MetricValues, RejectedTicker, ScanReport, Screener, SkipReason, SkippedTicker,
    TickerOutcome,
};
