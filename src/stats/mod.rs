//! Stats module - Login aggregations

pub(crate) mod calculator;

pub use calculator::{Breakdown, DashboardReport, LoginTotals, StatsCalculator, TimeSeries};
