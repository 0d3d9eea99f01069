//! Report rendering port trait.

use crate::domain::advice::InvestmentAdvice;
use crate::domain::executor::BacktestResult;
use crate::domain::metrics::BacktestMetrics;

/// Renders analysis output for delivery through a notification channel.
pub trait ReportPort {
    fn render_advice(&self, advices: &[InvestmentAdvice]) -> String;

    fn render_backtest(&self, result: &BacktestResult, metrics: &BacktestMetrics) -> String;
}
