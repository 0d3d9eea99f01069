//! Backtest performance metrics.

use crate::domain::executor::{BacktestResult, Trade, TradeDirection};
use serde::Serialize;
use std::collections::HashMap;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestMetrics {
    pub total_return: f64,
    pub annual_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
}

impl BacktestMetrics {
    /// Derives the metric set from a backtest result and its equity series.
    pub fn compute(result: &BacktestResult, daily_equity: &[f64]) -> Self {
        let total_return = if result.initial_capital > 0.0 {
            (result.final_capital - result.initial_capital) / result.initial_capital * 100.0
        } else {
            0.0
        };

        let days = (result.end_date - result.start_date).num_days();
        let annual_return = if days > 0 && result.initial_capital > 0.0 {
            ((result.final_capital / result.initial_capital).powf(365.0 / days as f64) - 1.0)
                * 100.0
        } else {
            0.0
        };

        let max_drawdown = compute_max_drawdown(daily_equity);
        let sharpe_ratio = compute_sharpe_ratio(daily_equity);

        let (winning_trades, losing_trades, total_profit, total_loss) =
            tally_closed_trades(&result.trades);

        let total_trades = winning_trades + losing_trades;
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };
        let profit_factor = if total_loss > 0.0 {
            total_profit / total_loss
        } else {
            0.0
        };

        BacktestMetrics {
            total_return,
            annual_return,
            sharpe_ratio,
            max_drawdown,
            win_rate,
            profit_factor,
            total_trades,
            winning_trades,
            losing_trades,
        }
    }
}

/// Largest peak-to-trough decline across the equity series, in percent.
fn compute_max_drawdown(daily_equity: &[f64]) -> f64 {
    if daily_equity.is_empty() {
        return 0.0;
    }

    let mut peak = daily_equity[0];
    let mut max_drawdown = 0.0_f64;

    for &equity in daily_equity {
        if equity > peak {
            peak = equity;
        }
        if peak > 0.0 {
            let drawdown = (peak - equity) / peak * 100.0;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    max_drawdown
}

/// Annualized Sharpe ratio over per-step equity returns, risk-free rate
/// assumed 0, population standard deviation.
fn compute_sharpe_ratio(daily_equity: &[f64]) -> f64 {
    if daily_equity.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = daily_equity
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev > 0.0 {
        (mean / std_dev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}

/// Groups trades by code, nets sell proceeds against buy cost per code, and
/// tallies winners/losers. Codes that never sold are excluded: their
/// outcome is not yet realized.
fn tally_closed_trades(trades: &[Trade]) -> (usize, usize, f64, f64) {
    let mut per_code: HashMap<&str, (f64, f64)> = HashMap::new();

    for trade in trades {
        let entry = per_code.entry(trade.code.as_str()).or_insert((0.0, 0.0));
        match trade.direction {
            TradeDirection::Buy => entry.0 += trade.amount,
            TradeDirection::Sell => entry.1 += trade.amount,
        }
    }

    let mut winning = 0usize;
    let mut losing = 0usize;
    let mut total_profit = 0.0;
    let mut total_loss = 0.0;

    for (buy_amount, sell_amount) in per_code.values() {
        if *sell_amount > 0.0 {
            let profit = sell_amount - buy_amount;
            if profit > 0.0 {
                winning += 1;
                total_profit += profit;
            } else {
                losing += 1;
                total_loss += profit.abs();
            }
        }
    }

    (winning, losing, total_profit, total_loss)
}
