//! Backtest engine: chronological signal replay over a price table.

use crate::domain::bar::DailyBar;
use crate::domain::executor::{BacktestExecutor, BacktestResult, EquityPoint};
use crate::domain::metrics::BacktestMetrics;
use crate::domain::signal::TradingSignal;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Close prices keyed by date, then by code.
pub type PriceTable = HashMap<NaiveDate, HashMap<String, f64>>;

/// Builds a price table from per-code bar series.
pub fn build_price_table(bar_series: &[Vec<DailyBar>]) -> PriceTable {
    let mut table: PriceTable = HashMap::new();
    for bars in bar_series {
        for bar in bars {
            table
                .entry(bar.date)
                .or_default()
                .insert(bar.code.clone(), bar.close);
        }
    }
    table
}

pub struct BacktestEngine {
    initial_capital: f64,
    executor: BacktestExecutor,
}

impl BacktestEngine {
    pub fn new(initial_capital: f64) -> Self {
        BacktestEngine {
            initial_capital,
            executor: BacktestExecutor::new(initial_capital),
        }
    }

    /// Replays the signals chronologically between `start_date` and
    /// `end_date` inclusive. Signals outside the window, or whose date has
    /// no price entry for their code, are skipped. Equity is sampled after
    /// every executed signal, seeded with the initial capital.
    pub fn run_backtest(
        &mut self,
        signals: &[TradingSignal],
        price_data: &PriceTable,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> BacktestResult {
        self.executor.reset();

        let mut sorted_signals: Vec<&TradingSignal> = signals.iter().collect();
        sorted_signals.sort_by_key(|s| s.date);

        let mut daily_equity = vec![EquityPoint {
            date: start_date,
            equity: self.initial_capital,
        }];

        for signal in sorted_signals {
            if signal.date < start_date || signal.date > end_date {
                continue;
            }
            let Some(prices) = price_data.get(&signal.date) else {
                continue;
            };
            let Some(&current_price) = prices.get(&signal.code) else {
                continue;
            };

            let _ = self.executor.execute_signal(signal, current_price, None);
            daily_equity.push(EquityPoint {
                date: signal.date,
                equity: self.executor.total_equity(prices),
            });
        }

        let final_capital = match price_data.get(&end_date) {
            Some(final_prices) => self.executor.total_equity(final_prices),
            None => self.executor.current_capital,
        };

        let total_return = if self.initial_capital > 0.0 {
            (final_capital - self.initial_capital) / self.initial_capital * 100.0
        } else {
            0.0
        };

        BacktestResult {
            start_date,
            end_date,
            initial_capital: self.initial_capital,
            final_capital,
            total_return,
            trades: self.executor.trades.clone(),
            positions: self.executor.current_positions(),
            daily_equity,
        }
    }

    pub fn calculate_metrics(&self, result: &BacktestResult) -> BacktestMetrics {
        let equity: Vec<f64> = result.daily_equity.iter().map(|p| p.equity).collect();
        BacktestMetrics::compute(result, &equity)
    }

    /// Convenience call chaining replay and metric computation.
    pub fn run_full_backtest(
        &mut self,
        signals: &[TradingSignal],
        price_data: &PriceTable,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> (BacktestResult, BacktestMetrics) {
        let result = self.run_backtest(signals, price_data, start_date, end_date);
        let metrics = self.calculate_metrics(&result);
        (result, metrics)
    }
}
