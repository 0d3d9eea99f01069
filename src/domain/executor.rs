//! Backtest executor: the cash/position/trade ledger.
//!
//! One position per code, round-lot buys, full-liquidation sells. Signals
//! that cannot execute (insufficient capital, no position to sell) are
//! silent no-ops, not errors. Not thread-safe: one logical replay per
//! instance at a time.

use crate::domain::signal::{SignalType, TradingSignal};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Shares per round lot; buy quantities are floored to a lot multiple.
pub const LOT_SIZE: i64 = 100;

/// Fraction of available capital a buy signal may deploy.
pub const CAPITAL_USE_RATIO: f64 = 0.8;

/// An open position. Quantity stays positive while the position exists;
/// a position is removed outright, never left at zero.
#[derive(Debug, Clone, Serialize)]
pub struct Position {
    pub code: String,
    pub quantity: i64,
    pub avg_price: f64,
    pub entry_date: NaiveDate,
    pub entry_signal: TradingSignal,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn cost_basis(&self) -> f64 {
        self.quantity as f64 * self.avg_price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// Append-only trade log entry.
#[derive(Debug, Clone, Serialize)]
pub struct Trade {
    pub code: String,
    pub signal: TradingSignal,
    pub quantity: i64,
    pub price: f64,
    pub amount: f64,
    pub date: NaiveDate,
    pub direction: TradeDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Outcome of one backtest run, immutable after construction.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_return: f64,
    pub trades: Vec<Trade>,
    pub positions: Vec<Position>,
    pub daily_equity: Vec<EquityPoint>,
}

pub struct BacktestExecutor {
    pub initial_capital: f64,
    pub current_capital: f64,
    pub positions: HashMap<String, Position>,
    pub trades: Vec<Trade>,
}

impl BacktestExecutor {
    pub fn new(initial_capital: f64) -> Self {
        BacktestExecutor {
            initial_capital,
            current_capital: initial_capital,
            positions: HashMap::new(),
            trades: Vec::new(),
        }
    }

    /// Applies one signal against the ledger. Returns the executed trade,
    /// or None when nothing could be done.
    pub fn execute_signal(
        &mut self,
        signal: &TradingSignal,
        current_price: f64,
        available_capital: Option<f64>,
    ) -> Option<Trade> {
        match signal.signal_type {
            SignalType::Buy => {
                let capital = available_capital.unwrap_or(self.current_capital);
                self.execute_buy(signal, current_price, capital)
            }
            SignalType::Sell | SignalType::Close => self.execute_sell(signal, current_price),
            SignalType::Hold => None,
        }
    }

    fn execute_buy(
        &mut self,
        signal: &TradingSignal,
        price: f64,
        available_capital: f64,
    ) -> Option<Trade> {
        if price <= 0.0 {
            return None;
        }

        let use_capital = available_capital * CAPITAL_USE_RATIO;
        let quantity = (use_capital / price / LOT_SIZE as f64).floor() as i64 * LOT_SIZE;
        if quantity < LOT_SIZE {
            return None;
        }

        let amount = quantity as f64 * price;

        match self.positions.entry(signal.code.clone()) {
            Entry::Occupied(mut entry) => {
                // Scaling in: re-average the cost basis.
                let pos = entry.get_mut();
                let total_cost = pos.avg_price * pos.quantity as f64 + amount;
                pos.quantity += quantity;
                pos.avg_price = total_cost / pos.quantity as f64;
            }
            Entry::Vacant(entry) => {
                entry.insert(Position {
                    code: signal.code.clone(),
                    quantity,
                    avg_price: price,
                    entry_date: signal.date,
                    entry_signal: signal.clone(),
                });
            }
        }

        self.current_capital -= amount;

        let trade = Trade {
            code: signal.code.clone(),
            signal: signal.clone(),
            quantity,
            price,
            amount,
            date: signal.date,
            direction: TradeDirection::Buy,
        };
        self.trades.push(trade.clone());
        Some(trade)
    }

    fn execute_sell(&mut self, signal: &TradingSignal, price: f64) -> Option<Trade> {
        // Full liquidation only; partial exits are not modeled.
        let pos = self.positions.remove(&signal.code)?;

        let quantity = pos.quantity;
        let amount = quantity as f64 * price;
        self.current_capital += amount;

        let trade = Trade {
            code: signal.code.clone(),
            signal: signal.clone(),
            quantity,
            price,
            amount,
            date: signal.date,
            direction: TradeDirection::Sell,
        };
        self.trades.push(trade.clone());
        Some(trade)
    }

    pub fn current_positions(&self) -> Vec<Position> {
        self.positions.values().cloned().collect()
    }

    /// Cash plus the market value of every held position present in the
    /// price map; codes missing from the map are excluded from valuation.
    pub fn total_equity(&self, current_prices: &HashMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .values()
            .filter_map(|pos| {
                current_prices
                    .get(&pos.code)
                    .map(|&price| pos.market_value(price))
            })
            .sum();
        self.current_capital + position_value
    }

    /// Restores the ledger to its initial state for a fresh replay.
    pub fn reset(&mut self) {
        self.current_capital = self.initial_capital;
        self.positions.clear();
        self.trades.clear();
    }
}
