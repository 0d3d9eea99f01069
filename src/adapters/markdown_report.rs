//! Markdown report adapter.

use crate::domain::advice::{AdviceType, InvestmentAdvice};
use crate::domain::executor::{BacktestResult, TradeDirection};
use crate::domain::metrics::BacktestMetrics;
use crate::ports::report_port::ReportPort;
use std::fmt::Write;

pub struct MarkdownReport;

impl MarkdownReport {
    pub fn new() -> Self {
        MarkdownReport
    }

    fn advice_marker(advice_type: AdviceType) -> &'static str {
        match advice_type {
            AdviceType::StrongBuy | AdviceType::Buy => "🟢",
            AdviceType::Hold => "🟡",
            AdviceType::Reduce => "🟠",
            AdviceType::Sell | AdviceType::StrongSell => "🔴",
            AdviceType::Wait => "⚪",
        }
    }
}

impl Default for MarkdownReport {
    fn default() -> Self {
        MarkdownReport::new()
    }
}

impl ReportPort for MarkdownReport {
    fn render_advice(&self, advices: &[InvestmentAdvice]) -> String {
        let mut out = String::new();

        out.push_str("# Watchlist Advice\n\n");
        if advices.is_empty() {
            out.push_str("No advice generated.\n");
            return out;
        }

        let _ = writeln!(out, "Date: {}\n", advices[0].advice_date);
        out.push_str("| | Code | Name | Advice | Confidence | Score | Price |\n");
        out.push_str("|---|---|---|---|---|---|---|\n");
        for advice in advices {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {:.2} |",
                Self::advice_marker(advice.advice_type),
                advice.code,
                advice.name,
                advice.advice_type.label(),
                advice.confidence.label(),
                advice.score,
                advice.current_price
            );
        }

        for advice in advices {
            let _ = write!(out, "\n## {} ({})\n\n", advice.name, advice.code);
            let _ = writeln!(out, "{}\n", advice.summary());

            if !advice.reasons.is_empty() {
                out.push_str("Reasons:\n");
                for reason in &advice.reasons {
                    let _ = writeln!(out, "- {}", reason);
                }
            }
            if !advice.risk_factors.is_empty() {
                out.push_str("Risk factors:\n");
                for risk in &advice.risk_factors {
                    let _ = writeln!(out, "- ⚠️ {}", risk);
                }
            }
            if !advice.rule_sources.is_empty() {
                let _ = writeln!(out, "\nRules applied: {}", advice.rule_sources.join(", "));
            }
        }

        out
    }

    fn render_backtest(&self, result: &BacktestResult, metrics: &BacktestMetrics) -> String {
        let mut out = String::new();

        out.push_str("# Backtest Report\n\n");
        let _ = writeln!(
            out,
            "Period: {} → {}\n",
            result.start_date, result.end_date
        );

        out.push_str("| Metric | Value |\n|---|---|\n");
        let _ = writeln!(out, "| Initial capital | {:.2} |", result.initial_capital);
        let _ = writeln!(out, "| Final capital | {:.2} |", result.final_capital);
        let _ = writeln!(out, "| Total return | {:.2}% |", metrics.total_return);
        let _ = writeln!(out, "| Annual return | {:.2}% |", metrics.annual_return);
        let _ = writeln!(out, "| Sharpe ratio | {:.2} |", metrics.sharpe_ratio);
        let _ = writeln!(out, "| Max drawdown | {:.2}% |", metrics.max_drawdown);
        let _ = writeln!(out, "| Win rate | {:.2}% |", metrics.win_rate);
        let _ = writeln!(out, "| Profit factor | {:.2} |", metrics.profit_factor);
        let _ = writeln!(
            out,
            "| Closed positions | {} ({} won / {} lost) |",
            metrics.total_trades, metrics.winning_trades, metrics.losing_trades
        );

        if !result.trades.is_empty() {
            out.push_str("\n## Trades\n\n");
            out.push_str("| Date | Code | Side | Quantity | Price | Amount |\n");
            out.push_str("|---|---|---|---|---|---|\n");
            for trade in &result.trades {
                let side = match trade.direction {
                    TradeDirection::Buy => "buy",
                    TradeDirection::Sell => "sell",
                };
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} | {:.2} | {:.2} |",
                    trade.date, trade.code, side, trade.quantity, trade.price, trade.amount
                );
            }
        }

        if !result.positions.is_empty() {
            out.push_str("\n## Open positions\n\n");
            out.push_str("| Code | Quantity | Avg price | Entry date |\n");
            out.push_str("|---|---|---|---|\n");
            for pos in &result.positions {
                let _ = writeln!(
                    out,
                    "| {} | {} | {:.2} | {} |",
                    pos.code, pos.quantity, pos.avg_price, pos.entry_date
                );
            }
        }

        out
    }
}
