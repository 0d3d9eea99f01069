//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console_notifier::ConsoleNotifier;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_news_adapter::FileNewsAdapter;
use crate::adapters::markdown_report::MarkdownReport;
use crate::domain::backtest::{build_price_table, BacktestEngine};
use crate::domain::config_validation::{validate_advice_config, validate_backtest_config};
use crate::domain::engine::AdviceEngine;
use crate::domain::error::StockpilotError;
use crate::domain::indicators::snapshot_at;
use crate::domain::rules::{RuleKind, WeightedRule};
use crate::domain::signal::{SignalSource, TradingSignal};
use crate::domain::signal_gen;
use crate::domain::strategy::{Strategy, TrendFollowingStrategy};
use crate::domain::watchlist::{parse_codes, validate_watchlist};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::news_port::NewsPort;
use crate::ports::notify_port::NotifyPort;
use crate::ports::report_port::ReportPort;

/// Calendar days of bars fetched ahead of the analysis date.
const LOOKBACK_DAYS: i64 = 180;

/// Calendar days of warm-up bars fetched before the backtest window so the
/// first in-window sessions have indicator history.
const WARMUP_DAYS: i64 = 60;

#[derive(Parser, Debug)]
#[command(name = "stockpilot", about = "Watchlist advice engine and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate advice for the configured watchlist
    Advise {
        #[arg(short, long)]
        config: PathBuf,
        /// Analyze a single code instead of the configured watchlist
        #[arg(long)]
        code: Option<String>,
        /// Analysis date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Replay advice-driven signals over historical bars
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// List codes available from the data source
    ListCodes {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Advise { config, code, date } => {
            run_advise(&config, code.as_deref(), date.as_deref())
        }
        Command::Backtest {
            config,
            output,
            json,
        } => run_backtest(&config, output.as_ref(), json),
        Command::ListCodes { config } => run_list_codes(&config),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn csv_path(config: &dyn ConfigPort) -> Result<PathBuf, StockpilotError> {
    config
        .get_string("data", "csv_path")
        .map(PathBuf::from)
        .ok_or_else(|| StockpilotError::ConfigMissing {
            section: "data".into(),
            key: "csv_path".into(),
        })
}

/// Rule weights from the `[advice]` section; absent keys default to 1.0.
pub fn build_rules(config: &dyn ConfigPort) -> Vec<WeightedRule> {
    vec![
        WeightedRule::with_weight(
            RuleKind::Trend,
            config.get_double("advice", "trend_weight", 1.0),
        ),
        WeightedRule::with_weight(
            RuleKind::Bias,
            config.get_double("advice", "bias_weight", 1.0),
        ),
        WeightedRule::with_weight(
            RuleKind::Volume,
            config.get_double("advice", "volume_weight", 1.0),
        ),
        WeightedRule::with_weight(
            RuleKind::Support,
            config.get_double("advice", "support_weight", 1.0),
        ),
        WeightedRule::with_weight(
            RuleKind::Risk,
            config.get_double("advice", "risk_weight", 1.0),
        ),
    ]
}

fn resolve_codes(
    code_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, ExitCode> {
    let raw = match code_override {
        Some(code) => code.to_string(),
        None => match config.get_string("watchlist", "codes") {
            Some(codes) => codes,
            None => {
                eprintln!("error: no codes configured ([watchlist] codes)");
                return Err(ExitCode::from(2));
            }
        },
    };
    parse_codes(&raw).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(2)
    })
}

fn display_name(config: &dyn ConfigPort, code: &str) -> String {
    config
        .get_string("names", code)
        .unwrap_or_else(|| code.to_string())
}

fn run_advise(config_path: &PathBuf, code_override: Option<&str>, date: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_advice_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let data_path = match csv_path(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(data_path);

    let codes = match resolve_codes(code_override, &config) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let as_of = match date {
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                eprintln!("error: invalid --date (expected YYYY-MM-DD)");
                return ExitCode::from(2);
            }
        },
        None => Local::now().date_naive(),
    };
    let from = as_of - chrono::Duration::days(LOOKBACK_DAYS);

    eprintln!("Validating {} codes...", codes.len());
    let validation = match validate_watchlist(&data_port, codes, from, as_of) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let news_port = config
        .get_string("news", "dir")
        .map(|dir| FileNewsAdapter::new(PathBuf::from(dir)));

    let engine = AdviceEngine::with_rules(build_rules(&config));
    let mut advices = Vec::new();

    for code in &validation.codes {
        let bars = match data_port.fetch_daily(code, from, as_of) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", code, e);
                continue;
            }
        };
        let Some((asset, indicators)) = crate::domain::indicators::latest_snapshot(&bars) else {
            eprintln!("Warning: skipping {} (not enough history)", code);
            continue;
        };

        let name = display_name(&config, code);
        let news = match news_port
            .as_ref()
            .map(|p| p.fetch_news(code, &name))
            .transpose()
        {
            Ok(n) => n.flatten(),
            Err(e) => {
                eprintln!("Warning: news lookup failed for {} ({})", code, e);
                None
            }
        };

        let advice_date = date.is_some().then_some(as_of);
        let advice = engine.generate_advice_from_data_at(
            code,
            &name,
            &asset,
            &indicators,
            news.as_deref(),
            advice_date,
        );
        eprintln!("  {}", advice.summary());
        advices.push(advice);
    }

    let report = MarkdownReport::new().render_advice(&advices);
    let notifier = ConsoleNotifier::new();
    if let Err(e) = notifier.send(&format!("Watchlist advice {}", as_of), &report) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    ExitCode::SUCCESS
}

fn run_backtest(config_path: &PathBuf, output: Option<&PathBuf>, json: bool) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_advice_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let start_date = match backtest_date(&config, "start_date") {
        Ok(d) => d,
        Err(code) => return code,
    };
    let end_date = match backtest_date(&config, "end_date") {
        Ok(d) => d,
        Err(code) => return code,
    };
    let initial_capital = config.get_double("backtest", "initial_capital", 100_000.0);
    let strategy_name = config
        .get_string("backtest", "strategy")
        .unwrap_or_else(|| "advice".to_string());

    let data_path = match csv_path(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(data_path);

    let codes = match resolve_codes(None, &config) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let warmup_start = start_date - chrono::Duration::days(WARMUP_DAYS);
    let validation = match validate_watchlist(&data_port, codes, warmup_start, end_date) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let engine = AdviceEngine::with_rules(build_rules(&config));
    let trend_following = TrendFollowingStrategy::new();

    let mut signals: Vec<TradingSignal> = Vec::new();
    let mut bar_series = Vec::new();

    for code in &validation.codes {
        let bars = match data_port.fetch_daily(code, warmup_start, end_date) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", code, e);
                continue;
            }
        };
        let name = display_name(&config, code);

        for index in 0..bars.len() {
            let session = bars[index].date;
            if session < start_date || session > end_date {
                continue;
            }
            let Some((asset, indicators)) = snapshot_at(&bars, index) else {
                continue;
            };

            let advice = engine.generate_advice_from_data_at(
                code,
                &name,
                &asset,
                &indicators,
                None,
                Some(session),
            );

            match strategy_name.as_str() {
                "trend-following" => {
                    signals.extend(trend_following.generate_signals(&advice, &asset, &indicators));
                }
                _ => {
                    let timestamp = session.and_hms_opt(15, 0, 0).unwrap_or_default();
                    if let Some(signal) = signal_gen::generate_from_advice(
                        &advice,
                        SignalSource::AdviceEngine,
                        timestamp,
                    ) {
                        signals.push(signal);
                    }
                }
            }
        }

        bar_series.push(bars);
    }

    eprintln!(
        "Replaying {} signals over {} codes...",
        signals.len(),
        bar_series.len()
    );

    let price_table = build_price_table(&bar_series);
    let mut backtest = BacktestEngine::new(initial_capital);
    let (result, metrics) = backtest.run_full_backtest(&signals, &price_table, start_date, end_date);

    let body = if json {
        match serde_json::to_string_pretty(&serde_json::json!({
            "result": result,
            "metrics": metrics,
        })) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                return ExitCode::from(1);
            }
        }
    } else {
        MarkdownReport::new().render_backtest(&result, &metrics)
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, &body) {
                eprintln!("error: failed to write {}: {e}", path.display());
                return ExitCode::from(1);
            }
            eprintln!("Report written to {}", path.display());
        }
        None => {
            println!("{body}");
        }
    }

    ExitCode::SUCCESS
}

fn backtest_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, ExitCode> {
    let err = |e: StockpilotError| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    };
    let value = config
        .get_string("backtest", key)
        .ok_or_else(|| {
            err(StockpilotError::ConfigMissing {
                section: "backtest".into(),
                key: key.into(),
            })
        })?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
        err(StockpilotError::ConfigInvalid {
            section: "backtest".into(),
            key: key.into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        })
    })
}

fn run_list_codes(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_path = match csv_path(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match CsvAdapter::new(data_path).list_codes() {
        Ok(codes) => {
            for code in codes {
                println!("{code}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
