//! Watchlist parsing and validation.
//!
//! Parses the configured code list and checks each code has enough daily
//! bars for indicator snapshots before analysis starts.

use crate::domain::error::StockpilotError;
use crate::domain::indicators::MIN_BARS_FOR_SNAPSHOT;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Debug, Clone, thiserror::Error)]
pub enum WatchlistError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, WatchlistError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(WatchlistError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if seen.contains(&code) {
            return Err(WatchlistError::DuplicateCode(code));
        }
        seen.insert(code.clone());
        codes.push(code);
    }

    Ok(codes)
}

#[derive(Debug, Clone)]
pub struct SkippedCode {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub enum SkipReason {
    NoData,
    InsufficientBars { bars: usize },
}

pub struct WatchlistValidation {
    pub codes: Vec<String>,
    pub skipped: Vec<SkippedCode>,
}

/// Validates codes against the data port. Codes that cannot be analyzed
/// are skipped with a warning; every code failing is an error.
pub fn validate_watchlist(
    data_port: &dyn DataPort,
    codes: Vec<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<WatchlistValidation, StockpilotError> {
    let mut valid_codes = Vec::new();
    let mut skipped = Vec::new();

    for code in codes {
        let bars = match data_port.fetch_daily(&code, start_date, end_date) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", code, e);
                skipped.push(SkippedCode {
                    code,
                    reason: SkipReason::NoData,
                });
                continue;
            }
        };

        if bars.is_empty() {
            eprintln!("Warning: skipping {} (no data found)", code);
            skipped.push(SkippedCode {
                code,
                reason: SkipReason::NoData,
            });
            continue;
        }

        if bars.len() < MIN_BARS_FOR_SNAPSHOT {
            eprintln!(
                "Warning: skipping {} (only {} bars, minimum {} required)",
                code,
                bars.len(),
                MIN_BARS_FOR_SNAPSHOT
            );
            skipped.push(SkippedCode {
                code: code.clone(),
                reason: SkipReason::InsufficientBars { bars: bars.len() },
            });
            continue;
        }

        valid_codes.push(code);
    }

    if valid_codes.is_empty() {
        return Err(StockpilotError::InsufficientData {
            code: "all".to_string(),
            bars: 0,
            minimum: MIN_BARS_FOR_SNAPSHOT,
        });
    }

    Ok(WatchlistValidation {
        codes: valid_codes,
        skipped,
    })
}
