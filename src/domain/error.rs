//! Domain error types.

/// Top-level error type for stockpilot.
#[derive(Debug, thiserror::Error)]
pub enum StockpilotError {
    #[error("data access error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("rule {rule} failed: {reason}")]
    Rule { rule: String, reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("insufficient data for {code}: have {bars} bars, need {minimum}")]
    InsufficientData {
        code: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockpilotError> for std::process::ExitCode {
    fn from(err: &StockpilotError) -> Self {
        let code: u8 = match err {
            StockpilotError::Io(_) => 1,
            StockpilotError::ConfigParse { .. }
            | StockpilotError::ConfigMissing { .. }
            | StockpilotError::ConfigInvalid { .. } => 2,
            StockpilotError::Data { .. } => 3,
            StockpilotError::Rule { .. } => 4,
            StockpilotError::NoData { .. } | StockpilotError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = StockpilotError::ConfigMissing {
            section: "backtest".into(),
            key: "start_date".into(),
        };
        assert_eq!(err.to_string(), "missing config key [backtest] start_date");

        let err = StockpilotError::InsufficientData {
            code: "600519".into(),
            bars: 7,
            minimum: 20,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data for 600519: have 7 bars, need 20"
        );
    }

    #[test]
    fn rule_error_display() {
        let err = StockpilotError::Rule {
            rule: "trend".into(),
            reason: "bad input".into(),
        };
        assert_eq!(err.to_string(), "rule trend failed: bad input");
    }
}
