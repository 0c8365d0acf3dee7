//! Domain error types.

/// Top-level error type for dualmomentum.
#[derive(Debug, thiserror::Error)]
pub enum DualMomentumError {
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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no price data for {ticker}")]
    MissingData { ticker: String },

    #[error("invalid series for {ticker}: {reason}")]
    InvalidSeries { ticker: String, reason: String },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DualMomentumError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        DualMomentumError::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<&DualMomentumError> for std::process::ExitCode {
    fn from(err: &DualMomentumError) -> Self {
        let code: u8 = match err {
            DualMomentumError::Io(_) => 1,
            DualMomentumError::ConfigParse { .. }
            | DualMomentumError::ConfigMissing { .. }
            | DualMomentumError::ConfigInvalid { .. } => 2,
            DualMomentumError::Data { .. } | DualMomentumError::MissingData { .. } => 3,
            DualMomentumError::InvalidSeries { .. } | DualMomentumError::InvalidInput { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_message_names_ticker() {
        let err = DualMomentumError::MissingData {
            ticker: "SPLG".into(),
        };
        assert_eq!(err.to_string(), "no price data for SPLG");
    }

    #[test]
    fn invalid_input_helper() {
        let err = DualMomentumError::invalid_input("negative investment amount");
        assert!(matches!(err, DualMomentumError::InvalidInput { ref reason } if reason == "negative investment amount"));
        assert_eq!(err.to_string(), "invalid input: negative investment amount");
    }

    #[test]
    fn exit_codes_by_category() {
        use std::process::ExitCode;

        let cases = [
            (
                DualMomentumError::ConfigMissing {
                    section: "data".into(),
                    key: "dir".into(),
                },
                ExitCode::from(2),
            ),
            (
                DualMomentumError::MissingData {
                    ticker: "TLT".into(),
                },
                ExitCode::from(3),
            ),
            (DualMomentumError::invalid_input("x"), ExitCode::from(4)),
            (
                DualMomentumError::Io(std::io::Error::other("boom")),
                ExitCode::from(1),
            ),
        ];

        for (err, expected) in &cases {
            assert_eq!(ExitCode::from(err), *expected, "{err}");
        }
    }
}
