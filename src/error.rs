use thiserror::Error;

/// Main error type for the reward tooling
#[derive(Error, Debug)]
pub enum SoloError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Reward composition errors
    #[error("Reward error: {0}")]
    Reward(#[from] RewardError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for SoloError
pub type Result<T> = std::result::Result<T, SoloError>;

/// Failures raised by the reward core
///
/// All of these are local, synchronous caller errors. None of them is
/// retryable and none is ever masked by a neutral reward value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RewardError {
    #[error("Invalid argument '{param}': {message}")]
    InvalidArgument { param: String, message: String },

    #[error("Reward has no simulation provider bound")]
    UnboundReward,

    #[error("{aggregator} has no terms to aggregate")]
    EmptyAggregation { aggregator: &'static str },
}

impl RewardError {
    pub(crate) fn invalid(param: &str, message: impl Into<String>) -> Self {
        RewardError::InvalidArgument {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for reward computations
pub type RewardResult<T> = std::result::Result<T, RewardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_error_converts_into_solo_error() {
        let err: SoloError = RewardError::UnboundReward.into();
        assert!(matches!(err, SoloError::Reward(RewardError::UnboundReward)));
        assert_eq!(
            err.to_string(),
            "Reward error: Reward has no simulation provider bound"
        );
    }

    #[test]
    fn test_empty_aggregation_names_aggregator() {
        let err = RewardError::EmptyAggregation {
            aggregator: "AdditiveReward",
        };
        assert_eq!(err.to_string(), "AdditiveReward has no terms to aggregate");
    }

    #[test]
    fn test_invalid_argument_helper() {
        let err = RewardError::invalid("margin", "must be non-negative");
        assert_eq!(
            err,
            RewardError::InvalidArgument {
                param: "margin".to_string(),
                message: "must be non-negative".to_string(),
            }
        );
    }
}
