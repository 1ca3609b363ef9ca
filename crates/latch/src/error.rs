use thiserror::Error;

/// Errors from loading facade configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid key prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
