use thiserror::Error;

/// Error type for loading and validating wikipage configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Unsupported config format: {0}")]
  UnsupportedFormat(String),

  #[error("Invalid value for '{key}': '{value}'. Expected {expected}")]
  InvalidOverride {
    key:      String,
    value:    String,
    expected: &'static str,
  },

  #[error("TOML error: {0}")]
  Toml(#[from] toml::de::Error),
}
