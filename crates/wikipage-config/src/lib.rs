pub mod config;
pub mod error;
pub mod templates;

pub use config::{Config, MarkerConfig, TocConfig};
pub use error::ConfigError;
