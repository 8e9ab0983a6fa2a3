//! Diagnostic logging setup.
//!
//! Logs go to stderr and never into the report sink. `RUST_LOG` overrides
//! the verbosity chosen on the command line.

use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for this crate
    pub level: Level,
    /// Level for dependencies
    pub dependency_level: Level,
    /// Environment filter override
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            dependency_level: Level::WARN,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Maps a `-v` count to a configuration: 0 warn, 1 info, 2+ debug.
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        };
        Self::default().with_level(level)
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Builds the environment filter string.
    pub fn env_filter(&self) -> String {
        if let Some(ref filter) = self.env_filter {
            filter.clone()
        } else {
            format!(
                "{},csv_characterizer_rust={}",
                self.dependency_level.as_str().to_lowercase(),
                self.level.as_str().to_lowercase()
            )
        }
    }
}

/// Installs the global subscriber. Calling it twice is an error.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
