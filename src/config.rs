//! Engine configuration.
//!
//! Values come from code, environment variables or a JSON document. A
//! [`TimeSeries`](crate::TimeSeries) carries its config and hands it to
//! every series it produces.

use serde::{Deserialize, Serialize};

/// Tuning knobs shared by series operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Run `window` and `transform` columns on the rayon pool (default: false)
    pub parallel_columns: bool,
    /// Minimum row count before the parallel path is taken (default: 4096)
    pub parallel_min_rows: usize,
    /// Fallback filter for `logging::init_tracing` when `RUST_LOG` is unset (default: "info")
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            parallel_columns: false,
            parallel_min_rows: 4096,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn new(parallel_columns: bool, parallel_min_rows: usize, log_level: impl Into<String>) -> Self {
        EngineConfig {
            parallel_columns,
            parallel_min_rows,
            log_level: log_level.into(),
        }
    }

    /// Reads `TSERIES_PARALLEL_COLUMNS`, `TSERIES_PARALLEL_MIN_ROWS` and
    /// `TSERIES_LOG`. Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = EngineConfig::default();
        let parallel_columns = std::env::var("TSERIES_PARALLEL_COLUMNS")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.parallel_columns);
        let parallel_min_rows = std::env::var("TSERIES_PARALLEL_MIN_ROWS")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(defaults.parallel_min_rows);
        let log_level = std::env::var("TSERIES_LOG").unwrap_or(defaults.log_level);

        EngineConfig::new(parallel_columns, parallel_min_rows, log_level)
    }

    /// Parses a JSON object; absent fields take their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on malformed JSON or mistyped fields.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn with_parallel_columns(mut self, enabled: bool) -> Self {
        self.parallel_columns = enabled;
        self
    }

    pub fn with_parallel_min_rows(mut self, rows: usize) -> Self {
        self.parallel_min_rows = rows;
        self
    }

    /// Whether a series with `nrow` rows should be processed in parallel.
    pub fn use_parallel(&self, nrow: usize) -> bool {
        self.parallel_columns && nrow >= self.parallel_min_rows
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Malformed configuration document
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert!(!config.parallel_columns);
        assert_eq!(config.parallel_min_rows, 4096);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = EngineConfig::from_json_str(r#"{"parallel_columns": true}"#).unwrap();
        assert!(config.parallel_columns);
        assert_eq!(config.parallel_min_rows, 4096);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn json_rejects_wrong_types() {
        let err = EngineConfig::from_json_str(r#"{"parallel_min_rows": "many"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn parallel_threshold() {
        let config = EngineConfig::default()
            .with_parallel_columns(true)
            .with_parallel_min_rows(100);
        assert!(!config.use_parallel(99));
        assert!(config.use_parallel(100));
        assert!(!EngineConfig::default().use_parallel(1_000_000));
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn env_values_parse_or_fall_back() {
        std::env::set_var("TSERIES_PARALLEL_COLUMNS", "yes");
        std::env::set_var("TSERIES_PARALLEL_MIN_ROWS", " 128 ");
        std::env::set_var("TSERIES_LOG", "debug");
        let config = EngineConfig::from_env();
        assert_eq!(config, EngineConfig::new(true, 128, "debug"));

        std::env::set_var("TSERIES_PARALLEL_COLUMNS", "maybe");
        std::env::set_var("TSERIES_PARALLEL_MIN_ROWS", "lots");
        std::env::remove_var("TSERIES_LOG");
        let config = EngineConfig::from_env();
        assert_eq!(config, EngineConfig::default());

        std::env::remove_var("TSERIES_PARALLEL_COLUMNS");
        std::env::remove_var("TSERIES_PARALLEL_MIN_ROWS");
        assert_eq!(EngineConfig::from_env(), EngineConfig::default());
    }
}
