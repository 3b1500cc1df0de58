//! Tracing setup for binaries and tests that want to see engine logs.

use crate::config::EngineConfig;
use tracing_subscriber::EnvFilter;

/// Installs a compact fmt subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. Returns `false` when
/// a global subscriber was already installed, which leaves it in place.
pub fn init_tracing(config: &EngineConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let config = EngineConfig::default();
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
