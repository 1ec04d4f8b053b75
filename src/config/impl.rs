use std::sync::{Arc, OnceLock};

use super::StaticConfig;
use crate::errors::GeoIpError;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Initialize the global configuration
///
/// Loads configuration from `path` (optional) and `IPGEO__*` environment
/// variables. Later calls return the first loaded configuration.
///
/// # Examples
/// ```no_run
/// use ipgeo::config::init_config;
/// init_config("config.toml").expect("invalid configuration");
/// ```
pub fn init_config(path: &str) -> Result<Arc<StaticConfig>, GeoIpError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config.clone());
    }
    let loaded = Arc::new(StaticConfig::load(path)?);
    Ok(CONFIG.get_or_init(|| loaded).clone())
}
