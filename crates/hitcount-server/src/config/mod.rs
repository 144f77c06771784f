//! Service config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use hitcount_core::error::{HitCountError, Result};

pub use schema::{ServerSection, ServiceConfig, StorageBackend, StorageSection};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "HITCOUNT_CONFIG";
/// Config file used when `HITCOUNT_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "hitcount.yaml";

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| HitCountError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| HitCountError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load the file named by `HITCOUNT_CONFIG` (or `hitcount.yaml`).
///
/// A missing file yields the built-in defaults; any other read or parse
/// failure is an error. Returns the config and a label of where it came from.
pub fn load_default() -> Result<(ServiceConfig, String)> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    match fs::metadata(&path) {
        Ok(_) => Ok((load_from_file(&path)?, path)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Ok((ServiceConfig::default(), "built-in defaults".to_string()))
        }
        Err(e) => Err(HitCountError::Config(format!("stat config failed ({path}): {e}"))),
    }
}
