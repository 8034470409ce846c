//! Application configuration loaded from environment variables.

use common::ProductId;
use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A flash-sale stock entry was not of the form `product:units`.
    #[error("Invalid FLASH_SALE_STOCK entry '{entry}': expected 'product:units'")]
    InvalidStockEntry { entry: String },

    /// A variable held a value that could not be parsed.
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `5000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `text` or `json` (default: `text`)
/// - `FLASH_SALE_STOCK` — comma-separated `product:units` list (default: `"999:100"`)
/// - `SESSION_IDLE_TTL_SECS` — drop carts idle this long (default: unset, never)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub json_logs: bool,
    pub flash_sale_stock: Vec<(ProductId, u32)>,
    pub session_idle_ttl_secs: Option<u32>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(p) => p.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: p.clone(),
            })?,
            None => defaults.port,
        };

        let json_logs = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                });
            }
        };

        let flash_sale_stock = match lookup("FLASH_SALE_STOCK") {
            Some(raw) => parse_flash_sale_stock(&raw)?,
            None => defaults.flash_sale_stock,
        };

        let session_idle_ttl_secs = match lookup("SESSION_IDLE_TTL_SECS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "SESSION_IDLE_TTL_SECS",
                        value: raw,
                    });
                }
            },
            None => None,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            json_logs,
            flash_sale_stock,
            session_idle_ttl_secs,
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
            json_logs: false,
            flash_sale_stock: vec![(ProductId::new("999"), 100)],
            session_idle_ttl_secs: None,
        }
    }
}

/// Parses `"999:100,1000:5"` into `(product, units)` pairs.
///
/// Blank entries are ignored, so a trailing comma is accepted.
pub fn parse_flash_sale_stock(raw: &str) -> Result<Vec<(ProductId, u32)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let invalid = || ConfigError::InvalidStockEntry {
                entry: entry.to_string(),
            };
            let (product, units) = entry.split_once(':').ok_or_else(invalid)?;
            let product = product.trim();
            if product.is_empty() {
                return Err(invalid());
            }
            let units = units.trim().parse::<u32>().map_err(|_| invalid())?;
            Ok((ProductId::new(product), units))
        })
        .collect()
}
