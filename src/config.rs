//! Environment-sourced configuration.
//!
//! The service takes its bind address and (optional) database path from the
//! environment. The spreadsheet webhook URL and the IP-hash salt are fixed
//! constants compiled into the binary, not configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable for the socket address to bind.
pub const ENV_BIND_ADDR: &str = "RSVP_BIND_ADDR";

/// Environment variable for the SQLite database path.
///
/// When unset, the service runs without a primary store and relies on the
/// spreadsheet mirror alone.
pub const ENV_DB_PATH: &str = "RSVP_DB_PATH";

/// Default bind address when `RSVP_BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Google Apps Script deployment that appends each RSVP to the spreadsheet.
pub const SHEETS_WEBHOOK_URL: &str =
    "https://script.google.com/macros/s/AKfycbxRsvpSheetSyncDeployment/exec";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The bind address could not be parsed as `host:port`.
    #[error("invalid {ENV_BIND_ADDR}: {0}")]
    InvalidBindAddr(#[from] std::net::AddrParseError),
}

/// Service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Path to the SQLite database file, or `None` to run without one.
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the environment.
    pub fn from_env() -> Result<Config, ConfigError> {
        let bind_addr = std::env::var(ENV_BIND_ADDR)
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()?;

        let db_path = std::env::var_os(ENV_DB_PATH).map(PathBuf::from);

        Ok(Config { bind_addr, db_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_addr_parses() {
        let addr: SocketAddr = DEFAULT_BIND_ADDR.parse().unwrap();
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn bad_bind_addr_is_an_error() {
        let result = "not-an-address".parse::<SocketAddr>().map_err(ConfigError::from);
        assert!(matches!(result, Err(ConfigError::InvalidBindAddr(_))));
    }
}
