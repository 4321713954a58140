//! Runtime settings for the HTTP server binary, read from the environment.

use std::env;
use std::net::{IpAddr, SocketAddr};

use crate::error::{LedgerError, LedgerResult};

/// Settings controlling the HTTP server binding, logging and policy location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Host to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
    /// Directory containing `policy.yaml`. The builtin policy is used when unset.
    pub policy_path: Option<String>,
}

impl ServerSettings {
    /// Reads `LEDGER_HOST`, `LEDGER_PORT`, `LEDGER_LOG_LEVEL` and
    /// `LEDGER_POLICY_PATH`, loading a `.env` file first if one exists.
    pub fn from_env() -> LedgerResult<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("LEDGER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("LEDGER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| LedgerError::ConfigParseError {
                path: "LEDGER_PORT".to_string(),
                message: "port must be a number between 0 and 65535".to_string(),
            })?;
        let log_level = env::var("LEDGER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let policy_path = env::var("LEDGER_POLICY_PATH").ok();

        Ok(Self {
            host,
            port,
            log_level,
            policy_path,
        })
    }

    /// Resolves the bind address. `localhost` maps to the IPv4 loopback.
    pub fn socket_addr(&self) -> LedgerResult<SocketAddr> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.parse().map_err(|_| LedgerError::ConfigParseError {
            path: "LEDGER_HOST".to_string(),
            message: format!("'{}' is not an IP address", self.host),
        })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}
