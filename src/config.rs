use std::env;

pub const APP_NAME: &str = "ledgerscan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn default_log_filter() -> &'static str {
    "info,ledgerscan=debug"
}

/// Extraction oracle settings.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

/// Ledger store (JSON-RPC) settings.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub base_url: String,
    pub database: String,
    pub login: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

/// Full service configuration, read once at startup and injected into the
/// service; clients are constructed per process, never as module globals.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub oracle: OracleConfig,
    pub ledger: LedgerConfig,
}

impl ServiceConfig {
    /// Read configuration from `LEDGERSCAN_*` environment variables, with
    /// local-development defaults for everything but credentials.
    pub fn from_env() -> Self {
        Self {
            bind_addr: var_or("LEDGERSCAN_BIND", "127.0.0.1:8088"),
            oracle: OracleConfig {
                base_url: var_or("LEDGERSCAN_ORACLE_URL", "http://localhost:11434"),
                api_key: env::var("LEDGERSCAN_ORACLE_API_KEY").ok(),
                model: var_or("LEDGERSCAN_ORACLE_MODEL", "mistral:7b"),
                timeout_secs: var_u64("LEDGERSCAN_ORACLE_TIMEOUT_SECS", 300),
            },
            ledger: LedgerConfig {
                base_url: var_or("LEDGERSCAN_LEDGER_URL", "http://localhost:8069"),
                database: var_or("LEDGERSCAN_LEDGER_DB", "ledger"),
                login: env::var("LEDGERSCAN_LEDGER_LOGIN").ok(),
                password: env::var("LEDGERSCAN_LEDGER_PASSWORD").ok(),
                timeout_secs: var_u64("LEDGERSCAN_LEDGER_TIMEOUT_SECS", 30),
            },
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_local_development() {
        let config = ServiceConfig::from_env();
        assert!(!config.oracle.base_url.is_empty());
        assert!(!config.ledger.database.is_empty());
        assert!(config.oracle.timeout_secs > 0);
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
