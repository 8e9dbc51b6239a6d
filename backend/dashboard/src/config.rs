//! Application configuration loaded from environment variables.

use payops_core::{Credentials, DEFAULT_SEED_COUNT};

use crate::errors::{DashboardError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) the throughput reading is refreshed
    pub tick_interval_secs: u64,
    /// Number of synthetic payments loaded at startup
    pub seed_count: usize,
    /// The single operator account
    pub admin: Credentials,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Credentials::default();
        let config = Config {
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| DashboardError::Config("Invalid API_PORT".to_string()))?,
            tick_interval_secs: env_var("TICK_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| DashboardError::Config("Invalid TICK_INTERVAL_SECS".to_string()))?,
            seed_count: env_var("SEED_COUNT")
                .unwrap_or_else(|_| DEFAULT_SEED_COUNT.to_string())
                .parse()
                .map_err(|_| DashboardError::Config("Invalid SEED_COUNT".to_string()))?,
            admin: Credentials {
                username: env_var("ADMIN_USERNAME").unwrap_or(defaults.username),
                password: env_var("ADMIN_PASSWORD").unwrap_or(defaults.password),
                email: env_var("ADMIN_EMAIL").unwrap_or(defaults.email),
            },
        };
        if config.tick_interval_secs == 0 {
            return Err(DashboardError::Config(
                "TICK_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| DashboardError::Config(format!("Missing env var: {key}")))
}
