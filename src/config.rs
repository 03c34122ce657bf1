use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::wled::client::DEFAULT_TIMEOUT;

#[derive(Debug, Clone)]
pub struct Config {
    pub wled: WledConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct WledConfig {
    /// Device base URL without a trailing slash.
    pub host: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub reload: bool,
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    env_optional(key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let config = Self {
            wled: WledConfig {
                host: normalize_host(
                    &env_optional("WLED_HOST").unwrap_or_else(|| "http://wled.local".to_string()),
                ),
                timeout_secs: env_or_default("WLED_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs()),
            },
            server: ServerConfig {
                host: env_or_default("HOST", "0.0.0.0".to_string()),
                port: env_or_default("PORT", 8000),
                reload: env_flag("RELOAD"),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.wled.host.is_empty() {
            return Err("WLED_HOST must not be empty".into());
        }
        if !self.wled.host.starts_with("http://") && !self.wled.host.starts_with("https://") {
            return Err(format!(
                "WLED_HOST must start with http:// or https://, got {}",
                self.wled.host
            ));
        }
        if self.wled.timeout_secs == 0 {
            return Err("WLED_TIMEOUT_SECS must be > 0".into());
        }
        self.listen_addr()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e| format!("HOST is not a valid IP address ({}): {e}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(self.wled.timeout_secs)
    }
}

/// "http://wled.local/" → "http://wled.local"
pub fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('/').to_string()
}
