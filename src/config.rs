//! Start-up configuration.
//!
//! Built once from CLI flags and environment variables and handed to the router as
//! part of its state; nothing here is read from process globals after start-up.

use std::net::SocketAddr;
use std::str::FromStr;

use clap::Parser;

use crate::error::{AppError, AppResult};
use crate::identity::CredentialStore;

pub const DEFAULT_SECRET_KEY: &str = "secret123";
pub const DEFAULT_PORT: u16 = 5000;

/// Which flavour of the demo service to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceMode {
    /// Pod identity page plus health check.
    Hello,
    /// Login, dashboard and logout gated by a session cookie.
    #[default]
    Gateway,
}

impl ServiceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMode::Hello => "hello",
            ServiceMode::Gateway => "gateway",
        }
    }
}

impl FromStr for ServiceMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hello" => Ok(ServiceMode::Hello),
            "gateway" | "session" => Ok(ServiceMode::Gateway),
            other => Err(AppError::config("bad_mode", format!("unknown service mode '{}'", other))),
        }
    }
}

/// Command-line flags; every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "podview", version, about = "Pod identity demo service")]
pub struct Cli {
    /// Address to bind.
    #[arg(long, env = "APP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// HTTP port.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Service flavour: `hello` or `gateway`.
    #[arg(long, env = "APP_MODE", default_value = "gateway")]
    pub mode: String,

    /// Session signing key.
    #[arg(long, env = "SECRET_KEY", default_value = DEFAULT_SECRET_KEY, hide_env_values = true)]
    pub secret_key: String,

    /// Mark the session cookie `Secure`.
    #[arg(long, env = "SESSION_COOKIE_SECURE")]
    pub secure_cookie: bool,

    /// Credential set as `user:pass[,user:pass...]`; demo accounts when unset.
    #[arg(long, env = "APP_USERS", hide_env_values = true)]
    pub users: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub mode: ServiceMode,
    pub secret_key: String,
    pub secure_cookie: bool,
    pub credentials: CredentialStore,
    /// True when the credential set came from `APP_USERS`.
    pub custom_credentials: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            mode: ServiceMode::default(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            secure_cookie: false,
            credentials: CredentialStore::demo(),
            custom_credentials: false,
        }
    }
}

impl GatewayConfig {
    pub fn from_cli(cli: &Cli) -> AppResult<Self> {
        let mode = cli.mode.parse::<ServiceMode>()?;
        let (credentials, custom_credentials) = match cli.users.as_deref() {
            Some(spec) if !spec.trim().is_empty() => (CredentialStore::parse(spec)?, true),
            _ => (CredentialStore::demo(), false),
        };
        Ok(Self {
            host: cli.host.clone(),
            port: cli.port,
            mode,
            secret_key: cli.secret_key.clone(),
            secure_cookie: cli.secure_cookie,
            credentials,
            custom_credentials,
        })
    }

    pub fn with_credentials(mut self, credentials: CredentialStore) -> Self {
        self.credentials = credentials;
        self.custom_credentials = true;
        self
    }

    pub fn with_mode(mut self, mode: ServiceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::config("bad_bind_addr", format!("{}:{}: {}", self.host, self.port, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["podview"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn explicit_flags_build_config() {
        let cli = parse(&["--host", "127.0.0.1", "--port", "8080", "--mode", "hello", "--secret-key", "k", "--users", "ops:pw"]);
        let cfg = GatewayConfig::from_cli(&cli).unwrap();
        assert_eq!(cfg.mode, ServiceMode::Hello);
        assert_eq!(cfg.secret_key, "k");
        assert!(cfg.custom_credentials);
        assert!(cfg.credentials.verify("ops", "pw"));
        assert!(!cfg.credentials.contains("admin"));
        assert_eq!(cfg.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("Hello".parse::<ServiceMode>().unwrap(), ServiceMode::Hello);
        assert_eq!("session".parse::<ServiceMode>().unwrap(), ServiceMode::Gateway);
        assert!(matches!("blue".parse::<ServiceMode>(), Err(AppError::Config { .. })));
    }

    #[test]
    fn bad_users_are_rejected() {
        let cli = parse(&["--port", "5000", "--mode", "gateway", "--users", "nocolon"]);
        assert!(GatewayConfig::from_cli(&cli).is_err());
    }

    #[test]
    fn defaults() {
        let cfg = GatewayConfig::default();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.secret_key, "secret123");
        assert_eq!(cfg.mode, ServiceMode::Gateway);
        assert!(cfg.credentials.verify("admin", "admin123"));
        assert!(!cfg.secure_cookie);
    }

    #[test]
    fn bad_host_is_config_error() {
        let cfg = GatewayConfig { host: "not a host".into(), ..GatewayConfig::default() };
        assert!(matches!(cfg.bind_addr(), Err(AppError::Config { .. })));
    }
}
