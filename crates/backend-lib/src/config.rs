// ============================
// backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `REGAPP_`-prefixed environment variables (`__` separates sections, e.g.
//! `REGAPP_SECURITY__CSRF_ENABLED=true`).
use crate::auth::password::{DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST};
use crate::router::BUILTIN_PATHS;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regapp_common::{Access, RouteRule};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "regapp.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "REGAPP_";

/// At the default cost each verification holds 128 MiB
pub const DEFAULT_MAX_CONCURRENT_VERIFICATIONS: usize = 4;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub security: SecuritySettings,
    pub session: SessionSettings,
    pub log: LogSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Identity store location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding `identities.json`
    pub path: PathBuf,
}

/// Security filter chain settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    /// Require a double-submit token on state-changing requests
    pub csrf_enabled: bool,
    pub login_path: String,
    pub login_success_redirect: String,
    pub logout_path: String,
    pub logout_success_redirect: String,
    /// Ordered rules, first match wins
    pub routes: Vec<RouteRule>,
    /// Applied when no rule matches
    pub default_access: Access,
    /// scrypt `log_n` used for new hashes
    pub password_hash_cost: u8,
    /// Password verifications allowed to run at once; further login
    /// attempts wait for a slot
    pub max_concurrent_verifications: usize,
}

/// Session lifetime and cookie settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub cookie_name: String,
    /// Hard upper bound on a session's lifetime
    pub absolute_ttl_secs: u64,
    /// Sessions unused for this long are dropped
    pub idle_ttl_secs: u64,
    /// Add the `Secure` attribute to cookies
    pub secure_cookie: bool,
    /// How often the background purge runs
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            csrf_enabled: false,
            login_path: "/login".to_string(),
            login_success_redirect: "/dashboard".to_string(),
            logout_path: "/logout".to_string(),
            logout_success_redirect: "/login?logout".to_string(),
            routes: vec![
                RouteRule::permit_all("/"),
                RouteRule::permit_all("/health"),
                RouteRule::permit_all("/register/**"),
                RouteRule::permit_all("/static/**"),
            ],
            default_access: Access::Authenticated,
            password_hash_cost: DEFAULT_HASH_COST,
            max_concurrent_verifications: DEFAULT_MAX_CONCURRENT_VERIFICATIONS,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "REGAPP_SESSION".to_string(),
            absolute_ttl_secs: 60 * 60 * 8, // 8 hours
            idle_ttl_secs: 60 * 30,
            secure_cookie: false,
            cleanup_interval_secs: 60 * 5,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Settings {
    /// Load settings from `regapp.toml` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from an explicit TOML file and the environment.
    /// A missing file is not an error; defaults apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Settings = Self::figment(path.as_ref())
            .extract()
            .map_err(Box::new)?;
        settings.validate()?;
        Ok(settings)
    }

    /// The provider stack used by [`Settings::load_from`]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject settings the gate cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let security = &self.security;
        for (name, path) in [
            ("security.login_path", &security.login_path),
            ("security.logout_path", &security.logout_path),
            ("security.login_success_redirect", &security.login_success_redirect),
            ("security.logout_success_redirect", &security.logout_success_redirect),
        ] {
            if !is_local_path(path) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a local path starting with '/', got {path:?}"
                )));
            }
        }
        for (name, path) in [
            ("security.login_path", &security.login_path),
            ("security.logout_path", &security.logout_path),
        ] {
            if path.contains(['?', ':', '*', '{', '}']) {
                return Err(ConfigError::Invalid(format!(
                    "{name} {path:?} must be a plain path without a query or route parameters"
                )));
            }
            if BUILTIN_PATHS.contains(&path.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "{name} {path:?} collides with a built-in route"
                )));
            }
        }
        if security.login_path == security.logout_path {
            return Err(ConfigError::Invalid(
                "security.login_path and security.logout_path must differ".to_string(),
            ));
        }
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&security.password_hash_cost) {
            return Err(ConfigError::Invalid(format!(
                "security.password_hash_cost must be between {MIN_HASH_COST} and {MAX_HASH_COST}"
            )));
        }
        if security.max_concurrent_verifications == 0 {
            return Err(ConfigError::Invalid(
                "security.max_concurrent_verifications must be greater than zero".to_string(),
            ));
        }
        for rule in &security.routes {
            crate::gate::RoutePattern::parse(&rule.pattern)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }

        if self.session.cookie_name.is_empty()
            || !self
                .session
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::Invalid(format!(
                "session.cookie_name {:?} is not a valid cookie name",
                self.session.cookie_name
            )));
        }
        if self.session.absolute_ttl_secs == 0 || self.session.idle_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "session TTLs must be greater than zero".to_string(),
            ));
        }
        if self.session.cleanup_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "session.cleanup_interval_secs must be greater than zero".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "log.level must be one of {VALID_LOG_LEVELS:?}"
            )));
        }
        if self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage.path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server address: {e}")))
    }
}

/// A same-origin path: starts with `/` but not `//` (protocol-relative)
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
