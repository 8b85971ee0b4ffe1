//! Validated client configuration.
//!
//! `ClientConfig::new` is the only validation gate: everything else that
//! produces a config (resource loading, selector resolution) funnels through it.

use crate::environment::Environment;
use crate::error::{ClientError, Result};
use crate::settings::{
    ConfigScope, RawSettings, SettingsLoader, KEY_BASE_URL, KEY_CLIENT_ID, KEY_CLIENT_SECRET,
    KEY_CONNECT_TIMEOUT, KEY_LOGGING_ENABLED, KEY_READ_TIMEOUT,
};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10000;
pub const DEFAULT_LOGGING_ENABLED: bool = true;

/// Unvalidated inputs for [`ClientConfig::new`]. Unset fields take defaults
/// where one exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientSettings {
    pub environment: Option<Environment>,
    pub base_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub read_timeout_ms: Option<u64>,
    pub logging_enabled: Option<bool>,
}

/// Immutable connection and credential parameters for one environment.
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    environment: Environment,
    base_url: String,
    client_id: String,
    client_secret: String,
    connect_timeout_ms: u64,
    read_timeout_ms: u64,
    logging_enabled: bool,
}

fn non_blank(value: Option<String>, field: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ClientError::InvalidClientConfig(field)),
    }
}

fn positive(value: Option<u64>, default: u64, field: &'static str) -> Result<u64> {
    match value.unwrap_or(default) {
        0 => Err(ClientError::InvalidClientConfig(field)),
        ms => Ok(ms),
    }
}

fn parse_millis(settings: &RawSettings, key: &str, default: u64) -> Result<u64> {
    let raw = settings.get_or(key, "").trim();
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse::<u64>().map_err(|e| ClientError::ConfigParse {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_flag(settings: &RawSettings, key: &str, default: bool) -> Result<bool> {
    let raw = settings.get_or(key, "").trim();
    if raw.is_empty() {
        return Ok(default);
    }
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ClientError::ConfigParse {
            key: key.to_string(),
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        })
    }
}

impl ClientConfig {
    /// Validate `settings` and produce a config.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let config = Self {
            environment: settings.environment.unwrap_or_default(),
            base_url: non_blank(settings.base_url, "baseUrl")?,
            client_id: non_blank(settings.client_id, "clientId")?,
            client_secret: non_blank(settings.client_secret, "clientSecret")?,
            connect_timeout_ms: positive(
                settings.connect_timeout_ms,
                DEFAULT_CONNECT_TIMEOUT_MS,
                "connectTimeout",
            )?,
            read_timeout_ms: positive(
                settings.read_timeout_ms,
                DEFAULT_READ_TIMEOUT_MS,
                "readTimeout",
            )?,
            logging_enabled: settings.logging_enabled.unwrap_or(DEFAULT_LOGGING_ENABLED),
        };

        tracing::info!(
            environment = config.environment.name(),
            base_url = %config.base_url,
            "API config initialized"
        );
        Ok(config)
    }

    /// Build a config from already-loaded settings.
    pub fn from_settings(environment: Environment, settings: &RawSettings) -> Result<Self> {
        Self::new(ClientSettings {
            environment: Some(environment),
            base_url: Some(settings.require(KEY_BASE_URL)?.to_string()),
            client_id: Some(settings.require(KEY_CLIENT_ID)?.to_string()),
            client_secret: Some(settings.require(KEY_CLIENT_SECRET)?.to_string()),
            connect_timeout_ms: Some(parse_millis(
                settings,
                KEY_CONNECT_TIMEOUT,
                DEFAULT_CONNECT_TIMEOUT_MS,
            )?),
            read_timeout_ms: Some(parse_millis(
                settings,
                KEY_READ_TIMEOUT,
                DEFAULT_READ_TIMEOUT_MS,
            )?),
            logging_enabled: Some(parse_flag(
                settings,
                KEY_LOGGING_ENABLED,
                DEFAULT_LOGGING_ENABLED,
            )?),
        })
    }

    /// Load the resource for `environment` in `scope` and build a config from it.
    pub fn from_environment(
        environment: Environment,
        scope: ConfigScope,
        loader: &SettingsLoader,
    ) -> Result<Self> {
        let settings = loader.load(environment.name(), scope)?;
        Self::from_settings(environment, &settings)
    }

    /// Resolve `selector` to an environment, then behave like
    /// [`ClientConfig::from_environment`]. The caller supplies the selector;
    /// this never reads the process environment.
    pub fn from_selector(
        selector: Option<&str>,
        scope: ConfigScope,
        loader: &SettingsLoader,
    ) -> Result<Self> {
        let environment = Environment::resolve(selector)?;
        Self::from_environment(environment, scope, loader)
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn connect_timeout_ms(&self) -> u64 {
        self.connect_timeout_ms
    }

    pub fn read_timeout_ms(&self) -> u64 {
        self.read_timeout_ms
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn logging_enabled(&self) -> bool {
        self.logging_enabled
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("read_timeout_ms", &self.read_timeout_ms)
            .field("logging_enabled", &self.logging_enabled)
            .finish()
    }
}
