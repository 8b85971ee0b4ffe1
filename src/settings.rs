//! Per-environment settings resources.
//!
//! Resources live under a root directory:
//! - production scope: `config/<environment>.toml`
//! - test scope: `test-<environment>.toml`
//!
//! Files use TOML dotted keys (`naver.api.baseUrl = "..."`). Nested tables are
//! flattened back into dotted keys so lookups stay flat.

use crate::error::{ClientError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

pub const KEY_BASE_URL: &str = "naver.api.baseUrl";
pub const KEY_CLIENT_ID: &str = "naver.clientId";
pub const KEY_CLIENT_SECRET: &str = "naver.clientSecret";
pub const KEY_CONNECT_TIMEOUT: &str = "naver.api.connectTimeout";
pub const KEY_READ_TIMEOUT: &str = "naver.api.readTimeout";
pub const KEY_LOGGING_ENABLED: &str = "naver.api.logging.enabled";

/// Which family of resource files to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigScope {
    #[default]
    Production,
    Test,
}

impl ConfigScope {
    pub fn from_test_flag(is_test: bool) -> Self {
        if is_test {
            Self::Test
        } else {
            Self::Production
        }
    }
}

/// Flat key/value settings loaded from one resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSettings {
    values: BTreeMap<String, String>,
}

impl RawSettings {
    /// Value for `key`, failing if it is absent or blank.
    pub fn require(&self, key: &str) -> Result<&str> {
        match self.values.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value.as_str()),
            _ => Err(ClientError::MissingRequiredConfig(key.to_string())),
        }
    }

    /// Value for `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values.get(key).map(String::as_str).unwrap_or(default)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn from_table(table: Table) -> Self {
        let mut values = BTreeMap::new();
        flatten_into(&mut values, None, table);
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn flatten_into(out: &mut BTreeMap<String, String>, prefix: Option<&str>, table: Table) {
    for (key, value) in table {
        let full_key = match prefix {
            Some(p) => format!("{}.{}", p, key),
            None => key,
        };
        match value {
            Value::Table(inner) => flatten_into(out, Some(&full_key), inner),
            Value::String(s) => {
                out.insert(full_key, s);
            }
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}

/// Locates and reads settings resources under a root directory.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    root: PathBuf,
}

impl SettingsLoader {
    /// Default resource root, relative to the working directory.
    pub const DEFAULT_ROOT: &'static str = "resources";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resource path for an environment name and scope, relative to the root.
    pub fn resource_path(environment: &str, scope: ConfigScope) -> PathBuf {
        match scope {
            ConfigScope::Production => PathBuf::from(format!("config/{}.toml", environment)),
            ConfigScope::Test => PathBuf::from(format!("test-{}.toml", environment)),
        }
    }

    /// Load the settings for `environment` in `scope`.
    pub fn load(&self, environment: &str, scope: ConfigScope) -> Result<RawSettings> {
        let path = self.root.join(Self::resource_path(environment, scope));

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::error!(path = %path.display(), "Unable to find config file");
                return Err(ClientError::ConfigNotFound(path));
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Error loading configuration file");
                return Err(ClientError::ConfigLoad {
                    path,
                    source: Box::new(e),
                });
            }
        };

        let table: Table = toml::from_str(&content).map_err(|e| ClientError::ConfigLoad {
            path: path.clone(),
            source: Box::new(e),
        })?;

        let settings = RawSettings::from_table(table);
        tracing::info!(path = %path.display(), keys = settings.len(), "Loaded configuration");
        Ok(settings)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT)
    }
}
