//! Shared setup for suites that exercise the live API.
//!
//! A suite builds one [`SuiteContext`] up front and reuses its client for
//! every case.

use crate::client::NaverClient;
use crate::config::ClientConfig;
use crate::environment::Environment;
use crate::error::{ClientError, Result};
use crate::settings::{ConfigScope, SettingsLoader};
use std::time::{Duration, Instant};

/// Environment variable consulted by binaries and suites for the selector.
pub const ENV_SELECTOR_VAR: &str = "NAVER_ENV";

/// Fallback selector variable name.
pub const LEGACY_ENV_SELECTOR_VAR: &str = "env";

/// Read the selector from the process environment. Callers at process entry
/// use this and hand the result to [`SuiteContext::bootstrap`].
pub fn selector_from_process_env() -> Option<String> {
    std::env::var(ENV_SELECTOR_VAR)
        .or_else(|_| std::env::var(LEGACY_ENV_SELECTOR_VAR))
        .ok()
}

#[derive(Debug)]
pub struct SuiteContext {
    name: String,
    client: NaverClient,
    started: Instant,
}

impl SuiteContext {
    pub fn bootstrap(
        name: impl Into<String>,
        selector: Option<&str>,
        scope: ConfigScope,
        loader: &SettingsLoader,
    ) -> Result<Self> {
        let name = name.into();
        tracing::info!(suite = %name, "Test suite started");

        let config = ClientConfig::from_selector(selector, scope, loader).map_err(|e| {
            tracing::error!(
                suite = %name,
                kind = e.kind(),
                error = %e,
                "Failed to initialize environment"
            );
            e
        })?;
        let client = NaverClient::new(config)?;

        tracing::info!(
            suite = %name,
            environment = client.config().environment().description(),
            base_url = client.config().base_url(),
            "Suite environment ready"
        );

        Ok(Self {
            name,
            client,
            started: Instant::now(),
        })
    }

    pub fn from_client(name: impl Into<String>, client: NaverClient) -> Self {
        Self {
            name: name.into(),
            client,
            started: Instant::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self) -> &NaverClient {
        &self.client
    }

    pub fn environment(&self) -> Environment {
        self.client.config().environment()
    }

    /// Fail unless the suite is running against `expected`.
    pub fn ensure_environment(&self, expected: Environment) -> Result<()> {
        let actual = self.environment();
        if actual == expected {
            Ok(())
        } else {
            Err(ClientError::EnvironmentMismatch {
                expected: expected.name().to_string(),
                actual: actual.name().to_string(),
            })
        }
    }

    /// Sleep between calls to stay under the upstream rate limit.
    pub fn pause_for_rate_limit(&self, wait: Duration) {
        tracing::debug!(wait_ms = wait.as_millis() as u64, "Waiting to avoid rate limit");
        std::thread::sleep(wait);
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Start timing a single case. The returned guard logs completion with
    /// the case duration when dropped.
    pub fn case(&self, name: impl Into<String>) -> CaseGuard<'_> {
        let name = name.into();
        tracing::info!(suite = %self.name, case = %name, "Test case started");
        CaseGuard {
            suite: &self.name,
            name,
            started: Instant::now(),
        }
    }
}

#[derive(Debug)]
pub struct CaseGuard<'a> {
    suite: &'a str,
    name: String,
    started: Instant,
}

impl CaseGuard<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for CaseGuard<'_> {
    fn drop(&mut self) {
        tracing::info!(
            suite = %self.suite,
            case = %self.name,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Test case completed"
        );
    }
}

impl Drop for SuiteContext {
    fn drop(&mut self) {
        tracing::info!(
            suite = %self.name,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Test suite completed"
        );
    }
}
