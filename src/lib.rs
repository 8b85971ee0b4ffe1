//! naver-openapi - environment-aware HTTP client for Naver Open API test suites.
//!
//! Features:
//! - Per-environment settings (alpha / beta / real) from TOML resources
//! - Validated, immutable client configuration
//! - Blocking dispatch with JSON defaults and connect/read timeouts
//! - Client id/secret headers injected on every call
//! - Typed records for search and DataLab search-trend endpoints

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod environment;
pub mod error;
pub mod harness;
pub mod model;
pub mod settings;

pub use client::NaverClient;
pub use config::{ClientConfig, ClientSettings};
pub use dispatcher::{ApiResponse, Headers, HttpDispatcher, QueryParams, QueryValue};
pub use environment::Environment;
pub use error::{ClientError, Result};
pub use settings::{ConfigScope, RawSettings, SettingsLoader};
