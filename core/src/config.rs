//! Client configuration.
//!
//! A `ClientConfig` is fixed once built: fields are private and the `with_*`
//! methods consume the value and hand back a new one.

use std::env;
use std::fmt;

use crate::error::ConfigError;

/// Vendor endpoint every production request is sent to.
pub const DEFAULT_BASE: &str = "https://api.prosperworks.com/developer_api/";

pub const DEFAULT_API_VERSION: &str = "v1";

pub const ENV_API_KEY: &str = "PROSPERWORKS_API_KEY";
pub const ENV_EMAIL: &str = "PROSPERWORKS_EMAIL";
pub const ENV_API_VERSION: &str = "PROSPERWORKS_API_VERSION";
pub const ENV_BASE_URL: &str = "PROSPERWORKS_BASE_URL";

/// Credentials and addressing for one ProsperWorks account.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    email: String,
    api_version: String,
    base: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            email: email.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            base: DEFAULT_BASE.to_string(),
        }
    }

    /// Read the configuration from `PROSPERWORKS_*` environment variables.
    ///
    /// The api key and email are required; version and base fall back to
    /// their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env`, resolving each `PROSPERWORKS_*` name through
    /// `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::MissingVar(name));

        let mut config = Self::new(required(ENV_API_KEY)?, required(ENV_EMAIL)?);
        if let Some(version) = var(ENV_API_VERSION) {
            config = config.with_api_version(version);
        }
        if let Some(base) = var(ENV_BASE_URL) {
            config = config.with_base(&base);
        }
        Ok(config)
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Point the client at another host, e.g. a local mock of the API.
    pub fn with_base(mut self, base: &str) -> Self {
        self.base = format!("{}/", base.trim_end_matches('/'));
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// `base + api_version + "/"`; endpoints are appended verbatim.
    pub fn base_url(&self) -> String {
        format!("{}{}/", self.base, self.api_version)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("email", &self.email)
            .field("api_version", &self.api_version)
            .field("base", &self.base)
            .finish()
    }
}
