//! Harness configuration, resolved once at startup.

use std::env;
use std::time::Duration;

use petfriends_core::{Credential, PetFriends, UreqTransport, DEFAULT_TIMEOUT};

use crate::error::HarnessError;

pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru";

pub const EMAIL_VAR: &str = "PETFRIENDS_EMAIL";
pub const PASSWORD_VAR: &str = "PETFRIENDS_PASSWORD";
pub const BASE_URL_VAR: &str = "PETFRIENDS_BASE_URL";
pub const TIMEOUT_VAR: &str = "PETFRIENDS_TIMEOUT_SECS";

/// Everything a scenario needs to reach the service.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub credential: Credential,
    pub base_url: String,
    pub timeout: Duration,
}

impl HarnessConfig {
    pub fn new(credential: Credential, base_url: impl Into<String>) -> Self {
        Self {
            credential,
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the configuration from `PETFRIENDS_*` environment variables.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`HarnessConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HarnessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| HarnessError::Config(format!("{name} is not set")))
        };
        let credential = Credential::new(require(EMAIL_VAR)?, require(PASSWORD_VAR)?);
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = match lookup(TIMEOUT_VAR) {
            Some(secs) => secs
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|err| HarnessError::Config(format!("{TIMEOUT_VAR}={secs}: {err}")))?,
            None => DEFAULT_TIMEOUT,
        };
        Ok(Self {
            credential,
            base_url,
            timeout,
        })
    }

    pub fn client(&self) -> PetFriends {
        PetFriends::with_transport(&self.base_url, UreqTransport::with_timeout(self.timeout))
    }
}
