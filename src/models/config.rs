//! Configuration model loaded from external sources.

use serde::Deserialize;
use thiserror::Error;

use crate::gateway::http::GatewaySettings;
use crate::list::ListSettings;

#[derive(Clone, Debug, Deserialize)]
/// Settings of the console server.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    /// Key for the session and flash message cookies. At least 64 bytes.
    pub secret: String,
    pub api: GatewaySettings,
    #[serde(default)]
    pub list: ListSettings,
}

/// Minimum length of [`ServerConfig::secret`] in bytes.
pub const MIN_SECRET_LEN: usize = 64;

/// Settings the server cannot start with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("secret must be at least {MIN_SECRET_LEN} bytes long")]
    ShortSecret,
    #[error("api.base_url is not an http(s) URL: {0}")]
    InvalidBaseUrl(String),
    #[error("list.default_per_page must be positive")]
    ZeroPerPage,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ShortSecret);
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(self.api.base_url.clone()));
        }
        if self.list.default_per_page == 0 {
            return Err(ConfigError::ZeroPerPage);
        }
        Ok(())
    }
}
