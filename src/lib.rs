pub mod build;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod hook;
pub mod payload;

use serde::Deserialize;
use std::sync::Arc;

use crate::build::Builder;
use crate::error::{HookError, Result};

/// Process configuration, loaded once at startup and immutable afterwards.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub secret: String,
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub ssl_enable: bool,
    #[serde(default)]
    pub ssl_key: String,
    #[serde(default)]
    pub ssl_crt: String,
    pub git: GitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GitConfig {
    pub project_name: String,
    pub workdir: String,
    pub outdir: String,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8888
}

impl AppConfig {
    /// Returns the address/port pair in socket form.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// Rejects configurations that cannot produce a serving endpoint.
    /// Runs before the listener binds; failures here are fatal.
    pub fn validate(&self) -> Result<()> {
        if self.ssl_enable && (self.ssl_key.is_empty() || self.ssl_crt.is_empty()) {
            return Err(HookError::ConfigError(
                "ssl_enable requires both ssl_key and ssl_crt".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub builder: Arc<dyn Builder>,
}

pub type SharedState = Arc<AppState>;
