//! Deployment mode and the service base address.
//!
//! Only [`Config::from_env`] looks at the process environment; everything
//! else receives a `Config` (or just its base address) from the caller.

use std::env;

pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:5000";
pub const PRODUCTION_BASE_URL: &str = "https://your-render-app-name.onrender.com";

/// Which backend the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deployment {
    #[default]
    Development,
    Production,
}

impl Deployment {
    /// Parses a mode flag; anything unrecognized is treated as development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Deployment::Production,
            _ => Deployment::Development,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub deployment: Deployment,
    pub api_base_url: String,
}

impl Config {
    pub fn for_deployment(deployment: Deployment) -> Self {
        let api_base_url = match deployment {
            Deployment::Development => DEVELOPMENT_BASE_URL,
            Deployment::Production => PRODUCTION_BASE_URL,
        };
        Self {
            deployment,
            api_base_url: api_base_url.to_string(),
        }
    }

    /// Reads `VIDGRAB_ENV` and `VIDGRAB_API_BASE_URL`.
    pub fn from_env() -> Self {
        let deployment = env::var("VIDGRAB_ENV")
            .map(|v| Deployment::parse(&v))
            .unwrap_or_default();
        let mut config = Self::for_deployment(deployment);
        if let Ok(url) = env::var("VIDGRAB_API_BASE_URL") {
            let url = url.trim();
            if !url.is_empty() {
                config.api_base_url = url.to_string();
            }
        }
        tracing::debug!(deployment = ?config.deployment, base = %config.api_base_url, "configuration loaded");
        config
    }

    pub fn is_production(&self) -> bool {
        self.deployment == Deployment::Production
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_deployment(Deployment::Development)
    }
}
