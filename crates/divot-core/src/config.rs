//! Dashboard configuration.
//!
//! The page may embed a JSON object (`<script id="divot-config"
//! type="application/json">`); every field is optional and falls back to the
//! defaults below.

use crate::error::ConfigError;
use crate::sphere::SphereParams;
use crate::surface::SurfaceParams;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    pub greeting: String,
    pub completion: CompletionConfig,
    pub surface: SurfaceParams,
    pub sphere: SphereParams,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            greeting: crate::chat::GREETING.to_string(),
            completion: CompletionConfig::default(),
            surface: SurfaceParams::default(),
            sphere: SphereParams::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn log_level(&self) -> Result<log::Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    /// Use `key` when no API key was configured. Blank keys count as missing.
    pub fn with_fallback_api_key(mut self, key: Option<&str>) -> Self {
        let configured = self
            .completion
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if !configured {
            self.completion.api_key = key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string);
        }
        self
    }
}
