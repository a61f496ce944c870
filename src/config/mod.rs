// Configuration module for the NIM proxy

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::nim::NIM_API_BASE;
use crate::error::ConfigError;
use crate::proxy::mapping::{ModelMapping, DEFAULT_NIM_MODEL};
use crate::proxy::translator::TranslationOptions;

/// Env var naming an optional YAML config file
pub const CONFIG_PATH_ENV: &str = "NIM_PROXY_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_nim_api_base")]
    pub nim_api_base: String,

    #[serde(default, skip_serializing)]
    pub nim_api_key: String,

    #[serde(default)]
    pub show_reasoning: bool,

    #[serde(default)]
    pub enable_thinking_mode: bool,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "ModelMapping::builtin_aliases")]
    pub model_mapping: IndexMap<String, String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_nim_api_base() -> String {
    NIM_API_BASE.to_string()
}

fn default_model() -> String {
    DEFAULT_NIM_MODEL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            nim_api_base: default_nim_api_base(),
            nim_api_key: String::new(),
            show_reasoning: false,
            enable_thinking_mode: false,
            request_timeout_secs: None,
            default_model: default_model(),
            model_mapping: ModelMapping::builtin_aliases(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for variable access: defaults, then the YAML file
    /// named by `NIM_PROXY_CONFIG`, then individual variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = parse_value("PORT", &port)?;
        }
        if let Some(base) = lookup("NIM_API_BASE") {
            config.nim_api_base = base;
        }
        if let Some(key) = lookup("NIM_API_KEY") {
            config.nim_api_key = key;
        }
        if let Some(flag) = lookup("SHOW_REASONING") {
            config.show_reasoning = parse_bool("SHOW_REASONING", &flag)?;
        }
        if let Some(flag) = lookup("ENABLE_THINKING_MODE") {
            config.enable_thinking_mode = parse_bool("ENABLE_THINKING_MODE", &flag)?;
        }
        if let Some(secs) = lookup("NIM_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = Some(parse_value("NIM_REQUEST_TIMEOUT_SECS", &secs)?);
        }

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nim_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn translation_options(&self) -> TranslationOptions {
        TranslationOptions {
            show_reasoning: self.show_reasoning,
            enable_thinking_mode: self.enable_thinking_mode,
        }
    }

    pub fn model_mapping(&self) -> ModelMapping {
        ModelMapping::new(self.model_mapping.clone(), self.default_model.clone())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
