use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Default model used when `GEMINI_MODEL` is not set.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini REST endpoint root.
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default cap on a single request body (20MB), uploads included.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    /// Model identifier, e.g. `gemini-2.0-flash`.
    pub model: String,
    pub api_base: String,
    /// Upper bound on one upstream call. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_upload_bytes: usize,
}

impl GatewayConfig {
    /// Load settings from the environment.
    ///
    /// A missing or blank `GEMINI_API_KEY` is an error; the service must not start
    /// without a credential. With `ENVIRONMENT=prod` every key must be set explicitly.
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let api_key = get_env("GEMINI_API_KEY", None, is_prod)?;
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_API_KEY must not be empty"
            )));
        }

        let model = get_env("GEMINI_MODEL", Some(DEFAULT_MODEL), is_prod)?;
        if model.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_MODEL must not be empty"
            )));
        }

        let max_upload_bytes = get_env(
            "GENAI_MAX_UPLOAD_BYTES",
            Some(&DEFAULT_MAX_UPLOAD_BYTES.to_string()),
            is_prod,
        )?
        .parse::<usize>()
        .map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Invalid GENAI_MAX_UPLOAD_BYTES: {}", e))
        })?;

        let request_timeout = match env::var("GENAI_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "Invalid GENAI_REQUEST_TIMEOUT_SECS: {}",
                    e
                ))
            })?)),
            Err(_) => None,
        };

        Ok(GatewayConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                model,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_API_BASE), is_prod)?,
                request_timeout,
            },
            limits: LimitsConfig { max_upload_bytes },
        })
    }

    /// Settings for running against a stand-in provider (tests, local demos).
    pub fn for_port(port: u16) -> Self {
        GatewayConfig {
            common: core_config::Config {
                port,
                ..Default::default()
            },
            gemini: GeminiSettings {
                api_key: Secret::new("unused".to_string()),
                model: DEFAULT_MODEL.to_string(),
                api_base: DEFAULT_API_BASE.to_string(),
                request_timeout: None,
            },
            limits: LimitsConfig {
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
        }
    }
}

impl GeminiSettings {
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
