use std::path::Path;

use serde::{Deserialize, Serialize};

mod models;

pub use models::{DEFAULT_MODEL, ModelSpec, builtin_models};

/// Endpoint of the upstream image generator.
pub const DEFAULT_UPSTREAM_URL: &str = "https://ai-sdk-image-generator.vercel.app/api/generate-images";
pub const DEFAULT_UPSTREAM_ORIGIN: &str = "https://ai-sdk-image-generator.vercel.app";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum GlobalConfigError {
    #[error("missing required global config field: {0}")]
    MissingField(&'static str),
    #[error("invalid value for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("failed to load models file {path}: {message}")]
    ModelsFile { path: String, message: String },
}

/// Upstream retry policy, in plain numbers so it can live in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    /// Upper bound (inclusive) of the random jitter added to each delay.
    pub jitter_ms: u64,
    /// Deadline for a single upstream attempt, body included.
    pub attempt_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 200,
            jitter_ms: 100,
            attempt_timeout_secs: 60,
        }
    }
}

/// Final configuration used by the running process. Built once at start-up and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub host: String,
    pub port: u16,
    /// The single shared bearer secret.
    pub api_key: String,
    pub upstream_url: String,
    /// Sent as `origin`/`referer` on upstream calls when set.
    pub upstream_origin: Option<String>,
    pub user_agent: String,
    /// Optional outbound proxy (for upstream egress).
    pub proxy: Option<String>,
    pub retry: RetryConfig,
    pub models: Vec<ModelSpec>,
    pub default_model: String,
}

/// Optional layer used for merging global config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalConfigPatch {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_key: Option<String>,
    pub upstream_url: Option<String>,
    pub upstream_origin: Option<String>,
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
    pub max_attempts: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub jitter_ms: Option<u64>,
    pub attempt_timeout_secs: Option<u64>,
    pub models: Option<Vec<ModelSpec>>,
    pub default_model: Option<String>,
}

impl GlobalConfigPatch {
    pub fn overlay(&mut self, other: GlobalConfigPatch) {
        if other.host.is_some() {
            self.host = other.host;
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.upstream_url.is_some() {
            self.upstream_url = other.upstream_url;
        }
        if other.upstream_origin.is_some() {
            self.upstream_origin = other.upstream_origin;
        }
        if other.user_agent.is_some() {
            self.user_agent = other.user_agent;
        }
        if other.proxy.is_some() {
            self.proxy = other.proxy;
        }
        if other.max_attempts.is_some() {
            self.max_attempts = other.max_attempts;
        }
        if other.initial_backoff_ms.is_some() {
            self.initial_backoff_ms = other.initial_backoff_ms;
        }
        if other.jitter_ms.is_some() {
            self.jitter_ms = other.jitter_ms;
        }
        if other.attempt_timeout_secs.is_some() {
            self.attempt_timeout_secs = other.attempt_timeout_secs;
        }
        if other.models.is_some() {
            self.models = other.models;
        }
        if other.default_model.is_some() {
            self.default_model = other.default_model;
        }
    }

    pub fn into_config(self) -> Result<GlobalConfig, GlobalConfigError> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or(GlobalConfigError::MissingField("api_key"))?;
        let upstream_url = self
            .upstream_url
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        if !(upstream_url.starts_with("http://") || upstream_url.starts_with("https://")) {
            return Err(GlobalConfigError::InvalidField {
                field: "upstream_url",
                message: format!("expected an http(s) url, got {upstream_url}"),
            });
        }

        let defaults = RetryConfig::default();
        let retry = RetryConfig {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts).max(1),
            initial_backoff_ms: self.initial_backoff_ms.unwrap_or(defaults.initial_backoff_ms),
            jitter_ms: self.jitter_ms.unwrap_or(defaults.jitter_ms),
            attempt_timeout_secs: self
                .attempt_timeout_secs
                .unwrap_or(defaults.attempt_timeout_secs),
        };
        if retry.attempt_timeout_secs == 0 {
            return Err(GlobalConfigError::InvalidField {
                field: "attempt_timeout_secs",
                message: "must be greater than zero".to_string(),
            });
        }

        let upstream_origin = self.upstream_origin.or_else(|| {
            (upstream_url == DEFAULT_UPSTREAM_URL).then(|| DEFAULT_UPSTREAM_ORIGIN.to_string())
        });

        Ok(GlobalConfig {
            host: self.host.unwrap_or_else(|| "0.0.0.0".to_string()),
            port: self.port.unwrap_or(8787),
            api_key,
            upstream_url,
            upstream_origin,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            proxy: self.proxy,
            retry,
            models: self.models.unwrap_or_else(builtin_models),
            default_model: self
                .default_model
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

/// Reads a JSON array of `{ "id", "provider", "model_id" }` objects.
pub fn load_models_file(path: &Path) -> Result<Vec<ModelSpec>, GlobalConfigError> {
    let models_file_error = |message: String| GlobalConfigError::ModelsFile {
        path: path.display().to_string(),
        message,
    };
    let raw = std::fs::read_to_string(path).map_err(|err| models_file_error(err.to_string()))?;
    serde_json::from_str(&raw).map_err(|err| models_file_error(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_patch() -> GlobalConfigPatch {
        GlobalConfigPatch {
            api_key: Some("secret".to_string()),
            ..GlobalConfigPatch::default()
        }
    }

    #[test]
    fn defaults_fill_unset_fields() {
        let config = base_patch().into_config().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8787);
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.upstream_origin.as_deref(), Some(DEFAULT_UPSTREAM_ORIGIN));
        assert_eq!(config.retry, RetryConfig::default());
        assert_eq!(config.default_model, DEFAULT_MODEL);
        assert_eq!(config.models.len(), 20);
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = GlobalConfigPatch::default().into_config().unwrap_err();
        assert!(matches!(err, GlobalConfigError::MissingField("api_key")));

        let empty = GlobalConfigPatch {
            api_key: Some(String::new()),
            ..GlobalConfigPatch::default()
        };
        assert!(empty.into_config().is_err());
    }

    #[test]
    fn overlay_prefers_later_values() {
        let mut merged = base_patch();
        merged.overlay(GlobalConfigPatch {
            port: Some(9000),
            max_attempts: Some(5),
            ..GlobalConfigPatch::default()
        });
        merged.overlay(GlobalConfigPatch {
            port: Some(9100),
            ..GlobalConfigPatch::default()
        });
        let config = merged.into_config().unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.api_key, "secret");
    }

    #[test]
    fn max_attempts_is_clamped_to_one() {
        let mut patch = base_patch();
        patch.max_attempts = Some(0);
        assert_eq!(patch.into_config().unwrap().retry.max_attempts, 1);
    }

    #[test]
    fn rejects_non_http_upstream() {
        let mut patch = base_patch();
        patch.upstream_url = Some("ftp://example.com/generate".to_string());
        assert!(matches!(
            patch.into_config(),
            Err(GlobalConfigError::InvalidField { field: "upstream_url", .. })
        ));
    }

    #[test]
    fn custom_upstream_has_no_implicit_origin() {
        let mut patch = base_patch();
        patch.upstream_url = Some("http://127.0.0.1:9999/generate".to_string());
        assert_eq!(patch.into_config().unwrap().upstream_origin, None);
    }

    #[test]
    fn models_file_missing_reports_path() {
        let err = load_models_file(Path::new("/nonexistent/pixgate-models.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pixgate-models.json"));
    }
}
