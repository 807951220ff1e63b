use std::path::PathBuf;

use clap::Parser;
use pixgate_common::{GlobalConfigError, GlobalConfigPatch, load_models_file};

#[derive(Parser)]
#[command(name = "pixgate", about = "OpenAI-compatible image generation gateway")]
pub(crate) struct Cli {
    #[arg(long, env = "PIXGATE_HOST")]
    pub(crate) host: Option<String>,
    #[arg(long, env = "PIXGATE_PORT")]
    pub(crate) port: Option<u16>,
    /// Bearer secret clients must present.
    #[arg(long, env = "PIXGATE_API_KEY", hide_env_values = true)]
    pub(crate) api_key: Option<String>,
    #[arg(long, env = "PIXGATE_UPSTREAM_URL")]
    pub(crate) upstream_url: Option<String>,
    #[arg(long, env = "PIXGATE_UPSTREAM_ORIGIN")]
    pub(crate) upstream_origin: Option<String>,
    #[arg(long, env = "PIXGATE_USER_AGENT")]
    pub(crate) user_agent: Option<String>,
    #[arg(long, env = "PIXGATE_MAX_ATTEMPTS")]
    pub(crate) max_attempts: Option<u32>,
    #[arg(long, env = "PIXGATE_INITIAL_BACKOFF_MS")]
    pub(crate) initial_backoff_ms: Option<u64>,
    #[arg(long, env = "PIXGATE_JITTER_MS")]
    pub(crate) jitter_ms: Option<u64>,
    #[arg(long, env = "PIXGATE_ATTEMPT_TIMEOUT_SECS")]
    pub(crate) attempt_timeout_secs: Option<u64>,
    /// JSON array of `{ "id", "provider", "model_id" }` replacing the built-in table.
    #[arg(long, env = "PIXGATE_MODELS_FILE")]
    pub(crate) models_file: Option<PathBuf>,
    #[arg(long, env = "PIXGATE_DEFAULT_MODEL")]
    pub(crate) default_model: Option<String>,
    #[arg(long, env = "PIXGATE_PROXY")]
    pub(crate) proxy: Option<String>,
}

impl Cli {
    pub(crate) fn into_patch(self) -> Result<GlobalConfigPatch, GlobalConfigError> {
        let models = self
            .models_file
            .as_deref()
            .map(load_models_file)
            .transpose()?;
        Ok(GlobalConfigPatch {
            host: self.host,
            port: self.port,
            api_key: self.api_key,
            upstream_url: self.upstream_url,
            upstream_origin: self.upstream_origin,
            user_agent: self.user_agent,
            proxy: self.proxy,
            max_attempts: self.max_attempts,
            initial_backoff_ms: self.initial_backoff_ms,
            jitter_ms: self.jitter_ms,
            attempt_timeout_secs: self.attempt_timeout_secs,
            models,
            default_model: self.default_model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_land_in_patch() {
        let cli = Cli::parse_from([
            "pixgate",
            "--api-key",
            "sk-1",
            "--port",
            "9000",
            "--max-attempts",
            "5",
            "--default-model",
            "replicate/flux-pro",
        ]);
        let patch = cli.into_patch().unwrap();
        assert_eq!(patch.api_key.as_deref(), Some("sk-1"));
        assert_eq!(patch.port, Some(9000));
        assert_eq!(patch.max_attempts, Some(5));
        assert_eq!(patch.default_model.as_deref(), Some("replicate/flux-pro"));
        assert!(patch.models.is_none());
    }

    #[test]
    fn unreadable_models_file_is_an_error() {
        let cli = Cli::parse_from([
            "pixgate",
            "--api-key",
            "sk-1",
            "--models-file",
            "/nonexistent/pixgate-models.json",
        ]);
        assert!(matches!(
            cli.into_patch(),
            Err(GlobalConfigError::ModelsFile { .. })
        ));
    }
}
