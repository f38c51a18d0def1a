use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const LLM_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const LLM_BASE_URL_VAR: &str = "OPENAI_BASE_URL";

const DEFAULT_OUTPUT_DIR: &str = "changelogs";
const DEFAULT_RELEASE_MARKER: &str = "production";
const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_LLM_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_DIFF_CONCURRENCY: usize = 4;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Validated runtime configuration, built once at startup and handed to
/// every component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: String,
    pub github_token: String,
    pub llm_api_key: String,
    pub github_api_base: String,
    pub llm_api_base: String,
    pub output_dir: PathBuf,
    pub release_marker: String,
    pub diff_concurrency: usize,
    pub request_timeout: Duration,
    pub llm_timeout: Duration,
}

/// The on-disk YAML document. Every field is optional so the config wizard
/// can round-trip a partially filled file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_concurrency: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_timeout_secs: Option<u64>,
}

impl StoredConfig {
    pub fn load(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Self::default()),
            Ok(contents) => Ok(serde_yaml::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

/// Environment values the runtime config depends on.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub github_token: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        let read = |key: &str| env::var(key).ok().filter(|value| !value.trim().is_empty());
        Self {
            github_token: read(GITHUB_TOKEN_VAR),
            llm_api_key: read(LLM_API_KEY_VAR),
            llm_base_url: read(LLM_BASE_URL_VAR),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::Configuration(format!(
                "config file {} not found (run `relnotes config init`)",
                path.display()
            )));
        }
        let stored = StoredConfig::load(path)?;
        Self::resolve(stored, Secrets::from_env())
    }

    /// Merges the file with the environment and fails fast on anything a
    /// pipeline run cannot do without.
    pub fn resolve(stored: StoredConfig, secrets: Secrets) -> AppResult<Self> {
        let github_token = secrets.github_token.ok_or_else(|| {
            AppError::Configuration(format!("{GITHUB_TOKEN_VAR} environment variable is not set"))
        })?;
        let llm_api_key = secrets.llm_api_key.ok_or_else(|| {
            AppError::Configuration(format!("{LLM_API_KEY_VAR} environment variable is not set"))
        })?;

        let model = stored
            .model_engine
            .map(|model| model.trim().to_string())
            .filter(|model| !model.is_empty())
            .ok_or_else(|| {
                AppError::Configuration("`model_engine` is missing from the config file".to_string())
            })?;

        let release_marker = stored
            .release_marker
            .unwrap_or_else(|| DEFAULT_RELEASE_MARKER.to_string());
        if release_marker.trim().is_empty() {
            return Err(AppError::Configuration(
                "`release_marker` must not be empty".to_string(),
            ));
        }

        let diff_concurrency = stored.diff_concurrency.unwrap_or(DEFAULT_DIFF_CONCURRENCY);
        if diff_concurrency == 0 {
            return Err(AppError::Configuration(
                "`diff_concurrency` must be at least 1".to_string(),
            ));
        }

        let llm_api_base = secrets
            .llm_base_url
            .or(stored.llm_api_base)
            .unwrap_or_else(|| DEFAULT_LLM_API_BASE.to_string());

        Ok(Self {
            model,
            github_token,
            llm_api_key,
            github_api_base: stored
                .github_api_base
                .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE.to_string()),
            llm_api_base,
            output_dir: PathBuf::from(
                stored
                    .output_dir
                    .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            release_marker,
            diff_concurrency,
            request_timeout: Duration::from_secs(
                stored
                    .request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            llm_timeout: Duration::from_secs(
                stored.llm_timeout_secs.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS),
            ),
        })
    }
}
