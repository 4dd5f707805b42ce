//! Configuration system for shopchat.
//!
//! Uses `figment` for layered configuration: defaults -> config files ->
//! environment. Configuration is read once at start-up and passed down
//! explicitly; nothing below the binary reads the process environment.

use crate::catalog::DEFAULT_MATCH_LIMIT;
use crate::error::ConfigError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the workspace-level config file.
pub const WORKSPACE_CONFIG_FILE: &str = "shopchat.toml";

/// Session secret used when none is configured.
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// A copy with secrets masked, suitable for printing.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.llm.api_key.is_some() {
            config.llm.api_key = Some("<redacted>".to_string());
        }
        config.server.secret_key = "<redacted>".to_string();
        config
    }

    /// Human-readable warnings for questionable values.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = self.llm.validate();
        if self.server.uses_default_secret() {
            warnings.push(
                "server.secret_key is the built-in development value; set SECRET_KEY in production"
                    .to_string(),
            );
        }
        warnings
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Secret used to sign session cookies.
    pub secret_key: String,
    /// Name of the session cookie.
    pub cookie_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            cookie_name: "shopchat_session".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// `host:port` socket address string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Completion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional base URL override for the API endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// API key given directly in configuration. Takes precedence over `api_key_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Optional cap on generated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            base_url: None,
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: None,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: explicit value first, then the named variable.
    ///
    /// Empty or whitespace-only values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Validate this LLM config and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !(0.0..=2.0).contains(&self.temperature) {
            warnings.push(format!(
                "temperature ({}) is outside the range 0.0..=2.0",
                self.temperature
            ));
        }
        if self.model.trim().is_empty() {
            warnings.push("llm.model is empty".to_string());
        }
        warnings
    }
}

/// Catalog data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// CSV file path. Relative paths resolve against the workspace directory.
    pub path: PathBuf,
    /// Maximum rows embedded in one prompt.
    pub match_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sample_data.csv"),
            match_limit: DEFAULT_MATCH_LIMIT,
        }
    }
}

impl CatalogConfig {
    /// Reject settings that would leave prompts without catalog rows.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.match_limit == 0 {
            return Err(ConfigError::Invalid {
                message: "catalog.match_limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Absolute-or-workspace-relative path of the catalog file.
    pub fn resolve_path(&self, workspace: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            workspace.join(&self.path)
        }
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. `PORT` and `SECRET_KEY` environment variables
/// 2. Environment variables prefixed with `SHOPCHAT_` (`SHOPCHAT_LLM__MODEL`, ...)
/// 3. An explicit config file, if given
/// 4. Workspace config (`shopchat.toml`)
/// 5. User config (`~/.config/shopchat/config.toml`)
/// 6. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    explicit: Option<&Path>,
) -> Result<AppConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(dirs) = directories::ProjectDirs::from("dev", "shopchat", "shopchat") {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(WORKSPACE_CONFIG_FILE);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        figment = figment.merge(Toml::file(path));
    }

    figment = figment
        .merge(Env::prefixed("SHOPCHAT_").split("__"))
        .merge(Env::raw().only(&["PORT", "SECRET_KEY"]).map(|key| {
            if key.as_str().eq_ignore_ascii_case("port") {
                "server.port".into()
            } else {
                "server.secret_key".into()
            }
        }));

    let config: AppConfig = figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;
    config.catalog.validate()?;
    Ok(config)
}
