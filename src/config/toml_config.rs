use crate::adapters::{MemoryGateway, RestGateway};
use crate::core::moderation::TransitionPolicy;
use crate::core::notice::Lang;
use crate::domain::ports::Gateway;
use crate::utils::error::{DeskError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub moderation: ModerationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Rest,
    #[default]
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerationConfig {
    #[serde(default)]
    pub transition_policy: TransitionPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub language: Lang,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub json: bool,
}

impl DeskConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DeskError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_ANON_KEY})，未設定者保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DeskError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(timeout) = self.backend.timeout_seconds {
            validation::validate_range("backend.timeout_seconds", timeout, 1, 300)?;
        }

        if self.backend.kind == BackendKind::Rest {
            let url = validation::validate_required_field("backend.url", &self.backend.url)?;
            validation::validate_url("backend.url", url)?;

            let api_key =
                validation::validate_required_field("backend.api_key", &self.backend.api_key)?;
            if api_key.trim().is_empty() || api_key.contains("${") {
                return Err(DeskError::InvalidConfigValueError {
                    field: "backend.api_key".to_string(),
                    value: api_key.clone(),
                    reason: "API key is empty or its environment variable is not set".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.backend
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    pub fn language(&self) -> Lang {
        self.display.language
    }

    pub fn transition_policy(&self) -> TransitionPolicy {
        self.moderation.transition_policy
    }

    /// 依設定建立後端 gateway
    pub fn build_gateway(&self) -> Result<Arc<dyn Gateway>> {
        self.validate_config()?;

        match self.backend.kind {
            BackendKind::Memory => {
                tracing::debug!("Using in-memory backend");
                Ok(Arc::new(MemoryGateway::new()))
            }
            BackendKind::Rest => {
                let url = validation::validate_required_field("backend.url", &self.backend.url)?;
                let api_key =
                    validation::validate_required_field("backend.api_key", &self.backend.api_key)?;
                tracing::debug!("Using REST backend at {}", url);
                Ok(Arc::new(RestGateway::new(url, api_key, self.timeout())?))
            }
        }
    }
}

impl Validate for DeskConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
