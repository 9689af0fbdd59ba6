use crate::core::ConfigProvider;
use crate::utils::error::{AcousticError, Result};
use crate::utils::validation::{validate_file_extensions, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "acoustic-calc.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub rooms_file: String,
    pub speakers_file: String,
    pub clients_file: String,
    pub projects_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            rooms_file: "rooms.csv".to_string(),
            speakers_file: "speakers.csv".to_string(),
            clients_file: "clients.csv".to_string(),
            projects_file: "projects.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 顯示面積、體積與傳播損失等完整數據
    pub full_mode: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { full_mode: true }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| AcousticError::ConfigError {
            message: format!("cannot read '{}': {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AcousticError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 指定路徑時檔案必須存在；未指定時嘗試預設檔案，不存在則使用預設值
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                tracing::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AcousticError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("storage.data_dir", &self.storage.data_dir)?;

        let files = [
            ("storage.rooms_file", self.storage.rooms_file.as_str()),
            ("storage.speakers_file", self.storage.speakers_file.as_str()),
            ("storage.clients_file", self.storage.clients_file.as_str()),
            ("storage.projects_file", self.storage.projects_file.as_str()),
        ];
        for (field, file) in files {
            validate_path(field, file)?;
            validate_file_extensions(field, &[file], &["csv"])?;
        }

        for (i, (field, file)) in files.iter().enumerate() {
            if files[..i].iter().any(|(_, other)| other == file) {
                return Err(AcousticError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: file.to_string(),
                    reason: "Each catalog needs its own file".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn rooms_file(&self) -> &str {
        &self.storage.rooms_file
    }

    fn speakers_file(&self) -> &str {
        &self.storage.speakers_file
    }

    fn clients_file(&self) -> &str {
        &self.storage.clients_file
    }

    fn projects_file(&self) -> &str {
        &self.storage.projects_file
    }

    fn full_report(&self) -> bool {
        self.report.full_mode
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
