use crate::config::{
    DEFAULT_ARCHIVE_NAME, DEFAULT_CONTACT_EMAIL, DEFAULT_OUTPUT_PATH, WORKBOOK_EXTENSIONS,
};
use crate::core::ConfigProvider;
use crate::domain::model::ColumnLabels;
use crate::utils::error::{Result, SettleError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub settlement: SettlementConfig,
    pub sources: SourcesConfig,
    pub output: Option<OutputConfig>,
    #[serde(default)]
    pub columns: ColumnLabels,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementConfig {
    pub period: String,
    pub issue_date: String,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub cost_file: String,
    pub revenue_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub archive_name: Option<String>,
    pub fail_on_mismatch: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SettleError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SETTLE_PERIOD})，未設定的保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SettleError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        // 未替換的 ${VAR} 代表環境變數缺漏
        for (field, value) in [
            ("settlement.period", self.settlement.period.as_str()),
            ("sources.cost_file", self.sources.cost_file.as_str()),
            ("sources.revenue_file", self.sources.revenue_file.as_str()),
        ] {
            if value.contains("${") {
                return Err(SettleError::MissingConfigError {
                    field: format!("{} (environment variable in '{}')", field, value),
                });
            }
        }

        validation::validate_source_path(
            "sources.cost_file",
            &self.sources.cost_file,
            WORKBOOK_EXTENSIONS,
        )?;
        validation::validate_source_path(
            "sources.revenue_file",
            &self.sources.revenue_file,
            WORKBOOK_EXTENSIONS,
        )?;
        validation::validate_period("settlement.period", &self.settlement.period)?;
        validation::validate_non_empty_string("settlement.issue_date", &self.settlement.issue_date)?;
        validation::validate_path("output.path", self.output_path())?;
        validation::validate_non_empty_string("output.archive_name", self.archive_name())?;

        Ok(())
    }

    pub fn fail_on_mismatch(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.fail_on_mismatch)
            .unwrap_or(false)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn cost_file(&self) -> &str {
        &self.sources.cost_file
    }

    fn revenue_file(&self) -> &str {
        &self.sources.revenue_file
    }

    fn period(&self) -> &str {
        &self.settlement.period
    }

    fn issue_date(&self) -> &str {
        &self.settlement.issue_date
    }

    fn output_path(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.path.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn archive_name(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.archive_name.as_deref())
            .unwrap_or(DEFAULT_ARCHIVE_NAME)
    }

    fn contact_email(&self) -> &str {
        self.settlement
            .contact_email
            .as_deref()
            .unwrap_or(DEFAULT_CONTACT_EMAIL)
    }

    fn columns(&self) -> &ColumnLabels {
        &self.columns
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
