pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::ColumnLabels;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_ARCHIVE_NAME: &str = "정산결과보고서.zip";
pub const DEFAULT_CONTACT_EMAIL: &str = "help@xxxx.com";
/// 來源檔可接受的活頁簿副檔名
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "royalty-settle")]
#[command(about = "Artist royalty settlement and cross-verification tool")]
pub struct CliConfig {
    /// Cost table workbook (.xlsx) or directory of <YYYYMM>.csv files
    #[arg(long)]
    pub cost_file: String,

    /// Revenue table workbook (.xlsx) or directory of <YYYYMM>.csv files
    #[arg(long)]
    pub revenue_file: String,

    /// Settlement period (YYYYMM); also the sheet name
    #[arg(long)]
    pub period: String,

    #[arg(long)]
    pub issue_date: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub archive_name: String,

    #[arg(long, default_value = DEFAULT_CONTACT_EMAIL)]
    pub contact_email: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log system resource usage per stage")]
    pub monitor: bool,

    #[arg(long, help = "Exit with code 4 when verification finds mismatches")]
    pub fail_on_mismatch: bool,

    #[arg(skip)]
    #[serde(default)]
    pub columns: ColumnLabels,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn cost_file(&self) -> &str {
        &self.cost_file
    }

    fn revenue_file(&self) -> &str {
        &self.revenue_file
    }

    fn period(&self) -> &str {
        &self.period
    }

    fn issue_date(&self) -> &str {
        &self.issue_date
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn archive_name(&self) -> &str {
        &self.archive_name
    }

    fn contact_email(&self) -> &str {
        &self.contact_email
    }

    fn columns(&self) -> &ColumnLabels {
        &self.columns
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_source_path("cost_file", &self.cost_file, WORKBOOK_EXTENSIONS)?;
        validation::validate_source_path("revenue_file", &self.revenue_file, WORKBOOK_EXTENSIONS)?;
        validation::validate_period("period", &self.period)?;
        validation::validate_non_empty_string("issue_date", &self.issue_date)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("archive_name", &self.archive_name)?;
        Ok(())
    }
}
