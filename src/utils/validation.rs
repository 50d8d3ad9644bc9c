use crate::utils::error::{Result, SettleError};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 檢查結算期間為 `YYYYMM` 六位數字且月份有效
pub fn validate_period(field_name: &str, period: &str) -> Result<()> {
    let invalid = |reason: &str| SettleError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: period.to_string(),
        reason: reason.to_string(),
    };

    let re = Regex::new(r"^\d{6}$").map_err(|e| SettleError::ProcessingError {
        message: e.to_string(),
    })?;
    if !re.is_match(period) {
        return Err(invalid("Period must be 6 digits in YYYYMM format"));
    }

    let year: i32 = period[..4].parse().map_err(|_| invalid("Invalid year"))?;
    let month: u32 = period[4..].parse().map_err(|_| invalid("Invalid month"))?;
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return Err(invalid("Month must be between 01 and 12"));
    }

    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SettleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SettleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 來源可以是活頁簿檔案，或是存放 `<YYYYMM>.csv` 的目錄
pub fn validate_source_path(field_name: &str, path: &str, allowed_extensions: &[&str]) -> Result<()> {
    validate_path(field_name, path)?;

    if Path::new(path).is_dir() {
        return Ok(());
    }

    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(extension) if allowed_set.contains(extension.to_ascii_lowercase().as_str()) => Ok(()),
        Some(extension) => Err(SettleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(SettleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Not a directory and has no file extension".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SettleError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_period() {
        assert!(validate_period("period", "202403").is_ok());
        assert!(validate_period("period", "202412").is_ok());
        assert!(validate_period("period", "2024-03").is_err());
        assert!(validate_period("period", "20243").is_err());
        assert!(validate_period("period", "202413").is_err());
        assert!(validate_period("period", "202400").is_err());
        assert!(validate_period("period", "").is_err());
    }

    #[test]
    fn test_validate_source_path() {
        let allowed = ["xlsx", "xlsm"];
        assert!(validate_source_path("cost_file", "input_song cost.xlsx", &allowed).is_ok());
        assert!(validate_source_path("cost_file", "COST.XLSX", &allowed).is_ok());
        assert!(validate_source_path("cost_file", "cost.txt", &allowed).is_err());
        assert!(validate_source_path("cost_file", "", &allowed).is_err());

        let dir = tempfile::TempDir::new().unwrap();
        let dir_path = dir.path().to_str().unwrap();
        assert!(validate_source_path("cost_file", dir_path, &allowed).is_ok());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("issue_date", "2024-04-10").is_ok());
        assert!(validate_non_empty_string("issue_date", "   ").is_err());
    }
}
