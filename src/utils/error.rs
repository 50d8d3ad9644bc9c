use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettleError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Spreadsheet write failed: {0}")]
    SpreadsheetError(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("[{file}] workbook could not be read: {message}")]
    WorkbookError { file: String, message: String },

    #[error("[{file}] sheet '{period}' not found")]
    PeriodNotFound { file: String, period: String },

    #[error("[{file}] sheet '{period}' is empty")]
    EmptySheet { file: String, period: String },

    #[error("[{file}] required column '{column}' is missing")]
    RequiredColumnMissing { file: String, column: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, SettleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Processing,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// 驗證發現不符且要求以失敗結束時的退出碼
pub const MISMATCH_EXIT_CODE: i32 = 4;

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 處理錯誤
            ErrorSeverity::High => 1,     // 設定或來源錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl SettleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SettleError::ConfigError { .. }
            | SettleError::ConfigValidationError { .. }
            | SettleError::InvalidConfigValueError { .. }
            | SettleError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SettleError::WorkbookError { .. }
            | SettleError::PeriodNotFound { .. }
            | SettleError::EmptySheet { .. }
            | SettleError::RequiredColumnMissing { .. } => ErrorCategory::Source,
            SettleError::ProcessingError { .. } | SettleError::SerializationError(_) => {
                ErrorCategory::Processing
            }
            SettleError::ZipError(_)
            | SettleError::IoError(_)
            | SettleError::SpreadsheetError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Source => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SettleError::PeriodNotFound { period, .. } => format!(
                "Add a sheet named '{}' to the workbook or check the --period value",
                period
            ),
            SettleError::EmptySheet { .. } => {
                "Make sure the first row of the sheet holds the column labels".to_string()
            }
            SettleError::RequiredColumnMissing { column, .. } => format!(
                "Rename the header cell to exactly '{}' or override the label in the [columns] config",
                column
            ),
            SettleError::WorkbookError { .. } => {
                "Re-export the file as .xlsx, or as UTF-8 <YYYYMM>.csv files in a directory".to_string()
            }
            SettleError::ConfigError { .. }
            | SettleError::ConfigValidationError { .. }
            | SettleError::InvalidConfigValueError { .. }
            | SettleError::MissingConfigError { .. } => {
                "Check the command line arguments or the TOML configuration".to_string()
            }
            SettleError::IoError(_)
            | SettleError::ZipError(_)
            | SettleError::SpreadsheetError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            SettleError::SerializationError(_) | SettleError::ProcessingError { .. } => {
                "Re-run with --verbose and inspect the log".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Source => format!("Cannot read source data: {}", self),
            ErrorCategory::Processing => format!("Settlement failed: {}", self),
            ErrorCategory::Output => format!("Cannot write output: {}", self),
        }
    }
}
