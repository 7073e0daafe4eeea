use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Invalid input '{value}' for '{field}': {reason}")]
    InvalidInputError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown {kind} '{value}'. Expected one of: {expected}")]
    UnknownOptionError {
        kind: String,
        value: String,
        expected: String,
    },

    #[error("Market data error from {provider}: {message}")]
    MarketDataError { provider: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

/// 錯誤分類，用於日誌與退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    Storage,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HubError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HubError::ConfigError { .. }
            | HubError::ConfigValidationError { .. }
            | HubError::InvalidConfigValueError { .. }
            | HubError::MissingConfigError { .. } => ErrorCategory::Configuration,
            HubError::InvalidInputError { .. } | HubError::UnknownOptionError { .. } => {
                ErrorCategory::Input
            }
            HubError::HttpError(_) | HubError::MarketDataError { .. } => ErrorCategory::Network,
            HubError::IoError(_) | HubError::ZipError(_) => ErrorCategory::Storage,
            HubError::CsvError(_)
            | HubError::SerializationError(_)
            | HubError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常可以重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML config file and command line flags against the documented options"
            }
            ErrorCategory::Input => "Run the subcommand with --help to see accepted values and ranges",
            ErrorCategory::Network => {
                "Market APIs are rate limited; wait a few seconds and retry, or run with --offline"
            }
            ErrorCategory::Storage => "Make sure the output directory exists and is writable",
            ErrorCategory::Processing => "Re-run with --verbose and inspect the debug log",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HubError::InvalidInputError { field, reason, .. } => {
                format!("Input '{}' is not valid: {}", field, reason)
            }
            HubError::UnknownOptionError { kind, value, .. } => {
                format!("'{}' is not a known {}", value, kind)
            }
            HubError::MarketDataError { provider, .. } => {
                format!("Could not fetch live data from {}", provider)
            }
            HubError::HttpError(_) => "Could not reach the market data service".to_string(),
            other => other.to_string(),
        }
    }

    pub fn invalid_input(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        HubError::InvalidInputError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn market(provider: &str, message: impl Into<String>) -> Self {
        HubError::MarketDataError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HubError>;
