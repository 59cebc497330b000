use thiserror::Error;

use crate::domain::enums::AnimalType;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("No row in reference table '{table}' for {key}")]
    MissingReferenceData { table: String, key: String },

    #[error("No manure tank for animal type {animal_type:?}")]
    ManureTankNotFound { animal_type: AnimalType },

    #[error("Calculation failed in stage '{stage}': {details}")]
    CalculationError { stage: String, details: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Validation,
    Calculation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FarmError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FarmError::IoError(_) => ErrorCategory::Io,
            FarmError::CsvError(_)
            | FarmError::SerializationError(_)
            | FarmError::MissingReferenceData { .. } => ErrorCategory::Data,
            FarmError::TomlParseError(_)
            | FarmError::ConfigError { .. }
            | FarmError::InvalidConfigValueError { .. }
            | FarmError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FarmError::ValidationError { .. } => ErrorCategory::Validation,
            FarmError::ManureTankNotFound { .. } | FarmError::CalculationError { .. } => {
                ErrorCategory::Calculation
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FarmError::ValidationError { .. } => ErrorSeverity::Medium,
            FarmError::TomlParseError(_)
            | FarmError::ConfigError { .. }
            | FarmError::InvalidConfigValueError { .. }
            | FarmError::MissingConfigError { .. }
            | FarmError::SerializationError(_)
            | FarmError::CsvError(_)
            | FarmError::MissingReferenceData { .. }
            | FarmError::CalculationError { .. } => ErrorSeverity::High,
            // tank lookups only fail on a broken category mapping
            FarmError::ManureTankNotFound { .. } | FarmError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the input files exist and the output directory is writable",
            ErrorCategory::Data => {
                "Check the farm file and reference tables cover every province and year used by the farm"
            }
            ErrorCategory::Configuration => "Review the settings file and command line arguments",
            ErrorCategory::Validation => {
                "Fix the reported farm values (fractions must be within [0, 1], periods must not overlap)"
            }
            ErrorCategory::Calculation => "Report this as a defect together with the farm file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FarmError::MissingReferenceData { table, key } => {
                format!("Default data table '{}' has no entry for {}", table, key)
            }
            FarmError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            FarmError::MissingConfigError { field } => format!("Setting '{}' is required", field),
            other => other.to_string(),
        }
    }

    pub fn missing_reference(table: &str, key: impl Into<String>) -> Self {
        FarmError::MissingReferenceData {
            table: table.to_string(),
            key: key.into(),
        }
    }

    pub fn calculation(stage: &str, details: impl Into<String>) -> Self {
        FarmError::CalculationError {
            stage: stage.to_string(),
            details: details.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FarmError>;
