use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcousticError {
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Lookup,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AcousticError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::Input,
            Self::NotFound { .. } => ErrorCategory::Lookup,
            Self::StorageError { .. }
            | Self::CsvError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Lookup => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidInput { field, .. } => {
                format!("Correct the value of '{}' and run the calculation again", field)
            }
            Self::NotFound { entity, .. } => format!(
                "Check the spelling or register the {} first (use the matching 'list' command)",
                entity.to_lowercase()
            ),
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => {
                "Review the TOML configuration file and command line flags".to_string()
            }
            Self::CsvError(_) => {
                "Make sure the catalog CSV files keep their original header row".to_string()
            }
            Self::IoError(_) | Self::StorageError { .. } | Self::SerializationError(_) => {
                "Check that the data directory exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput { field, reason } => format!("Invalid value for {}: {}", field, reason),
            Self::NotFound { entity, key } => format!("{} '{}' does not exist", entity, key),
            Self::CsvError(_) | Self::IoError(_) | Self::StorageError { .. } => {
                "Could not read or write the catalog files".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AcousticError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories_and_severity() {
        let err = AcousticError::invalid_input("length", "must be greater than zero");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("length"));

        let err = AcousticError::not_found("Room profile", "Auditorium");
        assert_eq!(err.category(), ErrorCategory::Lookup);
        assert_eq!(err.user_friendly_message(), "Room profile 'Auditorium' does not exist");

        let err = AcousticError::from(std::io::Error::other("disk full"));
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
