use crate::utils::error::{AcousticError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 數值必須為有限的正數
pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(AcousticError::invalid_input(
            field_name,
            format!("value must be a finite number, got {}", value),
        ));
    }
    if value <= 0.0 {
        return Err(AcousticError::invalid_input(
            field_name,
            format!("value must be greater than zero, got {}", value),
        ));
    }
    Ok(())
}

/// 閉區間檢查 `min <= value <= max`
pub fn validate_range(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(AcousticError::invalid_input(
            field_name,
            format!("value must be between {} and {}, got {}", min, max, value),
        ));
    }
    Ok(())
}

/// 左開右閉區間檢查 `min < value <= max`
pub fn validate_half_open_range(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value <= min || value > max {
        return Err(AcousticError::invalid_input(
            field_name,
            format!(
                "value must be greater than {} and at most {}, got {}",
                min, max, value
            ),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AcousticError::invalid_input(
            field_name,
            "value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AcousticError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AcousticError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[&str],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        match std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(extension) if allowed_set.contains(extension) => {}
            Some(extension) => {
                return Err(AcousticError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.to_string(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
            None => {
                return Err(AcousticError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.to_string(),
                    reason: "File has no extension or invalid filename".to_string(),
                });
            }
        }
    }

    Ok(())
}
