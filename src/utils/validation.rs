use crate::utils::error::{EtlError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// The prefix becomes part of every output file name, so it must be a bare name.
pub fn validate_prefix(field_name: &str, prefix: &str) -> Result<()> {
    validate_non_empty_string(field_name, prefix)?;

    if prefix.contains(['/', '\\', '\0']) {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: prefix.to_string(),
            reason: "Prefix must not contain path separators".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_extensions.contains(&extension) => Ok(()),
        Some(extension) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // written so that NaN is rejected too
    if !(value >= min && value <= max) {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_reliability(field_name: &str, value: f64) -> Result<()> {
    validate_range(field_name, value, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("dataset_path", "verilog_dataset").is_ok());
        assert!(validate_path("dataset_path", "").is_err());
        assert!(validate_path("dataset_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_prefix() {
        assert!(validate_prefix("prefix", "combcirc").is_ok());
        assert!(validate_prefix("prefix", "   ").is_err());
        assert!(validate_prefix("prefix", "out/combcirc").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("archive", "dataset.zip", &["zip"]).is_ok());
        assert!(validate_file_extension("archive", "dataset.tar", &["zip"]).is_err());
        assert!(validate_file_extension("archive", "dataset", &["zip"]).is_err());
    }

    #[test]
    fn test_validate_reliability() {
        assert!(validate_reliability("reliability", 0.7419).is_ok());
        assert!(validate_reliability("reliability", 1.0).is_ok());
        assert!(validate_reliability("reliability", 1.5).is_err());
        assert!(validate_reliability("reliability", f64::NAN).is_err());
    }
}
