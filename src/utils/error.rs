use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Invalid glob pattern: {0}")]
    GlobPatternError(#[from] glob::PatternError),

    #[error("Cannot read dataset entry: {0}")]
    GlobError(#[from] glob::GlobError),

    #[error("{}:{line}: {message}", path.display())]
    ParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("No reliability known for circuit '{circuit}'")]
    MissingReliabilityError { circuit: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Input,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        EtlError::ParseError {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        EtlError::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) | EtlError::ZipError(_) | EtlError::GlobError(_) => {
                ErrorCategory::Io
            }
            EtlError::SerializationError(_)
            | EtlError::ParseError { .. }
            | EtlError::MissingReliabilityError { .. } => ErrorCategory::Input,
            EtlError::GlobPatternError(_)
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::ProcessingError { .. } | EtlError::ValidationError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::IoError(_) | EtlError::GlobError(_) => {
                "Check that the dataset and output directories exist and are accessible"
            }
            EtlError::ZipError(_) => "Check free disk space or disable the output archive",
            EtlError::SerializationError(_) => {
                "Run fix-json over the dataset to repair malformed sidecar JSON files"
            }
            EtlError::ParseError { .. } => {
                "Make sure the netlist is a flat gate-level module using primitive gates"
            }
            EtlError::MissingReliabilityError { .. } => {
                "Add the circuit to the reliability table in the TOML configuration"
            }
            EtlError::GlobPatternError(_)
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the command line flags or configuration file"
            }
            EtlError::ProcessingError { .. } | EtlError::ValidationError { .. } => {
                "Re-run with --verbose and report the failing circuit"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Input => format!("Invalid dataset input: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Conversion failed: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
