use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmokeError {
    #[error("Redis command failed: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Plan file error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Command,
    Configuration,
    Serialization,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SmokeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SmokeError::RedisError(e) if e.is_connection_refusal() || e.is_timeout() => {
                ErrorCategory::Connection
            }
            SmokeError::RedisError(_) => ErrorCategory::Command,
            SmokeError::IoError(_) => ErrorCategory::Io,
            SmokeError::SerializationError(_) => ErrorCategory::Serialization,
            SmokeError::TomlError(_)
            | SmokeError::ConfigError { .. }
            | SmokeError::InvalidConfigValueError { .. }
            | SmokeError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SmokeError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Connection => ErrorSeverity::Critical,
            ErrorCategory::Command | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Serialization | ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Connection => {
                "Check that the Redis server is reachable and that --redis-url and --mode match the deployment".to_string()
            }
            ErrorCategory::Command => {
                "Check that the target server supports the issued commands (JSON.SET requires the RedisJSON module)".to_string()
            }
            ErrorCategory::Configuration => {
                "Review the CLI flags and plan file against the documented format".to_string()
            }
            ErrorCategory::Serialization => {
                "Check that every json-set value in the plan is representable as JSON".to_string()
            }
            ErrorCategory::Io => "Check file paths and permissions".to_string(),
            ErrorCategory::Processing => {
                "Re-run with --verbose to see the per-batch command and reply counts".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SmokeError::RedisError(e) if e.is_connection_refusal() => {
                "Could not connect to the Redis server".to_string()
            }
            SmokeError::RedisError(e) => format!("Redis rejected a command: {}", e),
            SmokeError::TomlError(e) => format!("The plan file could not be parsed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SmokeError>;
