use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    NotInRange(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

#[derive(Debug)]
pub enum StorageError {
    ConnectionFailed,
    WriteFailed,
    ReadFailed,
    /// Write rejected because the target row or object path already exists.
    Conflict,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionFailed => write!(f, "Storage connection failed"),
            StorageError::WriteFailed => write!(f, "Storage write failed"),
            StorageError::ReadFailed => write!(f, "Storage read failed"),
            StorageError::Conflict => write!(f, "Storage write conflict"),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug)]
pub enum GenerationError {
    /// Transport-level failure talking to the generation backend.
    RequestFailed(String),
    /// The call exceeded the configured deadline.
    Timeout,
    /// The model answered, but not with JSON matching the requested schema.
    BadResponse(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::RequestFailed(e) => write!(f, "Generation request failed: {}", e),
            GenerationError::Timeout => write!(f, "Generation request timed out"),
            GenerationError::BadResponse(e) => write!(f, "Unparsable generation response: {}", e),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Top-level error for the session/submission/dashboard flows.
///
/// Each variant maps to one HTTP status at the web boundary:
/// Validation -> 400, Forbidden -> 403, NotFound -> 404, everything else -> 500.
#[derive(Debug)]
pub enum ServiceError {
    Validation(String),
    Forbidden(String),
    NotFound(String),
    Generation(GenerationError),
    Storage(StorageError),
    Unclassified(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Validation(e) => write!(f, "Validation error: {}", e),
            ServiceError::Forbidden(e) => write!(f, "Forbidden: {}", e),
            ServiceError::NotFound(e) => write!(f, "Not found: {}", e),
            ServiceError::Generation(e) => write!(f, "Generation error: {}", e),
            ServiceError::Storage(e) => write!(f, "Storage error: {}", e),
            ServiceError::Unclassified(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Storage(err)
    }
}

impl From<GenerationError> for ServiceError {
    fn from(err: GenerationError) -> Self {
        ServiceError::Generation(err)
    }
}
