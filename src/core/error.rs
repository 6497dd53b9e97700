use anyhow::Error as AnyhowError;
use std::fmt;

/// Structured error types for the devstage application
#[derive(Debug)]
pub enum StageError {
    /// Configuration related errors (missing output directory, etc.)
    Config {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// Input/Output related errors (manifest reading, stdin, etc.)
    Io {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// Exclusion rule related errors (invalid pattern)
    Exclusion {
        message: String,
        pattern: Option<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// Device path mapping related errors
    Mapping {
        message: String,
        path: Option<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// Generic errors that don't fit other categories
    Other {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::Config { message, .. } => {
                write!(f, "Configuration error: {}", message)
            }
            StageError::Io { message, .. } => {
                write!(f, "I/O error: {}", message)
            }
            StageError::Exclusion {
                message, pattern, ..
            } => {
                if let Some(pattern) = pattern {
                    write!(f, "Exclusion rule error for '{}': {}", pattern, message)
                } else {
                    write!(f, "Exclusion rule error: {}", message)
                }
            }
            StageError::Mapping { message, path, .. } => {
                if let Some(path) = path {
                    write!(f, "Path mapping error for '{}': {}", path, message)
                } else {
                    write!(f, "Path mapping error: {}", message)
                }
            }
            StageError::Other { message, .. } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StageError::Config { source, .. }
            | StageError::Io { source, .. }
            | StageError::Exclusion { source, .. }
            | StageError::Mapping { source, .. }
            | StageError::Other { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn std::error::Error + 'static)),
        }
    }
}

impl StageError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an exclusion rule error with source
    pub fn exclusion_with_source<
        S: Into<String>,
        P: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        pattern: Option<P>,
        source: E,
    ) -> Self {
        Self::Exclusion {
            message: message.into(),
            pattern: pattern.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Create a path mapping error
    pub fn mapping<S: Into<String>, P: Into<String>>(message: S, path: Option<P>) -> Self {
        Self::Mapping {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }
}

// Allow conversion from anyhow::Error for compatibility
impl From<AnyhowError> for StageError {
    fn from(error: AnyhowError) -> Self {
        Self::Other {
            message: error.to_string(),
            source: Some(error.into()),
        }
    }
}

impl From<std::io::Error> for StageError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, StageError>;

/// Extension trait to add context to errors
pub trait ErrorContext<T> {
    /// Add context to convert into StageError
    fn context_config<S: Into<String>>(self, message: S) -> Result<T>;
    fn context_io<S: Into<String>>(self, message: S) -> Result<T>;
    fn context_exclusion<S: Into<String>, P: Into<String>>(
        self,
        message: S,
        pattern: P,
    ) -> Result<T>;
    fn context_mapping<S: Into<String>, P: Into<String>>(self, message: S, path: P) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context_config<S: Into<String>>(self, message: S) -> Result<T> {
        self.map_err(|e| StageError::config_with_source(message, e))
    }

    fn context_io<S: Into<String>>(self, message: S) -> Result<T> {
        self.map_err(|e| StageError::io_with_source(message, e))
    }

    fn context_exclusion<S: Into<String>, P: Into<String>>(
        self,
        message: S,
        pattern: P,
    ) -> Result<T> {
        self.map_err(|e| StageError::exclusion_with_source(message, Some(pattern), e))
    }

    fn context_mapping<S: Into<String>, P: Into<String>>(self, message: S, path: P) -> Result<T> {
        self.map_err(|e| StageError::Mapping {
            message: message.into(),
            path: Some(path.into()),
            source: Some(Box::new(e)),
        })
    }
}
