use std::fmt;
use std::path::PathBuf;

/// Main error type for gobo operations
#[derive(Debug)]
pub enum GoboError {
    Io {
        source: std::io::Error,
        context: String,
    },
    Config {
        message: String,
        path: Option<PathBuf>,
    },
    Validation {
        field: String,
        value: String,
        reason: String,
    },
    NotFound {
        resource: String,
        identifier: String,
    },
    AlreadyExists {
        resource: String,
        identifier: String,
    },
    AlreadyActive {
        name: String,
    },
    ActiveEnvironment {
        name: String,
        operation: String,
    },
    NoActiveEnvironment {
        operation: String,
    },
    Command {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    Generic {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl GoboError {
    /// Errors caused by what the user asked for rather than by the machine.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            GoboError::Validation { .. }
                | GoboError::NotFound { .. }
                | GoboError::AlreadyExists { .. }
                | GoboError::AlreadyActive { .. }
                | GoboError::ActiveEnvironment { .. }
                | GoboError::NoActiveEnvironment { .. }
        )
    }

    pub fn is_config_error(&self) -> bool {
        matches!(self, GoboError::Config { .. })
    }
}

impl fmt::Display for GoboError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoboError::Io { context, source } => {
                write!(f, "IO error during {}: {}", context, source)
            }
            GoboError::Config { message, path } => {
                if let Some(path) = path {
                    write!(f, "Configuration error in {}: {}", path.display(), message)
                } else {
                    write!(f, "Configuration error: {}", message)
                }
            }
            GoboError::Validation { field, value, reason } => {
                write!(f, "Invalid {} '{}': {}", field, value, reason)
            }
            GoboError::NotFound { resource, identifier } => {
                write!(f, "{} '{}' not found", resource, identifier)
            }
            GoboError::AlreadyExists { resource, identifier } => {
                write!(f, "{} '{}' already exists", resource, identifier)
            }
            GoboError::AlreadyActive { name } => {
                write!(f, "{} is already the currently active environment", name)
            }
            GoboError::ActiveEnvironment { name, operation } => {
                write!(f, "Cannot {} '{}': it is the active environment", operation, name)
            }
            GoboError::NoActiveEnvironment { operation } => {
                write!(f, "Cannot {}: no environment is active", operation)
            }
            GoboError::Command { command, exit_code, stderr } => {
                if let Some(code) = exit_code {
                    write!(f, "Command '{}' failed with exit code {}: {}", command, code, stderr)
                } else {
                    write!(f, "Command '{}' failed: {}", command, stderr)
                }
            }
            GoboError::Generic { message, .. } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for GoboError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GoboError::Io { source, .. } => Some(source),
            GoboError::Generic { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GoboError {
    fn from(err: std::io::Error) -> Self {
        GoboError::Io {
            source: err,
            context: "filesystem access".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GoboError>;

pub trait ErrorContext<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    fn with_io_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| GoboError::Generic {
            message: f(),
            source: Some(Box::new(e)),
        })
    }

    fn with_io_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| GoboError::Io {
            source: e,
            context: f(),
        })
    }
}

impl<T> ErrorContext<T> for std::result::Result<T, GoboError> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| GoboError::Generic {
            message: format!("{}: {}", f(), e),
            source: Some(Box::new(e)),
        })
    }

    // Already structured; keep the original error.
    fn with_io_context<F>(self, _f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self
    }
}
