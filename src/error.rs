use std::ffi::NulError;
use std::num::ParseIntError;
use thiserror::Error;

/// Broad classification of a [`PresenceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input from the host: malformed timestamps, invalid config values
    Configuration,
    /// Native memory could not be obtained
    Resource,
    /// The session is in the wrong state for the requested operation
    Session,
    /// The host system misbehaved (clock before the UNIX epoch)
    System,
}

/// Errors that can occur while driving a Rich Presence session
#[derive(Error, Debug)]
pub enum PresenceError {
    #[error("Invalid {field} {value:?}: expected Unix epoch seconds")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Text contains an interior NUL byte")]
    InvalidText(#[from] NulError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Failed to allocate a native buffer of {size} bytes")]
    AllocationFailed { size: usize },

    #[error("Presence session has already been shut down")]
    NotActive,

    #[error("A native presence session is already running in this process")]
    AlreadyInitialized,

    #[error("System time error: {0}")]
    SystemTime(String),
}

impl PresenceError {
    /// Get the category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidTimestamp { .. }
            | Self::InvalidText(_)
            | Self::InvalidConfig(_)
            | Self::ConfigParse(_) => ErrorCategory::Configuration,
            Self::AllocationFailed { .. } => ErrorCategory::Resource,
            Self::NotActive | Self::AlreadyInitialized => ErrorCategory::Session,
            Self::SystemTime(_) => ErrorCategory::System,
        }
    }

    /// Whether the caller supplied something malformed
    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    /// Create an invalid timestamp error
    pub(crate) fn invalid_timestamp(
        field: &'static str,
        value: impl Into<String>,
        source: ParseIntError,
    ) -> Self {
        Self::InvalidTimestamp {
            field,
            value: value.into(),
            source,
        }
    }
}

/// Result type for presence operations
pub type Result<T = ()> = std::result::Result<T, PresenceError>;
