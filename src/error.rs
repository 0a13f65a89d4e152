use thiserror::Error;

/// Misuse of the single subscriber slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("a subscriber is already registered; unregister it first")]
    AlreadyRegistered,
}

/// Diagnostic code attached to a failed use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Remote source unreachable or timed out.
    Network,
    /// Local storage could not be read.
    Storage,
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Network => "network",
            ErrorCode::Storage => "storage",
            ErrorCode::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a use case collaborator.
///
/// Never propagated through the store: features translate it into a
/// failure change carrying [`UseCaseError::code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed ({code}): {message}")]
pub struct UseCaseError {
    pub operation: &'static str,
    pub code: ErrorCode,
    pub message: String,
}

impl UseCaseError {
    pub fn new(operation: &'static str, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            operation,
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}
