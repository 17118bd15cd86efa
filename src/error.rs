//! Central error handling for the profile cache
//!
//! Provides the crate-wide `ProfileError` with consistent categorization,
//! plus the structured `LoadError` a profile loader reports instead of
//! raising a condition across the manager boundary.

/// Structured failure reported by a profile loader.
///
/// The cache manager matches on this kind specifically: every variant is
/// recovered locally, logged, and surfaced to the caller as the invalid
/// profile sentinel.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed IES profile: {0}")]
    Malformed(String),

    #[error("Unsupported IES profile: {0}")]
    Unsupported(String),
}

impl LoadError {
    pub fn malformed<T: ToString>(msg: T) -> Self {
        LoadError::Malformed(msg.to_string())
    }

    pub fn unsupported<T: ToString>(msg: T) -> Self {
        LoadError::Unsupported(msg.to_string())
    }
}

/// Centralized error type for all cache and storage operations
#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("Device error: {0}")]
    Device(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Readback error: {0}")]
    Readback(String),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProfileError {
    /// Convenience constructors for common error types
    pub fn device<T: ToString>(msg: T) -> Self {
        ProfileError::Device(msg.to_string())
    }

    pub fn upload<T: ToString>(msg: T) -> Self {
        ProfileError::Upload(msg.to_string())
    }

    pub fn readback<T: ToString>(msg: T) -> Self {
        ProfileError::Readback(msg.to_string())
    }
}

/// Result type alias for cache operations
pub type ProfileResult<T> = Result<T, ProfileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_messages_carry_reason() {
        let err = LoadError::malformed("expected 12 candela values, found 3");
        assert_eq!(
            err.to_string(),
            "Malformed IES profile: expected 12 candela values, found 3"
        );

        let err = LoadError::unsupported("TILT=INCLUDE");
        assert!(err.to_string().starts_with("Unsupported IES profile:"));
    }

    #[test]
    fn load_error_converts_into_profile_error() {
        let err: ProfileError = LoadError::malformed("truncated").into();
        assert!(matches!(err, ProfileError::Load(_)));
    }
}
