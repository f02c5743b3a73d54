//! Usage errors raised by the profiler entry points
//!
//! All of these are detected before any session state is touched: the
//! registry is not cleared, no hook is subscribed and the work unit never runs.

use thiserror::Error;

/// Errors a caller can trigger by misusing the profiler API
#[derive(Error, Debug)]
pub enum UsageError {
    #[error("no work unit supplied")]
    NoWorkUnit,

    #[error("profiler already running")]
    AlreadyRunning,

    #[error("selector must be an exact path or a pattern")]
    InvalidSelector,

    #[error("invalid selector pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type for profiler entry points
pub type Result<T> = std::result::Result<T, UsageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_messages() {
        assert_eq!(UsageError::NoWorkUnit.to_string(), "no work unit supplied");
        assert_eq!(
            UsageError::AlreadyRunning.to_string(),
            "profiler already running"
        );
        assert_eq!(
            UsageError::InvalidSelector.to_string(),
            "selector must be an exact path or a pattern"
        );
    }

    #[test]
    fn test_invalid_pattern_wraps_regex_error() {
        let err = regex::Regex::new("[unclosed").unwrap_err();
        let usage: UsageError = err.into();
        assert!(usage.to_string().starts_with("invalid selector pattern:"));
    }

    #[test]
    fn test_usage_error_converts_into_anyhow() {
        let err: anyhow::Error = UsageError::AlreadyRunning.into();
        assert!(matches!(
            err.downcast_ref::<UsageError>(),
            Some(UsageError::AlreadyRunning)
        ));
    }
}
