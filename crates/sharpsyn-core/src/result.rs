//! Result type alias for sharpsyn operations

use crate::error::SharpsynError;

/// Standard Result type for sharpsyn operations
pub type Result<T> = std::result::Result<T, SharpsynError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Turn a recoverable error into `Ok(None)`
    fn recoverable(self) -> Result<Option<T>>;

    /// Log the error and continue with None
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Recoverable error: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn log_and_continue(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                if err.is_recoverable() {
                    tracing::warn!("Continuing after error: {}", err);
                } else {
                    tracing::error!("Fatal error: {}", err);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable() {
        let ok: Result<u32> = Ok(1);
        assert_eq!(ok.recoverable().ok().flatten(), Some(1));

        let io: Result<u32> = Err(SharpsynError::io_error(
            "x.cs",
            std::io::Error::other("boom"),
        ));
        assert!(matches!(io.recoverable(), Ok(None)));

        let config: Result<u32> = Err(SharpsynError::config_error("bad"));
        assert!(config.recoverable().is_err());
    }

    #[test]
    fn test_log_and_continue() {
        let ok: Result<u32> = Ok(7);
        assert_eq!(ok.log_and_continue(), Some(7));

        let err: Result<u32> = Err(SharpsynError::round_trip_mismatch("a.cs", "text differs"));
        assert_eq!(err.log_and_continue(), None);
    }
}
