use std::fmt;

/// Marker of the background network failure the driver can surface after the
/// run has already been decided.
const TRANSIENT_NETWORK_MARKER: &str = "fetch failed";

#[derive(Debug)]
pub enum AppError {
    /// Balance accounting is switched off in the application config.
    ConfigurationDisabled,
    Configuration(String),
    InvalidInput(String),
    NotFound(String),
    /// Upsert threw.
    StoreWrite(String),
    /// Upsert returned, but not a record carrying `tokenCredits`.
    UnexpectedWriteResult,
    DatabaseError(String),
}

/// How the top-level boundary treats an error that escaped the procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    TransientNetworkNoise,
    Fatal,
}

impl AppError {
    /// Only connection-level failures can be transient noise; a write error
    /// reported by the store is always fatal.
    pub fn class(&self) -> ErrorClass {
        match self {
            AppError::DatabaseError(msg) if msg.contains(TRANSIENT_NETWORK_MARKER) => {
                ErrorClass::TransientNetworkNoise
            }
            _ => ErrorClass::Fatal,
        }
    }

    /// Every error that reaches `main` ends the run with status 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigurationDisabled => write!(
                f,
                "Balance is not enabled. Use librechat.yaml to enable it"
            ),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::StoreWrite(msg) => write!(f, "{}", msg),
            AppError::UnexpectedWriteResult => {
                write!(f, "Something went wrong while updating the balance!")
            }
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_is_transient() {
        let err = AppError::DatabaseError("TypeError: fetch failed".into());
        assert_eq!(err.class(), ErrorClass::TransientNetworkNoise);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_store_write_mentioning_fetch_failed_stays_fatal() {
        let err = AppError::StoreWrite("upstream fetch failed".into());
        assert_eq!(err.class(), ErrorClass::Fatal);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_other_errors_are_fatal() {
        let errors = [
            AppError::ConfigurationDisabled,
            AppError::InvalidInput("Invalid email address!".into()),
            AppError::NotFound("No user with that email was found!".into()),
            AppError::StoreWrite("Cast to Number failed".into()),
            AppError::UnexpectedWriteResult,
        ];
        for err in errors {
            assert_eq!(err.class(), ErrorClass::Fatal);
            assert_eq!(err.exit_code(), 1);
        }
    }
}
