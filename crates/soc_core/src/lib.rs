pub mod aggregate;
pub mod analytics;
pub mod audit;
pub mod cache;
pub mod config;
pub mod demo;
pub mod domain;
pub mod error;
pub mod feedback;
pub mod lifecycle;
pub mod refresh;
pub mod source;
pub mod triage;
pub mod validate;

#[cfg(test)]
mod tests {
    use super::error::{AppError, ErrorKind};

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new("VALIDATION_FAILED", "bad record").with_retryable(false);
        assert_eq!(err.code, "VALIDATION_FAILED");
        assert_eq!(err.message, "bad record");
        assert_eq!(err.retryable, false);
        assert_eq!(err.to_string(), "[VALIDATION_FAILED] bad record");
    }

    #[test]
    fn app_error_kind_follows_code() {
        assert_eq!(AppError::unknown_alert("X").kind(), ErrorKind::UnknownAlert);
        assert_eq!(
            AppError::new("FEEDBACK_INVALID_CLASSIFICATION", "m").kind(),
            ErrorKind::InvalidClassification
        );
        assert_eq!(
            AppError::new("ACTION_ALREADY_DECIDED", "m").kind(),
            ErrorKind::InvalidTransition
        );
        assert_eq!(AppError::new("ACTION_UNKNOWN", "m").kind(), ErrorKind::UnknownAction);
        assert_eq!(AppError::new("SOURCE_READ_FAILED", "m").kind(), ErrorKind::Io);
        assert!(AppError::new("VALIDATION_EMPTY_ID", "m").is(ErrorKind::Validation));
    }
}
