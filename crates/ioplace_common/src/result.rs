//! Common result and error types for the ioplace toolchain.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates a broken engine invariant (a bug in ioplace), not a
/// user-facing problem. Caller misuse and infeasible inputs are reported
/// through the typed errors of each crate.
pub type IoplaceResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in ioplace, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal placer error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("slot pool drained");
        assert_eq!(format!("{err}"), "internal placer error: slot pool drained");
    }

    #[test]
    fn err_path() {
        let r: IoplaceResult<i32> = Err(InternalError::new("test error"));
        let err = r.err().unwrap();
        assert_eq!(err.message, "test error");
    }

    #[test]
    fn from_string() {
        let err: InternalError = "from string".to_string().into();
        assert_eq!(err.message, "from string");
    }
}
