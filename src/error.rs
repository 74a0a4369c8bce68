/// Exit code for usage/configuration problems.
const EXIT_USAGE: u8 = 2;
/// Exit code for an upstream series payload that is not the expected shape.
const EXIT_MALFORMED: u8 = 3;
/// Exit code for data/terminal failures.
const EXIT_DATA: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(EXIT_DATA, message)
    }

    /// A malformed upstream series payload, naming the offending field.
    ///
    /// This is the only failure the parse boundary propagates. Callers that
    /// hit it must substitute a static fallback dataset instead of letting the
    /// failure reach rendering.
    pub fn malformed(field: &str, detail: impl std::fmt::Display) -> Self {
        Self {
            exit_code: EXIT_MALFORMED,
            message: format!("Malformed series payload at '{field}': {detail}"),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn is_malformed_payload(&self) -> bool {
        self.exit_code == EXIT_MALFORMED
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_errors_are_classified() {
        let err = AppError::malformed("observations", "expected an array");
        assert!(err.is_malformed_payload());
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("observations"));

        let err = AppError::data("request failed");
        assert!(!err.is_malformed_payload());
    }
}
