use thiserror::Error;

/// Classification of a runtime failure. Each code maps onto the process
/// exit code the driver reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The `Main` class or its parameterless `run` method is missing.
    MissingMain,
    /// A name was read before any assignment bound it.
    UndefinedVariable,
    /// A formal parameter was the target of an assignment.
    AssignToParameter,
    /// No step of the dispatch ladder accepted the message.
    DoesNotUnderstand,
    /// A built-in routine received an argument it cannot work with.
    ValueError,
    /// An invariant the front end guarantees was violated anyway.
    Internal,
}

impl ErrorCode {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCode::MissingMain => 31,
            ErrorCode::UndefinedVariable => 32,
            ErrorCode::AssignToParameter => 34,
            ErrorCode::DoesNotUnderstand => 51,
            ErrorCode::ValueError => 53,
            ErrorCode::Internal => 99,
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub code: ErrorCode,
    pub message: String,
}

impl RuntimeError {
    pub(crate) fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn missing_main(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingMain, message)
    }

    pub(crate) fn undefined_variable(name: &str) -> Self {
        Self::new(
            ErrorCode::UndefinedVariable,
            format!("read of undefined variable '{}'", name),
        )
    }

    pub(crate) fn assign_to_parameter(name: &str) -> Self {
        Self::new(
            ErrorCode::AssignToParameter,
            format!("assignment to parameter '{}'", name),
        )
    }

    pub(crate) fn does_not_understand(class_name: &str, selector: &str) -> Self {
        Self::new(
            ErrorCode::DoesNotUnderstand,
            format!("{} does not understand '{}'", class_name, selector),
        )
    }

    pub(crate) fn value_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueError, message)
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, RuntimeError};

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(ErrorCode::MissingMain.exit_code(), 31);
        assert_eq!(ErrorCode::UndefinedVariable.exit_code(), 32);
        assert_eq!(ErrorCode::AssignToParameter.exit_code(), 34);
        assert_eq!(ErrorCode::DoesNotUnderstand.exit_code(), 51);
        assert_eq!(ErrorCode::ValueError.exit_code(), 53);
        assert_eq!(ErrorCode::Internal.exit_code(), 99);
    }

    #[test]
    fn does_not_understand_carries_class_and_selector() {
        let err = RuntimeError::does_not_understand("Integer", "foo:");
        assert_eq!(err.code, ErrorCode::DoesNotUnderstand);
        assert!(err.message.contains("Integer"));
        assert!(err.message.contains("foo:"));
    }

    #[test]
    fn display_is_the_message() {
        let err = RuntimeError::undefined_variable("x");
        assert_eq!(err.to_string(), err.message);
    }
}
