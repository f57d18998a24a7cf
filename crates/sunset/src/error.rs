//! Failure kinds raised by markers and by the object model.

/// Raised on every call of a function marked with [`crate::deprecated`].
///
/// Surfaces through `anyhow::Error`; catch it with
/// `err.downcast_ref::<DeprecatedError>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecatedError {
    pub name: String,
}

impl std::fmt::Display for DeprecatedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}() is deprecated", self.name)
    }
}

impl std::error::Error for DeprecatedError {}

/// Raised at annotation time when the marked value is neither a function
/// nor a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub type_name: String,
}

impl std::fmt::Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "type error: cannot mark a value of type '{}' as deprecated (expected a function or class)",
            self.type_name
        )
    }
}

impl std::error::Error for TypeError {}

/// Errors from invoking values of the object model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// Constructor called with the wrong number of positional arguments
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },
    /// Value has no call behavior
    NotCallable(String),
}

impl std::fmt::Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallError::Arity {
                name,
                expected,
                got,
            } => write!(
                f,
                "{}() takes {} positional argument(s) but {} were given",
                name, expected, got
            ),
            CallError::NotCallable(ty) => write!(f, "'{}' object is not callable", ty),
        }
    }
}

impl std::error::Error for CallError {}
