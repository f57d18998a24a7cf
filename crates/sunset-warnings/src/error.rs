use crate::warning::Warning;

/// Errors from parsing filter specs (`action[:message[:category]]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterParseError {
    UnknownAction(String),
    UnknownCategory(String),
    TooManyFields(String),
}

impl std::fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterParseError::UnknownAction(a) => write!(f, "unknown warning action: '{}'", a),
            FilterParseError::UnknownCategory(c) => {
                write!(f, "unknown warning category: '{}'", c)
            }
            FilterParseError::TooManyFields(s) => {
                write!(f, "too many fields in warning filter: '{}'", s)
            }
        }
    }
}

impl std::error::Error for FilterParseError {}

/// A warning that an `error` filter turned into a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningError {
    Raised(Warning),
}

impl WarningError {
    pub fn warning(&self) -> &Warning {
        match self {
            WarningError::Raised(w) => w,
        }
    }
}

impl std::fmt::Display for WarningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningError::Raised(w) => write!(f, "{}: {}", w.category, w.message),
        }
    }
}

impl std::error::Error for WarningError {}
