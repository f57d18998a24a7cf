use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::location::SourceLocation;

/// One emitted warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub message: String,
    pub category: Category,
    pub location: SourceLocation,
}

impl Warning {
    pub fn new(message: impl Into<String>, category: Category, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            category,
            location,
        }
    }
}

impl std::fmt::Display for Warning {
    /// `file:line: CategoryWarning: message`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.category, self.message)
    }
}
