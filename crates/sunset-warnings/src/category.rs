use serde::{Deserialize, Serialize};

use crate::error::FilterParseError;

/// Warning categories understood by filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Deprecation,
    PendingDeprecation,
    User,
    Runtime,
}

impl Category {
    /// Display name, e.g. `DeprecationWarning`.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Deprecation => "DeprecationWarning",
            Category::PendingDeprecation => "PendingDeprecationWarning",
            Category::User => "UserWarning",
            Category::Runtime => "RuntimeWarning",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Category {
    type Err = FilterParseError;

    /// Accepts `deprecation`, `pending_deprecation`, `DeprecationWarning`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        let key = key.strip_suffix("warning").unwrap_or(&key);
        match key {
            "deprecation" => Ok(Category::Deprecation),
            "pendingdeprecation" => Ok(Category::PendingDeprecation),
            "user" | "" => Ok(Category::User),
            "runtime" => Ok(Category::Runtime),
            _ => Err(FilterParseError::UnknownCategory(s.to_string())),
        }
    }
}
