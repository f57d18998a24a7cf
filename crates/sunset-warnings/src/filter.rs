//! Warning filters.
//!
//! A filter pairs an [`Action`] with optional match criteria. The active
//! filter list is scanned front to back and the first match decides what
//! happens to a warning.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::FilterParseError;
use crate::warning::Warning;

/// What to do with a warning that matched a filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Show once per (message, category, file, line).
    Default,
    /// Turn the warning into a `WarningError`.
    Error,
    Ignore,
    Always,
    /// Show once per (message, category, file).
    Module,
    /// Show once per (message, category).
    Once,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Default => "default",
            Action::Error => "error",
            Action::Ignore => "ignore",
            Action::Always => "always",
            Action::Module => "module",
            Action::Once => "once",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Action::Default),
            "error" => Ok(Action::Error),
            "ignore" => Ok(Action::Ignore),
            "always" => Ok(Action::Always),
            "module" => Ok(Action::Module),
            "once" => Ok(Action::Once),
            _ => Err(FilterParseError::UnknownAction(s.to_string())),
        }
    }
}

/// One entry of the filter list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub action: Action,
    /// Case-insensitive prefix the message must start with.
    #[serde(default)]
    pub message: Option<String>,
    /// `None` matches every category.
    #[serde(default)]
    pub category: Option<Category>,
}

impl Filter {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            message: None,
            category: None,
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn message(mut self, prefix: impl Into<String>) -> Self {
        self.message = Some(prefix.into());
        self
    }

    pub fn matches(&self, warning: &Warning) -> bool {
        if let Some(cat) = self.category {
            if cat != warning.category {
                return false;
            }
        }
        match &self.message {
            Some(prefix) => warning
                .message
                .to_lowercase()
                .starts_with(&prefix.to_lowercase()),
            None => true,
        }
    }

    /// Parse a comma separated list of filter specs.
    pub fn parse_list(s: &str) -> Result<Vec<Filter>, FilterParseError> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl std::str::FromStr for Filter {
    type Err = FilterParseError;

    /// `action[:message[:category]]`; empty fields match anything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(':').map(str::trim).collect();
        if fields.len() > 3 {
            return Err(FilterParseError::TooManyFields(s.to_string()));
        }
        let mut filter = Filter::new(fields[0].parse()?);
        if let Some(msg) = fields.get(1).filter(|m| !m.is_empty()) {
            filter.message = Some(msg.to_string());
        }
        if let Some(cat) = fields.get(2).filter(|c| !c.is_empty()) {
            filter.category = Some(cat.parse()?);
        }
        Ok(filter)
    }
}
