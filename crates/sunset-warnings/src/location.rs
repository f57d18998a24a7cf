use serde::{Deserialize, Serialize};

/// Where a warning is attributed to. Display only; nothing resolves it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Location of the caller of a `#[track_caller]` function.
    #[track_caller]
    pub fn caller() -> Self {
        let loc = std::panic::Location::caller();
        Self::new(loc.file(), loc.line())
    }

    /// The same file, `n` lines further down.
    pub fn offset(&self, n: u32) -> Self {
        Self::new(self.file.clone(), self.line.saturating_add(n))
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_points_here() {
        let loc = SourceLocation::caller();
        assert!(loc.file.ends_with("location.rs"), "file: {}", loc.file);
        assert_eq!(loc.line, line!() - 2);
    }

    #[test]
    fn offset_saturates() {
        let loc = SourceLocation::new("m", u32::MAX);
        assert_eq!(loc.offset(1).line, u32::MAX);
        assert_eq!(SourceLocation::new("m", 4).offset(1).to_string(), "m:5");
    }
}
